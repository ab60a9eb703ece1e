//! List numbering: definitions from `numbering.xml` and the counter engine
//! that renders markers.

mod definitions;
mod format;
mod formatter;

pub use definitions::{
    AbstractNumbering, LevelDefinition, LevelIndent, LevelTab, MarkerStyle, NumberingDefinitions,
    NumberingInstance,
};
pub use format::{
    cardinal_text, format_number, normalize_bullet, number_to_letters, number_to_roman, ordinal,
    ordinal_text,
};
pub use formatter::{FormatterOptions, ListMarker, NumberingFormatter};
