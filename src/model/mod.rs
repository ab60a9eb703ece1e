//! The semantic tree produced by the parser.
//!
//! Ownership is strictly top-down: a [`Body`] owns its [`Model`] children,
//! a table owns its rows, a row its cells, and a cell its own `Body`.

mod body;
mod document;
mod drawing;
mod field;
mod hyperlink;
mod paragraph;
mod run;
mod section;
mod table;
mod values;

pub use body::{Body, TextContainer};
pub use document::{Document, Note, NoteKind};
pub use drawing::{
    AnchorType, AxisPosition, DrawingAnchor, Image, ImageData, ImageSource, TextBox, TextBoxKind,
    UnresolvedReason, EMU_PER_POINT,
};
pub use field::{Field, FieldKind, FieldType};
pub use hyperlink::Hyperlink;
pub use paragraph::{
    Bookmark, BookmarkKind, Indentation, NumberingRef, Paragraph, ParagraphStyle, Spacing,
};
pub use run::{BreakType, HyperlinkRef, Run, RunStyle, Space, Symbol, VertAlign, Watermark};
pub use section::{
    Columns, HeaderFooterRef, HeaderFooterType, Orientation, PageMargins, PageNumbering,
    SectionBreakType, SectionProperties,
};
pub use table::{
    StructureIssue, Table, TableCell, TableProperties, TableRow, VMergeType,
};
pub use values::{
    Alignment, Border, Borders, ColorValue, Margins, Shading, TabAlignment, TabStop, Width,
};

/// A node of the semantic tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    Paragraph(Paragraph),
    Table(Table),
    TableRow(TableRow),
    TableCell(TableCell),
    Run(Run),
    Image(Image),
    Field(Field),
    Hyperlink(Hyperlink),
    TextBox(TextBox),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Paragraph,
    Table,
    TableRow,
    TableCell,
    Run,
    Image,
    Field,
    Hyperlink,
    TextBox,
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Paragraph(_) => ModelKind::Paragraph,
            Model::Table(_) => ModelKind::Table,
            Model::TableRow(_) => ModelKind::TableRow,
            Model::TableCell(_) => ModelKind::TableCell,
            Model::Run(_) => ModelKind::Run,
            Model::Image(_) => ModelKind::Image,
            Model::Field(_) => ModelKind::Field,
            Model::Hyperlink(_) => ModelKind::Hyperlink,
            Model::TextBox(_) => ModelKind::TextBox,
        }
    }

    /// Verbatim source XML, for node types that keep it.
    pub fn raw_xml(&self) -> Option<&str> {
        match self {
            Model::Paragraph(p) => p.raw_xml.as_deref(),
            Model::Table(t) => t.raw_xml.as_deref(),
            Model::Run(r) => r.raw_xml.as_deref(),
            Model::Image(i) => i.raw_xml.as_deref(),
            Model::Field(f) => f.raw_xml.as_deref(),
            Model::TextBox(tb) => tb.raw_xml.as_deref(),
            Model::TableRow(_) | Model::TableCell(_) | Model::Hyperlink(_) => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Model::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Model::Table(t) => Some(t),
            _ => None,
        }
    }
}
