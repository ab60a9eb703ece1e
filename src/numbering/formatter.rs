use std::collections::HashMap;

use super::definitions::{LevelDefinition, MarkerStyle, NumberingDefinitions};
use super::format::{format_number, normalize_bullet};

/// Values above this are taken as twips, values at or below it as points.
const TWIPS_THRESHOLD: f32 = 144.0;

const MAX_LEVELS: u8 = 9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatterOptions {
    /// Reset counters of deeper levels whenever a shallower level of the
    /// same list is formatted. Off by default: every `(list, level)` pair
    /// counts independently.
    pub restart_deeper_levels: bool,
}

/// A rendered list marker and the layout metrics of its level, in points.
#[derive(Clone, Debug, PartialEq)]
pub struct ListMarker {
    pub text: String,
    pub style: MarkerStyle,
    pub counter: i64,
    pub format: String,
    pub indent_left: f32,
    pub indent_right: f32,
    pub indent_hanging: f32,
    pub indent_first_line: f32,
    pub suffix: String,
    pub alignment: String,
    pub tab_position: Option<f32>,
    /// Where the marker starts.
    pub number_position: f32,
    /// Where the paragraph text starts.
    pub text_position: f32,
}

impl ListMarker {
    pub fn is_bullet(&self) -> bool {
        self.format == "bullet"
    }
}

pub(crate) fn to_points(value: f32) -> f32 {
    if value.abs() > TWIPS_THRESHOLD {
        value / 20.0
    } else {
        value
    }
}

/// Turns `(numId, level)` pairs into list markers.
///
/// Counter state lives in the formatter, so markers are only correct when
/// list paragraphs are formatted once each, in document order. Use one
/// formatter per document pass.
#[derive(Clone, Debug)]
pub struct NumberingFormatter {
    definitions: NumberingDefinitions,
    options: FormatterOptions,
    counters: HashMap<(String, u8), i64>,
}

impl NumberingFormatter {
    pub fn new(definitions: NumberingDefinitions) -> Self {
        Self::with_options(definitions, FormatterOptions::default())
    }

    pub fn with_options(definitions: NumberingDefinitions, options: FormatterOptions) -> Self {
        Self {
            definitions,
            options,
            counters: HashMap::new(),
        }
    }

    pub fn definitions(&self) -> &NumberingDefinitions {
        &self.definitions
    }

    pub fn options(&self) -> FormatterOptions {
        self.options
    }

    /// Advance the counter of `(num_id, level)` and render its marker.
    /// Returns `None` when the list or level is not defined.
    pub fn format(&mut self, num_id: &str, level: u8) -> Option<ListMarker> {
        let Some(def) = self.definitions.resolve_level(num_id, level) else {
            log::debug!("No numbering definition for numId={num_id} ilvl={level}");
            return None;
        };

        if self.options.restart_deeper_levels {
            self.counters
                .retain(|(id, lvl), _| id != num_id || *lvl <= level);
        }

        let seed = def.effective_start().saturating_sub(1);
        let counter = self
            .counters
            .entry((num_id.to_string(), level))
            .or_insert(seed);
        *counter = counter.saturating_add(1);
        let value = *counter;

        let format = def.format.clone().unwrap_or_else(|| "decimal".to_string());
        let text = match format.as_str() {
            "bullet" => normalize_bullet(def.text.as_deref().unwrap_or("")),
            "none" => String::new(),
            _ => self.render_template(num_id, level, value, &def),
        };
        Some(self.build_marker(def, format, text, value))
    }

    /// Step the counter of `(num_id, level)` back by one, never below its
    /// seed (`start - 1`). Untouched counters stay untouched.
    pub fn rewind(&mut self, num_id: &str, level: u8) {
        let seed = self
            .definitions
            .resolve_level(num_id, level)
            .map(|d| d.effective_start().saturating_sub(1))
            .unwrap_or(0);
        if let Some(counter) = self.counters.get_mut(&(num_id.to_string(), level)) {
            if *counter > seed {
                *counter -= 1;
            }
        }
    }

    /// Current counter value, `None` if the pair was never formatted.
    pub fn counter(&self, num_id: &str, level: u8) -> Option<i64> {
        self.counters.get(&(num_id.to_string(), level)).copied()
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }

    pub fn reset_list(&mut self, num_id: &str) {
        self.counters.retain(|(id, _), _| id != num_id);
    }

    /// Substitute `%1`..`%9` in the level text. The current level uses
    /// `value`; other levels use their running counter, or their start
    /// value when they have not been formatted yet.
    fn render_template(&self, num_id: &str, level: u8, value: i64, def: &LevelDefinition) -> String {
        let template = def.text.as_deref().unwrap_or("");
        let mut out = String::with_capacity(template.len() + 4);
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            let placeholder = match (c, chars.peek()) {
                ('%', Some(d)) => d
                    .to_digit(10)
                    .filter(|n| (1..=MAX_LEVELS as u32).contains(n))
                    .map(|n| (n - 1) as u8),
                _ => None,
            };
            let Some(target) = placeholder else {
                out.push(c);
                continue;
            };
            chars.next();
            let (n, fmt) = if target == level {
                (value, def.format.clone().unwrap_or_else(|| "decimal".into()))
            } else {
                let other = self.definitions.resolve_level(num_id, target);
                let n = self
                    .counter(num_id, target)
                    .unwrap_or_else(|| other.as_ref().map_or(1, |d| d.effective_start()));
                let fmt = other
                    .and_then(|d| d.format)
                    .unwrap_or_else(|| "decimal".into());
                (n, fmt)
            };
            let fmt = if def.legal { "decimal" } else { fmt.as_str() };
            out.push_str(&format_number(n, fmt));
        }
        out
    }

    fn build_marker(&self, def: LevelDefinition, format: String, text: String, value: i64) -> ListMarker {
        let indent = def.indent.unwrap_or_default();
        let indent_left = indent.left.map(to_points).unwrap_or(0.0);
        let indent_right = indent.right.map(to_points).unwrap_or(0.0);
        let indent_hanging = indent.hanging.map(to_points).unwrap_or(0.0);
        let indent_first_line = indent.first_line.map(to_points).unwrap_or(0.0);
        let suffix = def.suffix.unwrap_or_else(|| "tab".to_string());

        let tab_position = def
            .tabs
            .iter()
            .find(|t| t.val.as_deref() == Some("num") && t.pos.is_some())
            .or_else(|| def.tabs.iter().find(|t| t.pos.is_some()))
            .and_then(|t| t.pos)
            .map(to_points)
            .or_else(|| (suffix == "tab").then_some(indent_left));

        let number_position = if indent_hanging != 0.0 {
            indent_left - indent_hanging
        } else {
            indent_left + indent_first_line
        };

        ListMarker {
            text,
            style: def.style.unwrap_or_default(),
            counter: value,
            format,
            indent_left,
            indent_right,
            indent_hanging,
            indent_first_line,
            suffix,
            alignment: def.alignment.unwrap_or_else(|| "left".to_string()),
            tab_position,
            number_position,
            text_position: indent_left,
        }
    }
}
