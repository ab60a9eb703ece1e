use super::{
    Alignment, Borders, Field, Hyperlink, Model, Run, RunStyle, SectionProperties, Shading,
    TabStop,
};
use crate::numbering::ListMarker;

/// Which list, and which depth in it, a paragraph belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberingRef {
    pub id: String,
    pub level: String,
}

impl NumberingRef {
    pub fn new(id: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: level.into(),
        }
    }

    pub fn level_index(&self) -> Option<u8> {
        self.level.trim().parse().ok()
    }

    /// `numId` 0 explicitly removes numbering inherited from a style.
    pub fn is_removal(&self) -> bool {
        self.id == "0"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookmarkKind {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bookmark {
    pub kind: BookmarkKind,
    pub name: Option<String>,
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spacing {
    pub before: Option<f32>,
    pub after: Option<f32>,
    /// Raw `w:line` value; 240ths of a line for `auto`, twips otherwise.
    pub line: Option<f32>,
    pub line_rule: Option<String>,
}

/// Indentation in points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Indentation {
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub hanging: Option<f32>,
    pub first_line: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphStyle {
    pub style_id: Option<String>,
    pub alignment: Option<Alignment>,
    pub spacing: Spacing,
    pub indent: Indentation,
    pub keep_next: Option<bool>,
    pub keep_lines: Option<bool>,
    pub page_break_before: Option<bool>,
    pub contextual_spacing: Option<bool>,
    pub outline_level: Option<u8>,
    pub tabs: Vec<TabStop>,
    pub shading: Option<Shading>,
    pub borders: Option<Borders>,
}

impl ParagraphStyle {
    pub fn merge(&mut self, over: &ParagraphStyle) {
        macro_rules! take {
            ($dst:expr, $src:expr, $($path:ident).+) => {
                if $src.$($path).+.is_some() {
                    $dst.$($path).+ = $src.$($path).+.clone();
                }
            };
        }
        take!(self, over, style_id);
        take!(self, over, alignment);
        take!(self, over, spacing.before);
        take!(self, over, spacing.after);
        take!(self, over, spacing.line);
        take!(self, over, spacing.line_rule);
        take!(self, over, indent.left);
        take!(self, over, indent.right);
        take!(self, over, indent.hanging);
        take!(self, over, indent.first_line);
        take!(self, over, keep_next);
        take!(self, over, keep_lines);
        take!(self, over, page_break_before);
        take!(self, over, contextual_spacing);
        take!(self, over, outline_level);
        take!(self, over, shading);
        take!(self, over, borders);
        if !over.tabs.is_empty() {
            self.tabs = over.tabs.clone();
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    /// Structural inline nodes (hyperlinks) in document order. Their runs
    /// are also present, flattened, in `runs`.
    pub children: Vec<Model>,
    pub numbering: Option<NumberingRef>,
    pub style: ParagraphStyle,
    /// Formatting of the paragraph mark (`pPr/rPr`).
    pub mark_style: RunStyle,
    pub bookmarks: Vec<Bookmark>,
    /// Set when this paragraph ends a section.
    pub section_properties: Option<Box<SectionProperties>>,
    pub marker: Option<ListMarker>,
    pub raw_xml: Option<String>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut para = Self::new();
        para.add_run(Run::new(text));
        para
    }

    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    pub fn set_list(&mut self, id: impl Into<String>, level: impl Into<String>) {
        self.numbering = Some(NumberingRef::new(id, level));
    }

    pub fn set_style(&mut self, style: ParagraphStyle) {
        self.style = style;
    }

    pub fn get_text(&self) -> String {
        let mut text = String::new();
        for run in &self.runs {
            text.push_str(run.get_text());
        }
        text
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    pub fn is_list_item(&self) -> bool {
        self.numbering.as_ref().is_some_and(|n| !n.is_removal())
    }

    pub fn hyperlinks(&self) -> impl Iterator<Item = &Hyperlink> {
        self.children.iter().filter_map(|m| match m {
            Model::Hyperlink(h) => Some(h),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.runs.iter().flat_map(Run::fields)
    }
}
