use super::{ColorValue, DrawingAnchor, Field, Image, Model, Shading, TextBox};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Space {
    #[default]
    Default,
    Preserve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakType {
    TextWrapping,
    Page,
    Column,
    Line,
}

impl BreakType {
    pub fn as_val(self) -> &'static str {
        match self {
            BreakType::TextWrapping => "textWrapping",
            BreakType::Page => "page",
            BreakType::Column => "column",
            BreakType::Line => "line",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertAlign {
    Baseline,
    Superscript,
    Subscript,
}

/// Character formatting. Every field is optional so that a character
/// style, inline `rPr` and document defaults can be layered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStyle {
    pub style_id: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Underline kind (`single`, `double`, ...); `none` is kept so it can
    /// override an inherited underline.
    pub underline: Option<String>,
    pub strike: Option<bool>,
    pub double_strike: Option<bool>,
    pub caps: Option<bool>,
    pub small_caps: Option<bool>,
    pub vanish: Option<bool>,
    pub font_name: Option<String>,
    pub font_east_asia: Option<String>,
    pub font_size: Option<f32>, // points
    pub color: Option<ColorValue>,
    pub highlight: Option<String>,
    pub vertical_align: Option<VertAlign>,
    pub shading: Option<Shading>,
    pub char_spacing: Option<f32>, // points
    pub rtl: Option<bool>,
}

macro_rules! overlay {
    ($target:expr, $over:expr, $($field:ident),+ $(,)?) => {
        $(
            if $over.$field.is_some() {
                $target.$field = $over.$field.clone();
            }
        )+
    };
}

impl RunStyle {
    /// Apply `over` on top of `self`; set fields in `over` win.
    pub fn merge(&mut self, over: &RunStyle) {
        overlay!(
            self, over, style_id, bold, italic, underline, strike, double_strike, caps,
            small_caps, vanish, font_name, font_east_asia, font_size, color, highlight,
            vertical_align, shading, char_spacing, rtl,
        );
    }

    pub fn merged(mut self, over: &RunStyle) -> RunStyle {
        self.merge(over);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == RunStyle::default()
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_underlined(&self) -> bool {
        self.underline.as_deref().is_some_and(|u| u != "none")
    }
}

/// Target of a hyperlink a run belongs to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HyperlinkRef {
    pub rel_id: Option<String>,
    pub anchor: Option<String>,
    pub target: Option<String>,
}

/// A VML shape classified as a watermark.
#[derive(Clone, Debug, PartialEq)]
pub struct Watermark {
    pub shape_id: Option<String>,
    pub text: Option<String>,
    pub style: Option<String>,
}

/// `w:sym`: a glyph addressed by font and character code.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub font: Option<String>,
    pub char_code: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
    pub space: Space,
    pub has_break: bool,
    pub has_tab: bool,
    pub has_drawing: bool,
    pub break_type: Option<BreakType>,
    pub footnote_refs: Vec<String>,
    pub endnote_refs: Vec<String>,
    /// `w:footnoteRef`/`w:endnoteRef`: the number mark at the start of a note body.
    pub is_note_mark: bool,
    /// Runs of an inline text box carried by this run.
    pub textbox: Option<Vec<Run>>,
    pub image: Option<Image>,
    /// Position of the drawing this run carries, or belongs to when it is
    /// part of a text box.
    pub anchor: Option<DrawingAnchor>,
    pub hyperlink: Option<HyperlinkRef>,
    pub watermark: Option<Watermark>,
    pub symbol: Option<Symbol>,
    /// Fields anchored at this run and full text box structures.
    pub children: Vec<Model>,
    pub raw_xml: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_style(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            ..Default::default()
        }
    }

    /// Text of the run. With `Space::Preserve` this is exactly the source
    /// text, surrounding whitespace included.
    pub fn get_text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.image.is_none()
            && self.textbox.is_none()
            && self.footnote_refs.is_empty()
            && self.endnote_refs.is_empty()
            && self.children.is_empty()
            && !self.has_break
            && !self.has_tab
            && !self.is_note_mark
    }

    pub fn has_note_refs(&self) -> bool {
        !self.footnote_refs.is_empty() || !self.endnote_refs.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.children.iter().filter_map(|m| match m {
            Model::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn textbox_model(&self) -> Option<&TextBox> {
        self.children.iter().find_map(|m| match m {
            Model::TextBox(tb) => Some(tb),
            _ => None,
        })
    }

    pub fn is_watermark(&self) -> bool {
        self.watermark.is_some()
    }
}
