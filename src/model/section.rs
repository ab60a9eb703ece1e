#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectionBreakType {
    #[default]
    NextPage,
    Continuous,
    EvenPage,
    OddPage,
    NextColumn,
}

impl SectionBreakType {
    pub fn from_val(val: &str) -> Self {
        match val {
            "continuous" => SectionBreakType::Continuous,
            "evenPage" => SectionBreakType::EvenPage,
            "oddPage" => SectionBreakType::OddPage,
            "nextColumn" => SectionBreakType::NextColumn,
            _ => SectionBreakType::NextPage,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderFooterType {
    Default,
    First,
    Even,
}

impl HeaderFooterType {
    pub fn from_val(val: &str) -> Self {
        match val {
            "first" => HeaderFooterType::First,
            "even" => HeaderFooterType::Even,
            _ => HeaderFooterType::Default,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderFooterRef {
    pub kind: HeaderFooterType,
    pub rel_id: String,
}

/// Page margins in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageMargins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub header: f32,
    pub footer: f32,
    pub gutter: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 72.0,
            bottom: 72.0,
            left: 72.0,
            right: 72.0,
            header: 36.0,
            footer: 36.0,
            gutter: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Columns {
    pub count: u32,
    pub space: f32,
    pub equal_width: bool,
    pub separator: bool,
    /// Explicit (width, space) pairs when widths are unequal.
    pub widths: Vec<(f32, f32)>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageNumbering {
    pub start: Option<u32>,
    pub format: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionProperties {
    pub page_width: f32, // points
    pub page_height: f32,
    pub orientation: Orientation,
    pub margins: PageMargins,
    pub columns: Option<Columns>,
    pub header_refs: Vec<HeaderFooterRef>,
    pub footer_refs: Vec<HeaderFooterRef>,
    pub title_page: bool,
    pub break_type: SectionBreakType,
    pub page_numbering: PageNumbering,
    pub line_pitch: Option<f32>,
    pub raw_xml: Option<String>,
}

impl Default for SectionProperties {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            orientation: Orientation::Portrait,
            margins: PageMargins::default(),
            columns: None,
            header_refs: Vec::new(),
            footer_refs: Vec::new(),
            title_page: false,
            break_type: SectionBreakType::NextPage,
            page_numbering: PageNumbering::default(),
            line_pitch: None,
            raw_xml: None,
        }
    }
}

impl SectionProperties {
    pub fn header_ref(&self, kind: HeaderFooterType) -> Option<&str> {
        self.header_refs
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| r.rel_id.as_str())
    }

    pub fn footer_ref(&self, kind: HeaderFooterType) -> Option<&str> {
        self.footer_refs
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| r.rel_id.as_str())
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right - self.margins.gutter
    }
}
