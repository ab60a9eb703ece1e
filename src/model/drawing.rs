use super::{Body, Model, Paragraph, Run};

pub const EMU_PER_POINT: i64 = 12_700;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorType {
    #[default]
    Inline,
    Anchor,
}

impl AnchorType {
    pub fn as_val(self) -> &'static str {
        match self {
            AnchorType::Inline => "inline",
            AnchorType::Anchor => "anchor",
        }
    }
}

/// `wp:positionH`/`wp:positionV`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisPosition {
    pub relative_from: Option<String>,
    pub offset: Option<i64>, // EMU
    pub align: Option<String>,
}

/// Placement of a DrawingML (or VML) object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawingAnchor {
    pub anchor_type: AnchorType,
    pub extent_cx: i64, // EMU
    pub extent_cy: i64,
    pub position_h: Option<AxisPosition>,
    pub position_v: Option<AxisPosition>,
    pub behind_doc: bool,
    pub wrap: Option<String>,
    pub relative_height: Option<i64>,
}

impl DrawingAnchor {
    pub fn width_pt(&self) -> f32 {
        self.extent_cx as f32 / EMU_PER_POINT as f32
    }

    pub fn height_pt(&self) -> f32 {
        self.extent_cy as f32 / EMU_PER_POINT as f32
    }
}

/// Why an image reference could not be tied to a package part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnresolvedReason {
    MissingRelationshipId,
    UnknownRelationship(String),
    NotAnImage { rel_id: String, rel_type: String },
    EmptyTarget(String),
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::MissingRelationshipId => write!(f, "no relationship id"),
            UnresolvedReason::UnknownRelationship(id) => write!(f, "unknown relationship {id}"),
            UnresolvedReason::NotAnImage { rel_id, rel_type } => {
                write!(f, "relationship {rel_id} has type {rel_type}")
            }
            UnresolvedReason::EmptyTarget(id) => write!(f, "relationship {id} has no target"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// `path` is a package part path, or a URL when `external`.
    Resolved { path: String, external: bool },
    Unresolved(UnresolvedReason),
}

impl ImageSource {
    pub fn path(&self) -> Option<&str> {
        match self {
            ImageSource::Resolved { path, .. } => Some(path),
            ImageSource::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ImageSource::Resolved { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub rel_id: Option<String>,
    pub width: i64, // EMU
    pub height: i64,
    pub anchor_type: AnchorType,
    pub position: Option<DrawingAnchor>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub source: ImageSource,
    pub raw_xml: Option<String>,
}

impl Image {
    pub fn width_pt(&self) -> f32 {
        self.width as f32 / EMU_PER_POINT as f32
    }

    pub fn height_pt(&self) -> f32 {
        self.height as f32 / EMU_PER_POINT as f32
    }
}

/// Decoded header information of an image part.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub format: image::ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBoxKind {
    DrawingMl,
    Vml,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    pub content: Body,
    pub anchor: Option<DrawingAnchor>,
    pub kind: TextBoxKind,
    pub raw_xml: Option<String>,
}

impl TextBox {
    /// Runs of every paragraph in the box, table cells included, in
    /// reading order.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();
        for_each_paragraph(&self.content, &mut |p| runs.extend(p.runs.iter().cloned()));
        runs
    }

    /// Copy the box anchor onto every run inside it.
    pub fn anchor_runs(&mut self) {
        let anchor = self.anchor.clone();
        for_each_paragraph_mut(&mut self.content, &mut |p| {
            for run in &mut p.runs {
                run.anchor = anchor.clone();
            }
        });
    }
}

fn for_each_paragraph(body: &Body, f: &mut impl FnMut(&Paragraph)) {
    for model in body.iter() {
        match model {
            Model::Paragraph(p) => f(p),
            Model::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| &r.cells) {
                    for_each_paragraph(&cell.content, f);
                }
            }
            _ => {}
        }
    }
}

fn for_each_paragraph_mut(body: &mut Body, f: &mut impl FnMut(&mut Paragraph)) {
    for model in body.children_mut() {
        match model {
            Model::Paragraph(p) => f(p),
            Model::Table(t) => {
                for cell in t.rows.iter_mut().flat_map(|r| &mut r.cells) {
                    for_each_paragraph_mut(&mut cell.content, f);
                }
            }
            _ => {}
        }
    }
}
