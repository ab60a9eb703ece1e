use super::{Image, Model, ModelKind, Paragraph, SectionProperties, Table};

const BODY_KINDS: &[ModelKind] = &[
    ModelKind::Paragraph,
    ModelKind::Table,
    ModelKind::Image,
    ModelKind::TextBox,
];
const CELL_KINDS: &[ModelKind] = &[ModelKind::Paragraph, ModelKind::Table, ModelKind::Image];

/// Uniform read access to block containers: bodies, tables and cells.
pub trait TextContainer {
    fn get_paragraphs(&self) -> Vec<&Paragraph>;

    fn get_tables(&self) -> Vec<&Table>;

    fn get_images(&self) -> Vec<&Image>;

    /// Paragraphs of this container and, depth first, of every nested table.
    fn all_paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = self.get_paragraphs();
        for table in self.get_tables() {
            out.extend(table.all_paragraphs());
        }
        out
    }
}

/// An ordered block container. Only node kinds in the container's allowed
/// set are accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    children: Vec<Model>,
    allowed: &'static [ModelKind],
    /// The trailing `w:sectPr` of the part, if any.
    pub section_properties: Option<SectionProperties>,
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl Body {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            allowed: BODY_KINDS,
            section_properties: None,
        }
    }

    pub fn for_cell() -> Self {
        Self {
            children: Vec::new(),
            allowed: CELL_KINDS,
            section_properties: None,
        }
    }

    pub fn allows(&self, kind: ModelKind) -> bool {
        self.allowed.contains(&kind)
    }

    /// Append `model` if its kind is allowed here. Returns whether it was added.
    pub fn add_model(&mut self, model: Model) -> bool {
        let kind = model.kind();
        if !self.allows(kind) {
            log::debug!("Body rejects {kind:?} child");
            return false;
        }
        self.children.push(model);
        true
    }

    pub fn children(&self) -> &[Model] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Model] {
        &mut self.children
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.children.iter().filter_map(Model::as_paragraph)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.children.iter_mut().filter_map(|m| match m {
            Model::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.children.iter().filter_map(Model::as_table)
    }

    /// Plain text, one line per paragraph, tables flattened cell by cell.
    pub fn get_text(&self) -> String {
        let mut lines = Vec::new();
        for child in &self.children {
            match child {
                Model::Paragraph(p) => lines.push(p.get_text()),
                Model::Table(t) => {
                    for row in &t.rows {
                        for cell in &row.cells {
                            let text = cell.content.get_text();
                            if !text.is_empty() {
                                lines.push(text);
                            }
                        }
                    }
                }
                Model::TextBox(tb) => lines.push(tb.content.get_text()),
                _ => {}
            }
        }
        lines.join("\n")
    }
}

impl<'a> IntoIterator for &'a Body {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl TextContainer for Body {
    fn get_paragraphs(&self) -> Vec<&Paragraph> {
        self.paragraphs().collect()
    }

    fn get_tables(&self) -> Vec<&Table> {
        self.tables().collect()
    }

    fn get_images(&self) -> Vec<&Image> {
        let mut images = Vec::new();
        for child in &self.children {
            match child {
                Model::Image(img) => images.push(img),
                Model::Paragraph(p) => images.extend(p.runs.iter().filter_map(|r| r.image.as_ref())),
                _ => {}
            }
        }
        images
    }
}
