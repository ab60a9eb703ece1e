//! WordprocessingML → semantic model.
//!
//! [`XmlParser`] walks a part's element tree and dispatches on local tag
//! names through [`ElementKind`]. Each dispatched element is parsed in
//! isolation: a failure is logged and the element contributes nothing,
//! while its siblings parse normally. Only part-level problems (missing
//! part, malformed XML, wrong root) are returned as errors.

mod fields;
mod properties;
mod runs;
mod section;
mod styles;
mod tables;
pub(crate) mod xml;

use std::collections::BTreeMap;
use std::time::Instant;

use roxmltree::Node;

use crate::error::{Error, Result};
use crate::model::{
    Body, Bookmark, BookmarkKind, Document, Hyperlink, HyperlinkRef, Image, ImageData,
    ImageSource, Model, Note, NoteKind, Paragraph, ParagraphStyle, Run, RunStyle,
    SectionProperties,
};
use crate::numbering::{FormatterOptions, NumberingDefinitions, NumberingFormatter};
use crate::package::{
    DOCUMENT_PART, NUMBERING_PART, PackageReader, REL_TYPE_THEME, Relationships, STYLES_PART,
    resolve_target,
};

use fields::FieldScan;
use properties::{parse_paragraph_properties, parse_run_properties};
use xml::{attr, child, collect_block_nodes, collect_inline_nodes, local, rel_attr};

pub use styles::{StyleDefinition, StyleKind, StyleManager, ThemeFonts};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    /// Keep verbatim XML on tables, drawings, fields and section properties.
    pub keep_raw_xml: bool,
    /// Format list markers in document order while parsing the main body.
    pub format_list_markers: bool,
    pub numbering: FormatterOptions,
    /// Drop runs whose VML shape looks like a watermark.
    pub skip_watermarks: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            keep_raw_xml: true,
            format_list_markers: true,
            numbering: FormatterOptions::default(),
            skip_watermarks: false,
        }
    }
}

/// Elements with a parse routine. Anything else is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Paragraph,
    Run,
    Table,
    TableRow,
    TableCell,
    Drawing,
    SimpleField,
    Hyperlink,
    TextBoxContent,
}

impl ElementKind {
    /// Look up a tag by local name; a `w:` style prefix or a `{namespace}`
    /// qualifier is ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let name = tag.rsplit([':', '}']).next().unwrap_or(tag);
        Some(match name {
            "p" => ElementKind::Paragraph,
            "r" => ElementKind::Run,
            "tbl" => ElementKind::Table,
            "tr" => ElementKind::TableRow,
            "tc" => ElementKind::TableCell,
            "drawing" => ElementKind::Drawing,
            "fldSimple" => ElementKind::SimpleField,
            "hyperlink" => ElementKind::Hyperlink,
            "txbxContent" => ElementKind::TextBoxContent,
            _ => return None,
        })
    }
}

/// The part being parsed and its relationships.
pub(crate) struct PartContext {
    pub(crate) part_path: String,
    pub(crate) rels: Relationships,
}

impl PartContext {
    pub(crate) fn new(part_path: &str, rels: Relationships) -> Self {
        Self {
            part_path: part_path.to_string(),
            rels,
        }
    }
}

pub struct XmlParser<'p> {
    package: &'p dyn PackageReader,
    styles: StyleManager,
    numbering: Option<NumberingDefinitions>,
    document_rels: Relationships,
    options: ParserOptions,
}

impl<'p> XmlParser<'p> {
    pub fn new(package: &'p dyn PackageReader) -> Self {
        Self::with_options(package, ParserOptions::default())
    }

    /// Load styles, theme and numbering definitions up front. Problems with
    /// these parts are logged; parsing continues without them.
    pub fn with_options(package: &'p dyn PackageReader, options: ParserOptions) -> Self {
        let document_rels = package.part_relationships(DOCUMENT_PART);

        let theme_path = document_rels
            .by_type(REL_TYPE_THEME)
            .next()
            .map(|r| resolve_target(DOCUMENT_PART, &r.target))
            .or_else(|| {
                package
                    .part_names()
                    .into_iter()
                    .find(|n| n.starts_with("word/theme/") && n.ends_with(".xml"))
            });
        let theme_xml = theme_path.and_then(|p| package.get_xml_content(&p));
        let styles_xml = package.get_xml_content(STYLES_PART);
        let styles = StyleManager::parse(styles_xml.as_deref(), theme_xml.as_deref())
            .unwrap_or_else(|e| {
                log::warn!("Ignoring styles: {e}");
                StyleManager::new()
            });

        let numbering = package
            .get_xml_content(NUMBERING_PART)
            .and_then(|xml| match NumberingDefinitions::parse(&xml) {
                Ok(defs) => Some(defs),
                Err(e) => {
                    log::warn!("Ignoring {NUMBERING_PART}: {e}");
                    None
                }
            });

        Self {
            package,
            styles,
            numbering,
            document_rels,
            options,
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn styles(&self) -> &StyleManager {
        &self.styles
    }

    pub fn numbering_definitions(&self) -> Option<&NumberingDefinitions> {
        self.numbering.as_ref()
    }

    /// Replace the numbering definitions, e.g. with ones loaded from JSON.
    pub fn set_numbering_definitions(&mut self, definitions: NumberingDefinitions) {
        self.numbering = Some(definitions);
    }

    /// A fresh formatter over this document's lists, for a separate pass.
    pub fn numbering_formatter(&self) -> Option<NumberingFormatter> {
        self.numbering
            .clone()
            .map(|defs| NumberingFormatter::with_options(defs, self.options.numbering))
    }

    pub fn document_relationships(&self) -> &Relationships {
        &self.document_rels
    }

    /// Parse `word/document.xml` into a [`Body`] in document order. The
    /// trailing `w:sectPr` ends up in `Body::section_properties`.
    pub fn parse_body(&self) -> Result<Body> {
        let t0 = Instant::now();
        let xml_content = self
            .package
            .get_xml_content(DOCUMENT_PART)
            .ok_or_else(|| Error::MissingPart(DOCUMENT_PART.into()))?;
        let xml = roxmltree::Document::parse(&xml_content)?;
        let root = xml.root_element();
        if local(root) != "document" {
            return Err(Error::UnexpectedElement {
                expected: "document".into(),
                found: local(root).to_string(),
            });
        }
        let body_node =
            child(root, "body").ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;

        let ctx = PartContext::new(DOCUMENT_PART, self.document_rels.clone());
        let mut body = Body::new();
        self.parse_block_children(&ctx, body_node, &mut body);

        if self.options.format_list_markers {
            if let Some(mut formatter) = self.numbering_formatter() {
                apply_list_markers(&mut body, &mut formatter);
            }
        }

        log::info!(
            "Parsed {DOCUMENT_PART}: {} blocks in {:.1}ms",
            body.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Ok(body)
    }

    pub fn parse_header(&self, part_path: &str) -> Result<Body> {
        self.parse_story_part(part_path, "hdr")
    }

    pub fn parse_footer(&self, part_path: &str) -> Result<Body> {
        self.parse_story_part(part_path, "ftr")
    }

    fn parse_story_part(&self, part_path: &str, root_name: &str) -> Result<Body> {
        let xml_content = self
            .package
            .get_xml_content(part_path)
            .ok_or_else(|| Error::MissingPart(part_path.to_string()))?;
        let xml = roxmltree::Document::parse(&xml_content)?;
        let root = xml.root_element();
        if local(root) != root_name {
            return Err(Error::UnexpectedElement {
                expected: root_name.to_string(),
                found: local(root).to_string(),
            });
        }
        let ctx = PartContext::new(part_path, self.package.part_relationships(part_path));
        let mut body = Body::new();
        self.parse_block_children(&ctx, root, &mut body);
        Ok(body)
    }

    /// Headers and footers referenced by a section, keyed by relationship id.
    /// References that do not resolve, and parts that fail to parse, are
    /// logged and left out.
    pub fn parse_section_headers_footers(
        &self,
        sect: &SectionProperties,
    ) -> (BTreeMap<String, Body>, BTreeMap<String, Body>) {
        let load = |rel_id: &str, root_name: &str| -> Option<Body> {
            let Some(rel) = self.document_rels.get(rel_id) else {
                log::warn!("Section references unknown relationship {rel_id}");
                return None;
            };
            let path = resolve_target(DOCUMENT_PART, &rel.target);
            match self.parse_story_part(&path, root_name) {
                Ok(body) => Some(body),
                Err(e) => {
                    log::warn!("Skipping {path}: {e}");
                    None
                }
            }
        };
        let mut headers = BTreeMap::new();
        for r in &sect.header_refs {
            if let Some(body) = load(&r.rel_id, "hdr") {
                headers.insert(r.rel_id.clone(), body);
            }
        }
        let mut footers = BTreeMap::new();
        for r in &sect.footer_refs {
            if let Some(body) = load(&r.rel_id, "ftr") {
                footers.insert(r.rel_id.clone(), body);
            }
        }
        (headers, footers)
    }

    /// Footnotes or endnotes by id, in id order.
    pub fn parse_notes(&self, kind: NoteKind) -> Result<BTreeMap<String, Note>> {
        let part_path = kind.part_path();
        let xml_content = self
            .package
            .get_xml_content(part_path)
            .ok_or_else(|| Error::MissingPart(part_path.to_string()))?;
        let xml = roxmltree::Document::parse(&xml_content)?;
        let root = xml.root_element();
        let expected = match kind {
            NoteKind::Footnote => "footnotes",
            NoteKind::Endnote => "endnotes",
        };
        if local(root) != expected {
            return Err(Error::UnexpectedElement {
                expected: expected.to_string(),
                found: local(root).to_string(),
            });
        }
        let ctx = PartContext::new(part_path, self.package.part_relationships(part_path));
        let mut notes = BTreeMap::new();
        for node in root
            .children()
            .filter(|n| local(*n) == kind.element_name())
        {
            let Some(id) = attr(node, "id") else {
                continue;
            };
            let mut body = Body::new();
            self.parse_block_children(&ctx, node, &mut body);
            notes.insert(
                id.to_string(),
                Note {
                    id: id.to_string(),
                    note_type: attr(node, "type").map(String::from),
                    body,
                },
            );
        }
        Ok(notes)
    }

    /// Main body plus every header, footer and note the package carries.
    pub fn parse_document(&self) -> Result<Document> {
        let t0 = Instant::now();
        let body = self.parse_body()?;

        let mut sections: Vec<&SectionProperties> = body
            .paragraphs()
            .filter_map(|p| p.section_properties.as_deref())
            .collect();
        sections.extend(body.section_properties.as_ref());

        let mut headers = BTreeMap::new();
        let mut footers = BTreeMap::new();
        for sect in sections {
            let (h, f) = self.parse_section_headers_footers(sect);
            headers.extend(h);
            footers.extend(f);
        }

        let load_notes = |kind: NoteKind| {
            if self.package.get_xml_content(kind.part_path()).is_none() {
                return BTreeMap::new();
            }
            self.parse_notes(kind).unwrap_or_else(|e| {
                log::warn!("Skipping {}: {e}", kind.part_path());
                BTreeMap::new()
            })
        };
        let footnotes = load_notes(NoteKind::Footnote);
        let endnotes = load_notes(NoteKind::Endnote);

        log::info!(
            "Parsed document: {} headers, {} footers, {} footnotes, {} endnotes in {:.1}ms",
            headers.len(),
            footers.len(),
            footnotes.len(),
            endnotes.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Ok(Document {
            body,
            headers,
            footers,
            footnotes,
            endnotes,
        })
    }

    /// Fetch an image's bytes and detect its format and pixel size.
    pub fn load_image(&self, image: &Image) -> Result<ImageData> {
        let path = match &image.source {
            ImageSource::Resolved {
                path,
                external: false,
            } => path,
            ImageSource::Resolved {
                path,
                external: true,
            } => {
                return Err(Error::InvalidDocx(format!(
                    "image {path} is linked, not embedded"
                )));
            }
            ImageSource::Unresolved(reason) => {
                return Err(Error::MissingPart(format!("image: {reason}")));
            }
        };
        let bytes = self
            .package
            .get_binary_content(path)
            .ok_or_else(|| Error::MissingPart(path.clone()))?;
        let reader = image::ImageReader::new(std::io::Cursor::new(&bytes)).with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| Error::InvalidDocx(format!("unrecognized image format in {path}")))?;
        let (pixel_width, pixel_height) = reader.into_dimensions()?;
        Ok(ImageData {
            bytes,
            format,
            pixel_width,
            pixel_height,
        })
    }

    /// Dispatch one element through the registry. Unknown tags yield
    /// nothing; a failing routine is logged and yields nothing.
    pub(crate) fn parse_element(&self, ctx: &PartContext, node: Node) -> Vec<Model> {
        let tag = local(node);
        let Some(kind) = ElementKind::from_tag(tag) else {
            log::debug!("Skipping unsupported element <{tag}>");
            return Vec::new();
        };
        let parsed: Result<Vec<Model>> = match kind {
            ElementKind::Paragraph => self
                .parse_paragraph(ctx, node)
                .map(|p| vec![Model::Paragraph(p)]),
            ElementKind::Run => self
                .parse_run(ctx, node)
                .map(|runs| runs.into_iter().map(Model::Run).collect()),
            ElementKind::Table => self.parse_table(ctx, node).map(|t| vec![Model::Table(t)]),
            ElementKind::TableRow => self
                .parse_row(ctx, node, &[])
                .map(|r| vec![Model::TableRow(r)]),
            ElementKind::TableCell => self
                .parse_cell(ctx, node, &[], 0)
                .map(|c| vec![Model::TableCell(c)]),
            ElementKind::Drawing => self
                .parse_drawing(ctx, node)
                .map(|d| d.map(runs::DrawingContent::into_model).into_iter().collect()),
            ElementKind::SimpleField => Ok(vec![Model::Field(fields::parse_simple_field(
                node,
                self.options.keep_raw_xml,
            ))]),
            ElementKind::Hyperlink => {
                let scan = fields::scan_paragraph(node, self.options.keep_raw_xml);
                self.parse_hyperlink(ctx, node, &scan)
                    .map(|h| vec![Model::Hyperlink(h)])
            }
            ElementKind::TextBoxContent => self
                .parse_textbox_content(ctx, node, None)
                .map(|tb| vec![Model::TextBox(tb)]),
        };
        match parsed {
            Ok(models) => models,
            Err(e) => {
                log::warn!("Dropping <{tag}>: {e}");
                Vec::new()
            }
        }
    }

    /// Parse the block-level children of `parent` into `target`. Bookmarks
    /// between blocks attach to the next paragraph.
    pub(crate) fn parse_block_children(&self, ctx: &PartContext, parent: Node, target: &mut Body) {
        let mut pending_bookmarks: Vec<Bookmark> = Vec::new();
        for node in collect_block_nodes(parent) {
            match local(node) {
                "sectPr" => {
                    target.section_properties = Some(section::parse_section_properties(
                        node,
                        self.options.keep_raw_xml,
                    ));
                    continue;
                }
                "bookmarkStart" | "bookmarkEnd" => {
                    pending_bookmarks.extend(parse_bookmark(node));
                    continue;
                }
                "pPr" | "tblPr" | "tblGrid" | "trPr" | "tcPr" | "proofErr" | "permStart"
                | "permEnd" | "commentRangeStart" | "commentRangeEnd" => continue,
                _ => {}
            }
            for mut model in self.parse_element(ctx, node) {
                if let Model::Paragraph(p) = &mut model {
                    if !pending_bookmarks.is_empty() {
                        let mut bookmarks = std::mem::take(&mut pending_bookmarks);
                        bookmarks.append(&mut p.bookmarks);
                        p.bookmarks = bookmarks;
                    }
                }
                target.add_model(model);
            }
        }
        if !pending_bookmarks.is_empty() {
            log::debug!(
                "Dropping {} bookmark(s) with no following paragraph",
                pending_bookmarks.len()
            );
        }
    }

    fn parse_paragraph(&self, ctx: &PartContext, node: Node) -> Result<Paragraph> {
        let mut para = Paragraph::new();
        let ppr = child(node, "pPr");
        let (inline, numbering) = match ppr {
            Some(ppr) => parse_paragraph_properties(ppr)?,
            None => (ParagraphStyle::default(), None),
        };
        let p_style = inline.style_id.as_deref();
        para.style = self.styles.resolve_paragraph_style(p_style, &inline);
        para.numbering = numbering
            .or_else(|| p_style.and_then(|id| self.styles.style_numbering(id)).cloned());

        if let Some(ppr) = ppr {
            if let Some(rpr) = child(ppr, "rPr") {
                para.mark_style = parse_run_properties(rpr, self.styles.theme());
            }
            if let Some(sect) = child(ppr, "sectPr") {
                para.section_properties = Some(Box::new(section::parse_section_properties(
                    sect,
                    self.options.keep_raw_xml,
                )));
            }
        }

        let scan = fields::scan_paragraph(node, self.options.keep_raw_xml);
        self.parse_inline_nodes(ctx, &collect_inline_nodes(node), &scan, &mut para);
        Ok(para)
    }

    fn parse_inline_nodes(
        &self,
        ctx: &PartContext,
        nodes: &[Node],
        scan: &FieldScan,
        para: &mut Paragraph,
    ) {
        for &node in nodes {
            match local(node) {
                "r" => para.runs.extend(self.parse_run_node(ctx, node, scan, None)),
                "hyperlink" => match self.parse_hyperlink(ctx, node, scan) {
                    Ok(link) => {
                        para.runs.extend(link.runs.iter().cloned());
                        para.children.push(Model::Hyperlink(link));
                    }
                    Err(e) => log::warn!("Dropping <hyperlink>: {e}"),
                },
                "fldSimple" => para.runs.push(self.simple_field_run(node, None)),
                "bookmarkStart" | "bookmarkEnd" => para.bookmarks.extend(parse_bookmark(node)),
                "AlternateContent" => {
                    if let Some(chosen) = runs::choose_alternate(node) {
                        let inner = collect_inline_nodes(chosen);
                        self.parse_inline_nodes(ctx, &inner, scan, para);
                    }
                }
                "proofErr" | "permStart" | "permEnd" | "commentRangeStart" | "commentRangeEnd"
                | "lastRenderedPageBreak" => {}
                other => log::debug!("Skipping unsupported inline element <{other}>"),
            }
        }
    }

    /// A run as seen from a paragraph: field anchors become empty runs
    /// carrying their fields, other runs inside field spans are dropped.
    fn parse_run_node(
        &self,
        ctx: &PartContext,
        node: Node,
        scan: &FieldScan,
        link: Option<&HyperlinkRef>,
    ) -> Vec<Run> {
        if let Some(fields) = scan.fields_at(node) {
            let mut run = Run::with_style("", self.run_style(node));
            run.children = fields.iter().cloned().map(Model::Field).collect();
            run.hyperlink = link.cloned();
            return vec![run];
        }
        if scan.is_processed(node) {
            return Vec::new();
        }
        match self.parse_run(ctx, node) {
            Ok(mut runs) => {
                for run in &mut runs {
                    run.hyperlink = link.cloned();
                }
                runs
            }
            Err(e) => {
                log::warn!("Dropping <r>: {e}");
                Vec::new()
            }
        }
    }

    fn simple_field_run(&self, node: Node, link: Option<&HyperlinkRef>) -> Run {
        let field = fields::parse_simple_field(node, self.options.keep_raw_xml);
        let style = child(node, "r")
            .map(|r| self.run_style(r))
            .unwrap_or_default();
        let mut run = Run::with_style("", style);
        run.children.push(Model::Field(field));
        run.hyperlink = link.cloned();
        run
    }

    /// Resolved character formatting of a `w:r`.
    pub(crate) fn run_style(&self, run: Node) -> RunStyle {
        let inline = child(run, "rPr")
            .map(|rpr| parse_run_properties(rpr, self.styles.theme()))
            .unwrap_or_default();
        self.styles
            .resolve_run_style(inline.style_id.as_deref(), &inline)
    }

    fn parse_hyperlink(&self, ctx: &PartContext, node: Node, scan: &FieldScan) -> Result<Hyperlink> {
        let rel_id = rel_attr(node, "id").map(String::from);
        let target = rel_id
            .as_deref()
            .and_then(|id| ctx.rels.get(id))
            .map(|rel| rel.target.clone());
        if rel_id.is_some() && target.is_none() {
            log::debug!("Hyperlink relationship {rel_id:?} not found in {}", ctx.part_path);
        }
        let link_ref = HyperlinkRef {
            rel_id: rel_id.clone(),
            anchor: attr(node, "anchor").map(String::from),
            target: target.clone(),
        };
        let mut link_runs = Vec::new();
        for n in collect_inline_nodes(node) {
            match local(n) {
                "r" => link_runs.extend(self.parse_run_node(ctx, n, scan, Some(&link_ref))),
                "fldSimple" => link_runs.push(self.simple_field_run(n, Some(&link_ref))),
                _ => {}
            }
        }
        Ok(Hyperlink {
            rel_id,
            anchor: link_ref.anchor.clone(),
            target,
            tooltip: attr(node, "tooltip").map(String::from),
            runs: link_runs,
        })
    }
}

fn parse_bookmark(node: Node) -> Option<Bookmark> {
    let kind = match local(node) {
        "bookmarkStart" => BookmarkKind::Start,
        "bookmarkEnd" => BookmarkKind::End,
        _ => return None,
    };
    Some(Bookmark {
        kind,
        name: attr(node, "name").map(String::from),
        id: attr(node, "id")?.to_string(),
    })
}

/// Run the formatter over every list paragraph in document order. Tables
/// and text boxes are visited where they occur.
fn apply_list_markers(body: &mut Body, formatter: &mut NumberingFormatter) {
    for model in body.children_mut() {
        match model {
            Model::Paragraph(p) => {
                let list_level = p
                    .numbering
                    .as_ref()
                    .filter(|n| !n.is_removal())
                    .and_then(|n| n.level_index().map(|level| (n, level)));
                if let Some((numbering, level)) = list_level {
                    p.marker = formatter.format(&numbering.id, level);
                }
                for run in &mut p.runs {
                    for child in &mut run.children {
                        if let Model::TextBox(tb) = child {
                            apply_list_markers(&mut tb.content, formatter);
                        }
                    }
                }
            }
            Model::Table(t) => {
                for row in &mut t.rows {
                    for cell in &mut row.cells {
                        apply_list_markers(&mut cell.content, formatter);
                    }
                }
            }
            Model::TextBox(tb) => apply_list_markers(&mut tb.content, formatter),
            _ => {}
        }
    }
}
