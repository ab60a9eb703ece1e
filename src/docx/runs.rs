//! `w:r` content: text, breaks, note references, DrawingML and VML objects.

use roxmltree::Node;

use super::xml::{
    OFFICE_NS, VML_NS, attr, attr_flag, child, descendant, local, parse_structural, raw_xml,
    rel_attr, xml_space,
};
use super::{PartContext, XmlParser};
use crate::error::Result;
use crate::model::{
    AnchorType, AxisPosition, Body, BreakType, DrawingAnchor, Image, ImageSource, Model, NoteKind,
    Run, RunStyle, Space, Symbol, TextBox, TextBoxKind, UnresolvedReason, Watermark,
    EMU_PER_POINT,
};

/// What a `w:drawing` (or VML object) turned out to hold.
#[derive(Debug)]
pub(crate) enum DrawingContent {
    Image(Image),
    TextBox(TextBox),
}

impl DrawingContent {
    pub(crate) fn into_model(self) -> Model {
        match self {
            DrawingContent::Image(img) => Model::Image(img),
            DrawingContent::TextBox(tb) => Model::TextBox(tb),
        }
    }
}

/// `mc:AlternateContent`: the first `mc:Choice`, else `mc:Fallback`.
pub(crate) fn choose_alternate<'a>(node: Node<'a, 'a>) -> Option<Node<'a, 'a>> {
    child(node, "Choice").or_else(|| child(node, "Fallback"))
}

#[derive(Default)]
struct RunParts {
    text: String,
    preserve: bool,
    has_break: bool,
    has_tab: bool,
    has_drawing: bool,
    break_type: Option<BreakType>,
    notes: Vec<(NoteKind, String)>,
    is_note_mark: bool,
    textbox: Option<TextBox>,
    image: Option<Image>,
    watermark: Option<Watermark>,
    symbol: Option<Symbol>,
    /// Content that the model only partly interprets; keep the source.
    keeps_raw: bool,
}

impl RunParts {
    fn absorb_drawing(&mut self, content: DrawingContent) {
        match content {
            DrawingContent::Image(img) => self.image = Some(img),
            DrawingContent::TextBox(tb) => self.textbox = Some(tb),
        }
    }

    fn has_object(&self) -> bool {
        self.textbox.is_some() || self.image.is_some()
    }
}

impl XmlParser<'_> {
    /// Parse one `w:r`. Usually yields a single run; a run holding
    /// footnote/endnote references yields one run per reference followed
    /// by a run for any remaining content.
    pub(crate) fn parse_run(&self, ctx: &PartContext, node: Node) -> Result<Vec<Run>> {
        let style = self.run_style(node);
        let mut parts = RunParts {
            preserve: xml_space(node) == Some("preserve"),
            ..Default::default()
        };
        for c in node.children().filter(|n| n.is_element()) {
            self.absorb_run_child(ctx, c, &mut parts)?;
        }
        if parts.watermark.is_some() && self.options.skip_watermarks {
            log::debug!("Skipping watermark run");
            return Ok(Vec::new());
        }
        Ok(self.finish_run(node, style, parts))
    }

    fn absorb_run_child(&self, ctx: &PartContext, node: Node, parts: &mut RunParts) -> Result<()> {
        match local(node) {
            "t" => {
                if xml_space(node) == Some("preserve") {
                    parts.preserve = true;
                }
                parts.text.push_str(node.text().unwrap_or(""));
            }
            "br" => {
                parts.has_break = true;
                match attr(node, "type") {
                    Some("page") => parts.break_type = Some(BreakType::Page),
                    Some("column") => parts.break_type = Some(BreakType::Column),
                    _ => {
                        parts.break_type = Some(BreakType::TextWrapping);
                        parts.text.push('\n');
                    }
                }
            }
            "cr" => {
                parts.has_break = true;
                parts.break_type = Some(BreakType::Line);
                parts.text.push('\n');
            }
            "tab" | "ptab" => {
                parts.has_tab = true;
                parts.text.push('\t');
            }
            "noBreakHyphen" => parts.text.push('\u{2011}'),
            "softHyphen" => parts.text.push('\u{ad}'),
            "sym" => {
                parts.keeps_raw = true;
                let char_code = attr(node, "char").unwrap_or("").to_string();
                if let Some(c) = u32::from_str_radix(&char_code, 16)
                    .ok()
                    .and_then(char::from_u32)
                {
                    parts.text.push(c);
                }
                parts.symbol = Some(Symbol {
                    font: attr(node, "font").map(String::from),
                    char_code,
                });
            }
            "footnoteReference" | "endnoteReference" => {
                let kind = if local(node) == "footnoteReference" {
                    NoteKind::Footnote
                } else {
                    NoteKind::Endnote
                };
                if let Some(id) = attr(node, "id") {
                    parts.notes.push((kind, id.to_string()));
                }
            }
            "footnoteRef" | "endnoteRef" => parts.is_note_mark = true,
            "drawing" => {
                parts.has_drawing = true;
                parts.keeps_raw = true;
                match self.parse_drawing(ctx, node) {
                    Ok(Some(content)) => parts.absorb_drawing(content),
                    Ok(None) => {}
                    Err(e) => log::warn!("Dropping <drawing>: {e}"),
                }
            }
            "pict" | "object" => {
                parts.keeps_raw = true;
                if let Err(e) = self.parse_vml(ctx, node, parts) {
                    log::warn!("Dropping <{}>: {e}", local(node));
                }
            }
            "AlternateContent" => {
                parts.keeps_raw = true;
                if let Some(choice) = child(node, "Choice") {
                    for c in choice.children().filter(|n| n.is_element()) {
                        self.absorb_run_child(ctx, c, parts)?;
                    }
                }
                if let Some(fallback) = child(node, "Fallback") {
                    if parts.has_object() {
                        log::debug!("Skipping mc:Fallback, mc:Choice already produced content");
                    } else {
                        for c in fallback.children().filter(|n| n.is_element()) {
                            self.absorb_run_child(ctx, c, parts)?;
                        }
                    }
                }
            }
            "rPr" | "fldChar" | "instrText" | "delText" | "lastRenderedPageBreak"
            | "annotationRef" | "commentReference" | "separator" | "continuationSeparator" => {}
            other => log::debug!("Skipping unsupported run element <{other}>"),
        }
        Ok(())
    }

    fn finish_run(&self, node: Node, style: RunStyle, parts: RunParts) -> Vec<Run> {
        let raw = (self.options.keep_raw_xml && parts.keeps_raw).then(|| raw_xml(node));
        let mut run = Run {
            text: parts.text,
            style: style.clone(),
            space: if parts.preserve {
                Space::Preserve
            } else {
                Space::Default
            },
            has_break: parts.has_break,
            has_tab: parts.has_tab,
            has_drawing: parts.has_drawing,
            break_type: parts.break_type,
            is_note_mark: parts.is_note_mark,
            watermark: parts.watermark,
            symbol: parts.symbol,
            raw_xml: raw,
            ..Default::default()
        };

        if let Some(mut tb) = parts.textbox {
            tb.anchor_runs();
            run.anchor = tb.anchor.clone();
            run.textbox = Some(tb.runs());
            run.children.push(Model::TextBox(tb));
        }
        if let Some(img) = parts.image {
            if run.anchor.is_none() {
                run.anchor = img.position.clone();
            }
            run.image = Some(img);
        }

        if parts.notes.is_empty() {
            return vec![run];
        }

        let mut out: Vec<Run> = parts
            .notes
            .into_iter()
            .map(|(kind, id)| {
                let mut note_run = Run::with_style("", style.clone());
                match kind {
                    NoteKind::Footnote => note_run.footnote_refs.push(id),
                    NoteKind::Endnote => note_run.endnote_refs.push(id),
                }
                note_run
            })
            .collect();
        let meaningful = !run.text.trim().is_empty()
            || run.image.is_some()
            || run.textbox.is_some()
            || run.symbol.is_some();
        if meaningful {
            // The source also holds the references the split runs carry.
            run.raw_xml = None;
            out.push(run);
        }
        out
    }

    /// A DrawingML object. Text boxes win over pictures; `None` for
    /// drawings that hold neither (charts, plain shapes).
    pub(crate) fn parse_drawing(
        &self,
        ctx: &PartContext,
        drawing: Node,
    ) -> Result<Option<DrawingContent>> {
        let Some(container) = drawing
            .children()
            .find(|n| matches!(local(*n), "inline" | "anchor"))
        else {
            return Ok(None);
        };
        let anchor = parse_anchor(container)?;
        let raw = self.options.keep_raw_xml.then(|| raw_xml(drawing));

        if let Some(txbx) = find_textbox_content(container) {
            let mut tb = self.parse_textbox_content(ctx, txbx, Some(anchor))?;
            tb.raw_xml = raw;
            return Ok(Some(DrawingContent::TextBox(tb)));
        }

        let Some(blip) = descendant(container, "blip") else {
            return Ok(None);
        };
        let rel_id = rel_attr(blip, "embed").or_else(|| rel_attr(blip, "link"));
        let doc_pr = child(container, "docPr");
        Ok(Some(DrawingContent::Image(Image {
            rel_id: rel_id.map(String::from),
            width: anchor.extent_cx,
            height: anchor.extent_cy,
            anchor_type: anchor.anchor_type,
            name: doc_pr.and_then(|n| attr(n, "name")).map(String::from),
            description: doc_pr.and_then(|n| attr(n, "descr")).map(String::from),
            source: self.resolve_image_source(ctx, rel_id),
            position: Some(anchor),
            raw_xml: raw,
        })))
    }

    /// `w:txbxContent`, from DrawingML (`wps:txbx`) or VML (`v:textbox`).
    pub(crate) fn parse_textbox_content(
        &self,
        ctx: &PartContext,
        node: Node,
        anchor: Option<DrawingAnchor>,
    ) -> Result<TextBox> {
        let kind = if node
            .ancestors()
            .any(|a| a.tag_name().namespace() == Some(VML_NS))
        {
            TextBoxKind::Vml
        } else {
            TextBoxKind::DrawingMl
        };
        let mut content = Body::new();
        self.parse_block_children(ctx, node, &mut content);
        Ok(TextBox {
            content,
            anchor,
            kind,
            raw_xml: self.options.keep_raw_xml.then(|| raw_xml(node)),
        })
    }

    /// VML inside `w:pict`/`w:object`: watermarks, text boxes and pictures.
    fn parse_vml(&self, ctx: &PartContext, pict: Node, parts: &mut RunParts) -> Result<()> {
        let shape = pict.descendants().find(|n| {
            n.tag_name().namespace() == Some(VML_NS)
                && matches!(local(*n), "shape" | "rect" | "roundrect" | "oval")
        });
        let style = shape.and_then(|s| attr(s, "style"));
        let textbox = descendant(pict, "textbox").and_then(|tb| child(tb, "txbxContent"));

        if let Some(shape) = shape {
            let shape_id = attr(shape, "id").or_else(|| shape.attribute((OFFICE_NS, "spid")));
            let named = shape_id
                .is_some_and(|id| id.contains("PowerPlusWaterMarkObject") || id.contains("WaterMark"));
            let absolute = style.is_some_and(|s| {
                s.split(';')
                    .any(|decl| decl.replace(' ', "") == "position:absolute")
            });
            if named || (absolute && textbox.is_none()) {
                parts.watermark = Some(Watermark {
                    shape_id: shape_id.map(String::from),
                    text: descendant(shape, "textpath")
                        .and_then(|t| attr(t, "string"))
                        .map(String::from),
                    style: style.map(String::from),
                });
            }
        }

        let anchor = style.map(vml_anchor);
        if parts.watermark.is_none() {
            if let Some(txbx) = textbox {
                let mut tb = self.parse_textbox_content(ctx, txbx, anchor)?;
                tb.raw_xml = self.options.keep_raw_xml.then(|| raw_xml(pict));
                parts.textbox = Some(tb);
                return Ok(());
            }
        }

        if let Some(imagedata) = descendant(pict, "imagedata") {
            let rel_id = rel_attr(imagedata, "id").or_else(|| rel_attr(imagedata, "pict"));
            let anchor = anchor.unwrap_or_default();
            parts.image = Some(Image {
                rel_id: rel_id.map(String::from),
                width: anchor.extent_cx,
                height: anchor.extent_cy,
                anchor_type: anchor.anchor_type,
                name: attr(imagedata, "title").map(String::from),
                description: None,
                source: self.resolve_image_source(ctx, rel_id),
                position: Some(anchor),
                raw_xml: self.options.keep_raw_xml.then(|| raw_xml(pict)),
            });
        }
        Ok(())
    }

    /// Tie an image relationship id to a package part (or external URL).
    pub(crate) fn resolve_image_source(&self, ctx: &PartContext, rel_id: Option<&str>) -> ImageSource {
        let Some(rel_id) = rel_id else {
            return ImageSource::Unresolved(UnresolvedReason::MissingRelationshipId);
        };
        let Some(rel) = ctx.rels.get(rel_id) else {
            log::debug!("Image relationship {rel_id} not found in {}", ctx.part_path);
            return ImageSource::Unresolved(UnresolvedReason::UnknownRelationship(
                rel_id.to_string(),
            ));
        };
        if rel.kind() != "image" {
            return ImageSource::Unresolved(UnresolvedReason::NotAnImage {
                rel_id: rel_id.to_string(),
                rel_type: rel.rel_type.clone(),
            });
        }
        if rel.target.trim().is_empty() {
            return ImageSource::Unresolved(UnresolvedReason::EmptyTarget(rel_id.to_string()));
        }
        if rel.is_external() {
            return ImageSource::Resolved {
                path: rel.target.clone(),
                external: true,
            };
        }
        ImageSource::Resolved {
            path: crate::package::resolve_target(&ctx.part_path, &rel.target),
            external: false,
        }
    }
}

/// First `w:txbxContent` under a drawing. Inside `mc:AlternateContent` the
/// Choice branch is searched first and Fallback only when Choice has none.
fn find_textbox_content<'a>(node: Node<'a, 'a>) -> Option<Node<'a, 'a>> {
    for c in node.children().filter(|n| n.is_element()) {
        let found = match local(c) {
            "txbxContent" => Some(c),
            "AlternateContent" => child(c, "Choice")
                .and_then(find_textbox_content)
                .or_else(|| {
                    let fallback = child(c, "Fallback").and_then(find_textbox_content);
                    if fallback.is_some() {
                        log::debug!("Using mc:Fallback text box, mc:Choice has none");
                    }
                    fallback
                }),
            _ => find_textbox_content(c),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// `wp:inline`/`wp:anchor` placement.
fn parse_anchor(container: Node) -> Result<DrawingAnchor> {
    let anchor_type = if local(container) == "anchor" {
        AnchorType::Anchor
    } else {
        AnchorType::Inline
    };
    let (extent_cx, extent_cy) = match child(container, "extent") {
        Some(extent) => (
            parse_structural::<i64>(extent, "cx")?.unwrap_or(0),
            parse_structural::<i64>(extent, "cy")?.unwrap_or(0),
        ),
        None => (0, 0),
    };
    let axis = |name: &str| {
        child(container, name).map(|n| AxisPosition {
            relative_from: attr(n, "relativeFrom").map(String::from),
            offset: child(n, "posOffset")
                .and_then(|o| o.text())
                .and_then(|t| t.trim().parse().ok()),
            align: child(n, "align")
                .and_then(|a| a.text())
                .map(|t| t.trim().to_string()),
        })
    };
    Ok(DrawingAnchor {
        anchor_type,
        extent_cx,
        extent_cy,
        position_h: axis("positionH"),
        position_v: axis("positionV"),
        behind_doc: attr_flag(container, "behindDoc").unwrap_or(false),
        wrap: container
            .children()
            .find(|n| n.is_element() && local(*n).starts_with("wrap"))
            .map(|n| local(n).to_string()),
        relative_height: attr(container, "relativeHeight").and_then(|v| v.parse().ok()),
    })
}

/// CSS-like VML length (`72pt`, `1in`, `2.5cm`, `10mm`, `96px`) in EMU.
fn vml_length(value: &str) -> Option<i64> {
    let value = value.trim();
    let split = value
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let n: f64 = number.trim().parse().ok()?;
    let emu_per_unit = match unit {
        "pt" => EMU_PER_POINT as f64,
        "in" => 914_400.0,
        "cm" => 360_000.0,
        "mm" => 36_000.0,
        "px" | "" => 9_525.0,
        _ => return None,
    };
    Some((n * emu_per_unit).round() as i64)
}

/// Placement from a VML `style` attribute.
fn vml_anchor(style: &str) -> DrawingAnchor {
    let mut anchor = DrawingAnchor::default();
    let mut h = AxisPosition::default();
    let mut v = AxisPosition::default();
    for decl in style.split(';') {
        let Some((key, value)) = decl.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "width" => anchor.extent_cx = vml_length(value).unwrap_or(0),
            "height" => anchor.extent_cy = vml_length(value).unwrap_or(0),
            "position" if value == "absolute" => anchor.anchor_type = AnchorType::Anchor,
            "margin-left" | "left" => h.offset = vml_length(value),
            "margin-top" | "top" => v.offset = vml_length(value),
            "mso-position-horizontal" => h.align = Some(value.to_string()),
            "mso-position-vertical" => v.align = Some(value.to_string()),
            "mso-position-horizontal-relative" => h.relative_from = Some(value.to_string()),
            "mso-position-vertical-relative" => v.relative_from = Some(value.to_string()),
            "z-index" => {
                let z: Option<i64> = value.parse().ok();
                anchor.relative_height = z;
                anchor.behind_doc = z.is_some_and(|z| z < 0);
            }
            _ => {}
        }
    }
    if h != AxisPosition::default() {
        anchor.position_h = Some(h);
    }
    if v != AxisPosition::default() {
        anchor.position_v = Some(v);
    }
    anchor
}
