//! Model → WordprocessingML.
//!
//! Paragraph and run formatting is written from the model (a subset of
//! `pPr`/`rPr`); constructs the model only partly interprets (tables,
//! drawings, VML, section properties) are written back from their
//! `raw_xml` when it was kept.

use std::fmt::Write;

use crate::model::{
    Body, BookmarkKind, BreakType, Field, FieldKind, HyperlinkRef, Model, Paragraph, Run,
    RunStyle, Space, Table, TableCell, VertAlign, Width,
};

const NAMESPACES: &[(&str, &str)] = &[
    ("w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main"),
    ("r", "http://schemas.openxmlformats.org/officeDocument/2006/relationships"),
    ("wp", "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"),
    ("a", "http://schemas.openxmlformats.org/drawingml/2006/main"),
    ("pic", "http://schemas.openxmlformats.org/drawingml/2006/picture"),
    ("c", "http://schemas.openxmlformats.org/drawingml/2006/chart"),
    ("wps", "http://schemas.microsoft.com/office/word/2010/wordprocessingShape"),
    ("wpg", "http://schemas.microsoft.com/office/word/2010/wordprocessingGroup"),
    ("wp14", "http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing"),
    ("w14", "http://schemas.microsoft.com/office/word/2010/wordml"),
    ("w15", "http://schemas.microsoft.com/office/word/2012/wordml"),
    ("mc", "http://schemas.openxmlformats.org/markup-compatibility/2006"),
    ("v", "urn:schemas-microsoft-com:vml"),
    ("o", "urn:schemas-microsoft-com:office:office"),
    ("w10", "urn:schemas-microsoft-com:office:word"),
    ("m", "http://schemas.openxmlformats.org/officeDocument/2006/math"),
];

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// A complete `word/document.xml` for `body`.
pub fn document_xml(body: &Body) -> String {
    let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push_str("\n<w:document");
    for (prefix, uri) in NAMESPACES {
        let _ = write!(out, r#" xmlns:{prefix}="{uri}""#);
    }
    out.push_str(r#" mc:Ignorable="w14 w15 wp14"><w:body>"#);
    out.push_str(&body_to_xml(body));
    out.push_str("</w:body></w:document>");
    out
}

/// Block content of `body`, without a wrapping element. The body's own
/// section properties come last.
pub fn body_to_xml(body: &Body) -> String {
    let mut out = String::new();
    write_blocks(&mut out, body);
    if let Some(raw) = body
        .section_properties
        .as_ref()
        .and_then(|s| s.raw_xml.as_deref())
    {
        out.push_str(raw);
    }
    out
}

fn write_blocks(out: &mut String, body: &Body) {
    for model in body {
        match model {
            Model::Paragraph(p) => write_paragraph(out, p),
            Model::Table(t) => write_table(out, t),
            Model::TextBox(tb) => match &tb.raw_xml {
                Some(raw) => {
                    out.push_str("<w:p><w:r>");
                    out.push_str(raw);
                    out.push_str("</w:r></w:p>");
                }
                None => write_blocks(out, &tb.content),
            },
            Model::Image(img) => {
                if let Some(raw) = &img.raw_xml {
                    out.push_str("<w:p><w:r>");
                    out.push_str(raw);
                    out.push_str("</w:r></w:p>");
                }
            }
            other => log::debug!("Not writing block-level {:?}", other.kind()),
        }
    }
}

fn write_paragraph(out: &mut String, p: &Paragraph) {
    out.push_str("<w:p>");
    let mut ppr = String::new();
    if let Some(id) = &p.style.style_id {
        let _ = write!(ppr, r#"<w:pStyle w:val="{}"/>"#, escape_xml(id));
    }
    if let Some(n) = &p.numbering {
        let _ = write!(
            ppr,
            r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
            escape_xml(&n.level),
            escape_xml(&n.id)
        );
    }
    if let Some(jc) = p.style.alignment {
        let _ = write!(ppr, r#"<w:jc w:val="{}"/>"#, jc.as_val());
    }
    if let Some(raw) = p
        .section_properties
        .as_ref()
        .and_then(|s| s.raw_xml.as_deref())
    {
        ppr.push_str(raw);
    }
    if !ppr.is_empty() {
        out.push_str("<w:pPr>");
        out.push_str(&ppr);
        out.push_str("</w:pPr>");
    }

    for b in p.bookmarks.iter().filter(|b| b.kind == BookmarkKind::Start) {
        let _ = write!(
            out,
            r#"<w:bookmarkStart w:id="{}" w:name="{}"/>"#,
            escape_xml(&b.id),
            escape_xml(b.name.as_deref().unwrap_or(""))
        );
    }

    let mut i = 0;
    while i < p.runs.len() {
        match &p.runs[i].hyperlink {
            Some(link) => {
                let end = p.runs[i..]
                    .iter()
                    .position(|r| r.hyperlink.as_ref() != Some(link))
                    .map_or(p.runs.len(), |n| i + n);
                write_hyperlink(out, link, &p.runs[i..end]);
                i = end;
            }
            None => {
                write_run(out, &p.runs[i]);
                i += 1;
            }
        }
    }

    for b in p.bookmarks.iter().filter(|b| b.kind == BookmarkKind::End) {
        let _ = write!(out, r#"<w:bookmarkEnd w:id="{}"/>"#, escape_xml(&b.id));
    }
    out.push_str("</w:p>");
}

fn write_hyperlink(out: &mut String, link: &HyperlinkRef, runs: &[Run]) {
    out.push_str("<w:hyperlink");
    if let Some(id) = &link.rel_id {
        let _ = write!(out, r#" r:id="{}""#, escape_xml(id));
    }
    if let Some(anchor) = &link.anchor {
        let _ = write!(out, r#" w:anchor="{}""#, escape_xml(anchor));
    }
    out.push('>');
    for run in runs {
        write_run(out, run);
    }
    out.push_str("</w:hyperlink>");
}

fn run_properties(style: &RunStyle) -> String {
    let mut rpr = String::new();
    if let Some(id) = &style.style_id {
        let _ = write!(rpr, r#"<w:rStyle w:val="{}"/>"#, escape_xml(id));
    }
    if let Some(font) = &style.font_name {
        let font = escape_xml(font);
        let _ = write!(rpr, r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}"/>"#);
    }
    let toggles = [
        ("b", style.bold),
        ("i", style.italic),
        ("caps", style.caps),
        ("smallCaps", style.small_caps),
        ("strike", style.strike),
        ("dstrike", style.double_strike),
        ("vanish", style.vanish),
    ];
    for (name, value) in toggles {
        match value {
            Some(true) => {
                let _ = write!(rpr, "<w:{name}/>");
            }
            Some(false) => {
                let _ = write!(rpr, r#"<w:{name} w:val="0"/>"#);
            }
            None => {}
        }
    }
    if let Some(hex) = style.color.as_ref().and_then(|c| c.rgb.as_deref()) {
        let _ = write!(rpr, r#"<w:color w:val="{hex}"/>"#);
    }
    if let Some(size) = style.font_size {
        let _ = write!(rpr, r#"<w:sz w:val="{}"/>"#, (size * 2.0).round() as i64);
    }
    if let Some(h) = &style.highlight {
        let _ = write!(rpr, r#"<w:highlight w:val="{}"/>"#, escape_xml(h));
    }
    if let Some(u) = &style.underline {
        let _ = write!(rpr, r#"<w:u w:val="{}"/>"#, escape_xml(u));
    }
    if let Some(va) = style.vertical_align {
        let v = match va {
            VertAlign::Baseline => "baseline",
            VertAlign::Superscript => "superscript",
            VertAlign::Subscript => "subscript",
        };
        let _ = write!(rpr, r#"<w:vertAlign w:val="{v}"/>"#);
    }
    rpr
}

fn write_run(out: &mut String, run: &Run) {
    // Runs keep their source only for drawings, VML, symbols and
    // alternate content, including charts and shapes the model skips.
    if let Some(raw) = &run.raw_xml {
        out.push_str(raw);
        return;
    }

    let rpr = run_properties(&run.style);
    let open = |out: &mut String| {
        out.push_str("<w:r>");
        if !rpr.is_empty() {
            let _ = write!(out, "<w:rPr>{rpr}</w:rPr>");
        }
    };

    for field in run.fields() {
        write_field(out, field, &open);
    }

    if run.has_note_refs() || run.is_note_mark || !run.text.is_empty() || run.break_type.is_some()
    {
        open(out);
        for id in &run.footnote_refs {
            let _ = write!(out, r#"<w:footnoteReference w:id="{}"/>"#, escape_xml(id));
        }
        for id in &run.endnote_refs {
            let _ = write!(out, r#"<w:endnoteReference w:id="{}"/>"#, escape_xml(id));
        }
        if run.is_note_mark {
            out.push_str("<w:footnoteRef/>");
        }
        write_text(out, &run.text, run.space);
        match run.break_type {
            Some(BreakType::Page) => out.push_str(r#"<w:br w:type="page"/>"#),
            Some(BreakType::Column) => out.push_str(r#"<w:br w:type="column"/>"#),
            _ => {}
        }
        out.push_str("</w:r>");
    }
}

/// Text with `\t`/`\n` written as `w:tab`/`w:br`.
fn write_text(out: &mut String, text: &str, space: Space) {
    let mut segment = String::new();
    let flush = |out: &mut String, segment: &mut String| {
        if segment.is_empty() {
            return;
        }
        let preserve = space == Space::Preserve
            || segment.starts_with(char::is_whitespace)
            || segment.ends_with(char::is_whitespace);
        if preserve {
            let _ = write!(out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(segment));
        } else {
            let _ = write!(out, "<w:t>{}</w:t>", escape_xml(segment));
        }
        segment.clear();
    };
    for c in text.chars() {
        match c {
            '\t' => {
                flush(out, &mut segment);
                out.push_str("<w:tab/>");
            }
            '\n' => {
                flush(out, &mut segment);
                out.push_str("<w:br/>");
            }
            _ => segment.push(c),
        }
    }
    flush(out, &mut segment);
}

fn write_field(out: &mut String, field: &Field, open: &dyn Fn(&mut String)) {
    match field.kind {
        FieldKind::Simple => {
            let _ = write!(
                out,
                r#"<w:fldSimple w:instr="{}"/>"#,
                escape_xml(&field.instruction)
            );
        }
        FieldKind::Complex => {
            let fld_char = |out: &mut String, kind: &str| {
                open(out);
                let _ = write!(out, r#"<w:fldChar w:fldCharType="{kind}"/></w:r>"#);
            };
            fld_char(out, "begin");
            open(out);
            let _ = write!(
                out,
                r#"<w:instrText xml:space="preserve"> {} </w:instrText></w:r>"#,
                escape_xml(&field.instruction)
            );
            for nested in &field.nested {
                write_field(out, nested, open);
            }
            fld_char(out, "separate");
            fld_char(out, "end");
        }
    }
}

fn write_table(out: &mut String, table: &Table) {
    if let Some(raw) = &table.raw_xml {
        out.push_str(raw);
        return;
    }
    out.push_str("<w:tbl>");
    if let Some(id) = &table.properties.style_id {
        let _ = write!(out, r#"<w:tblPr><w:tblStyle w:val="{}"/></w:tblPr>"#, escape_xml(id));
    }
    out.push_str("<w:tblGrid>");
    for w in &table.grid {
        let _ = write!(out, r#"<w:gridCol w:w="{}"/>"#, (w * 20.0).round() as i64);
    }
    out.push_str("</w:tblGrid>");
    for row in &table.rows {
        out.push_str("<w:tr>");
        for cell in &row.cells {
            write_cell(out, cell);
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
}

fn write_cell(out: &mut String, cell: &TableCell) {
    out.push_str("<w:tc><w:tcPr>");
    if let Some(Width::Points(w)) = cell.width {
        let _ = write!(out, r#"<w:tcW w:w="{}" w:type="dxa"/>"#, (w * 20.0).round() as i64);
    }
    if cell.grid_span > 1 {
        let _ = write!(out, r#"<w:gridSpan w:val="{}"/>"#, cell.grid_span);
    }
    if let Some(kind) = cell.vertical_merge_type {
        let _ = write!(out, r#"<w:vMerge w:val="{}"/>"#, kind.as_val());
    }
    out.push_str("</w:tcPr>");
    let before = out.len();
    write_blocks(out, &cell.content);
    // A cell must end in a paragraph.
    if out.len() == before || !out.ends_with("</w:p>") {
        out.push_str("<w:p/>");
    }
    out.push_str("</w:tc>");
}
