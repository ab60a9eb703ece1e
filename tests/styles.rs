mod common;

use common::{first_table, paragraphs, parse_package, part};
use docxide_model::docx::StyleKind;
use docxide_model::model::Alignment;
use docxide_model::{MemoryPackage, StyleManager};

const STYLES: &str = r#"
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:sz w:val="24"/></w:rPr></w:rPrDefault>
    <w:pPrDefault><w:pPr><w:spacing w:after="200"/></w:pPr></w:pPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr>
    <w:rPr><w:sz w:val="22"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:keepNext/><w:spacing w:before="240"/><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:rFonts w:asciiTheme="majorHAnsi" w:eastAsiaTheme="majorEastAsia"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Sub">
    <w:name w:val="Sub heading"/>
    <w:basedOn w:val="Heading1"/>
    <w:pPr><w:outlineLvl w:val="2"/></w:pPr>
  </w:style>
  <w:style w:type="character" w:styleId="Emphasis">
    <w:name w:val="Emphasis"/>
    <w:rPr><w:i/><w:color w:val="0000FF"/></w:rPr>
  </w:style>
  <w:style w:type="table" w:styleId="Grid">
    <w:name w:val="Table Grid"/>
    <w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:color="000000"/></w:tblBorders></w:tblPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="LoopA"><w:basedOn w:val="LoopB"/><w:rPr><w:i/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="LoopB"><w:basedOn w:val="LoopA"/><w:rPr><w:b/></w:rPr></w:style>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office">
  <a:themeElements><a:fontScheme name="Office">
    <a:majorFont><a:latin typeface="Cambria"/><a:ea typeface="MS Mincho"/></a:majorFont>
    <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/></a:minorFont>
  </a:fontScheme></a:themeElements>
</a:theme>"#;

fn manager() -> StyleManager {
    StyleManager::parse(Some(part("styles", STYLES).as_str()), Some(THEME)).unwrap()
}

#[test]
fn based_on_chain_is_folded_in() {
    let styles = manager();
    assert_eq!(styles.len(), 7);

    let sub = styles.get("Sub").unwrap();
    assert_eq!(sub.kind, StyleKind::Paragraph);
    assert_eq!(sub.based_on.as_deref(), Some("Heading1"));
    assert_eq!(sub.paragraph.style_id.as_deref(), Some("Sub"));
    assert_eq!(sub.paragraph.spacing.after, Some(8.0));
    assert_eq!(sub.paragraph.spacing.before, Some(12.0));
    assert_eq!(sub.paragraph.keep_next, Some(true));
    assert_eq!(sub.paragraph.outline_level, Some(2));
    assert_eq!(sub.run.bold, Some(true));
    assert_eq!(sub.run.font_size, Some(11.0));
    assert_eq!(sub.run.style_id, None);

    // Cycles are cut instead of looping.
    let a = styles.get("LoopA").unwrap();
    assert_eq!(a.run.italic, Some(true));
    assert_eq!(a.run.bold, Some(true));
}

#[test]
fn heading_levels_from_name_or_outline() {
    let styles = manager();
    assert_eq!(styles.heading_level("Heading1"), Some(1));
    assert_eq!(styles.heading_level("Sub"), Some(3));
    assert_eq!(styles.heading_level("Normal"), None);
    assert_eq!(styles.heading_level("Missing"), None);
}

#[test]
fn defaults_and_lookups_by_kind() {
    let styles = manager();
    assert_eq!(styles.document_run_defaults().font_size, Some(12.0));
    assert_eq!(styles.document_paragraph_defaults().spacing.after, Some(10.0));
    assert_eq!(styles.default_paragraph_style().unwrap().id, "Normal");
    assert!(styles.character_style("Emphasis").is_some());
    assert!(styles.character_style("Normal").is_none());
    assert!(styles.paragraph_style("Emphasis").is_none());
    assert!(styles.get("Grid").unwrap().table_borders.is_some());
}

#[test]
fn theme_fonts_resolve() {
    let styles = manager();
    let theme = styles.theme();
    assert_eq!(theme.resolve("majorHAnsi"), Some("Cambria"));
    assert_eq!(theme.resolve("minorAscii"), Some("Calibri"));
    assert_eq!(theme.resolve("majorEastAsia"), Some("MS Mincho"));
    assert_eq!(theme.resolve("minorEastAsia"), Some("Calibri"));
    assert_eq!(theme.resolve("somethingElse"), None);

    let heading = styles.get("Heading1").unwrap();
    assert_eq!(heading.run.font_name.as_deref(), Some("Cambria"));
    assert_eq!(heading.run.font_east_asia.as_deref(), Some("MS Mincho"));

    let without_theme = StyleManager::parse(Some(part("styles", STYLES).as_str()), None).unwrap();
    assert_eq!(
        without_theme.get("Heading1").unwrap().run.font_name.as_deref(),
        Some("Aptos Display")
    );
}

fn styled_package(body: &str) -> MemoryPackage {
    MemoryPackage::new()
        .with_part("word/document.xml", common::document(body))
        .with_part("word/styles.xml", part("styles", STYLES))
        .with_part("word/theme/theme1.xml", THEME)
}

#[test]
fn paragraphs_and_runs_resolve_against_styles() {
    let body = parse_package(&styled_package(
        r#"<w:p><w:r><w:t>plain</w:t></w:r></w:p>
           <w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr>
             <w:r><w:rPr><w:rStyle w:val="Emphasis"/><w:b/><w:rFonts w:asciiTheme="minorHAnsi"/></w:rPr><w:t>title</w:t></w:r>
           </w:p>
           <w:p><w:pPr><w:pStyle w:val="Unknown"/></w:pPr><w:r><w:t>orphan</w:t></w:r></w:p>"#,
    ));
    let ps = paragraphs(&body);

    assert_eq!(ps[0].style.style_id, None);
    assert_eq!(ps[0].style.spacing.after, Some(8.0));

    let heading = ps[1];
    assert_eq!(heading.style.style_id.as_deref(), Some("Heading1"));
    assert_eq!(heading.style.alignment, Some(Alignment::Center));
    assert_eq!(heading.style.keep_next, Some(true));
    let run = &heading.runs[0].style;
    assert_eq!(run.style_id.as_deref(), Some("Emphasis"));
    assert_eq!(run.italic, Some(true));
    assert_eq!(run.bold, Some(true));
    assert_eq!(run.color.as_ref().unwrap().rgb.as_deref(), Some("0000FF"));
    assert_eq!(run.font_name.as_deref(), Some("Calibri"));

    assert_eq!(ps[2].style.style_id.as_deref(), Some("Unknown"));
    assert_eq!(ps[2].style.spacing.after, None);
}

#[test]
fn table_borders_fall_back_to_table_style() {
    let body = parse_package(&styled_package(
        r#"<w:tbl><w:tblPr><w:tblStyle w:val="Grid"/></w:tblPr><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>"#,
    ));
    let table = first_table(&body);
    let top = table.properties.borders.as_ref().unwrap().top.as_ref().unwrap();
    assert_eq!(top.style, "single");
    assert_eq!(top.width_pt, 0.5);
}

#[test]
fn broken_styles_part_is_ignored() {
    let pkg = MemoryPackage::new()
        .with_part(
            "word/document.xml",
            common::document(
                r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>still parsed</w:t></w:r></w:p>"#,
            ),
        )
        .with_part("word/styles.xml", "<w:styles");
    let body = parse_package(&pkg);
    let p = paragraphs(&body)[0];
    assert_eq!(p.get_text(), "still parsed");
    assert_eq!(p.style.keep_next, None);
}
