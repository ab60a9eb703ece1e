mod common;

use std::io::{Cursor, Write};

use common::{REL_FOOTER, REL_HEADER, REL_IMAGE, document, part, rels};
use docxide_model::model::{
    HeaderFooterType, ImageSource, NoteKind, Orientation, SectionBreakType,
};
use docxide_model::{Error, MemoryPackage, TextContainer, XmlParser};
use zip::write::{SimpleFileOptions, ZipWriter};

const SECT_PR: &str = r#"<w:sectPr>
  <w:headerReference w:type="default" r:id="rId10"/>
  <w:headerReference w:type="first" r:id="rId12"/>
  <w:footerReference w:type="default" r:id="rId11"/>
  <w:type w:val="continuous"/>
  <w:pgSz w:w="15840" w:h="12240" w:orient="landscape"/>
  <w:pgMar w:top="1440" w:right="720" w:bottom="1440" w:left="720" w:header="708" w:footer="708" w:gutter="0"/>
  <w:pgNumType w:start="3" w:fmt="lowerRoman"/>
  <w:cols w:num="2" w:space="720"/>
  <w:titlePg/>
</w:sectPr>"#;

fn full_package() -> MemoryPackage {
    let body = format!(
        r#"<w:p><w:r><w:t>Body</w:t></w:r><w:r><w:footnoteReference w:id="1"/></w:r></w:p>
           <w:p><w:r><w:t>More</w:t></w:r><w:r><w:endnoteReference w:id="2"/></w:r></w:p>
           {SECT_PR}"#
    );
    MemoryPackage::new()
        .with_part("word/document.xml", document(&body))
        .with_part(
            "word/_rels/document.xml.rels",
            rels(&[
                ("rId10", REL_HEADER, "header1.xml", false),
                ("rId11", REL_FOOTER, "footer1.xml", false),
                ("rId12", REL_HEADER, "header9.xml", false),
            ]),
        )
        .with_part(
            "word/header1.xml",
            part("hdr", "<w:p><w:r><w:t>Header text</w:t></w:r></w:p>"),
        )
        .with_part(
            "word/footer1.xml",
            part(
                "ftr",
                r#"<w:p><w:r><w:t xml:space="preserve">Page </w:t></w:r><w:fldSimple w:instr="PAGE"><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p>"#,
            ),
        )
        .with_part(
            "word/footnotes.xml",
            part(
                "footnotes",
                r#"<w:footnote w:type="separator" w:id="-1"><w:p><w:r><w:separator/></w:r></w:p></w:footnote>
                   <w:footnote w:id="1"><w:p><w:r><w:footnoteRef/></w:r><w:r><w:t>A note</w:t></w:r></w:p></w:footnote>"#,
            ),
        )
        .with_part(
            "word/endnotes.xml",
            part(
                "endnotes",
                r#"<w:endnote w:id="2"><w:p><w:r><w:endnoteRef/></w:r><w:r><w:t>Closing</w:t></w:r></w:p></w:endnote>"#,
            ),
        )
}

#[test]
fn section_properties_at_end_of_body() {
    let pkg = full_package();
    let body = common::parse_package(&pkg);
    assert_eq!(body.len(), 2);

    let sect = body.section_properties.as_ref().unwrap();
    assert_eq!(sect.page_width, 792.0);
    assert_eq!(sect.page_height, 612.0);
    assert_eq!(sect.orientation, Orientation::Landscape);
    assert_eq!(sect.margins.top, 72.0);
    assert_eq!(sect.margins.left, 36.0);
    assert_eq!(sect.content_width(), 720.0);
    assert_eq!(sect.break_type, SectionBreakType::Continuous);
    assert_eq!(sect.page_numbering.start, Some(3));
    assert_eq!(sect.page_numbering.format.as_deref(), Some("lowerRoman"));
    let cols = sect.columns.as_ref().unwrap();
    assert_eq!(cols.count, 2);
    assert_eq!(cols.space, 36.0);
    assert!(sect.title_page);
    assert_eq!(sect.header_ref(HeaderFooterType::Default), Some("rId10"));
    assert_eq!(sect.header_ref(HeaderFooterType::First), Some("rId12"));
    assert_eq!(sect.footer_ref(HeaderFooterType::Even), None);
    assert!(sect.raw_xml.as_deref().unwrap().starts_with("<w:sectPr"));
}

#[test]
fn document_collects_headers_footers_and_notes() {
    common::init_logger();
    let pkg = full_package();
    let doc = XmlParser::new(&pkg).parse_document().unwrap();

    assert_eq!(doc.get_text(), "Body\nMore");
    assert_eq!(doc.paragraph_count(), 2);

    // rId12 points at a part that is not in the package.
    assert_eq!(doc.headers.len(), 1);
    assert_eq!(doc.headers["rId10"].get_text(), "Header text");
    let footer = &doc.footers["rId11"];
    assert_eq!(footer.get_text(), "Page ");
    let p = footer.get_paragraphs()[0];
    assert_eq!(p.fields().count(), 1);

    assert_eq!(doc.footnotes.len(), 2);
    assert!(doc.footnotes["-1"].is_separator());
    let note = doc.footnote("1").unwrap();
    assert!(!note.is_separator());
    assert_eq!(note.body.get_text(), "A note");
    assert!(note.body.get_paragraphs()[0].runs[0].is_note_mark);

    assert_eq!(doc.endnote("2").unwrap().body.get_text(), "Closing");

    let body_refs: Vec<&str> = doc
        .body
        .paragraphs()
        .flat_map(|p| p.runs.iter())
        .flat_map(|r| r.footnote_refs.iter().chain(&r.endnote_refs))
        .map(String::as_str)
        .collect();
    assert_eq!(body_refs, vec!["1", "2"]);
}

#[test]
fn paragraph_level_sections_contribute_headers() {
    let body = r#"<w:p><w:pPr><w:sectPr><w:headerReference w:type="even" r:id="rId1"/></w:sectPr></w:pPr><w:r><w:t>first section</w:t></w:r></w:p>
                  <w:p><w:r><w:t>second section</w:t></w:r></w:p>"#;
    let pkg = MemoryPackage::new()
        .with_part("word/document.xml", document(body))
        .with_part(
            "word/_rels/document.xml.rels",
            rels(&[("rId1", REL_HEADER, "header2.xml", false)]),
        )
        .with_part("word/header2.xml", part("hdr", "<w:p><w:r><w:t>even</w:t></w:r></w:p>"));

    common::init_logger();
    let doc = XmlParser::new(&pkg).parse_document().unwrap();
    let first = doc.body.paragraphs().next().unwrap();
    let sect = first.section_properties.as_ref().unwrap();
    assert_eq!(sect.header_ref(HeaderFooterType::Even), Some("rId1"));
    assert!(doc.body.section_properties.is_none());
    assert_eq!(doc.headers["rId1"].get_text(), "even");
    assert!(doc.footnotes.is_empty());
}

#[test]
fn missing_note_parts_are_errors_only_when_asked_for() {
    common::init_logger();
    let pkg = common::package("<w:p/>");
    let parser = XmlParser::new(&pkg);
    assert!(matches!(
        parser.parse_notes(NoteKind::Footnote),
        Err(Error::MissingPart(p)) if p == "word/footnotes.xml"
    ));
    let doc = parser.parse_document().unwrap();
    assert!(doc.endnotes.is_empty());
    assert!(matches!(
        parser.parse_header("word/header1.xml"),
        Err(Error::MissingPart(_))
    ));
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn picture(rel_attr: &str) -> String {
    format!(
        r#"<w:p><w:r><w:drawing><wp:inline><wp:extent cx="38100" cy="25400"/>
             <a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip {rel_attr}/></pic:blipFill></pic:pic></a:graphicData></a:graphic>
           </wp:inline></w:drawing></w:r></w:p>"#
    )
}

#[test]
fn load_image_detects_format_and_size() {
    common::init_logger();
    let body = [
        picture(r#"r:embed="rId1""#),
        picture(r#"r:link="rId2""#),
        picture(r#"r:embed="rId3""#),
        picture(""),
    ]
    .concat();
    let pkg = MemoryPackage::new()
        .with_part("word/document.xml", document(&body))
        .with_part(
            "word/_rels/document.xml.rels",
            rels(&[
                ("rId1", REL_IMAGE, "media/image1.png", false),
                ("rId2", REL_IMAGE, "https://example.com/a.png", true),
                ("rId3", REL_IMAGE, "media/missing.png", false),
            ]),
        )
        .with_part("word/media/image1.png", png_bytes(3, 2));
    let parser = XmlParser::new(&pkg);
    let body = parser.parse_body().unwrap();
    let images = body.get_images();
    assert_eq!(images.len(), 4);

    let data = parser.load_image(images[0]).unwrap();
    assert_eq!(data.format, image::ImageFormat::Png);
    assert_eq!((data.pixel_width, data.pixel_height), (3, 2));
    assert_eq!(data.bytes, png_bytes(3, 2));

    assert!(matches!(parser.load_image(images[1]), Err(Error::InvalidDocx(_))));
    assert_eq!(images[2].source.path(), Some("word/media/missing.png"));
    assert!(matches!(
        parser.load_image(images[2]),
        Err(Error::MissingPart(p)) if p == "word/media/missing.png"
    ));
    assert!(!images[3].source.is_resolved());
    assert!(matches!(parser.load_image(images[3]), Err(Error::MissingPart(_))));
    assert!(matches!(images[3].source, ImageSource::Unresolved(_)));
}

fn zip_package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn parse_bytes_reads_a_zip_package() {
    common::init_logger();
    let bytes = zip_package(&[
        (
            "word/document.xml",
            &document(
                r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Zipped</w:t></w:r></w:p>"#,
            ),
        ),
        (
            "word/styles.xml",
            &part(
                "styles",
                r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:rPr><w:b/></w:rPr></w:style>"#,
            ),
        ),
    ]);
    let doc = docxide_model::parse_bytes(&bytes).unwrap();
    assert_eq!(doc.get_text(), "Zipped");
    let p = doc.body.paragraphs().next().unwrap();
    assert_eq!(p.style.style_id.as_deref(), Some("Title"));

    let from_zip = MemoryPackage::from_zip(Cursor::new(bytes)).unwrap();
    let body = XmlParser::new(&from_zip).parse_body().unwrap();
    assert_eq!(body.get_text(), "Zipped");
}

#[test]
fn parse_bytes_rejects_non_zip_input() {
    assert!(matches!(
        docxide_model::parse_bytes(b"plain text, not a package"),
        Err(Error::InvalidDocx(_))
    ));
    let bytes = zip_package(&[("word/styles.xml", &part("styles", ""))]);
    assert!(matches!(
        docxide_model::parse_bytes(&bytes),
        Err(Error::MissingPart(p)) if p == "word/document.xml"
    ));
}
