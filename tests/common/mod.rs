#![allow(dead_code)]

use docxide_model::model::{Body, Model, Paragraph, Table};
use docxide_model::{MemoryPackage, ParserOptions, XmlParser};

pub const NS: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture" "#,
    r#"xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" "#,
    r#"xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" "#,
    r#"xmlns:v="urn:schemas-microsoft-com:vml" "#,
    r#"xmlns:o="urn:schemas-microsoft-com:office:office""#,
);

pub const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
pub const REL_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
pub const REL_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `word/document.xml` around a body fragment.
pub fn document(body: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:document {NS}><w:body>{body}</w:body></w:document>"#)
}

/// A root element of another part (`w:hdr`, `w:numbering`, ...) around a fragment.
pub fn part(root: &str, inner: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:{root} {NS}>{inner}</w:{root}>"#)
}

/// A `.rels` part from (id, type, target, external) entries.
pub fn rels(entries: &[(&str, &str, &str, bool)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target, external) in entries {
        let mode = if *external { r#" TargetMode="External""# } else { "" };
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"{mode}/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn package(body: &str) -> MemoryPackage {
    MemoryPackage::new().with_part("word/document.xml", document(body))
}

pub fn parse_body(body: &str) -> Body {
    parse_package(&package(body))
}

pub fn parse_package(pkg: &MemoryPackage) -> Body {
    parse_package_with(pkg, ParserOptions::default())
}

pub fn parse_package_with(pkg: &MemoryPackage, options: ParserOptions) -> Body {
    init_logger();
    XmlParser::with_options(pkg, options).parse_body().unwrap()
}

pub fn paragraphs(body: &Body) -> Vec<&Paragraph> {
    body.paragraphs().collect()
}

pub fn first_paragraph(body: &Body) -> &Paragraph {
    body.paragraphs().next().expect("no paragraph in body")
}

pub fn first_table(body: &Body) -> &Table {
    body.iter()
        .find_map(|m| match m {
            Model::Table(t) => Some(t),
            _ => None,
        })
        .expect("no table in body")
}
