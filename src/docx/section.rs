use roxmltree::Node;

use super::xml::{
    attr, attr_flag, child, child_val, children_named, local, on_off, raw_xml, rel_attr,
    twips_attr,
};
use crate::model::{
    Columns, HeaderFooterRef, HeaderFooterType, Orientation, PageMargins, PageNumbering,
    SectionBreakType, SectionProperties,
};

pub(crate) fn parse_section_properties(sect_node: Node, keep_raw_xml: bool) -> SectionProperties {
    let defaults = SectionProperties::default();
    let pg_sz = child(sect_node, "pgSz");
    let pg_mar = child(sect_node, "pgMar");

    let page_width = pg_sz
        .and_then(|n| twips_attr(n, "w"))
        .unwrap_or(defaults.page_width);
    let page_height = pg_sz
        .and_then(|n| twips_attr(n, "h"))
        .unwrap_or(defaults.page_height);
    let orientation = match pg_sz.and_then(|n| attr(n, "orient")) {
        Some("landscape") => Orientation::Landscape,
        _ => Orientation::Portrait,
    };

    let dm = PageMargins::default();
    let margin = |name: &str, fallback: f32| {
        pg_mar
            .and_then(|n| twips_attr(n, name))
            .unwrap_or(fallback)
    };
    let margins = PageMargins {
        top: margin("top", dm.top),
        bottom: margin("bottom", dm.bottom),
        left: margin("left", dm.left),
        right: margin("right", dm.right),
        header: margin("header", dm.header),
        footer: margin("footer", dm.footer),
        gutter: margin("gutter", dm.gutter),
    };

    let columns = child(sect_node, "cols").and_then(|cols| {
        let count: u32 = attr(cols, "num")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let equal_width = attr_flag(cols, "equalWidth").unwrap_or(true);
        let widths: Vec<(f32, f32)> = children_named(cols, "col")
            .map(|c| {
                (
                    twips_attr(c, "w").unwrap_or(0.0),
                    twips_attr(c, "space").unwrap_or(0.0),
                )
            })
            .collect();
        if count <= 1 && widths.is_empty() {
            return None;
        }
        Some(Columns {
            count: count.max(widths.len() as u32),
            space: twips_attr(cols, "space").unwrap_or(36.0),
            equal_width,
            separator: attr_flag(cols, "sep").unwrap_or(false),
            widths,
        })
    });

    let mut header_refs = Vec::new();
    let mut footer_refs = Vec::new();
    for node in sect_node.children().filter(|n| n.is_element()) {
        let target = match local(node) {
            "headerReference" => &mut header_refs,
            "footerReference" => &mut footer_refs,
            _ => continue,
        };
        let Some(rel_id) = rel_attr(node, "id") else {
            continue;
        };
        target.push(HeaderFooterRef {
            kind: HeaderFooterType::from_val(attr(node, "type").unwrap_or("default")),
            rel_id: rel_id.to_string(),
        });
    }

    let page_numbering = child(sect_node, "pgNumType")
        .map(|n| PageNumbering {
            start: attr(n, "start").and_then(|v| v.parse().ok()),
            format: attr(n, "fmt").map(String::from),
        })
        .unwrap_or_default();

    SectionProperties {
        page_width,
        page_height,
        orientation,
        margins,
        columns,
        header_refs,
        footer_refs,
        title_page: on_off(sect_node, "titlePg").unwrap_or(false),
        break_type: child_val(sect_node, "type")
            .map(SectionBreakType::from_val)
            .unwrap_or_default(),
        page_numbering,
        line_pitch: child(sect_node, "docGrid").and_then(|n| twips_attr(n, "linePitch")),
        raw_xml: keep_raw_xml.then(|| raw_xml(sect_node)),
    }
}
