//! Small helpers over `roxmltree` shared by the part parsers.
//!
//! Element lookups match on local name only: Word, LibreOffice and other
//! producers bind the same namespaces to different prefixes.

use std::str::FromStr;

use roxmltree::Node;

use crate::error::{Error, Result};
use crate::model::{Border, Borders, ColorValue, Margins, Shading, TabAlignment, TabStop, Width};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const VML_NS: &str = "urn:schemas-microsoft-com:vml";
pub(crate) const OFFICE_NS: &str = "urn:schemas-microsoft-com:office:office";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

pub(crate) fn twips_to_pts(twips: f32) -> f32 {
    twips / 20.0
}

pub(crate) fn local<'a>(node: Node<'a, 'a>) -> &'a str {
    node.tag_name().name()
}

pub(crate) fn is<'a>(node: Node<'a, 'a>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

pub(crate) fn child<'a>(node: Node<'a, 'a>, name: &str) -> Option<Node<'a, 'a>> {
    node.children().find(|n| is(*n, name))
}

pub(crate) fn children_named<'a, 'n>(
    node: Node<'a, 'a>,
    name: &'n str,
) -> impl Iterator<Item = Node<'a, 'a>> + 'n
where
    'a: 'n,
{
    node.children().filter(move |n| is(*n, name))
}

pub(crate) fn descendant<'a>(node: Node<'a, 'a>, name: &str) -> Option<Node<'a, 'a>> {
    node.descendants().find(|n| is(*n, name))
}

/// Attribute by local name, preferring the WordprocessingML namespace and
/// never matching relationship ids (`r:id`) for a plain `id`.
pub(crate) fn attr<'a>(node: Node<'a, 'a>, name: &str) -> Option<&'a str> {
    node.attribute((WML_NS, name)).or_else(|| {
        node.attributes()
            .find(|a| a.name() == name && a.namespace() != Some(REL_NS))
            .map(|a| a.value())
    })
}

pub(crate) fn rel_attr<'a>(node: Node<'a, 'a>, name: &str) -> Option<&'a str> {
    node.attribute((REL_NS, name))
}

pub(crate) fn val<'a>(node: Node<'a, 'a>) -> Option<&'a str> {
    attr(node, "val")
}

pub(crate) fn child_val<'a>(node: Node<'a, 'a>, name: &str) -> Option<&'a str> {
    child(node, name).and_then(val)
}

fn is_true(v: &str) -> bool {
    !matches!(v, "0" | "false" | "off" | "none")
}

/// A toggle element (`w:b`, `w:keepNext`, ...). Present without `val`, or with
/// a value other than 0/false/off, means true.
pub(crate) fn on_off(parent: Node, name: &str) -> Option<bool> {
    child(parent, name).map(|n| val(n).is_none_or(is_true))
}

/// An on/off attribute (`behindDoc="1"`).
pub(crate) fn attr_flag(node: Node, name: &str) -> Option<bool> {
    attr(node, name).map(is_true)
}

pub(crate) fn twips_attr(node: Node, name: &str) -> Option<f32> {
    attr(node, name)
        .and_then(|v| v.parse::<f32>().ok())
        .map(twips_to_pts)
}

pub(crate) fn f32_attr(node: Node, name: &str) -> Option<f32> {
    attr(node, name).and_then(|v| v.parse::<f32>().ok())
}

/// Parse a numeric attribute the structure depends on. A malformed value is
/// an error for the enclosing element; an absent one is `None`.
pub(crate) fn parse_structural<T: FromStr>(node: Node, name: &str) -> Result<Option<T>> {
    let Some(raw) = attr(node, name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::InvalidAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
            value: raw.to_string(),
        })
}

/// Verbatim source text of an element.
pub(crate) fn raw_xml(node: Node) -> String {
    node.document().input_text()[node.range()].to_string()
}

/// `xml:space` on the element itself.
pub(crate) fn xml_space<'a>(node: Node<'a, 'a>) -> Option<&'a str> {
    node.attribute((XML_NS, "space"))
}

/// Normalize a hex color token: `auto`/`none` are absent, 3-digit hex is
/// expanded, the result is upper case.
pub(crate) fn normalize_color(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_start_matches('#');
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") || raw.eq_ignore_ascii_case("none") {
        return None;
    }
    if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match raw.len() {
        3 => Some(raw.chars().flat_map(|c| [c, c]).collect::<String>().to_ascii_uppercase()),
        6 => Some(raw.to_ascii_uppercase()),
        _ => None,
    }
}

/// Read a color from `rgb_attr` plus the matching theme attributes, e.g.
/// (`color`, `themeColor`, `themeTint`, `themeShade`) on `w:color`.
pub(crate) fn color_from(
    node: Node,
    rgb_attr: &str,
    theme_attr: &str,
    tint_attr: &str,
    shade_attr: &str,
) -> Option<ColorValue> {
    let color = ColorValue {
        rgb: attr(node, rgb_attr).and_then(normalize_color),
        theme_color: attr(node, theme_attr).map(String::from),
        theme_tint: attr(node, tint_attr).map(String::from),
        theme_shade: attr(node, shade_attr).map(String::from),
    };
    (!color.is_empty()).then_some(color)
}

pub(crate) fn parse_border(node: Node) -> Option<Border> {
    let style = val(node).unwrap_or("none");
    if style == "none" || style == "nil" {
        return None;
    }
    let width_pt = f32_attr(node, "sz").map(|v| v / 8.0).unwrap_or(0.5);
    let space_pt = f32_attr(node, "space").unwrap_or(0.0);
    Some(Border {
        style: style.to_string(),
        width_pt,
        space_pt,
        color: color_from(node, "color", "themeColor", "themeTint", "themeShade"),
    })
}

/// `w:pBdr`, `w:tblBorders`, `w:tcBorders`; `start`/`end` stand in for
/// `left`/`right`.
pub(crate) fn parse_borders(node: Node) -> Option<Borders> {
    let side = |primary: &str, alt: &str| {
        child(node, primary)
            .or_else(|| child(node, alt))
            .and_then(parse_border)
    };
    let borders = Borders {
        top: child(node, "top").and_then(parse_border),
        bottom: child(node, "bottom").and_then(parse_border),
        left: side("left", "start"),
        right: side("right", "end"),
        inside_h: child(node, "insideH").and_then(parse_border),
        inside_v: child(node, "insideV").and_then(parse_border),
        between: child(node, "between").and_then(parse_border),
    };
    (!borders.is_empty()).then_some(borders)
}

pub(crate) fn parse_shading(node: Node) -> Option<Shading> {
    let shading = Shading {
        pattern: val(node).map(String::from),
        fill: color_from(node, "fill", "themeFill", "themeFillTint", "themeFillShade"),
        color: color_from(node, "color", "themeColor", "themeTint", "themeShade"),
    };
    if shading.fill.is_none() && shading.color.is_none() && shading.pattern.as_deref() == Some("clear")
    {
        return None;
    }
    Some(shading)
}

/// `w:tblCellMar`/`w:tcMar`: each side is a `w:w` twips width.
pub(crate) fn parse_margins(node: Node) -> Margins {
    let side = |primary: &str, alt: &str| {
        child(node, primary)
            .or_else(|| child(node, alt))
            .and_then(|n| twips_attr(n, "w"))
    };
    Margins {
        top: side("top", "top"),
        bottom: side("bottom", "bottom"),
        left: side("left", "start"),
        right: side("right", "end"),
    }
}

/// `w:tcW`/`w:tblW`: `dxa` twips, `pct` fiftieths of a percent (or `"50%"`).
pub(crate) fn parse_width(node: Node) -> Option<Width> {
    let ty = attr(node, "type").unwrap_or("dxa");
    let raw = attr(node, "w");
    match ty {
        "auto" => Some(Width::Auto),
        "nil" => Some(Width::Nil),
        "pct" => {
            let raw = raw?;
            if let Some(pct) = raw.strip_suffix('%') {
                pct.parse::<f32>().ok().map(Width::Percent)
            } else {
                raw.parse::<f32>().ok().map(|v| Width::Percent(v / 50.0))
            }
        }
        _ => raw
            .and_then(|v| v.parse::<f32>().ok())
            .map(|v| Width::Points(twips_to_pts(v))),
    }
}

pub(crate) fn parse_tab_stops(ppr: Node) -> Vec<TabStop> {
    let Some(tabs) = child(ppr, "tabs") else {
        return vec![];
    };
    let mut stops: Vec<TabStop> = children_named(tabs, "tab")
        .filter_map(|n| {
            let position = twips_attr(n, "pos")?;
            let alignment = match val(n).unwrap_or("left") {
                "center" => TabAlignment::Center,
                "right" | "end" => TabAlignment::Right,
                "decimal" => TabAlignment::Decimal,
                "bar" => TabAlignment::Bar,
                "num" => TabAlignment::Num,
                "clear" => TabAlignment::Clear,
                _ => TabAlignment::Left,
            };
            let leader = attr(n, "leader").and_then(|l| match l {
                "dot" => Some('.'),
                "hyphen" => Some('-'),
                "underscore" => Some('_'),
                "middleDot" => Some('\u{b7}'),
                _ => None,
            });
            Some(TabStop {
                position,
                alignment,
                leader,
            })
        })
        .collect();
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    stops
}

/// Block-level children with content-control and custom-XML wrappers
/// flattened away.
pub(crate) fn collect_block_nodes<'a>(parent: Node<'a, 'a>) -> Vec<Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for node in parent.children().filter(Node::is_element) {
        match local(node) {
            "sdt" => {
                if let Some(content) = child(node, "sdtContent") {
                    nodes.extend(collect_block_nodes(content));
                }
            }
            "customXml" => nodes.extend(collect_block_nodes(node)),
            _ => nodes.push(node),
        }
    }
    nodes
}

/// Inline children of a paragraph (or hyperlink) with `sdt`, `smartTag`,
/// `ins`, `customXml` and `moveTo` flattened; deleted content is dropped.
pub(crate) fn collect_inline_nodes<'a>(parent: Node<'a, 'a>) -> Vec<Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for node in parent.children().filter(Node::is_element) {
        match local(node) {
            "sdt" => {
                if let Some(content) = child(node, "sdtContent") {
                    nodes.extend(collect_inline_nodes(content));
                }
            }
            "smartTag" | "ins" | "customXml" | "moveTo" | "dir" | "bdo" => {
                nodes.extend(collect_inline_nodes(node))
            }
            "del" | "moveFrom" | "pPr" => {}
            _ => nodes.push(node),
        }
    }
    nodes
}
