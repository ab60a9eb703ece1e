//! `w:rPr` and `w:pPr` property parsing.

use roxmltree::Node;

use super::styles::ThemeFonts;
use super::xml::{
    attr, child, child_val, color_from, on_off, parse_borders, parse_shading, parse_structural,
    parse_tab_stops, twips_attr, val,
};
use crate::error::Result;
use crate::model::{
    Alignment, Indentation, NumberingRef, ParagraphStyle, RunStyle, Spacing, VertAlign,
};

/// Font named by `w:rFonts`: an explicit `ascii`/`hAnsi` face, else the
/// theme font selected by `asciiTheme`/`hAnsiTheme`.
pub(crate) fn resolve_font(rfonts: Node, theme: &ThemeFonts) -> Option<String> {
    if let Some(face) = attr(rfonts, "ascii").or_else(|| attr(rfonts, "hAnsi")) {
        return Some(face.to_string());
    }
    let theme_ref = attr(rfonts, "asciiTheme").or_else(|| attr(rfonts, "hAnsiTheme"))?;
    theme.resolve(theme_ref).map(String::from)
}

pub(crate) fn parse_run_properties(rpr: Node, theme: &ThemeFonts) -> RunStyle {
    let rfonts = child(rpr, "rFonts");
    RunStyle {
        style_id: child_val(rpr, "rStyle").map(String::from),
        bold: on_off(rpr, "b"),
        italic: on_off(rpr, "i"),
        underline: child(rpr, "u").map(|u| val(u).unwrap_or("single").to_string()),
        strike: on_off(rpr, "strike"),
        double_strike: on_off(rpr, "dstrike"),
        caps: on_off(rpr, "caps"),
        small_caps: on_off(rpr, "smallCaps"),
        vanish: on_off(rpr, "vanish"),
        font_name: rfonts.and_then(|f| resolve_font(f, theme)),
        font_east_asia: rfonts
            .and_then(|f| {
                attr(f, "eastAsia")
                    .or_else(|| attr(f, "eastAsiaTheme").and_then(|t| theme.resolve(t)))
            })
            .map(String::from),
        font_size: child_val(rpr, "sz")
            .and_then(|v| v.parse::<f32>().ok())
            .map(|hp| hp / 2.0),
        color: child(rpr, "color")
            .and_then(|c| color_from(c, "val", "themeColor", "themeTint", "themeShade")),
        highlight: child_val(rpr, "highlight")
            .filter(|h| *h != "none")
            .map(String::from),
        vertical_align: child_val(rpr, "vertAlign").map(|v| match v {
            "superscript" => VertAlign::Superscript,
            "subscript" => VertAlign::Subscript,
            _ => VertAlign::Baseline,
        }),
        shading: child(rpr, "shd").and_then(parse_shading),
        char_spacing: child(rpr, "spacing").and_then(|n| twips_attr(n, "val")),
        rtl: on_off(rpr, "rtl"),
    }
}

fn parse_spacing(node: Node) -> Spacing {
    Spacing {
        before: twips_attr(node, "before"),
        after: twips_attr(node, "after"),
        line: attr(node, "line").and_then(|v| v.parse::<f32>().ok()),
        line_rule: attr(node, "lineRule").map(String::from),
    }
}

fn parse_indentation(node: Node) -> Indentation {
    let either = |a: &str, b: &str| twips_attr(node, a).or_else(|| twips_attr(node, b));
    Indentation {
        left: either("left", "start"),
        right: either("right", "end"),
        hanging: twips_attr(node, "hanging"),
        first_line: twips_attr(node, "firstLine"),
    }
}

/// `w:numPr`. `ilvl` defaults to 0; a non-numeric `ilvl` is an error.
pub(crate) fn parse_numbering_ref(num_pr: Node) -> Result<Option<NumberingRef>> {
    let Some(num_id) = child_val(num_pr, "numId") else {
        return Ok(None);
    };
    let level = match child(num_pr, "ilvl") {
        Some(ilvl) => parse_structural::<u8>(ilvl, "val")?.unwrap_or(0),
        None => 0,
    };
    Ok(Some(NumberingRef::new(num_id, level.to_string())))
}

pub(crate) fn parse_paragraph_properties(
    ppr: Node,
) -> Result<(ParagraphStyle, Option<NumberingRef>)> {
    let style = ParagraphStyle {
        style_id: child_val(ppr, "pStyle").map(String::from),
        alignment: child_val(ppr, "jc").map(Alignment::from_val),
        spacing: child(ppr, "spacing").map(parse_spacing).unwrap_or_default(),
        indent: child(ppr, "ind").map(parse_indentation).unwrap_or_default(),
        keep_next: on_off(ppr, "keepNext"),
        keep_lines: on_off(ppr, "keepLines"),
        page_break_before: on_off(ppr, "pageBreakBefore"),
        contextual_spacing: on_off(ppr, "contextualSpacing"),
        outline_level: child_val(ppr, "outlineLvl").and_then(|v| v.parse().ok()),
        tabs: parse_tab_stops(ppr),
        shading: child(ppr, "shd").and_then(parse_shading),
        borders: child(ppr, "pBdr").and_then(parse_borders),
    };
    let numbering = match child(ppr, "numPr") {
        Some(num_pr) => parse_numbering_ref(num_pr)?,
        None => None,
    };
    Ok((style, numbering))
}
