use std::collections::HashMap;

use super::properties::{parse_numbering_ref, parse_paragraph_properties, parse_run_properties};
use super::xml::{DML_NS, attr, child, child_val, local, parse_borders};
use crate::error::{Error, Result};
use crate::model::{Borders, NumberingRef, ParagraphStyle, RunStyle};

fn dml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(DML_NS))
}

fn latin_typeface<'a>(node: roxmltree::Node<'a, 'a>) -> Option<&'a str> {
    dml(node, "latin")
        .and_then(|n| n.attribute("typeface"))
        .filter(|tf| !tf.is_empty())
}

fn east_asian_typeface<'a>(node: roxmltree::Node<'a, 'a>) -> Option<&'a str> {
    dml(node, "ea")
        .and_then(|n| n.attribute("typeface"))
        .filter(|tf| !tf.is_empty())
}

/// Major (headings) and minor (body) fonts of the document theme.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeFonts {
    pub major: String,
    pub minor: String,
    pub major_east_asia: Option<String>,
    pub minor_east_asia: Option<String>,
}

impl Default for ThemeFonts {
    fn default() -> Self {
        Self {
            major: String::from("Aptos Display"),
            minor: String::from("Aptos"),
            major_east_asia: None,
            minor_east_asia: None,
        }
    }
}

impl ThemeFonts {
    pub fn parse(xml_content: &str) -> Result<Self> {
        let xml = roxmltree::Document::parse(xml_content)?;
        let mut fonts = ThemeFonts::default();
        for node in xml.descendants() {
            if node.tag_name().namespace() != Some(DML_NS) {
                continue;
            }
            match node.tag_name().name() {
                "majorFont" => {
                    if let Some(tf) = latin_typeface(node) {
                        fonts.major = tf.to_string();
                    }
                    fonts.major_east_asia = east_asian_typeface(node).map(String::from);
                }
                "minorFont" => {
                    if let Some(tf) = latin_typeface(node) {
                        fonts.minor = tf.to_string();
                    }
                    fonts.minor_east_asia = east_asian_typeface(node).map(String::from);
                }
                _ => {}
            }
        }
        Ok(fonts)
    }

    /// Font for a theme reference such as `majorHAnsi` or `minorEastAsia`.
    pub fn resolve(&self, theme_ref: &str) -> Option<&str> {
        match theme_ref {
            "majorHAnsi" | "majorAscii" | "majorBidi" => Some(&self.major),
            "minorHAnsi" | "minorAscii" | "minorBidi" => Some(&self.minor),
            "majorEastAsia" => self.major_east_asia.as_deref().or(Some(&self.major)),
            "minorEastAsia" => self.minor_east_asia.as_deref().or(Some(&self.minor)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

/// A style from `styles.xml` with its `basedOn` chain already folded in.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleDefinition {
    pub id: String,
    pub name: Option<String>,
    pub kind: StyleKind,
    pub based_on: Option<String>,
    pub is_default: bool,
    pub paragraph: ParagraphStyle,
    pub run: RunStyle,
    /// List attached to the style through `pPr/numPr`.
    pub numbering: Option<NumberingRef>,
    pub table_borders: Option<Borders>,
}

/// Named styles, document defaults and theme fonts of a package.
#[derive(Clone, Debug, Default)]
pub struct StyleManager {
    styles: HashMap<String, StyleDefinition>,
    default_run: RunStyle,
    default_paragraph: ParagraphStyle,
    theme: ThemeFonts,
}

impl StyleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the contents of `styles.xml` and the theme part, either of
    /// which may be absent.
    pub fn parse(styles_xml: Option<&str>, theme_xml: Option<&str>) -> Result<Self> {
        let theme = match theme_xml {
            Some(xml) => ThemeFonts::parse(xml)?,
            None => ThemeFonts::default(),
        };
        let mut manager = StyleManager {
            theme,
            ..Default::default()
        };
        let Some(styles_xml) = styles_xml else {
            return Ok(manager);
        };
        let xml = roxmltree::Document::parse(styles_xml)?;
        let root = xml.root_element();
        if local(root) != "styles" {
            return Err(Error::UnexpectedElement {
                expected: "styles".into(),
                found: local(root).to_string(),
            });
        }

        if let Some(doc_defaults) = child(root, "docDefaults") {
            if let Some(rpr) = child(doc_defaults, "rPrDefault").and_then(|n| child(n, "rPr")) {
                manager.default_run = parse_run_properties(rpr, &manager.theme);
            }
            if let Some(ppr) = child(doc_defaults, "pPrDefault").and_then(|n| child(n, "pPr")) {
                match parse_paragraph_properties(ppr) {
                    Ok((style, _)) => manager.default_paragraph = style,
                    Err(e) => log::warn!("Ignoring paragraph defaults: {e}"),
                }
            }
        }

        for style_node in root.children().filter(|n| local(*n) == "style") {
            let Some(id) = attr(style_node, "styleId") else {
                continue;
            };
            let kind = match attr(style_node, "type").unwrap_or("paragraph") {
                "character" => StyleKind::Character,
                "table" => StyleKind::Table,
                "numbering" => StyleKind::Numbering,
                _ => StyleKind::Paragraph,
            };
            let (paragraph, numbering) = match child(style_node, "pPr") {
                Some(ppr) => match parse_paragraph_properties(ppr) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        log::warn!("Ignoring paragraph properties of style {id}: {e}");
                        let numbering = child(ppr, "numPr")
                            .and_then(|n| parse_numbering_ref(n).ok().flatten());
                        (ParagraphStyle::default(), numbering)
                    }
                },
                None => (ParagraphStyle::default(), None),
            };
            let run = child(style_node, "rPr")
                .map(|rpr| parse_run_properties(rpr, &manager.theme))
                .unwrap_or_default();
            let table_borders = child(style_node, "tblPr")
                .and_then(|pr| child(pr, "tblBorders"))
                .and_then(parse_borders);
            manager.styles.insert(
                id.to_string(),
                StyleDefinition {
                    id: id.to_string(),
                    name: child_val(style_node, "name").map(String::from),
                    kind,
                    based_on: child_val(style_node, "basedOn").map(String::from),
                    is_default: attr(style_node, "default").is_some_and(|v| v == "1" || v == "true"),
                    paragraph,
                    run,
                    numbering,
                    table_borders,
                },
            );
        }

        resolve_based_on(&mut manager.styles);
        log::debug!("Parsed {} styles", manager.styles.len());
        Ok(manager)
    }

    pub fn theme(&self) -> &ThemeFonts {
        &self.theme
    }

    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn character_style(&self, id: &str) -> Option<&RunStyle> {
        self.styles
            .get(id)
            .filter(|s| s.kind == StyleKind::Character)
            .map(|s| &s.run)
    }

    pub fn paragraph_style(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id).filter(|s| s.kind == StyleKind::Paragraph)
    }

    pub fn default_paragraph_style(&self) -> Option<&StyleDefinition> {
        self.styles
            .values()
            .find(|s| s.kind == StyleKind::Paragraph && s.is_default)
    }

    pub fn document_run_defaults(&self) -> &RunStyle {
        &self.default_run
    }

    pub fn document_paragraph_defaults(&self) -> &ParagraphStyle {
        &self.default_paragraph
    }

    /// Character style first, then inline `rPr`. The style id of the result
    /// is the referenced character style.
    pub fn resolve_run_style(&self, r_style: Option<&str>, inline: &RunStyle) -> RunStyle {
        let mut style = r_style
            .and_then(|id| self.character_style(id))
            .cloned()
            .unwrap_or_default();
        style.merge(inline);
        style
    }

    /// Paragraph style (or the default paragraph style) first, then inline `pPr`.
    pub fn resolve_paragraph_style(
        &self,
        p_style: Option<&str>,
        inline: &ParagraphStyle,
    ) -> ParagraphStyle {
        let base = match p_style {
            Some(id) => self.paragraph_style(id),
            None => self.default_paragraph_style(),
        };
        let mut style = base.map(|s| s.paragraph.clone()).unwrap_or_default();
        style.merge(inline);
        style.style_id = p_style.map(String::from);
        style
    }

    /// Heading level 1-9 from the style's name (`heading 2`) or its outline level.
    pub fn heading_level(&self, id: &str) -> Option<u8> {
        let style = self.styles.get(id)?;
        let name = style.name.as_deref().unwrap_or(&style.id).to_ascii_lowercase();
        if let Some(n) = name
            .strip_prefix("heading")
            .map(str::trim)
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=9).contains(n))
        {
            return Some(n);
        }
        style.paragraph.outline_level.filter(|l| *l < 9).map(|l| l + 1)
    }

    pub fn style_numbering(&self, id: &str) -> Option<&NumberingRef> {
        self.styles.get(id).and_then(|s| s.numbering.as_ref())
    }
}

/// Fold each style's `basedOn` chain into it, closest ancestor winning.
/// Cycles are cut at the first repeated id.
fn resolve_based_on(styles: &mut HashMap<String, StyleDefinition>) {
    let ids: Vec<String> = styles.keys().cloned().collect();
    let mut resolved: Vec<(String, ParagraphStyle, RunStyle, Option<NumberingRef>)> = Vec::new();
    for id in ids {
        let mut chain: Vec<String> = Vec::new();
        let mut current = id.clone();
        loop {
            if chain.contains(&current) {
                break;
            }
            chain.push(current.clone());
            match styles.get(&current).and_then(|s| s.based_on.clone()) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        let mut paragraph = ParagraphStyle::default();
        let mut run = RunStyle::default();
        let mut numbering = None;
        for ancestor_id in chain.iter().rev() {
            if let Some(s) = styles.get(ancestor_id) {
                paragraph.merge(&s.paragraph);
                run.merge(&s.run);
                if s.numbering.is_some() {
                    numbering = s.numbering.clone();
                }
            }
        }
        // Ids are not inherited.
        paragraph.style_id = Some(id.clone());
        run.style_id = None;
        resolved.push((id, paragraph, run, numbering));
    }
    for (id, paragraph, run, numbering) in resolved {
        if let Some(s) = styles.get_mut(&id) {
            s.paragraph = paragraph;
            s.run = run;
            s.numbering = numbering;
        }
    }
}
