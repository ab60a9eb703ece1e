use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::docx::xml::{attr, child, child_val, children_named, color_from, local, on_off, val};
use crate::error::{Error, Result};

/// Raw `w:ind` of a level, in twips as written.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelIndent {
    #[serde(alias = "start")]
    pub left: Option<f32>,
    #[serde(alias = "end")]
    pub right: Option<f32>,
    pub hanging: Option<f32>,
    #[serde(alias = "firstLine")]
    pub first_line: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelTab {
    pub val: Option<String>,
    pub pos: Option<f32>,
}

/// Run formatting applied to the marker itself.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub font: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Points.
    pub size: Option<f32>,
    pub color: Option<String>,
}

/// Largest list start value Word accepts.
const MAX_START: i64 = 32767;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelDefinition {
    #[serde(deserialize_with = "opt_number")]
    pub start: Option<i64>,
    #[serde(alias = "numFmt", alias = "num_fmt")]
    pub format: Option<String>,
    #[serde(alias = "lvlText", alias = "lvl_text")]
    pub text: Option<String>,
    #[serde(alias = "lvlJc", alias = "jc")]
    pub alignment: Option<String>,
    #[serde(alias = "suff")]
    pub suffix: Option<String>,
    #[serde(alias = "startOverride", deserialize_with = "opt_number")]
    pub start_override: Option<i64>,
    #[serde(alias = "ind")]
    pub indent: Option<LevelIndent>,
    pub tabs: Vec<LevelTab>,
    #[serde(alias = "rPr")]
    pub style: Option<MarkerStyle>,
    #[serde(alias = "isLgl")]
    pub legal: bool,
}

impl LevelDefinition {
    /// Start value after overrides, default 1, clamped to Word's
    /// `0..=32767` range.
    pub fn effective_start(&self) -> i64 {
        self.start_override
            .or(self.start)
            .unwrap_or(1)
            .clamp(0, MAX_START)
    }

    /// Fields set in `over` replace those in `self`.
    pub fn overlay(&mut self, over: &LevelDefinition) {
        macro_rules! replace {
            ($dst:expr, $src:expr; $($field:ident),+) => {
                $(
                    if $src.$field.is_some() {
                        $dst.$field = $src.$field.clone();
                    }
                )+
            };
        }
        replace!(self, over; start, format, text, alignment, suffix, start_override, indent, style);
        if !over.tabs.is_empty() {
            self.tabs = over.tabs.clone();
        }
        self.legal |= over.legal;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AbstractNumbering {
    pub levels: BTreeMap<u8, LevelDefinition>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumberingInstance {
    #[serde(
        rename = "abstractNumId",
        alias = "abstract_num_id",
        deserialize_with = "string_or_number"
    )]
    pub abstract_num_id: String,
    /// Per-level overrides (`w:lvlOverride`).
    pub levels: BTreeMap<u8, LevelDefinition>,
}

/// List definitions of a document: abstract numberings plus the numbering
/// instances paragraphs refer to by `numId`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumberingDefinitions {
    pub abstract_numberings: BTreeMap<String, AbstractNumbering>,
    pub numbering_instances: BTreeMap<String, NumberingInstance>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match StringOrNumber::deserialize(d)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
    })
}

fn opt_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<i64>, D::Error> {
    Ok(match Option::<StringOrNumber>::deserialize(d)? {
        Some(StringOrNumber::Int(n)) => Some(n),
        Some(StringOrNumber::String(s)) => s.trim().parse().ok(),
        None => None,
    })
}

impl NumberingDefinitions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse `word/numbering.xml`.
    pub fn parse(xml_content: &str) -> Result<Self> {
        let xml = roxmltree::Document::parse(xml_content)?;
        let root = xml.root_element();
        if local(root) != "numbering" {
            return Err(Error::UnexpectedElement {
                expected: "numbering".into(),
                found: local(root).to_string(),
            });
        }

        let mut defs = NumberingDefinitions::default();
        for node in root.children().filter(|n| n.is_element()) {
            match local(node) {
                "abstractNum" => {
                    let Some(abs_id) = attr(node, "abstractNumId") else {
                        continue;
                    };
                    let mut levels = BTreeMap::new();
                    for lvl in children_named(node, "lvl") {
                        let Some(ilvl) = attr(lvl, "ilvl").and_then(|v| v.parse::<u8>().ok())
                        else {
                            continue;
                        };
                        levels.insert(ilvl, parse_level(lvl));
                    }
                    defs.abstract_numberings
                        .insert(abs_id.to_string(), AbstractNumbering { levels });
                }
                "num" => {
                    let Some(num_id) = attr(node, "numId") else {
                        continue;
                    };
                    let Some(abs_id) = child_val(node, "abstractNumId") else {
                        continue;
                    };
                    let mut levels = BTreeMap::new();
                    for ov in children_named(node, "lvlOverride") {
                        let Some(ilvl) = attr(ov, "ilvl").and_then(|v| v.parse::<u8>().ok())
                        else {
                            continue;
                        };
                        let mut level = child(ov, "lvl").map(parse_level).unwrap_or_default();
                        level.start_override =
                            child_val(ov, "startOverride").and_then(|v| v.parse().ok());
                        levels.insert(ilvl, level);
                    }
                    defs.numbering_instances.insert(
                        num_id.to_string(),
                        NumberingInstance {
                            abstract_num_id: abs_id.to_string(),
                            levels,
                        },
                    );
                }
                _ => {}
            }
        }
        log::debug!(
            "Parsed numbering: {} abstract definitions, {} instances",
            defs.abstract_numberings.len(),
            defs.numbering_instances.len()
        );
        Ok(defs)
    }

    /// Effective definition of `level` in list `num_id`: the abstract level
    /// with the instance override applied on top.
    pub fn resolve_level(&self, num_id: &str, level: u8) -> Option<LevelDefinition> {
        let instance = self.numbering_instances.get(num_id)?;
        let base = self
            .abstract_numberings
            .get(&instance.abstract_num_id)
            .and_then(|a| a.levels.get(&level));
        let over = instance.levels.get(&level);
        match (base, over) {
            (Some(base), Some(over)) => {
                let mut def = base.clone();
                def.overlay(over);
                Some(def)
            }
            (Some(base), None) => Some(base.clone()),
            (None, Some(over)) => Some(over.clone()),
            (None, None) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.numbering_instances.is_empty()
    }
}

fn parse_level(lvl: roxmltree::Node) -> LevelDefinition {
    let ppr = child(lvl, "pPr");
    let indent = ppr.and_then(|p| child(p, "ind")).map(|ind| {
        let num = |a: &str, b: &str| {
            attr(ind, a)
                .or_else(|| attr(ind, b))
                .and_then(|v| v.parse::<f32>().ok())
        };
        LevelIndent {
            left: num("left", "start"),
            right: num("right", "end"),
            hanging: num("hanging", "hanging"),
            first_line: num("firstLine", "firstLine"),
        }
    });
    let tabs = ppr
        .and_then(|p| child(p, "tabs"))
        .map(|tabs| {
            children_named(tabs, "tab")
                .map(|t| LevelTab {
                    val: val(t).map(String::from),
                    pos: attr(t, "pos").and_then(|v| v.parse().ok()),
                })
                .collect()
        })
        .unwrap_or_default();
    let style = child(lvl, "rPr").map(|rpr| MarkerStyle {
        font: child(rpr, "rFonts")
            .and_then(|f| attr(f, "ascii").or_else(|| attr(f, "hAnsi")))
            .map(String::from),
        bold: on_off(rpr, "b"),
        italic: on_off(rpr, "i"),
        size: child_val(rpr, "sz")
            .and_then(|v| v.parse::<f32>().ok())
            .map(|hp| hp / 2.0),
        color: child(rpr, "color")
            .and_then(|c| color_from(c, "val", "themeColor", "themeTint", "themeShade"))
            .and_then(|c| c.rgb),
    });
    LevelDefinition {
        start: child_val(lvl, "start").and_then(|v| v.parse().ok()),
        format: child_val(lvl, "numFmt").map(String::from),
        text: child_val(lvl, "lvlText").map(String::from),
        alignment: child_val(lvl, "lvlJc").map(String::from),
        suffix: child_val(lvl, "suff").map(String::from),
        start_override: None,
        indent,
        tabs,
        style,
        legal: on_off(lvl, "isLgl").unwrap_or(false),
    }
}
