//! Field codes.
//!
//! A complex field is spread over sibling runs:
//! `fldChar begin` → `instrText`... → `fldChar separate` → cached result runs
//! → `fldChar end`. The paragraph is scanned once up front; the result is a
//! side table telling the run loop which runs belong to a field and which
//! run carries the finished field.

use std::collections::{HashMap, HashSet};

use roxmltree::{Node, NodeId};

use super::xml::{attr, attr_flag, collect_inline_nodes, local, raw_xml};
use crate::model::{Field, FieldKind};

#[derive(Debug, Default)]
pub(crate) struct FieldScan {
    processed: HashSet<NodeId>,
    anchors: HashMap<NodeId, Vec<Field>>,
}

impl FieldScan {
    /// True for every run inside a terminated field span, anchor included.
    pub(crate) fn is_processed(&self, run: Node) -> bool {
        self.processed.contains(&run.id())
    }

    /// Fields finished by the span that starts at `run`.
    pub(crate) fn fields_at(&self, run: Node) -> Option<&[Field]> {
        self.anchors.get(&run.id()).map(Vec::as_slice)
    }
}

struct OpenField {
    anchor: NodeId,
    instruction: String,
    in_result: bool,
    dirty: bool,
    nested: Vec<Field>,
}

/// Runs of a paragraph in document order, including runs inside hyperlinks
/// and content controls. Runs inside `w:fldSimple` are cached results and
/// are left out.
fn collect_runs<'a>(parent: Node<'a, 'a>, out: &mut Vec<Node<'a, 'a>>) {
    for node in collect_inline_nodes(parent) {
        match local(node) {
            "r" => out.push(node),
            "hyperlink" => collect_runs(node, out),
            _ => {}
        }
    }
}

pub(crate) fn scan_paragraph(paragraph: Node, keep_raw_xml: bool) -> FieldScan {
    let mut runs = Vec::new();
    collect_runs(paragraph, &mut runs);

    let mut scan = FieldScan::default();
    let mut stack: Vec<OpenField> = Vec::new();
    // Runs touched by the outermost open field; committed when it ends.
    let mut pending: Vec<Node> = Vec::new();

    for run in runs {
        let mut touched = !stack.is_empty();
        for node in run.children().filter(|n| n.is_element()) {
            match local(node) {
                "fldChar" => match attr(node, "fldCharType") {
                    Some("begin") => {
                        touched = true;
                        stack.push(OpenField {
                            anchor: run.id(),
                            instruction: String::new(),
                            in_result: false,
                            dirty: attr_flag(node, "dirty").unwrap_or(false),
                            nested: Vec::new(),
                        });
                    }
                    Some("separate") => {
                        if let Some(open) = stack.last_mut() {
                            open.in_result = true;
                        }
                    }
                    Some("end") => {
                        let Some(open) = stack.pop() else {
                            log::debug!("Ignoring fldChar end without begin");
                            continue;
                        };
                        let mut field = Field::new(&open.instruction, FieldKind::Complex);
                        field.nested = open.nested;
                        field.dirty = open.dirty;
                        match stack.last_mut() {
                            Some(parent) => parent.nested.push(field),
                            None => {
                                pending.push(run);
                                if keep_raw_xml {
                                    let raw: String =
                                        pending.iter().map(|r| raw_xml(*r)).collect();
                                    field.raw_xml = Some(raw);
                                }
                                scan.processed.extend(pending.drain(..).map(|r| r.id()));
                                scan.anchors.entry(open.anchor).or_default().push(field);
                                touched = false;
                            }
                        }
                    }
                    _ => {}
                },
                "instrText" => {
                    if let Some(open) = stack.last_mut().filter(|o| !o.in_result) {
                        open.instruction.push_str(node.text().unwrap_or(""));
                    }
                }
                _ => {}
            }
        }
        if touched && pending.last().is_none_or(|r| r.id() != run.id()) {
            pending.push(run);
        }
    }

    if !stack.is_empty() {
        log::debug!(
            "Discarding {} unterminated field(s) at paragraph end",
            stack.len()
        );
    }
    scan
}

/// `w:fldSimple`: the instruction is an attribute; enclosed runs are the
/// cached result and are not kept.
pub(crate) fn parse_simple_field(node: Node, keep_raw_xml: bool) -> Field {
    let mut field = Field::new(attr(node, "instr").unwrap_or(""), FieldKind::Simple);
    field.dirty = attr_flag(node, "dirty").unwrap_or(false);
    if keep_raw_xml {
        field.raw_xml = Some(raw_xml(node));
    }
    field
}
