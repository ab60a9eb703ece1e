use roxmltree::Node;

use super::xml::{
    attr, child, children_named, local, on_off, parse_borders, parse_margins, parse_shading,
    parse_structural, parse_width, raw_xml, twips_attr, val,
};
use super::{PartContext, XmlParser};
use crate::error::Result;
use crate::model::{
    Alignment, Body, Table, TableCell, TableProperties, TableRow, VMergeType, Width,
};

/// Word caps a table at 63 grid columns; larger spans are clamped to it.
const MAX_GRID_COLUMNS: u32 = 63;

impl XmlParser<'_> {
    /// `w:tbl`. A row or cell that fails to parse is logged and left out;
    /// rows that disagree with the grid are kept and reported.
    pub(crate) fn parse_table(&self, ctx: &PartContext, node: Node) -> Result<Table> {
        let grid: Vec<f32> = child(node, "tblGrid")
            .into_iter()
            .flat_map(|g| children_named(g, "gridCol"))
            .filter_map(|n| twips_attr(n, "w"))
            .collect();

        let mut table = Table {
            grid,
            properties: child(node, "tblPr")
                .map(|pr| self.parse_table_properties(pr))
                .unwrap_or_default(),
            raw_xml: self.options.keep_raw_xml.then(|| raw_xml(node)),
            ..Default::default()
        };

        for tr in children_named(node, "tr") {
            match self.parse_row(ctx, tr, &table.grid) {
                Ok(row) => table.add_row(row),
                Err(e) => log::warn!("Dropping table row {}: {e}", table.rows.len()),
            }
        }

        for issue in table.validate_structure() {
            log::warn!("Irregular table in {}: {issue}", ctx.part_path);
        }
        Ok(table)
    }

    fn parse_table_properties(&self, pr: Node) -> TableProperties {
        let style_id = child(pr, "tblStyle").and_then(val).map(String::from);
        let borders = child(pr, "tblBorders").and_then(parse_borders).or_else(|| {
            style_id
                .as_deref()
                .and_then(|id| self.styles.get(id))
                .and_then(|s| s.table_borders.clone())
        });
        TableProperties {
            width: child(pr, "tblW").and_then(parse_width),
            alignment: child(pr, "jc").and_then(val).map(Alignment::from_val),
            indent: child(pr, "tblInd").and_then(|n| twips_attr(n, "w")),
            borders,
            cell_margins: child(pr, "tblCellMar").map(parse_margins),
            layout: child(pr, "tblLayout")
                .and_then(|n| attr(n, "type"))
                .map(String::from),
            shading: child(pr, "shd").and_then(parse_shading),
            style_id,
        }
    }

    /// `w:tr`. `grid` is the table's column widths, used for cells without
    /// an explicit width.
    pub(crate) fn parse_row(&self, ctx: &PartContext, node: Node, grid: &[f32]) -> Result<TableRow> {
        let mut row = TableRow::default();
        if let Some(pr) = child(node, "trPr") {
            if let Some(h) = child(pr, "trHeight") {
                row.height = twips_attr(h, "val");
                row.height_rule = attr(h, "hRule").map(String::from);
            }
            row.is_header = on_off(pr, "tblHeader").unwrap_or(false);
            row.cant_split = on_off(pr, "cantSplit").unwrap_or(false);
            if let Some(n) = child(pr, "gridBefore") {
                row.grid_before = parse_structural::<u32>(n, "val")?
                    .unwrap_or(0)
                    .min(MAX_GRID_COLUMNS);
            }
            if let Some(n) = child(pr, "gridAfter") {
                row.grid_after = parse_structural::<u32>(n, "val")?
                    .unwrap_or(0)
                    .min(MAX_GRID_COLUMNS);
            }
        }

        let mut grid_col = row.grid_before as usize;
        for tc in cell_nodes(node) {
            match self.parse_cell(ctx, tc, grid, grid_col) {
                Ok(cell) => {
                    grid_col += cell.grid_span as usize;
                    row.cells.push(cell);
                }
                Err(e) => log::warn!("Dropping table cell {}: {e}", row.cells.len()),
            }
        }
        Ok(row)
    }

    /// `w:tc` starting at grid column `grid_col`.
    pub(crate) fn parse_cell(
        &self,
        ctx: &PartContext,
        node: Node,
        grid: &[f32],
        grid_col: usize,
    ) -> Result<TableCell> {
        let mut cell = TableCell::new();
        if let Some(pr) = child(node, "tcPr") {
            if let Some(n) = child(pr, "gridSpan") {
                cell.grid_span = parse_structural::<u32>(n, "val")?
                    .unwrap_or(1)
                    .clamp(1, MAX_GRID_COLUMNS);
            }
            cell.width = child(pr, "tcW").and_then(parse_width);
            if let Some(n) = child(pr, "vMerge") {
                match val(n) {
                    Some("restart") => cell.vertical_merge_type = Some(VMergeType::Restart),
                    _ => {
                        cell.vertical_merge = true;
                        cell.vertical_merge_type = Some(VMergeType::Continue);
                    }
                }
            }
            cell.borders = child(pr, "tcBorders").and_then(parse_borders);
            cell.shading = child(pr, "shd").and_then(parse_shading);
            cell.margins = child(pr, "tcMar").map(parse_margins);
            cell.vertical_align = child(pr, "vAlign").and_then(val).map(String::from);
        }
        if matches!(cell.width, None | Some(Width::Auto)) {
            let end = grid_col + cell.grid_span as usize;
            if let Some(cols) = grid.get(grid_col..end) {
                cell.width = Some(Width::Points(cols.iter().sum()));
            }
        }

        let mut content = Body::for_cell();
        self.parse_block_children(ctx, node, &mut content);
        cell.content = content;
        Ok(cell)
    }
}

/// Cells of a row, looking through content controls around them.
fn cell_nodes<'a>(row: Node<'a, 'a>) -> Vec<Node<'a, 'a>> {
    let mut out = Vec::new();
    for n in row.children().filter(|n| n.is_element()) {
        match local(n) {
            "tc" => out.push(n),
            "sdt" | "customXml" => {
                let content = child(n, "sdtContent").unwrap_or(n);
                out.extend(cell_nodes(content));
            }
            _ => {}
        }
    }
    out
}
