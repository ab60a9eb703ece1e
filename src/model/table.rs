use super::{Alignment, Body, Borders, Image, Margins, Paragraph, Shading, TextContainer, Width};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VMergeType {
    Restart,
    Continue,
}

impl VMergeType {
    pub fn as_val(self) -> &'static str {
        match self {
            VMergeType::Restart => "restart",
            VMergeType::Continue => "continue",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableCell {
    pub content: Body,
    pub width: Option<Width>,
    /// Number of grid columns the cell covers (`w:gridSpan`, default 1).
    pub grid_span: u32,
    /// True when this cell continues a vertical merge started above.
    pub vertical_merge: bool,
    pub vertical_merge_type: Option<VMergeType>,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub margins: Option<Margins>,
    pub vertical_align: Option<String>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            content: Body::for_cell(),
            width: None,
            grid_span: 1,
            vertical_merge: false,
            vertical_merge_type: None,
            borders: None,
            shading: None,
            margins: None,
            vertical_align: None,
        }
    }
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_text(&self) -> String {
        self.content.get_text()
    }
}

impl TextContainer for TableCell {
    fn get_paragraphs(&self) -> Vec<&Paragraph> {
        self.content.get_paragraphs()
    }

    fn get_tables(&self) -> Vec<&Table> {
        self.content.get_tables()
    }

    fn get_images(&self) -> Vec<&Image> {
        self.content.get_images()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub height: Option<f32>, // points
    pub height_rule: Option<String>,
    pub is_header: bool,
    pub cant_split: bool,
    pub grid_before: u32,
    pub grid_after: u32,
}

impl TableRow {
    /// Grid columns covered by this row, including skipped leading/trailing columns.
    pub fn grid_width(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.grid_span.max(1) as usize)
            .fold(self.grid_before as usize, usize::saturating_add)
            .saturating_add(self.grid_after as usize)
    }

    /// Grid column where cell `index` starts.
    pub fn grid_column_of(&self, index: usize) -> Option<usize> {
        if index >= self.cells.len() {
            return None;
        }
        let start = self.cells[..index]
            .iter()
            .map(|c| c.grid_span.max(1) as usize)
            .fold(self.grid_before as usize, usize::saturating_add);
        Some(start)
    }

    /// The cell starting at grid column `col`, if any.
    pub fn cell_at_grid_column(&self, col: usize) -> Option<&TableCell> {
        let mut pos = self.grid_before as usize;
        for cell in &self.cells {
            if pos == col {
                return Some(cell);
            }
            pos = pos.saturating_add(cell.grid_span.max(1) as usize);
            if pos > col {
                return None;
            }
        }
        None
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableProperties {
    pub style_id: Option<String>,
    pub width: Option<Width>,
    pub alignment: Option<Alignment>,
    pub indent: Option<f32>,
    pub borders: Option<Borders>,
    pub cell_margins: Option<Margins>,
    pub layout: Option<String>,
    pub shading: Option<Shading>,
}

/// A row whose grid coverage disagrees with the rest of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureIssue {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

impl std::fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} covers {} grid columns, expected {}",
            self.row, self.found, self.expected
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Column widths from `w:tblGrid`, in points.
    pub grid: Vec<f32>,
    pub properties: TableProperties,
    pub raw_xml: Option<String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    pub fn column_count(&self) -> usize {
        if !self.grid.is_empty() {
            return self.grid.len();
        }
        self.rows.iter().map(TableRow::grid_width).max().unwrap_or(0)
    }

    /// Check that every row covers the same number of grid columns once
    /// spans are accounted for. The reference is the grid when one was
    /// declared, otherwise the first row.
    pub fn validate_structure(&self) -> Vec<StructureIssue> {
        let expected = if !self.grid.is_empty() {
            self.grid.len()
        } else if let Some(first) = self.rows.first() {
            first.grid_width()
        } else {
            return Vec::new();
        };
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let found = row.grid_width();
                (found != expected).then_some(StructureIssue {
                    row: i,
                    expected,
                    found,
                })
            })
            .collect()
    }

    /// Number of rows covered by the cell at (`row`, `cell`): 1 unless the
    /// cell restarts a vertical merge, in which case the following
    /// continuation cells in the same grid column are counted too.
    pub fn vertical_span(&self, row: usize, cell: usize) -> usize {
        let Some(start_row) = self.rows.get(row) else {
            return 0;
        };
        let Some(start) = start_row.cells.get(cell) else {
            return 0;
        };
        if start.vertical_merge_type != Some(VMergeType::Restart) {
            return 1;
        }
        let Some(col) = start_row.grid_column_of(cell) else {
            return 1;
        };
        let continued = self.rows[row + 1..]
            .iter()
            .take_while(|r| {
                r.cell_at_grid_column(col)
                    .is_some_and(|c| c.vertical_merge_type == Some(VMergeType::Continue))
            })
            .count();
        1 + continued
    }

    pub fn get_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(TableCell::get_text)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TextContainer for Table {
    fn get_paragraphs(&self) -> Vec<&Paragraph> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .flat_map(|c| c.content.paragraphs())
            .collect()
    }

    fn get_tables(&self) -> Vec<&Table> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .flat_map(|c| c.content.tables())
            .collect()
    }

    fn get_images(&self) -> Vec<&Image> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .flat_map(|c| c.content.get_images())
            .collect()
    }
}
