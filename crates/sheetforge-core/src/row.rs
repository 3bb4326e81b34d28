//! Sparse rows of cells

use crate::cell::Cell;
use crate::style::Style;
use std::collections::BTreeMap;

/// A sparse row of cells with an optional row-level style
///
/// Cells are keyed by zero-based column index; gaps are allowed and mean
/// "no cell". The row style applies to every cell that does not override
/// the attribute itself.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: BTreeMap<u16, Cell>,
    style: Style,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from consecutive values starting at column 0
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as u16, v.into()))
            .collect();
        Self {
            cells,
            style: Style::default(),
        }
    }

    /// Set the row-level style (builder form)
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set or replace the cell at a column index
    pub fn set_cell<C: Into<Cell>>(&mut self, col: u16, cell: C) {
        self.cells.insert(col, cell.into());
    }

    /// Append a cell after the current last column
    pub fn push_cell<C: Into<Cell>>(&mut self, cell: C) {
        let col = self.num_cells();
        self.cells.insert(col, cell.into());
    }

    /// The cell at a column index, if present
    pub fn cell(&self, col: u16) -> Option<&Cell> {
        self.cells.get(&col)
    }

    /// Iterate over `(column index, cell)` pairs in column order
    pub fn cells(&self) -> impl Iterator<Item = (u16, &Cell)> {
        self.cells.iter().map(|(&col, cell)| (col, cell))
    }

    /// Number of cell slots: the greatest occupied column index plus one,
    /// or 0 for a row with no cells
    pub fn num_cells(&self) -> u16 {
        self.cells
            .last_key_value()
            .map(|(&col, _)| col + 1)
            .unwrap_or(0)
    }

    /// A row is empty when it has no cells or every cell is value-less
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|c| c.is_empty())
    }

    /// The row-level style
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the row-level style
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl<V: Into<Cell>> FromIterator<V> for Row {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Row::from_values(iter)
    }
}
