//! Grid layouts: rows and columns with percentage tracks and cell spanning.
//!
//! Track sizes are fixed-point percentages scaled by [`PERCENT_SCALE`]
//! (`10000` is the whole work area). The cell-child map assigns each cell a
//! zone index; equal indices in adjacent cells form one spanning zone.
//!
//! # Example
//! ```
//! use zone_layouts::layout::grid::GridLayout;
//! use zone_layouts::Size;
//!
//! let grid = GridLayout::new(
//!     2,
//!     2,
//!     vec![5000, 5000],
//!     vec![5000, 5000],
//!     vec![vec![0, 1], vec![0, 2]],
//! )?;
//! let zones = grid.zone_rects(Size::new(100, 100));
//! assert_eq!(zones.len(), 3);
//! assert_eq!(zones[0].height, 100);
//! # Ok::<(), zone_layouts::layout::grid::GridError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

use crate::geometry::{Rect, Size};

/// 100% expressed in grid percent units.
pub const PERCENT_SCALE: i32 = 10000;

/// Structural problems with a grid description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row and one column (got {rows}x{columns})")]
    Empty { rows: i32, columns: i32 },
    #[error("{axis} percent count {actual} does not match {expected} tracks")]
    PercentCount {
        axis: &'static str,
        expected: i32,
        actual: usize,
    },
    #[error("cell-child map is not {rows}x{columns}")]
    MapShape { rows: i32, columns: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    rows: i32,
    columns: i32,
    row_percents: Vec<i32>,
    column_percents: Vec<i32>,
    cell_child_map: Vec<Vec<i32>>,
    free_indices: BTreeSet<i32>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            row_percents: vec![PERCENT_SCALE],
            column_percents: vec![PERCENT_SCALE],
            cell_child_map: vec![vec![0]],
            free_indices: BTreeSet::new(),
        }
    }
}

impl GridLayout {
    pub fn new(
        rows: i32,
        columns: i32,
        row_percents: Vec<i32>,
        column_percents: Vec<i32>,
        cell_child_map: Vec<Vec<i32>>,
    ) -> Result<Self, GridError> {
        if rows < 1 || columns < 1 {
            return Err(GridError::Empty { rows, columns });
        }
        if row_percents.len() != rows as usize {
            return Err(GridError::PercentCount {
                axis: "row",
                expected: rows,
                actual: row_percents.len(),
            });
        }
        if column_percents.len() != columns as usize {
            return Err(GridError::PercentCount {
                axis: "column",
                expected: columns,
                actual: column_percents.len(),
            });
        }
        let shape_ok = cell_child_map.len() == rows as usize
            && cell_child_map.iter().all(|row| row.len() == columns as usize);
        if !shape_ok {
            return Err(GridError::MapShape { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            row_percents,
            column_percents,
            cell_child_map,
            free_indices: BTreeSet::new(),
        })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn row_percents(&self) -> &[i32] {
        &self.row_percents
    }

    pub fn column_percents(&self) -> &[i32] {
        &self.column_percents
    }

    pub fn cell_child_map(&self) -> &[Vec<i32>] {
        &self.cell_child_map
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<i32> {
        self.cell_child_map.get(row)?.get(column).copied()
    }

    pub fn free_indices(&self) -> &BTreeSet<i32> {
        &self.free_indices
    }

    /// Number of distinct zones referenced by the map.
    pub fn child_count(&self) -> usize {
        self.cell_child_map
            .iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Record `index` as no longer referenced.
    pub fn free_index(&mut self, index: i32) {
        self.free_indices.insert(index);
    }

    /// Fold every cell of zone `from` into zone `into`, freeing `from`.
    /// Returns whether any cell changed.
    pub fn merge_cells(&mut self, from: i32, into: i32) -> bool {
        if from == into {
            return false;
        }
        let mut changed = false;
        for cell in self.cell_child_map.iter_mut().flatten() {
            if *cell == from {
                *cell = into;
                changed = true;
            }
        }
        if changed {
            self.free_indices.insert(from);
            self.free_indices.remove(&into);
        }
        changed
    }

    /// Cell-child map with indices renumbered densely in first-seen
    /// (row-major) order. Unchanged when no index has been freed.
    pub fn compacted_cell_child_map(&self) -> Vec<Vec<i32>> {
        if self.free_indices.is_empty() {
            return self.cell_child_map.clone();
        }
        let mut mapping: HashMap<i32, i32> = HashMap::new();
        self.cell_child_map
            .iter()
            .map(|row| {
                row.iter()
                    .map(|source| {
                        let next = mapping.len() as i32;
                        *mapping.entry(*source).or_insert(next)
                    })
                    .collect()
            })
            .collect()
    }

    /// One rectangle per zone index (ascending), each the union of the cells
    /// carrying that index. Track edges come from cumulative percentages.
    pub fn zone_rects(&self, area: Size) -> Vec<Rect> {
        let column_edges = track_edges(&self.column_percents, area.width);
        let row_edges = track_edges(&self.row_percents, area.height);

        let mut zones: BTreeMap<i32, Rect> = BTreeMap::new();
        for (row, cells) in self.cell_child_map.iter().enumerate() {
            for (column, index) in cells.iter().enumerate() {
                let cell = Rect::new(
                    column_edges[column],
                    row_edges[row],
                    column_edges[column + 1] - column_edges[column],
                    row_edges[row + 1] - row_edges[row],
                );
                zones
                    .entry(*index)
                    .and_modify(|zone| *zone = zone.union(&cell))
                    .or_insert(cell);
            }
        }
        zones.into_values().collect()
    }

    pub(crate) fn from_parts_unchecked(
        rows: i32,
        columns: i32,
        row_percents: Vec<i32>,
        column_percents: Vec<i32>,
        cell_child_map: Vec<Vec<i32>>,
    ) -> Self {
        Self {
            rows,
            columns,
            row_percents,
            column_percents,
            cell_child_map,
            free_indices: BTreeSet::new(),
        }
    }
}

fn track_edges(percents: &[i32], extent: i32) -> Vec<i32> {
    let mut edges = Vec::with_capacity(percents.len() + 1);
    edges.push(0);
    let mut cumulative: i64 = 0;
    for percent in percents {
        cumulative += i64::from(*percent);
        edges.push((i64::from(extent) * cumulative / i64::from(PERCENT_SCALE)) as i32);
    }
    edges
}
