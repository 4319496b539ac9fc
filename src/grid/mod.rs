//! The shift grid: hour labels across, one role per group of rows.
//!
//! Row 0 is an ignored header, row 1 carries the hour labels from column 1
//! onward, and every later row belongs to a role. A quota row declares the
//! headcount per hour; the rows beneath it hold volunteer names.

pub mod export;

use std::io::Read;
use std::ops::Range;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::info;

use crate::error::GridError;

pub use export::{write_csv, write_xlsx};

pub const HOUR_ROW: usize = 1;
pub const FIRST_ROLE_ROW: usize = 2;
pub const LABEL_COL: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<String>>,
    width: usize,
    quota_rows: Vec<usize>,
}

/// Integer headcount in a cell, if the cell holds one.
pub fn parse_quota(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    // Spreadsheet exports sometimes write whole numbers as "3.0".
    match value.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Some(f as u32),
        _ => None,
    }
}

impl Grid {
    /// Builds a grid from raw rows, padding ragged rows with blanks.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, GridError> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.len() <= HOUR_ROW {
            return Err(GridError::Shape(format!(
                "expected a header row and an hour row, found {} row(s)",
                rows.len()
            )));
        }
        let cells: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        let mut grid = Grid {
            cells,
            width,
            quota_rows: Vec::new(),
        };
        if grid.hour_columns().next().is_none() {
            return Err(GridError::Shape("hour row has no labels".to_string()));
        }
        grid.quota_rows = (FIRST_ROLE_ROW..grid.height())
            .filter(|&row| grid.looks_like_quota_row(row))
            .collect();
        Ok(grid)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GridError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Self::from_rows(rows)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GridError::NotFound(path.to_path_buf()));
        }
        let grid = Self::from_reader(std::fs::File::open(path)?)?;
        info!(
            path = %path.display(),
            rows = grid.height(),
            hours = grid.hour_columns().count(),
            quota_rows = grid.quota_rows.len(),
            "grid loaded"
        );
        Ok(grid)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_blank(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).trim().is_empty()
    }

    /// Writes `value` into a cell inside the grid. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    /// Role label of a row, trimmed.
    pub fn label(&self, row: usize) -> &str {
        self.cell(row, LABEL_COL).trim()
    }

    /// Hour label heading a data column.
    pub fn hour_at(&self, col: usize) -> Option<&str> {
        if col == LABEL_COL {
            return None;
        }
        let hour = self.cell(HOUR_ROW, col).trim();
        (!hour.is_empty()).then_some(hour)
    }

    /// `(column, hour label)` for every labelled data column.
    pub fn hour_columns(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        (1..self.width).filter_map(move |col| self.hour_at(col).map(|h| (col, h)))
    }

    /// A row is a quota row when at least half of its non-blank data cells are counts.
    fn looks_like_quota_row(&self, row: usize) -> bool {
        let mut filled = 0;
        let mut numeric = 0;
        for col in 1..self.width {
            let value = self.cell(row, col);
            if value.trim().is_empty() {
                continue;
            }
            filled += 1;
            if parse_quota(value).is_some() {
                numeric += 1;
            }
        }
        numeric > 0 && numeric * 2 >= filled
    }

    pub fn quota_rows(&self) -> &[usize] {
        &self.quota_rows
    }

    pub fn is_quota_row(&self, row: usize) -> bool {
        self.quota_rows.binary_search(&row).is_ok()
    }

    pub fn quota_at(&self, row: usize, col: usize) -> Option<u32> {
        if !self.is_quota_row(row) {
            return None;
        }
        parse_quota(self.cell(row, col))
    }

    /// Rows holding names for a quota row: everything beneath it up to the
    /// next quota row or the end of the grid, at most `max_rows` of them.
    pub fn assignment_rows(&self, quota_row: usize, max_rows: usize) -> Range<usize> {
        let start = quota_row + 1;
        let next_quota = self
            .quota_rows
            .iter()
            .copied()
            .find(|&r| r > quota_row)
            .unwrap_or(self.height());
        start..next_quota.min(start + max_rows).max(start)
    }

    /// Names already sitting at the top of a block, counted until the first blank.
    pub fn filled_from_top(&self, rows: Range<usize>, col: usize) -> usize {
        rows.take_while(|&row| !self.is_blank(row, col)).count()
    }

    /// Blank rows in a block, top to bottom.
    pub fn blank_rows(&self, rows: Range<usize>, col: usize) -> Vec<usize> {
        rows.filter(|&row| self.is_blank(row, col)).collect()
    }
}
