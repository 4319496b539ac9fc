use std::path::Path;

use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;

use super::{parse_quota, Grid};
use crate::error::GridError;

/// Writes the grid as a plain delimited file, same shape as it was read.
pub fn write_csv<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), GridError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for row in grid.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the grid as a single-sheet workbook. Quota cells stay numeric.
pub fn write_xlsx<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), GridError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Planning")?;

    for (r, row) in grid.rows().iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let (r, c) = (r as u32, c as u16);
            match parse_quota(value) {
                Some(n) if grid.is_quota_row(r as usize) => {
                    sheet.write_number(r, c, f64::from(n))?;
                }
                _ => {
                    sheet.write_string(r, c, value)?;
                }
            }
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::grid;

    #[test]
    fn csv_export_round_trips_through_the_loader() {
        let g = grid(&[
            &["Planning", "", ""],
            &["", "14h-15h", "15h-16h"],
            &["Service au bar", "2", "1"],
            &["", "Léa Dupont, Paul Martin", ""],
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planning.csv");

        write_csv(&g, &path).unwrap();
        let reloaded = Grid::load(&path).unwrap();

        assert_eq!(reloaded, g);
    }

    #[test]
    fn xlsx_export_writes_a_workbook() {
        let g = grid(&[&["Planning", ""], &["", "14h-15h"], &["Bar", "2"], &["", "Léa Dupont"]]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planning.xlsx");

        write_xlsx(&g, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
