//! FILENAME: persistence/src/xlsx_writer.rs
//! PURPOSE: Writes named result tables to a multi-sheet XLSX workbook.
//! CONTEXT: One worksheet per (name, table) pair, each a flat rectangular
//! sheet with a header row and no index column. The workbook is assembled
//! fully in memory and written in a single save, so a failed save leaves
//! no half-written sheet set behind.

use crate::error::PersistenceError;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::path::Path;
use table_engine::{Table, Value};

pub fn save_xlsx(sheets: &[(&str, &Table)], path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();

    for (name, table) in sheets {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(*name)?;

        for (col, header) in table.columns().iter().enumerate() {
            worksheet.write_string(0, col as u16, header)?;
        }

        for (r, row) in table.rows().iter().enumerate() {
            let sheet_row = (r + 1) as u32;
            for (c, value) in row.iter().enumerate() {
                let sheet_col = c as u16;
                match value {
                    Value::Null => {}
                    Value::Int(i) => {
                        worksheet.write_number(sheet_row, sheet_col, *i as f64)?;
                    }
                    Value::Float(f) => {
                        worksheet.write_number(sheet_row, sheet_col, f.as_f64())?;
                    }
                    Value::Text(s) => {
                        worksheet.write_string(sheet_row, sheet_col, s)?;
                    }
                    Value::DateTime(dt) => {
                        worksheet.write_string(
                            sheet_row,
                            sheet_col,
                            &dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                        )?;
                    }
                }
            }
        }
    }

    xlsx.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_engine::Value;

    #[test]
    fn test_save_multi_sheet_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut a = Table::with_columns(&["Country", "Total"]).unwrap();
        a.push_row(vec![Value::text("UK"), Value::float(9.0)]).unwrap();
        let mut b = Table::with_columns(&["CustomerID"]).unwrap();
        b.push_row(vec![Value::Int(17850)]).unwrap();
        b.push_row(vec![Value::Null]).unwrap();

        save_xlsx(&[("summary", &a), ("customers", &b)], &path).unwrap();

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let t = Table::with_columns(&["a"]).unwrap();
        let missing = Path::new("/nonexistent-dir/out.xlsx");
        assert!(save_xlsx(&[("sheet", &t)], missing).is_err());
    }
}
