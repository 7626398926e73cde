//! FILENAME: persistence/src/csv_writer.rs
//! PURPOSE: Writes a Table to a flat delimited file.
//! CONTEXT: Header row, no row index; Null cells become empty fields.
//! Quoting and delimiter follow the csv crate defaults, matching the
//! conventions the loader accepts.

use crate::error::PersistenceError;
use std::path::Path;
use table_engine::Table;

pub fn save_csv(table: &Table, path: &Path) -> Result<(), PersistenceError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.display()))?;
    }
    writer.flush()?;
    Ok(())
}
