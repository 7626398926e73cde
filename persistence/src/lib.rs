//! FILENAME: persistence/src/lib.rs
//! PURPOSE: Flat-file I/O for tables.
//! CONTEXT: CSV load with a configurable text encoding, CSV save, and
//! multi-sheet XLSX save. All failures surface as `PersistenceError`;
//! load-time decode failures and export write failures are fatal to the
//! caller, per the pipeline's error taxonomy.

mod csv_reader;
mod csv_writer;
mod error;
mod xlsx_writer;

pub use csv_reader::{load_csv, parse_csv};
pub use csv_writer::save_csv;
pub use error::PersistenceError;
pub use xlsx_writer::save_xlsx;
