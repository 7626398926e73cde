//! FILENAME: persistence/src/csv_reader.rs
//! PURPOSE: Loads a delimited text file into a typed Table.
//! CONTEXT: The source encoding is a configuration option (utf-8, latin1,
//! or any other label encoding_rs knows). Decoding is strict: malformed
//! input for the stated encoding aborts the load. Column types are
//! inferred after parsing; an empty field is the Null sentinel.

use crate::error::PersistenceError;
use encoding_rs::Encoding;
use std::path::Path;
use table_engine::{Table, Value};

/// Inferred storage type for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Int,
    Float,
    Text,
}

/// Reads `path` and decodes it with the named encoding before parsing.
pub fn load_csv(path: &Path, encoding_label: &str) -> Result<Table, PersistenceError> {
    let bytes = std::fs::read(path)?;
    parse_csv(&bytes, encoding_label)
}

/// Decodes and parses CSV bytes into a Table with inferred column types.
pub fn parse_csv(bytes: &[u8], encoding_label: &str) -> Result<Table, PersistenceError> {
    let encoding = Encoding::for_label(encoding_label.as_bytes()).ok_or_else(|| {
        PersistenceError::Decode(format!("unknown encoding label: {}", encoding_label))
    })?;

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(PersistenceError::Decode(format!(
            "input is not valid {}",
            encoding.name()
        )));
    }

    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records: Vec<csv::StringRecord> = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|col| infer_column_type(&records, col))
        .collect();

    let mut table = Table::new(headers)?;
    for record in &records {
        let row: Vec<Value> = types
            .iter()
            .enumerate()
            .map(|(col, ty)| parse_cell(record.get(col).unwrap_or(""), *ty))
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

/// Int if every non-empty cell parses as i64, else Float if every
/// non-empty cell parses as f64, else Text.
fn infer_column_type(records: &[csv::StringRecord], col: usize) -> ColumnType {
    let mut all_int = true;
    let mut all_float = true;

    for record in records {
        let cell = record.get(col).unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        if all_int && cell.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_float && cell.parse::<f64>().is_err() {
            all_float = false;
        }
        if !all_float {
            break;
        }
    }

    if all_int {
        ColumnType::Int
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

fn parse_cell(raw: &str, ty: ColumnType) -> Value {
    let cell = raw.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    match ty {
        ColumnType::Int => cell.parse::<i64>().map(Value::Int).unwrap_or(Value::Null),
        ColumnType::Float => cell.parse::<f64>().map(Value::float).unwrap_or(Value::Null),
        ColumnType::Text => Value::text(raw),
    }
}
