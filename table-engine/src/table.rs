//! FILENAME: table-engine/src/table.rs
//! PURPOSE: The in-memory table value (ordered named columns + rows).
//! CONTEXT: This file defines the `Table` struct that every transformation
//! in this crate consumes and produces. Rows are stored row-major; every
//! row is exactly as wide as the header. All operations are pure functions
//! from table(s) to table.

use crate::value::{compare_values, Value};
use rustc_hash::FxHashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("row width {got} does not match column count {expected}")]
    WidthMismatch { expected: usize, got: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    /// Duplicate names are rejected.
    pub fn new(columns: Vec<String>) -> Result<Self, TableError> {
        let mut seen = FxHashSet::default();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Table {
            columns,
            rows: Vec::new(),
        })
    }

    /// Convenience constructor from string slices.
    pub fn with_columns(columns: &[&str]) -> Result<Self, TableError> {
        Table::new(columns.iter().map(|c| (*c).to_string()).collect())
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::WidthMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns), printed by the pipeline before/after transforms.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// First `n` rows (all of them if the table is shorter).
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Null count per column, sorted descending. The sort is stable so
    /// equal counts keep the source column order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let nulls = self.rows.iter().filter(|r| r[i].is_null()).count();
                (name.clone(), nulls)
            })
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Removes exact-duplicate rows (all columns equal), keeping the first
    /// occurrence. Idempotent.
    pub fn dedup(&self) -> Table {
        let mut seen: FxHashSet<&[Value]> = FxHashSet::default();
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            if seen.insert(row.as_slice()) {
                rows.push(row.clone());
            }
        }
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Keeps rows for which the predicate holds. Row order is preserved.
    pub fn filter<F>(&self, pred: F) -> Table
    where
        F: Fn(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }

    /// Keeps rows whose cell in `name` equals `value`.
    pub fn filter_eq(&self, name: &str, value: &Value) -> Result<Table, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.filter(|row| &row[idx] == value))
    }

    /// Drops rows that hold a Null in any of the given columns.
    pub fn drop_nulls(&self, names: &[&str]) -> Result<Table, TableError> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.filter(|row| indices.iter().all(|&i| !row[i].is_null())))
    }

    /// Projection onto a subset of columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Table::with_columns(names)?;
        for row in &self.rows {
            out.push_row(indices.iter().map(|&i| row[i].clone()).collect())?;
        }
        Ok(out)
    }

    /// Appends a new column. `values` must have one entry per row.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Table, TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::WidthMismatch {
                expected: self.rows.len(),
                got: values.len(),
            });
        }
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let mut out = Table::new(columns)?;
        for (row, value) in self.rows.iter().zip(values) {
            let mut new_row = row.clone();
            new_row.push(value);
            out.rows.push(new_row);
        }
        Ok(out)
    }

    /// Rewrites one column cell by cell.
    pub fn map_column<F>(&self, name: &str, f: F) -> Result<Table, TableError>
    where
        F: Fn(&Value) -> Value,
    {
        let idx = self.column_index(name)?;
        let mut out = self.clone();
        for row in &mut out.rows {
            row[idx] = f(&row[idx]);
        }
        Ok(out)
    }

    /// Sorts rows descending by the given column. The sort is stable, so
    /// ties keep their current order; Null cells sort last.
    pub fn sort_desc_by(&self, name: &str) -> Result<Table, TableError> {
        let idx = self.column_index(name)?;
        let mut out = self.clone();
        out.rows.sort_by(|a, b| compare_values(&b[idx], &a[idx]));
        Ok(out)
    }
}
