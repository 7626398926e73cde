//! FILENAME: table-engine/src/reshape.rs
//! PURPOSE: Wide/long reshaping - pivot (cross-tabulation) and melt.
//! CONTEXT: `pivot` aggregates a value column into a matrix keyed by two
//! categorical dimensions; `melt` is its structural inverse and must
//! round-trip every cell, including cells introduced by the fill value.

use crate::aggregate::{AggFn, Accumulator};
use crate::table::{Table, TableError};
use crate::value::{compare_values, Value};
use rustc_hash::FxHashMap;

/// Cross-tabulates `table`: distinct `index` values become rows, distinct
/// `columns` values become columns (labelled by their display form), and
/// each cell aggregates the matching `values` cells with `func`. Both axes
/// are sorted ascending. Rows whose index or column key is Null are
/// excluded. Absent (index, column) combinations receive `fill`.
pub fn pivot(
    table: &Table,
    index: &str,
    columns: &str,
    values: &str,
    func: AggFn,
    fill: Value,
) -> Result<Table, TableError> {
    let index_idx = table.column_index(index)?;
    let columns_idx = table.column_index(columns)?;
    let values_idx = table.column_index(values)?;

    // Distinct keys per axis, then sorted ascending.
    let mut row_keys: Vec<Value> = Vec::new();
    let mut row_pos: FxHashMap<Value, usize> = FxHashMap::default();
    let mut col_keys: Vec<Value> = Vec::new();
    let mut col_pos: FxHashMap<Value, usize> = FxHashMap::default();

    for row in table.rows() {
        let rk = &row[index_idx];
        let ck = &row[columns_idx];
        if rk.is_null() || ck.is_null() {
            continue;
        }
        if !row_pos.contains_key(rk) {
            row_pos.insert(rk.clone(), row_keys.len());
            row_keys.push(rk.clone());
        }
        if !col_pos.contains_key(ck) {
            col_pos.insert(ck.clone(), col_keys.len());
            col_keys.push(ck.clone());
        }
    }

    row_keys.sort_by(compare_values);
    col_keys.sort_by(compare_values);
    for (i, k) in row_keys.iter().enumerate() {
        row_pos.insert(k.clone(), i);
    }
    for (i, k) in col_keys.iter().enumerate() {
        col_pos.insert(k.clone(), i);
    }

    let mut cells: FxHashMap<(usize, usize), Accumulator> = FxHashMap::default();
    for row in table.rows() {
        let rk = &row[index_idx];
        let ck = &row[columns_idx];
        if rk.is_null() || ck.is_null() {
            continue;
        }
        let r = row_pos[rk];
        let c = col_pos[ck];
        cells
            .entry((r, c))
            .or_insert_with(|| Accumulator::new(func))
            .push(&row[values_idx]);
    }

    let mut out_columns = vec![index.to_string()];
    out_columns.extend(col_keys.iter().map(|k| k.display()));
    let mut out = Table::new(out_columns)?;

    for (r, rk) in row_keys.iter().enumerate() {
        let mut row = Vec::with_capacity(1 + col_keys.len());
        row.push(rk.clone());
        for c in 0..col_keys.len() {
            row.push(match cells.get(&(r, c)) {
                Some(acc) => acc.finish(),
                None => fill.clone(),
            });
        }
        out.push_row(row)?;
    }

    Ok(out)
}

/// Unpivots `table`: the identifier columns are repeated for every value
/// column, producing one (identifiers, variable, value) row per cell.
/// Cells are emitted column-major within each source row, preserving all
/// values including fill zeros.
pub fn melt(
    table: &Table,
    id_vars: &[&str],
    var_name: &str,
    value_name: &str,
) -> Result<Table, TableError> {
    let id_indices = id_vars
        .iter()
        .map(|n| table.column_index(n))
        .collect::<Result<Vec<_>, _>>()?;

    let value_columns: Vec<usize> = (0..table.n_cols())
        .filter(|i| !id_indices.contains(i))
        .collect();

    let mut out_columns: Vec<String> = id_vars.iter().map(|n| (*n).to_string()).collect();
    out_columns.push(var_name.to_string());
    out_columns.push(value_name.to_string());
    let mut out = Table::new(out_columns)?;

    for row in table.rows() {
        for &vc in &value_columns {
            let mut melted: Vec<Value> = id_indices.iter().map(|&i| row[i].clone()).collect();
            melted.push(Value::text(table.columns()[vc].clone()));
            melted.push(row[vc].clone());
            out.push_row(melted)?;
        }
    }

    Ok(out)
}
