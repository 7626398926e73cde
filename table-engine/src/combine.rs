//! FILENAME: table-engine/src/combine.rs
//! PURPOSE: Vertical concatenation and key-based joins.
//! CONTEXT: `concat` stacks row sets over the union of their schemas;
//! `join` implements SQL-style left/inner/outer semantics on one key
//! column. Null keys never match (relational null semantics) and duplicate
//! keys fan out to the full Cartesian product of their matches.

use crate::table::{Table, TableError};
use crate::value::Value;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Left,
    Inner,
    Outer,
}

/// Stacks tables vertically. The output schema is the union of the input
/// columns in first-appearance order; a row missing a column gets Null
/// there. Row order follows the input tables, each table's internal order
/// preserved.
pub fn concat(tables: &[&Table]) -> Result<Table, TableError> {
    let mut columns: Vec<String> = Vec::new();
    for table in tables {
        for name in table.columns() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }

    let mut out = Table::new(columns)?;
    for table in tables {
        // Position of each output column within this table, if present.
        let mapping: Vec<Option<usize>> = out
            .columns()
            .iter()
            .map(|name| table.columns().iter().position(|c| c == name))
            .collect();
        let rows: Vec<Vec<Value>> = table
            .rows()
            .iter()
            .map(|row| {
                mapping
                    .iter()
                    .map(|src| match src {
                        Some(i) => row[*i].clone(),
                        None => Value::Null,
                    })
                    .collect()
            })
            .collect();
        for row in rows {
            out.push_row(row)?;
        }
    }
    Ok(out)
}

/// Joins two tables on the column `on`, which must exist on both sides.
/// The output holds all left columns followed by the right's non-key
/// columns; a non-key name collision is a `DuplicateColumn` error.
///
/// Left: every left row appears once per matching right row, or once with
/// Null right columns when nothing matches. Inner: only matched pairs.
/// Outer: left semantics plus one row per unmatched right row, with Null
/// left columns and the key taken from the right side.
pub fn join(left: &Table, right: &Table, on: &str, kind: JoinKind) -> Result<Table, TableError> {
    let left_key = left.column_index(on)?;
    let right_key = right.column_index(on)?;

    let right_value_cols: Vec<usize> = (0..right.n_cols()).filter(|&i| i != right_key).collect();

    let mut columns: Vec<String> = left.columns().to_vec();
    columns.extend(right_value_cols.iter().map(|&i| right.columns()[i].clone()));
    // Table::new rejects colliding non-key column names.
    let mut out = Table::new(columns)?;

    // Key -> right row indices, in right row order. Null keys never match.
    let mut right_index: FxHashMap<&Value, Vec<usize>> = FxHashMap::default();
    for (i, row) in right.rows().iter().enumerate() {
        let key = &row[right_key];
        if !key.is_null() {
            right_index.entry(key).or_default().push(i);
        }
    }

    let mut right_matched = vec![false; right.n_rows()];

    for row in left.rows() {
        let key = &row[left_key];
        let matches = if key.is_null() {
            None
        } else {
            right_index.get(key)
        };

        match matches {
            Some(indices) => {
                for &ri in indices {
                    right_matched[ri] = true;
                    let mut joined = row.clone();
                    joined.extend(
                        right_value_cols
                            .iter()
                            .map(|&c| right.rows()[ri][c].clone()),
                    );
                    out.push_row(joined)?;
                }
            }
            None => {
                if matches!(kind, JoinKind::Left | JoinKind::Outer) {
                    let mut joined = row.clone();
                    joined.extend(std::iter::repeat(Value::Null).take(right_value_cols.len()));
                    out.push_row(joined)?;
                }
            }
        }
    }

    if kind == JoinKind::Outer {
        for (ri, row) in right.rows().iter().enumerate() {
            if right_matched[ri] {
                continue;
            }
            let mut joined = vec![Value::Null; left.n_cols()];
            joined[left_key] = row[right_key].clone();
            joined.extend(right_value_cols.iter().map(|&c| row[c].clone()));
            out.push_row(joined)?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_table() -> Table {
        let mut t = Table::with_columns(&["k", "l"]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Int(1)]).unwrap();
        t.push_row(vec![Value::text("b"), Value::Int(2)]).unwrap();
        t.push_row(vec![Value::Null, Value::Int(3)]).unwrap();
        t
    }

    fn right_table() -> Table {
        let mut t = Table::with_columns(&["k", "r"]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Int(10)]).unwrap();
        t.push_row(vec![Value::text("c"), Value::Int(30)]).unwrap();
        t.push_row(vec![Value::Null, Value::Int(40)]).unwrap();
        t
    }

    #[test]
    fn test_concat_union_of_columns() {
        let mut a = Table::with_columns(&["x", "y"]).unwrap();
        a.push_row(vec![Value::Int(1), Value::Int(2)]).unwrap();
        let mut b = Table::with_columns(&["y", "z"]).unwrap();
        b.push_row(vec![Value::Int(3), Value::Int(4)]).unwrap();

        let c = concat(&[&a, &b]).unwrap();
        assert_eq!(
            c.columns(),
            &["x".to_string(), "y".to_string(), "z".to_string()]
        );
        assert_eq!(c.rows()[0], vec![Value::Int(1), Value::Int(2), Value::Null]);
        assert_eq!(c.rows()[1], vec![Value::Null, Value::Int(3), Value::Int(4)]);
    }

    #[test]
    fn test_left_join_keeps_unmatched_left() {
        let j = join(&left_table(), &right_table(), "k", JoinKind::Left).unwrap();
        assert_eq!(j.n_rows(), 3);
        assert_eq!(j.rows()[0], vec![Value::text("a"), Value::Int(1), Value::Int(10)]);
        // "b" has no match: right column null
        assert_eq!(j.rows()[1], vec![Value::text("b"), Value::Int(2), Value::Null]);
        // null key never matches, row still retained
        assert_eq!(j.rows()[2], vec![Value::Null, Value::Int(3), Value::Null]);
    }

    #[test]
    fn test_inner_join_excludes_null_keys() {
        let j = join(&left_table(), &right_table(), "k", JoinKind::Inner).unwrap();
        assert_eq!(j.n_rows(), 1);
        assert_eq!(j.rows()[0][0], Value::text("a"));
    }

    #[test]
    fn test_outer_join_is_key_union() {
        let j = join(&left_table(), &right_table(), "k", JoinKind::Outer).unwrap();
        // a (matched), b (left only), null-left, c (right only), null-right
        assert_eq!(j.n_rows(), 5);
        assert_eq!(j.rows()[3], vec![Value::text("c"), Value::Null, Value::Int(30)]);
        assert_eq!(j.rows()[4], vec![Value::Null, Value::Null, Value::Int(40)]);
    }

    #[test]
    fn test_join_fans_out_duplicate_keys() {
        let mut l = Table::with_columns(&["k", "l"]).unwrap();
        l.push_row(vec![Value::text("a"), Value::Int(1)]).unwrap();
        l.push_row(vec![Value::text("a"), Value::Int(2)]).unwrap();
        let mut r = Table::with_columns(&["k", "r"]).unwrap();
        r.push_row(vec![Value::text("a"), Value::Int(10)]).unwrap();
        r.push_row(vec![Value::text("a"), Value::Int(20)]).unwrap();

        let j = join(&l, &r, "k", JoinKind::Inner).unwrap();
        // Full Cartesian product of matches for the key
        assert_eq!(j.n_rows(), 4);
        assert_eq!(j.rows()[0], vec![Value::text("a"), Value::Int(1), Value::Int(10)]);
        assert_eq!(j.rows()[1], vec![Value::text("a"), Value::Int(1), Value::Int(20)]);
        assert_eq!(j.rows()[2], vec![Value::text("a"), Value::Int(2), Value::Int(10)]);
        assert_eq!(j.rows()[3], vec![Value::text("a"), Value::Int(2), Value::Int(20)]);
    }

    #[test]
    fn test_left_join_cardinality_without_duplicates() {
        // Right side has unique keys: output row count equals left row count.
        let j = join(&left_table(), &right_table(), "k", JoinKind::Left).unwrap();
        assert_eq!(j.n_rows(), left_table().n_rows());
    }

    #[test]
    fn test_join_rejects_colliding_columns() {
        let mut l = Table::with_columns(&["k", "v"]).unwrap();
        l.push_row(vec![Value::text("a"), Value::Int(1)]).unwrap();
        let mut r = Table::with_columns(&["k", "v"]).unwrap();
        r.push_row(vec![Value::text("a"), Value::Int(2)]).unwrap();
        assert!(matches!(
            join(&l, &r, "k", JoinKind::Inner),
            Err(TableError::DuplicateColumn(_))
        ));
    }
}
