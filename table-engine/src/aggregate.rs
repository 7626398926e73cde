//! FILENAME: table-engine/src/aggregate.rs
//! PURPOSE: Group-by with named aggregate outputs.
//! CONTEXT: This module implements the aggregation contract: a grouping key
//! (one or more columns) plus a mapping of output name -> (source column,
//! aggregation function) yields one row per distinct key tuple. Groups keep
//! first-appearance order; a separate stable sort reorders them if needed.

use crate::table::{Table, TableError};
use crate::value::Value;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Supported aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggFn {
    Mean,
    Sum,
    Count,
    CountDistinct,
}

/// One aggregate output: `output` column computed as `func` over `source`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggSpec {
    pub output: String,
    pub source: String,
    pub func: AggFn,
}

impl AggSpec {
    pub fn new(output: &str, source: &str, func: AggFn) -> Self {
        AggSpec {
            output: output.to_string(),
            source: source.to_string(),
            func,
        }
    }
}

/// Streaming accumulator for a single (group, spec) pair.
///
/// Count and CountDistinct count non-null source values. Mean ignores
/// non-numeric cells and yields Null when no numeric value was seen.
/// Sum stays Int while every summed cell is Int, and an empty or all-null
/// group sums to 0.
#[derive(Debug)]
pub(crate) struct Accumulator {
    func: AggFn,
    sum: f64,
    int_sum: i64,
    all_int: bool,
    numeric_count: usize,
    non_null_count: usize,
    distinct: FxHashSet<Value>,
}

impl Accumulator {
    pub(crate) fn new(func: AggFn) -> Self {
        Accumulator {
            func,
            sum: 0.0,
            int_sum: 0,
            all_int: true,
            numeric_count: 0,
            non_null_count: 0,
            distinct: FxHashSet::default(),
        }
    }

    pub(crate) fn push(&mut self, value: &Value) {
        if value.is_null() {
            return;
        }
        self.non_null_count += 1;
        match self.func {
            AggFn::Count => {}
            AggFn::CountDistinct => {
                self.distinct.insert(value.clone());
            }
            AggFn::Sum | AggFn::Mean => {
                if let Some(n) = value.as_f64() {
                    self.numeric_count += 1;
                    self.sum += n;
                    match value {
                        Value::Int(i) => self.int_sum = self.int_sum.wrapping_add(*i),
                        _ => self.all_int = false,
                    }
                }
            }
        }
    }

    pub(crate) fn finish(&self) -> Value {
        match self.func {
            AggFn::Sum => {
                if self.all_int {
                    Value::Int(self.int_sum)
                } else {
                    Value::float(self.sum)
                }
            }
            AggFn::Mean => {
                if self.numeric_count == 0 {
                    Value::Null
                } else {
                    Value::float(self.sum / self.numeric_count as f64)
                }
            }
            AggFn::Count => Value::Int(self.non_null_count as i64),
            AggFn::CountDistinct => Value::Int(self.distinct.len() as i64),
        }
    }
}

type GroupKey = SmallVec<[Value; 2]>;

/// Partitions rows by equal values of the key columns and computes one row
/// of aggregates per partition. Output rows appear in the order each key
/// tuple was first seen. Null key values form their own bucket; they are
/// not dropped.
pub fn group_by(table: &Table, keys: &[&str], specs: &[AggSpec]) -> Result<Table, TableError> {
    let key_indices = keys
        .iter()
        .map(|k| table.column_index(k))
        .collect::<Result<Vec<_>, _>>()?;
    let source_indices = specs
        .iter()
        .map(|s| table.column_index(&s.source))
        .collect::<Result<Vec<_>, _>>()?;

    let mut group_index: FxHashMap<GroupKey, usize> = FxHashMap::default();
    let mut group_keys: Vec<GroupKey> = Vec::new();
    let mut group_accs: Vec<Vec<Accumulator>> = Vec::new();

    for row in table.rows() {
        let key: GroupKey = key_indices.iter().map(|&i| row[i].clone()).collect();
        let group = *group_index.entry(key.clone()).or_insert_with(|| {
            group_keys.push(key);
            group_accs.push(specs.iter().map(|s| Accumulator::new(s.func)).collect());
            group_keys.len() - 1
        });
        for (acc, &src) in group_accs[group].iter_mut().zip(&source_indices) {
            acc.push(&row[src]);
        }
    }

    let mut columns: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
    columns.extend(specs.iter().map(|s| s.output.clone()));
    let mut out = Table::new(columns)?;

    for (key, accs) in group_keys.iter().zip(&group_accs) {
        let mut row: Vec<Value> = key.iter().cloned().collect();
        row.extend(accs.iter().map(|a| a.finish()));
        out.push_row(row)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> Table {
        let mut t = Table::with_columns(&["Country", "Qty", "Price", "Total"]).unwrap();
        for (country, qty, price) in [("UK", 2, 3.0), ("UK", 1, 3.0), ("FR", 5, 1.0)] {
            let total = Value::Int(qty).mul(&Value::float(price));
            t.push_row(vec![
                Value::text(country),
                Value::Int(qty),
                Value::float(price),
                total,
            ])
            .unwrap();
        }
        t
    }

    #[test]
    fn test_group_by_country_sums() {
        let specs = [
            AggSpec::new("sum_total", "Total", AggFn::Sum),
            AggSpec::new("sum_quantity", "Qty", AggFn::Sum),
        ];
        let g = group_by(&sales(), &["Country"], &specs).unwrap();
        assert_eq!(g.n_rows(), 2);
        // First-appearance order: UK then FR
        assert_eq!(g.rows()[0][0], Value::text("UK"));
        assert_eq!(g.rows()[0][1], Value::float(9.0));
        assert_eq!(g.rows()[0][2], Value::Int(3));
        assert_eq!(g.rows()[1][0], Value::text("FR"));
        assert_eq!(g.rows()[1][1], Value::float(5.0));
        assert_eq!(g.rows()[1][2], Value::Int(5));
    }

    #[test]
    fn test_mean_and_count() {
        let specs = [
            AggSpec::new("avg_price", "Price", AggFn::Mean),
            AggSpec::new("n", "Qty", AggFn::Count),
        ];
        let g = group_by(&sales(), &["Country"], &specs).unwrap();
        assert_eq!(g.rows()[0][1], Value::float(3.0));
        assert_eq!(g.rows()[0][2], Value::Int(2));
    }

    #[test]
    fn test_count_distinct_ignores_nulls() {
        let mut t = Table::with_columns(&["k", "v"]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Int(1)]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Int(1)]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Int(2)]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Null]).unwrap();
        let specs = [AggSpec::new("u", "v", AggFn::CountDistinct)];
        let g = group_by(&t, &["k"], &specs).unwrap();
        assert_eq!(g.rows()[0][1], Value::Int(2));
    }

    #[test]
    fn test_null_keys_form_their_own_bucket() {
        let mut t = Table::with_columns(&["k", "v"]).unwrap();
        t.push_row(vec![Value::Null, Value::Int(1)]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Int(2)]).unwrap();
        t.push_row(vec![Value::Null, Value::Int(3)]).unwrap();
        let specs = [AggSpec::new("s", "v", AggFn::Sum)];
        let g = group_by(&t, &["k"], &specs).unwrap();
        assert_eq!(g.n_rows(), 2);
        assert_eq!(g.rows()[0][0], Value::Null);
        assert_eq!(g.rows()[0][1], Value::Int(4));
    }

    #[test]
    fn test_mean_of_all_nulls_is_null() {
        let mut t = Table::with_columns(&["k", "v"]).unwrap();
        t.push_row(vec![Value::text("a"), Value::Null]).unwrap();
        let specs = [AggSpec::new("m", "v", AggFn::Mean)];
        let g = group_by(&t, &["k"], &specs).unwrap();
        assert_eq!(g.rows()[0][1], Value::Null);
    }

    #[test]
    fn test_sort_desc_after_group_is_stable() {
        let specs = [AggSpec::new("sum_total", "Total", AggFn::Sum)];
        let g = group_by(&sales(), &["Country"], &specs)
            .unwrap()
            .sort_desc_by("sum_total")
            .unwrap();
        assert_eq!(g.rows()[0][0], Value::text("UK"));
        assert_eq!(g.rows()[1][0], Value::text("FR"));
    }
}
