//! FILENAME: retail-pipeline/src/stages.rs
//! PURPOSE: The concrete transformation stages of the retail run.
//! CONTEXT: Each stage is a pure function from table(s) to table built on
//! the table-engine primitives: cleaning, the two country summaries, the
//! monthly pivot and its melt, the concat demo and the three join frames.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use table_engine::{concat, group_by, join, melt, pivot, AggFn, AggSpec, JoinKind, Table, Value};

/// Timestamp layouts accepted by the permissive InvoiceDate parse.
const DATE_TIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

fn parse_invoice_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Nullable-integer coercion for the customer identifier. Integral floats
/// truncate, numeric text parses; anything else becomes Null.
fn coerce_customer_id(value: &Value) -> Value {
    match value {
        Value::Int(i) => Value::Int(*i),
        Value::Float(f) => {
            let n = f.as_f64();
            if n.fract() == 0.0 {
                Value::Int(n as i64)
            } else {
                Value::Null
            }
        }
        Value::Text(s) => s.trim().parse::<i64>().map(Value::Int).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Cleaning pass, in order: exact-duplicate removal, permissive timestamp
/// parse (unparsable -> Null), CustomerID coercion to nullable integer,
/// and the derived TotalLine = Quantity * UnitPrice column. No rows are
/// dropped except exact duplicates.
pub fn clean(raw: &Table) -> Result<Table> {
    let t = raw.dedup();
    let t = t.map_column("InvoiceDate", |v| match v {
        Value::Text(s) => parse_invoice_date(s)
            .map(Value::DateTime)
            .unwrap_or(Value::Null),
        Value::DateTime(dt) => Value::DateTime(*dt),
        _ => Value::Null,
    })?;
    let t = t.map_column("CustomerID", coerce_customer_id)?;

    let qty = t.column_index("Quantity")?;
    let price = t.column_index("UnitPrice")?;
    let totals: Vec<Value> = t.rows().iter().map(|r| r[qty].mul(&r[price])).collect();
    Ok(t.with_column("TotalLine", totals)?)
}

/// Per-country metrics, sorted descending by total sales.
pub fn country_summary(clean: &Table) -> Result<Table> {
    let specs = [
        AggSpec::new("avg_unit_price", "UnitPrice", AggFn::Mean),
        AggSpec::new("sum_quantity", "Quantity", AggFn::Sum),
        AggSpec::new("count_rows", "InvoiceNo", AggFn::Count),
        AggSpec::new("sum_total", "TotalLine", AggFn::Sum),
    ];
    Ok(group_by(clean, &["Country"], &specs)?.sort_desc_by("sum_total")?)
}

/// Per-country distinct counts (invoices and customers), sorted descending
/// by distinct invoices.
pub fn country_uniques(clean: &Table) -> Result<Table> {
    let specs = [
        AggSpec::new("invoices_unique", "InvoiceNo", AggFn::CountDistinct),
        AggSpec::new("customers_unique", "CustomerID", AggFn::CountDistinct),
    ];
    Ok(group_by(clean, &["Country"], &specs)?.sort_desc_by("invoices_unique")?)
}

/// Per-customer totals, restricted to rows that carry a CustomerID.
pub fn customer_summary(clean: &Table) -> Result<Table> {
    let with_id = clean.drop_nulls(&["CustomerID"])?;
    let specs = [
        AggSpec::new("cust_total", "TotalLine", AggFn::Sum),
        AggSpec::new("cust_invoices", "InvoiceNo", AggFn::CountDistinct),
    ];
    Ok(group_by(&with_id, &["CustomerID"], &specs)?)
}

/// Country x month cross-tabulation of TotalLine plus its long-form
/// inverse. Rows without a parsed InvoiceDate are dropped before
/// bucketing, so the pivot never sees a null time bucket.
pub fn monthly_sales(clean: &Table) -> Result<(Table, Table)> {
    let base = clean.drop_nulls(&["InvoiceDate"])?;
    let buckets: Vec<Value> = base
        .column("InvoiceDate")?
        .iter()
        .map(|v| match v {
            Value::DateTime(dt) => Value::Text(dt.format("%Y-%m").to_string()),
            _ => Value::Null,
        })
        .collect();
    let base = base.with_column("YearMonth", buckets)?;

    let pivot_sales = pivot(
        &base,
        "Country",
        "YearMonth",
        "TotalLine",
        AggFn::Sum,
        Value::Int(0),
    )?;
    let melt_sales = melt(&pivot_sales, &["Country"], "YearMonth", "TotalLine_sum")?;
    Ok((pivot_sales, melt_sales))
}

/// Concatenation demo: the first 100 rows of each of the first two
/// distinct countries, stacked. Falls back to a plain head slice when the
/// dataset has fewer than two countries.
pub fn concat_demo(clean: &Table) -> Result<Table> {
    let mut countries: Vec<Value> = Vec::new();
    for v in clean.column("Country")? {
        if !v.is_null() && !countries.contains(v) {
            countries.push(v.clone());
        }
    }

    let first = match countries.first() {
        Some(c) => clean.filter_eq("Country", c)?.head(100),
        None => clean.head(100),
    };
    let second = match countries.get(1) {
        Some(c) => clean.filter_eq("Country", c)?.head(100),
        None => clean.head(100),
    };
    Ok(concat(&[&first, &second])?)
}

/// Enrichment: left-joins the per-country sum_total and count_rows onto
/// every transaction row.
pub fn enrich(clean: &Table, country: &Table) -> Result<Table> {
    let summary = country.select(&["Country", "sum_total", "count_rows"])?;
    Ok(join(clean, &summary, "Country", JoinKind::Left)?)
}

/// Inner merge of CustomerID-bearing rows with the per-customer summary.
pub fn merge_customers(clean: &Table, customers: &Table) -> Result<Table> {
    let with_id = clean.drop_nulls(&["CustomerID"])?;
    Ok(join(&with_id, customers, "CustomerID", JoinKind::Inner)?)
}
