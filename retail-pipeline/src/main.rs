//! FILENAME: retail-pipeline/src/main.rs
//! PURPOSE: Entry point for the retail data-wrangling run.
//! CONTEXT: One sequential pass over an e-commerce transaction file:
//! load and explore, clean, aggregate, reshape, combine, export. Paths
//! and the input encoding are fixed constants; any failure aborts the
//! run with a non-zero exit status and the whole pipeline is re-run from
//! scratch (reading the same inputs always produces the same outputs).

mod report;
mod stages;

use anyhow::Context;
use std::path::Path;
use table_engine::{join, JoinKind};

const DATA_PATH: &str = "data.csv";
const DATA_ENCODING: &str = "latin1";
const OUT_CSV: &str = "ae6_results.csv";
const OUT_XLSX: &str = "ae6_results.xlsx";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1) Load and explore
    log::info!("loading {} ({})", DATA_PATH, DATA_ENCODING);
    let raw = persistence::load_csv(Path::new(DATA_PATH), DATA_ENCODING)
        .with_context(|| format!("loading {}", DATA_PATH))?;
    report::explore(&raw);

    // 2) Clean
    log::info!("cleaning");
    let clean = stages::clean(&raw)?;
    println!(
        "\nAfter dedup + basic conversions: {:?} (was {:?})",
        clean.shape(),
        raw.shape()
    );

    // 3) Group and aggregate
    log::info!("aggregating");
    let group_country = stages::country_summary(&clean)?;
    println!("\nGroup by Country (avg, sum, count, sum_total):");
    report::preview(&group_country, 10);

    let group_country_custom = stages::country_uniques(&clean)?;
    println!("\nGroup by Country (distinct invoices and customers):");
    report::preview(&group_country_custom, 10);

    // 4) Pivot and melt
    log::info!("reshaping");
    let (pivot_sales, melt_sales) = stages::monthly_sales(&clean)?;
    println!("\nPivot table (TotalLine by Country and YearMonth):");
    report::preview(&pivot_sales, 5);
    println!("\nMelt of the pivot (long form):");
    report::preview(&melt_sales, 5);

    // 5) Combine and merge
    log::info!("combining");
    let concat_demo = stages::concat_demo(&clean)?;
    println!("\nConcat (two country subsets): {:?}", concat_demo.shape());
    report::preview(
        &concat_demo.select(&["InvoiceNo", "Country", "Quantity", "UnitPrice", "TotalLine"])?,
        5,
    );

    let enriched = stages::enrich(&clean, &group_country)?;
    println!("\nMerge LEFT (dataset + per-country metrics):");
    report::preview(
        &enriched.select(&["Country", "TotalLine", "sum_total", "count_rows"])?,
        5,
    );

    let customer_summary = stages::customer_summary(&clean)?;
    let merge_inner = stages::merge_customers(&clean, &customer_summary)?;
    println!("\nMerge INNER (rows with CustomerID + per-customer summary):");
    report::preview(
        &merge_inner.select(&["CustomerID", "TotalLine", "cust_total", "cust_invoices"])?,
        5,
    );

    let merge_outer = join(&group_country, &group_country_custom, "Country", JoinKind::Outer)?;
    println!("\nMerge OUTER (two country summaries):");
    report::preview(&merge_outer, 5);

    // 6) Export
    log::info!("exporting");
    persistence::save_csv(&enriched, Path::new(OUT_CSV))
        .with_context(|| format!("writing {}", OUT_CSV))?;
    persistence::save_xlsx(
        &[
            ("dataset_enriched", &enriched),
            ("group_country", &group_country),
            ("group_country_custom", &group_country_custom),
            ("pivot_country_month", &pivot_sales),
            ("melt_pivot", &melt_sales),
            ("concat_demo", &concat_demo),
            ("merge_outer_demo", &merge_outer),
        ],
        Path::new(OUT_XLSX),
    )
    .with_context(|| format!("writing {}", OUT_XLSX))?;

    println!("\nExported:\n{}\n{}", OUT_CSV, OUT_XLSX);
    Ok(())
}
