//! FILENAME: retail-pipeline/src/report.rs
//! PURPOSE: Console rendering of exploratory output.
//! CONTEXT: The exploration report (shape, head rows, null counts) and the
//! per-stage previews are the program's observable output and go to
//! stdout; cells are clipped so wide description columns stay readable.

use table_engine::Table;

/// Longest rendered cell before clipping.
const MAX_CELL_WIDTH: usize = 24;

/// Prints shape, the first five rows and the per-column null counts
/// (sorted descending) of a freshly loaded table.
pub fn explore(table: &Table) {
    println!("Dataset loaded: {:?}", table.shape());
    println!("\nFirst 5 rows:");
    preview(table, 5);
    println!("\nNull values per column:");
    for (name, count) in table.null_counts() {
        println!("  {:<16} {}", name, count);
    }
}

/// Prints the header and the first `n` rows as aligned columns.
pub fn preview(table: &Table, n: usize) {
    let head = table.head(n);

    let mut widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|c| clip(c).chars().count())
        .collect();
    for row in head.rows() {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(clip(&value.display()).chars().count());
        }
    }

    let header: Vec<String> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<width$}", clip(c), width = widths[i]))
        .collect();
    println!("  {}", header.join("  "));

    for row in head.rows() {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:<width$}", clip(&v.display()), width = widths[i]))
            .collect();
        println!("  {}", cells.join("  "));
    }

    if table.n_rows() > n {
        println!("  ... ({} rows total)", table.n_rows());
    }
}

fn clip(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_short_strings_unchanged() {
        assert_eq!(clip("Country"), "Country");
    }

    #[test]
    fn test_clip_long_strings() {
        let long = "X".repeat(40);
        let clipped = clip(&long);
        assert_eq!(clipped.chars().count(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
    }
}
