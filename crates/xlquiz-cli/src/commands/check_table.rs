//! The `xlquiz check-table` command.
//!
//! Accepts a CSV or a spreadsheet (`.xlsx`, `.xlsm`, `.xls`, `.ods`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table as TextTable};

use xlquiz_core::table::{validate, Table};

pub fn execute(file: PathBuf) -> Result<()> {
    let table = Table::from_path(&file)
        .with_context(|| format!("failed to read table from {}", file.display()))?;

    println!(
        "Loaded {} rows, columns: {}",
        table.len(),
        table.headers().join(", ")
    );

    let validation = validate(&table);
    println!("{}", validation.note);

    if let Some(monthly) = &validation.monthly {
        let mut out = TextTable::new();
        out.set_header(vec!["Month", "Total"]);
        for m in monthly {
            out.add_row(vec![
                Cell::new(m.month.format("%Y-%m")),
                Cell::new(m.total),
            ]);
        }
        println!("{out}");
    }

    if !validation.ok {
        std::process::exit(1);
    }

    Ok(())
}
