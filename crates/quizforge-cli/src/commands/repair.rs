//! The `quizforge repair` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizforge_core::repair::repair_files;

pub fn execute(banks: Vec<PathBuf>, check: bool) -> Result<()> {
    let report = repair_files(&banks, !check)?;

    println!(
        "Checked {} record(s) across {} bank(s)",
        report.records,
        banks.len()
    );

    if !report.by_fix.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Fix", "Count"]);
        for (fix, count) in &report.by_fix {
            table.add_row(vec![Cell::new(fix), Cell::new(count)]);
        }
        println!("\n{table}");
    }

    for id in &report.skipped {
        println!("  [{id}] unusable correct index, explanation fixes skipped");
    }

    let fixes = report.fixes();
    if fixes == 0 {
        println!("Nothing to repair.");
    } else if check {
        anyhow::bail!("{fixes} fix(es) needed; rerun without --check to apply");
    } else {
        println!("Applied {fixes} fix(es).");
    }
    Ok(())
}
