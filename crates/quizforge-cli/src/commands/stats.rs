//! The `quizforge stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizforge_core::corpus::{load_bank, CorpusSummary};

pub fn execute(bank: PathBuf) -> Result<()> {
    let records = load_bank(&bank)?;
    println!("Bank: {} ({} records)", bank.display(), records.len());
    print_summary(&CorpusSummary::from_records(&records, 0));
    Ok(())
}

/// Category and difficulty tables for a bank summary.
pub(crate) fn print_summary(summary: &CorpusSummary) {
    let mut categories = Table::new();
    categories.set_header(vec!["Category", "Questions"]);
    for (category, count) in &summary.by_category {
        categories.add_row(vec![Cell::new(category), Cell::new(count)]);
    }

    let mut difficulties = Table::new();
    difficulties.set_header(vec!["Difficulty", "Questions"]);
    for (difficulty, count) in &summary.by_difficulty {
        difficulties.add_row(vec![Cell::new(difficulty), Cell::new(count)]);
    }

    println!("\n{categories}");
    println!("\n{difficulties}");
    println!(
        "\nTotal: {} ({} sequences, {} matrices)",
        summary.total, summary.sequences, summary.matrices
    );
}
