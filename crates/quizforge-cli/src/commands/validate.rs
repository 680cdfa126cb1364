//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::corpus::load_bank;
use quizforge_core::validation::validate_records;

pub fn execute(bank: PathBuf) -> Result<()> {
    let records = load_bank(&bank)?;
    println!("Bank: {} ({} records)", bank.display(), records.len());

    let report = validate_records(&records);
    for issue in &report.issues {
        let id = if issue.question_id.is_empty() {
            "<no id>"
        } else {
            issue.question_id.as_str()
        };
        println!("  [{id}] {}: {}", issue.invariant, issue.detail);
    }

    let checked = report.checked;
    if !report.is_clean() {
        println!("\n{} issue(s) found.", report.error_count());
    }
    report.into_result()?;
    println!("All {checked} records valid.");
    Ok(())
}
