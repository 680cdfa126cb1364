//! The `quizforge weakness` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde_json::Value;

use quizforge_core::corpus::load_bank;
use quizforge_core::scoring::{score_band, weighted_score, SectionScore};
use quizforge_core::weakness::{analyze, select_drill, StudyLog};

pub fn execute(log_path: PathBuf, bank: Option<PathBuf>, count: usize) -> Result<()> {
    let log = StudyLog::load(&log_path)?;
    let analysis = analyze(&log);

    println!(
        "Study log: {} ({} session(s), {} tracked question(s))",
        log_path.display(),
        log.history.len(),
        log.question_stats.len()
    );

    print_sessions(&log);

    if analysis.categories.is_empty() {
        println!("\nNo categorized answers yet.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Section", "Category", "Answers", "Accuracy", "Level", "Score"]);
        for c in &analysis.categories {
            table.add_row(vec![
                Cell::new(&c.section),
                Cell::new(&c.category),
                Cell::new(c.attempts),
                Cell::new(format!("{}%", c.accuracy)),
                Cell::new(c.level),
                Cell::new(format!("{:.1}", c.score)),
            ]);
        }
        println!("\n{table}");
    }

    if !analysis.questions.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Question", "Attempts", "Accuracy", "Streak", "Level"]);
        for q in analysis.questions.iter().take(count) {
            table.add_row(vec![
                Cell::new(&q.question_id),
                Cell::new(q.attempts),
                Cell::new(format!("{}%", q.accuracy)),
                Cell::new(q.streak),
                Cell::new(q.level),
            ]);
        }
        println!("\n{table}");
    }

    if let Some(bank) = bank {
        let records = load_bank(&bank)?;
        let ids = records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_str));
        let drill = select_drill(ids, &log.question_stats, count);
        println!("\nDrill ({} question(s)):", drill.len());
        for id in &drill {
            println!("  {id}");
        }
    }

    Ok(())
}

fn print_sessions(log: &StudyLog) {
    if log.history.is_empty() {
        return;
    }

    let mut totals: HashMap<String, SectionScore> = HashMap::new();
    let mut table = Table::new();
    table.set_header(vec!["Section", "Date", "Score", "Band"]);
    for session in &log.history {
        let correct = session.correct();
        let total = session.answers.len() as u32;
        let entry = totals.entry(session.section.clone()).or_default();
        entry.correct += correct;
        entry.total += total;

        table.add_row(vec![
            Cell::new(&session.section),
            Cell::new(
                session
                    .date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format!("{correct}/{total}")),
            Cell::new(score_band(&session.section, correct, total)),
        ]);
    }
    println!("\n{table}");
    println!("Weighted score: {}/100", weighted_score(&totals));
}
