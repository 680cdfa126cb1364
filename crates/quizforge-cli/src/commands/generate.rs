//! The `quizforge generate` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use quizforge_core::config::load_config_from;
use quizforge_core::corpus::{CorpusAssembler, CorpusOptions, ProgressReporter};
use quizforge_core::error::CorpusError;
use quizforge_core::manifest::{parse_manifest, Batch, Manifest};
use quizforge_core::validation::ValidationIssue;

use super::stats::print_summary;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_batch_start(&self, _: usize, _: &Batch) {}

    fn on_batch_complete(&self, index: usize, batch: &Batch, first_id: &str) {
        eprintln!(
            "  Batch #{}: {} × {} (from {first_id})",
            index + 1,
            batch.count,
            batch.family
        );
    }

    fn on_plan_complete(&self, generated: usize, elapsed: Duration) {
        eprintln!(
            "\nGenerated {generated} question(s) ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub fn execute(
    manifest_path: Option<PathBuf>,
    seed: Option<u32>,
    output: Option<PathBuf>,
    merge: bool,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    let manifest = match manifest_path.or_else(|| config.manifest.clone()) {
        Some(path) => parse_manifest(&path)?,
        None => Manifest::standard(),
    };
    anyhow::ensure!(manifest.total() > 0, "manifest asks for no questions");

    let mut options = CorpusOptions::new(output.unwrap_or_else(|| config.bank_path()));
    options.merge = merge;
    options.seed_override = seed.or(config.seed);

    let assembler = CorpusAssembler::new(manifest, options);
    eprintln!(
        "quizforge v{} — generating with seed {}",
        env!("CARGO_PKG_VERSION"),
        assembler.seed()
    );

    let pending = assembler.plan(&ConsoleReporter)?;

    if dry_run {
        if let Err(e) = pending.validate().into_result() {
            print_issues(e.issues());
            return Err(e.into());
        }
        print_summary(&pending.summary()?);
        println!("\nDry run: nothing written to {}", pending.output().display());
        return Ok(());
    }

    match pending.commit() {
        Ok(outcome) => {
            print_summary(&outcome.summary);
            println!(
                "\nWrote {} new question(s) to {}",
                outcome.summary.new_questions,
                outcome.path.display()
            );
            Ok(())
        }
        Err(e) => {
            if let Some(corpus) = e.downcast_ref::<CorpusError>() {
                print_issues(corpus.issues());
            }
            Err(e)
        }
    }
}

fn print_issues(issues: &[ValidationIssue]) {
    eprintln!("\nValidation failed:");
    for issue in issues {
        eprintln!("  {issue}");
    }
}
