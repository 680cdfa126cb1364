//! Corpus assembler.
//!
//! Runs a manifest through the pattern families on one seeded stream,
//! numbers the questions, validates the batch, and writes the bank. The
//! work is split into [`CorpusAssembler::plan`] and [`PendingBatch::commit`]
//! so callers can inspect (or tamper with) a batch before it is written.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::manifest::{Batch, Manifest};
use crate::model::{Prompt, Question};
use crate::rng::SeededRng;
use crate::validation::{validate_batch, ValidationReport};

/// Options for one assembler run.
#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// Bank file to write (and to merge with).
    pub output: PathBuf,
    /// Append after the records already in `output`.
    pub merge: bool,
    /// Replaces the manifest seed when set.
    pub seed_override: Option<u32>,
}

impl CorpusOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            merge: false,
            seed_override: None,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_batch_start(&self, index: usize, batch: &Batch);
    fn on_batch_complete(&self, index: usize, batch: &Batch, first_id: &str);
    fn on_plan_complete(&self, generated: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_batch_start(&self, _: usize, _: &Batch) {}
    fn on_batch_complete(&self, _: usize, _: &Batch, _: &str) {}
    fn on_plan_complete(&self, _: usize, _: Duration) {}
}

/// Drives a manifest end to end.
pub struct CorpusAssembler {
    manifest: Manifest,
    options: CorpusOptions,
}

impl CorpusAssembler {
    pub fn new(manifest: Manifest, options: CorpusOptions) -> Self {
        Self { manifest, options }
    }

    pub fn seed(&self) -> u32 {
        self.options.seed_override.unwrap_or(self.manifest.seed)
    }

    /// Load the existing bank when merging, generate every batch in order,
    /// and assign ids. Nothing is written.
    pub fn plan(&self, progress: &dyn ProgressReporter) -> Result<PendingBatch> {
        let start = Instant::now();
        let prefix = &self.manifest.prefix;

        let existing = if self.options.merge {
            load_bank(&self.options.output)
                .context("cannot merge into the existing bank")?
        } else {
            Vec::new()
        };
        let base = max_suffix(&existing, prefix);

        let seed = self.seed();
        let mut rng = SeededRng::new(seed);
        tracing::info!(
            seed,
            prefix = %prefix,
            questions = self.manifest.total(),
            existing = existing.len(),
            "planning corpus"
        );

        let mut questions = Vec::with_capacity(self.manifest.total());
        for (index, batch) in self.manifest.batches.iter().enumerate() {
            progress.on_batch_start(index, batch);
            let first_id = format_id(prefix, id_number(base, questions.len())?);
            for _ in 0..batch.count {
                let mut question = batch
                    .family
                    .generate(&mut rng)
                    .with_context(|| format!("batch #{index} ({}) failed", batch.family))?;
                question.id = format_id(prefix, id_number(base, questions.len())?);
                questions.push(question);
            }
            tracing::debug!("batch #{index}: {} × {}", batch.count, batch.family);
            progress.on_batch_complete(index, batch, &first_id);
        }

        progress.on_plan_complete(questions.len(), start.elapsed());
        Ok(PendingBatch {
            questions,
            existing,
            output: self.options.output.clone(),
        })
    }

    /// Plan and commit in one step.
    pub fn run(&self, progress: &dyn ProgressReporter) -> Result<WriteOutcome> {
        self.plan(progress)?.commit()
    }
}

/// A generated, numbered, not yet validated batch.
#[derive(Debug, Clone)]
pub struct PendingBatch {
    /// New questions, in generation order.
    pub questions: Vec<Question>,
    existing: Vec<Value>,
    output: PathBuf,
}

impl PendingBatch {
    /// Records loaded from the bank being merged into.
    pub fn existing(&self) -> &[Value] {
        &self.existing
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run the batch validator; existing ids are reserved.
    pub fn validate(&self) -> ValidationReport {
        let reserved: HashSet<String> = self
            .existing
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        validate_batch(&self.questions, &reserved)
    }

    /// Summary of the bank this batch would produce.
    pub fn summary(&self) -> Result<CorpusSummary> {
        let records = self.records()?;
        Ok(CorpusSummary::from_records(&records, self.questions.len()))
    }

    /// Validate and, only if clean, write the merged bank.
    pub fn commit(self) -> Result<WriteOutcome> {
        let report = self.validate();
        if !report.is_clean() {
            tracing::error!(
                errors = report.error_count(),
                path = %self.output.display(),
                "validation failed, nothing written"
            );
        }
        report.into_result()?;

        let records = self.records()?;
        write_bank(&self.output, &records)?;
        let summary = CorpusSummary::from_records(&records, self.questions.len());
        tracing::info!(
            new = summary.new_questions,
            total = summary.total,
            path = %self.output.display(),
            "bank written"
        );
        Ok(WriteOutcome {
            path: self.output,
            summary,
        })
    }

    fn records(&self) -> Result<Vec<Value>> {
        let mut records = self.existing.clone();
        for q in &self.questions {
            records.push(
                serde_json::to_value(q)
                    .with_context(|| format!("failed to serialize question {}", q.id))?,
            );
        }
        Ok(records)
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub summary: CorpusSummary,
}

/// Counts over a bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    /// Questions added by this run.
    pub new_questions: usize,
    pub total: usize,
    pub sequences: usize,
    pub matrices: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<String, usize>,
}

impl CorpusSummary {
    pub fn from_records(records: &[Value], new_questions: usize) -> Self {
        let mut summary = Self {
            new_questions,
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            if record.get("sequence").is_some_and(|v| !v.is_null()) {
                summary.sequences += 1;
            }
            if record.get("matrix").is_some_and(|v| !v.is_null()) {
                summary.matrices += 1;
            }
            let field = |name: &str| {
                record
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string()
            };
            *summary.by_category.entry(field("category")).or_default() += 1;
            *summary.by_difficulty.entry(field("difficulty")).or_default() += 1;
        }
        summary
    }

    /// Summary of typed questions, all counted as new.
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut summary = Self {
            new_questions: questions.len(),
            total: questions.len(),
            ..Self::default()
        };
        for q in questions {
            match q.prompt {
                Prompt::Sequence(_) => summary.sequences += 1,
                Prompt::Matrix(_) => summary.matrices += 1,
            }
            *summary
                .by_category
                .entry(q.category.to_string())
                .or_default() += 1;
            *summary
                .by_difficulty
                .entry(q.difficulty.to_string())
                .or_default() += 1;
        }
        summary
    }
}

/// `<prefix>-<n>` with `n` padded to three digits.
pub fn format_id(prefix: &str, n: u32) -> String {
    format!("{prefix}-{n:03}")
}

/// Number of the `offset`-th new question after the highest existing `base`.
fn id_number(base: u32, offset: usize) -> Result<u32> {
    u32::try_from(offset)
        .ok()
        .and_then(|offset| base.checked_add(offset))
        .and_then(|n| n.checked_add(1))
        .with_context(|| format!("id numbering overflows: {offset} new id(s) after {base}"))
}

/// Largest numeric suffix among ids carrying `prefix`, or 0.
pub fn max_suffix(records: &[Value], prefix: &str) -> u32 {
    let head = format!("{prefix}-");
    records
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_str))
        .filter_map(|id| id.strip_prefix(&head))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Load a bank as raw records, keeping unknown fields and key order.
pub fn load_bank(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank from {}", path.display()))?;
    let records: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse bank JSON: {}", path.display()))?;
    Ok(records)
}

/// Bank text: 2-space indented JSON array plus a trailing newline.
pub fn render_bank<T: Serialize>(records: &[T]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(records).context("failed to serialize bank")?;
    json.push('\n');
    Ok(json)
}

/// Write a bank through a temporary file renamed over `path`.
pub fn write_bank<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = render_bank(records)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .context("failed to write temporary bank file")?;
    tmp.persist(path)
        .with_context(|| format!("failed to write bank to {}", path.display()))?;
    Ok(())
}
