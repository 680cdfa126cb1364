//! Generation manifest parser.
//!
//! A manifest fixes the id prefix, the seed, and an ordered list of
//! batches. Batches run strictly in file order.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::model::Difficulty;
use crate::patterns::{Direction, PatternFamily};

/// Seed of the standard abstract-reasoning corpus.
pub const STANDARD_SEED: u32 = 99_721;

/// Id prefix of the standard abstract-reasoning corpus.
pub const STANDARD_PREFIX: &str = "ar";

/// Intermediate TOML structure for manifest files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlManifest {
    corpus: TomlCorpus,
    #[serde(default)]
    batches: Vec<TomlBatch>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlCorpus {
    #[serde(default = "default_prefix")]
    prefix: String,
    #[serde(default = "default_seed")]
    seed: u32,
}

fn default_prefix() -> String {
    STANDARD_PREFIX.to_string()
}

fn default_seed() -> u32 {
    STANDARD_SEED
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlBatch {
    family: String,
    count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    difficulty: Option<String>,
}

/// A run of `count` questions from one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub family: PatternFamily,
    pub count: usize,
}

/// How many questions of which family to produce, and in what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub prefix: String,
    pub seed: u32,
    pub batches: Vec<Batch>,
}

impl Manifest {
    /// The 120-question abstract-reasoning distribution.
    pub fn standard() -> Self {
        use PatternFamily::*;
        let batch = |family, count| Batch { family, count };
        Self {
            prefix: STANDARD_PREFIX.to_string(),
            seed: STANDARD_SEED,
            batches: vec![
                batch(ColorCycle { prompt_length: 3 }, 8),
                batch(ColorCycle { prompt_length: 4 }, 7),
                batch(SizeProgression { direction: Direction::Forward }, 5),
                batch(SizeProgression { direction: Direction::Reverse }, 5),
                batch(RotationProgression, 15),
                batch(ShapeSequence, 15),
                batch(Alternation, 15),
                batch(AbcCycle, 10),
                batch(MultiAttribute, 20),
                batch(Matrix { difficulty: Difficulty::Easy }, 7),
                batch(Matrix { difficulty: Difficulty::Medium }, 8),
                batch(Matrix { difficulty: Difficulty::Hard }, 5),
            ],
        }
    }

    /// Total number of questions the manifest asks for.
    pub fn total(&self) -> usize {
        self.batches.iter().map(|b| b.count).sum()
    }

    /// Render back to the TOML manifest format.
    pub fn to_toml_string(&self) -> Result<String> {
        let file = TomlManifest {
            corpus: TomlCorpus {
                prefix: self.prefix.clone(),
                seed: self.seed,
            },
            batches: self.batches.iter().map(to_toml_batch).collect(),
        };
        toml::to_string_pretty(&file).context("failed to serialize manifest")
    }
}

fn to_toml_batch(batch: &Batch) -> TomlBatch {
    let mut out = TomlBatch {
        family: batch.family.name().to_string(),
        count: batch.count,
        prompt_length: None,
        direction: None,
        difficulty: None,
    };
    match batch.family {
        PatternFamily::ColorCycle { prompt_length } => out.prompt_length = Some(prompt_length),
        PatternFamily::SizeProgression { direction } => {
            out.direction = Some(direction.to_string())
        }
        PatternFamily::Matrix { difficulty } | PatternFamily::MixedSequence { difficulty } => {
            out.difficulty = Some(difficulty.to_string())
        }
        _ => {}
    }
    out
}

fn to_family(index: usize, batch: &TomlBatch) -> Result<PatternFamily, GenerationError> {
    let invalid = |message: String| GenerationError::InvalidManifest { index, message };
    let difficulty = || -> Result<Difficulty, GenerationError> {
        batch
            .difficulty
            .as_deref()
            .unwrap_or("medium")
            .parse()
            .map_err(invalid)
    };

    let family = match batch.family.as_str() {
        "color_cycle" => {
            let prompt_length = batch.prompt_length.unwrap_or(3);
            if !(3..=4).contains(&prompt_length) {
                return Err(invalid(format!(
                    "color_cycle prompt_length must be 3 or 4, got {prompt_length}"
                )));
            }
            PatternFamily::ColorCycle { prompt_length }
        }
        "size_progression" => PatternFamily::SizeProgression {
            direction: batch
                .direction
                .as_deref()
                .unwrap_or("forward")
                .parse()
                .map_err(invalid)?,
        },
        "rotation_progression" => PatternFamily::RotationProgression,
        "shape_sequence" => PatternFamily::ShapeSequence,
        "alternation" => PatternFamily::Alternation,
        "abc_cycle" => PatternFamily::AbcCycle,
        "multi_attribute" => PatternFamily::MultiAttribute,
        "matrix" => PatternFamily::Matrix {
            difficulty: difficulty()?,
        },
        "mixed_sequence" => PatternFamily::MixedSequence {
            difficulty: difficulty()?,
        },
        other => return Err(invalid(format!("unknown family: {other}"))),
    };
    Ok(family)
}

/// Parse a manifest file.
pub fn parse_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;

    parse_manifest_str(&content, path)
}

/// Parse manifest TOML (useful for testing).
pub fn parse_manifest_str(content: &str, source_path: &Path) -> Result<Manifest> {
    let parsed: TomlManifest = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let prefix = parsed.corpus.prefix;
    anyhow::ensure!(
        !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric()),
        "manifest prefix must be non-empty ASCII alphanumeric, got {prefix:?}"
    );

    let batches = parsed
        .batches
        .iter()
        .enumerate()
        .map(|(index, b)| {
            Ok(Batch {
                family: to_family(index, b)?,
                count: b.count,
            })
        })
        .collect::<Result<Vec<_>, GenerationError>>()
        .with_context(|| format!("invalid manifest: {}", source_path.display()))?;

    Ok(Manifest {
        prefix,
        seed: parsed.corpus.seed,
        batches,
    })
}
