//! Generation and corpus error types.
//!
//! These are typed so the CLI can downcast an `anyhow::Error` and print the
//! full list of validation failures instead of a single message.

use thiserror::Error;

use crate::item::Attribute;
use crate::validation::ValidationIssue;

/// Errors raised while synthesizing questions.
///
/// All of these are fatal for the run: generation is deterministic, so a
/// retry with the same seed reproduces the same failure.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A "value distinct from X" draw was requested against a domain that
    /// has nothing left once X is excluded.
    #[error("no {attribute} value distinct from {excluded} is available")]
    ExhaustedDomain { attribute: Attribute, excluded: String },

    /// A uniform pick was requested from an empty list.
    #[error("cannot pick from an empty list")]
    EmptyChoice,

    /// The distractor synthesizer was given no attributes to violate.
    #[error("distractor synthesis needs at least one attribute to violate")]
    NoViolations,

    /// A manifest batch could not be turned into a pattern family.
    #[error("invalid manifest batch #{index}: {message}")]
    InvalidManifest { index: usize, message: String },
}

/// Errors mapping a persisted record onto the typed question model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record carries neither a `sequence` nor a `matrix`.
    #[error("record {id:?} has neither a sequence nor a matrix")]
    MissingPrompt { id: String },

    /// The record carries both a `sequence` and a `matrix`.
    #[error("record {id:?} has both a sequence and a matrix")]
    AmbiguousPrompt { id: String },
}

/// Errors from assembling and persisting a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The batch validator reported at least one issue; nothing was written.
    #[error("{} validation error(s) found, refusing to write", issues.len())]
    ValidationFailed { issues: Vec<ValidationIssue> },
}

impl CorpusError {
    /// The validation issues carried by this error.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            CorpusError::ValidationFailed { issues } => issues,
        }
    }
}
