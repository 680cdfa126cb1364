//! Batch validation of question records.
//!
//! Every check names the question and the invariant it broke. The corpus
//! assembler refuses to write when any issue is reported.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::CorpusError;
use crate::item::VisualItem;
use crate::model::{Prompt, Question, MATRIX_DIM, OPTION_COUNT};

/// Smallest and largest accepted sequence prompt.
const SEQUENCE_LENGTH: std::ops::RangeInclusive<usize> = 3..=4;

/// The record-level rule a question violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Invariant {
    /// The record could not be mapped onto the question model.
    MalformedRecord,
    MissingId,
    DuplicateId,
    EmptyPromptText,
    SequenceLength,
    OptionCount,
    OptionOutOfDomain,
    CorrectIndexRange,
    WrongExplanationCount,
    CorrectExplanationNotEmpty,
    MissingWrongExplanation,
    MatrixShape,
    MatrixBlankCell,
    MatrixMissingCell,
}

impl Invariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Invariant::MalformedRecord => "malformed_record",
            Invariant::MissingId => "missing_id",
            Invariant::DuplicateId => "duplicate_id",
            Invariant::EmptyPromptText => "empty_prompt_text",
            Invariant::SequenceLength => "sequence_length",
            Invariant::OptionCount => "option_count",
            Invariant::OptionOutOfDomain => "option_out_of_domain",
            Invariant::CorrectIndexRange => "correct_index_range",
            Invariant::WrongExplanationCount => "wrong_explanation_count",
            Invariant::CorrectExplanationNotEmpty => "correct_explanation_not_empty",
            Invariant::MissingWrongExplanation => "missing_wrong_explanation",
            Invariant::MatrixShape => "matrix_shape",
            Invariant::MatrixBlankCell => "matrix_blank_cell",
            Invariant::MatrixMissingCell => "matrix_missing_cell",
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Offending question id; empty when the id itself is missing.
    pub question_id: String,
    pub invariant: Invariant,
    pub detail: String,
}

impl ValidationIssue {
    fn new(question_id: &str, invariant: Invariant, detail: impl Into<String>) -> Self {
        Self {
            question_id: question_id.to_string(),
            invariant,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = if self.question_id.is_empty() {
            "<no id>"
        } else {
            self.question_id.as_str()
        };
        write!(f, "{id}: {} ({})", self.invariant, self.detail)
    }
}

/// Outcome of validating one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of records examined.
    pub checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    /// `Ok` when clean, otherwise the issues as a [`CorpusError`].
    pub fn into_result(self) -> Result<(), CorpusError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(CorpusError::ValidationFailed {
                issues: self.issues,
            })
        }
    }

    fn push(&mut self, issue: ValidationIssue) {
        tracing::error!(
            question_id = %issue.question_id,
            invariant = %issue.invariant,
            "{}",
            issue.detail
        );
        self.issues.push(issue);
    }
}

/// Check the per-record invariants of a single question.
pub fn validate_question(q: &Question) -> Vec<ValidationIssue> {
    let id = q.id.as_str();
    let mut issues = Vec::new();

    if id.trim().is_empty() {
        issues.push(ValidationIssue::new(id, Invariant::MissingId, "id is empty"));
    }
    if q.prompt_text.it.trim().is_empty() || q.prompt_text.en.trim().is_empty() {
        issues.push(ValidationIssue::new(
            id,
            Invariant::EmptyPromptText,
            "question text is empty in at least one language",
        ));
    }

    match &q.prompt {
        Prompt::Sequence(items) => {
            if !SEQUENCE_LENGTH.contains(&items.len()) {
                issues.push(ValidationIssue::new(
                    id,
                    Invariant::SequenceLength,
                    format!("sequence has {} items", items.len()),
                ));
            }
            if let Some(pos) = items.iter().position(|item| !item.is_in_domain()) {
                issues.push(ValidationIssue::new(
                    id,
                    Invariant::OptionOutOfDomain,
                    format!("sequence item {pos} has a value outside its domain"),
                ));
            }
        }
        Prompt::Matrix(grid) => check_matrix(id, grid, &mut issues),
    }

    if q.options.len() != OPTION_COUNT {
        issues.push(ValidationIssue::new(
            id,
            Invariant::OptionCount,
            format!("expected {OPTION_COUNT} options, found {}", q.options.len()),
        ));
    }
    for (i, option) in q.options.iter().enumerate() {
        if !option.is_in_domain() {
            issues.push(ValidationIssue::new(
                id,
                Invariant::OptionOutOfDomain,
                format!("option {i} has rotation {}", option.rotation),
            ));
        }
    }

    if q.correct >= OPTION_COUNT {
        issues.push(ValidationIssue::new(
            id,
            Invariant::CorrectIndexRange,
            format!("correct index {} is outside 0..{OPTION_COUNT}", q.correct),
        ));
    }

    for (lang, explanations) in [
        ("it", &q.wrong_explanations.it),
        ("en", &q.wrong_explanations.en),
    ] {
        if explanations.len() != OPTION_COUNT {
            issues.push(ValidationIssue::new(
                id,
                Invariant::WrongExplanationCount,
                format!("{lang}: expected {OPTION_COUNT} entries, found {}", explanations.len()),
            ));
        }
        for (i, text) in explanations.iter().enumerate() {
            if i == q.correct && !text.is_empty() {
                issues.push(ValidationIssue::new(
                    id,
                    Invariant::CorrectExplanationNotEmpty,
                    format!("{lang}: entry {i} is the correct option but is not empty"),
                ));
            } else if i != q.correct && text.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    id,
                    Invariant::MissingWrongExplanation,
                    format!("{lang}: entry {i} is empty"),
                ));
            }
        }
    }

    issues
}

fn check_matrix(
    id: &str,
    grid: &[Vec<Option<VisualItem>>],
    issues: &mut Vec<ValidationIssue>,
) {
    if grid.len() != MATRIX_DIM || grid.iter().any(|row| row.len() != MATRIX_DIM) {
        issues.push(ValidationIssue::new(
            id,
            Invariant::MatrixShape,
            format!("matrix is not {MATRIX_DIM}×{MATRIX_DIM}"),
        ));
        return;
    }
    let last = MATRIX_DIM - 1;
    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match (r == last && c == last, cell) {
                (true, Some(_)) => issues.push(ValidationIssue::new(
                    id,
                    Invariant::MatrixBlankCell,
                    format!("cell [{last}][{last}] must be blank"),
                )),
                (false, None) => issues.push(ValidationIssue::new(
                    id,
                    Invariant::MatrixMissingCell,
                    format!("cell [{r}][{c}] is blank"),
                )),
                (false, Some(item)) if !item.is_in_domain() => {
                    issues.push(ValidationIssue::new(
                        id,
                        Invariant::OptionOutOfDomain,
                        format!("cell [{r}][{c}] has a value outside its domain"),
                    ))
                }
                _ => {}
            }
        }
    }
}

/// Validate a batch; `reserved_ids` are ids already taken by records the
/// batch will be merged into.
pub fn validate_batch(questions: &[Question], reserved_ids: &HashSet<String>) -> ValidationReport {
    let mut report = ValidationReport {
        checked: questions.len(),
        issues: Vec::new(),
    };
    let mut seen: HashSet<&str> = HashSet::new();
    for q in questions {
        for issue in validate_question(q) {
            report.push(issue);
        }
        if q.id.is_empty() {
            continue;
        }
        if reserved_ids.contains(&q.id) || !seen.insert(q.id.as_str()) {
            report.push(ValidationIssue::new(
                &q.id,
                Invariant::DuplicateId,
                format!("id {} appears more than once", q.id),
            ));
        }
    }
    report
}

/// Validate raw persisted records, e.g. an existing bank on disk.
pub fn validate_records(records: &[Value]) -> ValidationReport {
    let mut questions = Vec::with_capacity(records.len());
    let mut malformed = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match serde_json::from_value::<Question>(record.clone()) {
            Ok(q) => questions.push(q),
            Err(e) => {
                let id = record
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                malformed.push(ValidationIssue {
                    question_id: id,
                    invariant: Invariant::MalformedRecord,
                    detail: format!("record #{index}: {e}"),
                });
            }
        }
    }
    let reserved: HashSet<String> = malformed
        .iter()
        .filter(|issue| !issue.question_id.is_empty())
        .map(|issue| issue.question_id.clone())
        .collect();
    let mut report = validate_batch(&questions, &reserved);
    report.checked = records.len();
    for issue in malformed {
        report.push(issue);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternFamily;
    use crate::rng::SeededRng;

    fn generated(seed: u32) -> Question {
        let mut rng = SeededRng::new(seed);
        let mut q = PatternFamily::ShapeSequence.generate(&mut rng).unwrap();
        q.id = format!("ar-{seed:03}");
        q
    }

    fn matrix_question() -> Question {
        let mut rng = SeededRng::new(4);
        let mut q = PatternFamily::Matrix {
            difficulty: crate::model::Difficulty::Medium,
        }
        .generate(&mut rng)
        .unwrap();
        q.id = "ar-100".into();
        q
    }

    fn invariants(q: &Question) -> Vec<Invariant> {
        validate_question(q).into_iter().map(|i| i.invariant).collect()
    }

    #[test]
    fn generated_questions_are_clean() {
        let batch: Vec<Question> = (1..=20).map(generated).collect();
        let report = validate_batch(&batch, &HashSet::new());
        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.checked, 20);
        assert!(validate_question(&matrix_question()).is_empty());
    }

    #[test]
    fn correct_index_out_of_range() {
        let mut q = generated(1);
        q.correct = 4;
        assert!(invariants(&q).contains(&Invariant::CorrectIndexRange));
    }

    #[test]
    fn non_empty_correct_explanation() {
        let mut q = generated(2);
        q.wrong_explanations.en[q.correct] = "oops".into();
        assert_eq!(invariants(&q), vec![Invariant::CorrectExplanationNotEmpty]);
    }

    #[test]
    fn empty_wrong_explanation() {
        let mut q = generated(3);
        let wrong = (q.correct + 1) % OPTION_COUNT;
        q.wrong_explanations.it[wrong].clear();
        assert_eq!(invariants(&q), vec![Invariant::MissingWrongExplanation]);
    }

    #[test]
    fn option_count_and_empty_prompt() {
        let mut q = generated(5);
        q.options.pop();
        q.prompt_text.it.clear();
        let found = invariants(&q);
        assert!(found.contains(&Invariant::OptionCount));
        assert!(found.contains(&Invariant::EmptyPromptText));
    }

    #[test]
    fn matrix_blank_cell_must_be_bottom_right() {
        let mut q = matrix_question();
        if let Prompt::Matrix(grid) = &mut q.prompt {
            grid[2][2] = grid[0][0];
            grid[1][1] = None;
        }
        let found = invariants(&q);
        assert!(found.contains(&Invariant::MatrixBlankCell));
        assert!(found.contains(&Invariant::MatrixMissingCell));
    }

    #[test]
    fn matrix_shape_checked() {
        let mut q = matrix_question();
        if let Prompt::Matrix(grid) = &mut q.prompt {
            grid.pop();
        }
        assert_eq!(invariants(&q), vec![Invariant::MatrixShape]);
    }

    #[test]
    fn duplicate_ids_within_batch_and_against_reserved() {
        let a = generated(1);
        let mut b = generated(2);
        b.id = a.id.clone();
        let report = validate_batch(&[a.clone(), b], &HashSet::new());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].invariant, Invariant::DuplicateId);

        let reserved: HashSet<String> = [a.id.clone()].into_iter().collect();
        let report = validate_batch(&[a], &reserved);
        assert_eq!(report.issues[0].invariant, Invariant::DuplicateId);
    }

    #[test]
    fn report_converts_into_corpus_error() {
        let mut q = generated(1);
        q.correct = 7;
        let err = validate_batch(&[q], &HashSet::new())
            .into_result()
            .unwrap_err();
        assert!(err.issues().iter().any(|i| i.question_id == "ar-001"));
        assert!(err.to_string().contains("refusing to write"));
    }

    #[test]
    fn raw_records_with_bad_shape_are_reported() {
        let good = serde_json::to_value(generated(1)).unwrap();
        let mut bad = good.clone();
        bad["id"] = "ar-002".into();
        bad.as_object_mut().unwrap().remove("sequence");
        let report = validate_records(&[good, bad]);
        assert_eq!(report.checked, 2);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].invariant, Invariant::MalformedRecord);
        assert_eq!(report.issues[0].question_id, "ar-002");
    }

    #[test]
    fn malformed_record_ids_still_count_as_taken() {
        let good = serde_json::to_value(generated(1)).unwrap();
        let mut bad = good.clone();
        bad.as_object_mut().unwrap().remove("sequence");
        let report = validate_records(&[good, bad]);
        let invariants: Vec<Invariant> = report.issues.iter().map(|i| i.invariant).collect();
        assert!(invariants.contains(&Invariant::DuplicateId));
        assert!(invariants.contains(&Invariant::MalformedRecord));
        assert!(report.issues.iter().all(|i| i.question_id == "ar-001"));
    }

    #[test]
    fn issue_display_names_id_and_invariant() {
        let issue = ValidationIssue::new("ar-009", Invariant::DuplicateId, "twice");
        assert_eq!(issue.to_string(), "ar-009: duplicate_id (twice)");
    }
}
