//! Question data model.
//!
//! In memory a question holds its prompt as a tagged [`Prompt`]; on disk it
//! is the flat bilingual record consumed by the quiz runner. The mapping
//! between the two lives in [`QuestionRecord`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Bilingual, Lang};
use crate::error::RecordError;
use crate::item::VisualItem;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Side length of a matrix prompt.
pub const MATRIX_DIM: usize = 3;

/// Difficulty tag derived from the structural complexity of the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Pattern-family category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Color Progression")]
    ColorProgression,
    #[serde(rename = "Size Progression")]
    SizeProgression,
    #[serde(rename = "Rotation Progression")]
    RotationProgression,
    #[serde(rename = "Shape Sequence")]
    ShapeSequence,
    #[serde(rename = "Alternation")]
    Alternation,
    #[serde(rename = "Multi-Attribute")]
    MultiAttribute,
    #[serde(rename = "Matrix Completion")]
    MatrixCompletion,
    #[serde(rename = "Pattern Sequence")]
    PatternSequence,
    #[serde(rename = "Transformation Rules")]
    TransformationRules,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::ColorProgression => "Color Progression",
            Category::SizeProgression => "Size Progression",
            Category::RotationProgression => "Rotation Progression",
            Category::ShapeSequence => "Shape Sequence",
            Category::Alternation => "Alternation",
            Category::MultiAttribute => "Multi-Attribute",
            Category::MatrixCompletion => "Matrix Completion",
            Category::PatternSequence => "Pattern Sequence",
            Category::TransformationRules => "Transformation Rules",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The givens shown before the blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Ordered items; the answer continues the sequence.
    Sequence(Vec<VisualItem>),
    /// Row-major 3×3 grid; `None` marks the blank cell.
    Matrix(Vec<Vec<Option<VisualItem>>>),
}

impl Prompt {
    pub fn is_matrix(&self) -> bool {
        matches!(self, Prompt::Matrix(_))
    }
}

/// A complete question record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "QuestionRecord", try_from = "QuestionRecord")]
pub struct Question {
    /// `<prefix>-<nnn>`; empty until the corpus assembler assigns it.
    pub id: String,
    pub prompt_text: Bilingual,
    pub prompt: Prompt,
    pub options: Vec<VisualItem>,
    /// Index of the correct option.
    pub correct: usize,
    pub explanation: Bilingual,
    pub motivation: Bilingual,
    /// Per-option explanations; empty at `correct`.
    pub wrong_explanations: Bilingual<Vec<String>>,
    pub category: Category,
    pub difficulty: Difficulty,
}

impl Question {
    /// The option marked correct, if the index is in range.
    pub fn correct_option(&self) -> Option<&VisualItem> {
        self.options.get(self.correct)
    }

    pub fn wrong_explanations_for(&self, lang: Lang) -> &[String] {
        self.wrong_explanations.get(lang)
    }
}

/// Display label for one answer slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLabel {
    pub text_it: String,
    pub text_en: String,
}

/// The four fixed option labels ("Figure A" … "Figure D").
pub fn option_labels() -> Vec<OptionLabel> {
    ["A", "B", "C", "D"]
        .iter()
        .map(|letter| OptionLabel {
            text_it: format!("Figura {letter}"),
            text_en: format!("Figure {letter}"),
        })
        .collect()
}

/// Flat on-disk representation of a [`Question`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub question_it: String,
    #[serde(default)]
    pub question_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<VisualItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<Option<VisualItem>>>>,
    #[serde(default)]
    pub options_shapes: Vec<VisualItem>,
    #[serde(default = "option_labels")]
    pub options: Vec<OptionLabel>,
    pub correct: usize,
    #[serde(default)]
    pub explanation_it: String,
    #[serde(default)]
    pub explanation_en: String,
    #[serde(default)]
    pub motivation_it: String,
    #[serde(default)]
    pub motivation_en: String,
    #[serde(default)]
    pub wrong_explanations_it: Vec<String>,
    #[serde(default)]
    pub wrong_explanations_en: Vec<String>,
    pub category: Category,
    pub difficulty: Difficulty,
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        let (sequence, matrix) = match q.prompt {
            Prompt::Sequence(items) => (Some(items), None),
            Prompt::Matrix(grid) => (None, Some(grid)),
        };
        Self {
            id: q.id,
            question_it: q.prompt_text.it,
            question_en: q.prompt_text.en,
            sequence,
            matrix,
            options_shapes: q.options,
            options: option_labels(),
            correct: q.correct,
            explanation_it: q.explanation.it,
            explanation_en: q.explanation.en,
            motivation_it: q.motivation.it,
            motivation_en: q.motivation.en,
            wrong_explanations_it: q.wrong_explanations.it,
            wrong_explanations_en: q.wrong_explanations.en,
            category: q.category,
            difficulty: q.difficulty,
        }
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = RecordError;

    fn try_from(r: QuestionRecord) -> Result<Self, Self::Error> {
        let prompt = match (r.sequence, r.matrix) {
            (Some(items), None) => Prompt::Sequence(items),
            (None, Some(grid)) => Prompt::Matrix(grid),
            (None, None) => return Err(RecordError::MissingPrompt { id: r.id }),
            (Some(_), Some(_)) => return Err(RecordError::AmbiguousPrompt { id: r.id }),
        };
        Ok(Self {
            id: r.id,
            prompt_text: Bilingual::new(r.question_it, r.question_en),
            prompt,
            options: r.options_shapes,
            correct: r.correct,
            explanation: Bilingual::new(r.explanation_it, r.explanation_en),
            motivation: Bilingual::new(r.motivation_it, r.motivation_en),
            wrong_explanations: Bilingual::new(r.wrong_explanations_it, r.wrong_explanations_en),
            category: r.category,
            difficulty: r.difficulty,
        })
    }
}
