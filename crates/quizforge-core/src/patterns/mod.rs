//! Pattern rule generators.
//!
//! Every family follows the same shape: draw a baseline item and the rule
//! parameters from the stream, describe them as a [`PatternSpec`], render
//! the prompt plus the hidden answer, then hand the answer to the
//! distractor synthesizer and option assembler.
//!
//! The order of draws inside each family is part of the reproducibility
//! contract. Reordering them changes every later question for a seed.

mod alternation;
mod combined;
mod matrix;
mod progression;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distractor;
use crate::domain::{Color, Lang, Rotation, ShapeKind, Size};
use crate::error::GenerationError;
use crate::item::{Attribute, AttributeValue, VisualItem};
use crate::model::{Category, Difficulty, Prompt, Question, MATRIX_DIM};
use crate::options;
use crate::record::{build_question, RuleText};
use crate::rng::SeededRng;

/// Direction of a size progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        })
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "reverse" => Ok(Direction::Reverse),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// A pattern family together with its fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternFamily {
    /// Color index advances by 1 or 2 per position.
    ColorCycle { prompt_length: usize },
    /// Size cycles small→medium→large (or the reverse) and wraps.
    SizeProgression { direction: Direction },
    /// Rotation grows by 45, 90, or 135 degrees per position.
    RotationProgression,
    /// Shape index advances by 1, 2, or 3 per position.
    ShapeSequence,
    /// One attribute alternates A, B, A → B.
    Alternation,
    /// One attribute cycles A, B, C → A.
    AbcCycle,
    /// Two attributes progress independently.
    MultiAttribute,
    /// 3×3 grid with a row rule and, above easy, a column rule.
    Matrix { difficulty: Difficulty },
    /// One to three attributes progress, chosen by difficulty.
    MixedSequence { difficulty: Difficulty },
}

impl PatternFamily {
    /// Manifest name of this family.
    pub fn name(&self) -> &'static str {
        match self {
            PatternFamily::ColorCycle { .. } => "color_cycle",
            PatternFamily::SizeProgression { .. } => "size_progression",
            PatternFamily::RotationProgression => "rotation_progression",
            PatternFamily::ShapeSequence => "shape_sequence",
            PatternFamily::Alternation => "alternation",
            PatternFamily::AbcCycle => "abc_cycle",
            PatternFamily::MultiAttribute => "multi_attribute",
            PatternFamily::Matrix { .. } => "matrix",
            PatternFamily::MixedSequence { .. } => "mixed_sequence",
        }
    }

    /// Generate one question (id unset).
    pub fn generate(&self, rng: &mut SeededRng) -> Result<Question, GenerationError> {
        match *self {
            PatternFamily::ColorCycle { prompt_length } => {
                progression::color_cycle(rng, prompt_length)
            }
            PatternFamily::SizeProgression { direction } => {
                progression::size_progression(rng, direction)
            }
            PatternFamily::RotationProgression => progression::rotation_progression(rng),
            PatternFamily::ShapeSequence => progression::shape_sequence(rng),
            PatternFamily::Alternation => alternation::alternation_ab(rng),
            PatternFamily::AbcCycle => alternation::abc_cycle(rng),
            PatternFamily::MultiAttribute => combined::multi_attribute(rng),
            PatternFamily::Matrix { difficulty } => matrix::matrix(rng, difficulty),
            PatternFamily::MixedSequence { difficulty } => {
                combined::mixed_sequence(rng, difficulty)
            }
        }
    }
}

impl fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternFamily::ColorCycle { prompt_length } => {
                write!(f, "{} (length {prompt_length})", self.name())
            }
            PatternFamily::SizeProgression { direction } => {
                write!(f, "{} ({direction})", self.name())
            }
            PatternFamily::Matrix { difficulty } | PatternFamily::MixedSequence { difficulty } => {
                write!(f, "{} ({difficulty})", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// How one attribute evolves with position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Table index `start + k * step`, wrapping modulo the table size.
    Step {
        attribute: Attribute,
        start: isize,
        step: isize,
    },
    /// Rotation `start + k * delta` degrees, modulo 360.
    Turn { start: i64, delta: i64 },
    /// `values[k % values.len()]`.
    Periodic {
        attribute: Attribute,
        values: Vec<AttributeValue>,
    },
}

impl Rule {
    pub fn step(attribute: Attribute, start: usize, step: isize) -> Self {
        Rule::Step {
            attribute,
            start: start as isize,
            step,
        }
    }

    pub fn turn(start: i64, delta: i64) -> Self {
        Rule::Turn { start, delta }
    }

    /// A periodic rule; all values must share one attribute.
    pub fn periodic(values: Vec<AttributeValue>) -> Result<Self, GenerationError> {
        let attribute = values
            .first()
            .map(|v| v.attribute())
            .ok_or(GenerationError::EmptyChoice)?;
        Ok(Rule::Periodic { attribute, values })
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            Rule::Step { attribute, .. } | Rule::Periodic { attribute, .. } => *attribute,
            Rule::Turn { .. } => Attribute::Rotation,
        }
    }

    /// Value of the governed attribute at position `k` (0-based).
    pub fn value_at(&self, k: usize) -> AttributeValue {
        match self {
            Rule::Step {
                attribute,
                start,
                step,
            } => {
                let index = start + k as isize * step;
                match attribute {
                    Attribute::Shape => AttributeValue::Shape(ShapeKind::at(index)),
                    Attribute::Color => AttributeValue::Color(Color::at(index)),
                    Attribute::Size => AttributeValue::Size(Size::at(index)),
                    Attribute::Rotation => {
                        let len = Rotation::ALL.len() as isize;
                        AttributeValue::Rotation(Rotation::ALL[index.rem_euclid(len) as usize])
                    }
                }
            }
            Rule::Turn { start, delta } => {
                AttributeValue::Rotation(Rotation::degrees(start + k as i64 * delta))
            }
            Rule::Periodic { values, .. } => values[k % values.len()],
        }
    }
}

/// Prompt arrangement and the rules that fill it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// `prompt_length` givens followed by the hidden answer.
    Sequence { rules: Vec<Rule>, prompt_length: usize },
    /// The row rule is evaluated at the column index, the column rule at
    /// the row index. Cell (2, 2) is the hidden answer.
    Matrix { row: Rule, column: Option<Rule> },
}

/// Generation-time description of one question's rules. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    /// Values of every attribute no rule touches.
    pub baseline: VisualItem,
    pub layout: Layout,
}

impl PatternSpec {
    pub fn sequence(baseline: VisualItem, rules: Vec<Rule>, prompt_length: usize) -> Self {
        Self {
            baseline,
            layout: Layout::Sequence {
                rules,
                prompt_length,
            },
        }
    }

    pub fn matrix(baseline: VisualItem, row: Rule, column: Option<Rule>) -> Self {
        Self {
            baseline,
            layout: Layout::Matrix { row, column },
        }
    }

    /// Item at sequence position `k`; for a matrix, the cell at column `k`
    /// of the first row.
    pub fn item_at(&self, k: usize) -> VisualItem {
        match &self.layout {
            Layout::Sequence { rules, .. } => rules
                .iter()
                .fold(self.baseline, |item, rule| item.with(rule.value_at(k))),
            Layout::Matrix { .. } => self.cell(0, k),
        }
    }

    /// Matrix cell at (`row`, `col`); the row rule is applied first.
    pub fn cell(&self, row: usize, col: usize) -> VisualItem {
        match &self.layout {
            Layout::Matrix { row: row_rule, column } => {
                let item = self.baseline.with(row_rule.value_at(col));
                match column {
                    Some(rule) => item.with(rule.value_at(row)),
                    None => item,
                }
            }
            Layout::Sequence { .. } => self.item_at(col),
        }
    }

    /// Attributes governed by a rule, in rule order.
    pub fn varying(&self) -> Vec<Attribute> {
        match &self.layout {
            Layout::Sequence { rules, .. } => rules.iter().map(Rule::attribute).collect(),
            Layout::Matrix { row, column } => std::iter::once(row.attribute())
                .chain(column.iter().map(Rule::attribute))
                .collect(),
        }
    }

    /// The prompt and its hidden correct completion.
    pub fn render(&self) -> (Prompt, VisualItem) {
        match &self.layout {
            Layout::Sequence { prompt_length, .. } => {
                let items = (0..*prompt_length).map(|k| self.item_at(k)).collect();
                (Prompt::Sequence(items), self.item_at(*prompt_length))
            }
            Layout::Matrix { .. } => {
                let last = MATRIX_DIM - 1;
                let grid = (0..MATRIX_DIM)
                    .map(|row| {
                        (0..MATRIX_DIM)
                            .map(|col| {
                                if row == last && col == last {
                                    None
                                } else {
                                    Some(self.cell(row, col))
                                }
                            })
                            .collect()
                    })
                    .collect();
                (Prompt::Matrix(grid), self.cell(last, last))
            }
        }
    }
}

/// Synthesize distractors, place options, and build the record.
fn complete(
    rng: &mut SeededRng,
    prompt: Prompt,
    correct: VisualItem,
    violations: &[Attribute],
    text: RuleText,
    category: Category,
    difficulty: Difficulty,
) -> Result<Question, GenerationError> {
    let distractors = distractor::synthesize(rng, correct, violations)?;
    let answers = options::assemble(rng, correct, distractors);
    Ok(build_question(prompt, answers, text, category, difficulty))
}

/// Labels of `attribute` across `items`, joined with arrows.
fn chain(items: &[VisualItem], attribute: Attribute, lang: Lang) -> String {
    items
        .iter()
        .map(|item| item.value_of(attribute).label(lang))
        .collect::<Vec<_>>()
        .join(" → ")
}

fn label(item: &VisualItem, attribute: Attribute, lang: Lang) -> String {
    item.value_of(attribute).label(lang)
}

/// Sentence-initial attribute with its article, e.g. "Il colore".
fn subject(attribute: Attribute, lang: Lang) -> String {
    let article = match (lang, attribute) {
        (Lang::It, Attribute::Color) => "Il",
        (Lang::It, _) => "La",
        (Lang::En, _) => "The",
    };
    format!("{article} {}", attribute.name(lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> VisualItem {
        VisualItem::new(ShapeKind::Circle, Color::Blue, Size::Medium, Rotation::degrees(0))
    }

    #[test]
    fn step_rule_wraps() {
        let rule = Rule::step(Attribute::Color, 5, 2);
        assert_eq!(rule.value_at(0), AttributeValue::Color(Color::Cyan));
        assert_eq!(rule.value_at(1), AttributeValue::Color(Color::Yellow));
    }

    #[test]
    fn reverse_size_step() {
        let rule = Rule::step(Attribute::Size, 2, -1);
        let sizes: Vec<_> = (0..4).map(|k| rule.value_at(k)).collect();
        assert_eq!(
            sizes,
            vec![
                AttributeValue::Size(Size::Large),
                AttributeValue::Size(Size::Medium),
                AttributeValue::Size(Size::Small),
                AttributeValue::Size(Size::Large),
            ]
        );
    }

    #[test]
    fn rotation_by_table_and_by_arithmetic_agree() {
        let indexed = Rule::step(Attribute::Rotation, 1, 2);
        let computed = Rule::turn(45, 90);
        for k in 0..8 {
            assert_eq!(indexed.value_at(k), computed.value_at(k));
        }
    }

    #[test]
    fn sequence_render_hides_last_position() {
        let spec = PatternSpec::sequence(
            baseline(),
            vec![Rule::step(Attribute::Shape, 0, 1)],
            3,
        );
        let (prompt, correct) = spec.render();
        match prompt {
            Prompt::Sequence(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[2].kind, ShapeKind::Triangle);
            }
            Prompt::Matrix(_) => panic!("expected a sequence"),
        }
        assert_eq!(correct.kind, ShapeKind::Diamond);
        assert_eq!(spec.varying(), vec![Attribute::Shape]);
    }

    #[test]
    fn easy_matrix_rows_repeat() {
        let spec = PatternSpec::matrix(baseline(), Rule::step(Attribute::Shape, 2, 1), None);
        let (prompt, correct) = spec.render();
        let Prompt::Matrix(grid) = prompt else {
            panic!("expected a matrix");
        };
        let expected = [ShapeKind::Triangle, ShapeKind::Diamond, ShapeKind::Hexagon];
        for row in &grid[..2] {
            let kinds: Vec<_> = row.iter().map(|c| c.unwrap().kind).collect();
            assert_eq!(kinds, expected);
        }
        assert_eq!(grid[2][0].unwrap().kind, ShapeKind::Triangle);
        assert_eq!(grid[2][1].unwrap().kind, ShapeKind::Diamond);
        assert!(grid[2][2].is_none());
        assert_eq!(correct, baseline().with(AttributeValue::Shape(ShapeKind::Hexagon)));
    }

    #[test]
    fn matrix_answer_composes_both_rules() {
        let spec = PatternSpec::matrix(
            baseline(),
            Rule::step(Attribute::Color, 0, 1),
            Some(Rule::step(Attribute::Size, 0, 1)),
        );
        let (_, correct) = spec.render();
        assert_eq!(correct.color, Color::Red);
        assert_eq!(correct.size, Size::Large);
        assert_eq!(correct.kind, ShapeKind::Circle);
    }

    #[test]
    fn periodic_requires_values() {
        assert!(Rule::periodic(vec![]).is_err());
    }
}
