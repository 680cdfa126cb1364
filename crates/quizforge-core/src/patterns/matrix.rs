//! 3×3 matrix completion.

use super::{complete, PatternSpec, Rule};
use crate::domain::{Bilingual, Color, Lang, Rotation, ShapeKind, Size};
use crate::error::GenerationError;
use crate::item::{Attribute, VisualItem};
use crate::model::{Category, Difficulty, Question};
use crate::record::RuleText;
use crate::rng::SeededRng;

/// Rule starts index the shorter of the color and shape tables.
const START_RANGE: usize = 6;

/// Rotation rules map a start index onto `start * 45 + k * 90` degrees.
fn axis_rule(attribute: Attribute, start: usize) -> Rule {
    match attribute {
        Attribute::Rotation => Rule::turn(start as i64 * 45, 90),
        other => Rule::step(other, start, 1),
    }
}

fn axis_clause(axis: &str, attribute: Attribute, lang: Lang) -> String {
    match (axis, lang) {
        ("row", Lang::It) => format!("ogni riga segue un pattern di {}", attribute.name(lang)),
        ("row", Lang::En) => format!("each row follows a {} pattern", attribute.name(lang)),
        (_, Lang::It) => format!("ogni colonna segue un pattern di {}", attribute.name(lang)),
        (_, Lang::En) => format!("each column follows a {} pattern", attribute.name(lang)),
    }
}

pub(super) fn matrix(
    rng: &mut SeededRng,
    difficulty: Difficulty,
) -> Result<Question, GenerationError> {
    let order = rng.shuffle(&Attribute::ALL);
    let row_attribute = order[0];
    let column_attribute = match difficulty {
        Difficulty::Easy => None,
        Difficulty::Medium | Difficulty::Hard => Some(order[1]),
    };

    let kind = rng.pick(&ShapeKind::ALL)?;
    let color = rng.pick(&Color::ALL)?;
    let size = rng.pick(&Size::ALL)?;
    let rotation = rng.pick(&[0i64, 45, 90])?;
    let row_start = rng.pick_index(START_RANGE);
    let column_start = rng.pick_index(START_RANGE);

    let spec = PatternSpec::matrix(
        VisualItem::new(kind, color, size, Rotation::degrees(rotation)),
        axis_rule(row_attribute, row_start),
        column_attribute.map(|attribute| axis_rule(attribute, column_start)),
    );
    let (prompt, correct) = spec.render();

    let clauses = |lang| {
        let mut parts = vec![axis_clause("row", row_attribute, lang)];
        if let Some(attribute) = column_attribute {
            parts.push(axis_clause("column", attribute, lang));
        }
        parts
    };
    let text = RuleText {
        prompt: Bilingual::new(
            format!(
                "Nella matrice 3×3, {}. Quale figura completa la cella mancante?",
                clauses(Lang::It).join(" e ")
            ),
            format!(
                "In the 3×3 matrix, {}. Which figure completes the missing cell?",
                clauses(Lang::En).join(" and ")
            ),
        ),
        explanation: Bilingual::new(
            format!(
                "La regola: {}. La cella (3,3) deve soddisfare ogni regola individuata.",
                clauses(Lang::It).join("; ")
            ),
            format!(
                "The rule: {}. Cell (3,3) must satisfy every identified rule.",
                clauses(Lang::En).join("; ")
            ),
        ),
        motivation: Bilingual::text(
            "Analizza prima le righe, poi le colonne. La cella mancante deve essere compatibile con tutte le regole.",
            "Analyze rows first, then columns. The missing cell must be compatible with all the rules.",
        ),
    };

    let second = match column_attribute {
        Some(attribute) => attribute,
        None => rng.pick(&[Attribute::Color, Attribute::Shape, Attribute::Size])?,
    };
    let mut candidates: Vec<Attribute> = Vec::with_capacity(4);
    for attribute in [row_attribute, second, Attribute::Rotation, Attribute::Color] {
        if !candidates.contains(&attribute) {
            candidates.push(attribute);
        }
    }
    let violations = rng.shuffle(&candidates);

    complete(
        rng,
        prompt,
        correct,
        &violations,
        text,
        Category::MatrixCompletion,
        difficulty,
    )
}
