//! Patterns where several attributes change at once.

use super::{chain, complete, label, Layout, PatternSpec, Rule};
use crate::domain::{Bilingual, Color, Lang, Rotation, ShapeKind, Size};
use crate::error::GenerationError;
use crate::item::{Attribute, VisualItem};
use crate::model::{Category, Difficulty, Prompt, Question};
use crate::record::RuleText;
use crate::rng::SeededRng;

fn join_names(attributes: &[Attribute], lang: Lang, bold: bool) -> String {
    let names: Vec<String> = attributes
        .iter()
        .map(|a| {
            if bold {
                format!("**{}**", a.name(lang))
            } else {
                a.name(lang).to_string()
            }
        })
        .collect();
    match lang {
        Lang::It => names.join(" e "),
        Lang::En => names.join(" and "),
    }
}

pub(super) fn multi_attribute(rng: &mut SeededRng) -> Result<Question, GenerationError> {
    let order = rng.shuffle(&Attribute::ALL);
    let varying = &order[..2];
    let kind = rng.pick(&ShapeKind::ALL)?;
    let color = rng.pick(&Color::ALL)?;
    let size = rng.pick(&Size::ALL)?;

    // Every start is drawn whether or not its attribute varies.
    let color_start = rng.pick_index(Color::ALL.len());
    let shape_start = rng.pick_index(ShapeKind::ALL.len());
    let size_start = rng.pick_index(Size::ALL.len());
    let turn_start = rng.pick(&[0i64, 45, 90])?;
    let turn_delta = rng.pick(&[45i64, 90])?;

    let rules = varying
        .iter()
        .map(|attribute| match attribute {
            Attribute::Color => Rule::step(Attribute::Color, color_start, 1),
            Attribute::Shape => Rule::step(Attribute::Shape, shape_start, 1),
            Attribute::Size => Rule::step(Attribute::Size, size_start, 1),
            Attribute::Rotation => Rule::turn(turn_start, turn_delta),
        })
        .collect();
    let spec = PatternSpec::sequence(
        VisualItem::new(kind, color, size, Rotation::degrees(0)),
        rules,
        3,
    );
    let (prompt, correct) = spec.render();

    let text = RuleText {
        prompt: Bilingual::new(
            format!(
                "Due attributi cambiano simultaneamente ({}). Quale figura viene dopo?",
                join_names(varying, Lang::It, false)
            ),
            format!(
                "Two attributes change simultaneously ({}). Which figure comes next?",
                join_names(varying, Lang::En, false)
            ),
        ),
        explanation: Bilingual::new(
            format!(
                "Cambiano {} seguendo regole indipendenti. Tutti gli altri attributi restano costanti.",
                join_names(varying, Lang::It, true)
            ),
            format!(
                "{} change following independent rules. All other attributes remain constant.",
                join_names(varying, Lang::En, true)
            ),
        ),
        motivation: Bilingual::text(
            "Con più attributi variabili, analizza ogni attributo separatamente prima di combinare le regole.",
            "With several varying attributes, analyze each one separately before combining the rules.",
        ),
    };
    complete(
        rng,
        prompt,
        correct,
        varying,
        text,
        Category::MultiAttribute,
        Difficulty::Hard,
    )
}

/// One clause of the mixed-sequence explanation.
fn describe(rule: &Rule, items: &[VisualItem], correct: &VisualItem, lang: Lang) -> String {
    if let Rule::Turn { delta, .. } = rule {
        return match lang {
            Lang::It => format!("la rotazione aumenta di {delta}° ad ogni passo"),
            Lang::En => format!("rotation increases by {delta}° each step"),
        };
    }
    let attribute = rule.attribute();
    let values = format!(
        "{} → {}",
        chain(items, attribute, lang),
        label(correct, attribute, lang)
    );
    match (attribute, lang) {
        (Attribute::Size, Lang::It) => format!("la dimensione progredisce ({values})"),
        (Attribute::Size, Lang::En) => format!("size progresses ({values})"),
        (Attribute::Color, Lang::It) => format!("il colore cambia ciclicamente ({values})"),
        (Attribute::Shape, Lang::It) => format!("la forma cambia ciclicamente ({values})"),
        (_, Lang::It) => format!("la {} cambia ({values})", attribute.name(lang)),
        (_, Lang::En) => format!("{} cycles ({values})", attribute.name(lang)),
    }
}

pub(super) fn mixed_sequence(
    rng: &mut SeededRng,
    difficulty: Difficulty,
) -> Result<Question, GenerationError> {
    let (prompt_length, varying_count) = match difficulty {
        Difficulty::Easy => (3, 1),
        Difficulty::Medium => (4, 2),
        Difficulty::Hard => (4, 3),
    };
    let order = rng.shuffle(&Attribute::ALL);
    let (varying, constant) = order.split_at(varying_count);

    let color = rng.pick(&Color::ALL)?;
    let kind = rng.pick(&ShapeKind::ALL)?;
    let size = rng.pick(&Size::ALL)?;
    let rotation = rng.pick(&[0i64, 0, 0, 45, 90])?;

    let mut rules = Vec::with_capacity(varying.len());
    for attribute in varying {
        let rule = match attribute {
            Attribute::Color => {
                let start = rng.pick_index(Color::ALL.len());
                Rule::step(Attribute::Color, start, rng.pick(&[1, 2])?)
            }
            Attribute::Shape => {
                let start = rng.pick_index(ShapeKind::ALL.len());
                Rule::step(Attribute::Shape, start, rng.pick(&[1, 2])?)
            }
            Attribute::Size => Rule::step(Attribute::Size, rng.pick_index(Size::ALL.len()), 1),
            Attribute::Rotation => {
                let start = rng.pick(&[0i64, 45, 90])?;
                Rule::turn(start, rng.pick(&[45i64, 90, 135])?)
            }
        };
        rules.push(rule);
    }

    let spec = PatternSpec::sequence(
        VisualItem::new(kind, color, size, Rotation::degrees(rotation)),
        rules,
        prompt_length,
    );
    let (prompt, correct) = spec.render();
    let clauses = |lang| {
        let items = match &prompt {
            Prompt::Sequence(items) => items.as_slice(),
            Prompt::Matrix(_) => &[],
        };
        let parts: Vec<String> = match &spec.layout {
            Layout::Sequence { rules, .. } => rules
                .iter()
                .map(|rule| describe(rule, items, &correct, lang))
                .collect(),
            Layout::Matrix { .. } => Vec::new(),
        };
        parts.join("; ")
    };

    let text = RuleText {
        prompt: Bilingual::text(
            "Quale figura completa la sequenza?",
            "Which figure completes the sequence?",
        ),
        explanation: Bilingual::new(
            format!("La regola è: {}. Gli altri attributi rimangono costanti.", clauses(Lang::It)),
            format!("The rule is: {}. Other attributes remain constant.", clauses(Lang::En)),
        ),
        motivation: Bilingual::new(
            format!("La sequenza mostra un pattern basato su {varying_count} attributo/i che cambiano sistematicamente."),
            format!("The sequence shows a pattern based on {varying_count} attribute(s) changing systematically."),
        ),
    };

    let padding = constant.len().min(3usize.saturating_sub(varying_count).max(1));
    let mut candidates = varying.to_vec();
    candidates.extend_from_slice(&constant[..padding]);
    let violations: Vec<Attribute> = rng.shuffle(&candidates).into_iter().take(3).collect();

    let category = if varying.contains(&Attribute::Shape) {
        Category::TransformationRules
    } else {
        Category::PatternSequence
    };
    complete(rng, prompt, correct, &violations, text, category, difficulty)
}
