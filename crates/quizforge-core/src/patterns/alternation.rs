//! Periodic patterns: ABAB alternation and the ABC cycle.

use super::{chain, complete, label, subject, PatternSpec, Rule};
use crate::domain::{Bilingual, Color, Lang, Rotation, ShapeKind, Size};
use crate::error::GenerationError;
use crate::item::{Attribute, AttributeValue, VisualItem};
use crate::model::{Category, Difficulty, Prompt, Question};
use crate::record::RuleText;
use crate::rng::SeededRng;

const ALTERNATING: [Attribute; 3] = [Attribute::Color, Attribute::Shape, Attribute::Size];
const CYCLING: [Attribute; 2] = [Attribute::Color, Attribute::Shape];

fn baseline(rng: &mut SeededRng) -> Result<VisualItem, GenerationError> {
    let kind = rng.pick(&ShapeKind::ALL)?;
    let color = rng.pick(&Color::ALL)?;
    let size = rng.pick(&Size::ALL)?;
    Ok(VisualItem::new(kind, color, size, Rotation::degrees(0)))
}

/// The full four-step chain, givens plus the bolded answer.
fn full_chain(prompt: &Prompt, correct: &VisualItem, attribute: Attribute, lang: Lang) -> String {
    let items = match prompt {
        Prompt::Sequence(items) => items.as_slice(),
        Prompt::Matrix(_) => &[],
    };
    format!(
        "{} → **{}**",
        chain(items, attribute, lang),
        label(correct, attribute, lang)
    )
}

fn constant_attributes(varying: Attribute, lang: Lang) -> String {
    let rest: Vec<&str> = ALTERNATING
        .iter()
        .filter(|a| **a != varying)
        .map(|a| a.name(lang))
        .collect();
    let joined = match lang {
        Lang::It => rest.join(" e "),
        Lang::En => rest.join(" and "),
    };
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}

pub(super) fn alternation_ab(rng: &mut SeededRng) -> Result<Question, GenerationError> {
    let attribute = rng.pick(&ALTERNATING)?;
    let base = baseline(rng)?;
    let a = base.value_of(attribute);
    let b = attribute.draw_distinct(rng, a)?;

    let spec = PatternSpec::sequence(base, vec![Rule::periodic(vec![a, b])?], 3);
    let (prompt, correct) = spec.render();
    let name = |lang| subject(attribute, lang);
    let value = |v: AttributeValue, lang| v.label(lang);

    let text = RuleText {
        prompt: Bilingual::new(
            format!(
                "{} alterna tra {} (A) e {} (B) secondo il pattern ABAB. Quale figura viene dopo?",
                name(Lang::It),
                value(a, Lang::It),
                value(b, Lang::It)
            ),
            format!(
                "{} alternates between {} (A) and {} (B) following the ABAB pattern. Which figure comes next?",
                name(Lang::En),
                value(a, Lang::En),
                value(b, Lang::En)
            ),
        ),
        explanation: Bilingual::new(
            format!(
                "Il pattern ABAB: {}. {} restano costanti.",
                full_chain(&prompt, &correct, attribute, Lang::It),
                constant_attributes(attribute, Lang::It)
            ),
            format!(
                "The ABAB pattern: {}. {} remain constant.",
                full_chain(&prompt, &correct, attribute, Lang::En),
                constant_attributes(attribute, Lang::En)
            ),
        ),
        motivation: Bilingual::text(
            "Nell'alternanza ABAB il pattern si ripete ogni 2 passi: il 4° elemento è uguale al 2°.",
            "In ABAB alternation the pattern repeats every 2 steps: the 4th element equals the 2nd.",
        ),
    };

    let mut violations = vec![attribute];
    violations.extend(ALTERNATING.iter().copied().filter(|a| *a != attribute));
    complete(
        rng,
        prompt,
        correct,
        &violations,
        text,
        Category::Alternation,
        Difficulty::Easy,
    )
}

pub(super) fn abc_cycle(rng: &mut SeededRng) -> Result<Question, GenerationError> {
    let attribute = rng.pick(&CYCLING)?;
    let base = baseline(rng)?;
    let table = attribute.domain();
    let start = rng.pick_index(table.len());
    let values = (0..3).map(|k| table[(start + k) % table.len()]).collect();

    let spec = PatternSpec::sequence(base, vec![Rule::periodic(values)?], 3);
    let (prompt, correct) = spec.render();
    let items = match &prompt {
        Prompt::Sequence(items) => items.clone(),
        Prompt::Matrix(_) => Vec::new(),
    };
    let givens = |lang| chain(&items, attribute, lang);

    let text = RuleText {
        prompt: Bilingual::new(
            format!(
                "{} segue il ciclo ABC ({} → ?). Quale figura viene dopo?",
                subject(attribute, Lang::It),
                givens(Lang::It)
            ),
            format!(
                "{} follows the ABC cycle ({} → ?). Which figure comes next?",
                subject(attribute, Lang::En),
                givens(Lang::En)
            ),
        ),
        explanation: Bilingual::new(
            format!(
                "Ciclo ABCA: {}. Dopo tre valori distinti il ciclo riparte da A.",
                full_chain(&prompt, &correct, attribute, Lang::It)
            ),
            format!(
                "ABCA cycle: {}. After three distinct values the cycle restarts from A.",
                full_chain(&prompt, &correct, attribute, Lang::En)
            ),
        ),
        motivation: Bilingual::text(
            "Nel ciclo ABC il 4° elemento è uguale al 1°: il pattern si ripete ogni 3 passi.",
            "In the ABC cycle the 4th element equals the 1st: the pattern repeats every 3 steps.",
        ),
    };

    let other = CYCLING
        .iter()
        .copied()
        .find(|a| *a != attribute)
        .unwrap_or(Attribute::Size);
    complete(
        rng,
        prompt,
        correct,
        &[attribute, attribute, other],
        text,
        Category::Alternation,
        Difficulty::Medium,
    )
}
