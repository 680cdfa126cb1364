//! Single-attribute progressions: color, size, rotation, and shape.

use super::{chain, complete, label, Direction, PatternSpec, Rule};
use crate::domain::{Bilingual, Color, Lang, Rotation, ShapeKind, Size};
use crate::error::GenerationError;
use crate::item::{Attribute, VisualItem};
use crate::model::{Category, Difficulty, Prompt, Question};
use crate::record::RuleText;
use crate::rng::SeededRng;

/// Shapes whose orientation is visible when rotated.
const ORIENTED_SHAPES: [ShapeKind; 4] = [
    ShapeKind::Arrow,
    ShapeKind::Triangle,
    ShapeKind::Diamond,
    ShapeKind::Cross,
];

fn givens(prompt: &Prompt) -> &[VisualItem] {
    match prompt {
        Prompt::Sequence(items) => items,
        Prompt::Matrix(_) => &[],
    }
}

pub(super) fn color_cycle(
    rng: &mut SeededRng,
    prompt_length: usize,
) -> Result<Question, GenerationError> {
    let kind = rng.pick(&ShapeKind::ALL)?;
    let size = rng.pick(&Size::ALL)?;
    let start = rng.pick_index(Color::ALL.len());
    let step = rng.pick(&[1, 2])?;

    let spec = PatternSpec::sequence(
        VisualItem::new(kind, Color::Blue, size, Rotation::degrees(0)),
        vec![Rule::step(Attribute::Color, start, step)],
        prompt_length,
    );
    let (prompt, correct) = spec.render();
    let items = givens(&prompt);
    let colors = |lang| chain(items, Attribute::Color, lang);
    let answer = |lang| label(&correct, Attribute::Color, lang);

    let text = RuleText {
        prompt: Bilingual::new(
            format!("Le {prompt_length} figure mostrano una progressione di colore. Quale figura viene dopo?"),
            format!("The {prompt_length} figures show a color progression. Which figure comes next?"),
        ),
        explanation: Bilingual::new(
            format!(
                "Il colore segue un ciclo: {} → **{}**. La forma e la dimensione restano costanti.",
                colors(Lang::It),
                answer(Lang::It)
            ),
            format!(
                "The color follows a cycle: {} → **{}**. Shape and size remain constant.",
                colors(Lang::En),
                answer(Lang::En)
            ),
        ),
        motivation: Bilingual::new(
            format!("Confronta figure consecutive: il colore avanza di {step} posizione/i nella palette ad ogni passo."),
            format!("Compare consecutive figures: the color advances by {step} position(s) in the palette each step."),
        ),
    };
    let difficulty = if prompt_length <= 3 {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    };
    complete(
        rng,
        prompt,
        correct,
        &[Attribute::Color, Attribute::Shape, Attribute::Size],
        text,
        Category::ColorProgression,
        difficulty,
    )
}

pub(super) fn size_progression(
    rng: &mut SeededRng,
    direction: Direction,
) -> Result<Question, GenerationError> {
    let kind = rng.pick(&ShapeKind::ALL)?;
    let color = rng.pick(&Color::ALL)?;
    let rule = match direction {
        Direction::Forward => Rule::step(Attribute::Size, 0, 1),
        Direction::Reverse => Rule::step(Attribute::Size, 2, -1),
    };

    let spec = PatternSpec::sequence(
        VisualItem::new(kind, color, Size::Small, Rotation::degrees(0)),
        vec![rule],
        3,
    );
    let (prompt, correct) = spec.render();
    let items = givens(&prompt);
    let sizes = |lang| chain(items, Attribute::Size, lang);
    let answer = |lang| label(&correct, Attribute::Size, lang);
    let (trend_it, trend_en) = match direction {
        Direction::Forward => ("aumenta", "increases"),
        Direction::Reverse => ("diminuisce", "decreases"),
    };

    let text = RuleText {
        prompt: Bilingual::new(
            format!(
                "La dimensione delle figure {trend_it} ({}). Quale figura completa la serie con la quarta dimensione del ciclo?",
                sizes(Lang::It)
            ),
            format!(
                "The size of the figures {trend_en} ({}). Which figure completes the series with the fourth size in the cycle?",
                sizes(Lang::En)
            ),
        ),
        explanation: Bilingual::new(
            format!(
                "La dimensione segue il ciclo: {} → **{}**. La forma e il colore rimangono costanti.",
                sizes(Lang::It),
                answer(Lang::It)
            ),
            format!(
                "The size follows the cycle: {} → **{}**. Shape and color remain constant.",
                sizes(Lang::En),
                answer(Lang::En)
            ),
        ),
        motivation: Bilingual::text(
            "Le dimensioni sono solo tre: dopo la terza il ciclo riparte dalla prima.",
            "There are only three sizes: after the third one the cycle restarts from the first.",
        ),
    };
    complete(
        rng,
        prompt,
        correct,
        &[Attribute::Color, Attribute::Shape, Attribute::Size],
        text,
        Category::SizeProgression,
        Difficulty::Easy,
    )
}

pub(super) fn rotation_progression(rng: &mut SeededRng) -> Result<Question, GenerationError> {
    let kind = rng.pick(&ORIENTED_SHAPES)?;
    let color = rng.pick(&Color::ALL)?;
    let size = rng.pick(&Size::ALL)?;
    let start = rng.pick(&[0i64, 45, 90])?;
    let delta = rng.pick(&[45i64, 90, 135])?;

    let spec = PatternSpec::sequence(
        VisualItem::new(kind, color, size, Rotation::degrees(start)),
        vec![Rule::turn(start, delta)],
        3,
    );
    let (prompt, correct) = spec.render();
    let angles = chain(givens(&prompt), Attribute::Rotation, Lang::En);
    let answer = correct.rotation;

    let text = RuleText {
        prompt: Bilingual::new(
            format!("La figura ruota di {delta}° ad ogni passo ({angles} → ?). Quale figura viene dopo?"),
            format!("The figure rotates by {delta}° each step ({angles} → ?). Which figure comes next?"),
        ),
        explanation: Bilingual::new(
            format!("La rotazione aumenta di **{delta}°** ad ogni passo: {angles} → **{answer}**. Il colore e la dimensione restano costanti."),
            format!("The rotation increases by **{delta}°** each step: {angles} → **{answer}**. Color and size remain constant."),
        ),
        motivation: Bilingual::new(
            format!("Calcola: {start}° + {delta}° × 3 = {answer} (modulo 360°). Osserva l'orientamento della forma."),
            format!("Calculate: {start}° + {delta}° × 3 = {answer} (modulo 360°). Watch the orientation of the shape."),
        ),
    };
    let difficulty = if delta == 90 {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    };
    complete(
        rng,
        prompt,
        correct,
        &[Attribute::Rotation, Attribute::Color, Attribute::Shape],
        text,
        Category::RotationProgression,
        difficulty,
    )
}

pub(super) fn shape_sequence(rng: &mut SeededRng) -> Result<Question, GenerationError> {
    let color = rng.pick(&Color::ALL)?;
    let size = rng.pick(&Size::ALL)?;
    let start = rng.pick_index(ShapeKind::ALL.len());
    let step = rng.pick(&[1, 2, 3])?;

    let spec = PatternSpec::sequence(
        VisualItem::new(ShapeKind::Circle, color, size, Rotation::degrees(0)),
        vec![Rule::step(Attribute::Shape, start, step)],
        3,
    );
    let (prompt, correct) = spec.render();
    let items = givens(&prompt);
    let shapes = |lang| chain(items, Attribute::Shape, lang);
    let answer = |lang| label(&correct, Attribute::Shape, lang);
    let table = |lang| {
        ShapeKind::ALL
            .iter()
            .map(|k| k.label(lang))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let text = RuleText {
        prompt: Bilingual::new(
            format!("Le forme cambiano secondo una sequenza ({} → ?). Quale figura viene dopo?", shapes(Lang::It)),
            format!("The shapes change according to a sequence ({} → ?). Which figure comes next?", shapes(Lang::En)),
        ),
        explanation: Bilingual::new(
            format!(
                "La sequenza di forme è: {} → **{}**. Il colore e la dimensione rimangono costanti.",
                shapes(Lang::It),
                answer(Lang::It)
            ),
            format!(
                "The shape sequence is: {} → **{}**. Color and size remain constant.",
                shapes(Lang::En),
                answer(Lang::En)
            ),
        ),
        motivation: Bilingual::new(
            format!("Ogni forma avanza di {step} posizione/i nella lista: {}.", table(Lang::It)),
            format!("Each shape advances by {step} position(s) in the list: {}.", table(Lang::En)),
        ),
    };
    let difficulty = if step == 1 {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    };
    complete(
        rng,
        prompt,
        correct,
        &[Attribute::Shape, Attribute::Color, Attribute::Size],
        text,
        Category::ShapeSequence,
        difficulty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(q: &Question) -> &[VisualItem] {
        givens(&q.prompt)
    }

    #[test]
    fn color_cycle_keeps_shape_and_size() {
        for seed in 0..50 {
            let mut rng = SeededRng::new(seed);
            let q = color_cycle(&mut rng, 4).unwrap();
            let items = sequence(&q);
            assert_eq!(items.len(), 4);
            let answer = q.correct_option().unwrap();
            for item in items {
                assert_eq!(item.kind, answer.kind);
                assert_eq!(item.size, answer.size);
            }
            assert_eq!(q.difficulty, Difficulty::Medium);
            assert_eq!(q.category, Category::ColorProgression);
        }
    }

    #[test]
    fn color_cycle_short_prompt_is_easy() {
        let mut rng = SeededRng::new(3);
        let q = color_cycle(&mut rng, 3).unwrap();
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert!(q.prompt_text.en.starts_with("The 3 figures"));
    }

    /// Forward progressions wrap back to small; reverse ones to large.
    #[test]
    fn size_progression_wraps() {
        for seed in 0..20 {
            let mut rng = SeededRng::new(seed);
            let forward = size_progression(&mut rng, Direction::Forward).unwrap();
            let sizes: Vec<_> = sequence(&forward).iter().map(|i| i.size).collect();
            assert_eq!(sizes, vec![Size::Small, Size::Medium, Size::Large]);
            assert_eq!(forward.correct_option().unwrap().size, Size::Small);

            let reverse = size_progression(&mut rng, Direction::Reverse).unwrap();
            let sizes: Vec<_> = sequence(&reverse).iter().map(|i| i.size).collect();
            assert_eq!(sizes, vec![Size::Large, Size::Medium, Size::Small]);
            assert_eq!(reverse.correct_option().unwrap().size, Size::Large);
        }
    }

    #[test]
    fn size_distractors_each_break_one_attribute() {
        for seed in 0..50 {
            let mut rng = SeededRng::new(seed);
            let q = size_progression(&mut rng, Direction::Forward).unwrap();
            let answer = *q.correct_option().unwrap();
            let mut broken: Vec<Attribute> = q
                .options
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != q.correct)
                .flat_map(|(_, o)| o.differing(&answer))
                .collect();
            broken.sort();
            assert_eq!(broken, vec![Attribute::Shape, Attribute::Color, Attribute::Size]);
        }
    }

    /// The wrong-size option of a forward progression is always medium.
    #[test]
    fn forward_size_distractor_is_medium() {
        for seed in 0..200 {
            let mut rng = SeededRng::new(seed);
            let q = size_progression(&mut rng, Direction::Forward).unwrap();
            let answer = *q.correct_option().unwrap();
            let wrong_size: Vec<Size> = q
                .options
                .iter()
                .filter(|o| o.differing(&answer) == vec![Attribute::Size])
                .map(|o| o.size)
                .collect();
            assert_eq!(wrong_size, vec![Size::Medium], "seed {seed}");
        }
    }

    #[test]
    fn rotation_steps_are_constant() {
        for seed in 0..50 {
            let mut rng = SeededRng::new(seed);
            let q = rotation_progression(&mut rng).unwrap();
            let mut angles: Vec<i64> = sequence(&q)
                .iter()
                .map(|i| i64::from(i.rotation.as_degrees()))
                .collect();
            angles.push(i64::from(q.correct_option().unwrap().rotation.as_degrees()));
            let deltas: Vec<i64> = angles
                .windows(2)
                .map(|w| (w[1] - w[0]).rem_euclid(360))
                .collect();
            assert!(deltas.iter().all(|d| *d == deltas[0]));
            assert!(ORIENTED_SHAPES.contains(&sequence(&q)[0].kind));
            let expected = if deltas[0] == 90 {
                Difficulty::Easy
            } else {
                Difficulty::Medium
            };
            assert_eq!(q.difficulty, expected);
        }
    }

    #[test]
    fn shape_sequence_difficulty_follows_step() {
        let mut saw_easy = false;
        let mut saw_medium = false;
        for seed in 0..60 {
            let mut rng = SeededRng::new(seed);
            let q = shape_sequence(&mut rng).unwrap();
            let items = sequence(&q);
            let index = |k: ShapeKind| ShapeKind::ALL.iter().position(|s| *s == k).unwrap();
            let step = (index(items[1].kind) + 8 - index(items[0].kind)) % 8;
            match q.difficulty {
                Difficulty::Easy => {
                    saw_easy = true;
                    assert_eq!(step, 1);
                }
                Difficulty::Medium => {
                    saw_medium = true;
                    assert!(step == 2 || step == 3);
                }
                Difficulty::Hard => panic!("shape sequences are never hard"),
            }
        }
        assert!(saw_easy && saw_medium);
    }
}
