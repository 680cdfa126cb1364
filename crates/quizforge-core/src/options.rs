//! Answer-slot assembly and per-option explanations.

use crate::distractor::DISTRACTOR_COUNT;
use crate::domain::{Bilingual, Lang};
use crate::item::VisualItem;
use crate::model::OPTION_COUNT;
use crate::rng::SeededRng;

const _: () = assert!(OPTION_COUNT == DISTRACTOR_COUNT + 1);

/// The four placed options plus their explanations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    pub options: Vec<VisualItem>,
    pub correct: usize,
    pub wrong_explanations: Bilingual<Vec<String>>,
}

/// Place `correct` at a uniformly drawn index; distractors fill the other
/// slots in their given order.
pub fn assemble(
    rng: &mut SeededRng,
    correct: VisualItem,
    distractors: [VisualItem; DISTRACTOR_COUNT],
) -> AnswerSet {
    let correct_idx = rng.pick_index(OPTION_COUNT);
    let mut options = Vec::with_capacity(OPTION_COUNT);
    let mut d = 0;
    for i in 0..OPTION_COUNT {
        if i == correct_idx {
            options.push(correct);
        } else {
            options.push(distractors[d]);
            d += 1;
        }
    }

    let explain = |lang: Lang| -> Vec<String> {
        options
            .iter()
            .enumerate()
            .map(|(i, opt)| {
                if i == correct_idx {
                    String::new()
                } else {
                    explain_difference(opt, &correct, lang)
                }
            })
            .collect()
    };
    let wrong_explanations = Bilingual::new(explain(Lang::It), explain(Lang::En));

    AnswerSet {
        options,
        correct: correct_idx,
        wrong_explanations,
    }
}

/// Why `option` is not `correct`, e.g. "wrong shape, wrong color".
pub fn explain_difference(option: &VisualItem, correct: &VisualItem, lang: Lang) -> String {
    let diffs: Vec<&str> = option
        .differing(correct)
        .into_iter()
        .map(|a| a.wrong_phrase(lang))
        .collect();
    if diffs.is_empty() {
        return match lang {
            Lang::It => "Non segue il pattern".to_string(),
            Lang::En => "Does not follow the pattern".to_string(),
        };
    }
    diffs.join(", ")
}
