//! Question record builder.
//!
//! Joins a family's rule text with the assembled answer set. The id stays
//! empty here; the corpus assembler numbers questions across the whole run.

use crate::domain::Bilingual;
use crate::model::{Category, Difficulty, Prompt, Question};
use crate::options::AnswerSet;

/// Natural-language description of the rule behind one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleText {
    pub prompt: Bilingual,
    pub explanation: Bilingual,
    pub motivation: Bilingual,
}

pub fn build_question(
    prompt: Prompt,
    answers: AnswerSet,
    text: RuleText,
    category: Category,
    difficulty: Difficulty,
) -> Question {
    Question {
        id: String::new(),
        prompt_text: text.prompt,
        prompt,
        options: answers.options,
        correct: answers.correct,
        explanation: text.explanation,
        motivation: text.motivation,
        wrong_explanations: answers.wrong_explanations,
        category,
        difficulty,
    }
}
