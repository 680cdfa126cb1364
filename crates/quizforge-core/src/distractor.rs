//! Distractor synthesis.
//!
//! Each distractor is the correct item with exactly one attribute replaced
//! by a different value (see `Attribute::draw_distinct`). The violated attribute for
//! distractor `d` is `violations[d % violations.len()]`, so a short list
//! repeats. Distractors are not deduplicated against each other.

use crate::error::GenerationError;
use crate::item::{Attribute, VisualItem};
use crate::rng::SeededRng;

/// Number of wrong options per question.
pub const DISTRACTOR_COUNT: usize = 3;

/// Build the wrong options for `correct`, violating `violations` in order.
pub fn synthesize(
    rng: &mut SeededRng,
    correct: VisualItem,
    violations: &[Attribute],
) -> Result<[VisualItem; DISTRACTOR_COUNT], GenerationError> {
    if violations.is_empty() {
        return Err(GenerationError::NoViolations);
    }
    let mut out = [correct; DISTRACTOR_COUNT];
    for (d, slot) in out.iter_mut().enumerate() {
        let attribute = violations[d % violations.len()];
        let wrong = attribute.draw_distinct(rng, correct.value_of(attribute))?;
        *slot = correct.with(wrong);
    }
    Ok(out)
}
