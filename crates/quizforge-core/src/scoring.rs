//! Exam section table and score arithmetic.
//!
//! Pure functions over per-section results. Nothing here touches the
//! question bank; the CLI feeds these from a study log.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Pass threshold shared by two sections that are scored together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombinedPass {
    /// Section whose score is added to this one.
    pub partner: &'static str,
    /// Minimum combined score.
    pub pass_score: u32,
    /// Combined number of questions.
    pub total_questions: u32,
}

/// One exam section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Section {
    pub id: &'static str,
    /// Time allowance per question, in seconds.
    pub seconds_per_question: u32,
    /// Minimum score for the section on its own.
    pub pass_score: u32,
    pub total_questions: u32,
    /// Contribution to the weighted score. Zero means the section is
    /// excluded from it.
    pub weight: f64,
    pub combined: Option<CombinedPass>,
}

impl Section {
    /// Total time allowance for the section, in seconds.
    pub fn time_limit(&self) -> u32 {
        self.seconds_per_question * self.total_questions
    }
}

pub const SECTIONS: [Section; 6] = [
    Section {
        id: "eu-knowledge",
        seconds_per_question: 80,
        pass_score: 15,
        total_questions: 30,
        weight: 0.25,
        combined: None,
    },
    Section {
        id: "digital-skills",
        seconds_per_question: 45,
        pass_score: 20,
        total_questions: 40,
        weight: 0.25,
        combined: None,
    },
    Section {
        id: "verbal-reasoning",
        seconds_per_question: 105,
        pass_score: 10,
        total_questions: 20,
        weight: 0.35,
        combined: None,
    },
    Section {
        id: "numerical-reasoning",
        seconds_per_question: 120,
        pass_score: 10,
        total_questions: 10,
        weight: 0.0,
        combined: Some(CombinedPass {
            partner: "abstract-reasoning",
            pass_score: 10,
            total_questions: 20,
        }),
    },
    Section {
        id: "abstract-reasoning",
        seconds_per_question: 60,
        pass_score: 10,
        total_questions: 10,
        weight: 0.0,
        combined: Some(CombinedPass {
            partner: "numerical-reasoning",
            pass_score: 10,
            total_questions: 20,
        }),
    },
    Section {
        id: "eufte",
        seconds_per_question: 2400,
        pass_score: 5,
        total_questions: 1,
        weight: 0.15,
        combined: None,
    },
];

/// Look up a section by id.
pub fn section(id: &str) -> Option<&'static Section> {
    SECTIONS.iter().find(|s| s.id == id)
}

/// Correct answers out of questions asked, for one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    pub correct: u32,
    pub total: u32,
}

impl SectionScore {
    pub fn fraction(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.correct) / f64::from(self.total))
    }
}

/// Weighted score in `0..=100` over the weighted sections present in
/// `scores`. Sections with no questions asked contribute nothing.
pub fn weighted_score(scores: &HashMap<String, SectionScore>) -> u32 {
    let total: f64 = SECTIONS
        .iter()
        .filter(|s| s.weight > 0.0)
        .filter_map(|s| scores.get(s.id).and_then(SectionScore::fraction).map(|f| f * s.weight))
        .sum();
    (total * 100.0).round() as u32
}

/// Whether `score` meets the section's own threshold. Unknown sections
/// never pass.
pub fn is_passing(section_id: &str, score: u32) -> bool {
    section(section_id).is_some_and(|s| score >= s.pass_score)
}

/// Pass decision for a section scored jointly with its partner. `None`
/// when the section has no partner.
pub fn combined_passing(section_id: &str, score: u32, partner_score: u32) -> Option<bool> {
    let combined = section(section_id)?.combined?;
    Some(score + partner_score >= combined.pass_score)
}

/// Traffic-light classification of a section result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Pass,
    Borderline,
    Fail,
    Unscored,
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreBand::Pass => "pass",
            ScoreBand::Borderline => "borderline",
            ScoreBand::Fail => "fail",
            ScoreBand::Unscored => "unscored",
        })
    }
}

/// Classify `score` out of `total` answered questions. The pass threshold
/// is scaled to `total`; anything within a tenth of `total` below it is
/// borderline. Unknown sections and empty sessions are unscored.
pub fn score_band(section_id: &str, score: u32, total: u32) -> ScoreBand {
    let Some(section) = section(section_id) else {
        return ScoreBand::Unscored;
    };
    if total == 0 {
        return ScoreBand::Unscored;
    }
    let total = f64::from(total);
    let scaled = f64::from(section.pass_score) / f64::from(section.total_questions) * total;
    let score = f64::from(score);
    if score >= scaled {
        ScoreBand::Pass
    } else if score >= scaled - total * 0.1 {
        ScoreBand::Borderline
    } else {
        ScoreBand::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, u32, u32)]) -> HashMap<String, SectionScore> {
        entries
            .iter()
            .map(|(id, correct, total)| {
                (
                    id.to_string(),
                    SectionScore {
                        correct: *correct,
                        total: *total,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = SECTIONS.iter().map(|s| s.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_score_all_correct() {
        let s = scores(&[
            ("eu-knowledge", 30, 30),
            ("digital-skills", 40, 40),
            ("verbal-reasoning", 20, 20),
            ("eufte", 1, 1),
        ]);
        assert_eq!(weighted_score(&s), 100);
    }

    #[test]
    fn weighted_score_partial() {
        // 0.5 * 0.25 + 0.5 * 0.35 = 0.30
        let s = scores(&[("eu-knowledge", 15, 30), ("verbal-reasoning", 10, 20)]);
        assert_eq!(weighted_score(&s), 30);
    }

    #[test]
    fn zero_weight_and_empty_sections_are_ignored() {
        let s = scores(&[("abstract-reasoning", 10, 10), ("eu-knowledge", 0, 0)]);
        assert_eq!(weighted_score(&s), 0);
    }

    #[test]
    fn passing_thresholds() {
        assert!(is_passing("verbal-reasoning", 10));
        assert!(!is_passing("verbal-reasoning", 9));
        assert!(!is_passing("unknown", 100));
    }

    #[test]
    fn reasoning_sections_pass_jointly() {
        assert_eq!(combined_passing("abstract-reasoning", 4, 6), Some(true));
        assert_eq!(combined_passing("numerical-reasoning", 4, 5), Some(false));
        assert_eq!(combined_passing("eu-knowledge", 30, 30), None);
    }

    #[test]
    fn bands_scale_with_session_length() {
        assert_eq!(score_band("eu-knowledge", 15, 30), ScoreBand::Pass);
        assert_eq!(score_band("eu-knowledge", 12, 30), ScoreBand::Borderline);
        assert_eq!(score_band("eu-knowledge", 11, 30), ScoreBand::Fail);
        // Scaled threshold for a ten-question session is 5, borderline from 4.
        assert_eq!(score_band("eu-knowledge", 5, 10), ScoreBand::Pass);
        assert_eq!(score_band("eu-knowledge", 4, 10), ScoreBand::Borderline);
        assert_eq!(score_band("eu-knowledge", 3, 10), ScoreBand::Fail);
        assert_eq!(score_band("nope", 3, 10), ScoreBand::Unscored);
        assert_eq!(score_band("eu-knowledge", 0, 0), ScoreBand::Unscored);
    }

    #[test]
    fn time_limits() {
        assert_eq!(section("abstract-reasoning").unwrap().time_limit(), 600);
        assert_eq!(section("eu-knowledge").unwrap().time_limit(), 2400);
    }
}
