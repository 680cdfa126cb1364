//! Weakness analysis over a study log.
//!
//! The log is the JSON export of a learner's per-question counters and
//! past sessions. Scores rank what to drill next: higher means weaker.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score given to questions that were never attempted.
pub const UNSEEN_SCORE: f64 = 60.0;

/// Default size of a drill.
pub const DEFAULT_DRILL_SIZE: usize = 20;

/// Running counters for one question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionStat {
    pub attempts: u32,
    pub correct: u32,
    /// Consecutive correct answers up to the latest attempt.
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl QuestionStat {
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.attempts)
        }
    }
}

/// One answered question inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub correct: bool,
}

/// One completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub section: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Session {
    pub fn correct(&self) -> u32 {
        self.answers.iter().filter(|a| a.correct).count() as u32
    }
}

/// A learner's exported history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyLog {
    #[serde(default)]
    pub question_stats: BTreeMap<String, QuestionStat>,
    #[serde(default)]
    pub history: Vec<Session>,
}

impl StudyLog {
    /// Load a study log from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read study log: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse study log: {}", path.display()))
    }
}

/// Severity bucket for an accuracy percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaknessLevel {
    Critical,
    Weak,
    Moderate,
    Strong,
}

impl WeaknessLevel {
    /// Bucket an accuracy given as a percentage in `0..=100`.
    pub fn from_percent(percent: f64) -> Self {
        if percent < 40.0 {
            WeaknessLevel::Critical
        } else if percent < 60.0 {
            WeaknessLevel::Weak
        } else if percent < 80.0 {
            WeaknessLevel::Moderate
        } else {
            WeaknessLevel::Strong
        }
    }
}

impl fmt::Display for WeaknessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeaknessLevel::Critical => "critical",
            WeaknessLevel::Weak => "weak",
            WeaknessLevel::Moderate => "moderate",
            WeaknessLevel::Strong => "strong",
        })
    }
}

/// `(1 - accuracy) * 100` plus up to 20 points of confidence once a
/// question has ten or more attempts.
pub fn weakness_score(accuracy: f64, attempts: u32) -> f64 {
    let confidence = (f64::from(attempts) / 10.0).min(1.0);
    (1.0 - accuracy) * 100.0 + confidence * 20.0
}

/// Aggregate over every answer tagged with one (section, category) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWeakness {
    pub section: String,
    pub category: String,
    pub attempts: u32,
    pub correct: u32,
    /// Rounded percentage.
    pub accuracy: u32,
    pub score: f64,
    pub level: WeaknessLevel,
}

/// Per-question view of the stats table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionWeakness {
    pub question_id: String,
    pub attempts: u32,
    pub correct: u32,
    pub streak: u32,
    pub last_seen: Option<DateTime<Utc>>,
    /// Rounded percentage.
    pub accuracy: u32,
    pub score: f64,
    pub level: WeaknessLevel,
}

/// Both views, each sorted worst accuracy first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeaknessAnalysis {
    pub categories: Vec<CategoryWeakness>,
    pub questions: Vec<QuestionWeakness>,
}

/// Analyze a study log. Answers without a category or question id are
/// skipped; questions with no attempts are left out of the question view.
pub fn analyze(log: &StudyLog) -> WeaknessAnalysis {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut totals: Vec<(&str, &str, u32, u32)> = Vec::new();
    for session in &log.history {
        for answer in &session.answers {
            let (Some(category), Some(_)) = (answer.category.as_deref(), &answer.question_id)
            else {
                continue;
            };
            let key = (session.section.as_str(), category);
            let slot = *index.entry(key).or_insert_with(|| {
                totals.push((key.0, key.1, 0, 0));
                totals.len() - 1
            });
            totals[slot].2 += 1;
            if answer.correct {
                totals[slot].3 += 1;
            }
        }
    }

    let mut categories: Vec<CategoryWeakness> = totals
        .into_iter()
        .map(|(section, category, attempts, correct)| {
            let accuracy = f64::from(correct) / f64::from(attempts);
            CategoryWeakness {
                section: section.to_string(),
                category: category.to_string(),
                attempts,
                correct,
                accuracy: (accuracy * 100.0).round() as u32,
                score: weakness_score(accuracy, attempts),
                level: WeaknessLevel::from_percent(accuracy * 100.0),
            }
        })
        .collect();
    categories.sort_by_key(|c| c.accuracy);

    let mut questions: Vec<QuestionWeakness> = log
        .question_stats
        .iter()
        .filter(|(_, s)| s.attempts > 0)
        .map(|(id, s)| {
            let accuracy = s.accuracy();
            QuestionWeakness {
                question_id: id.clone(),
                attempts: s.attempts,
                correct: s.correct,
                streak: s.streak,
                last_seen: s.last_seen,
                accuracy: (accuracy * 100.0).round() as u32,
                score: weakness_score(accuracy, s.attempts),
                level: WeaknessLevel::from_percent(accuracy * 100.0),
            }
        })
        .collect();
    questions.sort_by_key(|q| q.accuracy);

    tracing::debug!(
        categories = categories.len(),
        questions = questions.len(),
        "weakness analysis complete"
    );
    WeaknessAnalysis {
        categories,
        questions,
    }
}

/// Pick up to `count` question ids to drill, weakest first. Ties keep
/// the candidates' order.
pub fn select_drill<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    stats: &BTreeMap<String, QuestionStat>,
    count: usize,
) -> Vec<String> {
    let mut scored: Vec<(&str, f64)> = candidates
        .into_iter()
        .map(|id| {
            let score = match stats.get(id) {
                Some(s) if s.attempts > 0 => weakness_score(s.accuracy(), s.attempts),
                _ => UNSEEN_SCORE,
            };
            (id, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
        .into_iter()
        .take(count)
        .map(|(id, _)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(attempts: u32, correct: u32) -> QuestionStat {
        QuestionStat {
            attempts,
            correct,
            ..QuestionStat::default()
        }
    }

    fn log() -> StudyLog {
        serde_json::from_str(
            r#"{
                "question_stats": {
                    "ar-001": {"attempts": 4, "correct": 1, "streak": 0, "last_seen": "2026-03-01T10:00:00Z"},
                    "ar-002": {"attempts": 2, "correct": 2, "streak": 2, "last_seen": null},
                    "ar-003": {"attempts": 0, "correct": 0}
                },
                "history": [
                    {"section": "abstract-reasoning", "date": "2026-03-01T10:00:00Z", "answers": [
                        {"question_id": "ar-001", "category": "color_sequence", "correct": false},
                        {"question_id": "ar-002", "category": "matrix_completion", "correct": true},
                        {"question_id": "ar-004", "category": "color_sequence", "correct": true},
                        {"question_id": "ar-005", "correct": false}
                    ]},
                    {"section": "abstract-reasoning", "answers": [
                        {"question_id": "ar-001", "category": "color_sequence", "correct": false},
                        {"category": "matrix_completion", "correct": false}
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn score_formula() {
        assert!((weakness_score(0.0, 0) - 100.0).abs() < f64::EPSILON);
        assert!((weakness_score(1.0, 10) - 20.0).abs() < f64::EPSILON);
        assert!((weakness_score(0.5, 5) - 60.0).abs() < f64::EPSILON);
        assert!((weakness_score(0.5, 50) - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(WeaknessLevel::from_percent(39.9), WeaknessLevel::Critical);
        assert_eq!(WeaknessLevel::from_percent(40.0), WeaknessLevel::Weak);
        assert_eq!(WeaknessLevel::from_percent(60.0), WeaknessLevel::Moderate);
        assert_eq!(WeaknessLevel::from_percent(80.0), WeaknessLevel::Strong);
    }

    #[test]
    fn categories_group_by_section_and_sort_worst_first() {
        let analysis = analyze(&log());
        assert_eq!(analysis.categories.len(), 2);

        let first = &analysis.categories[0];
        assert_eq!(first.category, "color_sequence");
        assert_eq!((first.attempts, first.correct, first.accuracy), (3, 1, 33));
        assert_eq!(first.level, WeaknessLevel::Critical);

        let second = &analysis.categories[1];
        assert_eq!(second.category, "matrix_completion");
        assert_eq!((second.attempts, second.accuracy), (1, 100));
        assert_eq!(second.level, WeaknessLevel::Strong);
    }

    #[test]
    fn question_view_skips_unattempted() {
        let analysis = analyze(&log());
        let ids: Vec<_> = analysis
            .questions
            .iter()
            .map(|q| q.question_id.as_str())
            .collect();
        assert_eq!(ids, vec!["ar-001", "ar-002"]);
        assert_eq!(analysis.questions[0].accuracy, 25);
        assert!(analysis.questions[0].last_seen.is_some());
    }

    #[test]
    fn drill_ranks_weakest_and_unseen() {
        let mut stats = BTreeMap::new();
        stats.insert("a".to_string(), stat(10, 10)); // 20
        stats.insert("b".to_string(), stat(4, 0)); // 108
        stats.insert("c".to_string(), stat(2, 1)); // 54
        let drill = select_drill(["a", "b", "c", "d"], &stats, 3);
        assert_eq!(drill, vec!["b", "d", "c"]);
    }

    #[test]
    fn drill_ties_keep_candidate_order() {
        let drill = select_drill(["x", "y", "z"], &BTreeMap::new(), DEFAULT_DRILL_SIZE);
        assert_eq!(drill, vec!["x", "y", "z"]);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        std::fs::write(&path, serde_json::to_string(&log()).unwrap()).unwrap();
        assert_eq!(StudyLog::load(&path).unwrap(), log());
        assert!(StudyLog::load(&dir.path().join("missing.json")).is_err());
    }
}
