//! Idempotent normalization of persisted banks.
//!
//! Works on raw JSON records so it can patch any bank, including ones not
//! produced by the generator. Only the explanation and text fields are
//! touched; a second pass over repaired output changes nothing.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::corpus::{load_bank, write_bank};
use crate::domain::Lang;
use crate::model::OPTION_COUNT;

/// One kind of change the repair pass can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fix {
    /// Both languages' wrong-explanation arrays were rebuilt.
    RebuiltExplanations,
    /// Only the English array was rebuilt.
    RebuiltEnglishExplanations,
    /// The entry at the correct index was blanked.
    ClearedCorrectExplanation,
    /// Question text was copied from the other language.
    CopiedQuestionText,
    /// Motivation was filled from the explanation.
    FilledMotivation,
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fix::RebuiltExplanations => "rebuilt wrong explanations",
            Fix::RebuiltEnglishExplanations => "rebuilt English wrong explanations",
            Fix::ClearedCorrectExplanation => "cleared correct-option explanation",
            Fix::CopiedQuestionText => "copied question text",
            Fix::FilledMotivation => "filled motivation",
        })
    }
}

/// Totals of one repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub records: usize,
    pub by_fix: BTreeMap<Fix, usize>,
    /// Ids of records whose `correct` is unusable; index-dependent fixes
    /// were skipped for them.
    pub skipped: Vec<String>,
}

impl RepairReport {
    pub fn fixes(&self) -> usize {
        self.by_fix.values().sum()
    }

    fn merge(&mut self, other: RepairReport) {
        self.records += other.records;
        for (fix, n) in other.by_fix {
            *self.by_fix.entry(fix).or_default() += n;
        }
        self.skipped.extend(other.skipped);
    }
}

fn placeholder(lang: Lang) -> &'static str {
    match lang {
        Lang::It => "Risposta non corretta.",
        Lang::En => "Incorrect answer.",
    }
}

fn explanations_key(lang: Lang) -> String {
    format!("wrong_explanations_{}", lang.code())
}

fn placeholder_explanations(correct: usize, lang: Lang) -> Value {
    Value::Array(
        (0..OPTION_COUNT)
            .map(|i| {
                if i == correct {
                    Value::from("")
                } else {
                    Value::from(placeholder(lang))
                }
            })
            .collect(),
    )
}

fn has_full_array(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key)
        .and_then(Value::as_array)
        .is_some_and(|a| a.len() == OPTION_COUNT)
}

fn text_of<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Repair one record in place and return what changed, plus the record id
/// when `correct` is not an index in `0..4`.
pub fn repair_record(record: &mut Value) -> (Vec<Fix>, Option<String>) {
    let mut fixes = Vec::new();
    let Some(obj) = record.as_object_mut() else {
        return (fixes, Some("<not an object>".to_string()));
    };
    let id = text_of(obj, "id").to_string();

    let correct = obj
        .get("correct")
        .and_then(Value::as_u64)
        .map(|c| c as usize)
        .filter(|c| *c < OPTION_COUNT);

    let skipped = match correct {
        Some(correct) => {
            if !has_full_array(obj, &explanations_key(Lang::It)) {
                for lang in Lang::ALL {
                    obj.insert(explanations_key(lang), placeholder_explanations(correct, lang));
                }
                fixes.push(Fix::RebuiltExplanations);
            }
            if !has_full_array(obj, &explanations_key(Lang::En)) {
                obj.insert(
                    explanations_key(Lang::En),
                    placeholder_explanations(correct, Lang::En),
                );
                fixes.push(Fix::RebuiltEnglishExplanations);
            }
            for lang in Lang::ALL {
                let key = explanations_key(lang);
                if let Some(slot) = obj
                    .get_mut(&key)
                    .and_then(Value::as_array_mut)
                    .and_then(|a| a.get_mut(correct))
                {
                    if slot.as_str() != Some("") {
                        *slot = Value::from("");
                        fixes.push(Fix::ClearedCorrectExplanation);
                    }
                }
            }
            None
        }
        None => Some(id.clone()),
    };

    for (to, from) in [("question_it", "question_en"), ("question_en", "question_it")] {
        if text_of(obj, to).is_empty() && !text_of(obj, from).is_empty() {
            let text = text_of(obj, from).to_string();
            obj.insert(to.to_string(), Value::from(text));
            fixes.push(Fix::CopiedQuestionText);
        }
    }

    for lang in Lang::ALL {
        let motivation = format!("motivation_{}", lang.code());
        let explanation = text_of(obj, &format!("explanation_{}", lang.code())).to_string();
        let current = obj.get(&motivation).and_then(Value::as_str);
        let needs_fill = match current {
            None => true,
            Some("") => !explanation.is_empty(),
            Some(_) => false,
        };
        if needs_fill {
            obj.insert(motivation, Value::from(explanation));
            fixes.push(Fix::FilledMotivation);
        }
    }

    (fixes, skipped)
}

/// Repair every record of a bank in place.
pub fn repair_records(records: &mut [Value]) -> RepairReport {
    let mut report = RepairReport {
        records: records.len(),
        ..RepairReport::default()
    };
    for record in records.iter_mut() {
        let (fixes, skipped) = repair_record(record);
        for fix in fixes {
            *report.by_fix.entry(fix).or_default() += 1;
        }
        if let Some(id) = skipped {
            tracing::warn!(question_id = %id, "correct index unusable, explanation fixes skipped");
            report.skipped.push(id);
        }
    }
    report
}

/// Repair a bank file; writes only when `write` is set and something changed.
pub fn repair_file(path: &Path, write: bool) -> Result<RepairReport> {
    let mut records = load_bank(path)?;
    let report = repair_records(&mut records);
    if write && report.fixes() > 0 {
        write_bank(path, &records)?;
        tracing::info!(fixes = report.fixes(), path = %path.display(), "bank repaired");
    }
    Ok(report)
}

/// Repair several bank files and total the results.
pub fn repair_files(paths: &[impl AsRef<Path>], write: bool) -> Result<RepairReport> {
    let mut total = RepairReport::default();
    for path in paths {
        total.merge(repair_file(path.as_ref(), write)?);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn broken() -> Value {
        json!({
            "id": "vr-001",
            "question_it": "",
            "question_en": "Which one?",
            "correct": 2,
            "explanation_it": "Perché sì.",
            "explanation_en": "Because.",
            "wrong_explanations_it": ["a", "b"],
            "wrong_explanations_en": ["a", "b", "c", "d"]
        })
    }

    #[test]
    fn rebuilds_short_explanation_arrays() {
        let mut record = broken();
        let (fixes, skipped) = repair_record(&mut record);
        assert!(skipped.is_none());
        assert!(fixes.contains(&Fix::RebuiltExplanations));
        assert_eq!(
            record["wrong_explanations_it"],
            json!(["Risposta non corretta.", "Risposta non corretta.", "", "Risposta non corretta."])
        );
        assert_eq!(record["wrong_explanations_en"][2], "");
        assert_eq!(record["wrong_explanations_en"][0], "Incorrect answer.");
    }

    #[test]
    fn copies_text_and_fills_motivation() {
        let mut record = broken();
        repair_record(&mut record);
        assert_eq!(record["question_it"], "Which one?");
        assert_eq!(record["motivation_it"], "Perché sì.");
        assert_eq!(record["motivation_en"], "Because.");
    }

    #[test]
    fn clears_correct_entry_only() {
        let mut record = json!({
            "id": "eu-003",
            "question_it": "q", "question_en": "q",
            "motivation_it": "m", "motivation_en": "m",
            "correct": 1,
            "wrong_explanations_it": ["a", "b", "c", "d"],
            "wrong_explanations_en": ["a", "", "c", "d"]
        });
        let (fixes, _) = repair_record(&mut record);
        assert_eq!(fixes, vec![Fix::ClearedCorrectExplanation]);
        assert_eq!(record["wrong_explanations_it"], json!(["a", "", "c", "d"]));
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut records = vec![
            broken(),
            json!({"id": "x-1", "correct": 0}),
            json!({"id": "x-2", "correct": 9, "question_it": "a"}),
        ];
        let first = repair_records(&mut records);
        assert!(first.fixes() > 0);
        let snapshot = records.clone();
        let second = repair_records(&mut records);
        assert_eq!(second.fixes(), 0);
        assert_eq!(records, snapshot);
    }

    #[test]
    fn bad_correct_index_is_reported() {
        let mut records = vec![json!({"id": "x-2", "correct": 9})];
        let report = repair_records(&mut records);
        assert_eq!(report.skipped, vec!["x-2".to_string()]);
        assert!(records[0].get("wrong_explanations_it").is_none());
    }

    #[test]
    fn file_round_trip_and_check_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json");
        std::fs::write(&path, serde_json::to_string(&vec![broken()]).unwrap()).unwrap();

        let checked = repair_file(&path, false).unwrap();
        assert!(checked.fixes() > 0);
        let untouched: Vec<Value> = load_bank(&path).unwrap();
        assert_eq!(untouched[0]["question_it"], "");

        let applied = repair_files(&[&path], true).unwrap();
        assert_eq!(applied.fixes(), checked.fixes());
        assert_eq!(repair_file(&path, false).unwrap().fixes(), 0);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("]\n"));
    }
}
