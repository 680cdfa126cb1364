//! Corpus-level properties checked through the library API.

use std::collections::HashSet;

use serde_json::Value;
use tempfile::TempDir;

use quizforge_core::corpus::{load_bank, CorpusAssembler, CorpusOptions, NoopReporter};
use quizforge_core::error::CorpusError;
use quizforge_core::manifest::Manifest;
use quizforge_core::model::{Prompt, Question, OPTION_COUNT};
use quizforge_core::validation::Invariant;

const RECORD_KEYS: [&str; 14] = [
    "id",
    "question_it",
    "question_en",
    "options_shapes",
    "options",
    "correct",
    "explanation_it",
    "explanation_en",
    "motivation_it",
    "motivation_en",
    "wrong_explanations_it",
    "wrong_explanations_en",
    "category",
    "difficulty",
];

const ITEM_KEYS: [&str; 4] = ["type", "fill", "size", "rotation"];

fn standard_questions(seed: Option<u32>) -> Vec<Question> {
    let mut options = CorpusOptions::new("unused.json");
    options.seed_override = seed;
    CorpusAssembler::new(Manifest::standard(), options)
        .plan(&NoopReporter)
        .unwrap()
        .questions
}

fn assert_item_keys(item: &Value) {
    let keys: HashSet<&str> = item
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ITEM_KEYS.into_iter().collect::<HashSet<_>>());
}

#[test]
fn same_seed_same_questions() {
    assert_eq!(standard_questions(None), standard_questions(None));
    assert_eq!(standard_questions(Some(5)), standard_questions(Some(5)));
    assert_ne!(standard_questions(Some(5)), standard_questions(Some(6)));
}

#[test]
fn records_use_a_closed_key_set() {
    for q in standard_questions(None) {
        let record = serde_json::to_value(&q).unwrap();
        let obj = record.as_object().unwrap();

        let prompt_key = if q.prompt.is_matrix() { "matrix" } else { "sequence" };
        let mut expected: HashSet<&str> = RECORD_KEYS.into_iter().collect();
        expected.insert(prompt_key);
        let actual: HashSet<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(actual, expected, "{}", q.id);

        for item in obj["options_shapes"].as_array().unwrap() {
            assert_item_keys(item);
        }
        match &obj[prompt_key] {
            Value::Array(rows) if q.prompt.is_matrix() => {
                for cell in rows.iter().flat_map(|r| r.as_array().unwrap()) {
                    if !cell.is_null() {
                        assert_item_keys(cell);
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(assert_item_keys),
            other => panic!("{}: unexpected prompt {other}", q.id),
        }
    }
}

#[test]
fn record_keys_keep_wire_order() {
    let q = &standard_questions(None)[0];
    let record = serde_json::to_value(q).unwrap();
    let keys: Vec<&str> = record
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let mut expected: Vec<&str> = RECORD_KEYS.to_vec();
    expected.insert(3, "sequence");
    assert_eq!(keys, expected);
}

#[test]
fn every_distractor_differs_from_the_answer() {
    for seed in [None, Some(1), Some(2024)] {
        for q in standard_questions(seed) {
            assert_eq!(q.options.len(), OPTION_COUNT);
            let answer = q.options[q.correct];
            for (i, option) in q.options.iter().enumerate() {
                if i != q.correct {
                    assert!(
                        !option.differing(&answer).is_empty(),
                        "{}: option {i} equals the answer",
                        q.id
                    );
                }
            }
        }
    }
}

#[test]
fn prompts_have_the_expected_shape() {
    for q in standard_questions(None) {
        match &q.prompt {
            Prompt::Sequence(items) => assert!((3..=4).contains(&items.len()), "{}", q.id),
            Prompt::Matrix(grid) => {
                assert_eq!(grid.len(), 3);
                assert!(grid[2][2].is_none());
            }
        }
    }
}

#[test]
fn merge_numbers_after_the_highest_existing_id() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bank.json");
    std::fs::write(
        &path,
        r#"[{"id": "ar-003"}, {"id": "ar-041"}, {"id": "nr-900"}, {"id": "ar-x"}]"#,
    )
    .unwrap();

    let mut manifest = Manifest::standard();
    manifest.batches.truncate(2);
    let first_batch = manifest.batches[0].count;
    let mut options = CorpusOptions::new(&path);
    options.merge = true;

    let outcome = CorpusAssembler::new(manifest.clone(), options)
        .run(&NoopReporter)
        .unwrap();
    assert_eq!(outcome.summary.new_questions, manifest.total());
    assert_eq!(outcome.summary.total, manifest.total() + 4);

    let bank = load_bank(&path).unwrap();
    assert_eq!(bank[4]["id"], "ar-042");
    assert_eq!(
        bank[4 + first_batch]["id"],
        format!("ar-{:03}", 42 + first_batch)
    );
    assert_eq!(bank[2]["id"], "nr-900");
}

#[test]
fn tampered_batch_is_not_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bank.json");
    std::fs::write(&path, "[]\n").unwrap();

    let mut pending = CorpusAssembler::new(Manifest::standard(), CorpusOptions::new(&path))
        .plan(&NoopReporter)
        .unwrap();
    pending.questions[3].id = pending.questions[0].id.clone();
    pending.questions[7].correct = 4;

    let err = pending.commit().unwrap_err();
    let corpus = err.downcast_ref::<CorpusError>().unwrap();
    let invariants: Vec<Invariant> = corpus.issues().iter().map(|i| i.invariant).collect();
    assert!(invariants.contains(&Invariant::DuplicateId));
    assert!(invariants.contains(&Invariant::CorrectIndexRange));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
}
