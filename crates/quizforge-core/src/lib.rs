//! quizforge-core — Deterministic abstract-reasoning question generation.
//!
//! A seeded PRNG drives a set of pattern families, each producing one
//! bilingual multiple-choice question: a visual prompt, four options, and
//! the explanations for every wrong option. The corpus assembler runs a
//! manifest of batches, assigns ids, validates the batch fail-closed, and
//! writes the bank. Repair, scoring, and weakness analysis work on banks
//! and study logs after the fact.

pub mod config;
pub mod corpus;
pub mod distractor;
pub mod domain;
pub mod error;
pub mod item;
pub mod manifest;
pub mod model;
pub mod options;
pub mod patterns;
pub mod record;
pub mod repair;
pub mod rng;
pub mod scoring;
pub mod validation;
pub mod weakness;
