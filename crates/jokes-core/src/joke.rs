//! The joke record and the form input used to create or edit one.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

// ─── JokeId ──────────────────────────────────────────────────────────────────

/// Integer primary key assigned by the store on creation. Never changes once
/// assigned.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JokeId(pub i64);

impl fmt::Display for JokeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl FromStr for JokeId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { s.trim().parse().map(Self) }
}

impl From<i64> for JokeId {
  fn from(id: i64) -> Self { Self(id) }
}

// ─── Joke ────────────────────────────────────────────────────────────────────

/// A stored question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
  pub id:       JokeId,
  pub question: String,
  pub answer:   String,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// The fields a caller submits when creating or editing a joke.
///
/// Values are kept exactly as submitted so they can be shown back to the
/// caller when validation fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokeInput {
  pub question: String,
  pub answer:   String,
}

impl JokeInput {
  pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self { question: question.into(), answer: answer.into() }
  }

  /// Check that both fields carry text.
  ///
  /// Whitespace-only values count as missing. Valid values are not trimmed.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if self.question.trim().is_empty() {
      errors.question = Some(required("JokeQuestion"));
    }
    if self.answer.trim().is_empty() {
      errors.answer = Some(required("JokeAnswer"));
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
  }
}

impl From<Joke> for JokeInput {
  fn from(joke: Joke) -> Self {
    Self { question: joke.question, answer: joke.answer }
  }
}

fn required(field: &str) -> String { format!("The {field} field is required.") }

/// Per-field validation messages for a rejected [`JokeInput`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
  pub question: Option<String>,
  pub answer:   Option<String>,
}

impl ValidationErrors {
  pub fn is_empty(&self) -> bool { self.question.is_none() && self.answer.is_none() }
}
