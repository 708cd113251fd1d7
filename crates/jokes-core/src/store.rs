//! The `JokeStore` trait and its operation outcomes.
//!
//! The trait is implemented by storage backends (e.g. `jokes-store-sqlite`).
//! The service layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::joke::{Joke, JokeId, JokeInput};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`JokeStore::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
  Updated,
  /// No row carried the id; nothing was written.
  NotFound,
}

/// Result of [`JokeStore::delete`]. Both variants count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Deleted,
  /// The id was already gone; nothing was removed.
  Absent,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the persisted set of jokes.
///
/// Business conditions (missing rows) are expressed as return values; the
/// associated error type is reserved for the backend being unreachable.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait JokeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All jokes in store-natural order.
  fn list(&self) -> impl Future<Output = Result<Vec<Joke>, Self::Error>> + Send + '_;

  /// Point lookup. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: JokeId,
  ) -> impl Future<Output = Result<Option<Joke>, Self::Error>> + Send + '_;

  /// Every joke whose question contains `needle` (case-sensitive). The empty
  /// string matches every joke.
  fn search<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<Joke>, Self::Error>> + Send + 'a;

  /// Persist a new joke and return it with its freshly assigned id.
  fn create(
    &self,
    input: JokeInput,
  ) -> impl Future<Output = Result<Joke, Self::Error>> + Send + '_;

  /// Overwrite the question and answer of an existing joke.
  fn update(
    &self,
    id: JokeId,
    input: JokeInput,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Remove a joke. Removing an absent id is not an error.
  fn delete(
    &self,
    id: JokeId,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + '_;

  /// Whether a joke with `id` is present.
  fn exists(&self, id: JokeId) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
