//! Error types for `jokes-core`.

use thiserror::Error;

use crate::joke::JokeId;

#[derive(Debug, Error)]
pub enum Error {
  /// The id was missing or no record carries it.
  #[error("joke not found")]
  NotFound,

  #[error("authentication required")]
  Unauthorized,

  /// An update touched no rows although the record still exists.
  #[error("concurrency conflict while updating joke {0}")]
  ConcurrencyConflict(JokeId),

  #[error("storage unavailable: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
