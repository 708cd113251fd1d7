//! [`JokeService`] — request-level orchestration over a [`JokeStore`].
//!
//! Every operation is stateless given the store. Gated operations take the
//! caller explicitly and run in the order authorize → validate → store.

use std::sync::Arc;

use crate::{
  Error, Result,
  auth::{Identity, authorize},
  joke::{Joke, JokeId, JokeInput, ValidationErrors},
  store::{DeleteOutcome, JokeStore, UpdateOutcome},
};

/// Outcome of a create or edit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
  /// The joke was written; the caller should be sent back to the list.
  Saved(Joke),
  /// Nothing was written; the input goes back to the caller for correction.
  Invalid {
    input:  JokeInput,
    errors: ValidationErrors,
  },
}

pub struct JokeService<S> {
  store: Arc<S>,
}

impl<S> Clone for JokeService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: JokeStore> JokeService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn list(&self) -> Result<Vec<Joke>> {
    self.store.list().await.map_err(storage_failure)
  }

  /// Jokes whose question contains `phrase`. An absent phrase matches all.
  pub async fn search(&self, phrase: Option<&str>) -> Result<Vec<Joke>> {
    self
      .store
      .search(phrase.unwrap_or_default())
      .await
      .map_err(storage_failure)
  }

  pub async fn details(&self, id: Option<JokeId>) -> Result<Joke> {
    self.find(id).await
  }

  // ── Create ────────────────────────────────────────────────────────────────

  pub async fn create(&self, caller: Option<&Identity>, input: JokeInput) -> Result<Submission> {
    let caller = authorize(caller)?;

    if let Err(errors) = input.validate() {
      return Ok(Submission::Invalid { input, errors });
    }

    let joke = self.store.create(input).await.map_err(storage_failure)?;
    tracing::info!(id = %joke.id, user = %caller.username, "joke created");
    Ok(Submission::Saved(joke))
  }

  // ── Edit ──────────────────────────────────────────────────────────────────

  pub async fn edit_get(&self, caller: Option<&Identity>, id: Option<JokeId>) -> Result<Joke> {
    authorize(caller)?;
    self.find(id).await
  }

  /// Apply an edit. `id` comes from the request path, `submitted_id` from
  /// the form body; they must agree.
  pub async fn edit_post(
    &self,
    caller: Option<&Identity>,
    id: JokeId,
    submitted_id: Option<JokeId>,
    input: JokeInput,
  ) -> Result<Submission> {
    let caller = authorize(caller)?;

    if submitted_id != Some(id) {
      return Err(Error::NotFound);
    }

    if let Err(errors) = input.validate() {
      return Ok(Submission::Invalid { input, errors });
    }

    let saved = Joke { id, question: input.question.clone(), answer: input.answer.clone() };

    match self.store.update(id, input).await.map_err(storage_failure)? {
      UpdateOutcome::Updated => {
        tracing::info!(%id, user = %caller.username, "joke updated");
        Ok(Submission::Saved(saved))
      }
      // Zero rows touched: either the joke vanished or the write lost a race.
      UpdateOutcome::NotFound => {
        if self.store.exists(id).await.map_err(storage_failure)? {
          tracing::warn!(%id, "update conflicted with a record that still exists");
          Err(Error::ConcurrencyConflict(id))
        } else {
          Err(Error::NotFound)
        }
      }
    }
  }

  // ── Delete ────────────────────────────────────────────────────────────────

  pub async fn delete_get(&self, caller: Option<&Identity>, id: Option<JokeId>) -> Result<Joke> {
    authorize(caller)?;
    self.find(id).await
  }

  /// Remove a joke. Succeeds whether or not the joke was still present.
  pub async fn delete_post(&self, caller: Option<&Identity>, id: JokeId) -> Result<()> {
    let caller = authorize(caller)?;

    match self.store.delete(id).await.map_err(storage_failure)? {
      DeleteOutcome::Deleted => {
        tracing::info!(%id, user = %caller.username, "joke deleted");
      }
      DeleteOutcome::Absent => {
        tracing::debug!(%id, "delete of absent joke ignored");
      }
    }
    Ok(())
  }

  async fn find(&self, id: Option<JokeId>) -> Result<Joke> {
    let id = id.ok_or(Error::NotFound)?;
    self
      .store
      .find_by_id(id)
      .await
      .map_err(storage_failure)?
      .ok_or(Error::NotFound)
  }
}

fn storage_failure<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tracing::error!(error = %e, "joke store failure");
  Error::storage(e)
}
