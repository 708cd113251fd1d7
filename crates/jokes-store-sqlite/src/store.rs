//! [`SqliteStore`] — the SQLite implementation of [`JokeStore`].

use std::path::Path;

use jokes_core::{
  joke::{Joke, JokeId, JokeInput},
  store::{DeleteOutcome, JokeStore, UpdateOutcome},
};
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

const SELECT_JOKE: &str = "SELECT id, JokeQuestion, JokeAnswer FROM Joke";

fn read_joke(row: &rusqlite::Row<'_>) -> rusqlite::Result<Joke> {
  Ok(Joke {
    id:       JokeId(row.get(0)?),
    question: row.get(1)?,
    answer:   row.get(2)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A joke store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// runs on the connection's own thread, so writes are serialized.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── JokeStore impl ──────────────────────────────────────────────────────────

impl JokeStore for SqliteStore {
  type Error = Error;

  async fn list(&self) -> Result<Vec<Joke>> {
    let jokes = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{SELECT_JOKE} ORDER BY id"))?;
        let rows = stmt
          .query_map([], read_joke)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(jokes)
  }

  async fn find_by_id(&self, id: JokeId) -> Result<Option<Joke>> {
    let joke = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SELECT_JOKE} WHERE id = ?1"),
              rusqlite::params![id.0],
              read_joke,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(joke)
  }

  async fn search(&self, needle: &str) -> Result<Vec<Joke>> {
    // `instr` is case-sensitive, unlike LIKE, and matches everything for "".
    let needle = needle.to_owned();

    let jokes = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("{SELECT_JOKE} WHERE instr(JokeQuestion, ?1) > 0 ORDER BY id"))?;
        let rows = stmt
          .query_map(rusqlite::params![needle], read_joke)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(jokes)
  }

  async fn create(&self, input: JokeInput) -> Result<Joke> {
    let JokeInput { question, answer } = input;

    let joke = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO Joke (JokeQuestion, JokeAnswer) VALUES (?1, ?2)",
          rusqlite::params![question, answer],
        )?;
        Ok(Joke { id: JokeId(conn.last_insert_rowid()), question, answer })
      })
      .await?;
    Ok(joke)
  }

  async fn update(&self, id: JokeId, input: JokeInput) -> Result<UpdateOutcome> {
    let JokeInput { question, answer } = input;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE Joke SET JokeQuestion = ?2, JokeAnswer = ?3 WHERE id = ?1",
          rusqlite::params![id.0, question, answer],
        )?)
      })
      .await?;

    Ok(if changed == 0 { UpdateOutcome::NotFound } else { UpdateOutcome::Updated })
  }

  async fn delete(&self, id: JokeId) -> Result<DeleteOutcome> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM Joke WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;

    Ok(if removed == 0 { DeleteOutcome::Absent } else { DeleteOutcome::Deleted })
  }

  async fn exists(&self, id: JokeId) -> Result<bool> {
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM Joke WHERE id = ?1",
              rusqlite::params![id.0],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(found)
  }
}
