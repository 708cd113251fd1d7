//! `GET /Jokes/Details/{id}` — open to everyone.

use axum::{
  extract::{Path, State},
  response::Html,
};
use jokes_core::{joke::JokeId, store::JokeStore};

use crate::{AppState, error::Error, handlers::parse_id, pages};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  render(&state, parse_id(&raw_id)).await
}

/// `GET /Jokes/Details` without an id.
pub async fn missing<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  render(&state, None).await
}

async fn render<S>(state: &AppState<S>, id: Option<JokeId>) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  let joke = state.service.details(id).await?;
  Ok(Html(pages::details(&joke)))
}
