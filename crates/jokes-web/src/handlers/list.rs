//! List and search handlers. None of these require authentication.

use axum::{
  Form,
  extract::{Query, State},
  response::Html,
};
use jokes_core::store::JokeStore;
use serde::Deserialize;

use crate::{AppState, error::Error, pages};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  #[serde(default, rename = "SearchPhrase")]
  pub search_phrase: Option<String>,
}

/// `GET /Jokes`, `GET /Jokes/Index`
pub async fn index<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  let jokes = state.service.list().await?;
  Ok(Html(pages::index(&jokes, None)))
}

/// `GET /Jokes/ShowSearchForm`
pub async fn search_form() -> Html<String> { Html(pages::search_form()) }

/// `POST /Jokes/ShowSearchResults` with a `SearchPhrase` form field.
pub async fn search_results<S>(
  State(state): State<AppState<S>>,
  Form(params): Form<SearchParams>,
) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  render_results(&state, params).await
}

/// `GET /Jokes/ShowSearchResults?SearchPhrase=...`
pub async fn search_results_query<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  render_results(&state, params).await
}

async fn render_results<S>(state: &AppState<S>, params: SearchParams) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  let phrase = params.search_phrase.as_deref();
  let jokes = state.service.search(phrase).await?;
  Ok(Html(pages::index(&jokes, phrase.filter(|p| !p.is_empty()))))
}
