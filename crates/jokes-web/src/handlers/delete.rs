//! `GET|POST /Jokes/Delete/{id}` — requires an authenticated caller.
//!
//! The POST side always lands back on the list, even if the joke had
//! already gone.

use axum::{
  Form,
  extract::{Path, State, rejection::FormRejection},
  response::{Html, Redirect},
};
use jokes_core::{auth::authorize, joke::JokeId, store::JokeStore};

use crate::{
  AppState,
  auth::Caller,
  error::Error,
  handlers::{JokeForm, check_token, parse_id, read_form},
  pages,
};

pub async fn confirm<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(raw_id): Path<String>,
) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  render(&state, &caller, parse_id(&raw_id)).await
}

/// `GET /Jokes/Delete` without an id.
pub async fn missing<S>(State(state): State<AppState<S>>, caller: Caller) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  render(&state, &caller, None).await
}

async fn render<S>(state: &AppState<S>, caller: &Caller, id: Option<JokeId>) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  let identity = authorize(caller.identity())?;
  let joke = state.service.delete_get(Some(identity), id).await?;
  let token = state.csrf.token_for(identity);
  Ok(Html(pages::delete_confirm(&joke, &token)))
}

pub async fn submit<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(raw_id): Path<String>,
  form: Result<Form<JokeForm>, FormRejection>,
) -> Result<Redirect, Error>
where
  S: JokeStore + Clone + 'static,
{
  let identity = authorize(caller.identity())?;
  let form = read_form(form)?;
  check_token(&state, identity, form.token.as_deref())?;

  // A non-numeric id cannot name a stored joke; there is nothing to remove.
  if let Some(id) = parse_id(&raw_id) {
    state.service.delete_post(Some(identity), id).await?;
  }
  Ok(Redirect::to("/Jokes"))
}
