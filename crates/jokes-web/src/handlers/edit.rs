//! `GET|POST /Jokes/Edit/{id}` — requires an authenticated caller.

use axum::{
  Form,
  extract::{Path, State, rejection::FormRejection},
  response::{Html, IntoResponse, Redirect, Response},
};
use jokes_core::{
  auth::authorize,
  joke::{JokeId, JokeInput, ValidationErrors},
  service::Submission,
  store::JokeStore,
};

use crate::{
  AppState,
  auth::Caller,
  error::Error,
  handlers::{JokeForm, check_token, parse_id, read_form},
  pages,
};

pub async fn form<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(raw_id): Path<String>,
) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  render(&state, &caller, parse_id(&raw_id)).await
}

/// `GET /Jokes/Edit` without an id.
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
  let joke = state.service.edit_get(Some(identity), id).await?;
  let token = state.csrf.token_for(identity);
  Ok(Html(pages::edit_form(
    joke.id,
    &JokeInput::from(joke),
    &ValidationErrors::default(),
    &token,
  )))
}

pub async fn submit<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(raw_id): Path<String>,
  form: Result<Form<JokeForm>, FormRejection>,
) -> Result<Response, Error>
where
  S: JokeStore + Clone + 'static,
{
  let identity = authorize(caller.identity())?;
  let form = read_form(form)?;
  check_token(&state, identity, form.token.as_deref())?;

  let id = parse_id(&raw_id).ok_or(Error::NotFound)?;
  let submitted = state
    .service
    .edit_post(Some(identity), id, form.submitted_id(), form.input())
    .await?;

  match submitted {
    Submission::Saved(_) => Ok(Redirect::to("/Jokes").into_response()),
    Submission::Invalid { input, errors } => {
      let token = state.csrf.token_for(identity);
      Ok(Html(pages::edit_form(id, &input, &errors, &token)).into_response())
    }
  }
}
