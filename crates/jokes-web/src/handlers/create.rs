//! `GET|POST /Jokes/Create` — requires an authenticated caller.

use axum::{
  Form,
  extract::{State, rejection::FormRejection},
  response::{Html, IntoResponse, Redirect, Response},
};
use jokes_core::{
  auth::authorize,
  joke::{JokeInput, ValidationErrors},
  service::Submission,
  store::JokeStore,
};

use crate::{
  AppState,
  auth::Caller,
  error::Error,
  handlers::{JokeForm, check_token, read_form},
  pages,
};

pub async fn form<S>(State(state): State<AppState<S>>, caller: Caller) -> Result<Html<String>, Error>
where
  S: JokeStore + Clone + 'static,
{
  let identity = authorize(caller.identity())?;
  let token = state.csrf.token_for(identity);
  Ok(Html(pages::create_form(&JokeInput::default(), &ValidationErrors::default(), &token)))
}

pub async fn submit<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  form: Result<Form<JokeForm>, FormRejection>,
) -> Result<Response, Error>
where
  S: JokeStore + Clone + 'static,
{
  let identity = authorize(caller.identity())?;
  let form = read_form(form)?;
  check_token(&state, identity, form.token.as_deref())?;

  match state.service.create(Some(identity), form.input()).await? {
    Submission::Saved(_) => Ok(Redirect::to("/Jokes").into_response()),
    Submission::Invalid { input, errors } => {
      let token = state.csrf.token_for(identity);
      Ok(Html(pages::create_form(&input, &errors, &token)).into_response())
    }
  }
}
