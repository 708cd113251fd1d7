pub mod create;
pub mod delete;
pub mod details;
pub mod edit;
pub mod list;

use axum::{Form, extract::rejection::FormRejection};
use jokes_core::{
  auth::Identity,
  joke::{JokeId, JokeInput},
  store::JokeStore,
};
use serde::Deserialize;

use crate::{AppState, csrf, error::Error};

/// Fields posted by the create, edit and delete forms.
#[derive(Debug, Default, Deserialize)]
pub struct JokeForm {
  #[serde(default)]
  pub id:       Option<String>,
  #[serde(default, alias = "JokeQuestion")]
  pub question: String,
  #[serde(default, alias = "JokeAnswer")]
  pub answer:   String,
  #[serde(default, rename = "__RequestVerificationToken")]
  pub token:    Option<String>,
}

impl JokeForm {
  pub fn input(&self) -> JokeInput { JokeInput::new(&self.question, &self.answer) }

  pub fn submitted_id(&self) -> Option<JokeId> { self.id.as_deref().and_then(parse_id) }
}

/// Path ids that are not integers are treated as missing.
pub(crate) fn parse_id(raw: &str) -> Option<JokeId> { raw.parse().ok() }

/// Unwrap a form body extracted after the caller was authorized. A body
/// that is missing or unreadable is answered like a bad token.
pub(crate) fn read_form(form: Result<Form<JokeForm>, FormRejection>) -> Result<JokeForm, Error> {
  match form {
    Ok(Form(form)) => Ok(form),
    Err(rejection) => {
      tracing::warn!(%rejection, "unreadable form body");
      Err(Error::Forgery)
    }
  }
}

/// Reject a mutating POST whose anti-forgery token does not belong to `identity`.
pub(crate) fn check_token<S>(
  state: &AppState<S>,
  identity: &Identity,
  presented: Option<&str>,
) -> Result<(), Error>
where
  S: JokeStore + Clone + 'static,
{
  if state.csrf.verify(identity, presented) {
    Ok(())
  } else {
    tracing::warn!(user = %identity.username, field = csrf::FIELD, "anti-forgery check failed");
    Err(Error::Forgery)
  }
}
