//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::pages;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found")]
  NotFound,
  #[error("missing or invalid anti-forgery token")]
  Forgery,
  #[error("internal error: {0}")]
  Internal(#[source] jokes_core::Error),
}

impl From<jokes_core::Error> for Error {
  fn from(e: jokes_core::Error) -> Self {
    match e {
      jokes_core::Error::NotFound => Error::NotFound,
      jokes_core::Error::Unauthorized => Error::Unauthorized,
      other => Error::Internal(other),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Html(pages::status("Unauthorized", "You must sign in to do that.")),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"jokes\""),
        );
        res
      }
      Error::NotFound => (
        StatusCode::NOT_FOUND,
        Html(pages::status("Not Found", "No such joke.")),
      )
        .into_response(),
      Error::Forgery => (
        StatusCode::BAD_REQUEST,
        Html(pages::status("Bad Request", "The form has expired. Reload and try again.")),
      )
        .into_response(),
      Error::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Html(pages::status("Error", "An error occurred while processing your request.")),
        )
          .into_response()
      }
    }
  }
}
