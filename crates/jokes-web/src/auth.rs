//! HTTP Basic-auth extractor and standalone verifier.
//!
//! Reads are open to everyone, so the extractor never rejects: it yields
//! `Caller(None)` and the service decides whether an identity is required.

use std::convert::Infallible;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use jokes_core::{auth::Identity, store::JokeStore};

use crate::{AppState, error::Error};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// The identity behind a request, if it carried valid credentials.
///
/// Verifying costs an argon2 hash, so only the create, edit and delete
/// handlers extract this. Read pages never look at `Authorization`.
pub struct Caller(pub Option<Identity>);

impl Caller {
  pub fn identity(&self) -> Option<&Identity> { self.0.as_ref() }
}

/// Verify credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Identity, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(Identity::new(username))
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: JokeStore + Clone + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let has_header = parts.headers.contains_key(axum::http::header::AUTHORIZATION);
    match verify_auth(&parts.headers, &state.auth) {
      Ok(identity) => Ok(Caller(Some(identity))),
      Err(_) => {
        if has_header {
          tracing::debug!(path = %parts.uri.path(), "rejected credentials");
        }
        Ok(Caller(None))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, header};

  fn config(password: &str) -> AuthConfig {
    use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AuthConfig { username: "user".to_string(), password_hash: hash }
  }

  fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[test]
  fn correct_credentials() {
    let cfg = config("secret");
    let identity = verify_auth(&headers_with(&basic("user", "secret")), &cfg).unwrap();
    assert_eq!(identity.username, "user");
  }

  #[test]
  fn wrong_password() {
    let cfg = config("secret");
    let result = verify_auth(&headers_with(&basic("user", "wrong")), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn wrong_username() {
    let cfg = config("secret");
    let result = verify_auth(&headers_with(&basic("mallory", "secret")), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn missing_header() {
    let cfg = config("secret");
    assert!(matches!(verify_auth(&HeaderMap::new(), &cfg), Err(Error::Unauthorized)));
  }

  #[test]
  fn invalid_base64() {
    let cfg = config("secret");
    let result = verify_auth(&headers_with("Basic !!!not-base64!!!"), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn bearer_scheme_is_not_accepted() {
    let cfg = config("secret");
    let result = verify_auth(&headers_with("Bearer abc"), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }
}
