//! Server-rendered web front end for the jokes store.
//!
//! Exposes an axum [`Router`] over any [`JokeStore`]. Reads are public;
//! create, edit and delete need HTTP Basic credentials and a matching
//! anti-forgery token.

pub mod auth;
pub mod csrf;
pub mod error;
pub mod handlers;
pub mod pages;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, response::Redirect, routing::get};
use jokes_core::{service::JokeService, store::JokeStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use csrf::CsrfKey;
use handlers::{create, delete, details, edit, list};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JOKES_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Key for anti-forgery tokens. Generated per process when unset.
  #[serde(default)]
  pub csrf_secret:        Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("jokes.db") }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: JokeStore> {
  pub service: JokeService<S>,
  pub auth:    Arc<AuthConfig>,
  pub csrf:    Arc<CsrfKey>,
}

impl<S: JokeStore> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    let auth = AuthConfig {
      username:      config.auth_username,
      password_hash: config.auth_password_hash,
    };
    let csrf = match &config.csrf_secret {
      Some(secret) => CsrfKey::new(secret.as_bytes()),
      None => CsrfKey::generate(),
    };
    Self {
      service: JokeService::new(store),
      auth:    Arc::new(auth),
      csrf:    Arc::new(csrf),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the jokes site.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: JokeStore + Clone + 'static,
{
  Router::new()
    .route("/", get(|| async { Redirect::to("/Jokes") }))
    .route("/Jokes",                   get(list::index::<S>))
    .route("/Jokes/Index",             get(list::index::<S>))
    .route("/Jokes/ShowSearchForm",    get(list::search_form))
    .route(
      "/Jokes/ShowSearchResults",
      get(list::search_results_query::<S>).post(list::search_results::<S>),
    )
    .route("/Jokes/Details",           get(details::missing::<S>))
    .route("/Jokes/Details/{id}",      get(details::handler::<S>))
    .route("/Jokes/Create",            get(create::form::<S>).post(create::submit::<S>))
    .route("/Jokes/Edit",              get(edit::missing::<S>))
    .route("/Jokes/Edit/{id}",         get(edit::form::<S>).post(edit::submit::<S>))
    .route("/Jokes/Delete",            get(delete::missing::<S>))
    .route("/Jokes/Delete/{id}",       get(delete::confirm::<S>).post(delete::submit::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use jokes_core::{
    auth::Identity,
    joke::{JokeId, JokeInput},
  };
  use jokes_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use tower::ServiceExt as _;

  const FORM: &str = "application/x-www-form-urlencoded";

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState::new(Arc::new(store), ServerConfig {
      host:               "127.0.0.1".to_string(),
      port:               5000,
      store_path:         PathBuf::from(":memory:"),
      auth_username:      "user".to_string(),
      auth_password_hash: hash,
      csrf_secret:        Some("test-secret".to_string()),
    })
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn token(state: &AppState<SqliteStore>) -> String {
    state.csrf.token_for(&Identity::new("user"))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn seed(state: &AppState<SqliteStore>, q: &str, a: &str) -> JokeId {
    state.service.store().create(JokeInput::new(q, a)).await.unwrap().id
  }

  // ── Reads ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_redirects_to_list() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/Jokes");
  }

  #[tokio::test]
  async fn list_is_public() {
    let state = make_state("secret").await;
    seed(&state, "Why did the chicken cross the road?", "To get to the other side.").await;

    for uri in ["/Jokes", "/Jokes/Index"] {
      let resp = oneshot_raw(state.clone(), "GET", uri, vec![], "").await;
      assert_eq!(resp.status(), StatusCode::OK);
      let html = body_text(resp).await;
      assert!(html.contains("Why did the chicken cross the road?"), "{uri}: {html}");
    }
  }

  #[tokio::test]
  async fn read_pages_ignore_credentials() {
    let state = make_state("secret").await;
    let id    = seed(&state, "Q", "A").await;
    let bad   = auth_header("user", "wrong");

    for uri in ["/Jokes".to_string(), format!("/Jokes/Details/{id}"), "/Jokes/ShowSearchForm".to_string()] {
      let resp = oneshot_raw(state.clone(), "GET", &uri, vec![(header::AUTHORIZATION, bad.as_str())], "").await;
      assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
  }

  #[tokio::test]
  async fn search_form_posts_search_phrase() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/Jokes/ShowSearchForm", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("action=\"/Jokes/ShowSearchResults\""));
    assert!(html.contains("name=\"SearchPhrase\""));
  }

  #[tokio::test]
  async fn search_results_filter_by_question() {
    let state = make_state("secret").await;
    seed(&state, "Why did the chicken cross the road?", "To get to the other side.").await;
    seed(&state, "What is grey and has a trunk?", "A mouse going on holiday.").await;

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/Jokes/ShowSearchResults",
      vec![(header::CONTENT_TYPE, FORM)],
      "SearchPhrase=chicken",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("chicken cross"));
    assert!(!html.contains("trunk"));

    let resp = oneshot_raw(
      state,
      "GET",
      "/Jokes/ShowSearchResults?SearchPhrase=elephant",
      vec![],
      "",
    ).await;
    let html = body_text(resp).await;
    assert!(!html.contains("chicken cross"));
    assert!(!html.contains("trunk"));
  }

  #[tokio::test]
  async fn search_without_phrase_lists_everything() {
    let state = make_state("secret").await;
    seed(&state, "Q one", "A1").await;
    seed(&state, "Q two", "A2").await;

    let resp = oneshot_raw(
      state,
      "POST",
      "/Jokes/ShowSearchResults",
      vec![(header::CONTENT_TYPE, FORM)],
      "",
    ).await;
    let html = body_text(resp).await;
    assert!(html.contains("Q one") && html.contains("Q two"));
  }

  #[tokio::test]
  async fn details_found_and_missing() {
    let state = make_state("secret").await;
    let id    = seed(&state, "Knock knock", "Who's there?").await;

    let resp = oneshot_raw(state.clone(), "GET", &format!("/Jokes/Details/{id}"), vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Who&#39;s there?"));

    for uri in ["/Jokes/Details/999", "/Jokes/Details", "/Jokes/Details/abc"] {
      let resp = oneshot_raw(state.clone(), "GET", uri, vec![], "").await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
  }

  // ── Auth ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn gated_pages_require_credentials() {
    let state = make_state("secret").await;
    let id    = seed(&state, "Q", "A").await;

    for uri in [
      "/Jokes/Create".to_string(),
      format!("/Jokes/Edit/{id}"),
      format!("/Jokes/Delete/{id}"),
    ] {
      let resp = oneshot_raw(state.clone(), "GET", &uri, vec![], "").await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
      assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
    }
  }

  #[tokio::test]
  async fn anonymous_posts_do_not_touch_the_store() {
    let state = make_state("secret").await;
    let id    = seed(&state, "Q", "A").await;
    let bad   = auth_header("user", "wrong");

    let cases = [
      ("/Jokes/Create".to_string(), "question=New&answer=Joke".to_string()),
      (format!("/Jokes/Edit/{id}"), format!("id={id}&question=Changed&answer=Changed")),
      (format!("/Jokes/Delete/{id}"), String::new()),
    ];
    for (uri, body) in cases {
      let resp = oneshot_raw(
        state.clone(),
        "POST",
        &uri,
        vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, bad.as_str())],
        &body,
      ).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let all = state.service.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].question, "Q");
  }

  #[tokio::test]
  async fn post_without_token_is_rejected() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/Jokes/Create",
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      "question=New&answer=Joke",
    ).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/Jokes/Create",
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      "question=New&answer=Joke&__RequestVerificationToken=forged",
    ).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(state.service.list().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn anonymous_post_without_form_body_is_challenged() {
    let state = make_state("secret").await;
    let id    = seed(&state, "Q", "A").await;

    for uri in [
      "/Jokes/Create".to_string(),
      format!("/Jokes/Edit/{id}"),
      format!("/Jokes/Delete/{id}"),
    ] {
      let resp = oneshot_raw(state.clone(), "POST", &uri, vec![], "").await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
      assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE), "{uri}");
    }
    assert_eq!(state.service.list().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn signed_in_post_without_form_body_is_rejected() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let id    = seed(&state, "Q", "A").await;

    for uri in [
      "/Jokes/Create".to_string(),
      format!("/Jokes/Edit/{id}"),
      format!("/Jokes/Delete/{id}"),
    ] {
      let resp = oneshot_raw(
        state.clone(),
        "POST",
        &uri,
        vec![(header::AUTHORIZATION, auth.as_str())],
        "",
      ).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
    assert_eq!(state.service.list().await.unwrap().len(), 1);
  }

  // ── Create ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_form_embeds_token() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let tok   = token(&state);

    let resp = oneshot_raw(
      state,
      "GET",
      "/Jokes/Create",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(&tok));
  }

  #[tokio::test]
  async fn create_then_list() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let body  = format!(
      "question=Why+did+the+chicken+cross+the+road%3F&answer=To+get+to+the+other+side.&__RequestVerificationToken={}",
      token(&state)
    );

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/Jokes/Create",
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      &body,
    ).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/Jokes");

    let all = state.service.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].question, "Why did the chicken cross the road?");
    assert_eq!(all[0].answer, "To get to the other side.");
  }

  #[tokio::test]
  async fn create_accepts_original_field_names() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let body  = format!(
      "JokeQuestion=Q&JokeAnswer=A&__RequestVerificationToken={}",
      token(&state)
    );

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/Jokes/Create",
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      &body,
    ).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.service.list().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn invalid_create_redisplays_form() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let body  = format!(
      "question=&answer=Lonely+punchline&__RequestVerificationToken={}",
      token(&state)
    );

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/Jokes/Create",
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      &body,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("The JokeQuestion field is required."));
    assert!(html.contains("value=\"Lonely punchline\""));
    assert!(state.service.list().await.unwrap().is_empty());
  }

  // ── Edit ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn edit_round_trip() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let id    = seed(&state, "Q1", "A1").await;

    let resp = oneshot_raw(
      state.clone(),
      "GET",
      &format!("/Jokes/Edit/{id}"),
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("value=\"Q1\""));

    let body = format!("id={id}&question=Q2&answer=A2&__RequestVerificationToken={}", token(&state));
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      &format!("/Jokes/Edit/{id}"),
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      &body,
    ).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let joke = state.service.details(Some(id)).await.unwrap();
    assert_eq!((joke.id, joke.question.as_str(), joke.answer.as_str()), (id, "Q2", "A2"));
  }

  #[tokio::test]
  async fn edit_with_mismatched_body_id_is_404() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let id    = seed(&state, "Q1", "A1").await;

    let body = format!(
      "id={}&question=Q2&answer=A2&__RequestVerificationToken={}",
      id.0 + 1,
      token(&state)
    );
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      &format!("/Jokes/Edit/{id}"),
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      &body,
    ).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.service.details(Some(id)).await.unwrap().question, "Q1");
  }

  #[tokio::test]
  async fn invalid_edit_redisplays_submitted_values() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let id    = seed(&state, "Q1", "A1").await;

    let body = format!("id={id}&question=Q2&answer=&__RequestVerificationToken={}", token(&state));
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      &format!("/Jokes/Edit/{id}"),
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      &body,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("The JokeAnswer field is required."));
    assert!(html.contains("value=\"Q2\""));
    assert!(html.contains(&format!("action=\"/Jokes/Edit/{id}\"")));

    let joke = state.service.details(Some(id)).await.unwrap();
    assert_eq!((joke.question.as_str(), joke.answer.as_str()), ("Q1", "A1"));
  }

  #[tokio::test]
  async fn edit_of_vanished_joke_is_404() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let id    = seed(&state, "Q1", "A1").await;
    state.service.store().delete(id).await.unwrap();

    let body = format!("id={id}&question=Q2&answer=A2&__RequestVerificationToken={}", token(&state));
    let resp = oneshot_raw(
      state,
      "POST",
      &format!("/Jokes/Edit/{id}"),
      vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
      &body,
    ).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn edit_get_missing_is_404_after_auth() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");

    for uri in ["/Jokes/Edit/12", "/Jokes/Edit", "/Jokes/Delete/12", "/Jokes/Delete"] {
      let resp = oneshot_raw(
        state.clone(),
        "GET",
        uri,
        vec![(header::AUTHORIZATION, auth.as_str())],
        "",
      ).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
  }

  // ── Delete ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_confirm_then_delete_twice() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let id    = seed(&state, "Doomed", "Joke").await;

    let resp = oneshot_raw(
      state.clone(),
      "GET",
      &format!("/Jokes/Delete/{id}"),
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Are you sure you want to delete this?"));

    let body = format!("__RequestVerificationToken={}", token(&state));
    for _ in 0..2 {
      let resp = oneshot_raw(
        state.clone(),
        "POST",
        &format!("/Jokes/Delete/{id}"),
        vec![(header::CONTENT_TYPE, FORM), (header::AUTHORIZATION, auth.as_str())],
        &body,
      ).await;
      assert_eq!(resp.status(), StatusCode::SEE_OTHER);
      assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/Jokes");
    }

    let resp = oneshot_raw(state, "GET", &format!("/Jokes/Details/{id}"), vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
