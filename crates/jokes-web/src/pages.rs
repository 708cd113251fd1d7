//! Server-rendered HTML pages.
//!
//! Every page is the shared [`layout`] shell around a page body. All
//! user-supplied text goes through [`escape`] before it lands in markup.

use jokes_core::joke::{Joke, JokeId, JokeInput, ValidationErrors};

use crate::csrf;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem auto;max-width:48rem;padding:0 1rem}\
table{border-collapse:collapse;width:100%}th,td{border-bottom:1px solid #ddd;padding:.5rem;text-align:left}\
label{display:block;margin-top:1rem}input[type=text]{width:100%}.field-error{color:#b00020}\
nav a{margin-right:1rem}";

/// Escape the five characters that are significant in HTML text and
/// attribute values.
pub fn escape(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

/// Wrap `body` in the site shell.
pub fn layout(title: &str, body: &str) -> String {
  let mut html = String::with_capacity(body.len() + 1024);
  html.push_str("<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"/>");
  html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/><title>");
  html.push_str(&escape(title));
  html.push_str(" - Jokes</title><style>");
  html.push_str(STYLE);
  html.push_str("</style></head>\n<body>\n");
  html.push_str(
    r#"<header><nav><a href="/Jokes">Jokes</a><a href="/Jokes/ShowSearchForm">Search</a><a href="/Jokes/Create">Create New</a></nav></header>"#,
  );
  html.push_str("<main>");
  html.push_str(body);
  html.push_str("</main>\n</body>\n</html>");
  html
}

/// A bare message page, used for error responses.
pub fn status(title: &str, message: &str) -> String {
  layout(
    title,
    &format!("<h1>{}</h1><p>{}</p>", escape(title), escape(message)),
  )
}

// ─── Read pages ──────────────────────────────────────────────────────────────

/// The joke table. `phrase` is set when the list is a search result.
pub fn index(jokes: &[Joke], phrase: Option<&str>) -> String {
  let mut body = String::from("<h1>Index</h1>");
  if let Some(phrase) = phrase {
    body.push_str(&format!(
      "<p>Results for &ldquo;{}&rdquo;</p>",
      escape(phrase)
    ));
  }
  body.push_str(r#"<p><a href="/Jokes/Create">Create New</a></p>"#);
  body.push_str("<table><thead><tr><th>Joke Question</th><th>Joke Answer</th><th></th></tr></thead><tbody>");
  for joke in jokes {
    body.push_str(&format!(
      "<tr><td>{q}</td><td>{a}</td><td>\
       <a href=\"/Jokes/Edit/{id}\">Edit</a> | \
       <a href=\"/Jokes/Details/{id}\">Details</a> | \
       <a href=\"/Jokes/Delete/{id}\">Delete</a></td></tr>",
      q = escape(&joke.question),
      a = escape(&joke.answer),
      id = joke.id,
    ));
  }
  body.push_str("</tbody></table>");
  layout("Index", &body)
}

pub fn search_form() -> String {
  layout(
    "Search",
    r#"<h1>Search for a joke</h1>
<form method="post" action="/Jokes/ShowSearchResults">
<label for="SearchPhrase">Search Phrase</label>
<input type="text" id="SearchPhrase" name="SearchPhrase"/>
<p><button type="submit">Search</button></p>
</form>
<p><a href="/Jokes">Back to List</a></p>"#,
  )
}

pub fn details(joke: &Joke) -> String {
  let body = format!(
    "<h1>Details</h1>{fields}\
     <p><a href=\"/Jokes/Edit/{id}\">Edit</a> | <a href=\"/Jokes\">Back to List</a></p>",
    fields = joke_fields(joke),
    id = joke.id,
  );
  layout("Details", &body)
}

// ─── Write pages ─────────────────────────────────────────────────────────────

pub fn create_form(input: &JokeInput, errors: &ValidationErrors, token: &str) -> String {
  let body = format!(
    "<h1>Create</h1>\
     <form method=\"post\" action=\"/Jokes/Create\">{hidden}{inputs}\
     <p><button type=\"submit\">Create</button></p></form>\
     <p><a href=\"/Jokes\">Back to List</a></p>",
    hidden = token_field(token),
    inputs = input_fields(input, errors),
  );
  layout("Create", &body)
}

pub fn edit_form(
  id: JokeId,
  input: &JokeInput,
  errors: &ValidationErrors,
  token: &str,
) -> String {
  let body = format!(
    "<h1>Edit</h1>\
     <form method=\"post\" action=\"/Jokes/Edit/{id}\">{hidden}\
     <input type=\"hidden\" name=\"id\" value=\"{id}\"/>{inputs}\
     <p><button type=\"submit\">Save</button></p></form>\
     <p><a href=\"/Jokes\">Back to List</a></p>",
    hidden = token_field(token),
    inputs = input_fields(input, errors),
  );
  layout("Edit", &body)
}

pub fn delete_confirm(joke: &Joke, token: &str) -> String {
  let body = format!(
    "<h1>Delete</h1><h3>Are you sure you want to delete this?</h3>{fields}\
     <form method=\"post\" action=\"/Jokes/Delete/{id}\">{hidden}\
     <p><button type=\"submit\">Delete</button> | <a href=\"/Jokes\">Back to List</a></p></form>",
    fields = joke_fields(joke),
    id = joke.id,
    hidden = token_field(token),
  );
  layout("Delete", &body)
}

// ─── Fragments ───────────────────────────────────────────────────────────────

fn joke_fields(joke: &Joke) -> String {
  format!(
    "<dl><dt>Joke Question</dt><dd>{}</dd><dt>Joke Answer</dt><dd>{}</dd></dl>",
    escape(&joke.question),
    escape(&joke.answer),
  )
}

fn token_field(token: &str) -> String {
  format!(
    "<input type=\"hidden\" name=\"{}\" value=\"{}\"/>",
    csrf::FIELD,
    escape(token)
  )
}

fn input_fields(input: &JokeInput, errors: &ValidationErrors) -> String {
  let mut out = String::new();
  out.push_str(&text_field("question", "Joke Question", &input.question, errors.question.as_deref()));
  out.push_str(&text_field("answer", "Joke Answer", &input.answer, errors.answer.as_deref()));
  out
}

fn text_field(name: &str, label: &str, value: &str, error: Option<&str>) -> String {
  let error = error
    .map(|m| format!("<span class=\"field-error\">{}</span>", escape(m)))
    .unwrap_or_default();
  format!(
    "<label for=\"{name}\">{label}</label>\
     <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\"/>{error}",
    value = escape(value),
  )
}
