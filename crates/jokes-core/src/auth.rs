//! The authenticated caller, as handed over by the identity layer.
//!
//! Credential checks live in the web crate; this crate only sees the result.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A caller whose credentials have already been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub username: String,
}

impl Identity {
  pub fn new(username: impl Into<String>) -> Self {
    Self { username: username.into() }
  }
}

/// Gate for write operations: an absent identity is rejected.
pub fn authorize(caller: Option<&Identity>) -> Result<&Identity> {
  caller.ok_or(Error::Unauthorized)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn anonymous_caller_is_rejected() {
    assert!(matches!(authorize(None), Err(Error::Unauthorized)));
  }

  #[test]
  fn known_caller_passes_through() {
    let alice = Identity::new("alice");
    assert_eq!(authorize(Some(&alice)).unwrap().username, "alice");
  }
}
