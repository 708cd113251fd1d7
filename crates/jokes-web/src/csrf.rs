//! Anti-forgery tokens for mutating forms.
//!
//! A token is the SHA-256 of a server secret and the caller's username.
//! Tokens are stateless and stay valid as long as the secret does.

use jokes_core::auth::Identity;
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest, Sha256};

/// Name of the hidden form field carrying the token.
pub const FIELD: &str = "__RequestVerificationToken";

pub struct CsrfKey {
  secret: Vec<u8>,
}

impl CsrfKey {
  pub fn new(secret: impl Into<Vec<u8>>) -> Self { Self { secret: secret.into() } }

  /// A fresh random key; tokens issued under it die with the process.
  pub fn generate() -> Self {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    Self::new(secret.to_vec())
  }

  pub fn token_for(&self, identity: &Identity) -> String {
    let mut hasher = Sha256::new();
    hasher.update(&self.secret);
    hasher.update([0u8]);
    hasher.update(identity.username.as_bytes());
    hex::encode(hasher.finalize())
  }

  /// Compare a presented token against the expected one without
  /// short-circuiting on the first differing byte.
  pub fn verify(&self, identity: &Identity, presented: Option<&str>) -> bool {
    let Some(presented) = presented else { return false };
    let expected = self.token_for(identity);
    expected.len() == presented.len()
      && expected
        .bytes()
        .zip(presented.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
  }
}
