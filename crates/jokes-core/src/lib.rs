//! Core types and trait definitions for the jokes application.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The SQLite backend and the web front end both depend on it.

pub mod auth;
pub mod error;
pub mod joke;
pub mod service;
pub mod store;

pub use error::{Error, Result};
