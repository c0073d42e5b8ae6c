//! Authentication support for the API clients.
//!
//! This module provides:
//! - `Credential` / `CredentialCache`: bearer tokens with an expiry margin,
//!   held in memory by the client that fetched them
//! - `CredentialStore`: optional OS-level secret storage via keyring
//!
//! Tokens are never written to disk; each process fetches its own.

pub mod credentials;
pub mod token;

pub use credentials::CredentialStore;
pub use token::{Credential, CredentialCache, TOKEN_EXPIRY_MARGIN_SECS};
