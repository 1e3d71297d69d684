//! OAuth 2.0 client authentication library crate.
//!
//! Verifies registered clients at the token endpoint, by shared secret or by
//! PKCE proof, before an authorization code or client credentials grant is
//! honored.

pub mod config;
pub mod errors;
pub mod oauth;
pub mod storage;
