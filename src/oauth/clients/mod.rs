//! Registered OAuth client definitions.
//!
//! Clients are provisioned from configuration at startup and served by the
//! read-only repositories in [`crate::storage`].

pub mod registered_client;

pub use registered_client::{RegisteredClient, generate_registration_id};
