//! In-memory storage implementations
//!
//! This module provides in-memory implementations of the storage traits.
//! These implementations are suitable for static configuration and testing.

mod authorizations;
mod clients;

pub use authorizations::MemoryAuthorizationStore;
pub use clients::MemoryRegisteredClientRepository;
