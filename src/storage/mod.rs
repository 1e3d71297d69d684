//! Trait-based storage abstractions for registered clients and authorizations.

pub mod inmemory;
pub mod traits;

// Re-export commonly used types and traits
pub use inmemory::{MemoryAuthorizationStore, MemoryRegisteredClientRepository};
pub use traits::*;
