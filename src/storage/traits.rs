//! Storage trait definitions for registered clients and authorizations.
//!
//! Defines async lookup interfaces that can be implemented by in-memory or
//! database-backed providers.

use crate::errors::StorageError;
use crate::oauth::clients::RegisteredClient;
use crate::oauth::types::{AuthorizationRecord, TokenType};
use async_trait::async_trait;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for retrieving registered clients
#[async_trait]
pub trait RegisteredClientStore: Send + Sync {
    /// Retrieve a client by its internal registration id
    async fn find_by_id(&self, id: &str) -> Result<Option<Arc<RegisteredClient>>>;

    /// Retrieve a client by the identifier it presents
    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Arc<RegisteredClient>>>;
}

/// Trait for looking up authorizations recorded by the issuance service
#[async_trait]
pub trait AuthorizationLookup: Send + Sync {
    /// Find the authorization a token was issued under
    async fn find_by_token(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<AuthorizationRecord>>;
}
