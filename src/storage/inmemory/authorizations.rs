//! In-memory authorization lookup
//!
//! Stands in for the issuance service's authorization store in tests and the CLI.

use crate::errors::StorageError;
use crate::oauth::types::{AuthorizationRecord, TokenType};
use crate::storage::traits::*;
use async_trait::async_trait;
use std::collections::HashMap;

/// Authorizations indexed by their authorization code
#[derive(Default)]
pub struct MemoryAuthorizationStore {
    by_code: tokio::sync::RwLock<HashMap<String, AuthorizationRecord>>,
}

impl MemoryAuthorizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an authorization under its authorization code
    pub async fn store_authorization(&self, record: AuthorizationRecord) -> Result<()> {
        if record.authorization_code.is_empty() {
            return Err(StorageError::InvalidArgument(
                "authorization_code cannot be empty".to_string(),
            ));
        }
        let mut by_code = self.by_code.write().await;
        by_code.insert(record.authorization_code.clone(), record);
        Ok(())
    }
}

#[async_trait]
impl AuthorizationLookup for MemoryAuthorizationStore {
    async fn find_by_token(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<AuthorizationRecord>> {
        if token.is_empty() {
            return Err(StorageError::InvalidArgument("token cannot be empty".to_string()));
        }
        // Only authorization codes are indexed here
        if token_type != TokenType::AuthorizationCode {
            return Ok(None);
        }
        let by_code = self.by_code.read().await;
        Ok(by_code.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::types::StoredAuthorizationRequest;

    fn record(code: &str) -> AuthorizationRecord {
        AuthorizationRecord {
            id: format!("authorization-{}", code),
            registered_client_id: "registration-1".to_string(),
            principal_name: "user1".to_string(),
            authorization_code: code.to_string(),
            authorization_request: StoredAuthorizationRequest {
                client_id: "client-1".to_string(),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_find_by_authorization_code() {
        let store = MemoryAuthorizationStore::new();
        store.store_authorization(record("code-1")).await.unwrap();

        let found = store
            .find_by_token("code-1", TokenType::AuthorizationCode)
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some("authorization-code-1".to_string()));

        assert!(store
            .find_by_token("code-2", TokenType::AuthorizationCode)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_other_token_types_not_matched() {
        let store = MemoryAuthorizationStore::new();
        store.store_authorization(record("code-1")).await.unwrap();

        assert!(store
            .find_by_token("code-1", TokenType::AccessToken)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_code_rejected() {
        let store = MemoryAuthorizationStore::new();
        assert!(matches!(
            store.store_authorization(record("")).await,
            Err(StorageError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.find_by_token("", TokenType::AuthorizationCode).await,
            Err(StorageError::InvalidArgument(_))
        ));
    }
}
