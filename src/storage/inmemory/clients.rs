//! In-memory registered client repository
//!
//! Both indices are built in a single pass at construction and never change
//! afterwards, so lookups need no locking.

use crate::errors::StorageError;
use crate::oauth::clients::RegisteredClient;
use crate::storage::traits::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only repository over a fixed set of registered clients
#[derive(Clone)]
pub struct MemoryRegisteredClientRepository {
    by_id: HashMap<String, Arc<RegisteredClient>>,
    by_client_id: HashMap<String, Arc<RegisteredClient>>,
    registration_order: Vec<Arc<RegisteredClient>>,
}

impl MemoryRegisteredClientRepository {
    /// Build the repository from clients in registration order.
    ///
    /// Fails with `InvalidArgument` for an empty list or an entry with an
    /// empty `id` or `client_id`, and with `DuplicateClient` when an `id` or
    /// `client_id` repeats an earlier entry.
    pub fn new(registrations: Vec<RegisteredClient>) -> Result<Self> {
        if registrations.is_empty() {
            return Err(StorageError::InvalidArgument(
                "registrations cannot be empty".to_string(),
            ));
        }

        let mut by_id = HashMap::with_capacity(registrations.len());
        let mut by_client_id = HashMap::with_capacity(registrations.len());
        let mut registration_order = Vec::with_capacity(registrations.len());

        for registration in registrations {
            if registration.id.is_empty() {
                return Err(StorageError::InvalidArgument(
                    "registration id cannot be empty".to_string(),
                ));
            }
            if registration.client_id.is_empty() {
                return Err(StorageError::InvalidArgument(
                    "registration client_id cannot be empty".to_string(),
                ));
            }
            if by_id.contains_key(&registration.id) {
                return Err(StorageError::DuplicateClient(format!(
                    "Found duplicate identifier: {}",
                    registration.id
                )));
            }
            if by_client_id.contains_key(&registration.client_id) {
                return Err(StorageError::DuplicateClient(format!(
                    "Found duplicate client identifier: {}",
                    registration.client_id
                )));
            }

            let registration = Arc::new(registration);
            by_id.insert(registration.id.clone(), registration.clone());
            by_client_id.insert(registration.client_id.clone(), registration.clone());
            registration_order.push(registration);
        }

        tracing::debug!(count = registration_order.len(), "registered client repository built");

        Ok(Self {
            by_id,
            by_client_id,
            registration_order,
        })
    }

    pub fn len(&self) -> usize {
        self.registration_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registration_order.is_empty()
    }

    /// Clients in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RegisteredClient>> {
        self.registration_order.iter()
    }
}

#[async_trait]
impl RegisteredClientStore for MemoryRegisteredClientRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Arc<RegisteredClient>>> {
        if id.is_empty() {
            return Err(StorageError::InvalidArgument("id cannot be empty".to_string()));
        }
        Ok(self.by_id.get(id).cloned())
    }

    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Arc<RegisteredClient>>> {
        if client_id.is_empty() {
            return Err(StorageError::InvalidArgument(
                "client_id cannot be empty".to_string(),
            ));
        }
        Ok(self.by_client_id.get(client_id).cloned())
    }
}
