//! Registered OAuth 2.0 client definition.

use chrono::Duration;
use std::collections::HashSet;
use uuid::Uuid;

use crate::oauth::types::{ClientAuthMethod, GrantType};

/// Default access token lifetime for a registered client
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 5;

/// Default refresh token lifetime for a registered client
pub const DEFAULT_REFRESH_TOKEN_TTL_MINUTES: i64 = 60;

/// A client provisioned with this authorization server.
///
/// Values are created once at registration and shared read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct RegisteredClient {
    /// Internal registration identifier
    pub id: String,
    /// Client identifier presented by the client
    pub client_id: String,
    /// Shared secret (confidential clients only)
    pub client_secret: Option<String>,
    /// Authentication methods this client may use at the token endpoint
    pub client_authentication_methods: HashSet<ClientAuthMethod>,
    /// Grant types this client may use
    pub authorization_grant_types: HashSet<GrantType>,
    /// Allowed redirect URIs
    pub redirect_uris: HashSet<String>,
    /// Allowed scopes
    pub scopes: HashSet<String>,
    /// PKCE is mandatory for authorization code grants, even with a secret
    pub require_proof_key: bool,
    /// The resource owner must approve each authorization request
    pub require_user_consent: bool,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Refresh tokens are kept across refreshes instead of rotated
    pub reuse_refresh_tokens: bool,
}

impl Default for RegisteredClient {
    fn default() -> Self {
        Self {
            id: String::new(),
            client_id: String::new(),
            client_secret: None,
            client_authentication_methods: HashSet::new(),
            authorization_grant_types: HashSet::new(),
            redirect_uris: HashSet::new(),
            scopes: HashSet::new(),
            require_proof_key: false,
            require_user_consent: false,
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            refresh_token_ttl: Duration::minutes(DEFAULT_REFRESH_TOKEN_TTL_MINUTES),
            reuse_refresh_tokens: true,
        }
    }
}

impl RegisteredClient {
    /// Create a client with a freshly generated registration id and default settings
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            id: generate_registration_id(),
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    /// Whether this client holds a shared secret
    pub fn is_confidential(&self) -> bool {
        self.client_secret.is_some()
    }

    pub fn supports_authentication_method(&self, method: ClientAuthMethod) -> bool {
        self.client_authentication_methods.contains(&method)
    }

    pub fn supports_grant_type(&self, grant_type: GrantType) -> bool {
        self.authorization_grant_types.contains(&grant_type)
    }
}

/// Generate an opaque registration id
pub fn generate_registration_id() -> String {
    Uuid::new_v4().to_string()
}
