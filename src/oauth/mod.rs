//! OAuth 2.0 client authentication with shared secrets and PKCE.

pub mod client_auth;
pub mod client_extract;
pub mod clients;
pub mod pkce;
pub mod token;
pub mod types;

// Re-export frequently used items from each module
pub use crate::storage::{
    inmemory::{MemoryAuthorizationStore, MemoryRegisteredClientRepository},
    traits::{AuthorizationLookup, RegisteredClientStore},
};
pub use client_auth::{ClientAuthenticationRequest, ClientAuthenticator};
pub use client_extract::extract_client_authentication;
pub use clients::RegisteredClient;
pub use token::ClientCredentialsToken;
pub use types::{
    AdditionalParameters, AuthorizationRecord, ClientAuthMethod, GrantType, OAuthErrorResponse,
    StoredAuthorizationRequest, TokenType, parse_scope,
};
