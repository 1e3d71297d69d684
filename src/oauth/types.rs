//! OAuth 2.0 core types used during client authentication.
//!
//! Defines grant types, client authentication methods, token type
//! discriminators, the stored authorization record, and parameter names.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Conventional OAuth 2.0 parameter names
pub mod parameter_names {
    pub const GRANT_TYPE: &str = "grant_type";
    pub const CODE: &str = "code";
    pub const CLIENT_ID: &str = "client_id";
    pub const CLIENT_SECRET: &str = "client_secret";
    pub const SCOPE: &str = "scope";
    pub const REDIRECT_URI: &str = "redirect_uri";
    pub const CODE_CHALLENGE: &str = "code_challenge";
    pub const CODE_CHALLENGE_METHOD: &str = "code_challenge_method";
    pub const CODE_VERIFIER: &str = "code_verifier";
}

/// String-keyed bag of request parameters passed alongside client credentials
pub type AdditionalParameters = HashMap<String, String>;

/// OAuth 2.0 Grant Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    ClientCredentials,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAuth 2.0 Client Authentication Methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    ClientSecretBasic,
    ClientSecretPost,
    /// Public client proving possession through PKCE only
    None,
}

impl ClientAuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientAuthMethod::ClientSecretBasic => "client_secret_basic",
            ClientAuthMethod::ClientSecretPost => "client_secret_post",
            ClientAuthMethod::None => "none",
        }
    }
}

impl fmt::Display for ClientAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClientAuthMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "client_secret_basic" => Ok(ClientAuthMethod::ClientSecretBasic),
            "client_secret_post" => Ok(ClientAuthMethod::ClientSecretPost),
            "none" => Ok(ClientAuthMethod::None),
            other => Err(format!("unknown client authentication method: {}", other)),
        }
    }
}

/// Discriminator for the kind of token an authorization is looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    AuthorizationCode,
    AccessToken,
    RefreshToken,
}

/// The authorization request as it was received at the authorization endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAuthorizationRequest {
    /// Client ID
    pub client_id: String,
    /// Redirect URI
    pub redirect_uri: Option<String>,
    /// Requested scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    /// State parameter
    pub state: Option<String>,
    /// Extra request parameters, including the PKCE challenge
    #[serde(default)]
    pub additional_parameters: HashMap<String, String>,
}

/// Authorization state recorded by the issuance service for an authorization code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRecord {
    /// Unique authorization identifier
    pub id: String,
    /// Internal id of the registered client the code was issued to
    pub registered_client_id: String,
    /// Name of the resource owner who approved the request
    pub principal_name: String,
    /// The authorization code
    pub authorization_code: String,
    /// The originating authorization request
    pub authorization_request: StoredAuthorizationRequest,
}

impl AuthorizationRecord {
    /// Look up an additional parameter of the originating authorization request
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.authorization_request
            .additional_parameters
            .get(name)
            .map(String::as_str)
    }

    /// PKCE challenge sent at authorization time
    pub fn code_challenge(&self) -> Option<&str> {
        self.attribute(parameter_names::CODE_CHALLENGE)
    }

    /// PKCE challenge method sent at authorization time
    pub fn code_challenge_method(&self) -> Option<&str> {
        self.attribute(parameter_names::CODE_CHALLENGE_METHOD)
    }
}

/// OAuth Error Response
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthErrorResponse {
    /// Error code
    pub error: String,
    /// Error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Error URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

/// Parse a space-delimited scope string, keeping first-seen order
pub fn parse_scope(scope: &str) -> IndexSet<String> {
    scope.split_whitespace().map(str::to_string).collect()
}
