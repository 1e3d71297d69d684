//! Environment-based configuration and registered client definitions.

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

use crate::errors::ConfigError;
use crate::oauth::clients::{RegisteredClient, generate_registration_id};
use crate::oauth::types::{ClientAuthMethod, GrantType};

/// Client default access token lifetime configuration
#[derive(Clone, Debug)]
pub struct ClientDefaultAccessTokenTtl(chrono::Duration);

/// Client default refresh token lifetime configuration
#[derive(Clone, Debug)]
pub struct ClientDefaultRefreshTokenTtl(chrono::Duration);

/// Client default refresh token reuse configuration
#[derive(Clone, Debug)]
pub struct ClientDefaultReuseRefreshTokens(bool);

/// Main application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub version: String,
    pub registered_clients_path: Option<String>,
    pub client_default_access_token_ttl: ClientDefaultAccessTokenTtl,
    pub client_default_refresh_token_ttl: ClientDefaultRefreshTokenTtl,
    pub client_default_reuse_refresh_tokens: ClientDefaultReuseRefreshTokens,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let registered_clients_path =
            optional_env("REGISTERED_CLIENTS_PATH").filter(|s| !s.is_empty());
        let client_default_access_token_ttl: ClientDefaultAccessTokenTtl =
            default_env("CLIENT_DEFAULT_ACCESS_TOKEN_TTL", "5m").try_into()?;
        let client_default_refresh_token_ttl: ClientDefaultRefreshTokenTtl =
            default_env("CLIENT_DEFAULT_REFRESH_TOKEN_TTL", "60m").try_into()?;
        let client_default_reuse_refresh_tokens: ClientDefaultReuseRefreshTokens =
            default_env("CLIENT_DEFAULT_REUSE_REFRESH_TOKENS", "true").try_into()?;

        Ok(Self {
            version: version()?,
            registered_clients_path,
            client_default_access_token_ttl,
            client_default_refresh_token_ttl,
            client_default_reuse_refresh_tokens,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            registered_clients_path: None,
            client_default_access_token_ttl: ClientDefaultAccessTokenTtl(
                chrono::Duration::minutes(5),
            ),
            client_default_refresh_token_ttl: ClientDefaultRefreshTokenTtl(
                chrono::Duration::minutes(60),
            ),
            client_default_reuse_refresh_tokens: ClientDefaultReuseRefreshTokens(true),
        }
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

fn parse_duration(value: &str) -> Result<chrono::Duration, ConfigError> {
    let duration = duration_str::parse(value)
        .map_err(|e| ConfigError::DurationParsingFailed(value.to_string(), e.to_string()))?;
    chrono::Duration::from_std(duration)
        .map_err(|e| ConfigError::DurationParsingFailed(value.to_string(), e.to_string()))
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::BoolParsingFailed(value.to_string())),
    }
}

impl TryFrom<String> for ClientDefaultAccessTokenTtl {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(parse_duration(&value)?))
    }
}

impl AsRef<chrono::Duration> for ClientDefaultAccessTokenTtl {
    fn as_ref(&self) -> &chrono::Duration {
        &self.0
    }
}

impl TryFrom<String> for ClientDefaultRefreshTokenTtl {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(parse_duration(&value)?))
    }
}

impl AsRef<chrono::Duration> for ClientDefaultRefreshTokenTtl {
    fn as_ref(&self) -> &chrono::Duration {
        &self.0
    }
}

impl TryFrom<String> for ClientDefaultReuseRefreshTokens {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_bool(&value).map(Self)
    }
}

impl AsRef<bool> for ClientDefaultReuseRefreshTokens {
    fn as_ref(&self) -> &bool {
        &self.0
    }
}

/// A registered client as written in the clients file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientDefinition {
    /// Registration id, generated when omitted
    pub id: Option<String>,
    pub client_id: String,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub client_authentication_methods: Vec<ClientAuthMethod>,
    #[serde(default)]
    pub authorization_grant_types: Vec<GrantType>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub require_proof_key: bool,
    #[serde(default)]
    pub require_user_consent: bool,
    /// Duration string such as "5m" or "1h"
    pub access_token_ttl: Option<String>,
    pub refresh_token_ttl: Option<String>,
    pub reuse_refresh_tokens: Option<bool>,
}

impl ClientDefinition {
    /// Resolve defaults and validate into a registered client
    pub fn into_registered_client(self, config: &Config) -> Result<RegisteredClient, ConfigError> {
        for redirect_uri in &self.redirect_uris {
            validate_redirect_uri(redirect_uri, &self.client_id)?;
        }

        let access_token_ttl = match self.access_token_ttl {
            Some(ref value) => parse_duration(value)?,
            None => *config.client_default_access_token_ttl.as_ref(),
        };
        let refresh_token_ttl = match self.refresh_token_ttl {
            Some(ref value) => parse_duration(value)?,
            None => *config.client_default_refresh_token_ttl.as_ref(),
        };

        Ok(RegisteredClient {
            id: self.id.unwrap_or_else(generate_registration_id),
            client_id: self.client_id,
            client_secret: self.client_secret,
            client_authentication_methods: self.client_authentication_methods.into_iter().collect(),
            authorization_grant_types: self.authorization_grant_types.into_iter().collect(),
            redirect_uris: self.redirect_uris.into_iter().collect(),
            scopes: self.scopes.into_iter().collect(),
            require_proof_key: self.require_proof_key,
            require_user_consent: self.require_user_consent,
            access_token_ttl,
            refresh_token_ttl,
            reuse_refresh_tokens: self
                .reuse_refresh_tokens
                .unwrap_or(*config.client_default_reuse_refresh_tokens.as_ref()),
        })
    }
}

fn validate_redirect_uri(redirect_uri: &str, client_id: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| {
        ConfigError::InvalidRedirectUri(redirect_uri.to_string(), client_id.to_string(), reason)
    };
    let url = Url::parse(redirect_uri).map_err(|e| invalid(e.to_string()))?;
    if url.fragment().is_some() {
        return Err(invalid("Redirect URI must not contain fragment".to_string()));
    }
    Ok(())
}

/// Parse client definitions from a JSON array
pub fn parse_registered_clients(
    source: &str,
    contents: &str,
    config: &Config,
) -> Result<Vec<RegisteredClient>, ConfigError> {
    let definitions: Vec<ClientDefinition> = serde_json::from_str(contents)
        .map_err(|e| ConfigError::ClientsFileInvalid(source.to_string(), e.to_string()))?;
    definitions
        .into_iter()
        .map(|definition| definition.into_registered_client(config))
        .collect()
}

/// Load client definitions from a JSON file
pub async fn load_registered_clients(
    path: impl AsRef<Path>,
    config: &Config,
) -> Result<Vec<RegisteredClient>, ConfigError> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::ClientsFileUnreadable(source.clone(), e.to_string()))?;
    let clients = parse_registered_clients(&source, &contents, config)?;
    tracing::info!(path = %source, count = clients.len(), "loaded registered clients");
    Ok(clients)
}

/// Demo client used when no clients file is configured
pub fn default_registered_client(config: &Config) -> RegisteredClient {
    let set = |values: &[&str]| values.iter().map(|s| s.to_string()).collect::<HashSet<_>>();

    RegisteredClient {
        id: generate_registration_id(),
        client_id: "messaging-client".to_string(),
        client_secret: Some("secret".to_string()),
        client_authentication_methods: [ClientAuthMethod::ClientSecretBasic].into_iter().collect(),
        authorization_grant_types: [
            GrantType::AuthorizationCode,
            GrantType::RefreshToken,
            GrantType::ClientCredentials,
        ]
        .into_iter()
        .collect(),
        redirect_uris: set(&[
            "http://localhost:8080/login/oauth2/code/messaging-client-oidc",
            "http://localhost:8080/authorized",
        ]),
        scopes: set(&["openid", "message.read", "message.write"]),
        require_proof_key: false,
        require_user_consent: true,
        access_token_ttl: *config.client_default_access_token_ttl.as_ref(),
        refresh_token_ttl: *config.client_default_refresh_token_ttl.as_ref(),
        reuse_refresh_tokens: *config.client_default_reuse_refresh_tokens.as_ref(),
    }
}
