//! Client authentication for the token endpoint.
//!
//! A client proves its identity either with its shared secret or, on an
//! authorization code grant, with the PKCE verifier matching the challenge
//! recorded when the code was issued.

use std::sync::Arc;

use crate::errors::OAuthError;
use crate::oauth::clients::RegisteredClient;
use crate::oauth::pkce;
use crate::oauth::token::ClientCredentialsToken;
use crate::oauth::types::*;
use crate::storage::traits::{AuthorizationLookup, RegisteredClientStore};

/// Unauthenticated client credentials extracted from a token request
#[derive(Clone)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct ClientAuthenticationRequest {
    /// Client identifier claimed by the caller
    pub client_id: String,
    /// Authentication method the caller used
    pub method: ClientAuthMethod,
    /// Shared secret, when one was presented
    pub client_secret: Option<String>,
    /// Remaining token request parameters
    pub additional_parameters: AdditionalParameters,
}

impl ClientAuthenticationRequest {
    pub fn new(client_id: impl Into<String>, method: ClientAuthMethod) -> Self {
        Self {
            client_id: client_id.into(),
            method,
            client_secret: None,
            additional_parameters: AdditionalParameters::new(),
        }
    }

    pub fn with_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_parameters.insert(name.into(), value.into());
        self
    }

    fn parameter(&self, name: &str) -> Option<&str> {
        self.additional_parameters.get(name).map(String::as_str)
    }

    fn is_authorization_code_grant(&self) -> bool {
        self.parameter(parameter_names::GRANT_TYPE) == Some(GrantType::AuthorizationCode.as_str())
            && self.parameter(parameter_names::CODE).is_some_and(|code| !code.is_empty())
    }
}

/// Authenticates clients against the registered client repository
#[derive(Clone)]
pub struct ClientAuthenticator {
    clients: Arc<dyn RegisteredClientStore>,
    authorizations: Arc<dyn AuthorizationLookup>,
}

impl ClientAuthenticator {
    pub fn new(
        clients: Arc<dyn RegisteredClientStore>,
        authorizations: Arc<dyn AuthorizationLookup>,
    ) -> Self {
        Self {
            clients,
            authorizations,
        }
    }

    /// Authenticate a client.
    ///
    /// Every rejected credential yields [`OAuthError::InvalidClient`]; the
    /// reason is only logged.
    pub async fn authenticate(
        &self,
        request: &ClientAuthenticationRequest,
    ) -> Result<ClientCredentialsToken, OAuthError> {
        if request.client_id.is_empty() {
            return Err(reject(&request.client_id, "empty client_id"));
        }

        let client = self
            .clients
            .find_by_client_id(&request.client_id)
            .await?
            .ok_or_else(|| reject(&request.client_id, "unknown client"))?;

        if !client.supports_authentication_method(request.method) {
            return Err(reject(&request.client_id, "authentication method not allowed"));
        }

        let mut authenticated = false;

        if let Some(ref presented) = request.client_secret {
            let matches = client
                .client_secret
                .as_deref()
                .is_some_and(|stored| pkce::constant_time_eq(stored, presented));
            if !matches {
                return Err(reject(&request.client_id, "client secret mismatch"));
            }
            authenticated = true;
        }

        if !authenticated {
            authenticated = self.authenticate_pkce_if_available(request, &client).await?;
        }

        if !authenticated {
            return Err(reject(&request.client_id, "no credentials presented"));
        }

        tracing::debug!(client_id = %client.client_id, "client authenticated");

        let scopes = request
            .parameter(parameter_names::SCOPE)
            .map(parse_scope)
            .unwrap_or_default();
        Ok(ClientCredentialsToken::new(client, scopes))
    }

    /// Returns `Ok(false)` when the request is not an authorization code grant.
    async fn authenticate_pkce_if_available(
        &self,
        request: &ClientAuthenticationRequest,
        client: &RegisteredClient,
    ) -> Result<bool, OAuthError> {
        if !request.is_authorization_code_grant() {
            return Ok(false);
        }
        let code = request.parameter(parameter_names::CODE).unwrap_or_default();

        let authorization = self
            .authorizations
            .find_by_token(code, TokenType::AuthorizationCode)
            .await?
            .ok_or_else(|| reject(&request.client_id, "authorization code not found"))?;

        let code_challenge = authorization.code_challenge().filter(|c| !c.is_empty());
        if code_challenge.is_none() && client.require_proof_key {
            return Err(reject(&request.client_id, "code_challenge required"));
        }

        let verified = pkce::verify_code_verifier(
            request.parameter(parameter_names::CODE_VERIFIER),
            code_challenge,
            authorization.code_challenge_method(),
        )
        .inspect_err(|e| {
            tracing::error!(client_id = %request.client_id, error = ?e, "PKCE verification unavailable");
        })?;

        if !verified {
            return Err(reject(&request.client_id, "code_verifier mismatch"));
        }

        Ok(true)
    }
}

fn reject(client_id: &str, reason: &'static str) -> OAuthError {
    tracing::debug!(client_id = %client_id, reason, "client authentication rejected");
    OAuthError::InvalidClient
}
