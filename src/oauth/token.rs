//! Result of a successful client authentication.

use indexmap::IndexSet;
use std::sync::Arc;

use crate::errors::TokenError;
use crate::oauth::clients::RegisteredClient;

/// An authenticated client together with the scopes it asked for.
///
/// The scope set is copied on construction and cannot be changed afterwards.
#[derive(Clone)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct ClientCredentialsToken {
    principal: Arc<RegisteredClient>,
    scopes: IndexSet<String>,
}

impl ClientCredentialsToken {
    pub fn new<I, S>(principal: Arc<RegisteredClient>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            principal,
            scopes: scopes.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Construct from parts that may be missing, as handed over by callers
    /// that assemble tokens from loosely typed input.
    pub fn try_new<I, S>(
        principal: Option<Arc<RegisteredClient>>,
        scopes: Option<I>,
    ) -> Result<Self, TokenError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let principal = principal.ok_or_else(|| {
            TokenError::InvalidArgument("principal is required".to_string())
        })?;
        let scopes =
            scopes.ok_or_else(|| TokenError::InvalidArgument("scopes are required".to_string()))?;
        Ok(Self::new(principal, scopes))
    }

    /// The authenticated client
    pub fn principal(&self) -> &Arc<RegisteredClient> {
        &self.principal
    }

    pub fn client_id(&self) -> &str {
        &self.principal.client_id
    }

    /// Requested scopes in the order they were first given
    pub fn scopes(&self) -> &IndexSet<String> {
        &self.scopes
    }

    /// Space-delimited scope string
    pub fn scope_string(&self) -> String {
        self.scopes.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Arc<RegisteredClient> {
        Arc::new(RegisteredClient::new("messaging-client"))
    }

    #[test]
    fn test_scopes_are_copied() {
        let mut scopes = vec!["message.read".to_string(), "openid".to_string()];
        let token = ClientCredentialsToken::new(principal(), &scopes);

        scopes.push("message.write".to_string());
        scopes.clear();

        let observed: Vec<_> = token.scopes().iter().map(String::as_str).collect();
        assert_eq!(observed, vec!["message.read", "openid"]);
    }

    #[test]
    fn test_scopes_keep_insertion_order_without_duplicates() {
        let token = ClientCredentialsToken::new(
            principal(),
            ["message.write", "openid", "message.write", "message.read"],
        );
        assert_eq!(token.scope_string(), "message.write openid message.read");
        assert_eq!(token.scopes().len(), 3);
    }

    #[test]
    fn test_try_new_rejects_missing_parts() {
        let missing_principal =
            ClientCredentialsToken::try_new(None, Some(vec!["openid".to_string()]));
        assert!(matches!(
            missing_principal,
            Err(TokenError::InvalidArgument(ref msg)) if msg.contains("principal")
        ));

        let missing_scopes = ClientCredentialsToken::try_new::<Vec<String>, String>(
            Some(principal()),
            None,
        );
        assert!(matches!(
            missing_scopes,
            Err(TokenError::InvalidArgument(ref msg)) if msg.contains("scopes")
        ));
    }

    #[test]
    fn test_try_new_accepts_empty_scopes() {
        let token =
            ClientCredentialsToken::try_new(Some(principal()), Some(Vec::<String>::new())).unwrap();
        assert!(token.scopes().is_empty());
        assert_eq!(token.client_id(), "messaging-client");
    }
}
