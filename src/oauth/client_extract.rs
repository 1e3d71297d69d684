//! Extraction of client credentials from a token request.
//!
//! Supports HTTP Basic (`client_secret_basic`), credentials in the form body
//! (`client_secret_post`), and public clients sending only `client_id` with a
//! PKCE `code_verifier` (`none`).

use base64::{Engine, prelude::*};
use http::HeaderMap;
use http::header::AUTHORIZATION;

use crate::errors::OAuthError;
use crate::oauth::client_auth::ClientAuthenticationRequest;
use crate::oauth::types::*;

/// Build an unauthenticated client request from token request headers and form parameters.
///
/// Returns `Ok(None)` when the request carries no client identification.
pub fn extract_client_authentication(
    headers: &HeaderMap,
    params: &AdditionalParameters,
) -> Result<Option<ClientAuthenticationRequest>, OAuthError> {
    let mut additional_parameters = params.clone();
    let form_client_id = additional_parameters.remove(parameter_names::CLIENT_ID);
    let form_client_secret = additional_parameters.remove(parameter_names::CLIENT_SECRET);

    if let Some(auth_header) = headers.get(AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| OAuthError::InvalidRequest("Invalid Authorization header".to_string()))?;

        if let Some(encoded) = basic_credentials(auth_str) {
            let (client_id, client_secret) = decode_basic_credentials(encoded)?;

            if form_client_secret.is_some() {
                return Err(OAuthError::InvalidRequest(
                    "Multiple client authentication methods used".to_string(),
                ));
            }
            if form_client_id.as_deref().is_some_and(|id| id != client_id) {
                tracing::debug!("client_id parameter does not match Basic credentials");
                return Err(OAuthError::InvalidClient);
            }

            return Ok(Some(ClientAuthenticationRequest {
                client_id,
                method: ClientAuthMethod::ClientSecretBasic,
                client_secret: Some(client_secret),
                additional_parameters,
            }));
        }
    }

    let Some(client_id) = form_client_id else {
        return Ok(None);
    };

    if let Some(client_secret) = form_client_secret {
        return Ok(Some(ClientAuthenticationRequest {
            client_id,
            method: ClientAuthMethod::ClientSecretPost,
            client_secret: Some(client_secret),
            additional_parameters,
        }));
    }

    if additional_parameters.contains_key(parameter_names::CODE_VERIFIER) {
        return Ok(Some(ClientAuthenticationRequest {
            client_id,
            method: ClientAuthMethod::None,
            client_secret: None,
            additional_parameters,
        }));
    }

    Ok(None)
}

/// Decode `base64(urlencode(client_id) ":" urlencode(client_secret))` per RFC 6749 section 2.3.1
fn decode_basic_credentials(encoded: &str) -> Result<(String, String), OAuthError> {
    let decoded = BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(|_| malformed_basic("invalid base64"))?;
    let credentials = String::from_utf8(decoded).map_err(|_| malformed_basic("invalid utf-8"))?;
    let (client_id, client_secret) = credentials
        .split_once(':')
        .ok_or_else(|| malformed_basic("missing separator"))?;

    let client_id =
        form_urldecode(client_id).map_err(|_| malformed_basic("invalid client_id encoding"))?;
    let client_secret = form_urldecode(client_secret)
        .map_err(|_| malformed_basic("invalid client_secret encoding"))?;

    if client_id.is_empty() {
        return Err(malformed_basic("empty client_id"));
    }

    Ok((client_id, client_secret))
}

/// Returns the credentials of a `Basic` Authorization header; the scheme is case-insensitive
fn basic_credentials(auth_str: &str) -> Option<&str> {
    let (scheme, credentials) = auth_str.split_once(' ')?;
    scheme.eq_ignore_ascii_case("Basic").then_some(credentials)
}

/// application/x-www-form-urlencoded decoding of a single value
fn form_urldecode(value: &str) -> Result<String, std::string::FromUtf8Error> {
    urlencoding::decode(&value.replace('+', " ")).map(|decoded| decoded.into_owned())
}

fn malformed_basic(reason: &'static str) -> OAuthError {
    tracing::debug!(reason, "malformed Basic client credentials");
    OAuthError::InvalidClient
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn basic(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", BASE64_STANDARD.encode(value))).unwrap(),
        );
        headers
    }

    fn params(pairs: &[(&str, &str)]) -> AdditionalParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_basic_credentials() {
        let request = extract_client_authentication(
            &basic("messaging-client:secret"),
            &params(&[("grant_type", "client_credentials"), ("scope", "message.read")]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(request.client_id, "messaging-client");
        assert_eq!(request.method, ClientAuthMethod::ClientSecretBasic);
        assert_eq!(request.client_secret.as_deref(), Some("secret"));
        assert_eq!(
            request.additional_parameters.get("scope").map(String::as_str),
            Some("message.read")
        );
    }

    #[test]
    fn test_basic_credentials_are_url_decoded() {
        let request = extract_client_authentication(
            &basic("my%20client:p%40ss%3Aword"),
            &AdditionalParameters::new(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(request.client_id, "my client");
        assert_eq!(request.client_secret.as_deref(), Some("p@ss:word"));
    }

    #[test]
    fn test_basic_credentials_are_form_decoded() {
        let request = extract_client_authentication(
            &basic("my+client:p+w%2Bx"),
            &AdditionalParameters::new(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(request.client_id, "my client");
        assert_eq!(request.client_secret.as_deref(), Some("p w+x"));
    }

    #[test]
    fn test_basic_scheme_is_case_insensitive() {
        for scheme in ["basic", "BASIC", "bAsIc"] {
            let mut headers = HeaderMap::new();
            let encoded = BASE64_STANDARD.encode("messaging-client:secret");
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("{} {}", scheme, encoded)).unwrap(),
            );

            let request = extract_client_authentication(&headers, &AdditionalParameters::new())
                .unwrap()
                .unwrap();
            assert_eq!(request.method, ClientAuthMethod::ClientSecretBasic);
            assert_eq!(request.client_id, "messaging-client");
            assert_eq!(request.client_secret.as_deref(), Some("secret"));
        }
    }

    #[test]
    fn test_malformed_basic_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic !!!not-base64"));
        assert_eq!(
            extract_client_authentication(&headers, &AdditionalParameters::new()).unwrap_err(),
            OAuthError::InvalidClient
        );

        assert_eq!(
            extract_client_authentication(&basic("no-separator"), &AdditionalParameters::new())
                .unwrap_err(),
            OAuthError::InvalidClient
        );
    }

    #[test]
    fn test_basic_with_mismatched_client_id_rejected() {
        assert_eq!(
            extract_client_authentication(
                &basic("messaging-client:secret"),
                &params(&[("client_id", "other-client")]),
            )
            .unwrap_err(),
            OAuthError::InvalidClient
        );
    }

    #[test]
    fn test_basic_and_post_secret_together_rejected() {
        let result = extract_client_authentication(
            &basic("messaging-client:secret"),
            &params(&[("client_secret", "secret")]),
        );
        assert!(matches!(result, Err(OAuthError::InvalidRequest(_))));
    }

    #[test]
    fn test_post_credentials_removed_from_parameters() {
        let request = extract_client_authentication(
            &HeaderMap::new(),
            &params(&[
                ("client_id", "messaging-client"),
                ("client_secret", "secret"),
                ("grant_type", "client_credentials"),
            ]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(request.method, ClientAuthMethod::ClientSecretPost);
        assert_eq!(request.client_secret.as_deref(), Some("secret"));
        assert!(!request.additional_parameters.contains_key("client_id"));
        assert!(!request.additional_parameters.contains_key("client_secret"));
    }

    #[test]
    fn test_public_client_with_verifier() {
        let request = extract_client_authentication(
            &HeaderMap::new(),
            &params(&[
                ("client_id", "public-client"),
                ("grant_type", "authorization_code"),
                ("code", "code-1"),
                ("code_verifier", "abc"),
            ]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(request.method, ClientAuthMethod::None);
        assert!(request.client_secret.is_none());
        assert_eq!(
            request.additional_parameters.get("code").map(String::as_str),
            Some("code-1")
        );
    }

    #[test]
    fn test_no_client_identification() {
        assert!(extract_client_authentication(
            &HeaderMap::new(),
            &params(&[("grant_type", "client_credentials")]),
        )
        .unwrap()
        .is_none());

        // client_id alone is not a credential
        assert!(extract_client_authentication(
            &HeaderMap::new(),
            &params(&[("client_id", "public-client")]),
        )
        .unwrap()
        .is_none());
    }
}
