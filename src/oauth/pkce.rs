//! PKCE (Proof Key for Code Exchange) verification per RFC 7636.

use base64::{Engine, prelude::*};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::OAuthError;

/// Challenge method marker for the plain transformation
pub const PLAIN: &str = "plain";

/// Challenge method marker for the SHA-256 transformation
pub const S256: &str = "S256";

/// Computes the S256 code challenge: BASE64URL-NOPAD(SHA256(ASCII(code_verifier)))
pub fn compute_s256_challenge(code_verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code_verifier.as_bytes());
    BASE64_URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Verify a presented code verifier against the challenge stored at authorization time.
///
/// Returns `Ok(false)` when the verifier is empty or does not match. An
/// unrecognized method is a server misconfiguration and yields `ServerError`.
pub fn verify_code_verifier(
    code_verifier: Option<&str>,
    code_challenge: Option<&str>,
    code_challenge_method: Option<&str>,
) -> Result<bool, OAuthError> {
    let code_verifier = match code_verifier {
        Some(verifier) if !verifier.is_empty() => verifier,
        _ => return Ok(false),
    };
    let code_challenge = code_challenge.unwrap_or_default();

    match code_challenge_method.unwrap_or_default() {
        "" | PLAIN => Ok(constant_time_eq(code_verifier, code_challenge)),
        S256 => Ok(constant_time_eq(
            &compute_s256_challenge(code_verifier),
            code_challenge,
        )),
        method => Err(OAuthError::ServerError(format!(
            "Unsupported code_challenge_method: {}",
            method
        ))),
    }
}

/// Compare two secrets without short-circuiting on the first differing byte
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 7636 appendix B
    const VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    const CHALLENGE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";

    #[test]
    fn test_s256_rfc_vector() {
        assert_eq!(compute_s256_challenge(VERIFIER), CHALLENGE);
        assert_eq!(
            verify_code_verifier(Some(VERIFIER), Some(CHALLENGE), Some(S256)),
            Ok(true)
        );
    }

    #[test]
    fn test_s256_mutated_challenge() {
        let mutated = CHALLENGE.replace('E', "F");
        assert_eq!(
            verify_code_verifier(Some(VERIFIER), Some(&mutated), Some(S256)),
            Ok(false)
        );
    }

    #[test]
    fn test_plain_and_missing_method() {
        assert_eq!(verify_code_verifier(Some("abc"), Some("abc"), Some(PLAIN)), Ok(true));
        assert_eq!(verify_code_verifier(Some("abc"), Some("abc"), None), Ok(true));
        assert_eq!(verify_code_verifier(Some("abc"), Some("abc"), Some("")), Ok(true));
        assert_eq!(verify_code_verifier(Some("xyz"), Some("abc"), Some(PLAIN)), Ok(false));
    }

    #[test]
    fn test_empty_verifier_never_matches() {
        assert_eq!(verify_code_verifier(None, None, None), Ok(false));
        assert_eq!(verify_code_verifier(Some(""), Some(""), Some(PLAIN)), Ok(false));
        assert_eq!(verify_code_verifier(Some(""), Some("abc"), Some("S512")), Ok(false));
    }

    #[test]
    fn test_missing_challenge_fails_non_empty_verifier() {
        assert_eq!(verify_code_verifier(Some("abc"), None, None), Ok(false));
    }

    #[test]
    fn test_constant_time_eq_is_exact() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(!constant_time_eq("abc", "ABC"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_unknown_method_is_server_error() {
        let result = verify_code_verifier(Some("abc"), Some("abc"), Some("S512"));
        assert!(matches!(result, Err(OAuthError::ServerError(_))));
    }
}
