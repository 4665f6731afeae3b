//! Identity resolution
//!
//! Credential issuance lives outside Daybook; the API only needs to turn a
//! presented bearer token into a stable user id. [`StaticTokenProvider`]
//! does that from a configured token table.

use crate::config::AuthConfig;
use crate::diary::UserId;
use axum::http::{header, HeaderMap};
use thiserror::Error;

/// Identity resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingCredential,

    #[error("Invalid or expired token")]
    InvalidCredential,
}

/// Resolves a caller credential to a user id
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, credential: &str) -> Result<UserId, AuthError>;
}

/// Fixed token → user id table
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    tokens: Vec<(String, UserId)>,
}

impl StaticTokenProvider {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (S, UserId)>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, user_id)| (token.into(), user_id))
                .filter(|(token, _)| !token.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config
                .tokens
                .iter()
                .map(|t| (t.token.clone(), t.user_id)),
        )
    }

    /// Number of configured tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IdentityProvider for StaticTokenProvider {
    fn resolve(&self, credential: &str) -> Result<UserId, AuthError> {
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        // Check every token so timing does not reveal which one matched
        let mut found = None;
        for (token, user_id) in &self.tokens {
            if constant_time_compare(token, credential) {
                found = Some(*user_id);
            }
        }

        found.ok_or(AuthError::InvalidCredential)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

/// Compare without short-circuiting on the first differing byte
///
/// Leaks only the length difference.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let mut result = u8::from(a.len() != b.len());
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn provider() -> StaticTokenProvider {
        StaticTokenProvider::new([("alice-token", 1), ("bob-token", 2), ("", 3)])
    }

    #[test]
    fn test_resolve_known_tokens() {
        let provider = provider();
        assert_eq!(provider.len(), 2);
        assert_eq!(provider.resolve("alice-token"), Ok(1));
        assert_eq!(provider.resolve("bob-token"), Ok(2));
    }

    #[test]
    fn test_resolve_rejects_unknown_and_empty() {
        let provider = provider();
        assert_eq!(provider.resolve("alice-token2"), Err(AuthError::InvalidCredential));
        assert_eq!(provider.resolve("alice-toke"), Err(AuthError::InvalidCredential));
        assert_eq!(provider.resolve(""), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer  xyz "));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpw"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret", "secret"));
        assert!(!constant_time_compare("secret", "secreT"));
        assert!(!constant_time_compare("secret", "secret-longer"));
    }
}
