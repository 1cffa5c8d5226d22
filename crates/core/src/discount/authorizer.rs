use secrecy::{ExposeSecret, SecretString};

use super::Authorizer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticAuthorizer(bool);

impl StaticAuthorizer {
    pub fn new(authorized: bool) -> Self {
        Self(authorized)
    }

    pub fn allow() -> Self {
        Self(true)
    }

    pub fn deny() -> Self {
        Self(false)
    }
}

impl Authorizer for StaticAuthorizer {
    fn is_authorized(&self) -> bool {
        self.0
    }
}

/// Authorizes a single request by comparing the key the caller presented with
/// the configured one. Built per request; a missing key is never authorized.
#[derive(Clone, Debug)]
pub struct ApiKeyAuthorizer {
    expected: SecretString,
    presented: Option<SecretString>,
}

impl ApiKeyAuthorizer {
    pub fn new(expected: SecretString, presented: Option<SecretString>) -> Self {
        Self { expected, presented }
    }
}

impl Authorizer for ApiKeyAuthorizer {
    fn is_authorized(&self) -> bool {
        let expected = self.expected.expose_secret();
        if expected.is_empty() {
            return false;
        }

        self.presented
            .as_ref()
            .map(|presented| constant_time_eq(presented.expose_secret(), expected))
            .unwrap_or(false)
    }
}

fn constant_time_eq(left: &str, right: &str) -> bool {
    let (left, right) = (left.as_bytes(), right.as_bytes());
    if left.len() != right.len() {
        return false;
    }

    left.iter().zip(right).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use crate::discount::{
        authorizer::{ApiKeyAuthorizer, StaticAuthorizer},
        Authorizer,
    };

    fn secret(value: &str) -> SecretString {
        value.to_string().into()
    }

    #[test]
    fn static_authorizer_returns_fixed_answer() {
        assert!(StaticAuthorizer::allow().is_authorized());
        assert!(!StaticAuthorizer::deny().is_authorized());
        assert!(StaticAuthorizer::new(true).is_authorized());
    }

    #[test]
    fn api_key_authorizer_requires_matching_key() {
        assert!(ApiKeyAuthorizer::new(secret("pw-123"), Some(secret("pw-123"))).is_authorized());
        assert!(!ApiKeyAuthorizer::new(secret("pw-123"), Some(secret("pw-124"))).is_authorized());
        assert!(!ApiKeyAuthorizer::new(secret("pw-123"), Some(secret("pw-1234"))).is_authorized());
        assert!(!ApiKeyAuthorizer::new(secret("pw-123"), None).is_authorized());
    }

    #[test]
    fn empty_configured_key_never_authorizes() {
        assert!(!ApiKeyAuthorizer::new(secret(""), Some(secret(""))).is_authorized());
    }

    #[test]
    fn debug_output_redacts_keys() {
        let authorizer = ApiKeyAuthorizer::new(secret("pw-secret"), Some(secret("pw-secret")));
        assert!(!format!("{authorizer:?}").contains("pw-secret"));
    }
}
