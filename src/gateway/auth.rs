// ABOUTME: API-key checks for callers of the gateway
// ABOUTME: A key is `name.secret`; the name selects a registered client whose secret must match

use serde::Deserialize;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// One entry of the client registry file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    /// The secret half of the key, without the `name.` prefix
    pub api_key: String,
}

impl ClientRecord {
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("api key must have the form <name>.<secret>")]
    MalformedCredential,

    #[error("api key secret does not match client {0:?}")]
    InvalidCredential(String),

    #[error("no client registered under {0:?}")]
    UnknownCredential(String),

    #[error("client registry unavailable: {0}")]
    RegistryUnavailable(String),
}

/// A parsed `name.secret` credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiKey<'a> {
    pub name: &'a str,
    pub secret: &'a str,
}

impl<'a> ApiKey<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, AuthError> {
        let mut parts = raw.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(secret), None) if !name.is_empty() && !secret.is_empty() => {
                Ok(ApiKey { name, secret })
            }
            _ => Err(AuthError::MalformedCredential),
        }
    }
}

/// Checks `raw` against the registered clients.
pub fn validate_api_key(raw: &str, clients: &[ClientRecord]) -> Result<(), AuthError> {
    let key = ApiKey::parse(raw)?;

    let client = clients
        .iter()
        .find(|c| c.name == key.name)
        .ok_or_else(|| AuthError::UnknownCredential(key.name.to_string()))?;

    if !bool::from(client.api_key.as_bytes().ct_eq(key.secret.as_bytes())) {
        return Err(AuthError::InvalidCredential(key.name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clients() -> Vec<ClientRecord> {
        vec![
            ClientRecord::new("shop", "s3cret"),
            ClientRecord::new("bank", "xyz"),
        ]
    }

    #[test]
    fn accepts_matching_secret() {
        assert_eq!(validate_api_key("shop.s3cret", &clients()), Ok(()));
        assert_eq!(validate_api_key("bank.xyz", &clients()), Ok(()));
    }

    #[test]
    fn rejects_wrong_secret() {
        assert_eq!(
            validate_api_key("shop.nope", &clients()),
            Err(AuthError::InvalidCredential("shop".into()))
        );
    }

    #[test]
    fn secret_must_match_exactly() {
        for near_miss in ["shop.s3cre", "shop.s3cretx", "shop.S3cret", "shop.x3cret"] {
            assert_eq!(
                validate_api_key(near_miss, &clients()),
                Err(AuthError::InvalidCredential("shop".into())),
                "{near_miss}"
            );
        }
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(
            validate_api_key("ghost.s3cret", &clients()),
            Err(AuthError::UnknownCredential("ghost".into()))
        );
        assert!(validate_api_key("shop.s3cret", &[]).is_err());
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["", "shop", "shop.", ".s3cret", "shop.s3.cret", "."] {
            assert_eq!(
                validate_api_key(raw, &clients()),
                Err(AuthError::MalformedCredential),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn registry_records_deserialize() {
        let parsed: Vec<ClientRecord> =
            serde_json::from_str(r#"[{"name":"shop","api_key":"s3cret"}]"#).unwrap();
        assert_eq!(parsed, vec![ClientRecord::new("shop", "s3cret")]);
    }
}
