use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, state::AppState};

/// Claims embedded in an access token. Identity only; staff status is
/// re-read from the database at every privileged call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

/// Symmetric HS256 signing material plus the validity window, built from
/// explicit configuration.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::from_secs(config.ttl_minutes.max(0) as u64 * 60),
        }
    }

    pub fn sign(&self, username: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            username: username.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(%username, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        // A token is rejected the instant its expiry passes, no grace window.
        validation.leeway = 0;
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;
        if data.claims.username.is_empty() {
            return Err(TokenError::Invalid);
        }
        debug!(username = %data.claims.username, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign("alice").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            username: "alice".into(),
            iat: (now - TimeDuration::minutes(10)).unix_timestamp() as usize,
            exp: (now - TimeDuration::seconds(30)).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn tampered_signature_is_rejected_as_invalid() {
        let keys = make_keys();
        let mut token = keys.sign("alice").expect("sign");
        // Flip high bits of the last signature character.
        let last = token.pop().expect("non-empty token");
        token.push(if last == 'Q' { 'A' } else { 'Q' });
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid));
    }

    #[test]
    fn wrong_secret_is_rejected_as_invalid() {
        let keys = make_keys();
        let other = JwtKeys::new(&JwtConfig {
            secret: "another-secret".into(),
            ttl_minutes: 5,
        });
        let token = keys.sign("alice").expect("sign");
        assert!(matches!(other.verify(&token).unwrap_err(), TokenError::Invalid));
    }

    #[test]
    fn missing_username_claim_is_rejected_as_invalid() {
        let keys = make_keys();
        let exp = (OffsetDateTime::now_utc() + TimeDuration::minutes(5)).unix_timestamp();
        let payload = serde_json::json!({ "exp": exp, "iat": exp - 300 });
        let token = encode(&Header::default(), &payload, &keys.encoding).expect("encode");
        assert!(matches!(keys.verify(&token).unwrap_err(), TokenError::Invalid));
    }

    #[test]
    fn empty_username_claim_is_rejected_as_invalid() {
        let keys = make_keys();
        let token = keys.sign("").expect("sign");
        assert!(matches!(keys.verify(&token).unwrap_err(), TokenError::Invalid));
    }

    #[test]
    fn malformed_token_is_rejected_as_invalid() {
        let keys = make_keys();
        assert!(matches!(
            keys.verify("not-a-jwt").unwrap_err(),
            TokenError::Invalid
        ));
    }
}
