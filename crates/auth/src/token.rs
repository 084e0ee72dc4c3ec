//! HS256 token issuance and verification.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use notekeeper_core::notes::UserId;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Claims carried by a notekeeper token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    /// Issued at (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: ChronoDuration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let ttl = ChronoDuration::from_std(config.token_ttl)
            .unwrap_or_else(|_| ChronoDuration::hours(24));

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issues a token for `user_id`, valid from now for the configured TTL.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Issue("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }

    /// Verifies a token and returns the user id it was issued for.
    ///
    /// Every failure collapses into [`AuthError::InvalidCredential`]; the
    /// underlying reason is only logged at debug level.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AuthError::InvalidCredential
        })?;

        match data.claims.sub.parse::<UserId>() {
            Ok(user_id) if user_id > 0 => Ok(user_id),
            _ => {
                tracing::debug!(sub = %data.claims.sub, "Token subject is not a valid user id");
                Err(AuthError::InvalidCredential)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&AuthConfig::new(secret, Duration::from_secs(24 * 60 * 60)))
    }

    fn sign(claims: &serde_json::Value, secret: &str, alg: Algorithm) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service("secret");
        let token = tokens.issue(7).unwrap();

        assert_eq!(tokens.verify(&token), Ok(7));
    }

    #[test]
    fn test_issued_token_expires_in_24_hours() {
        let tokens = service("secret");
        let now = Utc::now();
        let token = tokens.issue_at(7, now).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.sub, "7");
        assert_eq!(data.claims.iat, now.timestamp());
        assert_eq!(data.claims.exp - data.claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let billion_hours = Duration::from_secs(1_000_000_000 * 60 * 60);
        let tokens = TokenService::new(&AuthConfig::new("secret", billion_hours));

        assert!(matches!(tokens.issue(7), Err(AuthError::Issue(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service("secret");
        let token = tokens
            .issue_at(7, Utc::now() - ChronoDuration::hours(25))
            .unwrap();

        assert_eq!(tokens.verify(&token), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service("one").issue(7).unwrap();
        assert_eq!(
            service("two").verify(&token),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service("secret");
        let token = tokens.issue(7).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other = sign(
            &serde_json::json!({"sub": "8", "iat": 0, "exp": Utc::now().timestamp() + 60}),
            "other",
            Algorithm::HS256,
        );
        let other_payload = other.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.{}", parts[0], other_payload, parts[2]);

        assert_eq!(tokens.verify(&forged), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let tokens = service("secret");
        let exp = Utc::now().timestamp() + 60;
        let token = sign(
            &serde_json::json!({"sub": "7", "iat": 0, "exp": exp}),
            "secret",
            Algorithm::HS512,
        );

        assert_eq!(tokens.verify(&token), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_missing_or_non_positive_subject_rejected() {
        let tokens = service("secret");
        let exp = Utc::now().timestamp() + 60;

        for claims in [
            serde_json::json!({"iat": 0, "exp": exp}),
            serde_json::json!({"sub": "0", "iat": 0, "exp": exp}),
            serde_json::json!({"sub": "-3", "iat": 0, "exp": exp}),
            serde_json::json!({"sub": "abc", "iat": 0, "exp": exp}),
        ] {
            let token = sign(&claims, "secret", Algorithm::HS256);
            assert_eq!(tokens.verify(&token), Err(AuthError::InvalidCredential));
        }
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = service("secret");
        assert_eq!(tokens.verify(""), Err(AuthError::InvalidCredential));
        assert_eq!(
            tokens.verify("not.a.token"),
            Err(AuthError::InvalidCredential)
        );
    }
}
