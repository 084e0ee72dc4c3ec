use std::time::Duration;

/// Signing secret used when `JWT_SECRET` is not set. Only fit for development.
pub const DEFAULT_JWT_SECRET: &str = "dev-secret";

const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;

/// Token configuration.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC signing secret (default: `dev-secret`, logged as a warning)
    /// - `JWT_TTL_HOURS`: Lifetime of issued tokens in hours (default: 24)
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let token_ttl = parse_ttl_hours(std::env::var("JWT_TTL_HOURS").ok().as_deref());

        Self {
            jwt_secret,
            token_ttl,
        }
    }
}

/// Zero, unparsable and overflowing hour counts fall back to the default.
fn parse_ttl_hours(raw: Option<&str>) -> Duration {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|hours| *hours > 0)
        .and_then(|hours| hours.checked_mul(60 * 60))
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_TTL_HOURS * 60 * 60))
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
