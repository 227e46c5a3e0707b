//! Bearer token verification.
//!
//! Tokens are HMAC-signed (HS256/HS384/HS512) by the auth service using the
//! shared secret as raw UTF-8 bytes. The issuer writes `id` as a number for
//! database-backed accounts and as a string elsewhere, and may omit
//! `username` for email-only accounts; the accessors below absorb both
//! quirks so the filter sees uniform values.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Decoded token payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    id: Option<serde_json::Value>,

    #[serde(default)]
    username: Option<String>,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    role: Option<String>,

    #[serde(default)]
    pub iat: Option<u64>,

    pub exp: u64,
}

impl Claims {
    /// The `id` claim coerced to a string; the issuer emits numbers for
    /// database-backed accounts.
    pub fn user_id(&self) -> Option<String> {
        match &self.id {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The `username` claim, falling back to `email`.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().or(self.email.as_deref())
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Verifies bearer tokens against the configured signing secret.
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenValidator {
    /// Build a validator from the shared secret, taken as raw UTF-8 bytes
    /// (no base64 decoding — the issuer signs with the literal secret).
    pub fn new(secret: &str) -> Self {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        Self { key, validation }
    }

    /// Verify signature and expiry. Any failure — malformed token, bad
    /// signature, unsupported algorithm, expired — collapses to `None`;
    /// the filter turns that into a 401.
    pub fn validate(&self, token: &str) -> Option<Claims> {
        match jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                None
            }
        }
    }
}
