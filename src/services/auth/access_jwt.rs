use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by access-token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token")]
    InvalidSubject,
    #[error("token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(e),
        }
    }
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `role` may still be present in tokens issued by older logins. It is
///   ignored; the role always comes from the account store.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub iat: Option<u64>,
    pub exp: u64,
}

/// Verified token, converted into the types the application uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub account_id: Uuid,
    pub email: Option<String>,
}

/// HS256 access-token verifier built from the process-wide secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Checks signature and `exp`, then promotes `sub` to a `Uuid`.
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, TokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        let account_id =
            Uuid::parse_str(data.claims.sub.trim()).map_err(|_| TokenError::InvalidSubject)?;

        Ok(VerifiedAccessToken {
            account_id,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign")
    }

    #[test]
    fn accepts_valid_token() {
        let id = Uuid::new_v4();
        let token = sign(
            json!({
                "sub": id.to_string(),
                "email": "a@clinic.test",
                "iat": now(),
                "exp": now() + 600,
            }),
            SECRET,
        );

        let verified = TokenVerifier::new(SECRET, 0).verify(&token).expect("verify");
        assert_eq!(verified.account_id, id);
        assert_eq!(verified.email.as_deref(), Some("a@clinic.test"));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = sign(
            json!({ "sub": Uuid::new_v4().to_string(), "exp": now() + 600 }),
            "someone-else",
        );

        let err = TokenVerifier::new(SECRET, 0).verify(&token).expect_err("reject");
        assert!(matches!(err, TokenError::Invalid(_)));
        assert_eq!(err.to_string(), "invalid token");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let token = sign(
            json!({ "sub": Uuid::new_v4().to_string(), "iat": now() - 7200, "exp": now() - 3600 }),
            SECRET,
        );

        let err = TokenVerifier::new(SECRET, 0).verify(&token).expect_err("reject");
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn garbage_is_invalid() {
        let err = TokenVerifier::new(SECRET, 0)
            .verify("not-a-jwt")
            .expect_err("reject");
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn non_uuid_subject_is_invalid() {
        let token = sign(json!({ "sub": "cl9x0abc", "exp": now() + 600 }), SECRET);

        let err = TokenVerifier::new(SECRET, 0).verify(&token).expect_err("reject");
        assert!(matches!(err, TokenError::InvalidSubject));
    }
}
