use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::{AuthError, Claims};
use crate::models::Role;

/// JWT token service for issuing and validating session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, expires_in: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    /// Issue a token embedding the subject email and resolved role.
    /// There is no refresh mechanism; clients log in again after expiry.
    pub fn issue(&self, email: &str, role: Role, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: email.to_string(),
            role,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Issue a token with the configured lifetime
    pub fn issue_default(&self, email: &str, role: Role) -> Result<String, AuthError> {
        self.issue(email, role, self.expires_in)
    }

    /// Validate and decode a token. A malformed token, a bad signature and a
    /// missing subject all surface as `InvalidToken`; a past expiry as
    /// `TokenExpired`.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeaderFormat)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeaderFormat);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test_secret", Duration::minutes(30))
    }

    #[test]
    fn test_issue_and_validate() {
        let tokens = service();

        let token = tokens
            .issue_default("trainer@example.com", Role::Trainer)
            .unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.sub, "trainer@example.com");
        assert_eq!(claims.role, Role::Trainer);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();

        let token = tokens
            .issue("user@example.com", Role::User, Duration::minutes(-5))
            .unwrap();

        assert!(matches!(
            tokens.validate(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let tokens = service();

        assert!(matches!(
            tokens.validate("not-a-jwt"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_signature_is_invalid() {
        let token = TokenService::new("other_secret", Duration::minutes(30))
            .issue_default("admin@example.com", Role::Admin)
            .unwrap();

        assert!(matches!(
            service().validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            extract_bearer_token("Bearer test_token").unwrap(),
            "test_token"
        );

        assert!(extract_bearer_token("Invalid header").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }
}
