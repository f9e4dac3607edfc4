use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::MemberId;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,         // Subject (member_id as string)
    pub member_id: MemberId, // Member UUID
    pub username: String,    // For logging/debugging
    pub is_admin: bool,      // Admin flag
    pub exp: i64,            // Expiration timestamp
    pub iat: i64,            // Issued at timestamp
    pub iss: String,         // Issuer
    pub jti: String,         // JWT ID (unique token identifier)
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a new JWT token for a member
    ///
    /// Token expires after 24 hours
    pub fn create_token(&self, member_id: MemberId, username: String, is_admin: bool) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(24);

        let claims = Claims {
            sub: member_id.to_string(),
            member_id,
            username,
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid, not expired and from our issuer
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "vsl-platform".to_string());
        let member_id = MemberId::new();

        let token = service
            .create_token(member_id, "lan".to_string(), true)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.member_id, member_id);
        assert_eq!(claims.username, "lan");
        assert!(claims.is_admin);
        assert_eq!(claims.iss, "vsl-platform");
    }

    #[test]
    fn test_wrong_secret_or_issuer_rejected() {
        let issuer = JwtService::new("secret1", "vsl-platform".to_string());
        let other_secret = JwtService::new("secret2", "vsl-platform".to_string());
        let other_issuer = JwtService::new("secret1", "someone-else".to_string());

        let token = issuer
            .create_token(MemberId::new(), "minh".to_string(), false)
            .unwrap();

        assert!(other_secret.verify_token(&token).is_err());
        assert!(other_issuer.verify_token(&token).is_err());
        assert!(issuer.verify_token("invalid_token").is_err());
    }
}
