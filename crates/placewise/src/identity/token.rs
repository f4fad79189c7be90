//! Signed, expiring session tokens (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

use super::domain::{AccountId, Role};
use super::service::IdentityError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// What a verified token asserts about the caller. The account is still
/// re-fetched afterwards so deactivation takes effect immediately.
#[derive(Debug, Clone)]
pub(super) struct SessionClaims {
    pub(super) account: AccountId,
    pub(super) role: Role,
}

pub(super) struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub(super) fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    pub(super) fn issue(&self, account: &AccountId, role: Role) -> Result<String, IdentityError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account.0.clone(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| IdentityError::TokenIssue)
    }

    pub(super) fn verify(&self, token: &str) -> Result<SessionClaims, IdentityError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| IdentityError::InvalidToken)?;
        Ok(SessionClaims {
            account: AccountId(data.claims.sub),
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ttl_hours: i64) -> TokenKeys {
        TokenKeys::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: ttl_hours,
        })
    }

    #[test]
    fn issue_verify_round_trip() {
        let keys = keys(2);
        let id = AccountId("acct-000042".to_string());
        let token = keys.issue(&id, Role::Recruiter).expect("issues");
        let claims = keys.verify(&token).expect("verifies");
        assert_eq!(claims.account, id);
        assert!(matches!(claims.role, Role::Recruiter));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let minter = keys(2);
        let verifier = TokenKeys::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            token_ttl_hours: 2,
        });
        let token = minter
            .issue(&AccountId("acct-000042".to_string()), Role::Student)
            .expect("issues");
        assert!(matches!(
            verifier.verify(&token),
            Err(IdentityError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            keys(2).verify("not.a.token"),
            Err(IdentityError::InvalidToken)
        ));
    }
}
