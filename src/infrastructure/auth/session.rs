use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, Header, TokenData, Validation};
use uuid::Uuid;

use crate::{
    entities::admin::SessionClaims,
    errors::AuthError,
    settings::{AppConfig, SessionKeys},
};

const SESSION_ALGORITHM: Algorithm = Algorithm::HS512;
const ADMIN_SUBJECT: &str = "admin";

/// Signs and checks admin session tokens. Logged-out sessions are remembered
/// until they would have expired anyway.
#[derive(Clone)]
pub struct SessionService {
    keys: SessionKeys,
    expiration: Duration,
    revoked: Arc<DashMap<String, usize>>,
}

impl SessionService {
    pub fn new(config: &AppConfig) -> Self {
        SessionService {
            keys: SessionKeys::from(config),
            expiration: Duration::minutes(config.session_expiration_minutes),
            revoked: Arc::new(DashMap::new()),
        }
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    pub fn create_session(&self) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: ADMIN_SUBJECT.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.expiration).timestamp() as usize,
        };

        encode(&Header::new(SESSION_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    pub fn decode_session(&self, token: &str) -> Result<TokenData<SessionClaims>, AuthError> {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.keys.decoding, &validation)?;
        if data.claims.sub != ADMIN_SUBJECT {
            return Err(AuthError::InvalidToken);
        }
        if self.revoked.contains_key(&data.claims.jti) {
            return Err(AuthError::TokenRevoked);
        }
        Ok(data)
    }

    pub fn revoke(&self, claims: &SessionClaims) {
        self.revoked.insert(claims.jti.clone(), claims.exp);
    }

    /// Forgets revocations whose tokens have expired; returns how many.
    pub fn purge_revoked(&self) -> usize {
        let now = Utc::now().timestamp() as usize;
        let before = self.revoked.len();
        self.revoked.retain(|_, exp| *exp > now);
        before - self.revoked.len()
    }
}
