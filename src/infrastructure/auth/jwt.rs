use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};
use uuid::Uuid;

use crate::entities::token::{Claims, RefreshClaims, TokenType};
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;
/// There is exactly one admin.
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
    refresh_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
            refresh_expiration: Duration::days(config.refresh_token_exp_days),
        }
    }

    pub fn create_jwt(&self) -> Result<(String, i64), AuthError> {
        let now = Utc::now();
        let exp = (now + self.access_expiration).timestamp() as usize;

        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            admin: true,
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
            exp,
            iat: now.timestamp() as usize,
        };

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)?;
        Ok((token, self.access_expiration.num_seconds()))
    }

    pub fn create_refresh_jwt(&self) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.refresh_expiration).timestamp() as usize;

        let claims = RefreshClaims {
            sub: ADMIN_SUBJECT.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Refresh,
            exp,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.refresh_encoding).map_err(AuthError::from)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        let data = decode::<Claims>(token, &self.keys.decoding, &validation)?;
        if data.claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }

    pub fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        let data = decode::<RefreshClaims>(token, &self.keys.refresh_decoding, &validation)?;
        if data.claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }
}

impl TokenServiceRepository for JwtService {
    fn create_access_token(&self) -> Result<(String, i64), AuthError> {
        self.create_jwt()
    }

    fn create_refresh_token(&self) -> Result<String, AuthError> {
        self.create_refresh_jwt()
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        self.decode_jwt(token)
    }

    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError> {
        self.decode_refresh_jwt(token)
    }
}

/// Seconds until `exp`, or `None` once it has passed.
pub fn seconds_until(exp: usize) -> Option<u64> {
    let now = Utc::now().timestamp() as usize;
    exp.checked_sub(now).filter(|left| *left > 0).map(|left| left as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppEnvironment;

    fn service() -> JwtService {
        let config = AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: String::new(),
            redis_url: None,
            cors_allowed_origins: vec![],
            admin_secret: "secret".into(),
            jwt_secret: "j".repeat(48),
            jwt_expiration_minutes: 5,
            refresh_token_secret: "r".repeat(48),
            refresh_token_exp_days: 1,
            login_rate_per_minute: 5,
            post_retention_days: 30,
            trust_forwarded_for: false,
        };
        JwtService::new(&config)
    }

    #[test]
    fn access_token_round_trips_with_admin_claims() {
        let jwt = service();
        let (token, expires_in) = jwt.create_jwt().unwrap();

        let claims = jwt.decode_jwt(&token).unwrap().claims;
        assert!(claims.admin);
        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(expires_in, 300);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn tokens_are_not_interchangeable() {
        let jwt = service();
        let (access, _) = jwt.create_jwt().unwrap();
        let refresh = jwt.create_refresh_jwt().unwrap();

        assert!(jwt.decode_refresh_jwt(&access).is_err());
        assert!(jwt.decode_jwt(&refresh).is_err());
        assert!(jwt.decode_refresh_jwt(&refresh).is_ok());
    }

    #[test]
    fn each_token_gets_its_own_jti() {
        let jwt = service();
        let a = jwt.decode_jwt(&jwt.create_jwt().unwrap().0).unwrap().claims.jti;
        let b = jwt.decode_jwt(&jwt.create_jwt().unwrap().0).unwrap().claims.jti;
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(service().decode_jwt("not.a.jwt"), Err(AuthError::InvalidToken)));
    }
}
