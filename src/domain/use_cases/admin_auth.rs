use validator::Validate;

use crate::auth::jwt::seconds_until;
use crate::auth::password::{hash_secret, verify_secret};
use crate::cache::token_store::{RedisTokenStore, ACCESS_DENY_PREFIX, REFRESH_DENY_PREFIX};
use crate::entities::token::{AdminLoginRequest, AuthResponse, Claims};
use crate::errors::{AuthError, PasswordError};
use crate::repositories::token::TokenServiceRepository;

/// Gatekeeper for the admin terminal: one shared secret, JWTs after that.
pub struct AdminAuthHandler<T>
where
    T: TokenServiceRepository,
{
    pub token_service: T,
    secret_hash: String,
    token_store: Option<RedisTokenStore>,
}

impl<T> AdminAuthHandler<T>
where
    T: TokenServiceRepository,
{
    /// Hashes the configured secret; the plain value is not kept.
    pub fn new(
        token_service: T,
        admin_secret: &str,
        token_store: Option<RedisTokenStore>,
    ) -> Result<Self, PasswordError> {
        Ok(AdminAuthHandler {
            token_service,
            secret_hash: hash_secret(admin_secret)?,
            token_store,
        })
    }

    pub fn token_store(&self) -> Option<&RedisTokenStore> {
        self.token_store.as_ref()
    }

    /// Verifies the submitted secret and issues a token pair
    pub async fn login(&self, request: AdminLoginRequest) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let is_valid = verify_secret(&request.secret, &self.secret_hash).map_err(|e| {
            tracing::error!("Admin secret verification failed: {}", e);
            AuthError::WrongSecret
        })?;
        if !is_valid {
            tracing::warn!("Rejected admin login with wrong secret");
            return Err(AuthError::WrongSecret);
        }

        let response = self.create_auth_response()?;
        tracing::info!("Admin logged in");
        Ok(response)
    }

    pub fn create_auth_response(&self) -> Result<AuthResponse, AuthError> {
        let (access_token, expires_in) = self.token_service.create_access_token()
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_token()
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse::new(access_token, refresh_token, expires_in))
    }

    /// Exchanges a refresh token for a new pair. The old refresh token is
    /// revoked when a token store is configured.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.decode_refresh_jwt(token)?.claims;

        if let Some(store) = &self.token_store {
            if store.is_revoked(REFRESH_DENY_PREFIX, &claims.jti).await? {
                return Err(AuthError::TokenRevoked);
            }
            if let Some(ttl) = seconds_until(claims.exp) {
                store.revoke(REFRESH_DENY_PREFIX, &claims.jti, ttl).await?;
            }
        }

        self.create_auth_response()
    }

    /// Blacklists the access token and, if given, the refresh token.
    pub async fn logout(&self, access: &Claims, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let Some(store) = &self.token_store else {
            tracing::debug!("No token store configured; logout is client-side only");
            return Ok(());
        };

        if let Some(ttl) = seconds_until(access.exp) {
            store.revoke(ACCESS_DENY_PREFIX, &access.jti, ttl).await?;
        }

        if let Some(token) = refresh_token {
            let refresh = self.token_service.decode_refresh_jwt(token)?.claims;
            if let Some(ttl) = seconds_until(refresh.exp) {
                store.revoke(REFRESH_DENY_PREFIX, &refresh.jti, ttl).await?;
            }
        }

        tracing::info!("Admin logged out");
        Ok(())
    }

    /// Decodes an access token and rejects revoked ones.
    pub async fn authenticate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.token_service.decode_jwt(token)?.claims;

        if let Some(store) = &self.token_store {
            match store.is_revoked(ACCESS_DENY_PREFIX, &claims.jti).await {
                Ok(true) => return Err(AuthError::TokenRevoked),
                Ok(false) => {}
                Err(e) => tracing::warn!("Token blacklist unavailable, skipping check: {}", e),
            }
        }

        Ok(claims)
    }
}
