use jsonwebtoken::TokenData;

use crate::{entities::token::{Claims, RefreshClaims}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Issues an admin access token, returning it with its lifetime in seconds.
    fn create_access_token(&self) -> Result<(String, i64), AuthError>;

    fn create_refresh_token(&self) -> Result<String, AuthError>;

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;

    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError>;
}
