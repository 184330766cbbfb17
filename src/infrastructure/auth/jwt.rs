use std::{collections::HashSet, sync::Arc};

use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use zeroize::Zeroizing;

use crate::entities::token::Claims;
use crate::errors::AuthError;
use crate::settings::AppConfig;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Verifies bearer tokens issued by the hosted auth provider. Tokens are
/// never minted here.
#[derive(Clone)]
pub struct JwtService {
    decoding: DecodingKey,
    validation: Validation,
    admin_emails: Arc<HashSet<String>>,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        let secret = Zeroizing::new(config.jwt_secret.clone());

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        match config.jwt_audience.as_deref() {
            Some(aud) if !aud.trim().is_empty() => validation.set_audience(&[aud.trim()]),
            _ => validation.validate_aud = false,
        }

        let admin_emails = config.admin_list().into_iter().collect();

        JwtService {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            admin_emails: Arc::new(admin_emails),
        }
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation).map_err(AuthError::from)
    }

    pub fn is_admin(&self, claims: &Claims) -> bool {
        claims
            .email
            .as_deref()
            .map(|email| self.admin_emails.contains(&email.trim().to_lowercase()))
            .unwrap_or(false)
    }

    /// Decodes the token and requires the caller to be on the admin list.
    pub fn authorize_admin(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.decode_jwt(token)?.claims;
        if self.is_admin(&claims) {
            Ok(claims)
        } else {
            Err(AuthError::Forbidden("Admin access required".into()))
        }
    }
}
