use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::ApiError, repository::RepositoryState};

/// Claims
///
/// Payload carried inside every bearer token. The subject is the pair (`id`, `email`);
/// both must match a stored user for the token to authenticate anyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id ("Users".id).
    pub id: i32,
    /// Subject email, checked against the stored user on every request.
    pub email: String,
    /// Issued At (seconds since the epoch).
    pub iat: u64,
    /// Expiration Time (seconds since the epoch).
    pub exp: u64,
}

/// TokenError
///
/// Why a presented token was rejected. Callers report both kinds as "invalid token";
/// the distinction exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature is valid but `exp` has passed.
    Expired,
    /// Not a token, wrong signature, or missing claims.
    Malformed,
}

/// TokenService
///
/// Issues and verifies HS256-signed bearer tokens with an explicit expiry.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs)
    }

    /// issue
    ///
    /// Signs a token for the given subject, valid for the configured lifetime.
    pub fn issue(&self, subject_id: i32, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            id: subject_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        self.sign(&claims)
    }

    /// Signs arbitrary claims as-is. Used by `issue` and by tests that need odd expiries.
    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding_key)
    }

    /// verify
    ///
    /// Checks signature and expiry, returning the subject on success.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Malformed),
            },
        }
    }
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers take it as an argument;
/// its presence guarantees the token verified and its subject exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// AuthUser Extractor Implementation
///
/// Steps:
/// 1. Reuse an identity already attached by `auth_middleware`, if any.
/// 2. No `Authorization` header → `Unauthorized`.
/// 3. Not a `Bearer` credential, blank token, or token failing verification → `InvalidToken`.
/// 4. Token subject (id + email) not found in the store → `Unauthorized`.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    TokenService: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(ApiError::Unauthorized)?;

        let token = header_value
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or(ApiError::InvalidToken)?;

        let claims = TokenService::from_ref(state)
            .verify(token)
            .map_err(|kind| {
                tracing::debug!(?kind, "rejected bearer token");
                ApiError::InvalidToken
            })?;

        let repo = RepositoryState::from_ref(state);
        let user = repo
            .get_user(claims.id)
            .await?
            // The token may outlive the account, or carry a stale email.
            .filter(|user| user.email == claims.email)
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            email: user.email,
        })
    }
}

/// Extracts a non-blank token from a `Bearer <token>` header value.
/// Proxies commonly strip the trailing space of `Bearer `, so a bare scheme is treated the
/// same as an empty token.
fn bearer_token(value: &str) -> Option<&str> {
    let value = value.trim();
    let (scheme, rest) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}
