//! Authentication gate
//!
//! Every resource route sits behind [`require_auth`]. The middleware reads an
//! `Authorization: Bearer <token>` header, hands the token to an
//! [`AuthVerifier`], and stores the resulting [`Caller`] in the request
//! extensions. Handlers take the caller as an extractor.
//!
//! Token issuance (login, registration) is out of scope: the verifier only
//! checks credentials minted elsewhere.

use crate::core::entity::CallerId;
use crate::core::error::ApiError;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use std::sync::Arc;

/// Authenticated caller attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: CallerId,
}

/// Turns a bearer credential into a caller identity
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Caller>;
}

/// `sub` may be encoded as a JSON number or a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Subject {
    Number(CallerId),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Subject,
}

/// HS256 JWT verifier; the `sub` claim is the caller's numeric identity
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl AuthVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Caller> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        let id = match data.claims.sub {
            Subject::Number(id) => id,
            Subject::Text(raw) => raw
                .parse()
                .map_err(|_| anyhow!("subject '{}' is not a numeric identity", raw))?,
        };
        Ok(Caller { id })
    }
}

/// AuthCheck middleware
///
/// Runs before routing parameters are parsed, so an unauthenticated request
/// never reaches a handler or a store.
pub async fn require_auth(
    State(verifier): State<Arc<dyn AuthVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::unauthorized("Invalid Authorization format. Expected: Bearer <token>")
    })?;

    let caller = verifier.verify(token.trim()).await.map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("No authenticated caller"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> u64 {
        get_current_timestamp() + 600
    }

    #[tokio::test]
    async fn test_numeric_subject() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let caller = verifier
            .verify(&token(json!({"sub": 7, "exp": exp()}), SECRET))
            .await
            .unwrap();
        assert_eq!(caller, Caller { id: 7 });
    }

    #[tokio::test]
    async fn test_string_subject() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let caller = verifier
            .verify(&token(json!({"sub": "12", "exp": exp()}), SECRET))
            .await
            .unwrap();
        assert_eq!(caller.id, 12);
    }

    #[tokio::test]
    async fn test_non_numeric_subject_rejected() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let result = verifier
            .verify(&token(json!({"sub": "ann", "exp": exp()}), SECRET))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let result = verifier
            .verify(&token(json!({"sub": 7, "exp": exp()}), "other"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let expired = get_current_timestamp() - 3600;
        let result = verifier
            .verify(&token(json!({"sub": 7, "exp": expired}), SECRET))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_garbage_rejected() {
        let verifier = JwtVerifier::new(SECRET, 0);
        assert!(verifier.verify("not.a.jwt").await.is_err());
    }
}
