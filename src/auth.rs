use async_trait::async_trait;
use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::Serialize;

pub type UserId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    NotConfigured,
    Connected,
}

/// Resolves a bearer token to a user id.
///
/// Implementations return `None` for anything they cannot verify; callers then
/// proceed anonymously.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<UserId>;

    fn status(&self) -> IdentityStatus;
}

/// Used when no identity provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVerifier;

#[async_trait]
impl TokenVerifier for NoopVerifier {
    async fn verify(&self, _token: &str) -> Option<UserId> {
        None
    }

    fn status(&self) -> IdentityStatus {
        IdentityStatus::NotConfigured
    }
}

/// Token from an `Authorization` header, with any `Bearer ` prefix removed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Verifies the request's bearer token, if any.
pub async fn resolve_user(verifier: &dyn TokenVerifier, headers: &HeaderMap) -> Option<UserId> {
    let token = bearer_token(headers)?;
    verifier.verify(token).await
}
