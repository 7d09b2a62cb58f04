use super::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the principal id, set by the upstream authorization layer.
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

/// Opaque identifier of the authenticated caller.
#[derive(Debug, Clone)]
pub struct Principal(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Principal(id.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}
