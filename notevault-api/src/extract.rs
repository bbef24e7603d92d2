/// Request extractors
///
/// [`Caller`] turns the identity attached by the identity middleware into a
/// handler argument. A request without one is rejected with 401 before the
/// handler body runs. [`ApiJson`] is `Json` with body rejections rendered
/// through [`ApiError`].

use crate::error::ApiError;
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use notevault_shared::{auth::middleware::AuthContext, error::ServiceError};

/// Authenticated caller of a protected route
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .map(Caller)
            .ok_or_else(|| ServiceError::Unauthorized.into())
    }
}

/// JSON request body whose rejections use the API error format
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
