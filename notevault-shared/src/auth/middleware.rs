/// Identity extraction middleware for Axum
///
/// Reads `Authorization: Bearer <jwt>`, validates the token and, when it is
/// valid and unexpired, inserts an [`AuthContext`] into the request
/// extensions. Anything else (no header, wrong scheme, bad signature,
/// expired token) leaves the request without an identity; protected
/// handlers turn that absence into a 401 themselves.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use notevault_shared::auth::middleware::{create_identity_middleware, AuthContext};
///
/// async fn whoami(auth: Option<Extension<AuthContext>>) -> String {
///     match auth {
///         Some(Extension(ctx)) => format!("{} ({})", ctx.user_id, ctx.role.as_str()),
///         None => "anonymous".to_string(),
///     }
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_identity_middleware("secret")));
/// ```

use std::{future::Future, pin::Pin, sync::Arc};

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims};
use crate::models::user::Role;

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role claimed by the token
    pub role: Role,
}

impl AuthContext {
    /// Creates a context for the given user and role
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Creates a context from validated claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}

/// Extracts the token from a `Bearer` authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Attaches an [`AuthContext`] when the request carries a valid token
pub async fn identity_middleware(secret: Arc<str>, mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match validate_token(token, &secret) {
            Ok(claims) => {
                let context = AuthContext::from_claims(&claims);
                tracing::debug!(user_id = %context.user_id, role = context.role.as_str(), "Caller identified");
                req.extensions_mut().insert(context);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
            }
        }
    }

    next.run(req).await
}

/// Creates an identity middleware closure bound to the signing secret
///
/// Use with `axum::middleware::from_fn`.
pub fn create_identity_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    let secret: Arc<str> = Arc::from(secret.into());
    move |req, next| {
        let secret = Arc::clone(&secret);
        Box::pin(identity_middleware(secret, req, next))
    }
}
