/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use notevault_api::{app::{build_router, AppState}, config::Config};
/// use notevault_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use notevault_shared::{
    auth::middleware::create_identity_middleware,
    services::{AuthService, NoteService},
    store::{NoteStore, Store, UserStore},
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is reference-counted, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub auth: AuthService,

    /// Caller-scoped note operations
    pub notes: NoteService,

    /// Backend handle for health checks
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services onto one store
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: Store + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let notes: Arc<dyn NoteStore> = store.clone();

        Self {
            auth: AuthService::new(users, config.jwt.secret.clone()),
            notes: NoteService::new(notes),
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /health         # Health check (public)
/// ├── POST   /register       # Create account (public)
/// ├── POST   /login          # Obtain token (public)
/// ├── POST   /notes          # Create note
/// ├── GET    /notes          # List notes (?search, ?page, ?limit)
/// ├── GET    /notes/:id      # Fetch note
/// ├── PUT    /notes/:id      # Update note
/// └── DELETE /notes/:id      # Soft-delete note
/// ```
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Identity extraction (attaches `AuthContext` when a valid token is sent)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
///
/// Note routes reject requests without an identity through the
/// [`crate::extract::Caller`] extractor.
pub fn build_router(state: AppState) -> Router {
    let identity = create_identity_middleware(state.config.jwt.secret.clone());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route(
            "/notes",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/notes/:id",
            get(routes::notes::get_note)
                .put(routes::notes::update_note)
                .delete(routes::notes::delete_note),
        )
        .layer(axum::middleware::from_fn(identity))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS policy: permissive for `*`, otherwise an explicit origin list
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
