/// Registration and login
///
/// Passwords are hashed and verified on the blocking thread pool. Tokens are
/// HS256 JWTs carrying the user ID and role, valid for one day.
///
/// # Example
///
/// ```no_run
/// use notevault_shared::services::{AuthService, RegisterUser};
/// use notevault_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AuthService::new(Arc::new(MemoryStore::new()), "a-secret-of-at-least-32-characters");
///
/// let token = auth
///     .register(RegisterUser {
///         email: "user@example.com".to_string(),
///         password: "correct horse".to_string(),
///         role: None,
///     })
///     .await?;
///
/// let outcome = auth.login("user@example.com", "correct horse").await?;
/// println!("{} {}", token, outcome.last_login);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::jwt::{self, Claims};
use crate::auth::password;
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{normalize_email, CreateUser, Role};
use crate::store::{StoreError, UserStore};

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// Email address, normalised before use
    pub email: String,

    /// Plaintext password
    pub password: String,

    /// Requested role (owner when absent)
    pub role: Option<Role>,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed access token
    pub token: String,

    /// Last-login time written by this login
    pub last_login: DateTime<Utc>,
}

/// Auth use-cases over a [`UserStore`]
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: Arc<str>,
}

impl AuthService {
    /// Creates the service with the signing secret
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: impl Into<String>) -> Self {
        Self {
            users,
            jwt_secret: Arc::from(jwt_secret.into()),
        }
    }

    /// Registers a user and returns a signed token
    ///
    /// # Errors
    ///
    /// `DuplicateEmail` if the email is taken, including when a concurrent
    /// registration wins the race to the unique index.
    pub async fn register(&self, data: RegisterUser) -> ServiceResult<String> {
        let email = normalize_email(&data.email);

        if self.users.find_user_by_email(&email).await?.is_some() {
            debug!(email = %email, "Registration rejected: email in use");
            return Err(ServiceError::DuplicateEmail);
        }

        let plaintext = data.password;
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash_password(&plaintext)).await??;

        let user = self
            .users
            .insert_user(CreateUser {
                email,
                password_hash,
                role: data.role.unwrap_or_default(),
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => ServiceError::DuplicateEmail,
                other => ServiceError::Store(other),
            })?;

        info!(user_id = %user.id, role = user.role.as_str(), "User registered");

        self.issue_token(user.id, user.role)
    }

    /// Authenticates a user, stamps last-login and returns a signed token
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email or a wrong password. The two
    /// cases are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginOutcome> {
        let email = normalize_email(email);

        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!(email = %email, "Login rejected: unknown email");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let plaintext = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || {
            password::verify_password(&plaintext, &stored_hash)
        })
        .await??;

        if !matches {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        let last_login = self
            .users
            .record_login(user.id)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        info!(user_id = %user.id, "User logged in");

        let token = self.issue_token(user.id, user.role)?;
        Ok(LoginOutcome { token, last_login })
    }

    fn issue_token(&self, user_id: uuid::Uuid, role: Role) -> ServiceResult<String> {
        let claims = Claims::new(user_id, role);
        Ok(jwt::create_token(&claims, &self.jwt_secret)?)
    }
}
