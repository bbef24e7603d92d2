/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token issuing and validation
/// - [`middleware`]: Axum middleware attaching the caller identity
///
/// # Example
///
/// ```no_run
/// use notevault_shared::auth::jwt::{create_token, validate_token, Claims};
/// use notevault_shared::auth::password::{hash_password, verify_password};
/// use notevault_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), Role::Owner);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!")?;
/// let decoded = validate_token(&token, "secret-key-at-least-32-bytes-long!")?;
/// assert_eq!(decoded.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
