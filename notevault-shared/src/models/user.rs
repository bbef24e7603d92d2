/// User model and database operations
///
/// Users own notes and carry a role that decides how far their note
/// visibility reaches. Passwords are stored as Argon2id PHC strings only.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('owner', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     role user_role NOT NULL DEFAULT 'owner',
///     last_login_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notevault_shared::models::user::{CreateUser, Role, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Owner,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Column list shared by every query that returns a full user row
const USER_COLUMNS: &str = "id, email, password_hash, role, last_login_at, created_at";

/// Account role
///
/// Owners only ever see their own notes; admins see every note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, scoped to its own notes
    #[default]
    Owner,

    /// Unrestricted access to all notes
    Admin,
}

impl Role {
    /// Converts role to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }

    /// Whether this role bypasses owner scoping
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Normalised (trimmed, lower-case) email address, unique
    pub email: String,

    /// Argon2id password hash, never serialised
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Last successful login (None until the first login)
    pub last_login_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Normalised email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Role to assign
    pub role: Role,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a database error carrying the `users_email_key` constraint
    /// when the email is already taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.role)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by (already normalised) email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Stamps the last-login time with the current time
    ///
    /// `clock_timestamp()` rather than `NOW()` so two logins inside one
    /// transaction still move forward.
    ///
    /// # Returns
    ///
    /// The new timestamp, or None if the user does not exist
    pub async fn update_last_login(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        let stamped: Option<(Option<DateTime<Utc>>,)> = sqlx::query_as(
            r#"
            UPDATE users
            SET last_login_at = clock_timestamp()
            WHERE id = $1
            RETURNING last_login_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(stamped.and_then(|(at,)| at))
    }
}

/// Normalises an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!(Role::Owner.as_str(), "owner");
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::default(), Role::Owner);
    }

    #[test]
    fn test_role_serde() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(role.is_admin());
        assert!(!Role::Owner.is_admin());
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
    }

    #[test]
    fn test_password_hash_never_serialised() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Owner,
            last_login_at: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }
}
