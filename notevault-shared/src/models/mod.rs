/// Database models for NoteVault
///
/// # Models
///
/// - `user`: Accounts, roles and last-login stamps
/// - `note`: Owned, soft-deletable text notes
///
/// Both expose their SQL operations as associated functions taking a
/// `&PgPool`; the [`crate::store::postgres::PgStore`] wraps them behind the
/// store traits.

pub mod note;
pub mod user;
