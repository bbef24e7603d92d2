/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `notes`: Note CRUD

pub mod auth;
pub mod health;
pub mod notes;
