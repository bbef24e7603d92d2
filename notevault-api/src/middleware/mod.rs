/// Middleware modules for the API server
///
/// - Security headers
///
/// Identity extraction lives in `notevault_shared::auth::middleware` so the
/// token format stays next to the token code.

pub mod security;
