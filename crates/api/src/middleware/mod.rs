//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireEditor`] -- Requires `editor` or `admin` role.

pub mod auth;
pub mod rbac;
