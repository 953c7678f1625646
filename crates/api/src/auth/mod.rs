//! Authentication primitives for dashboard owners.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Public dashboard viewers are never authenticated; their access token is a
//! path parameter resolved by `pubdash_core`.

pub mod jwt;
