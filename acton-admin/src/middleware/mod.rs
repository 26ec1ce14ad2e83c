//! Middleware layers for acton-admin
//!
//! Provides a ready-made authentication hook for the admin routes. Any other
//! tower layer can be used instead through [`crate::Admin::with_auth`].

pub mod auth;

pub use auth::{AdminAuthError, AdminTokenAuth};
