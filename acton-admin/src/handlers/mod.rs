//! HTTP handlers for the admin routes
//!
//! Handlers are mounted by [`crate::Admin::into_router`]; see
//! [`manager`] for the individual routes.

pub mod manager;
