//! Test helpers shared by the unit tests
//!
//! - [`server`] builds an `axum-test` server over a mocked store
//! - assertion helpers for the HTMX and caching headers the admin sets

pub mod assertions;

pub use assertions::*;

use std::sync::Arc;

use axum_test::TestServer;

use crate::model::{FieldKind, ModelSchema};
use crate::registry::Admin;
use crate::store::MockAdminStore;

/// `User` embedding a `Model` base with `ID` and `DeletedAt`
pub fn user_schema() -> ModelSchema {
    let base = ModelSchema::builder("Model")
        .field("ID", FieldKind::Integer)
        .field("DeletedAt", FieldKind::NullableTimestamp)
        .build();
    ModelSchema::builder("User")
        .embed("Model", base)
        .field("Name", FieldKind::Text)
        .field("IsAdmin", FieldKind::Bool)
        .field("Password", FieldKind::Text)
        .build()
}

/// `Tag` with a text `ID` and no soft-delete marker
pub fn tag_schema() -> ModelSchema {
    ModelSchema::builder("Tag")
        .field("ID", FieldKind::Text)
        .field("Label", FieldKind::Text)
        .build()
}

/// Serve the admin router for [`user_schema`] and [`tag_schema`] over `store`
pub fn server(store: MockAdminStore) -> TestServer {
    let app = Admin::with_store(Arc::new(store))
        .register_schema(user_schema())
        .register_schema(tag_schema())
        .into_router::<()>();
    TestServer::new(app).unwrap()
}
