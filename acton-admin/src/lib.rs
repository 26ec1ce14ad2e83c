//! acton-admin: generated HTMX admin panels for SQL-backed models
//!
//! Register model types once at startup and get list, edit and delete pages
//! for each of them under `/admin/manager`. Models describe their fields
//! through [`AdminModel`], usually derived; nothing is inspected at runtime.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_admin::prelude::*;
//!
//! #[derive(AdminModel)]
//! struct Base {
//!     #[admin(rename = "ID")]
//!     id: i64,
//!     deleted_at: Option<chrono::NaiveDateTime>,
//! }
//!
//! #[derive(AdminModel)]
//! struct User {
//!     #[admin(embed)]
//!     model: Base,
//!     name: String,
//!     is_admin: bool,
//!     password: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     acton_admin::observability::init()?;
//!     let config = AdminConfig::load_for_service("backoffice")?;
//!     let store = acton_admin::store::connect_sqlite(&config.database).await?;
//!
//!     let app: axum::Router = Admin::new(store)
//!         .with_config(&config)
//!         .register::<User>()
//!         .into_router();
//!
//!     let listener = tokio::net::TcpListener::bind(&config.service.bind).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `postgres` - [`store::PostgresStore`] (default)
//! - `sqlite` - [`store::SqliteStore`] (default)

// Lets `#[derive(AdminModel)]` expand to `::acton_admin::…` inside this crate
extern crate self as acton_admin;

pub mod coerce;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod naming;
pub mod observability;
pub mod registry;
pub mod state;
pub mod store;
pub mod template;

#[cfg(test)]
pub mod testing;

pub use acton_admin_macros::AdminModel;
pub use error::AdminError;
pub use model::{AdminModel, FieldKind, FieldValue, ModelSchema};
pub use registry::{Admin, Registry, MANAGER_PREFIX};

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_admin::prelude::*;
    //! ```

    pub use crate::config::AdminConfig;
    pub use crate::error::AdminError;
    pub use crate::middleware::AdminTokenAuth;
    pub use crate::model::{FieldKind, FieldValue, ModelSchema};
    pub use crate::registry::{Admin, Registry};
    pub use crate::store::AdminStore;
    pub use crate::AdminModel;

    pub use axum;
}
