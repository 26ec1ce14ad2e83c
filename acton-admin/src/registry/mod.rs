//! Model registration and router wiring
//!
//! Models are registered once, before serving. The resulting [`Registry`] is
//! shared read-only by every request.
//!
//! # Example
//!
//! ```rust,ignore
//! use acton_admin::{Admin, AdminModel, store::SqliteStore};
//!
//! #[derive(AdminModel)]
//! struct User {
//!     #[admin(rename = "ID")]
//!     id: i64,
//!     name: String,
//! }
//!
//! # async fn example(pool: sqlx::SqlitePool) -> anyhow::Result<()> {
//! let app = Admin::new(SqliteStore::new(pool))
//!     .register::<User>()
//!     .into_router::<()>();
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, Route},
    Router,
};
use tower::{Layer, Service};
use tower_http::trace::TraceLayer;

use crate::config::{AdminConfig, DEFAULT_HIDDEN_FIELDS};
use crate::error::AdminError;
use crate::handlers::manager;
use crate::middleware::AdminTokenAuth;
use crate::model::{AdminModel, ModelSchema, ResolvedModel};
use crate::state::AdminState;
use crate::store::AdminStore;

/// Path prefix of every admin route
pub const MANAGER_PREFIX: &str = "/admin/manager";

/// Registered models, keyed by model name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    models: BTreeMap<String, ResolvedModel>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model type
    pub fn register<M: AdminModel>(&mut self) -> &mut Self {
        self.register_schema(M::schema())
    }

    /// Register a hand-written schema
    ///
    /// Registering a name twice replaces the earlier model.
    pub fn register_schema(&mut self, schema: ModelSchema) -> &mut Self {
        let model = ResolvedModel::new(schema);
        tracing::debug!(
            model = model.name(),
            fields = ?model.field_names(),
            "Registered admin model"
        );
        self.models.insert(model.name().to_string(), model);
        self
    }

    /// Look up a registered model
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedModel> {
        self.models.get(name)
    }

    /// Look up a registered model, failing with [`AdminError::UnknownCollection`]
    pub fn require(&self, name: &str) -> Result<&ResolvedModel, AdminError> {
        self.get(name)
            .ok_or_else(|| AdminError::UnknownCollection(name.to_string()))
    }

    /// Registered models, ordered by name
    pub fn models(&self) -> impl Iterator<Item = &ResolvedModel> {
        self.models.values()
    }

    /// Registered model names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// Number of registered models
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

type AuthHook = Box<dyn FnOnce(Router<AdminState>) -> Router<AdminState> + Send>;

/// Builder for the admin panel
///
/// Collects models, the store and an optional auth layer, then produces an
/// axum [`Router`] serving:
///
/// - `GET /admin/manager/{collection}`
/// - `POST /admin/manager/{collection}/edit/{id}`
/// - `DELETE /admin/manager/{collection}/delete/{id}`
#[must_use]
pub struct Admin {
    registry: Registry,
    store: Arc<dyn AdminStore>,
    hidden_fields: Vec<String>,
    auth: Option<AuthHook>,
}

impl Admin {
    /// Start an admin panel over a store
    pub fn new(store: impl AdminStore + 'static) -> Self {
        Self::with_store(Arc::new(store))
    }

    /// Start an admin panel over a shared store
    pub fn with_store(store: Arc<dyn AdminStore>) -> Self {
        Self {
            registry: Registry::new(),
            store,
            hidden_fields: DEFAULT_HIDDEN_FIELDS.iter().map(ToString::to_string).collect(),
            auth: None,
        }
    }

    /// Apply the `[admin]` section of a configuration
    ///
    /// Sets the hidden fields and, when `auth_token` is present, protects the
    /// routes with [`AdminTokenAuth`].
    pub fn with_config(mut self, config: &AdminConfig) -> Self {
        self.hidden_fields.clone_from(&config.admin.hidden_fields);
        match config.admin.auth_token.as_deref() {
            Some(token) => self.with_token_auth(token),
            None => self,
        }
    }

    /// Replace the list of fields never shown on the page
    pub fn hidden_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Register a model type
    pub fn register<M: AdminModel>(mut self) -> Self {
        self.registry.register::<M>();
        self
    }

    /// Register a hand-written schema
    pub fn register_schema(mut self, schema: ModelSchema) -> Self {
        self.registry.register_schema(schema);
        self
    }

    /// Wrap all admin routes in an authentication layer
    ///
    /// Any layer accepted by [`Router::route_layer`] works, typically one built
    /// with [`axum::middleware::from_fn`]. The layer only sees requests that
    /// matched an admin route.
    pub fn with_auth<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.auth = Some(Box::new(move |router: Router<AdminState>| {
            router.route_layer(layer)
        }));
        self
    }

    /// Protect the admin routes with a bearer token
    pub fn with_token_auth(self, token: impl Into<String>) -> Self {
        let auth = AdminTokenAuth::new(token);
        self.with_auth(middleware::from_fn(move |req, next| {
            auth.clone().handle(req, next)
        }))
    }

    /// Registered models so far
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Freeze the registry and build the router
    pub fn into_router<S>(self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        tracing::info!(
            models = ?self.registry.names(),
            auth = self.auth.is_some(),
            "Mounting admin panel at {MANAGER_PREFIX}"
        );

        let state = AdminState::new(self.registry, self.store, self.hidden_fields);

        let mut router = Router::new()
            .route(&format!("{MANAGER_PREFIX}/{{collection}}"), get(manager::list))
            .route(
                &format!("{MANAGER_PREFIX}/{{collection}}/edit/{{id}}"),
                post(manager::edit),
            )
            .route(
                &format!("{MANAGER_PREFIX}/{{collection}}/delete/{{id}}"),
                delete(manager::delete),
            );

        if let Some(hook) = self.auth {
            router = hook(router);
        }

        router.layer(TraceLayer::new_for_http()).with_state(state)
    }
}
