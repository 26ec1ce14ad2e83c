//! Bearer-token authentication for the admin routes
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_admin::{Admin, middleware::AdminTokenAuth};
//! use axum::middleware;
//!
//! # fn example(store: acton_admin::store::SqliteStore) {
//! let auth = AdminTokenAuth::new("s3cret").with_login_path("/login");
//! let app: axum::Router = Admin::new(store)
//!     .with_auth(middleware::from_fn(move |req, next| auth.clone().handle(req, next)))
//!     .into_router();
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Middleware that requires `Authorization: Bearer <token>` on every request
///
/// Rejected HTMX requests get `401` with an `HX-Redirect` header when a login
/// path is configured. Other rejected requests are redirected to the login
/// path, or get a bare `401` with `WWW-Authenticate: Bearer` when there is
/// none.
#[derive(Clone, Debug)]
pub struct AdminTokenAuth {
    token: Arc<str>,
    login_path: Option<String>,
}

impl AdminTokenAuth {
    /// Require the given token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().into(),
            login_path: None,
        }
    }

    /// Send rejected requests to a login page
    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = Some(login_path.into());
        self
    }

    /// Middleware handler
    ///
    /// # Errors
    ///
    /// Returns [`AdminAuthError`] if the bearer token is missing or wrong.
    pub async fn handle(self, request: Request, next: Next) -> Result<Response, AdminAuthError> {
        if self.is_authorized(&request) {
            return Ok(next.run(request).await);
        }

        let is_htmx = request
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            == Some("true");

        tracing::warn!(
            path = %request.uri().path(),
            htmx = is_htmx,
            "Rejected admin request without valid token"
        );

        Err(match (self.login_path, is_htmx) {
            (Some(login_path), true) => AdminAuthError::HtmxRedirect(login_path),
            (Some(login_path), false) => AdminAuthError::RedirectToLogin(login_path),
            (None, _) => AdminAuthError::Unauthorized,
        })
    }

    fn is_authorized(&self, request: &Request) -> bool {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token.trim() == &*self.token)
    }
}

/// Authentication middleware errors
#[derive(Debug)]
pub enum AdminAuthError {
    /// No login page configured
    Unauthorized,
    /// HTMX request; contains the login path for `HX-Redirect`
    HtmxRedirect(String),
    /// Regular request; contains the login path to redirect to
    RedirectToLogin(String),
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                "Unauthorized",
            )
                .into_response(),
            Self::HtmxRedirect(login_path) => (
                StatusCode::UNAUTHORIZED,
                [("HX-Redirect", login_path.as_str())],
                "Unauthorized",
            )
                .into_response(),
            Self::RedirectToLogin(login_path) => Redirect::to(&login_path).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn protected_handler() -> &'static str {
        "Protected content"
    }

    fn app(auth: AdminTokenAuth) -> Router {
        Router::new()
            .route("/protected", get(protected_handler))
            .layer(middleware::from_fn(move |req, next| {
                auth.clone().handle(req, next)
            }))
    }

    fn request(token: Option<&str>, htmx: bool) -> Request {
        let mut builder = Request::builder().uri("/protected");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_proceeds() {
        let response = app(AdminTokenAuth::new("s3cret"))
            .oneshot(request(Some("s3cret"), false))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_returns_401() {
        let response = app(AdminTokenAuth::new("s3cret"))
            .oneshot(request(None, false))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get("www-authenticate").unwrap(), "Bearer");
    }

    #[tokio::test]
    async fn test_wrong_token_returns_401() {
        let response = app(AdminTokenAuth::new("s3cret"))
            .oneshot(request(Some("guess"), true))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("HX-Redirect").is_none());
    }

    #[tokio::test]
    async fn test_login_path_regular_request_redirects() {
        let auth = AdminTokenAuth::new("s3cret").with_login_path("/auth/signin");
        let response = app(auth).oneshot(request(None, false)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/auth/signin");
    }

    #[tokio::test]
    async fn test_login_path_htmx_request() {
        let auth = AdminTokenAuth::new("s3cret").with_login_path("/auth/signin");
        let response = app(auth).oneshot(request(None, true)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get("HX-Redirect").unwrap(), "/auth/signin");
    }
}
