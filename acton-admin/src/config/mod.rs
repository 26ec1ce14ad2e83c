//! Configuration management for acton-admin
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_ADMIN_` prefix, `__` nests)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-admin/{service}/config.toml` (user config, XDG)
//! 4. `/etc/acton-admin/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [service]
//! name = "backoffice"
//! bind = "127.0.0.1:3000"
//!
//! [database]
//! url = "sqlite://./dev.db"
//! max_connections = 5
//!
//! [admin]
//! hidden_fields = ["Password", "Modules", "DeletedAt"]
//! auth_token = "change-me"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_admin::config::AdminConfig;
//!
//! # fn example() -> Result<(), acton_admin::AdminError> {
//! let config = AdminConfig::load_for_service("backoffice")?;
//! let bind = &config.service.bind;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Field names never rendered on the admin page unless configured otherwise
pub const DEFAULT_HIDDEN_FIELDS: [&str; 3] = ["Password", "Modules", "DeletedAt"];

const ENV_PREFIX: &str = "ACTON_ADMIN_";

/// Service identity and listen address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name, used for the XDG config directory and log output
    pub name: String,

    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "acton-admin".to_string(),
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL (`sqlite://…` or `postgres://…`)
    pub url: String,

    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./admin.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Admin panel behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Field display names never shown on the page
    pub hidden_fields: Vec<String>,

    /// Bearer token required on every admin route, if set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            hidden_fields: DEFAULT_HIDDEN_FIELDS.iter().map(ToString::to_string).collect(),
            auth_token: None,
        }
    }
}

/// Complete acton-admin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Service settings
    #[serde(default)]
    pub service: ServiceSettings,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Admin panel settings
    #[serde(default)]
    pub admin: AdminSettings,
}

impl AdminConfig {
    /// Load configuration for a specific service
    ///
    /// Sources are merged in the order listed in the module docs; files that
    /// do not exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Config`] if a file cannot be parsed or a value
    /// has the wrong type.
    pub fn load_for_service(service_name: &str) -> Result<Self, AdminError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let system_config = PathBuf::from("/etc/acton-admin")
            .join(service_name)
            .join("config.toml");
        let candidates = [
            system_config,
            Self::recommended_path(service_name),
            PathBuf::from("./config.toml"),
        ];
        for path in candidates.iter().filter(|path| path.exists()) {
            tracing::debug!(path = %path.display(), "Merging config file");
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file
    ///
    /// A missing file leaves the defaults in place. Environment variables
    /// still override the file.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Config`] if the file cannot be parsed or a value
    /// has the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, AdminError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    /// Get the recommended XDG config path for a service
    ///
    /// ```rust
    /// use acton_admin::config::AdminConfig;
    ///
    /// let path = AdminConfig::recommended_path("backoffice");
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| {
                config_dir
                    .join("acton-admin")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }

    fn extract(figment: Figment) -> Result<Self, AdminError> {
        figment
            .extract()
            .map_err(|e| AdminError::Config(e.to_string()))
    }
}
