use axum::http::HeaderValue;
use catalog_db::mongo::MongoConfig;

/// Invalid or missing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Deployment mode, taken from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins. `*` allows any origin.
    pub cors_origins: Vec<String>,
    pub environment: Environment,
    pub mongo: MongoConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default       |
    /// |------------------------|---------------|
    /// | `MONGO_URI`            | (required)    |
    /// | `DB_NAME`              | `products_db` |
    /// | `COLLECTION_NAME`      | `catalog`     |
    /// | `COUNTERS_COLLECTION`  | `counters`    |
    /// | `HOST`                 | `0.0.0.0`     |
    /// | `PORT`                 | `5000`        |
    /// | `APP_ENV`              | `production`  |
    /// | `CORS_ORIGINS`         | `*`           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let uri = lookup("MONGO_URI")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("MONGO_URI"))?;

        let port = parse_var("PORT", var("PORT", "5000"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| o.as_str() != "*" && HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: bad.clone(),
            });
        }

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            cors_origins,
            environment: Environment::parse(&var("APP_ENV", "production")),
            mongo: MongoConfig {
                uri,
                database: var("DB_NAME", "products_db"),
                collection: var("COLLECTION_NAME", "catalog"),
                counters_collection: var("COUNTERS_COLLECTION", "counters"),
            },
        })
    }

    /// Whether every origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
