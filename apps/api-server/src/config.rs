//! Application configuration management.

use serde::Deserialize;
use stockx_db::DbConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_database_path(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_path() -> String {
    "stockx.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

impl DatabaseConfig {
    /// Pool settings for [`stockx_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        if self.path == ":memory:" {
            return DbConfig::in_memory();
        }
        DbConfig::new(&self.path)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, later ones winning:
    /// 1. `config/default.toml` (optional)
    /// 2. `config/{RUN_MODE}.toml` (optional, RUN_MODE defaults to `development`)
    /// 3. `STOCKX__SECTION__KEY` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STOCKX").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.database.path, "stockx.db");
        assert_eq!(config.database.db_config().max_connections, 5);
    }

    #[test]
    fn test_memory_path_uses_single_connection() {
        let database = DatabaseConfig {
            path: ":memory:".into(),
            max_connections: 8,
            min_connections: 1,
        };
        assert_eq!(database.db_config().max_connections, 1);
    }

    #[test]
    fn test_partial_sources_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("server.port", 9100)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.min_connections, 1);
    }
}
