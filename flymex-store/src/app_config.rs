use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 { 10 }

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Creates the default categories, aircraft and airports at startup.
    #[serde(default)]
    pub seed_on_startup: bool,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    pub staff_username: String,
    pub staff_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    /// Require the `X-CSRFToken` header to match the `csrftoken` cookie on
    /// quote submissions.
    #[serde(default = "default_true")]
    pub csrf_protection: bool,
    #[serde(default = "default_quote_limit")]
    pub quote_requests_per_window: i64,
    #[serde(default = "default_rate_window")]
    pub rate_limit_window_seconds: i64,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_true() -> bool { true }
fn default_quote_limit() -> i64 { 10 }
fn default_rate_window() -> i64 { 60 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `FLYMEX__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("FLYMEX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_defaults_apply() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 8000

                [database]
                url = "postgres://localhost/flymex"

                [redis]
                url = "redis://127.0.0.1/"

                [auth]
                jwt_secret = "secret"
                jwt_expiration_seconds = 3600
                staff_username = "ops"
                staff_password = "pw"

                [security]
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let cfg: Config = s.try_deserialize().unwrap();
        assert!(cfg.security.csrf_protection);
        assert_eq!(cfg.security.quote_requests_per_window, 10);
        assert_eq!(cfg.security.rate_limit_window_seconds, 60);
        assert_eq!(cfg.server.request_timeout_seconds, 10);
        assert_eq!(cfg.database.max_connections, 5);
        assert!(!cfg.database.seed_on_startup);
    }
}
