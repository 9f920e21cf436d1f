//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Process configuration, loaded once at startup. Keeps the source's flat, env-driven shape
// (`dotenv()` followed by `env::var`) but fails fast with a descriptive error instead of the
// source's `.expect(...)` panics (SPEC_FULL.md §4.9).
//--------------------------------------------------------------------------------------------------

use dotenv::dotenv;
use std::env;

use thiserror::Error;

const INSTANCE_ID: &str = "INSTANCE_ID";
const HTTP_BIND_ADDR: &str = "HTTP_BIND_ADDR";
const LOG_FILTER: &str = "LOG_FILTER";
const REMOTE_ADDR: &str = "REMOTE_ADDR";
const REMOTE_PASSWORD: &str = "REMOTE_PASSWORD";
const REMOTE_DB: &str = "REMOTE_DB";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(String),
    #[error("environment variable {0} has an invalid value: {1}")]
    Invalid(String, String),
}

/// Connection parameters for a remote backend, shared by every remote book unless overridden.
#[derive(Debug, Clone)]
pub struct RemoteDefaults {
    pub addr: String,
    pub password: Option<String>,
    pub db: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Identifies this running process in logs and event sinks. Unlike the other fields, this
    /// one has no sensible default: two instances sharing an identity would make their log
    /// output indistinguishable, so a missing value fails startup instead of guessing.
    pub instance_id: String,
    pub http_bind_addr: String,
    pub log_filter: String,
    /// Present only when the deployment has a remote backend configured; absent means every
    /// book in this process is in-memory.
    pub remote: Option<RemoteDefaults>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok();

        let instance_id =
            env::var(INSTANCE_ID).map_err(|_| ConfigError::Missing(INSTANCE_ID.to_string()))?;
        let http_bind_addr = env::var(HTTP_BIND_ADDR).unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let log_filter = env::var(LOG_FILTER).unwrap_or_else(|_| "info".to_string());

        let remote = match env::var(REMOTE_ADDR) {
            Ok(addr) => {
                let db = match env::var(REMOTE_DB) {
                    Ok(raw) => raw
                        .parse::<u32>()
                        .map_err(|_| ConfigError::Invalid(REMOTE_DB.to_string(), raw))?,
                    Err(_) => 0,
                };
                let password = env::var(REMOTE_PASSWORD).ok();
                Some(RemoteDefaults { addr, password, db })
            }
            Err(_) => None,
        };

        Ok(Config {
            instance_id,
            http_bind_addr,
            log_filter,
            remote,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test function since they mutate process-global env vars and cargo
    // runs tests in this module concurrently by default.
    #[test]
    fn instance_id_is_required_everything_else_defaults() {
        for var in [
            INSTANCE_ID,
            HTTP_BIND_ADDR,
            LOG_FILTER,
            REMOTE_ADDR,
            REMOTE_PASSWORD,
            REMOTE_DB,
        ] {
            std::env::remove_var(var);
        }

        let err = Config::from_env().unwrap_err();
        assert_eq!(err, ConfigError::Missing(INSTANCE_ID.to_string()));

        std::env::set_var(INSTANCE_ID, "test-instance");
        let config = match Config::from_env() {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(config.instance_id, "test-instance");
        assert_eq!(config.http_bind_addr, "127.0.0.1:8080");
        assert_eq!(config.log_filter, "info");
        assert!(config.remote.is_none());

        std::env::remove_var(INSTANCE_ID);
    }
}
