//! Environment variable overrides for the backend configuration.

use anyhow::{Context, Result};
use std::env;
use std::path::Path;

use crate::backend::BackendConfig;

/// MongoDB host override
pub const HOST_VAR: &str = "I18N_MONGO_HOST";
/// MongoDB port override
pub const PORT_VAR: &str = "I18N_MONGO_PORT";
/// Username override
pub const USER_VAR: &str = "I18N_MONGO_USER";
/// Password override
pub const PASSWORD_VAR: &str = "I18N_MONGO_PASSWORD";
/// Database name override
pub const DB_VAR: &str = "I18N_MONGO_DB";
/// Collection name override
pub const COLLECTION_VAR: &str = "I18N_MONGO_COLLECTION";

/// Loads environment variables from a .env file and the system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to a .env file. Only an explicitly given file is
    ///   loaded; with None only the process environment is used.
    pub fn new(env_file: Option<&Path>) -> Self {
        if let Some(path) = env_file.filter(|p| p.exists()) {
            if let Err(e) = dotenv::from_path(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to load .env file");
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_string_lossy().to_string()),
        }
    }

    /// The .env file this loader was created with
    pub fn env_file(&self) -> Option<&str> {
        self.env_file.as_deref()
    }

    /// Overlay `I18N_MONGO_*` variables onto `config`.
    ///
    /// Unset or empty variables leave the current value alone.
    pub fn apply(&self, config: &mut BackendConfig) -> Result<()> {
        if let Some(host) = var(HOST_VAR) {
            config.host = host;
        }
        if let Some(port) = var(PORT_VAR) {
            config.port = port
                .parse()
                .with_context(|| format!("{} must be a port number, got '{}'", PORT_VAR, port))?;
        }
        if let Some(user) = var(USER_VAR) {
            config.user = Some(user);
        }
        if let Some(password) = var(PASSWORD_VAR) {
            config.password = Some(password);
        }
        if let Some(db_name) = var(DB_VAR) {
            config.db_name = Some(db_name);
        }
        if let Some(col_name) = var(COLLECTION_VAR) {
            config.col_name = col_name;
        }
        Ok(())
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
