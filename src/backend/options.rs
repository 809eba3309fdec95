//! Backend configuration and runtime options

use std::fmt;
use std::sync::Arc;

use mongodb::options::ClientOptions;
use serde::{Deserialize, Serialize};

use crate::collection::DocumentCollection;
use crate::errors::BackendError;

/// Default field name for the language attribute
pub const DEFAULT_LANG_FIELD_NAME: &str = "lang";
/// Default field name for the namespace attribute
pub const DEFAULT_NS_FIELD_NAME: &str = "ns";
/// Default field name for the translation payload
pub const DEFAULT_DATA_FIELD_NAME: &str = "data";
/// Default MongoDB host
pub const DEFAULT_HOST: &str = "localhost";
/// Default MongoDB port
pub const DEFAULT_PORT: u16 = 27017;
/// Default collection name
pub const DEFAULT_COLLECTION_NAME: &str = "i18n";

/// Side-channel handler notified of every failed operation
pub type ErrorHandler = Arc<dyn Fn(&BackendError) + Send + Sync>;

/// Serializable backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Field name for the language attribute
    #[serde(default = "default_lang_field_name")]
    pub lang_field_name: String,
    /// Field name for the namespace attribute
    #[serde(default = "default_ns_field_name")]
    pub ns_field_name: String,
    /// Field name for the translation payload
    #[serde(default = "default_data_field_name")]
    pub data_field_name: String,
    /// Strip `.` and a leading `$` from the three field names
    #[serde(default = "default_sanitize_field_names")]
    pub sanitize_field_names: bool,
    /// Database name, required unless a collection is injected
    #[serde(default)]
    pub db_name: Option<String>,
    /// Collection name
    #[serde(default = "default_col_name")]
    pub col_name: String,
    /// MongoDB host
    #[serde(default = "default_host")]
    pub host: String,
    /// MongoDB port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username, used only together with `password`
    #[serde(default)]
    pub user: Option<String>,
    /// Password, used only together with `user`
    #[serde(default)]
    pub password: Option<String>,
}

fn default_lang_field_name() -> String {
    DEFAULT_LANG_FIELD_NAME.to_string()
}

fn default_ns_field_name() -> String {
    DEFAULT_NS_FIELD_NAME.to_string()
}

fn default_data_field_name() -> String {
    DEFAULT_DATA_FIELD_NAME.to_string()
}

fn default_sanitize_field_names() -> bool {
    true
}

fn default_col_name() -> String {
    DEFAULT_COLLECTION_NAME.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            lang_field_name: default_lang_field_name(),
            ns_field_name: default_ns_field_name(),
            data_field_name: default_data_field_name(),
            sanitize_field_names: true,
            db_name: None,
            col_name: default_col_name(),
            host: default_host(),
            port: DEFAULT_PORT,
            user: None,
            password: None,
        }
    }
}

impl BackendConfig {
    /// Credentials as a pair, only when both user and password are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }
}

/// Runtime options for constructing a backend.
///
/// Wraps a [`BackendConfig`] with the pieces that cannot be serialized: an
/// injected collection, driver options, and the per-operation error handlers.
#[derive(Clone, Default)]
pub struct BackendOptions {
    /// Serializable part of the configuration
    pub config: BackendConfig,
    /// Existing collection to use instead of opening a connection
    pub collection: Option<Arc<dyn DocumentCollection>>,
    /// Driver options merged under host, port and credentials
    pub client_options: Option<ClientOptions>,
    /// Notified when `read` fails
    pub on_read_error: Option<ErrorHandler>,
    /// Notified when `read_multi` fails
    pub on_read_multi_error: Option<ErrorHandler>,
    /// Notified when `create` fails
    pub on_create_error: Option<ErrorHandler>,
}

impl BackendOptions {
    /// Options from a configuration, with no collection and default handlers
    pub fn from_config(config: BackendConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Use an existing collection; connection parameters are then ignored
    pub fn with_collection(mut self, collection: Arc<dyn DocumentCollection>) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Set driver options merged under host, port and credentials
    pub fn with_client_options(mut self, client_options: ClientOptions) -> Self {
        self.client_options = Some(client_options);
        self
    }

    /// Set the `read` error handler
    pub fn on_read_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&BackendError) + Send + Sync + 'static,
    {
        self.on_read_error = Some(Arc::new(handler));
        self
    }

    /// Set the `read_multi` error handler
    pub fn on_read_multi_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&BackendError) + Send + Sync + 'static,
    {
        self.on_read_multi_error = Some(Arc::new(handler));
        self
    }

    /// Set the `create` error handler
    pub fn on_create_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&BackendError) + Send + Sync + 'static,
    {
        self.on_create_error = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for BackendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendOptions")
            .field("config", &self.config)
            .field("collection", &self.collection.is_some())
            .field("client_options", &self.client_options.is_some())
            .field("on_read_error", &self.on_read_error.is_some())
            .field("on_read_multi_error", &self.on_read_multi_error.is_some())
            .field("on_create_error", &self.on_create_error.is_some())
            .finish()
    }
}

/// Handler that logs the failure through `tracing`
pub fn logging_error_handler(operation: &'static str) -> ErrorHandler {
    Arc::new(move |err: &BackendError| {
        tracing::error!(operation, error = %err, "translation backend operation failed");
    })
}
