//! Backend plugin contract
//!
//! Defines the operations a localization framework calls on its resource
//! backend, plus the capability tag used to classify the plugin.

use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::BackendResult;

/// Plugin type tag reported by every backend
pub const BACKEND_TYPE: &str = "backend";

/// Translation payload of one (language, namespace) resource
pub type ResourceData = serde_json::Map<String, serde_json::Value>;

/// Payloads keyed by language, then namespace
pub type MultiResourceData = BTreeMap<String, BTreeMap<String, ResourceData>>;

/// Opaque services handle handed over by the host framework
pub type Services = Arc<dyn Any + Send + Sync>;

/// Core trait for translation resource backends
///
/// Failures are always returned to the caller; implementations may also
/// notify a configured error handler.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Plugin type tag (always [`BACKEND_TYPE`])
    fn backend_type(&self) -> &'static str {
        BACKEND_TYPE
    }

    /// Load the payload of one (language, namespace) resource.
    ///
    /// Returns an empty mapping when no resource is stored.
    async fn read(&self, language: &str, namespace: &str) -> BackendResult<ResourceData>;

    /// Load every stored resource whose language is in `languages` and whose
    /// namespace is in `namespaces`.
    ///
    /// Pairs with nothing stored are absent from the result.
    async fn read_multi(
        &self,
        languages: &[&str],
        namespaces: &[&str],
    ) -> BackendResult<MultiResourceData>;

    /// Store `fallback_value` under `key` in the namespace of each language,
    /// creating the resource if it does not exist yet.
    async fn create(
        &self,
        languages: &[&str],
        namespace: &str,
        key: &str,
        fallback_value: &serde_json::Value,
    ) -> BackendResult<()>;
}
