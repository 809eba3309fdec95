//! MongoDB resource backend for i18n frameworks
//!
//! Stores translations as one document per (language, namespace) pair and
//! serves them through the three operations a localization framework calls
//! on its backend plugin:
//!
//! - **`read`** - payload of one language/namespace
//! - **`read_multi`** - payloads of several languages and namespaces at once
//! - **`create`** - store a missing key (fallback value) for one or more languages
//!
//! # Features
//!
//! - **`config`** (default) - TOML and environment configuration loading
//!
//! # Example: Opening a backend
//!
//! ```ignore
//! use i18n_mongo_backend::prelude::*;
//!
//! let config = BackendConfig {
//!     db_name: Some("app".to_string()),
//!     ..Default::default()
//! };
//! let backend = MongoBackend::new(BackendOptions::from_config(config))?;
//!
//! let data = backend.read("en", "translation").await?;
//! println!("title: {:?}", data.get("title"));
//! ```
//!
//! # Example: Using an existing collection
//!
//! ```ignore
//! use i18n_mongo_backend::prelude::*;
//! use mongodb::{bson::Document, Client};
//! use std::sync::Arc;
//!
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let collection = client.database("app").collection::<Document>("i18n");
//!
//! let backend = MongoBackend::new(
//!     BackendOptions::default()
//!         .with_collection(Arc::new(collection))
//!         .on_create_error(|err| eprintln!("missing key not saved: {}", err)),
//! )?;
//! ```

#![warn(missing_docs)]

/// Backend contract and the MongoDB implementation
pub mod backend;

/// Document collection abstraction (MongoDB and in-memory)
pub mod collection;

/// Error types
pub mod errors;

/// Field-name sanitizing and single-level document access
pub mod fields;

/// Configuration loading (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

pub use errors::{BackendError, BackendResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::{
        Backend, BackendConfig, BackendOptions, MongoBackend, MultiResourceData, ResourceData,
        BACKEND_TYPE,
    };
    pub use crate::collection::{DocumentCollection, MemoryCollection};
    pub use crate::errors::{BackendError, BackendResult};

    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};
}
