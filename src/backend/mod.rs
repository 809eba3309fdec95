//! Translation resource backend
//!
//! [`Backend`] is the contract a localization framework drives: `read`,
//! `read_multi` and `create`, plus a plugin type tag. [`MongoBackend`]
//! implements it over a [`DocumentCollection`](crate::collection::DocumentCollection),
//! either one it opens itself from [`BackendConfig`] or one injected through
//! [`BackendOptions::with_collection`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use i18n_mongo_backend::backend::{Backend, BackendOptions, MongoBackend};
//! use i18n_mongo_backend::collection::MemoryCollection;
//! use std::sync::Arc;
//!
//! async fn example() -> i18n_mongo_backend::BackendResult<()> {
//!     let collection = Arc::new(MemoryCollection::new());
//!     let backend = MongoBackend::new(BackendOptions::default().with_collection(collection))?;
//!
//!     backend.create(&["en", "de"], "common", "ok", &"OK".into()).await?;
//!     let resources = backend.read_multi(&["en", "de"], &["common"]).await?;
//!     assert_eq!(resources.len(), 2);
//!     Ok(())
//! }
//! ```

mod mongodb_backend;
mod options;
mod traits;

pub use mongodb_backend::MongoBackend;
pub use options::*;
pub use traits::*;
