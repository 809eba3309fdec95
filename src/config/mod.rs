//! Configuration loading for the translation backend.
//!
//! Backend settings come from a TOML file (`[backend]` table) and can be
//! overridden through `I18N_MONGO_*` environment variables, optionally
//! loaded from a `.env` file.
//!
//! # Example
//!
//! ```no_run
//! use i18n_mongo_backend::config::{ConfigurationLoader, EnvironmentLoader};
//! use std::path::Path;
//!
//! let mut loader = ConfigurationLoader::new(Some(Path::new("config/i18n.toml"))).unwrap();
//! EnvironmentLoader::new(None).apply(&mut loader.config.backend).unwrap();
//!
//! let options = loader.backend_options();
//! println!("Database: {:?}", options.config.db_name);
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{Configuration, ConfigurationLoader};
pub use self::environment::EnvironmentLoader;
