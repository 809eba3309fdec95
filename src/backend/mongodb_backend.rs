//! MongoDB translation backend
//!
//! Stores one document per (language, namespace) pair:
//!
//! ```text
//! { <lang>: "en", <ns>: "translation", <data>: { "title": "Hello" } }
//! ```
//!
//! The three field names are configurable and sanitized by default.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use i18n_mongo_backend::backend::{Backend, BackendConfig, BackendOptions, MongoBackend};
//!
//! async fn example() -> i18n_mongo_backend::BackendResult<()> {
//!     let config = BackendConfig {
//!         db_name: Some("app".to_string()),
//!         ..Default::default()
//!     };
//!     let backend = MongoBackend::new(BackendOptions::from_config(config))?;
//!
//!     backend.create(&["de"], "translation", "title", &"Hallo".into()).await?;
//!     let data = backend.read("de", "translation").await?;
//!     assert_eq!(data["title"], "Hallo");
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{ClientOptions, ServerAddress},
    Client,
};
use tracing::{debug, warn};

use super::options::{
    logging_error_handler, BackendConfig, BackendOptions, ErrorHandler, DEFAULT_COLLECTION_NAME,
    DEFAULT_DATA_FIELD_NAME, DEFAULT_HOST, DEFAULT_LANG_FIELD_NAME, DEFAULT_NS_FIELD_NAME,
    DEFAULT_PORT,
};
use super::traits::{Backend, MultiResourceData, ResourceData, Services, BACKEND_TYPE};
use crate::collection::DocumentCollection;
use crate::errors::{BackendError, BackendResult};
use crate::fields::{get_one_level, sanitize_field_name, set_one_level};

/// Translation backend over a MongoDB collection
pub struct MongoBackend {
    lang_field_name: String,
    ns_field_name: String,
    data_field_name: String,
    collection: Arc<dyn DocumentCollection>,
    client: Option<Client>,
    database_name: Option<String>,
    services: Option<Services>,
    on_read_error: ErrorHandler,
    on_read_multi_error: ErrorHandler,
    on_create_error: ErrorHandler,
}

impl MongoBackend {
    /// Plugin type tag
    pub const TYPE: &'static str = BACKEND_TYPE;

    /// Create a backend without a services handle
    pub fn new(options: BackendOptions) -> BackendResult<Self> {
        Self::init(None, options)
    }

    /// Create a backend from the host's services handle and options.
    ///
    /// An injected collection is adopted as-is. Otherwise `db_name` is
    /// required and a client is created for `host:port`; the driver connects
    /// lazily, so no I/O happens here.
    pub fn init(services: Option<Services>, options: BackendOptions) -> BackendResult<Self> {
        let BackendOptions {
            config,
            collection,
            client_options,
            on_read_error,
            on_read_multi_error,
            on_create_error,
        } = options;

        let sanitize = config.sanitize_field_names;
        let lang_field_name =
            resolve_field_name(&config.lang_field_name, DEFAULT_LANG_FIELD_NAME, sanitize)?;
        let ns_field_name =
            resolve_field_name(&config.ns_field_name, DEFAULT_NS_FIELD_NAME, sanitize)?;
        let data_field_name =
            resolve_field_name(&config.data_field_name, DEFAULT_DATA_FIELD_NAME, sanitize)?;

        let on_read_error = on_read_error.unwrap_or_else(|| logging_error_handler("read"));
        let on_read_multi_error =
            on_read_multi_error.unwrap_or_else(|| logging_error_handler("read_multi"));
        let on_create_error = on_create_error.unwrap_or_else(|| logging_error_handler("create"));

        let (collection, client, database_name) = match collection {
            Some(collection) => {
                debug!("using injected translation collection");
                (collection, None, None)
            }
            None => {
                let database_name = config
                    .db_name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        BackendError::configuration(
                            "The `db_name` option is needed if you don't pass the `collection` option",
                        )
                    })?;
                let collection_name = non_empty_or(&config.col_name, DEFAULT_COLLECTION_NAME);

                let client = Client::with_options(build_client_options(&config, client_options)?)
                    .map_err(|e| BackendError::Connection(e.to_string()))?;
                let collection = client
                    .database(&database_name)
                    .collection::<Document>(&collection_name);

                debug!(
                    database = %database_name,
                    collection = %collection_name,
                    "opened translation collection"
                );
                let collection: Arc<dyn DocumentCollection> = Arc::new(collection);
                (collection, Some(client), Some(database_name))
            }
        };

        Ok(Self {
            lang_field_name,
            ns_field_name,
            data_field_name,
            collection,
            client,
            database_name,
            services,
            on_read_error,
            on_read_multi_error,
            on_create_error,
        })
    }

    /// Field name holding the language
    pub fn lang_field_name(&self) -> &str {
        &self.lang_field_name
    }

    /// Field name holding the namespace
    pub fn ns_field_name(&self) -> &str {
        &self.ns_field_name
    }

    /// Field name holding the translation payload
    pub fn data_field_name(&self) -> &str {
        &self.data_field_name
    }

    /// The collection translations are stored in
    pub fn collection(&self) -> &Arc<dyn DocumentCollection> {
        &self.collection
    }

    /// The MongoDB client, when the backend opened its own connection
    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// The services handle passed at init
    pub fn services(&self) -> Option<&Services> {
        self.services.as_ref()
    }

    /// Check whether the store answers
    pub async fn is_available(&self) -> bool {
        match (&self.client, &self.database_name) {
            (Some(client), Some(database_name)) => client
                .database(database_name)
                .run_command(doc! { "ping": 1 })
                .await
                .is_ok(),
            _ => self.collection.ping().await.is_ok(),
        }
    }

    fn resource_filter(&self, language: &str, namespace: &str) -> Document {
        let mut filter = Document::new();
        set_one_level(&mut filter, &self.lang_field_name, language);
        set_one_level(&mut filter, &self.ns_field_name, namespace);
        filter
    }

    fn payload_of(&self, document: &Document) -> BackendResult<ResourceData> {
        match get_one_level(document, &self.data_field_name) {
            None | Some(Bson::Null) => Ok(ResourceData::new()),
            Some(Bson::Document(data)) => Ok(to_resource_data(data.clone())),
            Some(other) => Err(BackendError::deserialization(format!(
                "field '{}' holds {:?}, expected a document",
                self.data_field_name,
                other.element_type()
            ))),
        }
    }

    fn string_field<'a>(&self, document: &'a Document, field: &str) -> BackendResult<&'a str> {
        match get_one_level(document, field) {
            Some(Bson::String(value)) => Ok(value),
            _ => Err(BackendError::deserialization(format!(
                "field '{}' is missing or not a string",
                field
            ))),
        }
    }

    async fn read_resource(&self, language: &str, namespace: &str) -> BackendResult<ResourceData> {
        let filter = self.resource_filter(language, namespace);
        match self.collection.find_one(filter).await? {
            Some(document) => self.payload_of(&document),
            None => {
                debug!(language, namespace, "no stored resource");
                Ok(ResourceData::new())
            }
        }
    }

    async fn read_resources(
        &self,
        languages: &[&str],
        namespaces: &[&str],
    ) -> BackendResult<MultiResourceData> {
        let mut parsed = MultiResourceData::new();
        if languages.is_empty() || namespaces.is_empty() {
            return Ok(parsed);
        }

        let mut filter = Document::new();
        set_one_level(&mut filter, &self.lang_field_name, doc! { "$in": string_array(languages) });
        set_one_level(&mut filter, &self.ns_field_name, doc! { "$in": string_array(namespaces) });

        let documents = self.collection.find(filter).await?;
        debug!(count = documents.len(), "read multiple resources");

        for document in &documents {
            let language = self.string_field(document, &self.lang_field_name)?;
            let namespace = self.string_field(document, &self.ns_field_name)?;
            let payload = self.payload_of(document)?;

            let previous = parsed
                .entry(language.to_string())
                .or_default()
                .insert(namespace.to_string(), payload);
            if previous.is_some() {
                warn!(language, namespace, "duplicate resource documents, keeping the last one");
            }
        }

        Ok(parsed)
    }

    async fn create_resource(
        &self,
        language: &str,
        namespace: &str,
        key: &str,
        value: Bson,
    ) -> BackendResult<()> {
        let filter = self.resource_filter(language, namespace);

        match self.collection.find_one(filter.clone()).await? {
            Some(existing) => {
                let id = existing.get("_id").cloned().ok_or_else(|| {
                    BackendError::deserialization("stored resource has no _id field")
                })?;
                let mut assignment = Document::new();
                assignment.insert(format!("{}.{}", self.data_field_name, key), value);

                debug!(language, namespace, key, "updating existing resource");
                self.collection
                    .update_one(doc! { "_id": id }, doc! { "$set": assignment })
                    .await
            }
            None => {
                let mut data = Document::new();
                set_one_level(&mut data, key, value);
                let mut document = filter;
                set_one_level(&mut document, &self.data_field_name, data);

                debug!(language, namespace, key, "inserting new resource");
                self.collection.insert_one(document).await
            }
        }
    }

    async fn create_resources(
        &self,
        languages: &[&str],
        namespace: &str,
        key: &str,
        fallback_value: &serde_json::Value,
    ) -> BackendResult<()> {
        let value = mongodb::bson::to_bson(fallback_value)?;

        // One unit per distinct language; concurrent units on the same
        // (language, namespace) would both miss on find and both insert
        let mut seen = HashSet::new();
        let distinct: Vec<&str> = languages
            .iter()
            .copied()
            .filter(|language| seen.insert(*language))
            .collect();

        let units = distinct.into_iter().map(|language| {
            let value = value.clone();
            async move {
                let outcome = self.create_resource(language, namespace, key, value).await;
                (language, outcome)
            }
        });

        let failures: Vec<(String, BackendError)> = join_all(units)
            .await
            .into_iter()
            .filter_map(|(language, outcome)| outcome.err().map(|err| (language.to_string(), err)))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(BackendError::CreateFailed { failures })
        }
    }
}

#[async_trait]
impl Backend for MongoBackend {
    async fn read(&self, language: &str, namespace: &str) -> BackendResult<ResourceData> {
        let result = self.read_resource(language, namespace).await;
        report(&self.on_read_error, result)
    }

    async fn read_multi(
        &self,
        languages: &[&str],
        namespaces: &[&str],
    ) -> BackendResult<MultiResourceData> {
        let result = self.read_resources(languages, namespaces).await;
        report(&self.on_read_multi_error, result)
    }

    async fn create(
        &self,
        languages: &[&str],
        namespace: &str,
        key: &str,
        fallback_value: &serde_json::Value,
    ) -> BackendResult<()> {
        let result = self
            .create_resources(languages, namespace, key, fallback_value)
            .await;
        report(&self.on_create_error, result)
    }
}

impl fmt::Debug for MongoBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoBackend")
            .field("lang_field_name", &self.lang_field_name)
            .field("ns_field_name", &self.ns_field_name)
            .field("data_field_name", &self.data_field_name)
            .field("database_name", &self.database_name)
            .field("owns_client", &self.client.is_some())
            .finish()
    }
}

fn report<T>(handler: &ErrorHandler, result: BackendResult<T>) -> BackendResult<T> {
    if let Err(err) = &result {
        handler(err);
    }
    result
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn resolve_field_name(configured: &str, default: &str, sanitize: bool) -> BackendResult<String> {
    let name = non_empty_or(configured, default);
    if !sanitize {
        return Ok(name);
    }

    let sanitized = sanitize_field_name(&name);
    if sanitized.is_empty() {
        return Err(BackendError::configuration(format!(
            "field name '{}' is empty after sanitizing",
            name
        )));
    }
    Ok(sanitized)
}

fn build_client_options(
    config: &BackendConfig,
    base: Option<ClientOptions>,
) -> BackendResult<ClientOptions> {
    let host = non_empty_or(&config.host, DEFAULT_HOST);
    let port = if config.port == 0 { DEFAULT_PORT } else { config.port };

    let mut options = base.unwrap_or_default();
    options.hosts = vec![ServerAddress::parse(format!("{}:{}", host, port)).map_err(|e| {
        BackendError::configuration(format!("invalid address {}:{}: {}", host, port, e))
    })?];

    if let Some((user, password)) = config.credentials() {
        let mut credential = options.credential.take().unwrap_or_default();
        credential.username = Some(user.to_string());
        credential.password = Some(password.to_string());
        options.credential = Some(credential);
    }

    Ok(options)
}

fn string_array(values: &[&str]) -> Bson {
    Bson::Array(values.iter().map(|v| Bson::String(v.to_string())).collect())
}

fn to_resource_data(data: Document) -> ResourceData {
    data.into_iter()
        .map(|(key, value)| (key, value.into_relaxed_extjson()))
        .collect()
}
