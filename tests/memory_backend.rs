//! End-to-end backend behaviour against the in-memory collection

use i18n_mongo_backend::prelude::*;
use mongodb::bson::{doc, Document};
use serde_json::json;
use std::sync::Arc;

const LANG_FIELD_NAME: &str = "lng";
const NS_FIELD_NAME: &str = "ns";
const DATA_FIELD_NAME: &str = "data";

fn test_documents() -> Vec<Document> {
    vec![
        doc! { LANG_FIELD_NAME: "id", NS_FIELD_NAME: "translation", DATA_FIELD_NAME: { "title": "Halo Indonesia" } },
        doc! { LANG_FIELD_NAME: "en", NS_FIELD_NAME: "translation", DATA_FIELD_NAME: { "title": "Hello Indonesia" } },
    ]
}

fn backend_over(collection: Arc<MemoryCollection>) -> MongoBackend {
    let config = BackendConfig {
        lang_field_name: LANG_FIELD_NAME.to_string(),
        ns_field_name: NS_FIELD_NAME.to_string(),
        data_field_name: DATA_FIELD_NAME.to_string(),
        ..Default::default()
    };
    MongoBackend::new(BackendOptions::from_config(config).with_collection(collection))
        .expect("backend over injected collection")
}

#[tokio::test]
async fn test_read_returns_stored_payloads() {
    let backend = backend_over(Arc::new(MemoryCollection::with_documents(test_documents())));

    let data = backend.read("id", "translation").await.unwrap();
    assert_eq!(json!(data), json!({ "title": "Halo Indonesia" }));

    let data = backend.read("en", "translation").await.unwrap();
    assert_eq!(json!(data), json!({ "title": "Hello Indonesia" }));

    let data = backend.read("de", "translation").await.unwrap();
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_read_multi_scenario() {
    let backend = backend_over(Arc::new(MemoryCollection::with_documents(test_documents())));

    let resources = backend
        .read_multi(&["id", "en"], &["translation"])
        .await
        .unwrap();

    assert_eq!(
        json!(resources),
        json!({
            "id": { "translation": { "title": "Halo Indonesia" } },
            "en": { "translation": { "title": "Hello Indonesia" } }
        })
    );
}

#[tokio::test]
async fn test_read_multi_is_a_cross_product_without_placeholders() {
    let mut documents = test_documents();
    documents.push(doc! { LANG_FIELD_NAME: "en", NS_FIELD_NAME: "common", DATA_FIELD_NAME: { "ok": "OK" } });
    documents.push(doc! { LANG_FIELD_NAME: "fr", NS_FIELD_NAME: "common", DATA_FIELD_NAME: { "ok": "D'accord" } });
    let backend = backend_over(Arc::new(MemoryCollection::with_documents(documents)));

    let resources = backend
        .read_multi(&["id", "en"], &["translation", "common"])
        .await
        .unwrap();

    assert_eq!(resources.len(), 2);
    assert_eq!(resources["en"].len(), 2);
    assert_eq!(resources["id"].len(), 1);
    assert!(!resources["id"].contains_key("common"));
    assert!(!resources.contains_key("fr"));
}

#[tokio::test]
async fn test_create_new_resource_holds_only_the_key() {
    let collection = Arc::new(MemoryCollection::with_documents(test_documents()));
    let backend = backend_over(collection.clone());

    backend
        .create(&["de"], "translation", "title", &json!("Hallo Indonesien"))
        .await
        .unwrap();

    let stored = collection
        .find_one(doc! { LANG_FIELD_NAME: "de", NS_FIELD_NAME: "translation" })
        .await
        .unwrap()
        .expect("created document");
    assert_eq!(
        stored.get_document(DATA_FIELD_NAME).unwrap(),
        &doc! { "title": "Hallo Indonesien" }
    );
    assert_eq!(collection.len().await, 3);
}

#[tokio::test]
async fn test_create_merges_into_existing_resource() {
    let collection = Arc::new(MemoryCollection::with_documents(test_documents()));
    let backend = backend_over(collection.clone());

    backend
        .create(&["en"], "translation", "subtitle", &json!("Welcome"))
        .await
        .unwrap();

    let data = backend.read("en", "translation").await.unwrap();
    assert_eq!(
        json!(data),
        json!({ "title": "Hello Indonesia", "subtitle": "Welcome" })
    );
    assert_eq!(collection.len().await, 2);
}

#[tokio::test]
async fn test_create_twice_later_value_wins() {
    let collection = Arc::new(MemoryCollection::new());
    let backend = backend_over(collection.clone());

    backend
        .create(&["de"], "translation", "title", &json!("Erster"))
        .await
        .unwrap();
    backend
        .create(&["de"], "translation", "title", &json!("Zweiter"))
        .await
        .unwrap();

    assert_eq!(collection.len().await, 1);
    let data = backend.read("de", "translation").await.unwrap();
    assert_eq!(json!(data), json!({ "title": "Zweiter" }));
}

#[tokio::test]
async fn test_create_for_several_languages() {
    let collection = Arc::new(MemoryCollection::with_documents(test_documents()));
    let backend = backend_over(collection.clone());

    backend
        .create(&["id", "en", "de"], "translation", "footer", &json!("2024"))
        .await
        .unwrap();

    let resources = backend
        .read_multi(&["id", "en", "de"], &["translation"])
        .await
        .unwrap();
    for language in ["id", "en", "de"] {
        assert_eq!(resources[language]["translation"]["footer"], "2024");
    }
    assert_eq!(resources["id"]["translation"]["title"], "Halo Indonesia");
    assert_eq!(collection.len().await, 3);
}

#[tokio::test]
async fn test_sanitized_data_field_name_used_in_storage() {
    let collection = Arc::new(MemoryCollection::new());
    let config = BackendConfig {
        data_field_name: "a.b$c".to_string(),
        ..Default::default()
    };
    let backend = MongoBackend::new(
        BackendOptions::from_config(config).with_collection(collection.clone()),
    )
    .unwrap();

    backend
        .create(&["en"], "translation", "title", &json!("Hello"))
        .await
        .unwrap();

    let stored = collection.snapshot().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored[0].get_document("ab$c").unwrap(),
        &doc! { "title": "Hello" }
    );
    assert!(stored[0].get("a").is_none());

    let data = backend.read("en", "translation").await.unwrap();
    assert_eq!(data["title"], "Hello");
}

#[tokio::test]
async fn test_backend_as_trait_object() {
    let backend: Box<dyn Backend> =
        Box::new(backend_over(Arc::new(MemoryCollection::with_documents(test_documents()))));

    assert_eq!(backend.backend_type(), BACKEND_TYPE);
    let data = backend.read("id", "translation").await.unwrap();
    assert_eq!(data["title"], "Halo Indonesia");
}
