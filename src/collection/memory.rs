//! In-memory document collection
//!
//! Keeps documents in a `Vec` behind an async lock. Supports the query
//! subset the backend issues: field equality, `$in`, and `$set` updates with
//! dotted paths. Anything else is rejected with
//! [`BackendError::UnsupportedOperation`].

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::traits::DocumentCollection;
use crate::errors::{BackendError, BackendResult};

/// In-memory collection for tests and ephemeral backends
#[derive(Debug, Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection seeded with `documents`.
    ///
    /// Documents without an `_id` get a fresh `ObjectId`.
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: RwLock::new(documents.into_iter().map(with_object_id).collect()),
        }
    }

    /// Copy of every stored document, in insertion order
    pub async fn snapshot(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the collection holds no documents
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find_one(&self, filter: Document) -> BackendResult<Option<Document>> {
        let documents = self.documents.read().await;
        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    async fn find(&self, filter: Document) -> BackendResult<Vec<Document>> {
        let documents = self.documents.read().await;
        let mut found = Vec::new();
        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }

    async fn update_one(&self, filter: Document, update: Document) -> BackendResult<()> {
        let assignments = set_assignments(&update)?;

        let mut documents = self.documents.write().await;
        for document in documents.iter_mut() {
            if matches_filter(document, &filter)? {
                // Apply to a copy so a failed path leaves the stored document intact
                let mut updated = document.clone();
                for (path, value) in assignments {
                    set_path(&mut updated, path, value.clone())?;
                }
                *document = updated;
                break;
            }
        }
        Ok(())
    }

    async fn insert_one(&self, document: Document) -> BackendResult<()> {
        let document = with_object_id(document);
        let mut documents = self.documents.write().await;

        let id = document.get("_id");
        if documents.iter().any(|existing| existing.get("_id") == id) {
            return Err(BackendError::Backend(format!(
                "duplicate key: _id {}",
                id.map(ToString::to_string).unwrap_or_default()
            )));
        }

        documents.push(document);
        Ok(())
    }

    async fn ping(&self) -> BackendResult<()> {
        Ok(())
    }
}

fn with_object_id(document: Document) -> Document {
    if document.contains_key("_id") {
        return document;
    }
    let mut stored = Document::new();
    stored.insert("_id", ObjectId::new());
    for (key, value) in document {
        stored.insert(key, value);
    }
    stored
}

fn matches_filter(document: &Document, filter: &Document) -> BackendResult<bool> {
    for (field, condition) in filter {
        if field.starts_with('$') {
            return Err(BackendError::unsupported(format!(
                "top-level operator {}",
                field
            )));
        }

        let value = get_path(document, field);
        let matched = match condition {
            Bson::Document(operators) if is_operator_document(operators) => {
                matches_operators(value, operators)?
            }
            expected => value == Some(expected),
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(document: &Document) -> bool {
    !document.is_empty() && document.keys().all(|key| key.starts_with('$'))
}

fn matches_operators(value: Option<&Bson>, operators: &Document) -> BackendResult<bool> {
    for (operator, argument) in operators {
        let matched = match operator.as_str() {
            "$in" => match argument {
                Bson::Array(candidates) => value.is_some_and(|v| candidates.contains(v)),
                _ => {
                    return Err(BackendError::Backend("$in needs an array".to_string()));
                }
            },
            other => return Err(BackendError::unsupported(format!("query operator {}", other))),
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn set_assignments(update: &Document) -> BackendResult<&Document> {
    let mut assignments = None;
    for (operator, argument) in update {
        match (operator.as_str(), argument) {
            ("$set", Bson::Document(fields)) => assignments = Some(fields),
            ("$set", _) => {
                return Err(BackendError::Backend("$set needs a document".to_string()));
            }
            (other, _) => {
                return Err(BackendError::unsupported(format!("update operator {}", other)));
            }
        }
    }
    assignments.ok_or_else(|| BackendError::unsupported("update without $set"))
}

fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

fn set_path(document: &mut Document, path: &str, value: Bson) -> BackendResult<()> {
    match path.split_once('.') {
        None => {
            document.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            let child = document
                .entry(head.to_string())
                .or_insert_with(|| Bson::Document(Document::new()));
            match child {
                Bson::Document(inner) => set_path(inner, rest, value),
                _ => Err(BackendError::Backend(format!(
                    "cannot create field '{}' in non-document element '{}'",
                    rest, head
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn seeded() -> MemoryCollection {
        MemoryCollection::with_documents(vec![
            doc! { "lang": "en", "ns": "common", "data": { "ok": "OK" } },
            doc! { "lang": "de", "ns": "common", "data": { "ok": "Gut" } },
            doc! { "lang": "en", "ns": "errors", "data": {} },
        ])
    }

    #[tokio::test]
    async fn test_seeded_documents_get_ids() {
        let collection = seeded();
        let documents = collection.snapshot().await;

        assert_eq!(documents.len(), 3);
        for document in &documents {
            assert!(document.get_object_id("_id").is_ok());
            assert_eq!(document.keys().next().map(String::as_str), Some("_id"));
        }
    }

    #[tokio::test]
    async fn test_find_one_equality() {
        let collection = seeded();
        let found = collection
            .find_one(doc! { "lang": "de", "ns": "common" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_document("data").unwrap(), &doc! { "ok": "Gut" });

        let missing = collection
            .find_one(doc! { "lang": "fr", "ns": "common" })
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_with_in() {
        let collection = seeded();
        let found = collection
            .find(doc! { "lang": { "$in": ["en", "fr"] }, "ns": { "$in": ["common", "errors"] } })
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.get_str("lang").unwrap() == "en"));
    }

    #[tokio::test]
    async fn test_find_with_empty_in_matches_nothing() {
        let collection = seeded();
        let found = collection
            .find(doc! { "lang": { "$in": [] } })
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_query_operator() {
        let collection = seeded();
        let result = collection.find(doc! { "lang": { "$regex": "^e" } }).await;
        assert!(matches!(result, Err(BackendError::UnsupportedOperation(_))));
    }

    #[tokio::test]
    async fn test_update_set_dotted_path_keeps_other_keys() {
        let collection = seeded();
        collection
            .update_one(
                doc! { "lang": "en", "ns": "common" },
                doc! { "$set": { "data.cancel": "Cancel" } },
            )
            .await
            .unwrap();

        let found = collection
            .find_one(doc! { "lang": "en", "ns": "common" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            found.get_document("data").unwrap(),
            &doc! { "ok": "OK", "cancel": "Cancel" }
        );
    }

    #[tokio::test]
    async fn test_update_creates_missing_parents() {
        let collection = MemoryCollection::with_documents(vec![doc! { "lang": "en" }]);
        collection
            .update_one(doc! { "lang": "en" }, doc! { "$set": { "data.menu.open": "Open" } })
            .await
            .unwrap();

        let found = collection.find_one(doc! {}).await.unwrap().unwrap();
        assert_eq!(
            found.get_document("data").unwrap(),
            &doc! { "menu": { "open": "Open" } }
        );
    }

    #[tokio::test]
    async fn test_update_through_scalar_fails_without_partial_write() {
        let collection =
            MemoryCollection::with_documents(vec![doc! { "lang": "en", "data": "flat" }]);
        let result = collection
            .update_one(
                doc! { "lang": "en" },
                doc! { "$set": { "lang": "fr", "data.title": "x" } },
            )
            .await;

        assert!(matches!(result, Err(BackendError::Backend(_))));
        let found = collection.find_one(doc! {}).await.unwrap().unwrap();
        assert_eq!(found.get_str("lang").unwrap(), "en");
    }

    #[tokio::test]
    async fn test_update_requires_set() {
        let collection = seeded();
        let result = collection
            .update_one(doc! { "lang": "en" }, doc! { "lang": "fr" })
            .await;
        assert!(matches!(result, Err(BackendError::UnsupportedOperation(_))));
    }

    #[tokio::test]
    async fn test_insert_and_duplicate_id() {
        let collection = MemoryCollection::new();
        assert!(collection.is_empty().await);

        let id = ObjectId::new();
        collection
            .insert_one(doc! { "_id": id, "lang": "en" })
            .await
            .unwrap();
        assert_eq!(collection.len().await, 1);

        let result = collection.insert_one(doc! { "_id": id, "lang": "de" }).await;
        assert!(matches!(result, Err(BackendError::Backend(_))));
        assert_eq!(collection.len().await, 1);
    }
}
