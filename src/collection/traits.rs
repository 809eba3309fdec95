//! Collection trait and its MongoDB implementation

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::Document;
use mongodb::Collection;

use crate::errors::BackendResult;

/// Minimal set of collection operations the backend needs.
///
/// Filters and updates use MongoDB query syntax. Implementations must
/// support at least field equality, `$in` and `$set` with dotted paths.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Find the first document matching `filter`
    async fn find_one(&self, filter: Document) -> BackendResult<Option<Document>>;

    /// Find every document matching `filter`
    async fn find(&self, filter: Document) -> BackendResult<Vec<Document>>;

    /// Apply `update` to the first document matching `filter`
    async fn update_one(&self, filter: Document, update: Document) -> BackendResult<()>;

    /// Insert a new document
    async fn insert_one(&self, document: Document) -> BackendResult<()>;

    /// Check that the collection can be reached
    async fn ping(&self) -> BackendResult<()>;
}

#[async_trait]
impl DocumentCollection for Collection<Document> {
    async fn find_one(&self, filter: Document) -> BackendResult<Option<Document>> {
        Ok(Collection::find_one(self, filter).await?)
    }

    async fn find(&self, filter: Document) -> BackendResult<Vec<Document>> {
        let cursor = Collection::find(self, filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_one(&self, filter: Document, update: Document) -> BackendResult<()> {
        Collection::update_one(self, filter, update).await?;
        Ok(())
    }

    async fn insert_one(&self, document: Document) -> BackendResult<()> {
        Collection::insert_one(self, document).await?;
        Ok(())
    }

    async fn ping(&self) -> BackendResult<()> {
        self.estimated_document_count().await?;
        Ok(())
    }
}
