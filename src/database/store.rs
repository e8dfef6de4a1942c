use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::FilterData;

/// A stored JSON object. Documents returned by a store carry their identity
/// under [`ID_FIELD`].
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    JobApplications,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Jobs, Collection::JobApplications];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::JobApplications => "job_applications",
        }
    }
}

/// Result of an insert, shaped the way the frontend expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertOneResult {
    pub fn new(inserted_id: Uuid) -> Self {
        Self { acknowledged: true, inserted_id }
    }
}

/// Document store holding the jobs and job application collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, DatabaseError> {
        self.find_many(collection, &FilterData::default()).await
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError>;

    /// Store a document under a fresh identity. Any `_id` the caller put in the
    /// document is discarded.
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<InsertOneResult, DatabaseError>;

    async fn find_many(&self, collection: Collection, filter: &FilterData) -> Result<Vec<Document>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self) {}
}

/// Attach the identity to a stored document for output.
pub fn with_id(mut doc: Document, id: Uuid) -> Document {
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc
}
