use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::store::{with_id, Collection, Document, DocumentStore, InsertOneResult, ID_FIELD};
use crate::filter::filter_order::FilterOrder;
use crate::filter::filter_where::FilterWhere;
use crate::filter::FilterData;

/// In-process store with the same query semantics as the Postgres backend.
/// Collections keep insertion order. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(Uuid, Document)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        let found = collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| *doc_id == id))
            .map(|(doc_id, doc)| with_id(doc.clone(), *doc_id));
        Ok(found)
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<InsertOneResult, DatabaseError> {
        doc.remove(ID_FIELD);
        let id = Uuid::new_v4();
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push((id, doc));
        Ok(InsertOneResult::new(id))
    }

    async fn find_many(&self, collection: Collection, filter: &FilterData) -> Result<Vec<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Document> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| FilterWhere::matches(&filter.where_clause, doc))
                    .map(|(id, doc)| with_id(doc.clone(), *id))
                    .collect()
            })
            .unwrap_or_default();

        if !filter.order.is_empty() {
            // sort_by is stable, so ties keep insertion order
            matched.sort_by(|a, b| FilterOrder::compare(&filter.order, a, b));
        }
        Ok(matched)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOp, SortDirection};
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_fresh_identity() {
        let store = MemoryStore::new();
        let result = store
            .insert_one(Collection::Jobs, doc(json!({"_id": "client-chosen", "title": "Rust Dev"})))
            .await
            .unwrap();
        assert!(result.acknowledged);

        let found = store.find_by_id(Collection::Jobs, result.inserted_id).await.unwrap().unwrap();
        assert_eq!(found["_id"], json!(result.inserted_id.to_string()));
        assert_eq!(found["title"], "Rust Dev");
    }

    #[tokio::test]
    async fn collections_are_separate() {
        let store = MemoryStore::new();
        let job = store.insert_one(Collection::Jobs, doc(json!({"title": "A"}))).await.unwrap();

        assert!(store.find_by_id(Collection::JobApplications, job.inserted_id).await.unwrap().is_none());
        assert_eq!(store.find_all(Collection::Jobs).await.unwrap().len(), 1);
        assert!(store.find_all(Collection::JobApplications).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_many_filters_and_sorts() {
        let store = MemoryStore::new();
        for (title, min) in [("Backend Engineer", 3000), ("Designer", 5000), ("ENGINEERING Lead", 4000)] {
            store
                .insert_one(Collection::Jobs, doc(json!({"title": title, "salaryRange": {"min": min, "max": min * 2}})))
                .await
                .unwrap();
        }

        let filter = FilterData::new()
            .where_op("title", FilterOp::Contains, "eng")
            .order_by("salaryRange.min", SortDirection::Desc);
        let titles: Vec<String> = store
            .find_many(Collection::Jobs, &filter)
            .await
            .unwrap()
            .iter()
            .map(|d| d["title"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(titles, vec!["ENGINEERING Lead", "Backend Engineer"]);
    }

    #[tokio::test]
    async fn unsorted_results_keep_insertion_order() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store.insert_one(Collection::Jobs, doc(json!({"n": n}))).await.unwrap();
        }
        let ns: Vec<i64> = store
            .find_all(Collection::Jobs)
            .await
            .unwrap()
            .iter()
            .map(|d| d["n"].as_i64().unwrap())
            .collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
    }
}
