//! # Todo repository
//!
//! CRUD operations for [`TodoItem`]s stored in a single collection. The
//! repository never caches the database handle: every call asks the
//! [`ConnectionManager`] for it, so calls made while disconnected fail with
//! [`TodoError::NotConnected`].
//!
//! ## Identifiers
//!
//! Items inserted with id `0` get a generated identifier from a counter
//! document in the `counters` collection. The counter is first raised to the
//! highest id already stored, then incremented atomically, so generated ids
//! are one more than the current maximum on a fresh counter and are never
//! handed out twice.

use {
    crate::{
        db::ConnectionManager,
        errors::{Result, TodoError},
        models::TodoItem,
    },
    futures::TryStreamExt,
    mongodb::{Collection, bson::doc, options::ReturnDocument},
    serde::{Deserialize, Serialize},
    std::sync::Arc,
    tracing::{debug, warn},
};

pub const DEFAULT_COLLECTION: &str = "todos";
pub const COUNTERS_COLLECTION: &str = "counters";

#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    name: String,
    seq: i64,
}

/// Lowest value the id counter may hold given the highest stored item.
fn counter_floor(highest: Option<&TodoItem>) -> i64 {
    highest.map_or(0, |item| item.id.max(0))
}

#[derive(Clone)]
pub struct TodoRepository {
    manager: Arc<ConnectionManager>,
    collection_name: String,
}

impl TodoRepository {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self::with_collection(manager, DEFAULT_COLLECTION)
    }

    pub fn with_collection(
        manager: Arc<ConnectionManager>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            manager,
            collection_name: collection_name.into(),
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    async fn todos(&self) -> Result<Collection<TodoItem>> {
        Ok(self
            .manager
            .store()
            .await?
            .collection::<TodoItem>(&self.collection_name))
    }

    async fn next_id(&self, todos: &Collection<TodoItem>) -> Result<i64> {
        let counters = self
            .manager
            .store()
            .await?
            .collection::<Counter>(COUNTERS_COLLECTION);
        let filter = doc! { "_id": self.collection_name.as_str() };

        let highest = todos.find_one(doc! {}).sort(doc! { "id": -1 }).await?;
        let floor = counter_floor(highest.as_ref());

        counters
            .update_one(filter.clone(), doc! { "$max": { "seq": floor } })
            .upsert(true)
            .await?;

        let counter = counters
            .find_one_and_update(filter, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| TodoError::CounterUnavailable(self.collection_name.clone()))?;

        Ok(counter.seq)
    }

    /// Persists `item` and returns it with its final identifier.
    ///
    /// An id of `0` is replaced by a generated one. Any other id is kept,
    /// and must be positive and not already in use.
    pub async fn insert(&self, mut item: TodoItem) -> Result<TodoItem> {
        let todos = self.todos().await?;

        if item.is_unassigned() {
            item.id = self.next_id(&todos).await?;
        } else if item.id < 0 {
            return Err(TodoError::InvalidId(item.id));
        } else if todos.find_one(doc! { "id": item.id }).await?.is_some() {
            return Err(TodoError::DuplicateId(item.id));
        }

        todos.insert_one(&item).await?;
        debug!(id = item.id, collection = %self.collection_name, "Inserted todo");

        Ok(item)
    }

    pub async fn list_all(&self) -> Result<Vec<TodoItem>> {
        let todos = self.todos().await?;
        let items: Vec<TodoItem> = todos.find(doc! {}).await?.try_collect().await?;
        debug!(count = items.len(), collection = %self.collection_name, "Listed todos");

        Ok(items)
    }

    /// Looks up a single item. Absence is `Ok(None)`, not an error.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TodoItem>> {
        let item = self.todos().await?.find_one(doc! { "id": id }).await?;
        debug!(id, found = item.is_some(), "Looked up todo");

        Ok(item)
    }

    /// Replaces the stored item that has `item.id`. Never inserts.
    pub async fn update(&self, item: &TodoItem) -> Result<()> {
        let result = self
            .todos()
            .await?
            .replace_one(doc! { "id": item.id }, item)
            .await?;

        if result.matched_count == 0 {
            warn!(id = item.id, "Update matched no todo");
            return Err(TodoError::NotFound(item.id));
        }
        debug!(id = item.id, "Updated todo");

        Ok(())
    }

    /// Deletes the item with `id` and returns what was removed.
    pub async fn remove_by_id(&self, id: i64) -> Result<TodoItem> {
        match self
            .todos()
            .await?
            .find_one_and_delete(doc! { "id": id })
            .await?
        {
            Some(item) => {
                debug!(id, "Removed todo");
                Ok(item)
            }
            None => {
                warn!(id, "Remove matched no todo");
                Err(TodoError::NotFound(id))
            }
        }
    }
}
