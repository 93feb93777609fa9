use std::sync::Arc;

use models::item::{Item, ItemFields};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::json_array_store::JsonArrayStore;

/// Compute the id for a newly created item. Defined purely from the last
/// element, not max-over-all or a running counter: after deleting the tail,
/// the next create reissues `last.id + 1` even if a higher id once existed.
/// Observable behavior, kept deliberately.
fn next_id(items: &[Item]) -> u64 {
    items.last().map(|item| item.id + 1).unwrap_or(1)
}

/// File-backed store for catalog items.
///
/// Id assignment, merge-update, and delete each run their lookup and
/// mutation under the store's single write lock, and the file rewrite
/// happens before the lock is released.
#[derive(Clone)]
pub struct ItemStore {
    store: Arc<JsonArrayStore<Item>>,
}

impl ItemStore {
    /// Initialize the store from the given file path. A missing or
    /// unreadable file starts the collection empty.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonArrayStore::<Item>::new(path).await;
        Arc::new(Self { store })
    }

    /// All items in insertion order.
    pub async fn list(&self) -> Vec<Item> {
        self.store.list().await
    }

    /// Assign an id, append, persist. Returns the created item.
    pub async fn create(&self, fields: ItemFields) -> Result<Item, ServiceError> {
        let created = self
            .store
            .update(move |items| {
                let item = Item::from_fields(next_id(items), fields);
                items.push(item.clone());
                Ok(item)
            })
            .await?;
        info!(id = created.id, "item created");
        Ok(created)
    }

    /// Shallow-merge `patch` onto the item with `id`, persist, and return
    /// the merged record.
    pub async fn update(&self, id: u64, patch: ItemFields) -> Result<Item, ServiceError> {
        let updated = self
            .store
            .update(move |items| {
                let item = items
                    .iter_mut()
                    .find(|item| item.id == id)
                    .ok_or_else(|| ServiceError::not_found("item"))?;
                item.merge(patch);
                Ok(item.clone())
            })
            .await?;
        info!(id, "item updated");
        Ok(updated)
    }

    /// Remove the item with `id` and persist.
    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.store
            .update(move |items| {
                let index = items
                    .iter()
                    .position(|item| item.id == id)
                    .ok_or_else(|| ServiceError::not_found("item"))?;
                items.remove(index);
                Ok(())
            })
            .await?;
        info!(id, "item deleted");
        Ok(())
    }
}
