use crate::models::item::{Item, ItemDraft};
use crate::models::types::ItemId;
use crate::store::StoreResult;

#[async_trait::async_trait]
pub trait ItemRepo: Send + Sync {
    /// All items, in table order
    async fn get_all(&self) -> StoreResult<Vec<Item>>;

    async fn get_by_id(&self, item_id: ItemId) -> StoreResult<Option<Item>>;

    /// Items whose id is in `item_ids`. Unknown ids are skipped.
    async fn get_by_ids(&self, item_ids: &[ItemId]) -> StoreResult<Vec<Item>>;

    /// Stores a new item under a fresh id
    async fn create(&self, draft: ItemDraft) -> StoreResult<Item>;

    /// Replaces all fields of an existing item. `None` if the item does not exist.
    async fn update(&self, item_id: ItemId, draft: ItemDraft) -> StoreResult<Option<Item>>;

    /// Returns false if the item does not exist
    async fn delete(&self, item_id: ItemId) -> StoreResult<bool>;
}
