use crate::error::AppResult;
use crate::models::item::{Item, ItemDraft};
use crate::models::types::ItemId;
use crate::repo::ItemRepo;
use std::sync::Arc;

pub struct ItemService {
    repo: Arc<dyn ItemRepo>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> AppResult<Vec<Item>> {
        let items = self.repo.get_all().await?;
        Ok(items)
    }

    pub async fn get(&self, item_id: ItemId) -> AppResult<Option<Item>> {
        let item = self.repo.get_by_id(item_id).await?;
        Ok(item)
    }

    pub async fn create(&self, draft: ItemDraft) -> AppResult<Item> {
        let item = self.repo.create(draft).await?;
        tracing::info!(item_id = %item.id, name = %item.name, "item created");
        Ok(item)
    }

    pub async fn update(&self, item_id: ItemId, draft: ItemDraft) -> AppResult<Option<Item>> {
        let item = self.repo.update(item_id, draft).await?;
        Ok(item)
    }

    pub async fn delete(&self, item_id: ItemId) -> AppResult<bool> {
        let deleted = self.repo.delete(item_id).await?;
        if deleted {
            tracing::info!(%item_id, "item deleted");
        }
        Ok(deleted)
    }
}
