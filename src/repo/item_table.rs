use crate::models::item::{Item, ItemDraft};
use crate::models::types::ItemId;
use crate::repo::ITEMS_SHEET;
use crate::repo::item::ItemRepo;
use crate::repo::source::Source;
use crate::repo::table::TableRepository;
use crate::sheets::RemoteSheetFetcher;
use crate::store::{StoreResult, TabularStore};
use std::collections::HashSet;
use std::sync::Arc;

pub struct ItemRepository {
    table: TableRepository<Item>,
}

impl ItemRepository {
    /// Resolves the item source (remote sheet, then local store, then empty) and loads it.
    pub async fn load(fetcher: Option<&RemoteSheetFetcher>, store: Arc<dyn TabularStore>) -> StoreResult<Self> {
        let table = TableRepository::load(ITEMS_SHEET, fetcher, store).await?;
        Ok(Self { table })
    }

    pub fn source(&self) -> Source {
        self.table.source()
    }
}

#[async_trait::async_trait]
impl ItemRepo for ItemRepository {
    async fn get_all(&self) -> StoreResult<Vec<Item>> {
        Ok(self.table.all())
    }

    async fn get_by_id(&self, item_id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.table.get(item_id))
    }

    async fn get_by_ids(&self, item_ids: &[ItemId]) -> StoreResult<Vec<Item>> {
        let wanted: HashSet<ItemId> = item_ids.iter().copied().collect();
        Ok(self.table.filter(|item| wanted.contains(&item.id)))
    }

    async fn create(&self, draft: ItemDraft) -> StoreResult<Item> {
        self.table.insert_with(ItemId::new, |id| Item::from_draft(id, draft)).await
    }

    async fn update(&self, item_id: ItemId, draft: ItemDraft) -> StoreResult<Option<Item>> {
        self.table.replace(Item::from_draft(item_id, draft)).await
    }

    async fn delete(&self, item_id: ItemId) -> StoreResult<bool> {
        self.table.remove(item_id).await
    }
}
