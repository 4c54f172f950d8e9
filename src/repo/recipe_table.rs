use crate::models::recipe::{Recipe, RecipeDraft, RecipeWithDetails};
use crate::models::types::RecipeId;
use crate::repo::RECIPES_SHEET;
use crate::repo::item::ItemRepo;
use crate::repo::recipe::RecipeRepo;
use crate::repo::source::Source;
use crate::repo::table::TableRepository;
use crate::sheets::RemoteSheetFetcher;
use crate::store::{StoreResult, TabularStore};
use std::sync::Arc;

pub struct RecipeRepository {
    table: TableRepository<Recipe>,
    items: Arc<dyn ItemRepo>,
}

impl RecipeRepository {
    pub async fn load(
        fetcher: Option<&RemoteSheetFetcher>,
        store: Arc<dyn TabularStore>,
        items: Arc<dyn ItemRepo>,
    ) -> StoreResult<Self> {
        let table = TableRepository::load(RECIPES_SHEET, fetcher, store).await?;
        Ok(Self { table, items })
    }

    pub fn source(&self) -> Source {
        self.table.source()
    }

    async fn with_details(&self, recipe: Recipe) -> StoreResult<RecipeWithDetails> {
        let result_item = self.items.get_by_id(recipe.result_item_id).await?;

        let wanted = recipe.ingredient_ids();
        let required_item_details = self.items.get_by_ids(&wanted).await?;

        let unresolved_item_ids: Vec<_> = wanted
            .into_iter()
            .filter(|id| !required_item_details.iter().any(|item| item.id == *id))
            .collect();
        if !unresolved_item_ids.is_empty() {
            tracing::warn!(recipe = %recipe.id, unresolved = unresolved_item_ids.len(), "recipe references unknown items");
        }

        Ok(RecipeWithDetails {
            recipe,
            result_item,
            required_item_details,
            unresolved_item_ids,
        })
    }
}

#[async_trait::async_trait]
impl RecipeRepo for RecipeRepository {
    async fn get_all(&self) -> StoreResult<Vec<Recipe>> {
        Ok(self.table.all())
    }

    async fn get_by_id(&self, recipe_id: RecipeId) -> StoreResult<Option<Recipe>> {
        Ok(self.table.get(recipe_id))
    }

    async fn get_by_id_with_details(&self, recipe_id: RecipeId) -> StoreResult<Option<RecipeWithDetails>> {
        let Some(recipe) = self.table.get(recipe_id) else {
            return Ok(None);
        };
        Ok(Some(self.with_details(recipe).await?))
    }

    async fn get_all_with_details(&self) -> StoreResult<Vec<RecipeWithDetails>> {
        let mut detailed = Vec::new();
        for recipe in self.table.all() {
            detailed.push(self.with_details(recipe).await?);
        }
        Ok(detailed)
    }

    async fn create(&self, draft: RecipeDraft) -> StoreResult<Recipe> {
        self.table.insert_with(RecipeId::new, |id| Recipe::from_draft(id, draft)).await
    }

    async fn update(&self, recipe_id: RecipeId, draft: RecipeDraft) -> StoreResult<Option<Recipe>> {
        self.table.replace(Recipe::from_draft(recipe_id, draft)).await
    }

    async fn delete(&self, recipe_id: RecipeId) -> StoreResult<bool> {
        self.table.remove(recipe_id).await
    }
}
