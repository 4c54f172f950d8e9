use crate::error::{AppResult, DomainError};
use crate::models::recipe::{Recipe, RecipeDraft, RecipeWithDetails};
use crate::models::types::RecipeId;
use crate::repo::{ItemRepo, RecipeRepo};
use std::sync::Arc;

pub struct RecipeService {
    repo: Arc<dyn RecipeRepo>,
    items: Arc<dyn ItemRepo>,
}

impl RecipeService {
    pub fn new(repo: Arc<dyn RecipeRepo>, items: Arc<dyn ItemRepo>) -> Self {
        Self { repo, items }
    }

    pub async fn list(&self) -> AppResult<Vec<Recipe>> {
        Ok(self.repo.get_all().await?)
    }

    pub async fn list_detailed(&self) -> AppResult<Vec<RecipeWithDetails>> {
        Ok(self.repo.get_all_with_details().await?)
    }

    pub async fn get(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>> {
        Ok(self.repo.get_by_id(recipe_id).await?)
    }

    pub async fn get_detailed(&self, recipe_id: RecipeId) -> AppResult<Option<RecipeWithDetails>> {
        Ok(self.repo.get_by_id_with_details(recipe_id).await?)
    }

    /// Creates a recipe once every item it references exists
    pub async fn create(&self, draft: RecipeDraft) -> AppResult<Recipe> {
        self.check_references(&draft).await?;

        let recipe = self.repo.create(draft).await?;
        tracing::info!(recipe_id = %recipe.id, name = %recipe.name, "recipe created");
        Ok(recipe)
    }

    /// Replaces a recipe once every item it references exists. `None` if the recipe does not exist.
    pub async fn update(&self, recipe_id: RecipeId, draft: RecipeDraft) -> AppResult<Option<Recipe>> {
        self.check_references(&draft).await?;
        Ok(self.repo.update(recipe_id, draft).await?)
    }

    pub async fn delete(&self, recipe_id: RecipeId) -> AppResult<bool> {
        let deleted = self.repo.delete(recipe_id).await?;
        if deleted {
            tracing::info!(%recipe_id, "recipe deleted");
        }
        Ok(deleted)
    }

    async fn check_references(&self, draft: &RecipeDraft) -> AppResult<()> {
        if self.items.get_by_id(draft.result_item_id).await?.is_none() {
            return Err(DomainError::Validation {
                field: "result_item_id",
                message: "Result item not found".to_string(),
            });
        }

        for ingredient in &draft.ingredients {
            if self.items.get_by_id(ingredient.item_id).await?.is_none() {
                return Err(DomainError::Validation {
                    field: "ingredients",
                    message: format!("Required item {} not found", ingredient.item_id),
                });
            }
        }

        Ok(())
    }
}
