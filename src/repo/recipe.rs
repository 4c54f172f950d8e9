use crate::models::recipe::{Recipe, RecipeDraft, RecipeWithDetails};
use crate::models::types::RecipeId;
use crate::store::StoreResult;

#[async_trait::async_trait]
pub trait RecipeRepo: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<Recipe>>;

    async fn get_by_id(&self, recipe_id: RecipeId) -> StoreResult<Option<Recipe>>;

    /// Recipe with result item and ingredient items resolved
    async fn get_by_id_with_details(&self, recipe_id: RecipeId) -> StoreResult<Option<RecipeWithDetails>>;

    async fn get_all_with_details(&self) -> StoreResult<Vec<RecipeWithDetails>>;

    /// Stores a new recipe under a fresh id. Item references are not checked here.
    async fn create(&self, draft: RecipeDraft) -> StoreResult<Recipe>;

    async fn update(&self, recipe_id: RecipeId, draft: RecipeDraft) -> StoreResult<Option<Recipe>>;

    async fn delete(&self, recipe_id: RecipeId) -> StoreResult<bool>;
}
