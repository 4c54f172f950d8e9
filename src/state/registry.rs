use crate::config::Config;
use crate::error::{AppResult, InfraError};
use crate::repo::{ItemRepo, ItemRepository, RecipeRepo, RecipeRepository};
use crate::services::{ItemService, RecipeService};
use crate::sheets::RemoteSheetFetcher;
use crate::store::{TabularStore, open_file};
use std::sync::Arc;

pub struct Repos {
    pub item: Arc<dyn ItemRepo>,
    pub recipe: Arc<dyn RecipeRepo>,
}

pub struct Services {
    pub item: Arc<ItemService>,
    pub recipe: Arc<RecipeService>,
}

/// Everything a request handler needs. Built once at startup and shared by reference.
pub struct Registry {
    pub repos: Arc<Repos>,
    pub services: Arc<Services>,
}

impl Registry {
    /// Resolves both data sources and wires repositories and services together. Items are loaded
    /// before recipes, since recipes resolve their detail views against the item repository.
    pub async fn bootstrap(config: &Config) -> AppResult<Self> {
        let fetcher = if config.sheets.enabled {
            let fetcher = RemoteSheetFetcher::google(&config.sheets.spreadsheet_id, config.sheets.timeout())
                .map_err(InfraError::from)?;
            Some(fetcher)
        } else {
            tracing::info!("remote sheets disabled, using local files only");
            None
        };

        let item_store = open_file(&config.items_file);
        let recipe_store = open_file(&config.recipes_file);

        Self::load(fetcher.as_ref(), item_store, recipe_store).await
    }

    /// Same as [`Registry::bootstrap`], with the fetcher and stores supplied by the caller.
    pub async fn load(
        fetcher: Option<&RemoteSheetFetcher>,
        item_store: Arc<dyn TabularStore>,
        recipe_store: Arc<dyn TabularStore>,
    ) -> AppResult<Self> {
        let items = ItemRepository::load(fetcher, item_store).await?;
        tracing::info!(source = %items.source(), "item repository ready");
        let items: Arc<dyn ItemRepo> = Arc::new(items);

        let recipes = RecipeRepository::load(fetcher, recipe_store, items.clone()).await?;
        tracing::info!(source = %recipes.source(), "recipe repository ready");
        let recipes: Arc<dyn RecipeRepo> = Arc::new(recipes);

        Ok(Self::new(items, recipes))
    }

    pub fn new(item: Arc<dyn ItemRepo>, recipe: Arc<dyn RecipeRepo>) -> Self {
        let repos = Arc::new(Repos { item, recipe });

        let services = Arc::new(Services {
            item: Arc::new(ItemService::new(repos.item.clone())),
            recipe: Arc::new(RecipeService::new(repos.recipe.clone(), repos.item.clone())),
        });

        Self { repos, services }
    }
}
