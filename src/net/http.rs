use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Registry;
use crate::error::{AppResult, DomainError, InfraError};
use crate::models::item::{Item, ItemDraft};
use crate::models::recipe::{Recipe, RecipeDraft, RecipeWithDetails};
use crate::models::types::{ItemId, RecipeId};

const ITEM_NOT_FOUND: &str = "Item not found";
const RECIPE_NOT_FOUND: &str = "Recipe not found";

/// Error half of every handler result. Renders as `{"detail": ...}` with a matching status.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            DomainError::NotFound(what) => (StatusCode::NOT_FOUND, what.clone()),
            DomainError::Validation { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn not_found(what: &str) -> ApiError {
    ApiError(DomainError::NotFound(what.to_string()))
}

/// An id that does not parse cannot name a stored row, so it is reported the same as an unknown one.
fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| not_found(what))
}

pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/detailed", get(list_recipes_detailed))
        .route("/recipes/{id}", get(get_recipe).put(update_recipe).delete(delete_recipe))
        .route("/recipes/{id}/detailed", get(get_recipe_detailed))
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

/// Run the HTTP server until ctrl-c
pub async fn serve(addr: SocketAddr, registry: Arc<Registry>) -> AppResult<()> {
    let app = router(registry);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(InfraError::from)?;
    tracing::info!(%addr, "HTTP API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InfraError::from)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!("shutdown requested");
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "message": "Game Backend API is running" }))
}

// Items

async fn list_items(State(registry): State<Arc<Registry>>) -> ApiResult<Vec<Item>> {
    Ok(Json(registry.services.item.list().await?))
}

async fn get_item(State(registry): State<Arc<Registry>>, Path(id): Path<String>) -> ApiResult<Item> {
    let id: ItemId = parse_id(&id, ITEM_NOT_FOUND)?;
    registry
        .services
        .item
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(ITEM_NOT_FOUND))
}

async fn create_item(State(registry): State<Arc<Registry>>, Json(draft): Json<ItemDraft>) -> ApiResult<Item> {
    Ok(Json(registry.services.item.create(draft).await?))
}

async fn update_item(
    State(registry): State<Arc<Registry>>,
    Path(id): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> ApiResult<Item> {
    let id: ItemId = parse_id(&id, ITEM_NOT_FOUND)?;
    registry
        .services
        .item
        .update(id, draft)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(ITEM_NOT_FOUND))
}

async fn delete_item(State(registry): State<Arc<Registry>>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let id: ItemId = parse_id(&id, ITEM_NOT_FOUND)?;
    if !registry.services.item.delete(id).await? {
        return Err(not_found(ITEM_NOT_FOUND));
    }
    Ok(Json(json!({ "message": "Item deleted successfully" })).into_response())
}

// Recipes

async fn list_recipes(State(registry): State<Arc<Registry>>) -> ApiResult<Vec<Recipe>> {
    Ok(Json(registry.services.recipe.list().await?))
}

async fn list_recipes_detailed(State(registry): State<Arc<Registry>>) -> ApiResult<Vec<RecipeWithDetails>> {
    Ok(Json(registry.services.recipe.list_detailed().await?))
}

async fn get_recipe(State(registry): State<Arc<Registry>>, Path(id): Path<String>) -> ApiResult<Recipe> {
    let id: RecipeId = parse_id(&id, RECIPE_NOT_FOUND)?;
    registry
        .services
        .recipe
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(RECIPE_NOT_FOUND))
}

async fn get_recipe_detailed(
    State(registry): State<Arc<Registry>>,
    Path(id): Path<String>,
) -> ApiResult<RecipeWithDetails> {
    let id: RecipeId = parse_id(&id, RECIPE_NOT_FOUND)?;
    registry
        .services
        .recipe
        .get_detailed(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(RECIPE_NOT_FOUND))
}

async fn create_recipe(State(registry): State<Arc<Registry>>, Json(draft): Json<RecipeDraft>) -> ApiResult<Recipe> {
    Ok(Json(registry.services.recipe.create(draft).await?))
}

async fn update_recipe(
    State(registry): State<Arc<Registry>>,
    Path(id): Path<String>,
    Json(draft): Json<RecipeDraft>,
) -> ApiResult<Recipe> {
    let id: RecipeId = parse_id(&id, RECIPE_NOT_FOUND)?;
    registry
        .services
        .recipe
        .update(id, draft)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(RECIPE_NOT_FOUND))
}

async fn delete_recipe(State(registry): State<Arc<Registry>>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let id: RecipeId = parse_id(&id, RECIPE_NOT_FOUND)?;
    if !registry.services.recipe.delete(id).await? {
        return Err(not_found(RECIPE_NOT_FOUND));
    }
    Ok(Json(json!({ "message": "Recipe deleted successfully" })).into_response())
}
