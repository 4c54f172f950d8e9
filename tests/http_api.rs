use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use craftsheet::Registry;
use craftsheet::net::http::router;
use craftsheet::store::{MemoryStore, Table, TabularStore};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const ITEMS_CSV: &str = "\
id,name,description,type,rarity,price,stackable,max_stack,logo_prompt,logo_url
6f1c1f8e-3c59-4a51-9d43-6f3a9a6c2b10,Iron Ore,Raw ore,material,common,5,true,64,,
0b6f4d5e-8f8a-4d0e-a7de-2a3c2f0d9e21,Iron Sword,Sharp,weapon,rare,120,false,1,,
";

const ORE: &str = "6f1c1f8e-3c59-4a51-9d43-6f3a9a6c2b10";
const SWORD: &str = "0b6f4d5e-8f8a-4d0e-a7de-2a3c2f0d9e21";

struct TestApp {
    app: axum::Router,
    recipes: Arc<MemoryStore>,
}

async fn test_app() -> TestApp {
    let items = Arc::new(MemoryStore::seeded(Table::from_csv_str(ITEMS_CSV).unwrap()));
    let recipes = Arc::new(MemoryStore::new());

    let registry = Registry::load(None, items, recipes.clone())
        .await
        .unwrap();

    TestApp {
        app: router(Arc::new(registry)),
        recipes,
    }
}

async fn send(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn recipe_body(result_item_id: &str, ingredient: &str) -> Value {
    json!({
        "name": "Forge sword",
        "result_item_id": result_item_id,
        "result_quantity": 1,
        "ingredients": [{ "item_id": ingredient, "quantity": 3 }],
        "crafting_time": 30,
        "experience_gain": 15
    })
}

#[tokio::test]
async fn health_reports_running() {
    let t = test_app().await;
    let (status, body) = send(&t.app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "message": "Game Backend API is running" }));
}

#[tokio::test]
async fn item_lifecycle() {
    let t = test_app().await;

    let (status, created) = send(
        &t.app,
        Method::POST,
        "/items",
        Some(json!({
            "name": "Copper Ore",
            "description": "Soft metal",
            "type": "material",
            "rarity": "common",
            "price": 4,
            "stackable": true,
            "max_stack": 64
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["type"], "material");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, list) = send(&t.app, Method::GET, "/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 3);

    let (status, fetched) = send(&t.app, Method::GET, &format!("/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&t.app, Method::DELETE, &format!("/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Item deleted successfully" }));

    let (status, body) = send(&t.app, Method::GET, &format!("/items/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Item not found" }));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let t = test_app().await;
    let unknown = "11111111-2222-4333-8444-555555555555";

    let (status, _) = send(&t.app, Method::DELETE, &format!("/items/{unknown}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&t.app, Method::GET, "/recipes/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Recipe not found" }));

    let (status, _) = send(&t.app, Method::PUT, &format!("/recipes/{unknown}"), Some(recipe_body(SWORD, ORE))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipe_with_missing_result_item_is_rejected() {
    let t = test_app().await;
    let missing = "11111111-2222-4333-8444-555555555555";

    let (status, body) = send(&t.app, Method::POST, "/recipes", Some(recipe_body(missing, ORE))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Result item not found" }));

    let (status, body) = send(&t.app, Method::POST, "/recipes", Some(recipe_body(SWORD, missing))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], format!("Required item {missing} not found"));

    // Nothing was written
    assert!(t.recipes.read().unwrap().is_none());
    let (_, list) = send(&t.app, Method::GET, "/recipes", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn recipe_detail_views() {
    let t = test_app().await;

    let (status, recipe) = send(&t.app, Method::POST, "/recipes", Some(recipe_body(SWORD, ORE))).await;
    assert_eq!(status, StatusCode::OK);
    let id = recipe["id"].as_str().unwrap().to_string();
    assert_eq!(recipe["ingredients"], json!([{ "item_id": ORE, "quantity": 3 }]));

    let (status, detailed) = send(&t.app, Method::GET, &format!("/recipes/{id}/detailed"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detailed["name"], "Forge sword");
    assert_eq!(detailed["result_item"]["name"], "Iron Sword");
    assert_eq!(detailed["required_item_details"][0]["name"], "Iron Ore");
    assert_eq!(detailed["unresolved_item_ids"], json!([]));

    let (status, all) = send(&t.app, Method::GET, "/recipes/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, body) = send(&t.app, Method::DELETE, &format!("/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Recipe deleted successfully" }));
}

#[tokio::test]
async fn recipe_accepts_legacy_ingredient_lists() {
    let t = test_app().await;

    let (status, recipe) = send(
        &t.app,
        Method::POST,
        "/recipes",
        Some(json!({
            "name": "Forge sword",
            "result_item_id": SWORD,
            "result_quantity": 1,
            "required_items": ORE,
            "required_quantities": "3",
            "crafting_time": 30,
            "experience_gain": 15
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recipe["ingredients"], json!([{ "item_id": ORE, "quantity": 3 }]));

    let stored = t.recipes.read().unwrap().unwrap();
    let row = stored.rows().next().unwrap();
    assert_eq!(row.text("required_items"), ORE);
    assert_eq!(row.text("required_quantities"), "3");
}
