//! CRUD integration tests.
//!
//! Tests verify:
//! - Create mints unique ids and defaults `inStock`
//! - Get, update and delete semantics, including 404s
//! - List ordering and `category` / `inStock` filters

use std::collections::HashSet;

use axum::http::StatusCode;
use serde_json::json;

use product_api::AuthPolicy;

use super::test_utils::{create_product, empty_router, listed_count, seeded_router, TestRequest};

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_201_with_product() {
    let (router, store) = empty_router(AuthPolicy::None);

    let (status, json) = TestRequest::post("/products")
        .json(json!({"name": "Desk", "price": 250}))
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Product created successfully");

    let product = &json["product"];
    assert!(!product["id"].as_str().unwrap().is_empty());
    assert_eq!(product["name"], "Desk");
    assert_eq!(product["price"].as_f64(), Some(250.0));
    assert_eq!(product["inStock"], true);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let (router, _) = empty_router(AuthPolicy::None);

    let mut ids = HashSet::new();
    for i in 0..20 {
        let id = create_product(&router, json!({"name": format!("Item {i}"), "price": 1})).await;
        assert!(ids.insert(id), "duplicate id minted");
    }
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let (router, _) = empty_router(AuthPolicy::None);

    let id = create_product(&router, json!({"id": "chosen", "name": "Desk", "price": 1})).await;
    assert_ne!(id, "chosen");

    let (status, _) = TestRequest::get("/products/chosen").send(&router).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Get
// =============================================================================

#[tokio::test]
async fn test_get_after_create_returns_same_fields() {
    let (router, _) = empty_router(AuthPolicy::None);

    let id = create_product(
        &router,
        json!({
            "name": "Kettle",
            "description": "1.7L stainless steel",
            "price": 39.99,
            "category": "Kitchen",
        }),
    )
    .await;

    let (status, json) = TestRequest::get(&format!("/products/{id}"))
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["name"], "Kettle");
    assert_eq!(json["description"], "1.7L stainless steel");
    assert_eq!(json["price"].as_f64(), Some(39.99));
    assert_eq!(json["category"], "Kitchen");
    assert_eq!(json["inStock"], true);
}

#[tokio::test]
async fn test_get_keeps_explicit_out_of_stock() {
    let (router, _) = empty_router(AuthPolicy::None);

    let id = create_product(&router, json!({"name": "Lamp", "price": 20, "inStock": false})).await;

    let (_, json) = TestRequest::get(&format!("/products/{id}"))
        .send(&router)
        .await;
    assert_eq!(json["inStock"], false);
}

#[tokio::test]
async fn test_get_unknown_id_is_404() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::get("/products/does-not-exist")
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Product not found");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("does-not-exist"));
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (_, before) = TestRequest::get("/products/1").send(&router).await;

    let (status, json) = TestRequest::put("/products/1")
        .json(json!({"price": 999}))
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product updated successfully");

    let (_, after) = TestRequest::get("/products/1").send(&router).await;
    assert_eq!(after["price"].as_f64(), Some(999.0));
    for field in ["id", "name", "description", "category", "inStock"] {
        assert_eq!(after[field], before[field], "{field} should be unchanged");
    }
    assert_eq!(json["product"], after);
}

#[tokio::test]
async fn test_update_never_changes_id() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::put("/products/2")
        .json(json!({"id": "hijacked", "name": "Phone"}))
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["product"]["id"], "2");
    assert_eq!(json["product"]["name"], "Phone");

    let (status, _) = TestRequest::get("/products/hijacked").send(&router).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_false_overwrites() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::put("/products/1")
        .json(json!({"inStock": false}))
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["product"]["inStock"], false);
}

#[tokio::test]
async fn test_update_with_empty_body_object_is_noop() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (_, before) = TestRequest::get("/products/3").send(&router).await;
    let (status, json) = TestRequest::put("/products/3")
        .json(json!({}))
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["product"], before);
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::put("/products/nope")
        .json(json!({"price": 5}))
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["message"].as_str().unwrap().contains("nope"));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let (router, store) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::delete("/products/2").send(&router).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product deleted successfully");
    assert_eq!(json["product"]["name"], "Smartphone");

    let (status, _) = TestRequest::get("/products/2").send(&router).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_delete_unknown_id_is_404() {
    let (router, store) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::delete("/products/404").send(&router).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Product not found");
    assert_eq!(store.len().await, 3);
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_empty_store() {
    let (router, _) = empty_router(AuthPolicy::None);

    let (status, json) = TestRequest::get("/products").send(&router).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
    assert_eq!(json["products"], json!([]));
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let (router, _) = empty_router(AuthPolicy::None);

    let mut ids = Vec::new();
    for name in ["Zebra", "Apple", "Mango"] {
        ids.push(create_product(&router, json!({"name": name, "price": 1})).await);
    }

    let (_, json) = TestRequest::get("/products").send(&router).await;
    let listed: Vec<_> = json["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(listed, ids);
    assert_eq!(listed_count(&router).await, 3);
}

#[tokio::test]
async fn test_list_category_filter_is_case_insensitive() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::get("/products?category=Electronics")
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    for product in json["products"].as_array().unwrap() {
        assert_eq!(
            product["category"].as_str().unwrap().to_lowercase(),
            "electronics"
        );
    }
}

#[tokio::test]
async fn test_list_unmatched_category_is_empty() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::get("/products?category=Nonexistent")
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
    assert_eq!(json["products"], json!([]));
}

#[tokio::test]
async fn test_list_in_stock_filter() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (_, json) = TestRequest::get("/products?inStock=true").send(&router).await;
    assert_eq!(json["count"], 2);

    let (_, json) = TestRequest::get("/products?inStock=false").send(&router).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["products"][0]["name"], "Coffee Maker");
}

#[tokio::test]
async fn test_list_combined_filters() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (_, json) = TestRequest::get("/products?category=KITCHEN&inStock=true")
        .send(&router)
        .await;
    assert_eq!(json["count"], 0);

    let (_, json) = TestRequest::get("/products?category=electronics&inStock=true")
        .send(&router)
        .await;
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn test_list_empty_category_means_no_filter() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::get("/products?category=").send(&router).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
}

#[tokio::test]
async fn test_list_repeated_keys_keep_first_value() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::get("/products?category=kitchen&category=electronics")
        .send(&router)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["products"][0]["name"], "Coffee Maker");

    let (status, json) = TestRequest::get("/products?inStock=true&inStock=false")
        .send(&router)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn test_list_unmatched_repeated_category_is_empty() {
    let (router, _) = seeded_router(AuthPolicy::None);

    let (status, json) = TestRequest::get("/products?category=a&category=b")
        .send(&router)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
    assert_eq!(json["products"], json!([]));
}
