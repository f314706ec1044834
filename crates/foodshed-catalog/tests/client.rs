//! Integration tests for the catalog client and enricher against a mock
//! HTTP server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use foodshed_catalog::{CatalogSource, Enricher, OpenFoodFactsClient};
use foodshed_core::types::{Category, InventoryItem};

fn client_for(server: &MockServer) -> OpenFoodFactsClient {
    OpenFoodFactsClient::with_base_urls(
        "foodshed-tests/0.1",
        2,
        2,
        &format!("{}/cgi/search.pl", server.uri()),
        &format!("{}/api/v0/product", server.uri()),
    )
    .expect("client should build against mock server")
}

fn item(id: &str, name: &str, brand: Option<&str>) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        site_id: "site-1".to_string(),
        name: name.to_string(),
        brand: brand.map(ToOwned::to_owned),
        category: Category::CannedGoods,
        quantity: 25,
        allergens: Vec::new(),
        dietary_tags: Vec::new(),
        barcode: None,
        image: None,
        expiry_date: None,
    }
}

fn search_body(products: serde_json::Value) -> serde_json::Value {
    json!({ "count": 1, "products": products })
}

#[tokio::test]
async fn search_enriches_item_with_catalog_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("search_terms", "StarKist Tuna"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(json!([{
            "code": "0011201",
            "product_name": "Chunk Light Tuna",
            "brands": "StarKist",
            "image_front_url": "https://images.example/tuna-front.jpg",
            "allergens_tags": ["en:fish"],
            "labels_tags": ["en:gluten-free"],
            "categories_tags": ["en:canned-fish"],
            "nutriments": { "proteins_100g": 24.0 }
        }]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/0011201.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "product": {
                "code": "0011201",
                "product_name": "Chunk Light Tuna",
                "brands": "StarKist",
                "image_front_url": "https://images.example/tuna-front.jpg",
                "allergens_tags": ["en:fish"],
                "labels_tags": ["en:gluten-free", "en:kosher"],
                "categories_tags": ["en:canned-fish"],
                "nutriments": { "proteins_100g": 24.0, "salt_100g": 0.9 }
            }
        })))
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 2);
    let enriched = enricher.enhance(item("inv-1", "Tuna", Some("StarKist"))).await;

    assert_eq!(
        enriched.item.image.as_deref(),
        Some("https://images.example/tuna-front.jpg")
    );
    assert_eq!(enriched.item.barcode.as_deref(), Some("0011201"));
    assert!(enriched.item.dietary_tags.contains(&"Gluten-Free".to_string()));
    assert!(enriched.item.dietary_tags.contains(&"Kosher".to_string()));

    let catalog = enriched.catalog.expect("catalog data should be attached");
    assert_eq!(catalog.source, CatalogSource::CatalogSearch);
    assert_eq!(catalog.allergens, vec!["fish"]);
    assert_eq!(catalog.nutritional_info["salt_100g"], json!(0.9));
}

#[tokio::test]
async fn repeated_enhance_hits_cache_not_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(json!([{
            "code": "555",
            "product_name": "Oats",
            "brands": "Quaker",
            "image_front_url": "https://images.example/oats.jpg"
        }]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/555.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "product": { "code": "555", "product_name": "Oats", "brands": "Quaker" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 2);
    let first = enricher.enhance(item("inv-2", "Oats", Some("Quaker"))).await;
    let second = enricher.enhance(item("inv-2", "Oats", Some("Quaker"))).await;

    assert_eq!(first.item.barcode, second.item.barcode);
    assert_eq!(enricher.cached_len(), 1);
}

#[tokio::test]
async fn branded_miss_retries_with_name_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("search_terms", "Heinz Lentil Soup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("search_terms", "Lentil Soup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(json!([{
            "code": "777",
            "product_name": "Lentil Soup",
            "image_front_url": "https://images.example/lentils.jpg"
        }]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/777.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "product": { "code": "777", "product_name": "Lentil Soup" }
        })))
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 2);
    let enriched = enricher
        .enhance(item("inv-3", "Lentil Soup", Some("Heinz")))
        .await;

    assert_eq!(
        enriched.item.image.as_deref(),
        Some("https://images.example/lentils.jpg")
    );
}

#[tokio::test]
async fn branded_failure_still_retries_with_name_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("search_terms", "Campbell's Tomato Soup"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("search_terms", "Tomato Soup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(json!([{
            "code": "888",
            "product_name": "Tomato Soup",
            "image_front_url": "https://images.example/tomato-soup.jpg"
        }]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/888.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "product": { "code": "888", "product_name": "Tomato Soup" }
        })))
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 2);
    let enriched = enricher
        .enhance(item("inv-7", "Tomato Soup", Some("Campbell's")))
        .await;

    assert_eq!(
        enriched.item.image.as_deref(),
        Some("https://images.example/tomato-soup.jpg")
    );
    assert_eq!(enriched.item.barcode.as_deref(), Some("888"));
}

#[tokio::test]
async fn catalog_failure_falls_back_to_static_image() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 2);
    let enriched = enricher
        .enhance(item("inv-4", "Whole Grain Pasta", Some("Barilla")))
        .await;

    let catalog = enriched.catalog.expect("static tier should attach data");
    assert_eq!(catalog.source, CatalogSource::StaticMapping);
    assert!(enriched
        .item
        .image
        .as_deref()
        .is_some_and(|url| url.starts_with("https://")));
}

#[tokio::test]
async fn catalog_failure_on_unknown_item_leaves_it_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 2);
    let original = item("inv-5", "Mystery Tins", None);
    let enriched = enricher.enhance(original.clone()).await;

    assert!(enriched.catalog.is_none());
    assert!(enriched.item.image.is_none());
    assert_eq!(enriched.item.name, original.name);
}

#[tokio::test]
async fn batch_preserves_input_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(json!([]))))
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 3);
    let items = vec![
        item("a", "Apples", None),
        item("b", "Bread", None),
        item("c", "Carrots", None),
    ];
    let enriched = enricher.enhance_batch(items).await;

    let ids: Vec<&str> = enriched.iter().map(|e| e.item.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn reset_clears_the_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(json!([]))))
        .mount(&server)
        .await;

    let enricher = Enricher::new(Arc::new(client_for(&server)), 2);
    enricher.enhance(item("inv-6", "Rice", None)).await;
    assert_eq!(enricher.cached_len(), 1);

    enricher.reset();
    assert_eq!(enricher.cached_len(), 0);
}
