//! Cafe page flows: show, price update and delete.

#![allow(clippy::unwrap_used)]

use cafe_map_core::CafeId;
use cafe_map_integration_tests::{TEST_KEY, TestApp, location, sample_cafe};
use cafe_map_web::db::CafeRepository;
use reqwest::StatusCode;

#[tokio::test]
async fn test_show_cafe() {
    let app = TestApp::spawn_default().await;
    let mut new_cafe = sample_cafe("Monmouth", "Borough", 51.5055, -0.0913);
    new_cafe.amenities.has_toilet = true;
    let cafe = app.insert(&new_cafe).await;

    let (status, body) = app.get_text(&format!("/cafe/{}", cafe.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Monmouth"));
    assert!(body.contains("Borough"));
    assert!(body.contains("/static/img/wc.svg"));
    assert!(!body.contains("/static/img/wifi.svg"));
}

#[tokio::test]
async fn test_unknown_cafe_redirects_to_search() {
    let app = TestApp::spawn_default().await;
    app.insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    for path in ["/cafe/999", "/cafe/abc"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/search");

        let (_, body) = app.get_text("/search").await;
        assert!(body.contains("Your cafe does not exist"));
    }
}

#[tokio::test]
async fn test_update_price() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;
    let path = format!("/update-price/{}", cafe.id);

    let (status, body) = app.get_text(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("New coffee price"));
    assert!(body.contains("£2.50"));

    let body = app
        .client
        .post(app.url(&path))
        .form(&[("coffee_price", "£3.10")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("£3.10"));
    assert!(!body.contains("New coffee price"));

    let stored = CafeRepository::new(&app.pool)
        .get_by_id(cafe.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.coffee_price.as_deref(), Some("£3.10"));
}

#[tokio::test]
async fn test_update_price_requires_value() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let body = app
        .client
        .post(app.url(&format!("/update-price/{}", cafe.id)))
        .form(&[("coffee_price", "")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("This field is required."));
}

#[tokio::test]
async fn test_update_price_unknown_cafe() {
    let app = TestApp::spawn_default().await;

    let response = app
        .client
        .post(app.url("/update-price/42"))
        .form(&[("coffee_price", "£3.10")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search");
}

#[tokio::test]
async fn test_delete_with_wrong_key_keeps_cafe() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let response = app
        .client
        .post(app.url(&format!("/delete/{}", cafe.id)))
        .form(&[("delete_key", "battery staple")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("Your key is not correct."));
    assert!(body.contains("Confirm deletion"));
    assert_eq!(app.count().await, 1);
}

#[tokio::test]
async fn test_delete_with_correct_key() {
    let app = TestApp::spawn_default().await;
    let keep = app
        .insert(&sample_cafe("Prufrock", "Clerkenwell", 51.5196, -0.1095))
        .await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let response = app
        .client
        .post(app.url(&format!("/delete/{}", cafe.id)))
        .form(&[("delete_key", TEST_KEY)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search");
    assert_eq!(app.count().await, 1);

    let repo = CafeRepository::new(&app.pool);
    assert!(repo.get_by_id(cafe.id).await.unwrap().is_none());
    assert!(repo.get_by_id(keep.id).await.unwrap().is_some());

    let (_, body) = app.get_text("/search").await;
    assert!(body.contains("Successfully deleted."));
}

#[tokio::test]
async fn test_delete_unknown_cafe_redirects() {
    let app = TestApp::spawn_default().await;

    let id = CafeId::new(7);
    let response = app
        .client
        .get(app.url(&format!("/delete/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search");
}
