//! JSON API.

#![allow(clippy::unwrap_used)]

use cafe_map_integration_tests::{TEST_KEY, TestApp, sample_cafe};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn json_body(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_get_cafe() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let response = app
        .client
        .get(app.url(&format!("/api/cafe/{}", cafe.id)))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(cafe.id));
    assert_eq!(body["name"], "Monmouth");
    assert_eq!(body["coffee_price"], "£2.50");
    assert_eq!(body["has_wifi"], false);
    assert_eq!(body["lng"], -0.0913);
    assert!(body.get("lon").is_none());
}

#[tokio::test]
async fn test_get_unknown_cafe() {
    let app = TestApp::spawn_default().await;

    for path in ["/api/cafe/5", "/api/cafe/five"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"error": {"Not Found": "Sorry, a cafe with that id is not in the database."}})
        );
    }
}

#[tokio::test]
async fn test_all_cafes() {
    let app = TestApp::spawn_default().await;
    app.insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;
    app.insert(&sample_cafe("Prufrock", "Clerkenwell", 51.5196, -0.1095))
        .await;

    let response = app.client.get(app.url("/api/all")).send().await.unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|cafe| cafe["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Monmouth", "Prufrock"]);
}

#[tokio::test]
async fn test_search_matches_location_exactly() {
    let app = TestApp::spawn_default().await;
    app.insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;
    app.insert(&sample_cafe("Borough Bites", "Borough Market", 51.505, -0.091))
        .await;

    let response = app
        .client
        .get(app.url("/api/search"))
        .query(&[("loc", "Borough")])
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    let cafes = body.as_array().unwrap();
    assert_eq!(cafes.len(), 1);
    assert_eq!(cafes[0]["name"], "Monmouth");
}

#[tokio::test]
async fn test_search_nowhere() {
    let app = TestApp::spawn_default().await;
    app.insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let response = app
        .client
        .get(app.url("/api/search?loc=Nowhere"))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"error": {"Not Found": "Sorry, we do not have anything in your location"}})
    );
}

#[tokio::test]
async fn test_add_cafe() {
    let app = TestApp::spawn_default().await;

    let response = app
        .client
        .post(app.url("/api/add"))
        .query(&[
            ("name", "Bean"),
            ("map_url", "https://maps.example/bean"),
            ("img_url", "https://img.example/bean.jpg"),
            ("location", "Soho"),
            ("seats", "20-30"),
            ("has_wifi", "1"),
            ("has_toilet", "false"),
            ("lat", "51.51"),
            ("lon", "-0.13"),
        ])
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"response": {"success": "Successfully added the new cafe."}})
    );

    let response = app.client.get(app.url("/api/all")).send().await.unwrap();
    let (_, body) = json_body(response).await;
    assert_eq!(body[0]["has_wifi"], true);
    assert_eq!(body[0]["has_toilet"], false);
    assert_eq!(body[0]["coffee_price"], Value::Null);
}

#[tokio::test]
async fn test_add_cafe_bad_request() {
    let app = TestApp::spawn_default().await;

    let response = app
        .client
        .post(app.url("/api/add"))
        .query(&[("name", "Bean"), ("lat", "north"), ("lon", "-0.13")])
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": {"Bad Request": "Some or all fields were incorrect or missing."}})
    );
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_update_price() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let response = app
        .client
        .patch(app.url(&format!("/api/update-price/{}", cafe.id)))
        .query(&[("coffee_price", "£2.80")])
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": "Successfully update the price."}));

    let response = app
        .client
        .get(app.url(&format!("/api/cafe/{}", cafe.id)))
        .send()
        .await
        .unwrap();
    let (_, body) = json_body(response).await;
    assert_eq!(body["coffee_price"], "£2.80");
}

#[tokio::test]
async fn test_update_price_errors() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let response = app
        .client
        .patch(app.url("/api/update-price/999?coffee_price=1"))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": {"Not found": "Sorry, a cafe with that id is not in the database."}})
    );

    let response = app
        .client
        .patch(app.url(&format!("/api/update-price/{}", cafe.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_checks_key_first() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;
    let not_authorized =
        json!({"error": {"Not authorized": "Sorry, you are not allowed to permit this operation."}});

    for path in [
        format!("/api/delete/{}", cafe.id),
        format!("/api/delete/{}?api_key=wrong", cafe.id),
        "/api/delete/999?api_key=wrong".to_string(),
    ] {
        let response = app.client.delete(app.url(&path)).send().await.unwrap();
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(body, not_authorized, "{path}");
    }
    assert_eq!(app.count().await, 1);
}

#[tokio::test]
async fn test_delete_cafe() {
    let app = TestApp::spawn_default().await;
    let cafe = app
        .insert(&sample_cafe("Monmouth", "Borough", 51.5055, -0.0913))
        .await;

    let response = app
        .client
        .delete(app.url("/api/delete/999"))
        .query(&[("api_key", TEST_KEY)])
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({"error": {"Not found": "Sorry, a cafe with that id is not in the database."}})
    );

    let response = app
        .client
        .delete(app.url(&format!("/api/delete/{}", cafe.id)))
        .query(&[("api_key", TEST_KEY)])
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": "Successfully deleted."}));
    assert_eq!(app.count().await, 0);
}
