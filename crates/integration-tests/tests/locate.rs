//! Locate page flows.

#![allow(clippy::unwrap_used)]

use cafe_map_integration_tests::{StubPlaces, TestApp, location, place};
use cafe_map_web::geocode::types::Geometry;
use reqwest::StatusCode;

#[tokio::test]
async fn test_locate_page_has_empty_map() {
    let app = TestApp::spawn_default().await;

    let (status, body) = app.get_text("/locate").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Add a new cafe"));
    assert!(body.contains("empty_map"));
}

#[tokio::test]
async fn test_candidates_are_shown_on_map() {
    let app = TestApp::spawn(StubPlaces::Results(vec![
        place("Flat White", "ChIJflat", 51.5136, -0.1357),
        place("Kaffeine", "ChIJkaff", 51.5183, -0.1371),
    ]))
    .await;

    let response = app
        .client
        .post(app.url("/locate"))
        .form(&[("text_input", "Flat White Soho")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("Confirm cafe"));
    assert!(body.contains("located_points_map"));
    assert!(body.contains("Choose this cafe"));
    assert!(body.contains("ChIJflat"));
    assert!(body.contains("ChIJkaff"));
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let app = TestApp::spawn_default().await;

    let body = app
        .client
        .post(app.url("/locate"))
        .form(&[("text_input", "  ")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("This field is required."));
}

#[tokio::test]
async fn test_provider_failure_redirects_to_manual_entry() {
    let app = TestApp::spawn(StubPlaces::Unavailable).await;

    let response = app
        .client
        .post(app.url("/locate"))
        .form(&[("text_input", "Flat White")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/add");

    let (_, body) = app.get_text("/add").await;
    assert!(body.contains("please insert your data manually"));
}

#[tokio::test]
async fn test_incomplete_candidate_aborts_request() {
    let mut incomplete = place("No Position", "ChIJnopos", 0.0, 0.0);
    incomplete.geometry = Some(Geometry {
        location: None,
        viewport: None,
    });
    let app = TestApp::spawn(StubPlaces::Results(vec![
        place("Fine", "ChIJfine", 51.5, -0.1),
        incomplete,
    ]))
    .await;

    let response = app
        .client
        .post(app.url("/locate"))
        .form(&[("text_input", "somewhere")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/add");
}
