mod common;

use std::collections::HashSet;

use anyhow::Result;
use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn lists_first_page_with_default_limit() -> Result<()> {
    let app = TestApp::with_jokes(25).await?;

    let (status, body) = app.get("/jokes").await?;
    assert_eq!(status, StatusCode::OK);

    let jokes = body.as_array().expect("array body");
    assert_eq!(jokes.len(), 20);
    assert_eq!(jokes[0]["id"], 1);
    assert_eq!(jokes[0]["user"]["name"], "The Joker");
    Ok(())
}

#[tokio::test]
async fn pages_do_not_overlap_and_ascend() -> Result<()> {
    let app = TestApp::with_jokes(25).await?;

    let (_, first) = app.get("/jokes?page=1&limit=10").await?;
    let (_, second) = app.get("/jokes?page=2&limit=10").await?;
    let (_, third) = app.get("/jokes?page=3&limit=10").await?;

    let ids: Vec<i64> = [first, second.clone(), third.clone()]
        .iter()
        .flat_map(|page| page.as_array().cloned().unwrap_or_default())
        .map(|joke| joke["id"].as_i64().unwrap_or_default())
        .collect();

    assert_eq!(second.as_array().map(Vec::len), Some(10));
    assert_eq!(third.as_array().map(Vec::len), Some(5));
    assert_eq!(ids, (1..=25).collect::<Vec<i64>>());
    Ok(())
}

#[tokio::test]
async fn never_serializes_secrets() -> Result<()> {
    let app = TestApp::with_jokes(3).await?;

    let (_, body) = app.get("/jokes").await?;
    let text = body.to_string();

    assert!(!text.contains(common::API_KEY));
    assert!(!text.contains("api_key"));
    assert!(!text.contains("apiKey"));
    assert!(!text.contains("user_id"));
    assert!(!text.contains("userId"));
    Ok(())
}

#[tokio::test]
async fn limit_is_clamped_to_configured_maximum() -> Result<()> {
    let app = TestApp::with_jokes(120).await?;

    let (status, body) = app.get("/jokes?limit=500").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(100));
    Ok(())
}

#[tokio::test]
async fn rejects_unparseable_query_values() -> Result<()> {
    let app = TestApp::with_jokes(3).await?;

    let (status, body) = app.get("/jokes?page=abc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.starts_with("could not interpret query param 'page'"), "{}", message);
    Ok(())
}

#[tokio::test]
async fn rejects_non_positive_page_and_limit() -> Result<()> {
    let app = TestApp::with_jokes(3).await?;

    for uri in ["/jokes?page=0", "/jokes?page=-1", "/jokes?limit=0", "/jokes?page=1&limit=-3"] {
        let (status, body) = app.get(uri).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
    Ok(())
}

#[tokio::test]
async fn random_joke_returns_existing_jokes_only() -> Result<()> {
    let app = TestApp::with_jokes(10).await?;
    for id in [2, 3, 7] {
        app.provider.remove_joke(id).await;
    }

    let mut seen = HashSet::new();
    for _ in 0..50 {
        let (status, body) = app.get("/random-joke").await?;
        assert_eq!(status, StatusCode::OK);

        let id = body["id"].as_i64().unwrap_or_default();
        assert!(![2, 3, 7].contains(&id), "returned removed joke {}", id);
        assert!((1..=10).contains(&id));
        assert!(body["intro"].is_string());
        assert!(body["punchline"].is_string());
        seen.insert(id);
    }
    assert!(seen.len() > 1, "expected varied ids, got {:?}", seen);
    Ok(())
}

#[tokio::test]
async fn random_joke_on_empty_store_is_an_error() -> Result<()> {
    let app = TestApp::with_jokes(0).await?;

    let (status, body) = app.get("/random-joke").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "no jokes available");
    Ok(())
}
