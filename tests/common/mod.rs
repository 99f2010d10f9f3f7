#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use dadz_api::config::AppConfig;
use dadz_api::models::NewJoke;
use dadz_api::provider::{InMemoryProvider, RandomSelector};
use dadz_api::{app, AppState};
use serde_json::Value;
use tower::ServiceExt;

pub const API_KEY: &str = "9e44bed1ab8845508297079d4a0117b4";

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<InMemoryProvider>,
}

impl TestApp {
    /// App over an in-memory store holding one user and `jokes` jokes by them
    pub async fn with_jokes(jokes: usize) -> Result<Self> {
        let provider = Arc::new(InMemoryProvider::with_selector(RandomSelector::seeded(2024)));
        let user = provider.add_user("The Joker", API_KEY).await?;

        let batch = (1..=jokes)
            .map(|i| NewJoke::new(format!("Joke {} intro", i), format!("Joke {} punchline", i)))
            .collect();
        dadz_api::provider::JokeProvider::save_new_jokes(provider.as_ref(), batch, user.id).await?;

        let state = AppState::new(provider.clone(), AppConfig::development());
        Ok(Self {
            router: app(state),
            provider,
        })
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder().method(Method::GET).uri(uri).body(Body::empty())?;
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, authorization: Option<&str>, body: impl Into<Body>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(body.into())?).await
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }
}

pub fn bearer(key: &str) -> String {
    format!("Bearer {}", key)
}
