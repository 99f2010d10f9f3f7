use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Extension, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Joke, NewJoke};
use crate::provider::Page;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Kept as raw strings so parse failures get our own message
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /jokes?page=&limit= - Jokes ordered by id, one page at a time
pub async fn list_jokes(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Joke>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let pagination = &state.config.pagination;

    let page = int_from_query(query.page.as_deref(), "page", 1)?;
    let limit = int_from_query(query.limit.as_deref(), "limit", pagination.default_limit)?;

    let page = Page::new(page, limit.min(pagination.max_limit))?;
    let jokes = state.provider.retrieve_jokes(page).await?;
    Ok(Json(jokes))
}

/// GET /random-joke - One joke picked at random
pub async fn random_joke(State(state): State<AppState>) -> Result<Json<Joke>, ApiError> {
    let joke = state.provider.retrieve_random_joke().await?;
    Ok(Json(joke))
}

/// POST /jokes - Store a batch of jokes owned by the authenticated user
pub async fn create_jokes(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<Vec<Joke>>), ApiError> {
    let jokes: Vec<NewJoke> = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("could not parse request body: {}", e)))?;

    let saved = state.provider.save_new_jokes(jokes, user.id).await?;
    info!("user {} submitted {} jokes", user.id, saved.len());

    Ok((StatusCode::CREATED, Json(saved)))
}

fn int_from_query(value: Option<&str>, key: &str, default: i64) -> Result<i64, ApiError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e| {
            ApiError::bad_request(format!("could not interpret query param '{}': {}", key, e))
        }),
    }
}
