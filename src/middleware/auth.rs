use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, AuthError};
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// Authenticated caller, injected into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// API key middleware that resolves the caller and injects `AuthUser`.
///
/// Runs before the handler's body extractor, so an unauthenticated request
/// is rejected with 401 whatever its body looks like.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not valid UTF-8 cannot start with the Bearer marker
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
        None => None,
    };

    let user = auth::authenticate(state.provider.as_ref(), header).await?;
    request.extensions_mut().insert(AuthUser(user));

    Ok(next.run(request).await)
}
