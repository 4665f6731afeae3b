//! Request Middleware
//!
//! Identity resolution runs as a route layer in front of every
//! owner-scoped handler. Handlers read the resolved user from the
//! request extensions via `Extension<AuthUser>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::auth::{bearer_token, AuthError};
use crate::diary::UserId;

/// Authenticated caller, inserted by [`require_user`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

/// Reject requests without a valid bearer token
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::MissingCredential)?;
    let user_id = state.identity.resolve(token)?;

    tracing::debug!(user_id, path = %request.uri().path(), "Authenticated request");

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}
