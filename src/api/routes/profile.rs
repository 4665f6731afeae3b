//! Profile Route
//!
//! - GET /api/v1/profile - Identity resolved from the bearer token

use axum::{Extension, Json};

use crate::api::dto::ProfileResponse;
use crate::api::middleware::AuthUser;

/// GET /api/v1/profile
pub async fn get_profile(Extension(AuthUser(user_id)): Extension<AuthUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse { user_id })
}
