use crate::{
    auth::{Accounts, Error},
    sesame::handlers::ErrorResponse,
    store::UserProfile,
};
use axum::{
    extract::Extension,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    status: String,
    user: UserProfile,
}

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

#[utoipa::path(
    get,
    path= "/auth/me",
    responses (
        (status = 200, description = "Profile of the token subject", body = MeResponse, content_type = "application/json"),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for me
#[instrument(skip_all)]
pub async fn me(accounts: Extension<Arc<Accounts>>, headers: HeaderMap) -> impl IntoResponse {
    let Some(token) = bearer_token(&headers) else {
        return Error::MalformedToken("missing bearer token").into_response();
    };

    match accounts.authenticate(token).await {
        Ok(user) => (
            StatusCode::OK,
            Json(MeResponse {
                status: "success".to_string(),
                user,
            }),
        )
            .into_response(),
        // A valid token whose user is gone is still just unauthorized.
        Err(Error::InvalidCredentials) => Error::InvalidSignature.into_response(),
        Err(e) => e.into_response(),
    }
}
