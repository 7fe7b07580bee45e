use crate::{
    auth::Accounts,
    sesame::handlers::{detail, AuthResponse, ErrorResponse},
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserLogin {
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/auth/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Missing payload", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    accounts: Extension<Arc<Accounts>>,
    payload: Option<Json<UserLogin>>,
) -> impl IntoResponse {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => return detail(StatusCode::BAD_REQUEST, "Missing payload"),
    };

    debug!("login attempt for {}", user.email);

    match accounts.login(&user.email, &user.password).await {
        Ok(session) => (StatusCode::OK, Json(AuthResponse::from(session))).into_response(),
        Err(e) => e.into_response(),
    }
}
