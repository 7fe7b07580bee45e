use crate::{
    auth::{Accounts, Registration},
    sesame::handlers::{detail, AuthResponse, ErrorResponse},
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserRegister {
    name: String,
    surname: String,
    email: String,
    phone: String,
    password: String,
}

impl From<UserRegister> for Registration {
    fn from(user: UserRegister) -> Self {
        Self {
            name: user.name,
            surname: user.surname,
            email: user.email,
            phone: user.phone,
            password: user.password,
        }
    }
}

#[utoipa::path(
    post,
    path= "/auth/register",
    request_body = UserRegister,
    responses (
        (status = 201, description = "Registration successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Missing or invalid payload", body = ErrorResponse),
        (status = 409, description = "User with the specified email already exists", body = ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for register
#[instrument(skip_all)]
pub async fn register(
    accounts: Extension<Arc<Accounts>>,
    payload: Option<Json<UserRegister>>,
) -> impl IntoResponse {
    let registration: Registration = match payload {
        Some(Json(payload)) => payload.into(),
        None => return detail(StatusCode::BAD_REQUEST, "Missing payload"),
    };

    debug!("registration: {:?}", registration);

    match accounts.register(registration).await {
        Ok(session) => (StatusCode::CREATED, Json(AuthResponse::from(session))).into_response(),
        Err(e) => e.into_response(),
    }
}
