pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod user_me;
pub use self::user_me::me;

// common types for the handlers
use crate::{
    auth::{AuthSession, Error},
    store::UserProfile,
};
use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

/// Body returned by register and login.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    status: String,
    token: String,
    /// Unix seconds
    expires_at: i64,
    user: UserProfile,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            status: "success".to_string(),
            token: session.token.as_str().to_string(),
            expires_at: session.token.expires_at(),
            user: session.user,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    detail: String,
}

pub(crate) fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

impl IntoResponse for Error {
    /// Client-caused failures get a generic message; everything else is logged
    /// and answered with a bare `500`.
    fn into_response(self) -> Response {
        if !self.is_client_error() {
            error!("Request failed: {self:?}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }

        match self {
            Self::DuplicateUser => detail(StatusCode::CONFLICT, "User already exists"),
            Self::InvalidCredentials => {
                detail(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            Self::InvalidSignature | Self::Expired | Self::MalformedToken(_) => {
                let mut response = detail(StatusCode::UNAUTHORIZED, "Unauthorized");
                response
                    .headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            Self::InvalidInput(message) => detail(StatusCode::BAD_REQUEST, message),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

// axum handler for /
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": concat!(env!("CARGO_PKG_NAME"), " is up") }))
}

#[utoipa::path(
    get,
    path= "/auth/ping",
    responses (
        (status = 200, description = "Auth routes are mounted"),
    ),
    tag= "auth"
)]
// axum handler for /auth/ping
pub async fn ping() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
