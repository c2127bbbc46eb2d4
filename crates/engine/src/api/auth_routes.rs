//! Auth API routes.

use axum::{
    extract::State,
    http::{header, request::Parts, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::app::App;
use crate::use_cases::auth::{LoginRequest, RegisterRequest};

use super::dto::UserDto;
use super::http::{clear_session_cookie, session_cookie, session_token, ApiError, AuthUser};

pub async fn register(
    State(app): State<Arc<App>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let authed = app.auth.register(req).await?;
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, session_cookie(&authed.token))]),
        Json(json!({ "user": UserDto::from(&authed.user) })),
    ))
}

pub async fn login(
    State(app): State<Arc<App>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let authed = app.auth.login(req).await?;
    Ok((
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, session_cookie(&authed.token))]),
        Json(json!({ "user": UserDto::from(&authed.user) })),
    ))
}

pub async fn logout(State(app): State<Arc<App>>, parts: Parts) -> impl IntoResponse {
    if let Some(token) = session_token(&parts) {
        app.auth.logout(&token);
    }
    (
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Json(json!({ "message": "Logged out" })),
    )
}

pub async fn me(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = app.auth.current_user(user_id).await?;
    Ok(Json(json!({ "user": UserDto::from(&user) })))
}
