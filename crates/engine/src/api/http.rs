//! Router assembly, API error mapping, and the cookie-auth extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::app::App;
use crate::infrastructure::ports::{AuthError, RepoError};
use crate::infrastructure::session_store::SESSION_COOKIE;
use crate::use_cases::characters::CharacterError;
use crate::use_cases::game::GameError;
use crate::use_cases::shop::ShopError;
use fableforge_domain::{DomainError, UserId};

use super::{auth_routes, character_routes, game_routes, shop_routes};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        // Auth
        .route("/api/auth/register", post(auth_routes::register))
        .route("/api/auth/login", post(auth_routes::login))
        .route("/api/auth/logout", post(auth_routes::logout))
        .route("/api/auth/me", get(auth_routes::me))
        // Characters
        .route(
            "/api/characters",
            get(character_routes::list_characters).post(character_routes::create_character),
        )
        .route(
            "/api/characters/reference-data",
            get(character_routes::reference_data),
        )
        .route(
            "/api/characters/{id}",
            get(character_routes::get_character)
                .put(character_routes::update_character)
                .delete(character_routes::delete_character),
        )
        .route(
            "/api/characters/{id}/known-npcs",
            post(character_routes::add_known_npc),
        )
        .route(
            "/api/characters/{id}/known-npcs/{npc_id}",
            put(character_routes::update_npc_relationship),
        )
        // Game sessions
        .route(
            "/api/game/sessions",
            get(game_routes::list_sessions).post(game_routes::create_session),
        )
        .route(
            "/api/game/sessions/{id}",
            get(game_routes::get_session).delete(game_routes::delete_session),
        )
        .route("/api/game/sessions/{id}/action", post(game_routes::player_action))
        .route("/api/game/sessions/{id}/save", post(game_routes::save_session))
        .route(
            "/api/game/sessions/{id}/npcs",
            get(game_routes::list_npcs).post(game_routes::create_npc),
        )
        .route(
            "/api/game/sessions/{id}/npcs/update-all",
            post(game_routes::evolve_npcs),
        )
        .route("/api/game/sessions/{id}/quests", post(game_routes::add_quest))
        .route(
            "/api/game/sessions/{id}/quests/{quest_id}/complete",
            post(game_routes::complete_quest),
        )
        .route(
            "/api/game/sessions/{id}/world-state",
            put(game_routes::set_world_state),
        )
        // Shop
        .route("/api/shop/generate", post(shop_routes::generate_shop))
        .route("/api/shop/buy", post(shop_routes::buy_item))
        .route("/api/shop/sell", post(shop_routes::sell_item))
        .route("/api/shop/types", get(shop_routes::shop_types))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Error mapping
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn domain_to_api(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(_) => ApiError::BadRequest(err.to_string()),
        DomainError::NotFound { .. } => ApiError::NotFound(err.to_string()),
        DomainError::Conflict(_) => ApiError::Conflict(err.to_string()),
        // Business-rule violations are user-correctable.
        DomainError::InsufficientFunds { .. } | DomainError::InsufficientQuantity { .. } => {
            ApiError::BadRequest(err.to_string())
        }
    }
}

fn repo_to_api(err: RepoError) -> ApiError {
    if err.is_not_found() {
        ApiError::NotFound(err.to_string())
    } else {
        ApiError::Internal(err.to_string())
    }
}

impl From<CharacterError> for ApiError {
    fn from(err: CharacterError) -> Self {
        match err {
            CharacterError::Domain(e) => domain_to_api(e),
            CharacterError::Repo(e) => repo_to_api(e),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::Domain(e) => domain_to_api(e),
            GameError::Repo(e) => repo_to_api(e),
        }
    }
}

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        match err {
            ShopError::Domain(e) => domain_to_api(e),
            ShopError::Repo(e) => repo_to_api(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::Conflict => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Unauthenticated => ApiError::Unauthorized(err.to_string()),
            AuthError::Hash(msg) => ApiError::Internal(msg),
            AuthError::Repo(e) => repo_to_api(e),
        }
    }
}

// =============================================================================
// Cookie session extractor
// =============================================================================

/// The authenticated user, resolved from the session cookie. Rejects
/// with 401 when the cookie is missing or the token is stale.
pub struct AuthUser(pub UserId);

impl FromRequestParts<Arc<App>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<App>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;
        let user_id = state
            .auth_sessions
            .resolve(&token)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;
        Ok(AuthUser(user_id))
    }
}

/// Pull the session token out of the Cookie header, if present.
pub(super) fn session_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    parse_session_cookie(header)
}

fn parse_session_cookie(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_string)
    })
}

/// Build the Set-Cookie value for a fresh session token.
pub(super) fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Build the Set-Cookie value that clears the session.
pub(super) fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
