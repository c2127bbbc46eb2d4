//! Game session API routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::App;
use fableforge_domain::{NewGameSession, NewNpc, NewQuest, SessionId};

use super::dto::{NpcDto, SessionDto};
use super::http::{ApiError, AuthUser};

fn parse_session_id(id: &str) -> Result<SessionId, ApiError> {
    Uuid::parse_str(id)
        .map(SessionId::from_uuid)
        .map_err(|_| ApiError::BadRequest("Invalid session ID".to_string()))
}

pub async fn list_sessions(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sessions = app.game.list_sessions(user_id).await?;
    Ok(Json(json!({
        "sessions": sessions.iter().map(SessionDto::from).collect::<Vec<_>>(),
    })))
}

pub async fn create_session(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<NewGameSession>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let session = app.game.create_session(user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "session": SessionDto::from(&session) })),
    ))
}

pub async fn get_session(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = app.game.get_session(user_id, parse_session_id(&id)?).await?;
    Ok(Json(json!({ "session": SessionDto::from(&session) })))
}

pub async fn delete_session(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app.game
        .delete_session(user_id, parse_session_id(&id)?)
        .await?;
    Ok(Json(json!({ "message": "Session deleted" })))
}

pub async fn save_session(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app.game.save_session(user_id, parse_session_id(&id)?).await?;
    Ok(Json(json!({ "message": "Game saved" })))
}

#[derive(Debug, Deserialize)]
pub struct PlayerActionRequest {
    pub action: String,
}

pub async fn player_action(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<PlayerActionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = app
        .game
        .record_player_action(user_id, parse_session_id(&id)?, &req.action)
        .await?;
    Ok(Json(json!({
        "ai_response": outcome.narration,
        "npc_actions": outcome.npc_actions,
        "session": SessionDto::from(&outcome.session),
    })))
}

pub async fn list_npcs(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let npcs = app.game.list_npcs(user_id, parse_session_id(&id)?).await?;
    Ok(Json(json!({
        "npcs": npcs.iter().map(NpcDto::from).collect::<Vec<_>>(),
    })))
}

pub async fn create_npc(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<NewNpc>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let npc = app
        .game
        .create_npc(user_id, parse_session_id(&id)?, req)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "npc": NpcDto::from(&npc) })),
    ))
}

pub async fn evolve_npcs(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updates = app.game.evolve_npcs(user_id, parse_session_id(&id)?).await?;
    Ok(Json(json!({
        "message": "NPCs updated",
        "updates": updates,
    })))
}

pub async fn add_quest(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<NewQuest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let session = app
        .game
        .add_quest(user_id, parse_session_id(&id)?, req)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "session": SessionDto::from(&session) })),
    ))
}

pub async fn complete_quest(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path((id, quest_id)): Path<(String, u32)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = app
        .game
        .complete_quest(user_id, parse_session_id(&id)?, quest_id)
        .await?;
    Ok(Json(json!({ "session": SessionDto::from(&session) })))
}

#[derive(Debug, Deserialize)]
pub struct WorldStateRequest {
    pub key: String,
    pub value: serde_json::Value,
}

pub async fn set_world_state(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<WorldStateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = app
        .game
        .set_world_state(user_id, parse_session_id(&id)?, &req.key, req.value)
        .await?;
    Ok(Json(json!({ "session": SessionDto::from(&session) })))
}
