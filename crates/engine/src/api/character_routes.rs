//! Character API routes.

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
use fableforge_domain::{
    reference, CharacterId, CharacterUpdate, KnownNpcSummary, NewCharacter, NpcId,
};

use super::dto::CharacterDto;
use super::http::{ApiError, AuthUser};

fn parse_character_id(id: &str) -> Result<CharacterId, ApiError> {
    Uuid::parse_str(id)
        .map(CharacterId::from_uuid)
        .map_err(|_| ApiError::BadRequest("Invalid character ID".to_string()))
}

/// Reference catalogs for character creation; no auth required.
pub async fn reference_data() -> Json<serde_json::Value> {
    Json(json!({
        "races": reference::RACES,
        "classes": reference::CLASSES,
        "advantages": reference::ADVANTAGES,
        "disadvantages": reference::DISADVANTAGES,
    }))
}

pub async fn list_characters(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let characters = app.characters.list(user_id).await?;
    Ok(Json(json!({
        "characters": characters.iter().map(CharacterDto::from).collect::<Vec<_>>(),
    })))
}

pub async fn create_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<NewCharacter>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let character = app.characters.create(user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "character": CharacterDto::from(&character) })),
    ))
}

pub async fn get_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let character = app.characters.get(user_id, parse_character_id(&id)?).await?;
    Ok(Json(json!({ "character": CharacterDto::from(&character) })))
}

pub async fn update_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CharacterUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let character = app
        .characters
        .update(user_id, parse_character_id(&id)?, req)
        .await?;
    Ok(Json(json!({ "character": CharacterDto::from(&character) })))
}

pub async fn delete_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app.characters
        .delete(user_id, parse_character_id(&id)?)
        .await?;
    Ok(Json(json!({ "message": "Character deleted" })))
}

pub async fn add_known_npc(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<KnownNpcSummary>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let character = app
        .characters
        .add_known_npc(user_id, parse_character_id(&id)?, req)
        .await?;
    Ok(Json(json!({ "character": CharacterDto::from(&character) })))
}

#[derive(Debug, Deserialize)]
pub struct RelationshipUpdateRequest {
    pub relationship: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn update_npc_relationship(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path((id, npc_id)): Path<(String, String)>,
    Json(req): Json<RelationshipUpdateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let npc_id = Uuid::parse_str(&npc_id)
        .map(NpcId::from_uuid)
        .map_err(|_| ApiError::BadRequest("Invalid NPC ID".to_string()))?;
    let character = app
        .characters
        .update_npc_relationship(
            user_id,
            parse_character_id(&id)?,
            npc_id,
            req.relationship,
            req.notes,
        )
        .await?;
    Ok(Json(json!({ "character": CharacterDto::from(&character) })))
}
