//! Shop API routes.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::app::App;
use crate::use_cases::shop::{BuyRequest, SellRequest, SHOP_TYPES};
use fableforge_domain::CharacterId;

use super::dto::CharacterDto;
use super::http::{ApiError, AuthUser};

#[derive(Debug, Deserialize)]
pub struct GenerateShopRequest {
    pub character_id: CharacterId,
    #[serde(default = "default_shop_type")]
    pub shop_type: String,
}

fn default_shop_type() -> String {
    "general".to_string()
}

pub async fn generate_shop(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<GenerateShopRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let shop = app
        .shop
        .generate(user_id, req.character_id, &req.shop_type)
        .await?;
    Ok(Json(json!({ "shop": shop })))
}

pub async fn buy_item(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<BuyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let item_name = req.item.name.clone();
    let character = app.shop.buy(user_id, req).await?;
    Ok(Json(json!({
        "message": format!("Bought {item_name}"),
        "character": CharacterDto::from(&character),
    })))
}

pub async fn sell_item(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<SellRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let character = app.shop.sell(user_id, req).await?;
    Ok(Json(json!({
        "message": "Item sold",
        "character": CharacterDto::from(&character),
    })))
}

pub async fn shop_types() -> Json<serde_json::Value> {
    Json(json!({ "shop_types": SHOP_TYPES }))
}
