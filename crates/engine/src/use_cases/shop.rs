//! Shop operations: catalog generation plus the buy/sell ledger moves.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{
    CharacterRepo, ChatMessage, ClockPort, LlmPort, LlmRequest, RepoError,
};
use crate::prompt_templates;
use crate::use_cases::locks::CharacterLocks;
use crate::use_cases::shop_catalog::{fallback_catalog, parse_shop_catalog, ShopItem};
use fableforge_domain::{
    Character, CharacterId, DomainError, ItemRarity, NewItem, UserId,
};

#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A generated shop: where it is, what kind it is, what it sells.
#[derive(Debug, Clone, Serialize)]
pub struct Shop {
    pub location: String,
    #[serde(rename = "type")]
    pub shop_type: String,
    pub items: Vec<ShopItem>,
}

/// Static catalog of shop types.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShopType {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const SHOP_TYPES: &[ShopType] = &[
    ShopType {
        key: "general",
        name: "General Store",
        description: "A variety of basic, useful goods",
    },
    ShopType {
        key: "blacksmith",
        name: "Blacksmith",
        description: "Quality weapons and armor",
    },
    ShopType {
        key: "alchemist",
        name: "Alchemist",
        description: "Potions, scrolls, and magical components",
    },
    ShopType {
        key: "magic",
        name: "Magic Shop",
        description: "Enchanted items and mystical artifacts",
    },
    ShopType {
        key: "tavern",
        name: "Tavern",
        description: "Food, drink, and information",
    },
    ShopType {
        key: "temple",
        name: "Temple",
        description: "Blessings, healing, and sacred items",
    },
];

#[derive(Debug, Clone, Deserialize)]
pub struct BuyRequest {
    pub character_id: CharacterId,
    pub item: ShopItem,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SellRequest {
    pub character_id: CharacterId,
    pub item_id: u32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

pub struct ShopService {
    characters: Arc<dyn CharacterRepo>,
    llm: Arc<dyn LlmPort>,
    clock: Arc<dyn ClockPort>,
    locks: CharacterLocks,
}

impl ShopService {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        locks: CharacterLocks,
    ) -> Self {
        Self {
            characters,
            llm,
            clock,
            locks,
        }
    }

    async fn get_owned(
        &self,
        user_id: UserId,
        id: CharacterId,
    ) -> Result<Character, ShopError> {
        match self.characters.get(id).await? {
            Some(character) if character.user_id == user_id => Ok(character),
            _ => Err(DomainError::not_found("Character", id).into()),
        }
    }

    /// Generate a shop for the character's current location. LLM or
    /// parse failures fall back to the fixed starter catalog.
    pub async fn generate(
        &self,
        user_id: UserId,
        character_id: CharacterId,
        shop_type: &str,
    ) -> Result<Shop, ShopError> {
        let character = self.get_owned(user_id, character_id).await?;

        let request = LlmRequest::new(vec![ChatMessage::user(
            prompt_templates::shop_catalog_prompt(
                &character.current_location,
                character.level,
                shop_type,
            ),
        )])
        .with_system_prompt(prompt_templates::SHOP_SYSTEM_PROMPT)
        .with_temperature(prompt_templates::temperature::SHOP_CATALOG)
        .with_max_tokens(prompt_templates::max_tokens::SHOP_CATALOG);

        let items = match self.llm.generate(request).await {
            Ok(response) => match parse_shop_catalog(&response.content) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, "shop catalog parse failed, using fallback");
                    fallback_catalog(&character.current_location, character.level)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "shop catalog generation failed, using fallback");
                fallback_catalog(&character.current_location, character.level)
            }
        };

        Ok(Shop {
            location: character.current_location,
            shop_type: shop_type.to_string(),
            items,
        })
    }

    /// Buy: debit gold and append the item as one ledger operation.
    pub async fn buy(&self, user_id: UserId, req: BuyRequest) -> Result<Character, ShopError> {
        let _guard = self.locks.acquire(req.character_id).await;
        let mut character = self.get_owned(user_id, req.character_id).await?;
        let quantity = req.quantity.max(1);
        let total_cost = req.item.price * i64::from(quantity);
        let now = self.clock.now();

        if !character.spend_gold(total_cost, now) {
            return Err(DomainError::InsufficientFunds {
                required: total_cost,
                available: character.gold,
            }
            .into());
        }

        character.add_item(
            NewItem {
                name: req.item.name,
                description: req.item.description,
                item_type: req.item.item_type,
                quantity,
                value: req.item.price,
                rarity: req.item.rarity.parse().unwrap_or(ItemRarity::Common),
                properties: req.item.properties,
            },
            now,
        );

        self.characters.save(&character).await?;
        Ok(character)
    }

    /// Sell: unit price is floor(0.5 * stored value); credits gold and
    /// removes the quantity as one ledger operation.
    pub async fn sell(&self, user_id: UserId, req: SellRequest) -> Result<Character, ShopError> {
        let _guard = self.locks.acquire(req.character_id).await;
        let mut character = self.get_owned(user_id, req.character_id).await?;
        let quantity = req.quantity.max(1);

        let item = character
            .find_item(req.item_id)
            .ok_or_else(|| DomainError::not_found("InventoryItem", req.item_id))?;

        if item.quantity < quantity {
            return Err(DomainError::InsufficientQuantity {
                requested: quantity,
                available: item.quantity,
            }
            .into());
        }

        let sell_price = item.value / 2;
        let earned = sell_price * i64::from(quantity);
        let now = self.clock.now();

        character.remove_item(req.item_id, quantity, now);
        character.earn_gold(earned, now);

        self.characters.save(&character).await?;
        Ok(character)
    }
}
