//! Inventory items carried by a character.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Item rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    /// Fallback for unrecognized values from the LLM or old saves.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ItemRarity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Self::Common),
            "uncommon" => Ok(Self::Uncommon),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            _ => Ok(Self::Unknown),
        }
    }
}

/// An item held in a character's inventory. The `id` is unique within
/// that character and assigned from a monotonic counter, so ids are
/// never reused after removals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_item_type")]
    pub item_type: String,
    pub quantity: u32,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub rarity: ItemRarity,
    #[serde(default)]
    pub properties: Value,
    pub acquired_at: DateTime<Utc>,
}

fn default_item_type() -> String {
    "misc".to_string()
}

/// Payload for adding an item; defaults mirror the inventory invariants
/// (quantity 1, rarity common, type misc).
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_item_type")]
    pub item_type: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub rarity: ItemRarity,
    #[serde(default)]
    pub properties: Value,
}

fn default_quantity() -> u32 {
    1
}
