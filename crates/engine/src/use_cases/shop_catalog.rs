//! Shop catalog parsing and the deterministic fallback catalog.
//!
//! The LLM is asked for strict JSON but routinely wraps it in prose.
//! `parse_shop_catalog` extracts and validates the structured payload or
//! signals a parse failure; it never silently returns malformed data.
//! `fallback_catalog` is the fixed starter stock with level- and
//! location-scaled prices.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An item offered by a shop. Matches the structured-output contract of
/// the LLM collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_item_type")]
    pub item_type: String,
    pub price: i64,
    #[serde(default = "default_rarity")]
    pub rarity: String,
    #[serde(default)]
    pub properties: Value,
}

fn default_item_type() -> String {
    "misc".to_string()
}

fn default_rarity() -> String {
    "common".to_string()
}

#[derive(Debug, Deserialize)]
struct CatalogPayload {
    items: Vec<ShopItem>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogParseError {
    #[error("no JSON object found in response")]
    NoJson,
    #[error("malformed catalog: {0}")]
    Malformed(String),
    #[error("catalog contains no items")]
    Empty,
}

/// Extract the `{...}` window from free text and deserialize it as a
/// shop catalog.
pub fn parse_shop_catalog(text: &str) -> Result<Vec<ShopItem>, CatalogParseError> {
    let start = text.find('{').ok_or(CatalogParseError::NoJson)?;
    let end = text.rfind('}').ok_or(CatalogParseError::NoJson)?;
    if end < start {
        return Err(CatalogParseError::NoJson);
    }

    let payload: CatalogPayload = serde_json::from_str(&text[start..=end])
        .map_err(|e| CatalogParseError::Malformed(e.to_string()))?;

    if payload.items.is_empty() {
        return Err(CatalogParseError::Empty);
    }
    Ok(payload.items)
}

/// Price multipliers keyed by location keywords; first substring match
/// wins, unmatched locations stay at 1.0.
const LOCATION_MULTIPLIERS: &[(&str, f64)] = &[
    ("village", 0.8),
    ("city", 1.0),
    ("capital", 1.5),
    ("tower", 1.3),
    ("dungeon", 1.2),
    ("forest", 0.9),
];

pub(crate) fn location_price_multiplier(location: &str) -> f64 {
    let location = location.to_lowercase();
    LOCATION_MULTIPLIERS
        .iter()
        .find(|(keyword, _)| location.contains(keyword))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Fixed starter catalog used when generation or parsing fails. Base
/// prices scale with character level; the location multiplier is applied
/// last, truncating toward zero.
pub fn fallback_catalog(location: &str, character_level: i32) -> Vec<ShopItem> {
    let level = i64::from(character_level.max(0));
    let multiplier = location_price_multiplier(location);

    let base = [
        ShopItem {
            name: "Iron Sword".to_string(),
            description: "A well-forged sword of pure iron. Reliable and sharp.".to_string(),
            item_type: "weapon".to_string(),
            price: 50 + level * 10,
            rarity: "common".to_string(),
            properties: json!({"damage": "+1", "durability": "high"}),
        },
        ShopItem {
            name: "Minor Healing Potion".to_string(),
            description: "A red potion that restores vitality. Tastes of wild berries."
                .to_string(),
            item_type: "potion".to_string(),
            price: 25 + level * 5,
            rarity: "common".to_string(),
            properties: json!({"healing": "1d8+2", "uses": "1"}),
        },
        ShopItem {
            name: "Leather Armor".to_string(),
            description: "Light armor of tanned leather. Offers basic protection.".to_string(),
            item_type: "armor".to_string(),
            price: 75 + level * 15,
            rarity: "common".to_string(),
            properties: json!({"defense": "+2", "weight": "light"}),
        },
        ShopItem {
            name: "Scroll of Light".to_string(),
            description: "A scroll that sheds a soft glow when invoked.".to_string(),
            item_type: "scroll".to_string(),
            price: 30 + level * 8,
            rarity: "uncommon".to_string(),
            properties: json!({"spell": "Light", "duration": "1 hour"}),
        },
        ShopItem {
            name: "Ring of Protection".to_string(),
            description: "A plain ring that wards off minor attacks.".to_string(),
            item_type: "accessory".to_string(),
            price: 100 + level * 20,
            rarity: "uncommon".to_string(),
            properties: json!({"defense": "+1", "magic_resistance": "5%"}),
        },
        ShopItem {
            name: "Elven Rope".to_string(),
            description: "Light, resilient rope of elven make. Never frays.".to_string(),
            item_type: "misc".to_string(),
            price: 40 + level * 5,
            rarity: "uncommon".to_string(),
            properties: json!({"length": "15 meters", "special": "unbreakable"}),
        },
    ];

    base.into_iter()
        .map(|mut item| {
            item.price = (item.price as f64 * multiplier) as i64;
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json() {
        let text = r#"{"items": [{"name": "Flame Brand", "description": "A burning sword.",
            "type": "weapon", "price": 220, "rarity": "rare",
            "properties": {"damage": "+3 fire"}}]}"#;
        let items = parse_shop_catalog(text).expect("parses");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Flame Brand");
        assert_eq!(items[0].price, 220);
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let text = "Of course! Here is your shop:\n{\"items\": [{\"name\": \"Oak Staff\", \
                    \"price\": 45}]}\nEnjoy!";
        let items = parse_shop_catalog(text).expect("parses");
        assert_eq!(items[0].name, "Oak Staff");
        // Defaults fill in the omitted fields.
        assert_eq!(items[0].item_type, "misc");
        assert_eq!(items[0].rarity, "common");
    }

    #[test]
    fn rejects_text_without_json() {
        assert_eq!(
            parse_shop_catalog("I cannot stock a shop right now."),
            Err(CatalogParseError::NoJson)
        );
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_shop_catalog(r#"{"items": [{"name": }]}"#).expect_err("fails");
        assert!(matches!(err, CatalogParseError::Malformed(_)));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(
            parse_shop_catalog(r#"{"items": []}"#),
            Err(CatalogParseError::Empty)
        );
    }

    #[test]
    fn multiplier_first_match_wins() {
        assert_eq!(location_price_multiplier("Greenhollow Village"), 0.8);
        assert_eq!(location_price_multiplier("the Capital of Eldane"), 1.5);
        assert_eq!(location_price_multiplier("Wizard's Tower"), 1.3);
        assert_eq!(location_price_multiplier("Open Plains"), 1.0);
    }

    #[test]
    fn fallback_prices_scale_with_level_and_location() {
        let base = fallback_catalog("Open Plains", 1);
        assert_eq!(base[0].price, 60); // 50 + 1*10

        let capital = fallback_catalog("the Capital", 1);
        assert_eq!(capital[0].price, 90); // 60 * 1.5

        let village = fallback_catalog("Greenhollow Village", 1);
        assert_eq!(village[0].price, 48); // truncation toward zero of 60 * 0.8
    }

    #[test]
    fn fallback_has_six_items() {
        assert_eq!(fallback_catalog("anywhere", 3).len(), 6);
    }
}
