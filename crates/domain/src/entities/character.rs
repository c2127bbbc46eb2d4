//! Character ledger: attributes, health, inventory, gold, and the
//! known-NPC relationship list.
//!
//! Invariants:
//! - `gold >= 0` at all times; a debit that would violate this is
//!   rejected without mutation.
//! - Inventory item ids come from the persisted `next_item_id` counter,
//!   so they are unique within the character and never reused after a
//!   removal.
//! - At most one known-NPC record per NPC id; re-adding updates the
//!   existing record in place.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::attributes::{AttributeName, Attributes};
use crate::error::DomainError;
use crate::ids::{CharacterId, NpcId, UserId};
use crate::reference;
use crate::value_objects::inventory::{InventoryItem, NewItem};
use crate::value_objects::known_npc::{KnownNpc, KnownNpcSummary, DEFAULT_RELATIONSHIP};

/// Starting gold for a fresh character.
pub const STARTING_GOLD: i64 = 100;

/// Default starting location.
pub const STARTING_LOCATION: &str = "Riverside Village";

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub user_id: UserId,
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: i32,
    pub experience: i32,
    pub attributes: Attributes,
    pub current_hp: i32,
    pub max_hp: i32,
    pub current_mp: i32,
    pub max_mp: i32,
    pub gold: i64,
    /// Next inventory item id; strictly monotonic, never reset.
    pub next_item_id: u32,
    pub inventory: Vec<InventoryItem>,
    /// Equipped items by slot (free-form values).
    pub equipment: Map<String, Value>,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub known_npcs: Vec<KnownNpc>,
    pub background: String,
    pub notes: String,
    pub current_location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload. `attribute_points` are caller-distributed bonuses
/// applied after racial adjustments; advantages/disadvantages are stored
/// verbatim (no point-budget validation).
#[derive(Debug, Clone, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    pub race: String,
    #[serde(alias = "character_class")]
    pub class: String,
    #[serde(default)]
    pub attribute_points: HashMap<String, i32>,
    #[serde(default)]
    pub advantages: Vec<String>,
    #[serde(default)]
    pub disadvantages: Vec<String>,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub notes: String,
}

/// Whitelist-based partial update. Fields outside this set cannot be
/// changed through the update operation; collection fields are replaced
/// wholesale when present, never merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterUpdate {
    pub name: Option<String>,
    pub background: Option<String>,
    pub notes: Option<String>,
    pub current_hp: Option<i32>,
    pub current_mp: Option<i32>,
    pub strength: Option<i32>,
    pub dexterity: Option<i32>,
    pub constitution: Option<i32>,
    pub intelligence: Option<i32>,
    pub wisdom: Option<i32>,
    pub charisma: Option<i32>,
    pub advantages: Option<Vec<String>>,
    pub disadvantages: Option<Vec<String>>,
    pub equipment: Option<Map<String, Value>>,
    pub inventory: Option<Vec<InventoryItem>>,
}

impl Character {
    /// Create a character with derived stats: all attributes start at
    /// 10, racial bonuses/penalties apply additively, then distributed
    /// points. HP = 10 + constitution + class hp bonus; MP = 10 +
    /// intelligence + class mp bonus. Current and max start equal.
    pub fn create(
        user_id: UserId,
        req: NewCharacter,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if req.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        let race =
            reference::race(&req.race).ok_or_else(|| DomainError::validation("unknown race"))?;
        let class =
            reference::class(&req.class).ok_or_else(|| DomainError::validation("unknown class"))?;

        let mut attributes = Attributes::default();
        for bonus in race.bonuses {
            attributes.apply_named(bonus.attribute, bonus.amount);
        }
        for (name, points) in &req.attribute_points {
            attributes.apply_named(name, *points);
        }

        let hp = 10 + attributes.constitution + class.hp_bonus;
        let mp = 10 + attributes.intelligence + class.mp_bonus;

        Ok(Self {
            id: CharacterId::new(),
            user_id,
            name: req.name,
            race: race.key.to_string(),
            class: class.key.to_string(),
            level: 1,
            experience: 0,
            attributes,
            current_hp: hp,
            max_hp: hp,
            current_mp: mp,
            max_mp: mp,
            gold: STARTING_GOLD,
            next_item_id: 1,
            inventory: Vec::new(),
            equipment: Map::new(),
            advantages: req.advantages,
            disadvantages: req.disadvantages,
            known_npcs: Vec::new(),
            background: req.background,
            notes: req.notes,
            current_location: STARTING_LOCATION.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a whitelist update; collection fields replace wholesale.
    pub fn apply_update(&mut self, update: CharacterUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(background) = update.background {
            self.background = background;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(hp) = update.current_hp {
            self.current_hp = hp;
        }
        if let Some(mp) = update.current_mp {
            self.current_mp = mp;
        }
        let attribute_updates = [
            (AttributeName::Strength, update.strength),
            (AttributeName::Dexterity, update.dexterity),
            (AttributeName::Constitution, update.constitution),
            (AttributeName::Intelligence, update.intelligence),
            (AttributeName::Wisdom, update.wisdom),
            (AttributeName::Charisma, update.charisma),
        ];
        for (attr, value) in attribute_updates {
            if let Some(value) = value {
                self.attributes.set(attr, value);
            }
        }
        if let Some(advantages) = update.advantages {
            self.advantages = advantages;
        }
        if let Some(disadvantages) = update.disadvantages {
            self.disadvantages = disadvantages;
        }
        if let Some(equipment) = update.equipment {
            self.equipment = equipment;
        }
        if let Some(inventory) = update.inventory {
            // Keep the id counter ahead of any caller-supplied ids.
            let max_id = inventory.iter().map(|i| i.id).max().unwrap_or(0);
            self.next_item_id = self.next_item_id.max(max_id + 1);
            self.inventory = inventory;
        }
        self.updated_at = now;
    }

    /// Append an item with a freshly assigned monotonic id; returns the
    /// assigned id.
    pub fn add_item(&mut self, item: NewItem, now: DateTime<Utc>) -> u32 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        self.inventory.push(InventoryItem {
            id,
            name: item.name,
            description: item.description,
            item_type: item.item_type,
            quantity: item.quantity.max(1),
            value: item.value,
            rarity: item.rarity,
            properties: item.properties,
            acquired_at: now,
        });
        self.updated_at = now;
        id
    }

    /// Remove `quantity` of an item: the entry is dropped entirely when
    /// its stored quantity is less than or equal to the requested
    /// amount, otherwise it decrements in place. Unknown ids are a
    /// silent no-op.
    pub fn remove_item(&mut self, item_id: u32, quantity: u32, now: DateTime<Utc>) {
        if let Some(pos) = self.inventory.iter().position(|i| i.id == item_id) {
            if self.inventory[pos].quantity <= quantity {
                self.inventory.remove(pos);
            } else {
                self.inventory[pos].quantity -= quantity;
            }
            self.updated_at = now;
        }
    }

    pub fn find_item(&self, item_id: u32) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.id == item_id)
    }

    pub fn can_afford(&self, cost: i64) -> bool {
        self.gold >= cost
    }

    /// Debit gold atomically: returns false (no mutation) when the
    /// amount exceeds the balance.
    pub fn spend_gold(&mut self, amount: i64, now: DateTime<Utc>) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.gold -= amount;
        self.updated_at = now;
        true
    }

    /// Credit gold unconditionally.
    pub fn earn_gold(&mut self, amount: i64, now: DateTime<Utc>) {
        self.gold += amount;
        self.updated_at = now;
    }

    /// Record a met NPC. Re-adding an already-known NPC overwrites the
    /// existing record's fields and stamps `last_interaction`; `met_at`
    /// is preserved.
    pub fn add_known_npc(&mut self, summary: KnownNpcSummary, now: DateTime<Utc>) {
        let location_met = summary
            .location_met
            .unwrap_or_else(|| self.current_location.clone());
        let relationship = summary
            .relationship
            .unwrap_or_else(|| DEFAULT_RELATIONSHIP.to_string());

        if let Some(existing) = self
            .known_npcs
            .iter_mut()
            .find(|n| n.npc_id == summary.npc_id)
        {
            existing.name = summary.name;
            existing.race = summary.race;
            existing.occupation = summary.occupation;
            existing.location_met = location_met;
            existing.relationship = relationship;
            existing.notes = summary.notes;
            existing.last_interaction = now;
        } else {
            self.known_npcs.push(KnownNpc {
                npc_id: summary.npc_id,
                name: summary.name,
                race: summary.race,
                occupation: summary.occupation,
                location_met,
                relationship,
                notes: summary.notes,
                met_at: now,
                last_interaction: now,
            });
        }
        self.updated_at = now;
    }

    /// Update the relationship label (and optionally notes) for a known
    /// NPC. Unknown ids are a silent no-op.
    pub fn update_npc_relationship(
        &mut self,
        npc_id: NpcId,
        relationship: impl Into<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        if let Some(record) = self.known_npcs.iter_mut().find(|n| n.npc_id == npc_id) {
            record.relationship = relationship.into();
            if let Some(notes) = notes {
                record.notes = notes;
            }
            record.last_interaction = now;
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::inventory::ItemRarity;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid")
    }

    fn new_character(race: &str, class: &str, points: &[(&str, i32)]) -> Character {
        Character::create(
            UserId::new(),
            NewCharacter {
                name: "Aldric".to_string(),
                race: race.to_string(),
                class: class.to_string(),
                attribute_points: points.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                advantages: vec![],
                disadvantages: vec![],
                background: String::new(),
                notes: String::new(),
            },
            now(),
        )
        .expect("valid character")
    }

    fn new_item(name: &str, quantity: u32, value: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            description: String::new(),
            item_type: "misc".to_string(),
            quantity,
            value,
            rarity: ItemRarity::Common,
            properties: serde_json::Value::Null,
        }
    }

    #[test]
    fn elf_mage_derivation() {
        // elf: dex+2 int+1 wis+1; mage: hp+0 mp+15; +2 distributed int
        let c = new_character("elf", "mage", &[("intelligence", 2)]);
        assert_eq!(c.attributes.intelligence, 13);
        assert_eq!(c.attributes.dexterity, 12);
        assert_eq!(c.max_hp, 20); // 10 + 10 con + 0
        assert_eq!(c.max_mp, 38); // 10 + 13 int + 15
        assert_eq!(c.current_hp, c.max_hp);
        assert_eq!(c.current_mp, c.max_mp);
    }

    #[test]
    fn hp_mp_formula_holds_for_every_race_class_pair() {
        for race in reference::RACES {
            for class in reference::CLASSES {
                let c = new_character(race.key, class.key, &[]);
                assert_eq!(
                    c.max_hp,
                    10 + c.attributes.constitution + class.hp_bonus,
                    "hp for {}/{}",
                    race.key,
                    class.key
                );
                assert_eq!(
                    c.max_mp,
                    10 + c.attributes.intelligence + class.mp_bonus,
                    "mp for {}/{}",
                    race.key,
                    class.key
                );
            }
        }
    }

    #[test]
    fn orc_penalties_apply() {
        let c = new_character("orc", "warrior", &[]);
        assert_eq!(c.attributes.strength, 13);
        assert_eq!(c.attributes.intelligence, 9);
        assert_eq!(c.attributes.charisma, 9);
        assert_eq!(c.max_hp, 10 + 11 + 10);
    }

    #[test]
    fn unknown_race_rejected() {
        let err = Character::create(
            UserId::new(),
            NewCharacter {
                name: "X".to_string(),
                race: "vampire".to_string(),
                class: "mage".to_string(),
                attribute_points: HashMap::new(),
                advantages: vec![],
                disadvantages: vec![],
                background: String::new(),
                notes: String::new(),
            },
            now(),
        )
        .expect_err("should fail");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn empty_name_rejected() {
        let err = Character::create(
            UserId::new(),
            NewCharacter {
                name: "  ".to_string(),
                race: "human".to_string(),
                class: "warrior".to_string(),
                attribute_points: HashMap::new(),
                advantages: vec![],
                disadvantages: vec![],
                background: String::new(),
                notes: String::new(),
            },
            now(),
        )
        .expect_err("should fail");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn spend_gold_rejects_overdraft() {
        let mut c = new_character("human", "warrior", &[]);
        assert_eq!(c.gold, STARTING_GOLD);
        assert!(!c.spend_gold(STARTING_GOLD + 1, now()));
        assert_eq!(c.gold, STARTING_GOLD);
        assert!(c.spend_gold(STARTING_GOLD, now()));
        assert_eq!(c.gold, 0);
        assert!(!c.spend_gold(1, now()));
        assert_eq!(c.gold, 0);
    }

    #[test]
    fn earn_gold_has_no_upper_bound() {
        let mut c = new_character("human", "warrior", &[]);
        c.earn_gold(1_000_000, now());
        assert_eq!(c.gold, STARTING_GOLD + 1_000_000);
    }

    #[test]
    fn item_ids_are_monotonic_after_removal() {
        let mut c = new_character("human", "rogue", &[]);
        let first = c.add_item(new_item("Dagger", 1, 10), now());
        let second = c.add_item(new_item("Rope", 1, 5), now());
        assert_eq!((first, second), (1, 2));

        c.remove_item(first, 1, now());
        let third = c.add_item(new_item("Lantern", 1, 8), now());
        assert_eq!(third, 3);
        assert!(c.find_item(first).is_none());
    }

    #[test]
    fn remove_item_decrements_or_drops() {
        let mut c = new_character("human", "rogue", &[]);
        let id = c.add_item(new_item("Arrow", 10, 1), now());

        c.remove_item(id, 4, now());
        let remaining = c.find_item(id).expect("still present");
        assert_eq!(remaining.quantity, 6);
        assert_eq!(remaining.id, id);

        // Requested >= stored drops the entry entirely.
        c.remove_item(id, 6, now());
        assert!(c.find_item(id).is_none());
    }

    #[test]
    fn remove_item_unknown_id_is_noop() {
        let mut c = new_character("human", "rogue", &[]);
        c.add_item(new_item("Rope", 1, 5), now());
        c.remove_item(99, 1, now());
        assert_eq!(c.inventory.len(), 1);
    }

    #[test]
    fn add_known_npc_is_idempotent_on_identity() {
        let mut c = new_character("human", "cleric", &[]);
        let npc_id = NpcId::new();
        let summary = |notes: &str| KnownNpcSummary {
            npc_id,
            name: "Mira".to_string(),
            race: "elf".to_string(),
            occupation: "innkeeper".to_string(),
            location_met: None,
            relationship: Some("friendly".to_string()),
            notes: notes.to_string(),
        };

        c.add_known_npc(summary("met at the inn"), now());
        c.add_known_npc(summary("helped with the cellar rats"), now());

        assert_eq!(c.known_npcs.len(), 1);
        assert_eq!(c.known_npcs[0].notes, "helped with the cellar rats");
        assert_eq!(c.known_npcs[0].location_met, STARTING_LOCATION);
    }

    #[test]
    fn update_npc_relationship_unknown_is_noop() {
        let mut c = new_character("human", "cleric", &[]);
        c.update_npc_relationship(NpcId::new(), "hostile", None, now());
        assert!(c.known_npcs.is_empty());
    }

    #[test]
    fn update_npc_relationship_keeps_notes_when_absent() {
        let mut c = new_character("human", "cleric", &[]);
        let npc_id = NpcId::new();
        c.add_known_npc(
            KnownNpcSummary {
                npc_id,
                name: "Mira".to_string(),
                race: String::new(),
                occupation: String::new(),
                location_met: None,
                relationship: None,
                notes: "old notes".to_string(),
            },
            now(),
        );
        c.update_npc_relationship(npc_id, "hostile", None, now());
        assert_eq!(c.known_npcs[0].relationship, "hostile");
        assert_eq!(c.known_npcs[0].notes, "old notes");
    }

    #[test]
    fn wholesale_inventory_replacement_keeps_counter_ahead() {
        let mut c = new_character("human", "rogue", &[]);
        c.add_item(new_item("Rope", 1, 5), now());

        let replacement = vec![InventoryItem {
            id: 7,
            name: "Sword".to_string(),
            description: String::new(),
            item_type: "weapon".to_string(),
            quantity: 1,
            value: 50,
            rarity: ItemRarity::Common,
            properties: serde_json::Value::Null,
            acquired_at: now(),
        }];
        c.apply_update(
            CharacterUpdate {
                inventory: Some(replacement),
                ..Default::default()
            },
            now(),
        );

        let id = c.add_item(new_item("Shield", 1, 30), now());
        assert_eq!(id, 8);
    }

    #[test]
    fn update_whitelist_fields() {
        let mut c = new_character("human", "warrior", &[]);
        c.apply_update(
            CharacterUpdate {
                name: Some("Borin".to_string()),
                current_hp: Some(5),
                strength: Some(15),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(c.name, "Borin");
        assert_eq!(c.current_hp, 5);
        assert_eq!(c.attributes.strength, 15);
        // Untouched fields keep their values.
        assert_eq!(c.class, "warrior");
    }
}
