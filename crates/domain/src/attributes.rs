//! The six primary attributes shared by characters and NPCs.

use serde::{Deserialize, Serialize};

/// Names of the six attributes, in canonical order.
pub const ATTRIBUTE_NAMES: [&str; 6] = [
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

/// One of the six primary attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeName {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl AttributeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "strength" => Some(Self::Strength),
            "dexterity" => Some(Self::Dexterity),
            "constitution" => Some(Self::Constitution),
            "intelligence" => Some(Self::Intelligence),
            "wisdom" => Some(Self::Wisdom),
            "charisma" => Some(Self::Charisma),
            _ => None,
        }
    }
}

/// Attribute block. All values default to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl Attributes {
    pub fn get(&self, name: AttributeName) -> i32 {
        match name {
            AttributeName::Strength => self.strength,
            AttributeName::Dexterity => self.dexterity,
            AttributeName::Constitution => self.constitution,
            AttributeName::Intelligence => self.intelligence,
            AttributeName::Wisdom => self.wisdom,
            AttributeName::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, name: AttributeName, value: i32) {
        match name {
            AttributeName::Strength => self.strength = value,
            AttributeName::Dexterity => self.dexterity = value,
            AttributeName::Constitution => self.constitution = value,
            AttributeName::Intelligence => self.intelligence = value,
            AttributeName::Wisdom => self.wisdom = value,
            AttributeName::Charisma => self.charisma = value,
        }
    }

    /// Additive adjustment; bonuses are positive, penalties negative.
    pub fn apply(&mut self, name: AttributeName, delta: i32) {
        self.set(name, self.get(name) + delta);
    }

    /// Apply a named adjustment, ignoring unrecognized attribute names.
    pub fn apply_named(&mut self, name: &str, delta: i32) -> bool {
        match AttributeName::parse(name) {
            Some(attr) => {
                self.apply(attr, delta);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ten() {
        let attrs = Attributes::default();
        for name in ATTRIBUTE_NAMES {
            let attr = AttributeName::parse(name).expect("known attribute");
            assert_eq!(attrs.get(attr), 10);
        }
    }

    #[test]
    fn apply_named_adjusts_known_attributes() {
        let mut attrs = Attributes::default();
        assert!(attrs.apply_named("dexterity", 2));
        assert!(attrs.apply_named("intelligence", -1));
        assert_eq!(attrs.dexterity, 12);
        assert_eq!(attrs.intelligence, 9);
    }

    #[test]
    fn apply_named_ignores_unknown_attributes() {
        let mut attrs = Attributes::default();
        assert!(!attrs.apply_named("luck", 5));
        assert_eq!(attrs, Attributes::default());
    }
}
