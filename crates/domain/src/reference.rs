//! Static reference catalogs for character creation.
//!
//! Process-wide immutable data: races (attribute bonuses, racial traits),
//! classes (HP/MP bonuses), and the purchasable advantage/disadvantage
//! lists. The only failure mode is an unknown key.

use serde::Serialize;

/// Additive attribute adjustment; negative amounts are penalties.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AttributeBonus {
    pub attribute: &'static str,
    pub amount: i32,
}

/// A racial advantage or disadvantage. `points` is the cost of an
/// advantage or the points granted by a disadvantage.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RacialTrait {
    pub name: &'static str,
    pub description: &'static str,
    pub points: i32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Race {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub bonuses: &'static [AttributeBonus],
    pub advantages: &'static [RacialTrait],
    pub disadvantages: &'static [RacialTrait],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Class {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub primary_attributes: &'static [&'static str],
    pub hp_bonus: i32,
    pub mp_bonus: i32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Advantage {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: i32,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Disadvantage {
    pub id: &'static str,
    pub name: &'static str,
    pub points: i32,
    pub description: &'static str,
}

const fn bonus(attribute: &'static str, amount: i32) -> AttributeBonus {
    AttributeBonus { attribute, amount }
}

pub const RACES: &[Race] = &[
    Race {
        key: "human",
        name: "Human",
        description: "Versatile and adaptable, humans are the most common race.",
        bonuses: &[
            bonus("strength", 1),
            bonus("dexterity", 1),
            bonus("constitution", 1),
            bonus("intelligence", 1),
            bonus("wisdom", 1),
            bonus("charisma", 1),
        ],
        advantages: &[
            RacialTrait {
                name: "Human Versatility",
                description: "May pick one extra skill from any class",
                points: 0,
            },
            RacialTrait {
                name: "Determination",
                description: "+2 on mental resistance checks",
                points: 0,
            },
        ],
        disadvantages: &[RacialTrait {
            name: "Short Lived",
            description: "Ages faster than the other races",
            points: 1,
        }],
    },
    Race {
        key: "elf",
        name: "Elf",
        description: "Agile and wise, elves live long and have an affinity for magic.",
        bonuses: &[
            bonus("dexterity", 2),
            bonus("intelligence", 1),
            bonus("wisdom", 1),
        ],
        advantages: &[
            RacialTrait {
                name: "Elven Sight",
                description: "Sees perfectly in darkness up to 30 meters",
                points: 0,
            },
            RacialTrait {
                name: "Magic Resistance",
                description: "+3 on checks against enchantment spells",
                points: 0,
            },
            RacialTrait {
                name: "Arcane Affinity",
                description: "+2 on all magic-related checks",
                points: 0,
            },
        ],
        disadvantages: &[
            RacialTrait {
                name: "Elven Arrogance",
                description: "Struggles to accept advice from other races",
                points: 2,
            },
            RacialTrait {
                name: "Iron Sensitivity",
                description: "-1 on checks while in direct contact with iron",
                points: 1,
            },
        ],
    },
    Race {
        key: "dwarf",
        name: "Dwarf",
        description: "Tough and strong, dwarves are masters of craft and combat.",
        bonuses: &[bonus("strength", 2), bonus("constitution", 2)],
        advantages: &[
            RacialTrait {
                name: "Dwarven Resilience",
                description: "Resistant to poison and disease (+4 on checks)",
                points: 0,
            },
            RacialTrait {
                name: "Darkvision",
                description: "Sees in darkness up to 20 meters",
                points: 0,
            },
            RacialTrait {
                name: "Forge Mastery",
                description: "+3 on crafting checks with metal and stone",
                points: 0,
            },
        ],
        disadvantages: &[
            RacialTrait {
                name: "Short Stature",
                description: "Reduced speed and trouble reaching high places",
                points: 2,
            },
            RacialTrait {
                name: "Stubbornness",
                description: "Struggles to change opinion or accept new ideas",
                points: 1,
            },
        ],
    },
    Race {
        key: "halfling",
        name: "Halfling",
        description: "Small but brave, halflings are known for their luck.",
        bonuses: &[bonus("dexterity", 2), bonus("charisma", 1)],
        advantages: &[
            RacialTrait {
                name: "Halfling Luck",
                description: "May reroll any natural 1 once per check",
                points: 0,
            },
            RacialTrait {
                name: "Light Feet",
                description: "+3 on silent movement checks",
                points: 0,
            },
            RacialTrait {
                name: "Natural Courage",
                description: "+2 on checks against fear",
                points: 0,
            },
        ],
        disadvantages: &[
            RacialTrait {
                name: "Small Size",
                description: "-2 on strength checks and limited reach",
                points: 2,
            },
            RacialTrait {
                name: "Restless Curiosity",
                description: "Struggles to resist exploring dangerous places",
                points: 1,
            },
        ],
    },
    Race {
        key: "gnome",
        name: "Gnome",
        description: "Inventive tinkerers with sharp minds and quick hands.",
        bonuses: &[bonus("intelligence", 2), bonus("dexterity", 1)],
        advantages: &[
            RacialTrait {
                name: "Tinker's Insight",
                description: "+3 on checks involving mechanisms and devices",
                points: 0,
            },
            RacialTrait {
                name: "Gnomish Cunning",
                description: "+2 on checks against illusions and trickery",
                points: 0,
            },
        ],
        disadvantages: &[
            RacialTrait {
                name: "Small Size",
                description: "-2 on strength checks and limited reach",
                points: 2,
            },
            RacialTrait {
                name: "Easily Distracted",
                description: "Struggles to focus when something novel appears",
                points: 1,
            },
        ],
    },
    Race {
        key: "orc",
        name: "Orc",
        description: "Powerful and savage, orcs are born warriors.",
        bonuses: &[
            bonus("strength", 3),
            bonus("constitution", 1),
            bonus("intelligence", -1),
            bonus("charisma", -1),
        ],
        advantages: &[
            RacialTrait {
                name: "Orcish Fury",
                description: "+2 on attacks while wounded (below half health)",
                points: 0,
            },
            RacialTrait {
                name: "Pain Tolerance",
                description: "Ignores penalties from light wounds",
                points: 0,
            },
            RacialTrait {
                name: "Night Vision",
                description: "Sees in darkness up to 15 meters",
                points: 0,
            },
        ],
        disadvantages: &[
            RacialTrait {
                name: "Explosive Temper",
                description: "Struggles to control anger in tense situations",
                points: 2,
            },
            RacialTrait {
                name: "Social Prejudice",
                description: "-2 on social checks with civilized races",
                points: 2,
            },
            RacialTrait {
                name: "Light Sensitivity",
                description: "-1 on checks under harsh sunlight",
                points: 1,
            },
        ],
    },
    Race {
        key: "dragonborn",
        name: "Dragonborn",
        description: "Descendants of dragons, proud and powerful.",
        bonuses: &[
            bonus("strength", 2),
            bonus("charisma", 1),
            bonus("constitution", 1),
        ],
        advantages: &[
            RacialTrait {
                name: "Draconic Breath",
                description: "May breathe fire once per combat (damage scales with level)",
                points: 0,
            },
            RacialTrait {
                name: "Draconic Scales",
                description: "+1 natural armor",
                points: 0,
            },
            RacialTrait {
                name: "Fire Resistance",
                description: "Half damage from fire attacks",
                points: 0,
            },
        ],
        disadvantages: &[
            RacialTrait {
                name: "Draconic Pride",
                description: "Struggles to retreat or admit defeat",
                points: 2,
            },
            RacialTrait {
                name: "Intimidating Presence",
                description: "-2 on first social checks with strangers",
                points: 1,
            },
        ],
    },
    Race {
        key: "tiefling",
        name: "Tiefling",
        description: "Infernal-blooded, feared but powerful.",
        bonuses: &[bonus("charisma", 2), bonus("intelligence", 1)],
        advantages: &[
            RacialTrait {
                name: "Infernal Heritage",
                description: "May cast minor fire and darkness spells",
                points: 0,
            },
            RacialTrait {
                name: "Fire Resistance",
                description: "Half damage from fire attacks",
                points: 0,
            },
            RacialTrait {
                name: "Darkvision",
                description: "Sees in darkness up to 25 meters",
                points: 0,
            },
        ],
        disadvantages: &[
            RacialTrait {
                name: "Infernal Mark",
                description: "Demonic appearance draws fear and prejudice",
                points: 3,
            },
            RacialTrait {
                name: "Dark Temptations",
                description: "Vulnerable to malign influences",
                points: 2,
            },
        ],
    },
];

pub const CLASSES: &[Class] = &[
    Class {
        key: "warrior",
        name: "Warrior",
        description: "Specialist in melee combat and weapon use.",
        primary_attributes: &["strength", "constitution"],
        hp_bonus: 10,
        mp_bonus: 0,
    },
    Class {
        key: "mage",
        name: "Mage",
        description: "Master of the arcane arts and powerful spells.",
        primary_attributes: &["intelligence", "wisdom"],
        hp_bonus: 0,
        mp_bonus: 15,
    },
    Class {
        key: "rogue",
        name: "Rogue",
        description: "Specialist in stealth, agility, and social skills.",
        primary_attributes: &["dexterity", "charisma"],
        hp_bonus: 5,
        mp_bonus: 5,
    },
    Class {
        key: "cleric",
        name: "Cleric",
        description: "Divine servant with powers of healing and protection.",
        primary_attributes: &["wisdom", "charisma"],
        hp_bonus: 7,
        mp_bonus: 10,
    },
    Class {
        key: "ranger",
        name: "Ranger",
        description: "Explorer of the wilds, skilled in tracking and archery.",
        primary_attributes: &["dexterity", "wisdom"],
        hp_bonus: 8,
        mp_bonus: 3,
    },
];

pub const ADVANTAGES: &[Advantage] = &[
    Advantage {
        id: "night_vision",
        name: "Night Vision",
        cost: 2,
        description: "Sees in the dark as if it were day.",
    },
    Advantage {
        id: "lucky",
        name: "Lucky",
        cost: 3,
        description: "May reroll one die per session.",
    },
    Advantage {
        id: "strong_will",
        name: "Strong Will",
        cost: 2,
        description: "+2 on mental resistance.",
    },
    Advantage {
        id: "fast_learner",
        name: "Fast Learner",
        cost: 3,
        description: "Gains experience 25% faster.",
    },
    Advantage {
        id: "charismatic",
        name: "Charismatic",
        cost: 2,
        description: "+2 on all social interactions.",
    },
    Advantage {
        id: "tough",
        name: "Tough",
        cost: 2,
        description: "+5 additional hit points.",
    },
    Advantage {
        id: "magical_affinity",
        name: "Magical Affinity",
        cost: 3,
        description: "+3 additional mana points.",
    },
];

pub const DISADVANTAGES: &[Disadvantage] = &[
    Disadvantage {
        id: "fear_heights",
        name: "Fear of Heights",
        points: 1,
        description: "Penalty in situations involving heights.",
    },
    Disadvantage {
        id: "bad_luck",
        name: "Bad Luck",
        points: 2,
        description: "Critical failures are more likely.",
    },
    Disadvantage {
        id: "weak_constitution",
        name: "Weak Constitution",
        points: 2,
        description: "-3 hit points.",
    },
    Disadvantage {
        id: "antisocial",
        name: "Antisocial",
        points: 1,
        description: "Penalty on social interactions.",
    },
    Disadvantage {
        id: "slow_learner",
        name: "Slow Learner",
        points: 2,
        description: "Gains experience 25% slower.",
    },
    Disadvantage {
        id: "magic_resistance",
        name: "Magic Resistance",
        points: 1,
        description: "Trouble using and being affected by magic.",
    },
    Disadvantage {
        id: "phobia",
        name: "Phobia",
        points: 1,
        description: "Extreme fear of something specific.",
    },
];

/// Look up a race by key.
pub fn race(key: &str) -> Option<&'static Race> {
    RACES.iter().find(|r| r.key == key)
}

/// Look up a class by key.
pub fn class(key: &str) -> Option<&'static Class> {
    CLASSES.iter().find(|c| c.key == key)
}
