//! Payloads exchanged with the D&D Combat API.
//!
//! None of these types carry local invariants: validation is the remote
//! service's job, and the test suite deliberately sends invalid values
//! (negative strength, missing fields) to observe how it reacts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{DomainError, DomainResult};

/// Wire spelling used for the multi-word character and monster fields.
///
/// The API has been observed with both `hitPoints`/`armorClass` and
/// `hit_points`/`armor_class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldCasing {
    /// `hitPoints`, `armorClass`
    #[default]
    Camel,
    /// `hit_points`, `armor_class`
    Snake,
}

impl FieldCasing {
    /// Wire name of the hit points field.
    #[must_use]
    pub const fn hit_points_key(self) -> &'static str {
        match self {
            Self::Camel => "hitPoints",
            Self::Snake => "hit_points",
        }
    }

    /// Wire name of the armor class field.
    #[must_use]
    pub const fn armor_class_key(self) -> &'static str {
        match self {
            Self::Camel => "armorClass",
            Self::Snake => "armor_class",
        }
    }

    /// Returns the casing as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camel => "camel",
            Self::Snake => "snake",
        }
    }
}

impl fmt::Display for FieldCasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldCasing {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camel" | "camelcase" => Ok(Self::Camel),
            "snake" | "snake_case" => Ok(Self::Snake),
            other => Err(DomainError::UnknownCasing(other.to_string())),
        }
    }
}

/// A player character payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Character name
    pub name: String,
    /// Strength score
    pub strength: i64,
    /// Dexterity score
    pub dexterity: i64,
    /// Hit points
    #[serde(alias = "hit_points")]
    pub hit_points: i64,
    /// Armor class
    #[serde(alias = "armor_class")]
    pub armor_class: i64,
}

impl Character {
    /// The reference character used throughout the suite: Kaya, 10/7/11/12.
    ///
    /// This is also what `GET /api/characters/example` is expected to return.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            name: "Kaya".to_string(),
            strength: 10,
            dexterity: 7,
            hit_points: 11,
            armor_class: 12,
        }
    }

    /// Returns a copy with a different strength score.
    #[must_use]
    pub fn with_strength(mut self, strength: i64) -> Self {
        self.strength = strength;
        self
    }

    /// Renders the character as a JSON object using the given casing.
    #[must_use]
    pub fn to_json(&self, casing: FieldCasing) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), json!(self.name));
        map.insert("strength".to_string(), json!(self.strength));
        map.insert("dexterity".to_string(), json!(self.dexterity));
        map.insert(casing.hit_points_key().to_string(), json!(self.hit_points));
        map.insert(casing.armor_class_key().to_string(), json!(self.armor_class));
        Value::Object(map)
    }

    /// Renders only name, strength and dexterity, leaving out the rest.
    #[must_use]
    pub fn to_incomplete_json(&self) -> Value {
        json!({
            "name": self.name,
            "strength": self.strength,
            "dexterity": self.dexterity,
        })
    }
}

/// A monster as returned by `GET /api/monsters/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    /// Monster name
    pub name: String,
    /// Strength score
    pub strength: f64,
    /// Dexterity score
    pub dexterity: f64,
    /// Hit points
    #[serde(alias = "hit_points")]
    pub hit_points: f64,
    /// Armor class
    #[serde(alias = "armor_class")]
    pub armor_class: f64,
}

impl Monster {
    /// JSON Schema a monster detail body must satisfy under the given casing.
    #[must_use]
    pub fn json_schema(casing: FieldCasing) -> Value {
        let hp = casing.hit_points_key();
        let ac = casing.armor_class_key();
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "strength": { "type": "number" },
                "dexterity": { "type": "number" },
                hp: { "type": "number" },
                ac: { "type": "number" },
            },
            "required": ["name", "strength", "dexterity", hp, ac],
        })
    }
}

/// Body of `GET /api/monsters/names/{page}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MonsterNames {
    /// Monster names on this page
    pub monsters: Vec<String>,
}

impl MonsterNames {
    /// JSON Schema for the listing body.
    #[must_use]
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "monsters": {
                    "type": "array",
                    "items": { "type": "string" },
                },
            },
            "required": ["monsters"],
        })
    }
}

/// Outcome of `POST /api/battle/{monster}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    /// Name of whoever won
    pub winner: String,
    /// Number of rounds fought
    pub rounds: f64,
}

impl BattleResult {
    /// JSON Schema for a battle result body.
    #[must_use]
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "winner": { "type": "string" },
                "rounds": { "type": "number" },
            },
            "required": ["winner", "rounds"],
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_character_camel() {
        assert_eq!(
            Character::sample().to_json(FieldCasing::Camel),
            json!({
                "name": "Kaya",
                "strength": 10,
                "dexterity": 7,
                "hitPoints": 11,
                "armorClass": 12
            })
        );
    }

    #[test]
    fn test_sample_character_snake() {
        let value = Character::sample().to_json(FieldCasing::Snake);
        assert_eq!(value["hit_points"], json!(11));
        assert_eq!(value["armor_class"], json!(12));
        assert!(value.get("hitPoints").is_none());
    }

    #[test]
    fn test_character_deserializes_either_casing() {
        let camel: Character = serde_json::from_value(json!({
            "name": "Kaya", "strength": 10, "dexterity": 7, "hitPoints": 11, "armorClass": 12
        }))
        .unwrap();
        let snake: Character = serde_json::from_value(json!({
            "name": "Kaya", "strength": 10, "dexterity": 7, "hit_points": 11, "armor_class": 12
        }))
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel, Character::sample());
    }

    #[test]
    fn test_negative_values_are_representable() {
        let character = Character::sample().with_strength(-10);
        assert_eq!(character.to_json(FieldCasing::Camel)["strength"], json!(-10));
    }

    #[test]
    fn test_incomplete_json_omits_combat_stats() {
        let value = Character::sample().to_incomplete_json();
        assert_eq!(value, json!({"name": "Kaya", "strength": 10, "dexterity": 7}));
    }

    #[test]
    fn test_monster_schema_follows_casing() {
        let schema = Monster::json_schema(FieldCasing::Snake);
        assert_eq!(
            schema["required"],
            json!(["name", "strength", "dexterity", "hit_points", "armor_class"])
        );
        assert!(schema["properties"]["hit_points"].is_object());
    }

    #[test]
    fn test_casing_from_str() {
        assert_eq!("camel".parse::<FieldCasing>().unwrap(), FieldCasing::Camel);
        assert_eq!("Snake_Case".parse::<FieldCasing>().unwrap(), FieldCasing::Snake);
        assert!("kebab".parse::<FieldCasing>().is_err());
    }
}
