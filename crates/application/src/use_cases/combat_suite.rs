//! The built-in D&D Combat API suite.
//!
//! Ten cases in four groups covering character validation, monster lookup,
//! battle simulation and the example character template.

use combat_probe_domain::request::RequestSpec;
use combat_probe_domain::{
    Assertion, BattleResult, Character, FieldCasing, Monster, MonsterNames, ProbeSettings,
    TestCase, TestSuite, UnknownMonsterStatus,
};
use serde_json::json;

/// Group names used by the built-in suite.
pub mod groups {
    /// Character validation.
    pub const CHARACTERS: &str = "characters";
    /// Monster listing and lookup.
    pub const MONSTERS: &str = "monsters";
    /// Battle simulation.
    pub const BATTLES: &str = "battles";
    /// Example character template.
    pub const EXAMPLE: &str = "example";
}

const SUITE_NAME: &str = "D&D Combat API";
const INVALID_CHARACTER: &str = "Invalid character data";
const NEGATIVE_STRENGTH: &str = "Strength cannot be negative";
const MONSTER_NOT_FOUND: &str = "Monster not found";

/// Knobs for the parts of the API contract that have been observed to vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatSuiteOptions {
    /// Wire spelling of `hitPoints`/`armorClass`.
    pub casing: FieldCasing,
    /// Expected status for unknown monsters.
    pub unknown_monster_status: UnknownMonsterStatus,
    /// Page of the monster listing to request.
    pub monster_page: u32,
    /// A monster the API has.
    pub known_monster: String,
    /// A monster the API does not have.
    pub unknown_monster: String,
    /// Skip remaining cases after the first failure.
    pub stop_on_failure: bool,
}

impl Default for CombatSuiteOptions {
    fn default() -> Self {
        Self::from(&ProbeSettings::default())
    }
}

impl From<&ProbeSettings> for CombatSuiteOptions {
    fn from(settings: &ProbeSettings) -> Self {
        Self {
            casing: settings.field_casing,
            unknown_monster_status: settings.unknown_monster_status,
            monster_page: settings.monster_page,
            known_monster: settings.known_monster.clone(),
            unknown_monster: settings.unknown_monster.clone(),
            stop_on_failure: settings.stop_on_failure,
        }
    }
}

/// Builds the built-in suite.
#[must_use]
pub fn combat_suite(options: &CombatSuiteOptions) -> TestSuite {
    let mut suite = TestSuite::new(SUITE_NAME);
    suite.stop_on_failure = options.stop_on_failure;

    for case in character_cases(options)
        .into_iter()
        .chain(monster_cases(options))
        .chain(battle_cases(options))
        .chain(example_cases(options))
    {
        suite.add(case);
    }
    suite
}

fn character_cases(options: &CombatSuiteOptions) -> Vec<TestCase> {
    let kaya = Character::sample();
    let check = "/api/characters/check";

    vec![
        TestCase::new(
            groups::CHARACTERS,
            "Validates a character with correct data",
            RequestSpec::post(check).with_json(kaya.to_json(options.casing)),
        )
        .expect(Assertion::status(200))
        .expect(Assertion::json_path_eq("$.valid", json!(true))),
        TestCase::new(
            groups::CHARACTERS,
            "Rejects a character with incomplete data",
            RequestSpec::post(check).with_json(kaya.to_incomplete_json()),
        )
        .expect(Assertion::status(400))
        .expect(Assertion::body_contains(INVALID_CHARACTER)),
        TestCase::new(
            groups::CHARACTERS,
            "Rejects a character with negative strength",
            RequestSpec::post(check).with_json(kaya.with_strength(-1).to_json(options.casing)),
        )
        .expect(Assertion::status(400))
        .expect(Assertion::body_contains(NEGATIVE_STRENGTH)),
    ]
}

fn monster_cases(options: &CombatSuiteOptions) -> Vec<TestCase> {
    vec![
        TestCase::new(
            groups::MONSTERS,
            "Lists monster names",
            RequestSpec::get(format!("/api/monsters/names/{}", options.monster_page)),
        )
        .expect(Assertion::status(200))
        .expect(Assertion::JsonSchema {
            schema: MonsterNames::json_schema(),
        }),
        TestCase::new(
            groups::MONSTERS,
            "Returns monster details",
            RequestSpec::get(monster_path(&options.known_monster)),
        )
        .expect(Assertion::status(200))
        .expect(Assertion::JsonSchema {
            schema: Monster::json_schema(options.casing),
        }),
        TestCase::new(
            groups::MONSTERS,
            "Reports an unknown monster",
            RequestSpec::get(monster_path(&options.unknown_monster)),
        )
        .expect(Assertion::StatusCode {
            expected: options.unknown_monster_status.expectation(),
        })
        .expect(Assertion::body_contains(MONSTER_NOT_FOUND)),
    ]
}

fn battle_cases(options: &CombatSuiteOptions) -> Vec<TestCase> {
    let kaya = Character::sample();

    vec![
        TestCase::new(
            groups::BATTLES,
            "Simulates a battle",
            RequestSpec::post(battle_path(&options.known_monster))
                .with_json(kaya.to_json(options.casing)),
        )
        .expect(Assertion::status(200))
        .expect(Assertion::body_contains("winner"))
        .expect(Assertion::JsonSchema {
            schema: BattleResult::json_schema(),
        }),
        TestCase::new(
            groups::BATTLES,
            "Rejects a battle with an invalid character",
            RequestSpec::post(battle_path(&options.known_monster))
                .with_json(kaya.clone().with_strength(-10).to_json(options.casing)),
        )
        .expect(Assertion::status(400))
        .expect(Assertion::body_contains(INVALID_CHARACTER)),
        TestCase::new(
            groups::BATTLES,
            "Rejects a battle against an unknown monster",
            RequestSpec::post(battle_path(&options.unknown_monster))
                .with_json(kaya.to_json(options.casing)),
        )
        .expect(Assertion::StatusCode {
            expected: options.unknown_monster_status.expectation(),
        })
        .expect(Assertion::body_contains(MONSTER_NOT_FOUND)),
    ]
}

fn example_cases(options: &CombatSuiteOptions) -> Vec<TestCase> {
    vec![
        TestCase::new(
            groups::EXAMPLE,
            "Returns the character template",
            RequestSpec::get("/api/characters/example"),
        )
        .expect(Assertion::status(200))
        .expect(Assertion::JsonEquals {
            expected: Character::sample().to_json(options.casing),
        }),
    ]
}

fn monster_path(name: &str) -> String {
    format!("/api/monsters/{}", urlencoding::encode(name))
}

fn battle_path(name: &str) -> String {
    format!("/api/battle/{}", urlencoding::encode(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_probe_domain::StatusExpectation;
    use combat_probe_domain::request::HttpMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_suite_layout() {
        let suite = combat_suite(&CombatSuiteOptions::default());
        assert_eq!(suite.len(), 10);
        assert_eq!(
            suite.groups(),
            vec![groups::CHARACTERS, groups::MONSTERS, groups::BATTLES, groups::EXAMPLE]
        );

        let endpoints: Vec<_> = suite
            .cases
            .iter()
            .map(|c| format!("{} {}", c.request.method, c.request.path))
            .collect();
        assert_eq!(
            endpoints,
            vec![
                "POST /api/characters/check",
                "POST /api/characters/check",
                "POST /api/characters/check",
                "GET /api/monsters/names/1",
                "GET /api/monsters/Goblin",
                "GET /api/monsters/UnknownMonster",
                "POST /api/battle/Goblin",
                "POST /api/battle/Goblin",
                "POST /api/battle/UnknownMonster",
                "GET /api/characters/example",
            ]
        );
    }

    #[test]
    fn test_every_case_checks_status_first() {
        let suite = combat_suite(&CombatSuiteOptions::default());
        for case in &suite.cases {
            assert!(
                matches!(case.assertions.first(), Some(Assertion::StatusCode { .. })),
                "{} does not start with a status check",
                case.name
            );
        }
    }

    #[test]
    fn test_unknown_monster_policy_is_applied() {
        let options = CombatSuiteOptions {
            unknown_monster_status: UnknownMonsterStatus::NotFound,
            ..Default::default()
        };
        let suite = combat_suite(&options);
        let unknown: Vec<_> = suite
            .cases
            .iter()
            .filter(|c| c.request.path.ends_with("UnknownMonster"))
            .collect();
        assert_eq!(unknown.len(), 2);
        for case in unknown {
            assert_eq!(
                case.assertions[0],
                Assertion::StatusCode {
                    expected: StatusExpectation::Exact(404)
                }
            );
        }
    }

    #[test]
    fn test_snake_casing_reaches_bodies_and_schemas() {
        let options = CombatSuiteOptions {
            casing: FieldCasing::Snake,
            ..Default::default()
        };
        let suite = combat_suite(&options);

        let valid = &suite.cases[0];
        let body = valid.request.body.as_ref().map(|b| b["hit_points"].clone());
        assert_eq!(body, Some(json!(11)));

        let example = &suite.cases[9];
        assert_eq!(
            example.assertions[1],
            Assertion::JsonEquals {
                expected: Character::sample().to_json(FieldCasing::Snake)
            }
        );
    }

    #[test]
    fn test_incomplete_and_negative_payloads() {
        let suite = combat_suite(&CombatSuiteOptions::default());
        let incomplete = suite.cases[1].request.body.clone().unwrap_or_default();
        assert!(incomplete.get("hitPoints").is_none());
        assert!(incomplete.get("armorClass").is_none());

        let negative = suite.cases[2].request.body.clone().unwrap_or_default();
        assert_eq!(negative["strength"], json!(-1));

        let invalid_battle = suite.cases[7].request.body.clone().unwrap_or_default();
        assert_eq!(invalid_battle["strength"], json!(-10));
    }

    #[test]
    fn test_monster_names_are_path_encoded() {
        let options = CombatSuiteOptions {
            known_monster: "Young Red Dragon".to_string(),
            ..Default::default()
        };
        let suite = combat_suite(&options);
        assert_eq!(suite.cases[4].request.path, "/api/monsters/Young%20Red%20Dragon");
        assert_eq!(suite.cases[4].request.method, HttpMethod::Get);
        assert_eq!(suite.cases[6].request.path, "/api/battle/Young%20Red%20Dragon");
    }

    #[test]
    fn test_options_from_settings() {
        let settings = ProbeSettings {
            monster_page: 3,
            stop_on_failure: true,
            ..Default::default()
        };
        let suite = combat_suite(&CombatSuiteOptions::from(&settings));
        assert!(suite.stop_on_failure);
        assert_eq!(suite.cases[3].request.path, "/api/monsters/names/3");
    }
}
