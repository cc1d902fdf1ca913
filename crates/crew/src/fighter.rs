use serde::{Deserialize, Serialize};

use fleetroster_core::{Check, FieldKind, FieldSpec, RecordId, Rule};

use crate::CrewResource;
use crate::common::{PIRATE_NAME, SHIP};

pub const RANKS: &[&str] = &["Vice-Captain", "Crew", "Master-at-Arms"];

/// A fighting crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fighter {
    pub id: RecordId,
    pub name: String,
    pub rank: String,
    pub strength: i64,
    pub weapon: String,
    pub ship: String,
}

const FIELDS: &[FieldSpec] = &[
    PIRATE_NAME,
    FieldSpec {
        name: "rank",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Rank is required"),
            Check::new(
                Rule::OneOf(RANKS),
                "Rank must be either Vice-Captain, Crew, or Master-at-Arms (upper cases and lower cases matter)",
            ),
            Check::new(Rule::Matches(r"^[A-Z].{1,20}"), "Rank must start with a capital letter"),
        ],
    },
    FieldSpec {
        name: "strength",
        kind: FieldKind::Integer,
        checks: &[
            Check::new(Rule::Required, "Strength level is required"),
            Check::new(Rule::Positive, "Strength level should be positive"),
            Check::new(Rule::Min(1), "Strength must be 1 or greater"),
            Check::new(Rule::Max(100), "Strength must be 100 or less"),
        ],
    },
    FieldSpec {
        name: "weapon",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Weapon is required"),
            Check::new(Rule::Length { min: 1, max: 20 }, "Weapon must be 1 to 20 characters"),
        ],
    },
    SHIP,
];

impl CrewResource for Fighter {
    const KIND: &'static str = "fighter";
    const TABLE: &'static str = "fighter";
    const FIELDS: &'static [FieldSpec] = FIELDS;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_new;
    use serde_json::json;

    #[test]
    fn rank_is_case_sensitive() {
        let err = validate_new::<Fighter>(&json!({
            "name": "Zoro",
            "rank": "vice-captain",
            "strength": 95,
            "weapon": "Katana",
            "ship": "Going Merry",
        }))
        .unwrap_err();
        assert_eq!(err.violations()[0].property, "rank");
        assert!(err.violations()[0].message[0].starts_with("Rank must be either"));
    }

    #[test]
    fn strength_bounds() {
        for (strength, ok) in [(0, false), (1, true), (100, true), (101, false)] {
            let res = validate_new::<Fighter>(&json!({
                "name": "Zoro",
                "rank": "Crew",
                "strength": strength,
                "weapon": "Katana",
                "ship": "Going Merry",
            }));
            assert_eq!(res.is_ok(), ok, "strength {strength}");
        }
    }
}
