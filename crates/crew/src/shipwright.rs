use serde::{Deserialize, Serialize};

use fleetroster_core::{Check, FieldKind, FieldSpec, RecordId, Rule};

use crate::CrewResource;
use crate::common::{PIRATE_NAME, SHIP};

/// A shipwright, responsible for repair and maintenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipwright {
    pub id: RecordId,
    pub name: String,
    pub total_hours_worked: i64,
    pub years_of_exp: i64,
    pub fav_tool: String,
    pub ship: String,
}

const FIELDS: &[FieldSpec] = &[
    PIRATE_NAME,
    FieldSpec {
        name: "totalHoursWorked",
        kind: FieldKind::Integer,
        checks: &[
            Check::new(Rule::Required, "Total hours worked for repair and maintenance is required"),
            Check::new(Rule::Positive, "Total hours worked for repair and maintenance should be positive"),
            Check::new(
                Rule::Min(1),
                "Total hours worked for repair and maintenance must be 1 hour or greater",
            ),
            Check::new(
                Rule::Max(25_000),
                "Total hours worked for repair and maintenance must be 25,000 hours or less",
            ),
        ],
    },
    FieldSpec {
        name: "yearsOfExp",
        kind: FieldKind::Integer,
        checks: &[
            Check::new(Rule::Required, "Years of experience is required"),
            Check::new(Rule::Positive, "Years of experience should be positive"),
            Check::new(Rule::Min(1), "Years of experience must be 1 year or greater"),
            Check::new(
                Rule::Max(50),
                "Years of experience must be 50 or less, we do not need an old man for a physically demanding job",
            ),
        ],
    },
    FieldSpec {
        name: "favTool",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Favourite tool is required"),
            Check::new(Rule::Length { min: 1, max: 20 }, "Favourite tool must be 1 to 20 characters"),
        ],
    },
    SHIP,
];

impl CrewResource for Shipwright {
    const KIND: &'static str = "shipwright";
    const TABLE: &'static str = "shipwright";
    const FIELDS: &'static [FieldSpec] = FIELDS;

    fn id(&self) -> RecordId {
        self.id
    }
}
