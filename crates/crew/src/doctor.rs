use serde::{Deserialize, Serialize};

use fleetroster_core::{Check, FieldKind, FieldSpec, RecordId, Rule};

use crate::CrewResource;
use crate::common::{PIRATE_NAME, SHIP};

/// A ship's doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: RecordId,
    pub name: String,
    pub age: i64,
    pub speciality: String,
    pub years_of_exp: i64,
    pub fav_remedy: String,
    pub ship: String,
}

const FIELDS: &[FieldSpec] = &[
    PIRATE_NAME,
    FieldSpec {
        name: "age",
        kind: FieldKind::Integer,
        checks: &[
            Check::new(Rule::Required, "Age is required"),
            Check::new(Rule::Positive, "Age should be positive"),
            Check::new(Rule::Min(20), "Age must be 20 or greater, you are too young boy!"),
            Check::new(Rule::Max(70), "Age must be 70 or less, please retire"),
        ],
    },
    FieldSpec {
        name: "speciality",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Speciality is required"),
            Check::new(Rule::Length { min: 1, max: 20 }, "Speciality must be 1 to 20 characters"),
        ],
    },
    FieldSpec {
        name: "yearsOfExp",
        kind: FieldKind::Integer,
        checks: &[
            Check::new(Rule::Required, "Years of experience is required"),
            Check::new(Rule::Positive, "Years of experience should be positive"),
            Check::new(Rule::Min(2), "Years of experience must be 2 years or greater"),
            Check::new(Rule::Max(50), "Years of experience must be 50 or less, please retire"),
        ],
    },
    FieldSpec {
        name: "favRemedy",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Favourite remedy is required"),
            Check::new(Rule::Length { min: 1, max: 20 }, "Favourite remedy must be 1 to 20 characters"),
        ],
    },
    SHIP,
];

impl CrewResource for Doctor {
    const KIND: &'static str = "doctor";
    const TABLE: &'static str = "doctor";
    const FIELDS: &'static [FieldSpec] = FIELDS;

    fn id(&self) -> RecordId {
        self.id
    }
}
