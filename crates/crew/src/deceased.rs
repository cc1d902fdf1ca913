use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fleetroster_core::{Check, FieldKind, FieldSpec, RecordId, Rule};

use crate::CrewResource;
use crate::common::SHIP;

pub const CREW_TYPES: &[&str] = &["Fighter", "Doctor", "Shipwright"];

/// Memorial record for a fallen crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deceased {
    pub id: RecordId,
    pub name: String,
    pub crew_type: String,
    pub cause_of_death: String,
    pub date: NaiveDate,
    pub ship: String,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Deceased name is required"),
            Check::new(Rule::Length { min: 1, max: 30 }, "Deceased name must be 1 to 30 characters"),
            Check::new(
                Rule::Matches(r"^[A-Z][\s\S]{0,29}$"),
                "Deceased name must start with a capital letter",
            ),
        ],
    },
    FieldSpec {
        name: "crewType",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Crew type is required"),
            Check::new(
                Rule::OneOf(CREW_TYPES),
                "Crew type must be either Fighter, Doctor, or Shipwright (upper cases and lower cases matter)",
            ),
            Check::new(Rule::Matches(r"^[A-Z].{1,20}"), "Crew type must start with a capital letter"),
        ],
    },
    FieldSpec {
        name: "causeOfDeath",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Cause of death is required"),
            Check::new(Rule::Length { min: 1, max: 30 }, "Cause of death must be 1 to 30 characters"),
        ],
    },
    FieldSpec {
        name: "date",
        kind: FieldKind::Date,
        checks: &[
            Check::new(Rule::Required, "Date of death is required"),
            Check::new(Rule::IsoDate, "Date of death must be a valid date (YYYY-MM-DD)"),
        ],
    },
    SHIP,
];

impl CrewResource for Deceased {
    const KIND: &'static str = "deceased";
    const TABLE: &'static str = "deceased";
    const FIELDS: &'static [FieldSpec] = FIELDS;

    fn id(&self) -> RecordId {
        self.id
    }
}
