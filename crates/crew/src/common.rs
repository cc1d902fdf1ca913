//! Field declarations shared by every crew kind.

use fleetroster_core::{Check, FieldKind, FieldSpec, Rule};

/// Ships of the fleet (case-sensitive).
pub const SHIPS: &[&str] = &["Black Pearl", "Thousand Sunny", "Going Merry"];

pub(crate) const SHIP: FieldSpec = FieldSpec {
    name: "ship",
    kind: FieldKind::Text,
    checks: &[
        Check::new(Rule::Required, "Ship name is required"),
        Check::new(
            Rule::OneOf(SHIPS),
            "Ship must be either Black Pearl, Thousand Sunny, or Going Merry (upper cases and lower cases matter)",
        ),
        Check::new(Rule::Matches(r"^[A-Z].{1,20}"), "Ship must start with a capital letter"),
    ],
};

/// `name` field for living crew members.
pub(crate) const PIRATE_NAME: FieldSpec = FieldSpec {
    name: "name",
    kind: FieldKind::Text,
    checks: &[
        Check::new(Rule::Required, "Pirate name is required"),
        Check::new(Rule::Length { min: 1, max: 30 }, "Pirate name must be 1 to 30 characters"),
        Check::new(
            Rule::Matches(r"^[A-Z][\s\S]{0,29}$"),
            "Pirate name must start with a capital letter",
        ),
    ],
};
