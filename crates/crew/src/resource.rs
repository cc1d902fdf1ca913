use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use fleetroster_core::{
    DomainError, DomainResult, FieldSpec, ID_FIELD, RecordId, Violation, normalize_integers,
    validate_object,
};

/// A crew record kind exposed as a CRUD resource.
///
/// The field table is the single source of truth: it drives request
/// validation, the storage schema, and which columns `sortBy` may name.
pub trait CrewResource: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Singular, lowercase name used in messages ("fighter").
    const KIND: &'static str;

    /// Storage table name.
    const TABLE: &'static str;

    /// Declared fields, excluding the generated `id`.
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> RecordId;

    /// Whether `column` names a stored column (including `id`).
    fn has_column(column: &str) -> bool {
        column == ID_FIELD || Self::FIELDS.iter().any(|f| f.name == column)
    }
}

fn body_object(body: &Value) -> DomainResult<&Map<String, Value>> {
    body.as_object().ok_or_else(|| {
        DomainError::Validation(vec![Violation::new(
            "body",
            "request body must be a JSON object",
        )])
    })
}

fn into_record<R: CrewResource>(object: Map<String, Value>) -> DomainResult<R> {
    serde_json::from_value(Value::Object(object))
        .map_err(|e| DomainError::Validation(vec![Violation::new("body", e.to_string())]))
}

/// Validate a create payload and build the record under a fresh identifier.
///
/// A client-supplied `id` is accepted by the whitelist but never used.
pub fn validate_new<R: CrewResource>(body: &Value) -> DomainResult<R> {
    let mut object = body_object(body)?.clone();
    normalize_integers(R::FIELDS, &mut object);

    let violations = validate_object(R::FIELDS, &object);
    if !violations.is_empty() {
        return Err(DomainError::Validation(violations));
    }

    object.insert(ID_FIELD.to_string(), Value::String(RecordId::new().to_string()));
    into_record(object)
}

/// Require the body `id` to be present and equal to the addressed id.
///
/// Compared as raw strings, before the path id is parsed or looked up.
pub fn ensure_body_id(path_id: &str, body: &Value) -> DomainResult<()> {
    let body_id = body.get(ID_FIELD).and_then(Value::as_str);
    if body_id == Some(path_id) {
        Ok(())
    } else {
        Err(DomainError::IdMismatch {
            path: path_id.to_string(),
            body: body.get(ID_FIELD).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        })
    }
}

/// Overlay an update payload on a stored record and re-validate the result.
///
/// The stored identifier always survives the merge.
pub fn merge_update<R: CrewResource>(existing: &R, body: &Value) -> DomainResult<R> {
    let patch = body_object(body)?;

    let mut merged = match serde_json::to_value(existing) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    normalize_integers(R::FIELDS, &mut merged);

    let violations = validate_object(R::FIELDS, &merged);
    if !violations.is_empty() {
        return Err(DomainError::Validation(violations));
    }

    merged.insert(ID_FIELD.to_string(), Value::String(existing.id().to_string()));
    into_record(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Deceased, Doctor, Fighter, Shipwright};
    use fleetroster_core::compile_patterns;
    use serde_json::json;

    fn fighter_body() -> Value {
        json!({
            "name": "Zoro",
            "rank": "Vice-Captain",
            "strength": 95,
            "weapon": "Three swords",
            "ship": "Thousand Sunny",
        })
    }

    #[test]
    fn validate_new_assigns_fresh_id() {
        let mut body = fighter_body();
        body["id"] = json!("client-chosen");
        let f: Fighter = validate_new(&body).unwrap();
        assert_ne!(f.id.to_string(), "client-chosen");
        assert_eq!(f.name, "Zoro");
    }

    #[test]
    fn validate_new_reports_offending_property() {
        let mut body = fighter_body();
        body["ship"] = json!("Flying Dutchman");
        let err = validate_new::<Fighter>(&body).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].property, "ship");
    }

    #[test]
    fn non_object_body_is_a_validation_failure() {
        let err = validate_new::<Fighter>(&json!([1, 2])).unwrap_err();
        assert_eq!(err.violations()[0].property, "body");
    }

    #[test]
    fn body_id_must_match_path() {
        assert!(ensure_body_id("abc", &json!({"id": "abc"})).is_ok());

        let err = ensure_body_id("abc", &json!({"id": "xyz"})).unwrap_err();
        assert_eq!(
            err,
            DomainError::IdMismatch { path: "abc".into(), body: Some("xyz".into()) }
        );

        let err = ensure_body_id("abc", &json!({"name": "Zoro"})).unwrap_err();
        assert!(matches!(err, DomainError::IdMismatch { body: None, .. }));
    }

    #[test]
    fn merge_update_overlays_and_keeps_id() {
        let existing: Fighter = validate_new(&fighter_body()).unwrap();
        let patch = json!({"id": existing.id.to_string(), "strength": 99});
        let updated = merge_update(&existing, &patch).unwrap();
        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.strength, 99);
        assert_eq!(updated.weapon, "Three swords");
    }

    #[test]
    fn merge_update_revalidates() {
        let existing: Fighter = validate_new(&fighter_body()).unwrap();
        let patch = json!({"id": existing.id.to_string(), "strength": 101, "mood": "grumpy"});
        let err = merge_update(&existing, &patch).unwrap_err();
        let props: Vec<_> = err.violations().iter().map(|v| v.property.as_str()).collect();
        assert_eq!(props, ["strength", "mood"]);
    }

    #[test]
    fn integral_float_updates_are_stored_as_integers() {
        let existing: Fighter = validate_new(&fighter_body()).unwrap();
        let patch = json!({"id": existing.id.to_string(), "strength": 7.0});
        let updated = merge_update(&existing, &patch).unwrap();
        assert_eq!(updated.strength, 7);
    }

    #[test]
    fn every_declared_pattern_compiles() {
        for (kind, fields) in [
            (Fighter::KIND, Fighter::FIELDS),
            (Doctor::KIND, Doctor::FIELDS),
            (Shipwright::KIND, Shipwright::FIELDS),
            (Deceased::KIND, Deceased::FIELDS),
        ] {
            assert!(compile_patterns(fields).is_ok(), "{kind}");
        }
    }

    #[test]
    fn has_column_covers_id_and_fields() {
        assert!(Fighter::has_column("id"));
        assert!(Fighter::has_column("strength"));
        assert!(!Fighter::has_column("strength; DROP TABLE fighter"));
    }
}
