//! Declarative field validation.
//!
//! Entities describe their fields as a static table of [`FieldSpec`]s, each
//! carrying an ordered list of [`Check`]s. [`validate_object`] evaluates a raw
//! JSON object against that table:
//!
//! - properties that are not declared (other than [`ID_FIELD`]) are rejected;
//! - checks on a field run in declared order and stop at the first failure,
//!   so each offending property reports exactly one message;
//! - violations are reported in field declaration order.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the generated identifier property every record carries.
pub const ID_FIELD: &str = "id";

/// Storage/wire type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
}

/// A single constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, non-null, and not an empty string.
    Required,
    /// String whose char count lies in `min..=max`.
    Length { min: usize, max: usize },
    /// String matching the regex.
    Matches(&'static str),
    /// String equal (case-sensitive) to one of the values.
    OneOf(&'static [&'static str]),
    /// Integer greater than zero.
    Positive,
    /// Integer greater than or equal to the bound.
    Min(i64),
    /// Integer less than or equal to the bound.
    Max(i64),
    /// String holding a valid `YYYY-MM-DD` date.
    IsoDate,
}

/// A rule paired with the message reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    pub rule: Rule,
    pub message: &'static str,
}

impl Check {
    pub const fn new(rule: Rule, message: &'static str) -> Self {
        Self { rule, message }
    }
}

/// Declaration of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub checks: &'static [Check],
}

/// A failed property and its messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub property: String,
    pub message: Vec<String>,
}

impl Violation {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: vec![message.into()],
        }
    }
}

impl Rule {
    /// Whether `value` satisfies this rule.
    ///
    /// Non-`Required` rules treat a value of the wrong JSON type as a failure.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        match self {
            Rule::Required => match value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Rule::Length { min, max } => as_str(value)
                .map(|s| (*min..=*max).contains(&s.chars().count()))
                .unwrap_or(false),
            Rule::Matches(pattern) => as_str(value)
                .and_then(|s| compiled(pattern).ok().map(|re| re.is_match(s)))
                .unwrap_or(false),
            Rule::OneOf(values) => as_str(value)
                .map(|s| values.contains(&s))
                .unwrap_or(false),
            Rule::Positive => as_int(value).map(|n| n > 0).unwrap_or(false),
            Rule::Min(min) => as_int(value).map(|n| n >= *min).unwrap_or(false),
            Rule::Max(max) => as_int(value).map(|n| n <= *max).unwrap_or(false),
            Rule::IsoDate => as_str(value)
                .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
                .unwrap_or(false),
        }
    }
}

fn as_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

fn as_int(value: Option<&Value>) -> Option<i64> {
    value.and_then(integral)
}

/// Integers, plus floats with no fractional part (`7.0`).
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

static PATTERNS: LazyLock<RwLock<HashMap<&'static str, Regex>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Compile a `Matches` pattern once and reuse it afterwards.
fn compiled(pattern: &'static str) -> Result<Regex, regex::Error> {
    if let Ok(cache) = PATTERNS.read() {
        if let Some(re) = cache.get(pattern) {
            return Ok(re.clone());
        }
    }

    let re = Regex::new(pattern)?;
    if let Ok(mut cache) = PATTERNS.write() {
        cache.insert(pattern, re.clone());
    }
    Ok(re)
}

/// Compile every `Matches` pattern in a field table.
///
/// A table whose pattern does not compile would reject every value for that
/// field, so callers check their tables up front.
pub fn compile_patterns(fields: &[FieldSpec]) -> Result<(), regex::Error> {
    for check in fields.iter().flat_map(|f| f.checks) {
        if let Rule::Matches(pattern) = check.rule {
            compiled(pattern)?;
        }
    }
    Ok(())
}

/// Rewrite integral floats on `Integer` fields as JSON integers.
pub fn normalize_integers(fields: &[FieldSpec], object: &mut Map<String, Value>) {
    for field in fields.iter().filter(|f| f.kind == FieldKind::Integer) {
        if let Some(value) = object.get_mut(field.name) {
            if value.is_f64() {
                if let Some(n) = integral(value) {
                    *value = Value::from(n);
                }
            }
        }
    }
}

/// Validate a JSON object against a field table.
///
/// Returns an empty vector when the object is acceptable.
pub fn validate_object(fields: &[FieldSpec], object: &Map<String, Value>) -> Vec<Violation> {
    let mut violations = Vec::new();

    for field in fields {
        let value = object.get(field.name);
        let optional = !field.checks.iter().any(|c| c.rule == Rule::Required);
        if optional && matches!(value, None | Some(Value::Null)) {
            continue;
        }

        if let Some(check) = field.checks.iter().find(|c| !c.rule.accepts(value)) {
            violations.push(Violation::new(field.name, check.message));
        }
    }

    for key in object.keys() {
        if key != ID_FIELD && !fields.iter().any(|f| f.name == key.as_str()) {
            violations.push(Violation::new(
                key.as_str(),
                format!("property {key} should not exist"),
            ));
        }
    }

    violations
}
