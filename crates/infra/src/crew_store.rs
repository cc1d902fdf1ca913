//! Generic repository for crew records.
//!
//! Column lists come from the record's static field table, so every
//! identifier spliced into SQL is either a compile-time constant or has been
//! checked against that table. Values are always bound.

use std::marker::PhantomData;

use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Arguments, Row, SqlitePool};

use fleetroster_core::{FieldKind, ID_FIELD, RecordId};
use fleetroster_crew::CrewResource;

use crate::db::{Database, StoreError};

/// Listing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Column to sort by; unknown columns fall back to `id`.
    pub sort_by: Option<String>,
    pub descending: bool,
    /// Substring matched against every column (OR-ed).
    pub ship: Option<String>,
}

pub struct CrewStore<R> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for CrewStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

enum ColumnValue {
    Text(String),
    Integer(i64),
}

impl<R: CrewResource> CrewStore<R> {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
            _record: PhantomData,
        }
    }

    fn columns() -> Vec<&'static str> {
        std::iter::once(ID_FIELD)
            .chain(R::FIELDS.iter().map(|f| f.name))
            .collect()
    }

    fn select_list() -> String {
        Self::columns()
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<R>, StoreError> {
        let sort_column = query
            .sort_by
            .as_deref()
            .filter(|c| R::has_column(c))
            .unwrap_or(ID_FIELD);
        let direction = if query.descending { "DESC" } else { "ASC" };

        let mut sql = format!("SELECT {} FROM \"{}\"", Self::select_list(), R::TABLE);
        let mut args = SqliteArguments::default();

        if let Some(ship) = query.ship.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{ship}%");
            let predicates = Self::columns()
                .iter()
                .map(|c| format!("\"{c}\" LIKE ?"))
                .collect::<Vec<_>>()
                .join(" OR ");
            sql.push_str(&format!(" WHERE {predicates}"));
            for _ in Self::columns() {
                args.add(pattern.clone()).map_err(|e| StoreError::Encode(e.to_string()))?;
            }
        }
        sql.push_str(&format!(" ORDER BY \"{sort_column}\" {direction}"));

        let rows = sqlx::query_with(&sql, args).fetch_all(&self.pool).await?;
        rows.iter().map(Self::decode).collect()
    }

    pub async fn get(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        let sql = format!(
            "SELECT {} FROM \"{}\" WHERE \"{ID_FIELD}\" = ?",
            Self::select_list(),
            R::TABLE
        );
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::decode).transpose()
    }

    pub async fn insert(&self, record: &R) -> Result<(), StoreError> {
        let columns = Self::columns();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({placeholders})",
            R::TABLE,
            Self::select_list()
        );

        let mut args = SqliteArguments::default();
        add_arg(&mut args, ColumnValue::Text(record.id().to_string()))?;
        for value in Self::field_values(record)? {
            add_arg(&mut args, value)?;
        }

        sqlx::query_with(&sql, args).execute(&self.pool).await?;
        Ok(())
    }

    /// Overwrite every field of the stored record; returns whether a row matched.
    pub async fn update(&self, record: &R) -> Result<bool, StoreError> {
        let assignments = R::FIELDS
            .iter()
            .map(|f| format!("\"{}\" = ?", f.name))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE \"{}\" SET {assignments} WHERE \"{ID_FIELD}\" = ?",
            R::TABLE
        );

        let mut args = SqliteArguments::default();
        for value in Self::field_values(record)? {
            add_arg(&mut args, value)?;
        }
        add_arg(&mut args, ColumnValue::Text(record.id().to_string()))?;

        let result = sqlx::query_with(&sql, args).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns whether a row was deleted.
    pub async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE \"{ID_FIELD}\" = ?", R::TABLE);
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn field_values(record: &R) -> Result<Vec<ColumnValue>, StoreError> {
        let object = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(StoreError::Encode(format!("{} is not an object", R::KIND))),
            Err(e) => return Err(StoreError::Encode(e.to_string())),
        };

        R::FIELDS
            .iter()
            .map(|f| {
                let value = object.get(f.name);
                let column = match f.kind {
                    FieldKind::Text | FieldKind::Date => value
                        .and_then(Value::as_str)
                        .map(|s| ColumnValue::Text(s.to_string())),
                    FieldKind::Integer => value.and_then(Value::as_i64).map(ColumnValue::Integer),
                };
                column.ok_or_else(|| {
                    StoreError::Encode(format!("{}.{} missing or mistyped", R::KIND, f.name))
                })
            })
            .collect()
    }

    fn decode(row: &SqliteRow) -> Result<R, StoreError> {
        let mut object = Map::new();
        let id: String = row.try_get(ID_FIELD)?;
        object.insert(ID_FIELD.to_string(), Value::String(id));

        for f in R::FIELDS {
            let value = match f.kind {
                FieldKind::Text | FieldKind::Date => Value::String(row.try_get::<String, _>(f.name)?),
                FieldKind::Integer => Value::from(row.try_get::<i64, _>(f.name)?),
            };
            object.insert(f.name.to_string(), value);
        }

        serde_json::from_value(Value::Object(object)).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

fn add_arg(args: &mut SqliteArguments<'_>, value: ColumnValue) -> Result<(), StoreError> {
    let added = match value {
        ColumnValue::Text(s) => args.add(s),
        ColumnValue::Integer(n) => args.add(n),
    };
    added.map_err(|e| StoreError::Encode(e.to_string()))
}
