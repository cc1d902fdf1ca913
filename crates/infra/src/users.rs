//! User records: the credential table behind bearer-token authentication.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use fleetroster_auth::{AccessLevel, CredentialError, CredentialStore, ParseAccessLevelError, Principal};
use fleetroster_core::{Check, DomainError, FieldKind, FieldSpec, Rule, UserId, validate_object};

use crate::db::{Database, StoreError};

pub(crate) const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (\
    id TEXT PRIMARY KEY NOT NULL, \
    username TEXT NOT NULL UNIQUE, \
    password TEXT NOT NULL, \
    token TEXT NOT NULL UNIQUE, \
    access_level TEXT NOT NULL)";

const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "username",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Username is required"),
            Check::new(Rule::Length { min: 1, max: 30 }, "Username must be 1-30 characters"),
        ],
    },
    FieldSpec {
        name: "password",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Password is required"),
            Check::new(Rule::Length { min: 1, max: 100 }, "Password must be 1-100 characters"),
        ],
    },
    FieldSpec {
        name: "token",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Token is required"),
            Check::new(Rule::Length { min: 1, max: 30 }, "Token must be 1-30 characters"),
        ],
    },
    FieldSpec {
        name: "accessLevel",
        kind: FieldKind::Text,
        checks: &[
            Check::new(Rule::Required, "Access level is required"),
            Check::new(
                Rule::OneOf(&["write", "read"]),
                "Access level must be either write or read (all lower case)",
            ),
        ],
    },
];

/// A stored credential holder. `password_hash` is a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub token: String,
    pub access_level: AccessLevel,
}

/// Input for creating a user; `password` is already hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub token: String,
    pub access_level: AccessLevel,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), DomainError> {
        let object = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        let violations = validate_object(USER_FIELDS, &object);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(violations))
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password, token, access_level FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Insert unless the username is already taken; returns whether a row was written.
    pub async fn insert_if_absent(&self, user: &NewUser) -> Result<bool, StoreError> {
        user.validate()?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (id, username, password, token, access_level) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(UserId::new().to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.token)
        .bind(user.access_level.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn user_from_row(row: &SqliteRow) -> Result<UserRecord, StoreError> {
    let id: String = row.try_get("id")?;
    let level: String = row.try_get("access_level")?;
    Ok(UserRecord {
        id: id.parse().map_err(|e: DomainError| StoreError::Decode(e.to_string()))?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password")?,
        token: row.try_get("token")?,
        access_level: level
            .parse()
            .map_err(|e: ParseAccessLevelError| StoreError::Decode(e.to_string()))?,
    })
}

/// [`CredentialStore`] backed by the `users` table.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn resolve(&self, token: &str) -> Result<Option<Principal>, CredentialError> {
        let row = sqlx::query("SELECT access_level FROM users WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CredentialError::Backend(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let level: String = row
            .try_get("access_level")
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        let level = level
            .parse::<AccessLevel>()
            .map_err(|e| CredentialError::InvalidAccessLevel(e.0))?;

        Ok(Some(Principal::new(token, level)))
    }
}

/// Bootstrap accounts: one write-level and one read-level user.
pub fn default_users() -> Vec<NewUser> {
    vec![
        NewUser {
            username: "userwrite".to_string(),
            password_hash: "$2b$10$sYjW5psdx3pS8olV76F5/uTXxBktcHQkHuN6zamciFTit97A20XZW".to_string(),
            token: "iHaveWriteAccessLevel".to_string(),
            access_level: AccessLevel::Write,
        },
        NewUser {
            username: "userread".to_string(),
            password_hash: "$2b$10$c/8RX5Kuhrb1abFAmZJE1.rIFqdl7mmMMD4wPkH6hua3zLS2ahlLS".to_string(),
            token: "iHaveReadAccessLevel".to_string(),
            access_level: AccessLevel::Read,
        },
    ]
}

/// Insert the bootstrap accounts that do not exist yet.
pub async fn seed_default_users(db: &Database) -> Result<usize, StoreError> {
    let repo = UserRepository::new(db);
    let mut inserted = 0;
    for user in default_users() {
        if repo.insert_if_absent(&user).await? {
            inserted += 1;
        } else {
            debug!(username = %user.username, "seed user already present");
        }
    }
    info!(inserted, "default users seeded");
    Ok(inserted)
}
