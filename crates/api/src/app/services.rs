//! Infrastructure wiring: database connection and startup seeding.

use fleetroster_infra::{Database, StoreError, seed_default_users};
use tracing::info;

use crate::config::ApiConfig;

#[derive(Debug, Clone)]
pub struct AppServices {
    pub db: Database,
}

pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StoreError> {
    let db = Database::connect(&config.database_url).await?;

    if config.seed_users {
        seed_default_users(&db).await?;
    } else {
        info!("user seeding disabled");
    }

    Ok(AppServices { db })
}
