use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::storage::{FileStore, LocalStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub files: Arc<dyn FileStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let opts = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .context("connect to database")?;

        let files = Arc::new(LocalStore::new(&config.upload_dir)) as Arc<dyn FileStore>;

        Ok(Self { db, config, files })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, files: Arc<dyn FileStore>) -> Self {
        Self { db, config, files }
    }
}
