use crate::{
    config::Config,
    database::Database,
    errors::{AppError, Result},
    services::{metrics::MetricsService, snapshots::SnapshotService},
    storage::create_snapshot_store,
};
use std::sync::Arc;

pub mod auth;
pub mod common_foods;
pub mod docs;
pub mod foods;
pub mod health;
pub mod meal_foods;
pub mod meals;
pub mod metrics;
pub mod nutrients;
pub mod summary;

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub snapshots: SnapshotService,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new(config: Config, database: Database) -> Result<Self> {
        let store = create_snapshot_store(&config)?;
        let metrics = MetricsService::new()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to register metrics: {}", e)))?;

        Ok(Self {
            database,
            config,
            snapshots: SnapshotService::new(store),
            metrics: Arc::new(metrics),
        })
    }
}
