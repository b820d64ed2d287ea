use clap::{Parser, ValueEnum};
use std::sync::Arc;

use solver_persistence::DbConfig;

use crate::db::SolverStoreDatabase;
use crate::memory::SolverStoreMemory;
use crate::store::SolverStore;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreBackend {
    /// Process-local maps, lost on exit
    Memory,
    /// SQLite database file
    Database,
}

#[derive(Parser, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    #[clap(long = "store-backend", env = "SOLVER_STORE_BACKEND", value_enum, default_value = "memory")]
    pub backend: StoreBackend,
    #[clap(flatten)]
    pub db: DbConfig,
}

impl StoreConfig {
    pub fn from_env() -> Result<StoreConfig, clap::Error> {
        // Empty command line arguments, because we want to use ENV fallback
        // or default values if ENV variables are not set.
        StoreConfig::try_parse_from([""])
    }
}

/// Builds the configured backend. The database one is migrated before use.
pub fn new_solver_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn SolverStore>> {
    Ok(match config.backend {
        StoreBackend::Memory => {
            log::info!("Using in-memory solver store.");
            Arc::new(SolverStoreMemory::new())
        }
        StoreBackend::Database => {
            log::info!(
                "Using database solver store at [{}].",
                config.db.database_url
            );
            Arc::new(SolverStoreDatabase::new(&config.db)?)
        }
    })
}
