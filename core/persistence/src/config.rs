use clap::Parser;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "solver.db";
pub const DEFAULT_POOL_SIZE: u32 = 8;
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Clone, Debug, PartialEq)]
pub struct DbConfig {
    /// Path of the SQLite database file backing the durable store
    #[clap(long, env = "SOLVER_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,
    /// Maximum number of pooled connections
    #[clap(long = "db-pool-size", env = "SOLVER_DB_POOL_SIZE", default_value = "8")]
    pub pool_size: u32,
    /// How long a writer waits on a locked database before failing
    #[clap(long = "db-busy-timeout", env = "SOLVER_DB_BUSY_TIMEOUT", value_parser = humantime::parse_duration, default_value = "5s")]
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub fn from_env() -> Result<DbConfig, clap::Error> {
        // Empty command line arguments, because we want to use ENV fallback
        // or default values if ENV variables are not set.
        DbConfig::try_parse_from([""])
    }

    pub fn with_database_url<S: Into<String>>(database_url: S) -> DbConfig {
        DbConfig {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}
