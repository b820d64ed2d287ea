use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::{Connection, SqliteConnection};
use diesel_migrations::RunMigrationsError;
use std::io::Write;
use std::time::Duration;

use crate::config::DbConfig;

pub type InnerConnType = SqliteConnection;
pub type ConnType = PooledConnection<ConnectionManager<InnerConnType>>;
pub type PoolType = Pool<ConnectionManager<InnerConnType>>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database query failed: {0}")]
    Diesel(#[from] diesel::result::Error),
    #[error("Database connection unavailable: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Database worker task failed: {0}")]
    RuntimeError(#[from] tokio::task::JoinError),
}

/// Builds data access object borrowing the connection pool.
pub trait AsDao<'a> {
    fn as_dao(pool: &'a PoolType) -> Self;
}

/// Applied once to every new pooled connection.
#[derive(Debug)]
struct ConnectionInit {
    busy_timeout: Duration,
}

impl CustomizeConnection<InnerConnType, diesel::r2d2::Error> for ConnectionInit {
    fn on_acquire(&self, conn: &mut InnerConnType) -> Result<(), diesel::r2d2::Error> {
        // busy_timeout goes first: switching to WAL needs the write lock.
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct DbExecutor {
    pub pool: PoolType,
}

impl DbExecutor {
    pub fn new<S: Into<String>>(database_url: S) -> Result<Self, Error> {
        Self::from_config(&DbConfig::with_database_url(database_url))
    }

    pub fn from_config(config: &DbConfig) -> Result<Self, Error> {
        log::info!(
            "Opening database [{}], pool size: {}.",
            config.database_url,
            config.pool_size
        );
        let manager = ConnectionManager::new(config.database_url.clone());
        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_customizer(Box::new(ConnectionInit {
                busy_timeout: config.busy_timeout,
            }))
            .build(manager)?;
        Ok(DbExecutor { pool })
    }

    pub fn conn(&self) -> Result<ConnType, Error> {
        Ok(self.pool.get()?)
    }

    pub fn as_dao<'a, T: AsDao<'a>>(&'a self) -> T {
        AsDao::as_dao(&self.pool)
    }

    pub fn apply_migration<T>(
        &self,
        migration: fn(&ConnType, &mut dyn Write) -> Result<T, RunMigrationsError>,
    ) -> anyhow::Result<T> {
        let conn = self.conn()?;
        let mut output = Vec::new();
        let result = migration(&conn, &mut output);
        for line in String::from_utf8_lossy(&output).lines() {
            log::info!("Migration: {}", line);
        }
        Ok(result?)
    }
}

/// Runs `f` inside a `BEGIN IMMEDIATE` transaction on a blocking worker.
///
/// The write lock is taken up front, so concurrent writers queue on the busy
/// timeout instead of failing when upgrading a read lock.
pub async fn do_with_transaction<R, E, F>(pool: &PoolType, f: F) -> Result<R, E>
where
    F: FnOnce(&ConnType) -> Result<R, E> + Send + 'static,
    R: Send + 'static,
    E: From<diesel::result::Error> + From<Error> + Send + 'static,
{
    let pool = pool.clone();
    match tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(Error::from)?;
        conn.immediate_transaction(|| f(&conn))
    })
    .await
    {
        Ok(result) => result,
        Err(e) => Err(Error::from(e).into()),
    }
}

pub async fn readonly_transaction<R, E, F>(pool: &PoolType, f: F) -> Result<R, E>
where
    F: FnOnce(&ConnType) -> Result<R, E> + Send + 'static,
    R: Send + 'static,
    E: From<diesel::result::Error> + From<Error> + Send + 'static,
{
    let pool = pool.clone();
    match tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(Error::from)?;
        conn.transaction(|| f(&conn))
    })
    .await
    {
        Ok(result) => result,
        Err(e) => Err(Error::from(e).into()),
    }
}
