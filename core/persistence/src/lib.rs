pub mod config;
pub mod executor;

pub use config::DbConfig;
pub use executor::{do_with_transaction, readonly_transaction, AsDao, DbExecutor, Error};
