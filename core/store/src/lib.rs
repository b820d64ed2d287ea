//! Solver store: durable and in-memory homes for job offers, resource
//! offers, deals, results and match decisions behind one [`SolverStore`]
//! contract.
#[macro_use]
extern crate diesel;

pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod query;
pub mod store;
pub mod testing;

pub use config::{new_solver_store, StoreBackend, StoreConfig};
pub use db::SolverStoreDatabase;
pub use error::{ConversionError, EntityKind, StoreError, StoreResult};
pub use memory::SolverStoreMemory;
pub use query::{DealsQuery, JobOffersQuery, MatchDecisionFilter, ResourceOffersQuery};
pub use store::SolverStore;

pub use solver_persistence::DbConfig;

pub use solver_model::*;
