#![allow(dead_code)]
#![allow(unused_macros)]

use std::sync::Arc;
use tempdir::TempDir;

use solver_store::{DbConfig, SolverStore, SolverStoreDatabase, SolverStoreMemory};

/// Store under test together with the directory holding its database file.
pub struct TestStore {
    pub backend: &'static str,
    pub store: Arc<dyn SolverStore>,
    _dir: Option<TempDir>,
}

impl std::ops::Deref for TestStore {
    type Target = dyn SolverStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}

pub fn memory_store() -> TestStore {
    TestStore {
        backend: "memory",
        store: Arc::new(SolverStoreMemory::new()),
        _dir: None,
    }
}

pub fn database_store(test_name: &str) -> TestStore {
    let dir = TempDir::new(test_name).unwrap();
    let path = dir.path().join("solver.db");
    let config = DbConfig::with_database_url(path.to_string_lossy());
    TestStore {
        backend: "database",
        store: Arc::new(SolverStoreDatabase::new(&config).unwrap()),
        _dir: Some(dir),
    }
}

/// Fresh instance of every backend, each test gets its own database.
pub fn stores(test_name: &str) -> Vec<TestStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    vec![memory_store(), database_store(test_name)]
}

macro_rules! assert_err_eq {
    ($expected:expr, $actual:expr $(,)*) => {
        assert_eq!($expected.to_string(), $actual.unwrap_err().to_string())
    };
}
