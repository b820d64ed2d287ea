use std::fmt;

use solver_model::AgreementStateParseError;

pub use solver_persistence::Error as DbError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Collection a failing operation addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    JobOffer,
    ResourceOffer,
    Deal,
    Result,
    MatchDecision,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::JobOffer => "Job offer",
            EntityKind::ResourceOffer => "Resource offer",
            EntityKind::Deal => "Deal",
            EntityKind::Result => "Result",
            EntityKind::MatchDecision => "Match decision",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} [{id}] holds state code {code} which doesn't fit in u8.")]
pub struct ConversionError {
    pub kind: EntityKind,
    pub id: String,
    pub code: i32,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{0} [{1}] not found.")]
    NotFound(EntityKind, String),
    #[error("{0} [{1}] already exists.")]
    Duplicate(EntityKind, String),
    #[error(transparent)]
    UnknownState(#[from] AgreementStateParseError),
    #[error("Corrupted record. {0}")]
    Conversion(#[from] ConversionError),
    #[error("Solver store backend error: {0}")]
    Db(#[from] DbError),
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        StoreError::Db(DbError::Diesel(e))
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(..))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate(..))
    }
}
