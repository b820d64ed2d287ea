mod deal;
mod job_offer;
mod match_decision;
mod resource_offer;
mod result;

pub use deal::DealDao;
pub use job_offer::JobOfferDao;
pub use match_decision::MatchDecisionDao;
pub use resource_offer::ResourceOfferDao;
pub use result::ResultDao;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::error::{EntityKind, StoreError};

/// Maps a unique-constraint violation of a racing insert to `Duplicate`.
pub(crate) fn on_insert_error(kind: EntityKind, id: &str) -> impl FnOnce(DieselError) -> StoreError {
    let id = id.to_string();
    move |e| match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::Duplicate(kind, id)
        }
        e => StoreError::from(e),
    }
}

/// Zero affected rows means the addressed record is absent.
pub(crate) fn ensure_affected(
    affected: usize,
    kind: EntityKind,
    id: &str,
) -> Result<(), StoreError> {
    match affected {
        0 => Err(StoreError::NotFound(kind, id.to_string())),
        _ => Ok(()),
    }
}
