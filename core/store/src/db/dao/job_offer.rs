use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use std::convert::TryFrom;

use solver_model::{AgreementState, JobOffer};
use solver_persistence::executor::{ConnType, PoolType};
use solver_persistence::{do_with_transaction, readonly_transaction, AsDao};

use super::{ensure_affected, on_insert_error};
use crate::db::model::DbJobOffer;
use crate::db::schema::solver_job_offer::dsl;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::query::{unset_if_empty, JobOffersQuery};

pub struct JobOfferDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for JobOfferDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> JobOfferDao<'c> {
    pub async fn insert(&self, mut offer: JobOffer) -> StoreResult<JobOffer> {
        offer.deal_id = unset_if_empty(offer.deal_id);
        do_with_transaction(self.pool, move |conn| {
            if select(conn, &offer.id)?.is_some() {
                return Err(StoreError::Duplicate(EntityKind::JobOffer, offer.id));
            }
            diesel::insert_into(dsl::solver_job_offer)
                .values(DbJobOffer::from(offer.clone()))
                .execute(conn)
                .map_err(on_insert_error(EntityKind::JobOffer, &offer.id))?;
            log::debug!("Job offer [{}] added.", offer.id);
            Ok(offer)
        })
        .await
    }

    pub async fn select(&self, id: &str) -> StoreResult<Option<JobOffer>> {
        let id = id.to_string();
        readonly_transaction(self.pool, move |conn| select(conn, &id)).await
    }

    pub async fn list(&self, query: &JobOffersQuery) -> StoreResult<Vec<JobOffer>> {
        let query = query.clone();
        readonly_transaction(self.pool, move |conn| {
            let mut statement = dsl::solver_job_offer.order_by(dsl::id.asc()).into_boxed();

            if let Some(job_creator) = query.job_creator() {
                statement = statement.filter(dsl::job_creator.eq(job_creator.to_string()));
            }
            if query.not_matched {
                statement = statement.filter(dsl::deal_id.is_null());
            }
            if !query.include_cancelled {
                statement = statement.filter(
                    dsl::state.ne(AgreementState::JobOfferCancelled.code() as i32),
                );
            }

            log::trace!("Listing job offers for {:?}.", query);
            statement
                .load::<DbJobOffer>(conn)?
                .into_iter()
                .map(|offer| JobOffer::try_from(offer).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    pub async fn update_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<JobOffer> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let updated = diesel::update(dsl::solver_job_offer.filter(dsl::id.eq(&id)))
                .set((
                    dsl::deal_id.eq(unset_if_empty(deal_id)),
                    dsl::state.eq(state as i32),
                ))
                .execute(conn)?;
            ensure_affected(updated, EntityKind::JobOffer, &id)?;
            log::debug!("Job offer [{}] moved to state {}.", id, state);

            select(conn, &id)?.ok_or(StoreError::NotFound(EntityKind::JobOffer, id))
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let deleted =
                diesel::delete(dsl::solver_job_offer.filter(dsl::id.eq(&id))).execute(conn)?;
            ensure_affected(deleted, EntityKind::JobOffer, &id)?;
            log::debug!("Job offer [{}] removed.", id);
            Ok(())
        })
        .await
    }
}

fn select(conn: &ConnType, id: &str) -> StoreResult<Option<JobOffer>> {
    dsl::solver_job_offer
        .filter(dsl::id.eq(id))
        .first::<DbJobOffer>(conn)
        .optional()?
        .map(JobOffer::try_from)
        .transpose()
        .map_err(StoreError::from)
}
