use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use std::convert::TryFrom;

use solver_model::{
    Deal, DealTransactionsJobCreator, DealTransactionsMediator, DealTransactionsResourceProvider,
};
use solver_persistence::executor::{ConnType, PoolType};
use solver_persistence::{do_with_transaction, readonly_transaction, AsDao};

use super::{ensure_affected, on_insert_error};
use crate::db::model::DbDeal;
use crate::db::schema::solver_deal::dsl;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::query::{unset_if_empty, DealsFilter};

pub struct DealDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for DealDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> DealDao<'c> {
    pub async fn insert(&self, mut deal: Deal) -> StoreResult<Deal> {
        deal.mediator = unset_if_empty(deal.mediator);
        do_with_transaction(self.pool, move |conn| {
            if select(conn, &deal.id)?.is_some() {
                return Err(StoreError::Duplicate(EntityKind::Deal, deal.id));
            }
            diesel::insert_into(dsl::solver_deal)
                .values(DbDeal::from(deal.clone()))
                .execute(conn)
                .map_err(on_insert_error(EntityKind::Deal, &deal.id))?;
            log::debug!("Deal [{}] added.", deal.id);
            Ok(deal)
        })
        .await
    }

    pub async fn select(&self, id: &str) -> StoreResult<Option<Deal>> {
        let id = id.to_string();
        readonly_transaction(self.pool, move |conn| select(conn, &id)).await
    }

    pub async fn list(&self, filter: DealsFilter) -> StoreResult<Vec<Deal>> {
        readonly_transaction(self.pool, move |conn| {
            let mut statement = dsl::solver_deal.order_by(dsl::id.asc()).into_boxed();

            if let Some(job_creator) = &filter.job_creator {
                statement = statement.filter(dsl::job_creator.eq(job_creator.clone()));
            }
            if let Some(resource_provider) = &filter.resource_provider {
                statement = statement.filter(dsl::resource_provider.eq(resource_provider.clone()));
            }
            if let Some(mediator) = &filter.mediator {
                statement = statement.filter(dsl::mediator.eq(mediator.clone()));
            }
            if let Some(state) = filter.state {
                statement = statement.filter(dsl::state.eq(state as i32));
            }

            log::trace!("Listing deals for {:?}.", filter);
            statement
                .load::<DbDeal>(conn)?
                .into_iter()
                .map(|deal| Deal::try_from(deal).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    pub async fn update_state(&self, id: &str, state: u8) -> StoreResult<Deal> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let updated = diesel::update(dsl::solver_deal.filter(dsl::id.eq(&id)))
                .set(dsl::state.eq(state as i32))
                .execute(conn)?;
            ensure_affected(updated, EntityKind::Deal, &id)?;
            log::debug!("Deal [{}] moved to state {}.", id, state);
            reselect(conn, updated, id)
        })
        .await
    }

    pub async fn update_mediator(&self, id: &str, mediator: Option<String>) -> StoreResult<Deal> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let updated = diesel::update(dsl::solver_deal.filter(dsl::id.eq(&id)))
                .set(dsl::mediator.eq(unset_if_empty(mediator)))
                .execute(conn)?;
            reselect(conn, updated, id)
        })
        .await
    }

    pub async fn update_job_creator_transactions(
        &self,
        id: &str,
        tx: DealTransactionsJobCreator,
    ) -> StoreResult<Deal> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let updated = diesel::update(dsl::solver_deal.filter(dsl::id.eq(&id)))
                .set((
                    dsl::jc_agree.eq(tx.agree),
                    dsl::jc_accept_result.eq(tx.accept_result),
                    dsl::jc_check_result.eq(tx.check_result),
                    dsl::jc_timeout_agree.eq(tx.timeout_agree),
                    dsl::jc_timeout_submit_result.eq(tx.timeout_submit_result),
                    dsl::jc_timeout_mediate_result.eq(tx.timeout_mediate_result),
                ))
                .execute(conn)?;
            reselect(conn, updated, id)
        })
        .await
    }

    pub async fn update_resource_provider_transactions(
        &self,
        id: &str,
        tx: DealTransactionsResourceProvider,
    ) -> StoreResult<Deal> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let updated = diesel::update(dsl::solver_deal.filter(dsl::id.eq(&id)))
                .set((
                    dsl::rp_agree.eq(tx.agree),
                    dsl::rp_add_result.eq(tx.add_result),
                    dsl::rp_timeout_agree.eq(tx.timeout_agree),
                    dsl::rp_timeout_judge_result.eq(tx.timeout_judge_result),
                    dsl::rp_timeout_mediate_result.eq(tx.timeout_mediate_result),
                ))
                .execute(conn)?;
            reselect(conn, updated, id)
        })
        .await
    }

    pub async fn update_mediator_transactions(
        &self,
        id: &str,
        tx: DealTransactionsMediator,
    ) -> StoreResult<Deal> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let updated = diesel::update(dsl::solver_deal.filter(dsl::id.eq(&id)))
                .set((
                    dsl::m_mediation_accept_result.eq(tx.mediation_accept_result),
                    dsl::m_mediation_reject_result.eq(tx.mediation_reject_result),
                ))
                .execute(conn)?;
            reselect(conn, updated, id)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let deleted =
                diesel::delete(dsl::solver_deal.filter(dsl::id.eq(&id))).execute(conn)?;
            ensure_affected(deleted, EntityKind::Deal, &id)?;
            log::debug!("Deal [{}] removed.", id);
            Ok(())
        })
        .await
    }
}

fn select(conn: &ConnType, id: &str) -> StoreResult<Option<Deal>> {
    dsl::solver_deal
        .filter(dsl::id.eq(id))
        .first::<DbDeal>(conn)
        .optional()?
        .map(Deal::try_from)
        .transpose()
        .map_err(StoreError::from)
}

/// Reads the deal back after an update which touched `updated` rows.
fn reselect(conn: &ConnType, updated: usize, id: String) -> StoreResult<Deal> {
    ensure_affected(updated, EntityKind::Deal, &id)?;
    select(conn, &id)?.ok_or(StoreError::NotFound(EntityKind::Deal, id))
}
