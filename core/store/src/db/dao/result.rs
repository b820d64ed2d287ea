use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};

use solver_model::DealResult;
use solver_persistence::executor::PoolType;
use solver_persistence::{do_with_transaction, readonly_transaction, AsDao};

use super::{ensure_affected, on_insert_error};
use crate::db::model::DbDealResult;
use crate::db::schema::solver_result::dsl;
use crate::error::{EntityKind, StoreError, StoreResult};

pub struct ResultDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for ResultDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> ResultDao<'c> {
    pub async fn insert(&self, result: DealResult) -> StoreResult<DealResult> {
        do_with_transaction(self.pool, move |conn| {
            let existing = dsl::solver_result
                .filter(dsl::deal_id.eq(&result.deal_id))
                .first::<DbDealResult>(conn)
                .optional()?;
            if existing.is_some() {
                return Err(StoreError::Duplicate(EntityKind::Result, result.deal_id));
            }
            diesel::insert_into(dsl::solver_result)
                .values(DbDealResult::from(result.clone()))
                .execute(conn)
                .map_err(on_insert_error(EntityKind::Result, &result.deal_id))?;
            log::debug!("Result [{}] of deal [{}] added.", result.id, result.deal_id);
            Ok(result)
        })
        .await
    }

    pub async fn select(&self, deal_id: &str) -> StoreResult<Option<DealResult>> {
        let deal_id = deal_id.to_string();
        readonly_transaction(self.pool, move |conn| {
            Ok(dsl::solver_result
                .filter(dsl::deal_id.eq(&deal_id))
                .first::<DbDealResult>(conn)
                .optional()?
                .map(DealResult::from))
        })
        .await
    }

    pub async fn list(&self) -> StoreResult<Vec<DealResult>> {
        readonly_transaction(self.pool, move |conn| {
            Ok(dsl::solver_result
                .order_by(dsl::deal_id.asc())
                .load::<DbDealResult>(conn)?
                .into_iter()
                .map(DealResult::from)
                .collect())
        })
        .await
    }

    pub async fn delete(&self, deal_id: &str) -> StoreResult<()> {
        let deal_id = deal_id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let deleted = diesel::delete(dsl::solver_result.filter(dsl::deal_id.eq(&deal_id)))
                .execute(conn)?;
            ensure_affected(deleted, EntityKind::Result, &deal_id)?;
            log::debug!("Result of deal [{}] removed.", deal_id);
            Ok(())
        })
        .await
    }
}
