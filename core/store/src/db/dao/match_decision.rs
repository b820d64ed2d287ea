use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};

use solver_model::{MatchDecision, MatchId};
use solver_persistence::executor::PoolType;
use solver_persistence::{do_with_transaction, readonly_transaction, AsDao};

use crate::db::model::DbMatchDecision;
use crate::db::schema::solver_match_decision::dsl;
use crate::error::StoreResult;
use crate::query::MatchDecisionFilter;

pub struct MatchDecisionDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for MatchDecisionDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> MatchDecisionDao<'c> {
    /// `REPLACE INTO` drops the row of the same pair before inserting.
    pub async fn upsert(&self, decision: MatchDecision) -> StoreResult<MatchDecision> {
        do_with_transaction(self.pool, move |conn| {
            diesel::replace_into(dsl::solver_match_decision)
                .values(DbMatchDecision::from(decision.clone()))
                .execute(conn)?;
            log::trace!(
                "Match decision for [{}] and [{}] recorded: {}.",
                decision.resource_offer,
                decision.job_offer,
                decision.result
            );
            Ok(decision)
        })
        .await
    }

    pub async fn select(
        &self,
        resource_offer: &str,
        job_offer: &str,
    ) -> StoreResult<Option<MatchDecision>> {
        let match_id = MatchId::new(resource_offer, job_offer).to_string();
        readonly_transaction(self.pool, move |conn| {
            Ok(dsl::solver_match_decision
                .filter(dsl::match_id.eq(&match_id))
                .first::<DbMatchDecision>(conn)
                .optional()?
                .map(MatchDecision::from))
        })
        .await
    }

    pub async fn list(&self) -> StoreResult<Vec<MatchDecision>> {
        readonly_transaction(self.pool, move |conn| {
            Ok(dsl::solver_match_decision
                .order_by(dsl::match_id.asc())
                .load::<DbMatchDecision>(conn)?
                .into_iter()
                .map(MatchDecision::from)
                .collect())
        })
        .await
    }

    /// Deletes the decisions selected by `filter`. An empty filter deletes nothing.
    pub async fn delete(&self, filter: MatchDecisionFilter) -> StoreResult<usize> {
        let resource_offer = filter.resource_offer_id().map(str::to_string);
        let job_offer = filter.job_offer_id().map(str::to_string);

        let deleted = do_with_transaction(self.pool, move |conn| {
            let deleted = match (resource_offer, job_offer) {
                (Some(resource_offer), Some(job_offer)) => {
                    let match_id = MatchId::new(&resource_offer, &job_offer).to_string();
                    diesel::delete(dsl::solver_match_decision.filter(dsl::match_id.eq(match_id)))
                        .execute(conn)?
                }
                (Some(resource_offer), None) => diesel::delete(
                    dsl::solver_match_decision
                        .filter(dsl::resource_offer_id.eq(resource_offer)),
                )
                .execute(conn)?,
                (None, Some(job_offer)) => diesel::delete(
                    dsl::solver_match_decision.filter(dsl::job_offer_id.eq(job_offer)),
                )
                .execute(conn)?,
                (None, None) => 0,
            };
            StoreResult::Ok(deleted)
        })
        .await?;

        log::debug!("Removed {} match decisions for {:?}.", deleted, filter);
        Ok(deleted)
    }
}
