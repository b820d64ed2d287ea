//! SQLite [`SolverStore`] backend.
use async_trait::async_trait;
use diesel::RunQueryDsl;

use solver_model::{
    Deal, DealResult, DealTransactionsJobCreator, DealTransactionsMediator,
    DealTransactionsResourceProvider, JobOffer, MatchDecision, ResourceOffer,
};
use solver_persistence::{DbConfig, DbExecutor};

use crate::error::{StoreError, StoreResult};
use crate::query::{DealsQuery, JobOffersQuery, MatchDecisionFilter, ResourceOffersQuery};
use crate::store::SolverStore;

pub(crate) mod dao;
pub(crate) mod model;
pub(crate) mod schema;

pub mod migrations {
    #[derive(diesel_migrations::EmbedMigrations)]
    struct _Dummy;
}

use dao::{DealDao, JobOfferDao, MatchDecisionDao, ResourceOfferDao, ResultDao};

#[derive(Clone)]
pub struct SolverStoreDatabase {
    db: DbExecutor,
}

impl SolverStoreDatabase {
    /// Opens the database and brings its schema up to date.
    pub fn new(config: &DbConfig) -> anyhow::Result<Self> {
        let db = DbExecutor::from_config(config)?;
        db.apply_migration(migrations::run_with_output)?;
        Ok(SolverStoreDatabase { db })
    }

    /// Wraps an executor whose schema was already migrated.
    pub fn from_executor(db: DbExecutor) -> Self {
        SolverStoreDatabase { db }
    }

    pub fn executor(&self) -> &DbExecutor {
        &self.db
    }

    /// Deletes every row of every solver table.
    pub async fn clear(&self) -> StoreResult<()> {
        use crate::db::schema::*;

        solver_persistence::do_with_transaction(&self.db.pool, |conn| {
            diesel::delete(solver_match_decision::table).execute(conn)?;
            diesel::delete(solver_result::table).execute(conn)?;
            diesel::delete(solver_deal::table).execute(conn)?;
            diesel::delete(solver_resource_offer::table).execute(conn)?;
            diesel::delete(solver_job_offer::table).execute(conn)?;
            Result::<(), StoreError>::Ok(())
        })
        .await?;
        log::info!("Solver store database cleared.");
        Ok(())
    }
}

#[async_trait]
impl SolverStore for SolverStoreDatabase {
    async fn add_job_offer(&self, job_offer: JobOffer) -> StoreResult<JobOffer> {
        self.db.as_dao::<JobOfferDao>().insert(job_offer).await
    }

    async fn get_job_offer(&self, id: &str) -> StoreResult<Option<JobOffer>> {
        self.db.as_dao::<JobOfferDao>().select(id).await
    }

    async fn get_job_offers(&self, query: &JobOffersQuery) -> StoreResult<Vec<JobOffer>> {
        self.db.as_dao::<JobOfferDao>().list(query).await
    }

    async fn update_job_offer_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<JobOffer> {
        self.db
            .as_dao::<JobOfferDao>()
            .update_state(id, deal_id, state)
            .await
    }

    async fn remove_job_offer(&self, id: &str) -> StoreResult<()> {
        self.db.as_dao::<JobOfferDao>().delete(id).await
    }

    async fn add_resource_offer(
        &self,
        resource_offer: ResourceOffer,
    ) -> StoreResult<ResourceOffer> {
        self.db
            .as_dao::<ResourceOfferDao>()
            .insert(resource_offer)
            .await
    }

    async fn get_resource_offer(&self, id: &str) -> StoreResult<Option<ResourceOffer>> {
        self.db.as_dao::<ResourceOfferDao>().select(id).await
    }

    async fn get_resource_offer_by_address(
        &self,
        resource_provider: &str,
    ) -> StoreResult<Option<ResourceOffer>> {
        self.db
            .as_dao::<ResourceOfferDao>()
            .select_latest_of(resource_provider)
            .await
    }

    async fn get_resource_offers(
        &self,
        query: &ResourceOffersQuery,
    ) -> StoreResult<Vec<ResourceOffer>> {
        self.db.as_dao::<ResourceOfferDao>().list(query).await
    }

    async fn update_resource_offer_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<ResourceOffer> {
        self.db
            .as_dao::<ResourceOfferDao>()
            .update_state(id, deal_id, state)
            .await
    }

    async fn remove_resource_offer(&self, id: &str) -> StoreResult<()> {
        self.db.as_dao::<ResourceOfferDao>().delete(id).await
    }

    async fn add_deal(&self, deal: Deal) -> StoreResult<Deal> {
        self.db.as_dao::<DealDao>().insert(deal).await
    }

    async fn get_deal(&self, id: &str) -> StoreResult<Option<Deal>> {
        self.db.as_dao::<DealDao>().select(id).await
    }

    async fn get_deals(&self, query: &DealsQuery) -> StoreResult<Vec<Deal>> {
        let filter = query.resolve()?;
        self.db.as_dao::<DealDao>().list(filter).await
    }

    async fn get_deals_all(&self) -> StoreResult<Vec<Deal>> {
        self.db.as_dao::<DealDao>().list(Default::default()).await
    }

    async fn update_deal_state(&self, id: &str, state: u8) -> StoreResult<Deal> {
        self.db.as_dao::<DealDao>().update_state(id, state).await
    }

    async fn update_deal_mediator(&self, id: &str, mediator: Option<String>) -> StoreResult<Deal> {
        self.db.as_dao::<DealDao>().update_mediator(id, mediator).await
    }

    async fn update_deal_transactions_job_creator(
        &self,
        id: &str,
        transactions: DealTransactionsJobCreator,
    ) -> StoreResult<Deal> {
        self.db
            .as_dao::<DealDao>()
            .update_job_creator_transactions(id, transactions)
            .await
    }

    async fn update_deal_transactions_resource_provider(
        &self,
        id: &str,
        transactions: DealTransactionsResourceProvider,
    ) -> StoreResult<Deal> {
        self.db
            .as_dao::<DealDao>()
            .update_resource_provider_transactions(id, transactions)
            .await
    }

    async fn update_deal_transactions_mediator(
        &self,
        id: &str,
        transactions: DealTransactionsMediator,
    ) -> StoreResult<Deal> {
        self.db
            .as_dao::<DealDao>()
            .update_mediator_transactions(id, transactions)
            .await
    }

    async fn remove_deal(&self, id: &str) -> StoreResult<()> {
        self.db.as_dao::<DealDao>().delete(id).await
    }

    async fn add_result(&self, result: DealResult) -> StoreResult<DealResult> {
        self.db.as_dao::<ResultDao>().insert(result).await
    }

    async fn get_result(&self, deal_id: &str) -> StoreResult<Option<DealResult>> {
        self.db.as_dao::<ResultDao>().select(deal_id).await
    }

    async fn get_results(&self) -> StoreResult<Vec<DealResult>> {
        self.db.as_dao::<ResultDao>().list().await
    }

    async fn remove_result(&self, deal_id: &str) -> StoreResult<()> {
        self.db.as_dao::<ResultDao>().delete(deal_id).await
    }

    async fn add_match_decision(
        &self,
        resource_offer: &str,
        job_offer: &str,
        deal: &str,
        result: bool,
    ) -> StoreResult<MatchDecision> {
        self.db
            .as_dao::<MatchDecisionDao>()
            .upsert(MatchDecision {
                resource_offer: resource_offer.to_string(),
                job_offer: job_offer.to_string(),
                deal: deal.to_string(),
                result,
            })
            .await
    }

    async fn get_match_decision(
        &self,
        resource_offer: &str,
        job_offer: &str,
    ) -> StoreResult<Option<MatchDecision>> {
        self.db
            .as_dao::<MatchDecisionDao>()
            .select(resource_offer, job_offer)
            .await
    }

    async fn get_match_decisions(&self) -> StoreResult<Vec<MatchDecision>> {
        self.db.as_dao::<MatchDecisionDao>().list().await
    }

    async fn remove_match_decisions(&self, filter: &MatchDecisionFilter) -> StoreResult<usize> {
        self.db
            .as_dao::<MatchDecisionDao>()
            .delete(filter.clone())
            .await
    }
}
