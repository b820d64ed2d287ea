use async_trait::async_trait;

use solver_model::{
    Deal, DealResult, DealTransactionsJobCreator, DealTransactionsMediator,
    DealTransactionsResourceProvider, JobOffer, MatchDecision, ResourceOffer,
};

use crate::error::StoreResult;
use crate::query::{DealsQuery, JobOffersQuery, MatchDecisionFilter, ResourceOffersQuery};

/// Persistence contract shared by every store backend.
///
/// Lookups return `Ok(None)` for a missing key; only removals and updates
/// report [`NotFound`](crate::StoreError::NotFound). Adds fail with
/// [`Duplicate`](crate::StoreError::Duplicate) on a taken key, except match
/// decisions which are upserted. No call spans more than one collection.
#[async_trait]
pub trait SolverStore: Send + Sync {
    async fn add_job_offer(&self, job_offer: JobOffer) -> StoreResult<JobOffer>;
    async fn get_job_offer(&self, id: &str) -> StoreResult<Option<JobOffer>>;
    async fn get_job_offers(&self, query: &JobOffersQuery) -> StoreResult<Vec<JobOffer>>;
    /// Sets the deal and state of a job offer once it was matched.
    async fn update_job_offer_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<JobOffer>;
    async fn remove_job_offer(&self, id: &str) -> StoreResult<()>;

    async fn add_resource_offer(&self, resource_offer: ResourceOffer)
        -> StoreResult<ResourceOffer>;
    async fn get_resource_offer(&self, id: &str) -> StoreResult<Option<ResourceOffer>>;
    /// Most recently added offer of the provider which is still stored.
    async fn get_resource_offer_by_address(
        &self,
        resource_provider: &str,
    ) -> StoreResult<Option<ResourceOffer>>;
    async fn get_resource_offers(
        &self,
        query: &ResourceOffersQuery,
    ) -> StoreResult<Vec<ResourceOffer>>;
    async fn update_resource_offer_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<ResourceOffer>;
    async fn remove_resource_offer(&self, id: &str) -> StoreResult<()>;

    async fn add_deal(&self, deal: Deal) -> StoreResult<Deal>;
    async fn get_deal(&self, id: &str) -> StoreResult<Option<Deal>>;
    async fn get_deals(&self, query: &DealsQuery) -> StoreResult<Vec<Deal>>;
    async fn get_deals_all(&self) -> StoreResult<Vec<Deal>>;
    async fn update_deal_state(&self, id: &str, state: u8) -> StoreResult<Deal>;
    async fn update_deal_mediator(&self, id: &str, mediator: Option<String>) -> StoreResult<Deal>;
    async fn update_deal_transactions_job_creator(
        &self,
        id: &str,
        transactions: DealTransactionsJobCreator,
    ) -> StoreResult<Deal>;
    async fn update_deal_transactions_resource_provider(
        &self,
        id: &str,
        transactions: DealTransactionsResourceProvider,
    ) -> StoreResult<Deal>;
    async fn update_deal_transactions_mediator(
        &self,
        id: &str,
        transactions: DealTransactionsMediator,
    ) -> StoreResult<Deal>;
    async fn remove_deal(&self, id: &str) -> StoreResult<()>;

    async fn add_result(&self, result: DealResult) -> StoreResult<DealResult>;
    async fn get_result(&self, deal_id: &str) -> StoreResult<Option<DealResult>>;
    async fn get_results(&self) -> StoreResult<Vec<DealResult>>;
    async fn remove_result(&self, deal_id: &str) -> StoreResult<()>;

    /// Records the decision for the pair, replacing an earlier one.
    async fn add_match_decision(
        &self,
        resource_offer: &str,
        job_offer: &str,
        deal: &str,
        result: bool,
    ) -> StoreResult<MatchDecision>;
    async fn get_match_decision(
        &self,
        resource_offer: &str,
        job_offer: &str,
    ) -> StoreResult<Option<MatchDecision>>;
    async fn get_match_decisions(&self) -> StoreResult<Vec<MatchDecision>>;
    /// Removes every decision selected by `filter` and returns how many
    /// were removed. Selecting nothing is not an error.
    async fn remove_match_decisions(&self, filter: &MatchDecisionFilter) -> StoreResult<usize>;
}
