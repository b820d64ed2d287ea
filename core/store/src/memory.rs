//! Process-local [`SolverStore`] backend.
//!
//! Each collection sits behind its own lock, so operations on different
//! collections never contend. Records leave the store as clones and list
//! operations return them ordered by key.
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use solver_model::{
    Deal, DealResult, DealTransactionsJobCreator, DealTransactionsMediator,
    DealTransactionsResourceProvider, JobOffer, MatchDecision, ResourceOffer,
};

use crate::error::{EntityKind, StoreError, StoreResult};
use crate::ledger::MatchLedger;
use crate::query::{
    unset_if_empty, DealsQuery, JobOffersQuery, MatchDecisionFilter, ResourceOffersQuery,
};
use crate::store::SolverStore;

fn sorted_by<T, K: Ord>(items: impl Iterator<Item = T>, key: impl FnMut(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(key);
    items
}

/// Resource offers with a per-provider list of offer ids in insertion order.
#[derive(Default)]
struct ResourceOfferIndex {
    by_id: HashMap<String, ResourceOffer>,
    by_provider: HashMap<String, Vec<String>>,
}

impl ResourceOfferIndex {
    fn insert(&mut self, offer: ResourceOffer) -> StoreResult<ResourceOffer> {
        match self.by_id.entry(offer.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(EntityKind::ResourceOffer, offer.id)),
            Entry::Vacant(entry) => {
                self.by_provider
                    .entry(offer.resource_provider.clone())
                    .or_default()
                    .push(offer.id.clone());
                Ok(entry.insert(offer).clone())
            }
        }
    }

    fn latest_of(&self, resource_provider: &str) -> Option<&ResourceOffer> {
        self.by_provider
            .get(resource_provider)
            .and_then(|ids| ids.last())
            .and_then(|id| self.by_id.get(id))
    }

    fn remove(&mut self, id: &str) -> Option<ResourceOffer> {
        let offer = self.by_id.remove(id)?;
        if let Some(ids) = self.by_provider.get_mut(&offer.resource_provider) {
            ids.retain(|offer_id| offer_id != id);
            if ids.is_empty() {
                self.by_provider.remove(&offer.resource_provider);
            }
        }
        Some(offer)
    }

    fn clear(&mut self) {
        self.by_id.clear();
        self.by_provider.clear();
    }
}

#[derive(Default)]
pub struct SolverStoreMemory {
    job_offers: RwLock<HashMap<String, JobOffer>>,
    resource_offers: RwLock<ResourceOfferIndex>,
    deals: RwLock<HashMap<String, Deal>>,
    results: RwLock<HashMap<String, DealResult>>,
    match_decisions: RwLock<MatchLedger>,
}

impl SolverStoreMemory {
    pub fn new() -> SolverStoreMemory {
        SolverStoreMemory::default()
    }

    /// Drops every record of every collection.
    pub fn clear(&self) {
        self.job_offers.write().clear();
        self.resource_offers.write().clear();
        self.deals.write().clear();
        self.results.write().clear();
        self.match_decisions.write().clear();
        log::debug!("In-memory solver store cleared.");
    }

    fn update_deal<F>(&self, id: &str, update: F) -> StoreResult<Deal>
    where
        F: FnOnce(&mut Deal),
    {
        let mut deals = self.deals.write();
        let deal = deals
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(EntityKind::Deal, id.to_string()))?;
        update(deal);
        Ok(deal.clone())
    }
}

#[async_trait]
impl SolverStore for SolverStoreMemory {
    async fn add_job_offer(&self, mut job_offer: JobOffer) -> StoreResult<JobOffer> {
        job_offer.deal_id = unset_if_empty(job_offer.deal_id);
        match self.job_offers.write().entry(job_offer.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(EntityKind::JobOffer, job_offer.id)),
            Entry::Vacant(entry) => {
                log::debug!("Job offer [{}] added.", job_offer.id);
                Ok(entry.insert(job_offer).clone())
            }
        }
    }

    async fn get_job_offer(&self, id: &str) -> StoreResult<Option<JobOffer>> {
        Ok(self.job_offers.read().get(id).cloned())
    }

    async fn get_job_offers(&self, query: &JobOffersQuery) -> StoreResult<Vec<JobOffer>> {
        let job_offers = self.job_offers.read();
        Ok(sorted_by(
            job_offers.values().filter(|offer| query.matches(offer)).cloned(),
            |offer| offer.id.clone(),
        ))
    }

    async fn update_job_offer_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<JobOffer> {
        let mut job_offers = self.job_offers.write();
        let offer = job_offers
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(EntityKind::JobOffer, id.to_string()))?;
        offer.deal_id = unset_if_empty(deal_id);
        offer.state = state;
        log::debug!("Job offer [{}] moved to state {}.", id, state);
        Ok(offer.clone())
    }

    async fn remove_job_offer(&self, id: &str) -> StoreResult<()> {
        self.job_offers
            .write()
            .remove(id)
            .map(|_| log::debug!("Job offer [{}] removed.", id))
            .ok_or_else(|| StoreError::NotFound(EntityKind::JobOffer, id.to_string()))
    }

    async fn add_resource_offer(
        &self,
        mut resource_offer: ResourceOffer,
    ) -> StoreResult<ResourceOffer> {
        resource_offer.deal_id = unset_if_empty(resource_offer.deal_id);
        let offer = self.resource_offers.write().insert(resource_offer)?;
        log::debug!(
            "Resource offer [{}] of provider [{}] added.",
            offer.id,
            offer.resource_provider
        );
        Ok(offer)
    }

    async fn get_resource_offer(&self, id: &str) -> StoreResult<Option<ResourceOffer>> {
        Ok(self.resource_offers.read().by_id.get(id).cloned())
    }

    async fn get_resource_offer_by_address(
        &self,
        resource_provider: &str,
    ) -> StoreResult<Option<ResourceOffer>> {
        Ok(self.resource_offers.read().latest_of(resource_provider).cloned())
    }

    async fn get_resource_offers(
        &self,
        query: &ResourceOffersQuery,
    ) -> StoreResult<Vec<ResourceOffer>> {
        let resource_offers = self.resource_offers.read();
        Ok(sorted_by(
            resource_offers
                .by_id
                .values()
                .filter(|offer| query.matches(offer))
                .cloned(),
            |offer| offer.id.clone(),
        ))
    }

    async fn update_resource_offer_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<ResourceOffer> {
        let mut resource_offers = self.resource_offers.write();
        let offer = resource_offers
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(EntityKind::ResourceOffer, id.to_string()))?;
        offer.deal_id = unset_if_empty(deal_id);
        offer.state = state;
        log::debug!("Resource offer [{}] moved to state {}.", id, state);
        Ok(offer.clone())
    }

    async fn remove_resource_offer(&self, id: &str) -> StoreResult<()> {
        self.resource_offers
            .write()
            .remove(id)
            .map(|_| log::debug!("Resource offer [{}] removed.", id))
            .ok_or_else(|| StoreError::NotFound(EntityKind::ResourceOffer, id.to_string()))
    }

    async fn add_deal(&self, mut deal: Deal) -> StoreResult<Deal> {
        deal.mediator = unset_if_empty(deal.mediator);
        match self.deals.write().entry(deal.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(EntityKind::Deal, deal.id)),
            Entry::Vacant(entry) => {
                log::debug!("Deal [{}] added.", deal.id);
                Ok(entry.insert(deal).clone())
            }
        }
    }

    async fn get_deal(&self, id: &str) -> StoreResult<Option<Deal>> {
        Ok(self.deals.read().get(id).cloned())
    }

    async fn get_deals(&self, query: &DealsQuery) -> StoreResult<Vec<Deal>> {
        let filter = query.resolve()?;
        let deals = self.deals.read();
        Ok(sorted_by(
            deals.values().filter(|deal| filter.matches(deal)).cloned(),
            |deal| deal.id.clone(),
        ))
    }

    async fn get_deals_all(&self) -> StoreResult<Vec<Deal>> {
        let deals = self.deals.read();
        Ok(sorted_by(deals.values().cloned(), |deal| deal.id.clone()))
    }

    async fn update_deal_state(&self, id: &str, state: u8) -> StoreResult<Deal> {
        let deal = self.update_deal(id, |deal| deal.state = state)?;
        log::debug!("Deal [{}] moved to state {}.", id, state);
        Ok(deal)
    }

    async fn update_deal_mediator(&self, id: &str, mediator: Option<String>) -> StoreResult<Deal> {
        self.update_deal(id, |deal| deal.mediator = unset_if_empty(mediator))
    }

    async fn update_deal_transactions_job_creator(
        &self,
        id: &str,
        transactions: DealTransactionsJobCreator,
    ) -> StoreResult<Deal> {
        self.update_deal(id, |deal| deal.transactions.job_creator = transactions)
    }

    async fn update_deal_transactions_resource_provider(
        &self,
        id: &str,
        transactions: DealTransactionsResourceProvider,
    ) -> StoreResult<Deal> {
        self.update_deal(id, |deal| deal.transactions.resource_provider = transactions)
    }

    async fn update_deal_transactions_mediator(
        &self,
        id: &str,
        transactions: DealTransactionsMediator,
    ) -> StoreResult<Deal> {
        self.update_deal(id, |deal| deal.transactions.mediator = transactions)
    }

    async fn remove_deal(&self, id: &str) -> StoreResult<()> {
        self.deals
            .write()
            .remove(id)
            .map(|_| log::debug!("Deal [{}] removed.", id))
            .ok_or_else(|| StoreError::NotFound(EntityKind::Deal, id.to_string()))
    }

    async fn add_result(&self, result: DealResult) -> StoreResult<DealResult> {
        match self.results.write().entry(result.deal_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(EntityKind::Result, result.deal_id)),
            Entry::Vacant(entry) => {
                log::debug!("Result [{}] of deal [{}] added.", result.id, result.deal_id);
                Ok(entry.insert(result).clone())
            }
        }
    }

    async fn get_result(&self, deal_id: &str) -> StoreResult<Option<DealResult>> {
        Ok(self.results.read().get(deal_id).cloned())
    }

    async fn get_results(&self) -> StoreResult<Vec<DealResult>> {
        let results = self.results.read();
        Ok(sorted_by(results.values().cloned(), |result| {
            result.deal_id.clone()
        }))
    }

    async fn remove_result(&self, deal_id: &str) -> StoreResult<()> {
        self.results
            .write()
            .remove(deal_id)
            .map(|_| log::debug!("Result of deal [{}] removed.", deal_id))
            .ok_or_else(|| StoreError::NotFound(EntityKind::Result, deal_id.to_string()))
    }

    async fn add_match_decision(
        &self,
        resource_offer: &str,
        job_offer: &str,
        deal: &str,
        result: bool,
    ) -> StoreResult<MatchDecision> {
        let decision = self.match_decisions.write().upsert(MatchDecision {
            resource_offer: resource_offer.to_string(),
            job_offer: job_offer.to_string(),
            deal: deal.to_string(),
            result,
        });
        log::trace!(
            "Match decision for [{}] and [{}] recorded: {}.",
            resource_offer,
            job_offer,
            result
        );
        Ok(decision)
    }

    async fn get_match_decision(
        &self,
        resource_offer: &str,
        job_offer: &str,
    ) -> StoreResult<Option<MatchDecision>> {
        Ok(self
            .match_decisions
            .read()
            .get(resource_offer, job_offer)
            .cloned())
    }

    async fn get_match_decisions(&self) -> StoreResult<Vec<MatchDecision>> {
        let ledger = self.match_decisions.read();
        Ok(sorted_by(ledger.iter().cloned(), MatchDecision::match_id))
    }

    async fn remove_match_decisions(&self, filter: &MatchDecisionFilter) -> StoreResult<usize> {
        let removed = self.match_decisions.write().remove(filter);
        log::debug!("Removed {} match decisions for {:?}.", removed, filter);
        Ok(removed)
    }
}
