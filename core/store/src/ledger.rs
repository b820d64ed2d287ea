//! Match-decision ledger kept in process memory.
//!
//! Decisions live in one map keyed by [`MatchId`]. Two auxiliary indexes,
//! by resource offer id and by job offer id, let wildcard removal visit only
//! the affected decisions. Every mutation keeps the three maps consistent.
use std::collections::{HashMap, HashSet};

use solver_model::{MatchDecision, MatchId};

use crate::query::MatchDecisionFilter;

#[derive(Default, Debug)]
pub struct MatchLedger {
    decisions: HashMap<MatchId, MatchDecision>,
    by_resource_offer: HashMap<String, HashSet<MatchId>>,
    by_job_offer: HashMap<String, HashSet<MatchId>>,
}

impl MatchLedger {
    pub fn new() -> MatchLedger {
        MatchLedger::default()
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Inserts or replaces the decision for its offer pair.
    pub fn upsert(&mut self, decision: MatchDecision) -> MatchDecision {
        let id = decision.match_id();
        if let Some(previous) = self.decisions.remove(&id) {
            self.unlink(&id, &previous);
        }

        self.by_resource_offer
            .entry(decision.resource_offer.clone())
            .or_default()
            .insert(id);
        self.by_job_offer
            .entry(decision.job_offer.clone())
            .or_default()
            .insert(id);
        self.decisions.insert(id, decision.clone());
        decision
    }

    pub fn get(&self, resource_offer: &str, job_offer: &str) -> Option<&MatchDecision> {
        self.decisions.get(&MatchId::new(resource_offer, job_offer))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchDecision> {
        self.decisions.values()
    }

    /// Removes the decisions selected by `filter`, returning how many were dropped.
    pub fn remove(&mut self, filter: &MatchDecisionFilter) -> usize {
        let ids: Vec<MatchId> = match (filter.resource_offer_id(), filter.job_offer_id()) {
            (Some(resource_offer), Some(job_offer)) => {
                vec![MatchId::new(resource_offer, job_offer)]
            }
            (Some(resource_offer), None) => self
                .by_resource_offer
                .get(resource_offer)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
            (None, Some(job_offer)) => self
                .by_job_offer
                .get(job_offer)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
            (None, None) => return 0,
        };

        let mut removed = 0;
        for id in ids {
            if let Some(decision) = self.decisions.remove(&id) {
                self.unlink(&id, &decision);
                removed += 1;
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.decisions.clear();
        self.by_resource_offer.clear();
        self.by_job_offer.clear();
    }

    fn unlink(&mut self, id: &MatchId, decision: &MatchDecision) {
        unlink_from(&mut self.by_resource_offer, &decision.resource_offer, id);
        unlink_from(&mut self.by_job_offer, &decision.job_offer, id);
    }
}

fn unlink_from(index: &mut HashMap<String, HashSet<MatchId>>, key: &str, id: &MatchId) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(resource_offer: &str, job_offer: &str, result: bool) -> MatchDecision {
        MatchDecision {
            resource_offer: resource_offer.to_string(),
            job_offer: job_offer.to_string(),
            deal: format!("deal-{}-{}", resource_offer, job_offer),
            result,
        }
    }

    fn seeded() -> MatchLedger {
        let mut ledger = MatchLedger::new();
        ledger.upsert(decision("R1", "J1", true));
        ledger.upsert(decision("R1", "J2", false));
        ledger.upsert(decision("R2", "J1", false));
        ledger
    }

    #[test]
    fn test_upsert_replaces_decision_for_pair() {
        let mut ledger = MatchLedger::new();
        ledger.upsert(decision("R1", "J1", false));
        ledger.upsert(decision("R1", "J1", true));

        assert_eq!(ledger.len(), 1);
        assert!(ledger.get("R1", "J1").unwrap().result);
    }

    #[test]
    fn test_remove_by_resource_offer() {
        let mut ledger = seeded();
        assert_eq!(ledger.remove(&MatchDecisionFilter::resource_offer("R1")), 2);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get("R2", "J1").is_some());
        assert!(ledger.by_resource_offer.get("R1").is_none());
        assert_eq!(ledger.by_job_offer.get("J1").map(HashSet::len), Some(1));
        assert!(ledger.by_job_offer.get("J2").is_none());
    }

    #[test]
    fn test_remove_by_job_offer() {
        let mut ledger = seeded();
        assert_eq!(ledger.remove(&MatchDecisionFilter::job_offer("J1")), 2);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get("R1", "J2").is_some());
    }

    #[test]
    fn test_remove_pair_and_missing() {
        let mut ledger = seeded();
        assert_eq!(ledger.remove(&MatchDecisionFilter::pair("R1", "J2")), 1);
        assert_eq!(ledger.remove(&MatchDecisionFilter::pair("R1", "J2")), 0);
        assert_eq!(ledger.remove(&MatchDecisionFilter::default()), 0);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut ledger = seeded();
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.remove(&MatchDecisionFilter::resource_offer("R1")), 0);
    }
}
