//! Random records for exercising store backends.
use rand::distributions::Alphanumeric;
use rand::Rng;

use solver_model::{
    AgreementState, Deal, DealResult, DealTransactions, DealTransactionsJobCreator,
    DealTransactionsMediator, DealTransactionsResourceProvider, JobOffer, MatchDecision,
    ResourceOffer,
};

fn random_hex(bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    let data: Vec<u8> = (0..bytes).map(|_| rng.gen()).collect();
    hex::encode(data)
}

fn maybe_tx_hash() -> Option<String> {
    match rand::thread_rng().gen_bool(0.5) {
        true => Some(generate_tx_hash()),
        false => None,
    }
}

fn count(min: usize, max: usize) -> usize {
    rand::thread_rng().gen_range(min..=max)
}

/// Content-address shaped id, unique with overwhelming probability.
pub fn generate_cid() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(44)
        .map(char::from)
        .collect();
    format!("Qm{}", suffix)
}

pub fn generate_eth_address() -> String {
    format!("0x{}", random_hex(20))
}

pub fn generate_tx_hash() -> String {
    format!("0x{}", random_hex(32))
}

pub fn generate_state() -> u8 {
    rand::thread_rng().gen_range(0..=AgreementState::JobOfferCancelled.code())
}

pub fn generate_job_offer() -> JobOffer {
    JobOffer {
        id: generate_cid(),
        job_creator: generate_eth_address(),
        deal_id: None,
        state: AgreementState::DealNegotiating.code(),
    }
}

pub fn generate_job_offers(min: usize, max: usize) -> Vec<JobOffer> {
    (0..count(min, max)).map(|_| generate_job_offer()).collect()
}

pub fn generate_resource_offer() -> ResourceOffer {
    ResourceOffer {
        id: generate_cid(),
        resource_provider: generate_eth_address(),
        deal_id: None,
        state: AgreementState::DealNegotiating.code(),
    }
}

pub fn generate_resource_offers(min: usize, max: usize) -> Vec<ResourceOffer> {
    (0..count(min, max))
        .map(|_| generate_resource_offer())
        .collect()
}

pub fn generate_deal_transactions() -> DealTransactions {
    DealTransactions {
        job_creator: DealTransactionsJobCreator {
            agree: maybe_tx_hash(),
            accept_result: maybe_tx_hash(),
            check_result: maybe_tx_hash(),
            timeout_agree: maybe_tx_hash(),
            timeout_submit_result: maybe_tx_hash(),
            timeout_mediate_result: maybe_tx_hash(),
        },
        resource_provider: DealTransactionsResourceProvider {
            agree: maybe_tx_hash(),
            add_result: maybe_tx_hash(),
            timeout_agree: maybe_tx_hash(),
            timeout_judge_result: maybe_tx_hash(),
            timeout_mediate_result: maybe_tx_hash(),
        },
        mediator: DealTransactionsMediator {
            mediation_accept_result: maybe_tx_hash(),
            mediation_reject_result: maybe_tx_hash(),
        },
    }
}

pub fn generate_deal() -> Deal {
    let mediator = match rand::thread_rng().gen_bool(0.5) {
        true => Some(generate_eth_address()),
        false => None,
    };
    Deal {
        id: generate_cid(),
        job_creator: generate_eth_address(),
        resource_provider: generate_eth_address(),
        mediator,
        state: generate_state(),
        transactions: generate_deal_transactions(),
    }
}

pub fn generate_deals(min: usize, max: usize) -> Vec<Deal> {
    (0..count(min, max)).map(|_| generate_deal()).collect()
}

pub fn generate_result() -> DealResult {
    DealResult {
        deal_id: generate_cid(),
        id: generate_cid(),
    }
}

pub fn generate_results(min: usize, max: usize) -> Vec<DealResult> {
    (0..count(min, max)).map(|_| generate_result()).collect()
}

pub fn generate_match_decision() -> MatchDecision {
    let result = rand::thread_rng().gen_bool(0.5);
    MatchDecision {
        resource_offer: generate_cid(),
        job_offer: generate_cid(),
        deal: match result {
            true => generate_cid(),
            false => String::new(),
        },
        result,
    }
}

pub fn generate_match_decisions(min: usize, max: usize) -> Vec<MatchDecision> {
    (0..count(min, max))
        .map(|_| generate_match_decision())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_have_expected_shape() {
        let cid = generate_cid();
        assert!(cid.starts_with("Qm"));
        assert_eq!(cid.len(), 46);

        assert_eq!(generate_eth_address().len(), 42);
        assert_eq!(generate_tx_hash().len(), 66);
        assert!(AgreementState::from_code(generate_state()).is_some());
    }

    #[test]
    fn test_generated_batches_respect_bounds() {
        let offers = generate_job_offers(5, 10);
        assert!((5..=10).contains(&offers.len()));

        let ids: HashSet<_> = offers.iter().map(|offer| offer.id.clone()).collect();
        assert_eq!(ids.len(), offers.len());
    }
}
