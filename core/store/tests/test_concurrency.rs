mod utils;

use futures::future::join_all;
use std::sync::Arc;

use solver_store::testing::{
    generate_deals, generate_job_offers, generate_match_decisions, generate_resource_offers,
    generate_results,
};
use solver_store::{AgreementState, JobOffer, JobOffersQuery, ResourceOffersQuery, SolverStore};

const WRITERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_across_collections() {
    for test_store in utils::stores("concurrent_writes") {
        let store: Arc<dyn SolverStore> = test_store.store.clone();

        let job_offers = generate_job_offers(WRITERS, WRITERS);
        let resource_offers = generate_resource_offers(WRITERS, WRITERS);
        let deals = generate_deals(WRITERS, WRITERS);
        let results = generate_results(WRITERS, WRITERS);
        let decisions = generate_match_decisions(WRITERS, WRITERS);

        let mut tasks = Vec::new();
        for idx in 0..WRITERS {
            let store = store.clone();
            let job_offer = job_offers[idx].clone();
            let resource_offer = resource_offers[idx].clone();
            let deal = deals[idx].clone();
            let result = results[idx].clone();
            let decision = decisions[idx].clone();

            tasks.push(tokio::spawn(async move {
                store.add_job_offer(job_offer.clone()).await?;
                store.add_resource_offer(resource_offer).await?;
                store.add_deal(deal).await?;
                store.add_result(result).await?;
                store
                    .add_match_decision(
                        &decision.resource_offer,
                        &decision.job_offer,
                        &decision.deal,
                        decision.result,
                    )
                    .await?;
                store
                    .update_job_offer_state(
                        &job_offer.id,
                        None,
                        AgreementState::DealAgreed.code(),
                    )
                    .await?;
                solver_store::StoreResult::Ok(())
            }));
        }

        for outcome in join_all(tasks).await {
            outcome.unwrap().unwrap();
        }

        let backend = test_store.backend;
        let stored_job_offers = store
            .get_job_offers(&JobOffersQuery::default())
            .await
            .unwrap();
        assert_eq!(stored_job_offers.len(), WRITERS, "backend: {}", backend);
        assert!(stored_job_offers
            .iter()
            .all(|offer| offer.state == AgreementState::DealAgreed.code()));
        assert_eq!(
            store
                .get_resource_offers(&ResourceOffersQuery::default())
                .await
                .unwrap()
                .len(),
            WRITERS
        );
        assert_eq!(store.get_deals_all().await.unwrap().len(), WRITERS);
        assert_eq!(store.get_results().await.unwrap().len(), WRITERS);
        assert_eq!(store.get_match_decisions().await.unwrap().len(), WRITERS);

        for idx in 0..WRITERS {
            let agreed = JobOffer {
                state: AgreementState::DealAgreed.code(),
                ..job_offers[idx].clone()
            };
            assert_eq!(
                store.get_job_offer(&agreed.id).await.unwrap(),
                Some(agreed),
                "backend: {}",
                backend
            );
            assert_eq!(
                store
                    .get_resource_offer(&resource_offers[idx].id)
                    .await
                    .unwrap()
                    .as_ref(),
                Some(&resource_offers[idx])
            );
            assert_eq!(
                store.get_deal(&deals[idx].id).await.unwrap().as_ref(),
                Some(&deals[idx])
            );
            assert_eq!(
                store.get_result(&results[idx].deal_id).await.unwrap().as_ref(),
                Some(&results[idx])
            );
            let decision = &decisions[idx];
            assert_eq!(
                store
                    .get_match_decision(&decision.resource_offer, &decision.job_offer)
                    .await
                    .unwrap()
                    .as_ref(),
                Some(decision)
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_duplicate_adds_accept_one() {
    for test_store in utils::stores("racing_duplicates") {
        let store: Arc<dyn SolverStore> = test_store.store.clone();
        let offer = generate_job_offers(1, 1).remove(0);

        let tasks = (0..WRITERS).map(|_| {
            let store = store.clone();
            let offer = offer.clone();
            tokio::spawn(async move { store.add_job_offer(offer).await })
        });

        let outcomes: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|outcome| outcome.unwrap())
            .collect();
        let accepted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(accepted, 1, "backend: {}", test_store.backend);
        assert!(outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .all(|e| e.is_duplicate()));
    }
}
