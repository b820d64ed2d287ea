#[macro_use]
mod utils;

use solver_store::testing::{generate_cid, generate_eth_address, generate_job_offers};
use solver_store::{AgreementState, EntityKind, JobOffer, JobOffersQuery, StoreError};

#[tokio::test]
async fn test_job_offer_round_trip() {
    for store in utils::stores("job_offer_round_trip") {
        let mut offers = generate_job_offers(5, 10);
        for offer in &offers {
            let added = store.add_job_offer(offer.clone()).await.unwrap();
            assert_eq!(&added, offer, "backend: {}", store.backend);
        }

        for offer in &offers {
            let loaded = store.get_job_offer(&offer.id).await.unwrap();
            assert_eq!(loaded.as_ref(), Some(offer), "backend: {}", store.backend);
        }

        offers.sort_by(|a, b| a.id.cmp(&b.id));
        let listed = store
            .get_job_offers(&JobOffersQuery::default())
            .await
            .unwrap();
        assert_eq!(listed, offers, "backend: {}", store.backend);
    }
}

#[tokio::test]
async fn test_job_offer_missing() {
    for store in utils::stores("job_offer_missing") {
        assert_eq!(store.get_job_offer("QmMissing").await.unwrap(), None);
        assert_err_eq!(
            StoreError::NotFound(EntityKind::JobOffer, "QmMissing".to_string()),
            store.remove_job_offer("QmMissing").await
        );
        assert!(store
            .update_job_offer_state("QmMissing", None, 1)
            .await
            .unwrap_err()
            .is_not_found());
    }
}

#[tokio::test]
async fn test_job_offer_duplicate_is_rejected() {
    for store in utils::stores("job_offer_duplicate") {
        let offer = JobOffer::new(generate_cid(), generate_eth_address());
        store.add_job_offer(offer.clone()).await.unwrap();

        let other_creator = JobOffer {
            job_creator: generate_eth_address(),
            ..offer.clone()
        };
        let err = store.add_job_offer(other_creator).await.unwrap_err();
        assert!(err.is_duplicate(), "backend: {}", store.backend);
        assert_eq!(store.get_job_offer(&offer.id).await.unwrap(), Some(offer));
    }
}

#[tokio::test]
async fn test_job_offer_remove_then_absent() {
    for store in utils::stores("job_offer_remove") {
        let offer = JobOffer::new(generate_cid(), generate_eth_address());
        store.add_job_offer(offer.clone()).await.unwrap();
        store.remove_job_offer(&offer.id).await.unwrap();

        assert_eq!(store.get_job_offer(&offer.id).await.unwrap(), None);
        assert!(store
            .get_job_offers(&JobOffersQuery::default())
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .remove_job_offer(&offer.id)
            .await
            .unwrap_err()
            .is_not_found());
    }
}

#[tokio::test]
async fn test_job_offer_update_state() {
    for store in utils::stores("job_offer_update") {
        let offer = JobOffer::new(generate_cid(), generate_eth_address());
        store.add_job_offer(offer.clone()).await.unwrap();

        let deal_id = generate_cid();
        let updated = store
            .update_job_offer_state(
                &offer.id,
                Some(deal_id.clone()),
                AgreementState::DealAgreed.code(),
            )
            .await
            .unwrap();
        assert_eq!(updated.deal_id.as_deref(), Some(deal_id.as_str()));
        assert_eq!(updated.state, AgreementState::DealAgreed.code());
        assert_eq!(updated.job_creator, offer.job_creator);
        assert_eq!(store.get_job_offer(&offer.id).await.unwrap(), Some(updated));
    }
}

#[tokio::test]
async fn test_job_offers_query_filters() {
    for store in utils::stores("job_offers_query") {
        let creator = generate_eth_address();
        let open = JobOffer::new("QmA", creator.clone());
        let matched = JobOffer {
            deal_id: Some(generate_cid()),
            state: AgreementState::DealAgreed.code(),
            ..JobOffer::new("QmB", creator.clone())
        };
        let cancelled = JobOffer {
            state: AgreementState::JobOfferCancelled.code(),
            ..JobOffer::new("QmC", creator.clone())
        };
        let foreign = JobOffer::new("QmD", generate_eth_address());
        for offer in vec![&open, &matched, &cancelled, &foreign] {
            store.add_job_offer(offer.clone()).await.unwrap();
        }

        let by_creator = store
            .get_job_offers(&JobOffersQuery {
                job_creator: Some(creator.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_creator, vec![open.clone(), matched.clone()]);

        let not_matched = store
            .get_job_offers(&JobOffersQuery {
                job_creator: Some(creator.clone()),
                not_matched: true,
                include_cancelled: true,
            })
            .await
            .unwrap();
        assert_eq!(not_matched, vec![open.clone(), cancelled.clone()]);

        let everything = store
            .get_job_offers(&JobOffersQuery {
                job_creator: Some(String::new()),
                include_cancelled: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(everything.len(), 4, "backend: {}", store.backend);
    }
}
