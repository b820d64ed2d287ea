mod utils;

use solver_store::testing::{generate_cid, generate_eth_address, generate_resource_offers};
use solver_store::{AgreementState, ResourceOffer, ResourceOffersQuery};

#[tokio::test]
async fn test_resource_offer_round_trip() {
    for store in utils::stores("resource_offer_round_trip") {
        let mut offers = generate_resource_offers(5, 10);
        for offer in &offers {
            store.add_resource_offer(offer.clone()).await.unwrap();
        }

        for offer in &offers {
            assert_eq!(
                store.get_resource_offer(&offer.id).await.unwrap().as_ref(),
                Some(offer),
                "backend: {}",
                store.backend
            );
        }

        offers.sort_by(|a, b| a.id.cmp(&b.id));
        let listed = store
            .get_resource_offers(&ResourceOffersQuery::default())
            .await
            .unwrap();
        assert_eq!(listed, offers, "backend: {}", store.backend);
    }
}

#[tokio::test]
async fn test_resource_offer_duplicate_and_missing() {
    for store in utils::stores("resource_offer_duplicate") {
        let offer = ResourceOffer::new(generate_cid(), generate_eth_address());
        store.add_resource_offer(offer.clone()).await.unwrap();
        assert!(store
            .add_resource_offer(offer.clone())
            .await
            .unwrap_err()
            .is_duplicate());

        assert_eq!(store.get_resource_offer("QmMissing").await.unwrap(), None);
        assert!(store
            .remove_resource_offer("QmMissing")
            .await
            .unwrap_err()
            .is_not_found());
        assert!(store
            .update_resource_offer_state("QmMissing", None, 0)
            .await
            .unwrap_err()
            .is_not_found());
    }
}

#[tokio::test]
async fn test_resource_offer_by_address_returns_latest() {
    for store in utils::stores("resource_offer_by_address") {
        let provider = generate_eth_address();
        // Ids sort opposite to insertion order.
        let first = ResourceOffer::new("QmZ", provider.clone());
        let second = ResourceOffer::new("QmA", provider.clone());
        store.add_resource_offer(first.clone()).await.unwrap();
        store.add_resource_offer(second.clone()).await.unwrap();
        store
            .add_resource_offer(ResourceOffer::new("QmM", generate_eth_address()))
            .await
            .unwrap();

        assert_eq!(
            store.get_resource_offer_by_address(&provider).await.unwrap(),
            Some(second.clone()),
            "backend: {}",
            store.backend
        );

        store.remove_resource_offer(&second.id).await.unwrap();
        assert_eq!(
            store.get_resource_offer_by_address(&provider).await.unwrap(),
            Some(first.clone())
        );

        store.remove_resource_offer(&first.id).await.unwrap();
        assert_eq!(
            store.get_resource_offer_by_address(&provider).await.unwrap(),
            None
        );
        assert_eq!(
            store
                .get_resource_offer_by_address(&generate_eth_address())
                .await
                .unwrap(),
            None
        );
    }
}

#[tokio::test]
async fn test_resource_offers_query_filters() {
    for store in utils::stores("resource_offers_query") {
        let provider = generate_eth_address();
        let open = ResourceOffer::new("QmA", provider.clone());
        let agreed = ResourceOffer {
            deal_id: Some(generate_cid()),
            state: AgreementState::DealAgreed.code(),
            ..ResourceOffer::new("QmB", provider.clone())
        };
        let submitted = ResourceOffer {
            deal_id: Some(generate_cid()),
            state: AgreementState::ResultsSubmitted.code(),
            ..ResourceOffer::new("QmC", provider.clone())
        };
        let foreign = ResourceOffer::new("QmD", generate_eth_address());
        for offer in vec![&open, &agreed, &submitted, &foreign] {
            store.add_resource_offer(offer.clone()).await.unwrap();
        }

        let active = store
            .get_resource_offers(&ResourceOffersQuery {
                resource_provider: Some(provider.clone()),
                active: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active, vec![open.clone(), agreed.clone()]);

        let not_matched = store
            .get_resource_offers(&ResourceOffersQuery {
                not_matched: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(not_matched, vec![open.clone(), foreign.clone()]);

        let combined = store
            .get_resource_offers(&ResourceOffersQuery {
                resource_provider: Some(provider.clone()),
                not_matched: true,
                active: true,
            })
            .await
            .unwrap();
        assert_eq!(combined, vec![open.clone()], "backend: {}", store.backend);
    }
}

#[tokio::test]
async fn test_resource_offer_update_state() {
    for store in utils::stores("resource_offer_update") {
        let offer = ResourceOffer::new(generate_cid(), generate_eth_address());
        store.add_resource_offer(offer.clone()).await.unwrap();

        let deal_id = generate_cid();
        let updated = store
            .update_resource_offer_state(
                &offer.id,
                Some(deal_id.clone()),
                AgreementState::ResultsSubmitted.code(),
            )
            .await
            .unwrap();
        assert_eq!(updated.deal_id, Some(deal_id));
        assert!(!updated.is_active());

        // Offer keeps its position in the provider index.
        assert_eq!(
            store
                .get_resource_offer_by_address(&offer.resource_provider)
                .await
                .unwrap(),
            Some(updated)
        );
    }
}
