use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use std::convert::TryFrom;

use solver_model::{AgreementState, ResourceOffer};
use solver_persistence::executor::{ConnType, PoolType};
use solver_persistence::{do_with_transaction, readonly_transaction, AsDao};

use super::{ensure_affected, on_insert_error};
use crate::db::model::{DbResourceOffer, NewDbResourceOffer};
use crate::db::schema::solver_resource_offer::dsl;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::query::{unset_if_empty, ResourceOffersQuery};

pub struct ResourceOfferDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for ResourceOfferDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> ResourceOfferDao<'c> {
    pub async fn insert(&self, mut offer: ResourceOffer) -> StoreResult<ResourceOffer> {
        offer.deal_id = unset_if_empty(offer.deal_id);
        do_with_transaction(self.pool, move |conn| {
            if select(conn, &offer.id)?.is_some() {
                return Err(StoreError::Duplicate(EntityKind::ResourceOffer, offer.id));
            }
            diesel::insert_into(dsl::solver_resource_offer)
                .values(NewDbResourceOffer::from(offer.clone()))
                .execute(conn)
                .map_err(on_insert_error(EntityKind::ResourceOffer, &offer.id))?;
            log::debug!(
                "Resource offer [{}] of provider [{}] added.",
                offer.id,
                offer.resource_provider
            );
            Ok(offer)
        })
        .await
    }

    pub async fn select(&self, id: &str) -> StoreResult<Option<ResourceOffer>> {
        let id = id.to_string();
        readonly_transaction(self.pool, move |conn| select(conn, &id)).await
    }

    /// Offer of the provider with the highest insertion sequence.
    pub async fn select_latest_of(
        &self,
        resource_provider: &str,
    ) -> StoreResult<Option<ResourceOffer>> {
        let resource_provider = resource_provider.to_string();
        readonly_transaction(self.pool, move |conn| {
            dsl::solver_resource_offer
                .filter(dsl::resource_provider.eq(&resource_provider))
                .order_by(dsl::seq.desc())
                .first::<DbResourceOffer>(conn)
                .optional()?
                .map(ResourceOffer::try_from)
                .transpose()
                .map_err(StoreError::from)
        })
        .await
    }

    pub async fn list(&self, query: &ResourceOffersQuery) -> StoreResult<Vec<ResourceOffer>> {
        let query = query.clone();
        readonly_transaction(self.pool, move |conn| {
            let mut statement = dsl::solver_resource_offer
                .order_by(dsl::id.asc())
                .into_boxed();

            if let Some(resource_provider) = query.resource_provider() {
                statement =
                    statement.filter(dsl::resource_provider.eq(resource_provider.to_string()));
            }
            if query.not_matched {
                statement = statement.filter(dsl::deal_id.is_null());
            }
            if query.active {
                let codes = AgreementState::active_codes()
                    .into_iter()
                    .map(i32::from)
                    .collect::<Vec<_>>();
                statement = statement.filter(dsl::state.eq_any(codes));
            }

            log::trace!("Listing resource offers for {:?}.", query);
            statement
                .load::<DbResourceOffer>(conn)?
                .into_iter()
                .map(|offer| ResourceOffer::try_from(offer).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    pub async fn update_state(
        &self,
        id: &str,
        deal_id: Option<String>,
        state: u8,
    ) -> StoreResult<ResourceOffer> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let updated = diesel::update(dsl::solver_resource_offer.filter(dsl::id.eq(&id)))
                .set((
                    dsl::deal_id.eq(unset_if_empty(deal_id)),
                    dsl::state.eq(state as i32),
                ))
                .execute(conn)?;
            ensure_affected(updated, EntityKind::ResourceOffer, &id)?;
            log::debug!("Resource offer [{}] moved to state {}.", id, state);

            select(conn, &id)?.ok_or(StoreError::NotFound(EntityKind::ResourceOffer, id))
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        do_with_transaction(self.pool, move |conn| {
            let deleted = diesel::delete(dsl::solver_resource_offer.filter(dsl::id.eq(&id)))
                .execute(conn)?;
            ensure_affected(deleted, EntityKind::ResourceOffer, &id)?;
            log::debug!("Resource offer [{}] removed.", id);
            Ok(())
        })
        .await
    }
}

fn select(conn: &ConnType, id: &str) -> StoreResult<Option<ResourceOffer>> {
    dsl::solver_resource_offer
        .filter(dsl::id.eq(id))
        .first::<DbResourceOffer>(conn)
        .optional()?
        .map(ResourceOffer::try_from)
        .transpose()
        .map_err(StoreError::from)
}
