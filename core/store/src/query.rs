//! Filter descriptors accepted by the store's query operations.
//!
//! Every field is optional and filters combine with AND. An absent string
//! filter, or an empty one, does not restrict the result.
use serde::{Deserialize, Serialize};

use solver_model::{AgreementState, Deal, JobOffer, MatchDecision, ResourceOffer};

use crate::error::StoreResult;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Empty deal ids and addresses mean "unset" and are stored as `None`.
pub(crate) fn unset_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffersQuery {
    pub job_creator: Option<String>,
    /// Only offers without a deal.
    pub not_matched: bool,
    /// Cancelled offers are left out unless this is set.
    pub include_cancelled: bool,
}

impl JobOffersQuery {
    pub fn job_creator(&self) -> Option<&str> {
        non_empty(&self.job_creator)
    }

    pub fn matches(&self, offer: &JobOffer) -> bool {
        if let Some(job_creator) = self.job_creator() {
            if offer.job_creator != job_creator {
                return false;
            }
        }
        if self.not_matched && offer.is_matched() {
            return false;
        }
        self.include_cancelled || !offer.is_cancelled()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOffersQuery {
    pub resource_provider: Option<String>,
    pub not_matched: bool,
    /// Only offers in a state before results were submitted.
    pub active: bool,
}

impl ResourceOffersQuery {
    pub fn resource_provider(&self) -> Option<&str> {
        non_empty(&self.resource_provider)
    }

    pub fn matches(&self, offer: &ResourceOffer) -> bool {
        if let Some(resource_provider) = self.resource_provider() {
            if offer.resource_provider != resource_provider {
                return false;
            }
        }
        if self.not_matched && offer.is_matched() {
            return false;
        }
        !self.active || offer.is_active()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealsQuery {
    pub job_creator: Option<String>,
    pub resource_provider: Option<String>,
    pub mediator: Option<String>,
    /// State name, e.g. `DealAgreed`.
    pub state: Option<String>,
}

impl DealsQuery {
    /// Code of the requested state, failing on names outside the enumeration.
    pub fn state_code(&self) -> StoreResult<Option<u8>> {
        Ok(match non_empty(&self.state) {
            Some(name) => Some(AgreementState::code_of(name)?),
            None => None,
        })
    }

    pub fn resolve(&self) -> StoreResult<DealsFilter> {
        Ok(DealsFilter {
            job_creator: non_empty(&self.job_creator).map(str::to_string),
            resource_provider: non_empty(&self.resource_provider).map(str::to_string),
            mediator: non_empty(&self.mediator).map(str::to_string),
            state: self.state_code()?,
        })
    }
}

/// [`DealsQuery`] with the state name resolved to its code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DealsFilter {
    pub job_creator: Option<String>,
    pub resource_provider: Option<String>,
    pub mediator: Option<String>,
    pub state: Option<u8>,
}

impl DealsFilter {
    pub fn matches(&self, deal: &Deal) -> bool {
        if let Some(job_creator) = &self.job_creator {
            if &deal.job_creator != job_creator {
                return false;
            }
        }
        if let Some(resource_provider) = &self.resource_provider {
            if &deal.resource_provider != resource_provider {
                return false;
            }
        }
        if let Some(mediator) = &self.mediator {
            if deal.mediator.as_ref() != Some(mediator) {
                return false;
            }
        }
        self.state.map_or(true, |state| deal.state == state)
    }
}

/// Selects match decisions by either or both offer ids.
///
/// An absent component matches any value in that position. A filter with
/// both components absent selects nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDecisionFilter {
    pub resource_offer: Option<String>,
    pub job_offer: Option<String>,
}

impl MatchDecisionFilter {
    pub fn pair(resource_offer: impl Into<String>, job_offer: impl Into<String>) -> Self {
        MatchDecisionFilter {
            resource_offer: Some(resource_offer.into()),
            job_offer: Some(job_offer.into()),
        }
    }

    pub fn resource_offer(resource_offer: impl Into<String>) -> Self {
        MatchDecisionFilter {
            resource_offer: Some(resource_offer.into()),
            job_offer: None,
        }
    }

    pub fn job_offer(job_offer: impl Into<String>) -> Self {
        MatchDecisionFilter {
            resource_offer: None,
            job_offer: Some(job_offer.into()),
        }
    }

    /// Builds a filter from raw ids where an empty string is a wildcard.
    pub fn from_ids(resource_offer: &str, job_offer: &str) -> Self {
        MatchDecisionFilter {
            resource_offer: Some(resource_offer.to_string()).filter(|id| !id.is_empty()),
            job_offer: Some(job_offer.to_string()).filter(|id| !id.is_empty()),
        }
    }

    pub fn resource_offer_id(&self) -> Option<&str> {
        non_empty(&self.resource_offer)
    }

    pub fn job_offer_id(&self) -> Option<&str> {
        non_empty(&self.job_offer)
    }

    pub fn is_empty(&self) -> bool {
        self.resource_offer_id().is_none() && self.job_offer_id().is_none()
    }

    /// Positional match; used for wildcard filters.
    pub fn matches(&self, decision: &MatchDecision) -> bool {
        if self.is_empty() {
            return false;
        }
        self.resource_offer_id()
            .map_or(true, |id| decision.resource_offer == id)
            && self.job_offer_id().map_or(true, |id| decision.job_offer == id)
    }
}
