use serde::{Deserialize, Serialize};

use crate::state::AgreementState;

/// Compute work posted by a job creator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
    /// Content address of the offer.
    pub id: String,
    pub job_creator: String,
    /// Deal this offer was matched into; `None` while unmatched.
    pub deal_id: Option<String>,
    pub state: u8,
}

impl JobOffer {
    /// Unmatched offer in the default agreement state.
    pub fn new(id: impl Into<String>, job_creator: impl Into<String>) -> JobOffer {
        JobOffer {
            id: id.into(),
            job_creator: job_creator.into(),
            deal_id: None,
            state: AgreementState::default().code(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.deal_id.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == AgreementState::JobOfferCancelled.code()
    }
}

/// Capacity advertised by a resource provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOffer {
    pub id: String,
    pub resource_provider: String,
    pub deal_id: Option<String>,
    pub state: u8,
}

impl ResourceOffer {
    pub fn new(id: impl Into<String>, resource_provider: impl Into<String>) -> ResourceOffer {
        ResourceOffer {
            id: id.into(),
            resource_provider: resource_provider.into(),
            deal_id: None,
            state: AgreementState::default().code(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.deal_id.is_some()
    }

    pub fn is_active(&self) -> bool {
        AgreementState::is_active_code(self.state)
    }
}
