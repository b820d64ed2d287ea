use serde::{Deserialize, Serialize};

/// Output reference submitted by the resource provider of a deal.
///
/// Keyed by `deal_id`; a deal has at most one result.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealResult {
    pub deal_id: String,
    /// Content address of the result payload.
    pub id: String,
}
