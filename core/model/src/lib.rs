//! Records exchanged between the solver store and its collaborators.
//!
//! Offer and deal `state` fields carry raw [`AgreementState`] codes. The
//! store persists them as given; transition rules belong to the callers.

pub mod deal;
pub mod matching;
pub mod offer;
pub mod result;
pub mod state;

pub use deal::{
    Deal, DealTransactions, DealTransactionsJobCreator, DealTransactionsMediator,
    DealTransactionsResourceProvider,
};
pub use matching::{MatchDecision, MatchId, MatchIdParseError};
pub use offer::{JobOffer, ResourceOffer};
pub use result::DealResult;
pub use state::{AgreementState, AgreementStateParseError};
