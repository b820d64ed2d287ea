use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown agreement state [{0}].")]
pub struct AgreementStateParseError(pub String);

/// Lifecycle stages of an on-chain agreement.
///
/// Discriminants mirror the state codes of the controller contract and must
/// not be reordered.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    FromPrimitive,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[repr(u8)]
pub enum AgreementState {
    /// Offers are matched and both parties are deciding
    DealNegotiating = 0,
    /// Both parties agreed to the deal
    DealAgreed = 1,
    ResultsSubmitted = 2,
    ResultsAccepted = 3,
    ResultsRejected = 4,
    /// Job creator asked a mediator to check the results
    ResultsChecked = 5,
    MediationAccepted = 6,
    MediationRejected = 7,
    TimeoutAgree = 8,
    TimeoutSubmitResults = 9,
    TimeoutJudgeResults = 10,
    TimeoutMediateResults = 11,
    /// Job creator withdrew the offer before it was matched
    JobOfferCancelled = 12,
}

impl AgreementState {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<AgreementState> {
        AgreementState::from_u8(code)
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Resolves a state name to the code stored in records.
    pub fn code_of(name: &str) -> Result<u8, AgreementStateParseError> {
        Ok(AgreementState::from_str(name)?.code())
    }

    /// Offer is still before results were submitted.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            AgreementState::DealNegotiating | AgreementState::DealAgreed
        )
    }

    pub fn is_active_code(code: u8) -> bool {
        AgreementState::from_code(code).map_or(false, AgreementState::is_active)
    }

    pub fn active_codes() -> Vec<u8> {
        AgreementState::iter()
            .filter(|state| state.is_active())
            .map(AgreementState::code)
            .collect()
    }
}

impl Default for AgreementState {
    fn default() -> Self {
        AgreementState::DealNegotiating
    }
}

impl FromStr for AgreementState {
    type Err = AgreementStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgreementState::iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| AgreementStateParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("DealNegotiating", 0)]
    #[test_case("DealAgreed", 1)]
    #[test_case("ResultsSubmitted", 2)]
    #[test_case("TimeoutMediateResults", 11)]
    #[test_case("JobOfferCancelled", 12)]
    fn test_state_name_resolves_to_code(name: &str, code: u8) {
        assert_eq!(AgreementState::code_of(name).unwrap(), code);
        assert_eq!(AgreementState::from_code(code).unwrap().to_string(), name);
    }

    #[test]
    fn test_unknown_state_name() {
        assert_eq!(
            AgreementState::code_of("DealFinished"),
            Err(AgreementStateParseError("DealFinished".to_string()))
        );
        assert!(AgreementState::from_str("dealnegotiating").is_err());
    }

    #[test]
    fn test_codes_are_dense() {
        for (idx, state) in AgreementState::iter().enumerate() {
            assert_eq!(state.code() as usize, idx);
        }
        assert_eq!(AgreementState::from_code(13), None);
    }

    #[test_case(AgreementState::DealNegotiating, true)]
    #[test_case(AgreementState::DealAgreed, true)]
    #[test_case(AgreementState::ResultsSubmitted, false)]
    #[test_case(AgreementState::ResultsAccepted, false)]
    #[test_case(AgreementState::JobOfferCancelled, false)]
    fn test_active_states(state: AgreementState, active: bool) {
        assert_eq!(state.is_active(), active);
        assert_eq!(AgreementState::is_active_code(state.code()), active);
    }

    #[test]
    fn test_out_of_range_code_is_not_active() {
        assert!(!AgreementState::is_active_code(200));
        assert_eq!(AgreementState::default().code(), 0);
    }
}
