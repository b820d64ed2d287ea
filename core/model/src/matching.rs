use digest::Digest;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::Sha3_256;
use std::{fmt::Display, str::FromStr};

pub const MATCH_ID_LEN: usize = 64;
pub const MATCH_ID_BYTES_LEN: usize = 32;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchIdParseError {
    #[error("Match id [{0}] contains non hexadecimal characters.")]
    NotHexadecimal(String),
    #[error("Match id [{0}] has invalid length. Should be |{}|", MATCH_ID_LEN)]
    InvalidLength(String),
}

/// Key of a match decision, derived from the pair of offer ids.
///
/// Ids are sorted before hashing, so the key does not depend on which one
/// is passed first.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchId {
    hash: [u8; MATCH_ID_BYTES_LEN],
}

impl MatchId {
    pub fn new(resource_offer: &str, job_offer: &str) -> MatchId {
        let (first, second) = if resource_offer <= job_offer {
            (resource_offer, job_offer)
        } else {
            (job_offer, resource_offer)
        };

        let mut hasher = Sha3_256::new();
        hasher.input(first);
        // Separator keeps ("ab", "c") and ("a", "bc") apart.
        hasher.input([0u8]);
        hasher.input(second);

        let mut hash = [0u8; MATCH_ID_BYTES_LEN];
        hash.copy_from_slice(&hasher.result());
        MatchId { hash }
    }

    pub fn to_bytes(&self) -> [u8; MATCH_ID_BYTES_LEN] {
        self.hash
    }
}

impl FromStr for MatchId {
    type Err = MatchIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.chars().all(|character| character.is_ascii_hexdigit()) {
            return Err(MatchIdParseError::NotHexadecimal(s.to_string()));
        }
        if s.len() != MATCH_ID_LEN {
            return Err(MatchIdParseError::InvalidLength(s.to_string()));
        }

        let mut hash = [0u8; MATCH_ID_BYTES_LEN];
        hex::decode_to_slice(s, &mut hash)
            .map_err(|_| MatchIdParseError::NotHexadecimal(s.to_string()))?;
        Ok(MatchId { hash })
    }
}

impl Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.hash))
    }
}

impl Serialize for MatchId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MatchId::from_str(&s).map_err(de::Error::custom)
    }
}

/// Outcome of evaluating one (resource offer, job offer) candidate pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub resource_offer: String,
    pub job_offer: String,
    /// Deal created for the pair; empty when the pair was rejected.
    pub deal: String,
    /// Whether the pair was accepted into a deal.
    pub result: bool,
}

impl MatchDecision {
    pub fn match_id(&self) -> MatchId {
        MatchId::new(&self.resource_offer, &self.job_offer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_match_id_is_deterministic() {
        assert_eq!(MatchId::new("QmA", "QmB"), MatchId::new("QmA", "QmB"));
        assert_ne!(MatchId::new("QmA", "QmB"), MatchId::new("QmA", "QmC"));
    }

    #[test]
    fn test_match_id_ignores_argument_order() {
        assert_eq!(MatchId::new("QmA", "QmB"), MatchId::new("QmB", "QmA"));
    }

    #[test]
    fn test_match_id_separates_components() {
        assert_ne!(MatchId::new("ab", "c"), MatchId::new("a", "bc"));
    }

    #[test]
    fn test_match_id_text_form() {
        let id = MatchId::new("QmResource", "QmJob");
        let text = id.to_string();
        assert_eq!(text.len(), MATCH_ID_LEN);
        assert_eq!(MatchId::from_str(&text).unwrap(), id);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", text));
        assert_eq!(serde_json::from_str::<MatchId>(&json).unwrap(), id);
    }

    #[test_case("zz" ; "not hex")]
    #[test_case("abcd" ; "too short")]
    fn test_invalid_match_id(input: &str) {
        assert!(MatchId::from_str(input).is_err());
    }
}
