use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which premium figure(s) the gross commission is computed on.
///
/// Values outside the portal's fixed set are kept verbatim in `Other` and
/// take the premium-amount fallback path; they are never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommissionBasis {
    Net,
    Od,
    Tp,
    OdTp,
    OnlinePoints,
    Fixed,
    Other(String),
}

impl CommissionBasis {
    pub fn label(&self) -> &str {
        match self {
            CommissionBasis::Net => "Net",
            CommissionBasis::Od => "OD",
            CommissionBasis::Tp => "TP",
            CommissionBasis::OdTp => "OD+TP",
            CommissionBasis::OnlinePoints => "ONLINE POINTS",
            CommissionBasis::Fixed => "Fixed",
            CommissionBasis::Other(raw) => raw,
        }
    }

    pub fn is_recognised(&self) -> bool {
        !matches!(self, CommissionBasis::Other(_))
    }
}

impl Default for CommissionBasis {
    fn default() -> Self {
        CommissionBasis::Other(String::new())
    }
}

impl From<&str> for CommissionBasis {
    fn from(raw: &str) -> Self {
        match raw {
            "Net" => CommissionBasis::Net,
            "OD" => CommissionBasis::Od,
            "TP" => CommissionBasis::Tp,
            "OD+TP" => CommissionBasis::OdTp,
            "ONLINE POINTS" => CommissionBasis::OnlinePoints,
            "Fixed" => CommissionBasis::Fixed,
            other => CommissionBasis::Other(other.to_string()),
        }
    }
}

impl From<String> for CommissionBasis {
    fn from(raw: String) -> Self {
        CommissionBasis::from(raw.as_str())
    }
}

impl fmt::Display for CommissionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CommissionBasis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CommissionBasis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(CommissionBasis::from).unwrap_or_default())
    }
}

/// Settlement status of a payout. Plays no part in the calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Yes,
    #[default]
    No,
}

impl PaymentStatus {
    pub fn is_received(self) -> bool {
        matches!(self, PaymentStatus::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_round_trip() {
        for label in ["Net", "OD", "TP", "OD+TP", "ONLINE POINTS", "Fixed"] {
            let basis = CommissionBasis::from(label);
            assert!(basis.is_recognised(), "{label} should be recognised");
            assert_eq!(basis.label(), label);
        }
    }

    #[test]
    fn test_unknown_label_is_kept() {
        let basis = CommissionBasis::from("Gross");
        assert_eq!(basis, CommissionBasis::Other("Gross".into()));
        assert!(!basis.is_recognised());
        assert_eq!(basis.to_string(), "Gross");
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(
            CommissionBasis::from("net"),
            CommissionBasis::Other("net".into())
        );
    }

    #[test]
    fn test_null_deserialises_to_fallback() {
        let basis: CommissionBasis = serde_json::from_str("null").unwrap();
        assert_eq!(basis, CommissionBasis::default());
        let basis: CommissionBasis = serde_json::from_str("\"OD+TP\"").unwrap();
        assert_eq!(basis, CommissionBasis::OdTp);
    }

    #[test]
    fn test_payment_status_default() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::No);
        assert!(PaymentStatus::Yes.is_received());
    }
}
