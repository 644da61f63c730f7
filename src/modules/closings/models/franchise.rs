use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Franchisee share used for any franchise without an explicit rule.
///
/// Unknown identities fall back to this value instead of failing; whether
/// that should become a hard error is an open policy decision.
pub const DEFAULT_FRANCHISEE_SHARE_PCT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Franchise codes accepted by the closing command
pub const SUPPORTED_FRANCHISES: [&str; 2] = ["CVT", "CVF"];

/// Franchise identity, normalized to upper case (`CVT`, `CVF`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FranchiseId(String);

impl FranchiseId {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_FRANCHISES.contains(&self.0.as_str())
    }

    /// Percentage of the net profit paid to the franchisee
    pub fn franchisee_share_pct(&self) -> Decimal {
        match self.0.as_str() {
            "CVT" => Decimal::from(40),
            "CVF" => Decimal::from(50),
            other => {
                tracing::warn!(
                    franchise = other,
                    default_pct = %DEFAULT_FRANCHISEE_SHARE_PCT,
                    "No share rule for franchise, using default"
                );
                DEFAULT_FRANCHISEE_SHARE_PCT
            }
        }
    }
}

impl fmt::Display for FranchiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FranchiseId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
