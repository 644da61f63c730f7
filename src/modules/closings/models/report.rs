use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::closing::{ClosingRecord, ClosingResult};

/// Where a closing's expenses went
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub fixed: Decimal,
    pub full_charge: Decimal,
    pub prorated_variable: Decimal,
    pub ad_hoc: Decimal,
}

impl From<&ClosingResult> for ExpenseBreakdown {
    fn from(result: &ClosingResult) -> Self {
        Self {
            fixed: result.total_fixed_prorated,
            full_charge: result.total_full_charge(),
            prorated_variable: result.total_prorated_variable(),
            ad_hoc: result.total_ad_hoc_prorated,
        }
    }
}

/// A stored closing plus metrics derived from it for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingReport {
    pub closing: ClosingRecord,
    /// `net_profit / gross_revenue * 100`; absent without revenue
    pub net_margin_pct: Option<Decimal>,
    /// Revenue change against the previous month's closing
    pub revenue_evolution_pct: Option<Decimal>,
    pub breakdown: ExpenseBreakdown,
}

impl ClosingReport {
    pub fn new(closing: ClosingRecord, previous: Option<&ClosingRecord>) -> Self {
        let result = &closing.result;
        let net_margin_pct = if result.gross_revenue > Decimal::ZERO {
            Some(result.net_profit / result.gross_revenue * Decimal::ONE_HUNDRED)
        } else {
            None
        };
        let revenue_evolution_pct = previous
            .map(|prev| prev.result.gross_revenue)
            .filter(|prev_revenue| *prev_revenue > Decimal::ZERO)
            .map(|prev_revenue| {
                (result.gross_revenue - prev_revenue) / prev_revenue * Decimal::ONE_HUNDRED
            });
        let breakdown = ExpenseBreakdown::from(result);

        Self {
            closing,
            net_margin_pct,
            revenue_evolution_pct,
            breakdown,
        }
    }
}
