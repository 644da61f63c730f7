use rust_decimal::Decimal;
use tracing::debug;

use crate::core::{AppError, Result};
use crate::modules::closings::models::{
    ChargeMode, ClosingInput, ClosingResult, FranchiseId, ProratedLine, VariableLine,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rateio calculator for monthly closings
///
/// Pure transform from a completed `ClosingInput` to a `ClosingResult`.
/// Ranges are not validated here; the step sequencer guarantees them.
/// Nothing is rounded: sums stay exact and rounding is left to display.
pub struct AllocationCalculator;

impl AllocationCalculator {
    /// Allocate the closing's expenses and compute profit and franchisee share
    ///
    /// # Errors
    /// `Validation` when an intermediate amount leaves the `Decimal` range
    ///
    /// # Panics
    /// If `variable_quantities` and `variable_entries` differ in length. The
    /// caller must collect one quantity per variable entry before calling.
    pub fn calculate(input: &ClosingInput, franchise: &FranchiseId) -> Result<ClosingResult> {
        assert_eq!(
            input.variable_quantities.len(),
            input.variable_entries.len(),
            "one quantity is required per variable entry"
        );

        let ratio = input.participation_pct / HUNDRED;

        let prorated_fixed_lines = input
            .fixed_entries
            .iter()
            .map(|entry| {
                Ok(ProratedLine {
                    supplier: entry.supplier.clone(),
                    original_amount: entry.amount,
                    prorated_amount: mul(entry.amount, ratio)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let total_fixed_prorated = sum(prorated_fixed_lines.iter().map(|l| l.prorated_amount))?;

        let variable_lines = input
            .variable_entries
            .iter()
            .zip(&input.variable_quantities)
            .map(|(entry, &quantity)| {
                let gross_line = mul(entry.unit_amount, Decimal::from(quantity))?;
                let (line_total, charge) = if entry.is_full_charge() {
                    (gross_line, ChargeMode::FullCharge)
                } else {
                    (mul(gross_line, ratio)?, ChargeMode::Prorated)
                };
                Ok(VariableLine {
                    supplier: entry.supplier.clone(),
                    unit_amount: entry.unit_amount,
                    quantity,
                    line_total,
                    charge,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let total_variable = sum(variable_lines.iter().map(|line| line.line_total))?;

        // Ad-hoc expenses belong entirely to this franchise
        let prorated_ad_hoc_lines: Vec<ProratedLine> = input
            .ad_hoc_entries
            .iter()
            .map(|entry| ProratedLine {
                supplier: entry.description.clone(),
                original_amount: entry.amount,
                prorated_amount: entry.amount,
            })
            .collect();
        let total_ad_hoc_prorated = sum(prorated_ad_hoc_lines.iter().map(|l| l.prorated_amount))?;

        let total_expenses = sum([total_fixed_prorated, total_ad_hoc_prorated, total_variable])?;
        let net_profit = input
            .gross_revenue
            .checked_sub(total_expenses)
            .ok_or_else(out_of_range)?;
        let franchisee_share_pct = franchise.franchisee_share_pct();
        let franchisee_share_amount = mul(net_profit, franchisee_share_pct)? / HUNDRED;

        debug!(
            franchise = %franchise,
            participation_pct = %input.participation_pct,
            total_expenses = %total_expenses,
            net_profit = %net_profit,
            "Closing allocation calculated"
        );

        Ok(ClosingResult {
            participation_pct: input.participation_pct,
            gross_revenue: input.gross_revenue,
            prorated_fixed_lines,
            prorated_ad_hoc_lines,
            variable_lines,
            total_fixed_prorated,
            total_ad_hoc_prorated,
            total_variable,
            total_expenses,
            net_profit,
            franchisee_share_pct,
            franchisee_share_amount,
        })
    }
}

fn out_of_range() -> AppError {
    AppError::validation("Closing amounts are too large to calculate")
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(out_of_range)
}

fn sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(out_of_range)
}
