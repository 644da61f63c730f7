use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::expense::{AdHocExpenseEntry, ExpenseEntry, VariableExpenseEntry};
use super::franchise::FranchiseId;
use crate::core::money::{format_brl, format_pct};
use crate::core::{AppError, Result};

pub const MIN_CLOSING_YEAR: i32 = 2000;
pub const MAX_CLOSING_YEAR: i32 = 2100;

/// Key of a monthly closing: which franchise, which month
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClosingContext {
    pub franchise: FranchiseId,
    pub month: u32,
    pub year: i32,
}

impl ClosingContext {
    pub fn new(franchise: FranchiseId, month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(MIN_CLOSING_YEAR..=MAX_CLOSING_YEAR).contains(&year) {
            return Err(AppError::validation(format!(
                "Year must be between {} and {}, got {}",
                MIN_CLOSING_YEAR, MAX_CLOSING_YEAR, year
            )));
        }
        Ok(Self {
            franchise,
            month,
            year,
        })
    }

    /// `MM/YYYY`
    pub fn period_label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }

    /// Months since year 0, for ordering and range checks
    pub fn month_index(&self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }

    /// Same franchise, previous calendar month
    pub fn previous_month(&self) -> Self {
        let (month, year) = if self.month == 1 {
            (12, self.year - 1)
        } else {
            (self.month - 1, self.year)
        };
        Self {
            franchise: self.franchise.clone(),
            month,
            year,
        }
    }
}

/// Everything the allocation calculator needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingInput {
    /// 0-100
    pub participation_pct: Decimal,
    pub gross_revenue: Decimal,
    pub fixed_entries: Vec<ExpenseEntry>,
    pub variable_entries: Vec<VariableExpenseEntry>,
    /// Same length and order as `variable_entries`
    pub variable_quantities: Vec<u32>,
    pub ad_hoc_entries: Vec<AdHocExpenseEntry>,
}

/// A fixed or ad-hoc expense after proration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProratedLine {
    pub supplier: String,
    pub original_amount: Decimal,
    pub prorated_amount: Decimal,
}

/// How a variable line was charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeMode {
    FullCharge,
    Prorated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableLine {
    pub supplier: String,
    pub unit_amount: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
    pub charge: ChargeMode,
}

impl VariableLine {
    pub fn is_full_charge(&self) -> bool {
        self.charge == ChargeMode::FullCharge
    }
}

/// Output of the allocation calculator; never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingResult {
    pub participation_pct: Decimal,
    pub gross_revenue: Decimal,
    pub prorated_fixed_lines: Vec<ProratedLine>,
    pub prorated_ad_hoc_lines: Vec<ProratedLine>,
    pub variable_lines: Vec<VariableLine>,
    pub total_fixed_prorated: Decimal,
    pub total_ad_hoc_prorated: Decimal,
    pub total_variable: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub franchisee_share_pct: Decimal,
    pub franchisee_share_amount: Decimal,
}

impl ClosingResult {
    /// Sum of variable lines charged in full (boletos)
    pub fn total_full_charge(&self) -> Decimal {
        self.variable_lines
            .iter()
            .filter(|line| line.is_full_charge())
            .map(|line| line.line_total)
            .sum()
    }

    /// Sum of prorated variable lines
    pub fn total_prorated_variable(&self) -> Decimal {
        self.variable_lines
            .iter()
            .filter(|line| !line.is_full_charge())
            .map(|line| line.line_total)
            .sum()
    }

    /// Plain-text spreadsheet shown in the chat before confirmation
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Planilha de fechamento");
        let _ = writeln!(
            out,
            "Participação: {} | Faturamento bruto: {}",
            format_pct(self.participation_pct),
            format_brl(self.gross_revenue)
        );

        if !self.prorated_fixed_lines.is_empty() {
            let _ = writeln!(out, "Gastos padrão (rateados):");
            for line in &self.prorated_fixed_lines {
                let _ = writeln!(
                    out,
                    "  {}: {} -> {}",
                    line.supplier,
                    format_brl(line.original_amount),
                    format_brl(line.prorated_amount)
                );
            }
        }

        if !self.variable_lines.is_empty() {
            let _ = writeln!(out, "Gastos variáveis:");
            for line in &self.variable_lines {
                let tag = if line.is_full_charge() {
                    " (integral)"
                } else {
                    ""
                };
                let _ = writeln!(
                    out,
                    "  {}: {} x {} = {}{}",
                    line.supplier,
                    line.quantity,
                    format_brl(line.unit_amount),
                    format_brl(line.line_total),
                    tag
                );
            }
        }

        if !self.prorated_ad_hoc_lines.is_empty() {
            let _ = writeln!(out, "Gastos esporádicos:");
            for line in &self.prorated_ad_hoc_lines {
                let _ = writeln!(
                    out,
                    "  {}: {}",
                    line.supplier,
                    format_brl(line.prorated_amount)
                );
            }
        }

        let _ = writeln!(out, "Total padrão rateado: {}", format_brl(self.total_fixed_prorated));
        let _ = writeln!(out, "Total variável: {}", format_brl(self.total_variable));
        let _ = writeln!(out, "Total esporádico: {}", format_brl(self.total_ad_hoc_prorated));
        let _ = writeln!(out, "Total de gastos: {}", format_brl(self.total_expenses));
        let _ = writeln!(out, "Lucro líquido: {}", format_brl(self.net_profit));
        let _ = write!(
            out,
            "Franqueado ({}): {}",
            format_pct(self.franchisee_share_pct),
            format_brl(self.franchisee_share_amount)
        );
        out
    }
}

/// A persisted closing, as stored by the data gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingRecord {
    pub context: ClosingContext,
    pub result: ClosingResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
