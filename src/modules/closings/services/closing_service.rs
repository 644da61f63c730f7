use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::closings::models::{
    ClosingContext, ClosingRecord, ClosingReport, ClosingResult, FranchiseId,
};
use crate::modules::closings::repositories::ClosingRepository;

/// Months shown in a franchise's history, the reference month included
pub const HISTORY_MONTHS: i32 = 12;

/// Service for storing and reading monthly closings
pub struct ClosingService {
    closing_repo: Arc<dyn ClosingRepository>,
}

impl ClosingService {
    pub fn new(closing_repo: Arc<dyn ClosingRepository>) -> Self {
        Self { closing_repo }
    }

    /// Store a computed closing, replacing any earlier one for the same month
    pub async fn save(&self, context: &ClosingContext, result: &ClosingResult) -> Result<()> {
        self.closing_repo.upsert(context, result).await?;

        info!(
            franchise = %context.franchise,
            period = %context.period_label(),
            net_profit = %result.net_profit,
            franchisee_share = %result.franchisee_share_amount,
            "Closing saved"
        );

        Ok(())
    }

    /// Stored closing for a month; totals are returned as persisted
    pub async fn find(&self, context: &ClosingContext) -> Result<Option<ClosingRecord>> {
        self.closing_repo.find(context).await
    }

    /// Stored closing with margin, revenue evolution and expense breakdown
    ///
    /// # Errors
    /// `NotFound` if no closing exists for the month
    pub async fn monthly_report(&self, context: &ClosingContext) -> Result<ClosingReport> {
        let closing = self.find(context).await?.ok_or_else(|| {
            AppError::not_found(format!(
                "Closing for {} {}",
                context.franchise,
                context.period_label()
            ))
        })?;

        let previous = self.find(&context.previous_month()).await?;
        if previous.is_none() {
            warn!(
                franchise = %context.franchise,
                period = %context.period_label(),
                "No closing for previous month, revenue evolution unavailable"
            );
        }

        Ok(ClosingReport::new(closing, previous.as_ref()))
    }

    /// Closings of the trailing twelve months ending at `through`, oldest first
    pub async fn history(&self, through: &ClosingContext) -> Result<Vec<ClosingRecord>> {
        let last = through.month_index();
        let first = last - (HISTORY_MONTHS - 1);

        let records: Vec<ClosingRecord> = self
            .closing_repo
            .list_by_franchise(&through.franchise)
            .await?
            .into_iter()
            .filter(|record| {
                let index = record.context.month_index();
                index >= first && index <= last
            })
            .collect();

        info!(
            franchise = %through.franchise,
            through = %through.period_label(),
            count = records.len(),
            "Closing history loaded"
        );

        Ok(records)
    }

    /// Context for `franchise` at `month`/`year`, validated
    pub fn context(franchise: &str, month: u32, year: i32) -> Result<ClosingContext> {
        ClosingContext::new(FranchiseId::new(franchise), month, year)
    }
}
