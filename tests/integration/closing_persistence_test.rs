// Closing storage, reports and history over in-memory storage

#[path = "../helpers/mod.rs"]
mod helpers;

use atlas_ledger::core::AppError;
use atlas_ledger::modules::closings::models::{
    ClosingInput, ClosingResult, ExpenseEntry, FranchiseId, VariableExpenseEntry,
};
use atlas_ledger::modules::closings::{AllocationCalculator, ClosingService};
use helpers::TestServices;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn closing(participation_pct: Decimal, gross_revenue: Decimal) -> ClosingResult {
    let input = ClosingInput {
        participation_pct,
        gross_revenue,
        fixed_entries: vec![ExpenseEntry::new("Aluguel", dec!(333.33))],
        variable_entries: vec![
            VariableExpenseEntry::new("Boleto Luz", dec!(12.5)),
            VariableExpenseEntry::new("Técnico", dec!(80)),
        ],
        variable_quantities: vec![3, 1],
        ad_hoc_entries: vec![],
    };
    AllocationCalculator::calculate(&input, &FranchiseId::new("CVF")).unwrap()
}

#[tokio::test]
async fn test_reloaded_closing_has_identical_totals() {
    let services = TestServices::new();
    let context = ClosingService::context("cvf", 4, 2025).unwrap();
    let result = closing(dec!(33.33), dec!(5000));

    services.closing_service.save(&context, &result).await.unwrap();
    let stored = services.closing_service.find(&context).await.unwrap().unwrap();

    assert_eq!(stored.result, result);
    assert_eq!(stored.result.total_expenses, result.total_expenses);
    assert_eq!(stored.context.franchise.as_str(), "CVF");
}

#[test]
fn test_stored_json_keeps_exact_decimals() {
    let result = closing(dec!(33.33), dec!(5000));
    let json = serde_json::to_string(&result).unwrap();
    let reloaded: ClosingResult = serde_json::from_str(&json).unwrap();

    assert_eq!(reloaded.total_fixed_prorated, result.total_fixed_prorated);
    assert_eq!(reloaded.franchisee_share_amount, result.franchisee_share_amount);
}

#[tokio::test]
async fn test_rerun_replaces_closing() {
    let services = TestServices::new();
    let context = ClosingService::context("CVT", 2, 2025).unwrap();

    services
        .closing_service
        .save(&context, &closing(dec!(50), dec!(1000)))
        .await
        .unwrap();
    services
        .closing_service
        .save(&context, &closing(dec!(60), dec!(2000)))
        .await
        .unwrap();

    assert_eq!(services.closing_repo.len(), 1);
    let stored = services.closing_service.find(&context).await.unwrap().unwrap();
    assert_eq!(stored.result.gross_revenue, dec!(2000));
}

#[tokio::test]
async fn test_monthly_report_metrics() {
    let services = TestServices::new();
    let january = ClosingService::context("CVF", 1, 2025).unwrap();
    let february = ClosingService::context("CVF", 2, 2025).unwrap();

    services
        .closing_service
        .save(&january, &closing(dec!(50), dec!(1000)))
        .await
        .unwrap();
    let result = closing(dec!(50), dec!(1250));
    services.closing_service.save(&february, &result).await.unwrap();

    let report = services.closing_service.monthly_report(&february).await.unwrap();
    assert_eq!(report.revenue_evolution_pct, Some(dec!(25)));
    assert_eq!(
        report.net_margin_pct,
        Some(result.net_profit / dec!(1250) * dec!(100))
    );
    assert_eq!(report.breakdown.full_charge, dec!(37.5));
    assert_eq!(report.breakdown.prorated_variable, dec!(40));
    assert_eq!(report.breakdown.ad_hoc, dec!(0));

    let report = services.closing_service.monthly_report(&january).await.unwrap();
    assert_eq!(report.revenue_evolution_pct, None);
}

#[tokio::test]
async fn test_missing_month_is_not_found() {
    let services = TestServices::new();
    let context = ClosingService::context("CVT", 6, 2025).unwrap();
    assert!(matches!(
        services.closing_service.monthly_report(&context).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_history_covers_trailing_twelve_months() {
    let services = TestServices::new();
    // January 2024 through June 2025
    for index in 0..18u32 {
        let year = 2024 + (index / 12) as i32;
        let month = index % 12 + 1;
        let context = ClosingService::context("CVT", month, year).unwrap();
        services
            .closing_service
            .save(&context, &closing(dec!(50), Decimal::from(1000 + index)))
            .await
            .unwrap();
    }
    let other = ClosingService::context("CVF", 5, 2025).unwrap();
    services
        .closing_service
        .save(&other, &closing(dec!(50), dec!(1)))
        .await
        .unwrap();

    let through = ClosingService::context("CVT", 5, 2025).unwrap();
    let history = services.closing_service.history(&through).await.unwrap();

    assert_eq!(history.len(), 12);
    assert_eq!(history[0].context.period_label(), "06/2024");
    assert_eq!(history[11].context.period_label(), "05/2025");
    assert!(history.iter().all(|r| r.context.franchise.as_str() == "CVT"));
}
