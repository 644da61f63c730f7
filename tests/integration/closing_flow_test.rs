// End-to-end closing conversations through the assistant service

#[path = "../helpers/mod.rs"]
mod helpers;

use atlas_ledger::core::AppError;
use atlas_ledger::modules::assistant::models::AssistantReply;
use atlas_ledger::modules::assistant::services::assistant_service::{
    CATALOG_LOAD_FAILED, CLOSING_SAVED, CLOSING_SAVED_WITHOUT_PAYMENT, CLOSING_SAVE_FAILED,
    USAGE_HINT,
};
use atlas_ledger::modules::assistant::services::step_sequencer::{
    PROMPT_AD_HOC_AMOUNT, PROMPT_AD_HOC_YES_NO, PROMPT_GROSS_REVENUE, PROMPT_PARTICIPATION,
    REPROMPT_GROSS_REVENUE,
};
use atlas_ledger::modules::catalogs::ExpenseKind;
use atlas_ledger::modules::closings::ClosingService;
use atlas_ledger::modules::ledger::{CashBook, Payer};
use helpers::TestServices;
use rust_decimal_macros::dec;

const SESSION: &str = "closing-session";

async fn say(services: &TestServices, text: &str) -> AssistantReply {
    services
        .assistant
        .handle_message(SESSION, text)
        .await
        .expect("message should be handled")
}

#[tokio::test]
async fn test_full_closing_is_saved_with_payment() {
    let services = TestServices::new();
    services
        .add_catalog_entry("Aluguel", dec!(1000), ExpenseKind::Fixed)
        .await;
    services
        .add_catalog_entry("Boleto Internet", dec!(100), ExpenseKind::Variable)
        .await;
    services
        .add_catalog_entry("Visita técnica", dec!(50), ExpenseKind::Variable)
        .await;

    assert_eq!(say(&services, "Fechamento CVT 02 2025").await.message(), PROMPT_PARTICIPATION);
    say(&services, "50").await;
    // catalog is listed by supplier: Boleto Internet, then Visita técnica
    assert_eq!(
        say(&services, "R$ 10.000,00").await.message(),
        "Qual a quantidade de Boleto Internet?"
    );
    say(&services, "2").await;
    assert_eq!(say(&services, "4").await.message(), PROMPT_AD_HOC_YES_NO);
    say(&services, "sim").await;
    say(&services, "Manutenção equipamento").await;
    say(&services, "150,00").await;
    let reply = say(&services, "não").await;

    let result = match reply {
        AssistantReply::ClosingSummary { context, result, text } => {
            assert_eq!(context.period_label(), "02/2025");
            assert!(text.contains("Planilha de fechamento"));
            result
        }
        other => panic!("expected closing summary, got {:?}", other),
    };
    // 1000*0.5 + 100*2 + 50*4*0.5 + 150
    assert_eq!(result.total_expenses, dec!(950));
    assert_eq!(result.net_profit, dec!(9050));
    assert_eq!(result.franchisee_share_amount, dec!(3620));

    let reply = services.assistant.confirm_closing(SESSION).await.unwrap();
    assert_eq!(reply.message(), CLOSING_SAVED);

    let context = ClosingService::context("CVT", 2, 2025).unwrap();
    let stored = services.closing_service.find(&context).await.unwrap().unwrap();
    assert_eq!(stored.result, result);

    let payments = services.ledger_repo.all();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].description, "Pagamento Fechamento CVT - 02/2025");
    assert_eq!(payments[0].amount, dec!(3620));
    assert_eq!(payments[0].payer, Payer::Gabriel);
    assert_eq!(payments[0].cash_book, CashBook::Pessoal);

    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.state.name(), "idle");
}

#[tokio::test]
async fn test_invalid_answer_reprompts() {
    let services = TestServices::new();
    say(&services, "fechamento cvf 1 2025").await;
    say(&services, "30").await;

    assert_eq!(say(&services, "muito").await.message(), REPROMPT_GROSS_REVENUE);
    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.state.name(), "awaiting_gross_revenue");
}

#[tokio::test]
async fn test_malformed_trigger_gets_usage_hint() {
    let services = TestServices::new();

    assert_eq!(say(&services, "fechamento").await.message(), USAGE_HINT);
    assert_eq!(say(&services, "fechamento CVT 13 2025").await.message(), USAGE_HINT);
    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.state.name(), "idle");
    assert_eq!(services.gateway.calls(), 0);
}

#[tokio::test]
async fn test_new_trigger_abandons_previous_closing() {
    let services = TestServices::new();
    say(&services, "fechamento CVT 02 2025").await;
    say(&services, "40").await;

    assert_eq!(say(&services, "fechamento CVF 03 2025").await.message(), PROMPT_PARTICIPATION);
    say(&services, "10").await;
    say(&services, "100").await;
    match say(&services, "n").await {
        AssistantReply::ClosingSummary { context, .. } => {
            assert_eq!(context.franchise.as_str(), "CVF");
            assert_eq!(context.month, 3);
        }
        other => panic!("expected closing summary, got {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_failure_aborts_to_idle() {
    let services = TestServices::new();
    services.catalog_repo.set_failing(true);

    assert_eq!(
        say(&services, "Fechamento CVT 02 2025").await.message(),
        CATALOG_LOAD_FAILED
    );
    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.state.name(), "idle");
}

#[tokio::test]
async fn test_confirm_requires_summary() {
    let services = TestServices::new();
    assert!(matches!(
        services.assistant.confirm_closing(SESSION).await,
        Err(AppError::Conflict(_))
    ));

    say(&services, "Fechamento CVT 02 2025").await;
    assert!(matches!(
        services.assistant.confirm_closing(SESSION).await,
        Err(AppError::Conflict(_))
    ));
    // the session stays usable after a rejected confirmation
    say(&services, "50").await;
}

#[tokio::test]
async fn test_loss_is_saved_without_payment() {
    let services = TestServices::new();
    services
        .add_catalog_entry("Aluguel", dec!(3000), ExpenseKind::Fixed)
        .await;

    for answer in ["Fechamento CVF 05 2025", "100", "1000", "não"] {
        say(&services, answer).await;
    }
    let reply = services.assistant.confirm_closing(SESSION).await.unwrap();

    assert_eq!(reply.message(), CLOSING_SAVED_WITHOUT_PAYMENT);
    assert_eq!(services.closing_repo.len(), 1);
    assert!(services.ledger_repo.all().is_empty());
}

#[tokio::test]
async fn test_failed_save_reports_once_and_resets() {
    let services = TestServices::new();
    for answer in ["Fechamento CVT 02 2025", "50", "1000", "não"] {
        say(&services, answer).await;
    }
    services.closing_repo.set_failing(true);

    let reply = services.assistant.confirm_closing(SESSION).await.unwrap();
    assert_eq!(reply.message(), CLOSING_SAVE_FAILED);
    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.state.name(), "idle");
    assert!(services.ledger_repo.all().is_empty());
}

#[tokio::test]
async fn test_summary_stage_routes_free_text_to_extraction() {
    let services = TestServices::new();
    for answer in ["Fechamento CVT 02 2025", "50", "1000", "não"] {
        say(&services, answer).await;
    }
    services.gateway.push_reply("Pode me dar mais detalhes?");

    let reply = say(&services, "Olá").await;
    assert_eq!(reply.message(), "Pode me dar mais detalhes?");
    assert_eq!(services.gateway.calls(), 1);
    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.state.name(), "closing_summary");
}

#[tokio::test]
async fn test_description_mentioning_the_keyword_is_an_answer() {
    let services = TestServices::new();
    say(&services, "Fechamento CVT 02 2025").await;
    say(&services, "50").await;
    say(&services, "1000").await;
    say(&services, "sim").await;

    assert_eq!(
        say(&services, "Taxa de fechamento de caixa").await.message(),
        PROMPT_AD_HOC_AMOUNT
    );
    say(&services, "20").await;
    say(&services, "sim").await;
    assert_eq!(
        say(&services, "Conserto do enclosing").await.message(),
        PROMPT_AD_HOC_AMOUNT
    );
    say(&services, "30").await;

    match say(&services, "não").await {
        AssistantReply::ClosingSummary { result, .. } => {
            let descriptions: Vec<&str> = result
                .prorated_ad_hoc_lines
                .iter()
                .map(|line| line.supplier.as_str())
                .collect();
            assert_eq!(descriptions, ["Taxa de fechamento de caixa", "Conserto do enclosing"]);
            assert_eq!(result.total_ad_hoc_prorated, dec!(50));
        }
        other => panic!("expected closing summary, got {:?}", other),
    }
}

#[tokio::test]
async fn test_oversized_revenue_is_reprompted() {
    let services = TestServices::new();
    services
        .add_catalog_entry("Aluguel", dec!(1000), ExpenseKind::Fixed)
        .await;
    say(&services, "Fechamento CVT 02 2025").await;
    say(&services, "50").await;

    assert_eq!(
        say(&services, "9999999999999999999999999999").await.message(),
        REPROMPT_GROSS_REVENUE
    );
    assert_eq!(say(&services, "não").await.message(), REPROMPT_GROSS_REVENUE);
    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.state.name(), "awaiting_gross_revenue");

    assert_eq!(say(&services, "5000").await.message(), PROMPT_AD_HOC_YES_NO);
    assert!(matches!(
        say(&services, "não").await,
        AssistantReply::ClosingSummary { .. }
    ));
}

#[tokio::test]
async fn test_cancelled_message_leaves_session_usable() {
    let services = TestServices::new();
    say(&services, "Fechamento CVT 02 2025").await;
    assert_eq!(say(&services, "50").await.message(), PROMPT_GROSS_REVENUE);

    // an extraction call outlives its request
    services
        .assistant
        .handle_message("other-session", "oi")
        .await
        .unwrap();
    services.gateway.stall_next();
    let pending = services.assistant.handle_message("other-session", "gastei 10");
    assert!(
        tokio::time::timeout(std::time::Duration::from_millis(20), pending)
            .await
            .is_err()
    );

    let reply = services
        .assistant
        .handle_message("other-session", "de novo")
        .await
        .unwrap();
    assert_eq!(reply.message(), "Pode repetir?");
    services.assistant.reset("other-session").await.unwrap();
    services.assistant.end_session("other-session").await.unwrap();

    // the closing session was never affected
    assert_eq!(say(&services, "1000").await.message(), PROMPT_AD_HOC_YES_NO);
}
