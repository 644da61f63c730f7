// Ledger-entry extraction through the assistant service

#[path = "../helpers/mod.rs"]
mod helpers;

use atlas_ledger::core::AppError;
use atlas_ledger::modules::assistant::models::{AssistantReply, Role};
use atlas_ledger::modules::assistant::services::assistant_service::{
    ENTRY_DISCARDED, ENTRY_SAVED, EXTRACTION_FAILED,
};
use atlas_ledger::modules::ledger::{CashBook, Payer};
use helpers::TestServices;
use rust_decimal_macros::dec;

const SESSION: &str = "entry-session";
const MERCADO_JSON: &str =
    r#"{"valor": 45.50, "descricao": "Mercado", "quemPagou": "Allyson", "tipoCaixa": "Pessoal"}"#;

async fn candidate_id(services: &TestServices, text: &str) -> String {
    match services.assistant.handle_message(SESSION, text).await.unwrap() {
        AssistantReply::EntryCandidate { id, entry, .. } => {
            assert_eq!(entry.amount, dec!(45.50));
            assert_eq!(entry.payer, Payer::Allyson);
            assert_eq!(entry.cash_book, CashBook::Pessoal);
            id
        }
        other => panic!("expected entry candidate, got {:?}", other),
    }
}

#[tokio::test]
async fn test_extracted_entry_is_recorded_on_confirm() {
    let services = TestServices::new();
    services.gateway.push_reply(MERCADO_JSON);

    let id = candidate_id(&services, "Allyson gastou 45,50 no mercado, pessoal").await;
    assert!(services.ledger_repo.all().is_empty());

    let reply = services.assistant.confirm_entry(SESSION, &id).await.unwrap();
    assert_eq!(reply.message(), ENTRY_SAVED);

    let entries = services.ledger_repo.all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, "Mercado");

    // already confirmed
    assert!(matches!(
        services.assistant.confirm_entry(SESSION, &id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_plain_reply_and_transcript_context() {
    let services = TestServices::new();
    services.gateway.push_reply("Quem pagou esse gasto?");
    services.gateway.push_reply(format!("```json\n{}\n```", MERCADO_JSON));

    let reply = services
        .assistant
        .handle_message(SESSION, "Mercado 45,50 pessoal")
        .await
        .unwrap();
    assert_eq!(reply, AssistantReply::text("Quem pagou esse gasto?"));

    candidate_id(&services, "Allyson").await;

    let transcripts = services.gateway.transcripts();
    let second = &transcripts[1];
    assert_eq!(second.len(), 3);
    assert_eq!(second[0].content, "Mercado 45,50 pessoal");
    assert_eq!(second[1].role, Role::Assistant);
    assert_eq!(second[2].content, "Allyson");
}

#[tokio::test]
async fn test_malformed_json_is_plain_text() {
    let services = TestServices::new();
    let reply_text = r#"{"valor": 45.50, "descricao": "Mercado", "quemPagou": "Maria", "tipoCaixa": "Pessoal"}"#;
    services.gateway.push_reply(reply_text);

    let reply = services
        .assistant
        .handle_message(SESSION, "Maria pagou 45,50")
        .await
        .unwrap();
    assert_eq!(reply, AssistantReply::text(reply_text));
    let session = services.assistant.session(SESSION).await.unwrap();
    assert!(session.pending_entries.is_empty());
}

#[tokio::test]
async fn test_gateway_failure_is_one_message() {
    let services = TestServices::new();
    services.gateway.push_failure();

    let reply = services.assistant.handle_message(SESSION, "oi").await.unwrap();
    assert_eq!(reply.message(), EXTRACTION_FAILED);

    // the session is released for the next message
    services.gateway.push_reply("Olá!");
    let reply = services.assistant.handle_message(SESSION, "oi").await.unwrap();
    assert_eq!(reply.message(), "Olá!");
}

#[tokio::test]
async fn test_failed_confirm_keeps_candidate_pending() {
    let services = TestServices::new();
    services.gateway.push_reply(MERCADO_JSON);
    let id = candidate_id(&services, "mercado").await;

    services.ledger_repo.set_failing(true);
    assert!(matches!(
        services.assistant.confirm_entry(SESSION, &id).await,
        Err(AppError::Database(_))
    ));
    let session = services.assistant.session(SESSION).await.unwrap();
    assert_eq!(session.pending_entries.len(), 1);

    services.ledger_repo.set_failing(false);
    services.assistant.confirm_entry(SESSION, &id).await.unwrap();
    assert_eq!(services.ledger_repo.all().len(), 1);
}

#[tokio::test]
async fn test_discard_and_reset() {
    let services = TestServices::new();
    services.gateway.push_reply(MERCADO_JSON);
    services.gateway.push_reply(MERCADO_JSON);

    let first = candidate_id(&services, "mercado").await;
    let reply = services.assistant.discard_entry(SESSION, &first).await.unwrap();
    assert_eq!(reply.message(), ENTRY_DISCARDED);

    candidate_id(&services, "mercado de novo").await;
    services.assistant.reset(SESSION).await.unwrap();
    let session = services.assistant.session(SESSION).await.unwrap();
    assert!(session.pending_entries.is_empty());
    assert!(services.ledger_repo.all().is_empty());

    services.assistant.end_session(SESSION).await.unwrap();
    assert!(matches!(
        services.assistant.session(SESSION).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let services = TestServices::new();
    assert!(matches!(
        services.assistant.handle_message(SESSION, "   ").await,
        Err(AppError::Validation(_))
    ));
    assert_eq!(services.gateway.calls(), 0);
}
