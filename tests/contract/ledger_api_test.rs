// HTTP contract of the ledger endpoints

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use atlas_ledger::modules::ledger::{LedgerBalance, LedgerEntry, Payer, Settlement};
use helpers::TestServices;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn new_entry(amount: &str, payer: &str, cash_book: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/ledger/entries").set_json(json!({
        "amount": amount,
        "description": "Mercado",
        "payer": payer,
        "cash_book": cash_book,
    }))
}

#[actix_web::test]
async fn test_create_and_list_entries() {
    let services = TestServices::new();
    let app = test::init_service(App::new().configure(services.configure())).await;

    let resp = test::call_service(&app, new_entry("45.50", "Allyson", "Pessoal").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: LedgerEntry = test::read_body_json(resp).await;
    assert_eq!(created.amount, dec!(45.50));
    assert_eq!(created.payer, Payer::Allyson);

    test::call_service(&app, new_entry("10", "Gabriel", "Atlas").to_request()).await;

    let req = test::TestRequest::get().uri("/ledger/entries").to_request();
    let pessoal: Vec<LedgerEntry> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pessoal.len(), 1);
    assert_eq!(pessoal[0].id, created.id);

    let req = test::TestRequest::get()
        .uri("/ledger/entries?cash_book=Atlas")
        .to_request();
    let atlas: Vec<LedgerEntry> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(atlas.len(), 1);
    assert_eq!(atlas[0].payer, Payer::Gabriel);
}

#[actix_web::test]
async fn test_balance_reports_who_owes() {
    let services = TestServices::new();
    let app = test::init_service(App::new().configure(services.configure())).await;

    test::call_service(&app, new_entry("100", "Allyson", "Franquia").to_request()).await;
    test::call_service(&app, new_entry("40", "Gabriel", "Franquia").to_request()).await;

    let req = test::TestRequest::get()
        .uri("/ledger/balance?cash_book=Franquia")
        .to_request();
    let balance: LedgerBalance = test::call_and_read_body_json(&app, req).await;
    assert_eq!(balance.total_allyson, dec!(100));
    assert_eq!(balance.total_gabriel, dec!(40));
    assert_eq!(
        balance.settlement,
        Settlement::Owes {
            debtor: Payer::Gabriel,
            creditor: Payer::Allyson,
            amount: dec!(60),
        }
    );

    let req = test::TestRequest::get()
        .uri("/ledger/balance?cash_book=Atlas")
        .to_request();
    let balance: LedgerBalance = test::call_and_read_body_json(&app, req).await;
    assert_eq!(balance.settlement, Settlement::Settled);
}

#[actix_web::test]
async fn test_invalid_entries_are_rejected() {
    let services = TestServices::new();
    let app = test::init_service(App::new().configure(services.configure())).await;

    let resp = test::call_service(&app, new_entry("0", "Allyson", "Pessoal").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 400);

    let resp = test::call_service(&app, new_entry("10", "Maria", "Pessoal").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(services.ledger_repo.all().is_empty());
}

#[actix_web::test]
async fn test_storage_failure_is_server_error() {
    let services = TestServices::new();
    services.ledger_repo.set_failing(true);
    let app = test::init_service(App::new().configure(services.configure())).await;

    let resp = test::call_service(&app, new_entry("10", "Allyson", "Pessoal").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
