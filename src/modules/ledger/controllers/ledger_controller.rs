use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::ledger::models::{CashBook, NewLedgerEntry};
use crate::modules::ledger::services::LedgerService;

#[derive(Debug, Deserialize)]
pub struct CashBookQuery {
    #[serde(default = "default_cash_book")]
    pub cash_book: CashBook,
}

fn default_cash_book() -> CashBook {
    CashBook::Pessoal
}

/// GET /ledger/entries
pub async fn list_entries(
    service: web::Data<Arc<LedgerService>>,
    query: web::Query<CashBookQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = service.list(query.cash_book).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// POST /ledger/entries
pub async fn create_entry(
    service: web::Data<Arc<LedgerService>>,
    body: web::Json<NewLedgerEntry>,
) -> Result<HttpResponse, AppError> {
    let entry = service.record(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(entry))
}

/// GET /ledger/balance
pub async fn get_balance(
    service: web::Data<Arc<LedgerService>>,
    query: web::Query<CashBookQuery>,
) -> Result<HttpResponse, AppError> {
    let balance = service.balance(query.cash_book).await?;
    Ok(HttpResponse::Ok().json(balance))
}

/// Configure ledger routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ledger")
            .route("/entries", web::get().to(list_entries))
            .route("/entries", web::post().to(create_entry))
            .route("/balance", web::get().to(get_balance)),
    );
}
