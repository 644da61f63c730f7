use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Datelike;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::closings::services::ClosingService;

/// Query parameters for the history endpoint; defaults to the current month
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

/// GET /closings/{franchise}/{year}/{month}
/// Stored closing with derived metrics
pub async fn get_monthly_report(
    service: web::Data<Arc<ClosingService>>,
    path: web::Path<(String, i32, u32)>,
) -> Result<HttpResponse, AppError> {
    let (franchise, year, month) = path.into_inner();
    let context = ClosingService::context(&franchise, month, year)?;
    let report = service.monthly_report(&context).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /closings/{franchise}/history
/// Closings of the trailing twelve months
pub async fn get_history(
    service: web::Data<Arc<ClosingService>>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let franchise = path.into_inner();
    let today = chrono::Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let through = ClosingService::context(&franchise, month, year)?;
    let history = service.history(&through).await?;
    Ok(HttpResponse::Ok().json(history))
}

/// Configure closing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/closings")
            .route("/{franchise}/history", web::get().to(get_history))
            .route("/{franchise}/{year}/{month}", web::get().to(get_monthly_report)),
    );
}
