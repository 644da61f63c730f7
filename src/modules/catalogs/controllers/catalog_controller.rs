use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::catalogs::models::{CatalogEntryRequest, ExpenseKind};
use crate::modules::catalogs::services::CatalogService;

#[derive(Debug, Deserialize)]
pub struct ListCatalogQuery {
    #[serde(default)]
    pub kind: Option<ExpenseKind>,
}

/// GET /catalog/expenses
pub async fn list_expenses(
    service: web::Data<Arc<CatalogService>>,
    query: web::Query<ListCatalogQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = service.list(query.kind).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// POST /catalog/expenses
pub async fn create_expense(
    service: web::Data<Arc<CatalogService>>,
    body: web::Json<CatalogEntryRequest>,
) -> Result<HttpResponse, AppError> {
    let entry = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(entry))
}

/// PUT /catalog/expenses/{id}
pub async fn update_expense(
    service: web::Data<Arc<CatalogService>>,
    path: web::Path<String>,
    body: web::Json<CatalogEntryRequest>,
) -> Result<HttpResponse, AppError> {
    let entry = service.update(&path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// DELETE /catalog/expenses/{id}
pub async fn delete_expense(
    service: web::Data<Arc<CatalogService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/catalog/expenses")
            .route("", web::get().to(list_expenses))
            .route("", web::post().to(create_expense))
            .route("/{id}", web::put().to(update_expense))
            .route("/{id}", web::delete().to(delete_expense)),
    );
}
