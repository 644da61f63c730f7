use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::catalogs::models::{CatalogEntry, CatalogEntryRequest, ExpenseKind};
use crate::modules::catalogs::repositories::CatalogRepository;
use crate::modules::closings::models::ClosingCatalog;

/// Service for maintaining the expense catalogs a closing starts from
pub struct CatalogService {
    catalog_repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog_repo: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog_repo }
    }

    pub async fn list(&self, kind: Option<ExpenseKind>) -> Result<Vec<CatalogEntry>> {
        self.catalog_repo.list(kind).await
    }

    pub async fn create(&self, request: CatalogEntryRequest) -> Result<CatalogEntry> {
        let entry = request.into_entry()?;
        self.catalog_repo.create(&entry).await?;

        info!(
            id = %entry.id,
            supplier = %entry.supplier,
            kind = %entry.kind,
            "Catalog expense created"
        );

        Ok(entry)
    }

    pub async fn update(&self, id: &str, request: CatalogEntryRequest) -> Result<CatalogEntry> {
        let existing = self
            .catalog_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Catalog expense '{}'", id)))?;

        let updated = request.apply_to(&existing)?;
        if !self.catalog_repo.update(&updated).await? {
            return Err(AppError::not_found(format!("Catalog expense '{}'", id)));
        }

        info!(id = %id, supplier = %updated.supplier, "Catalog expense updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.catalog_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Catalog expense '{}'", id)));
        }

        info!(id = %id, "Catalog expense deleted");
        Ok(())
    }

    /// Snapshot of both catalogs for a new closing
    pub async fn load_for_closing(&self) -> Result<ClosingCatalog> {
        let fixed_entries = self
            .catalog_repo
            .list(Some(ExpenseKind::Fixed))
            .await?
            .iter()
            .map(CatalogEntry::to_expense_entry)
            .collect();
        let variable_entries = self
            .catalog_repo
            .list(Some(ExpenseKind::Variable))
            .await?
            .iter()
            .map(CatalogEntry::to_variable_entry)
            .collect();

        Ok(ClosingCatalog {
            fixed_entries,
            variable_entries,
        })
    }
}
