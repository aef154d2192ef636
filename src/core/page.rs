use crate::core::catalog::PackageCatalog;
use crate::core::session::{CustomPackageInput, PackageSession, PredefinedBatch, PredefinedSelection};
use crate::core::submission::QuoteSubmitter;
use crate::domain::model::{PackageEntry, PackageTotals, SubmissionOutcome};
use crate::domain::ports::QuoteGateway;
use crate::utils::error::Result;
use crate::utils::format::format_number;

/// A row of the selected-packages table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    pub name: String,
    pub dimensions: String,
    pub weight: String,
    pub quantity: u32,
}

impl From<&PackageEntry> for PackageRow {
    fn from(entry: &PackageEntry) -> Self {
        Self {
            name: entry.name.clone(),
            dimensions: format!(
                "{} x {} x {}",
                format_number(&entry.length, 0),
                format_number(&entry.height, 0),
                format_number(&entry.width, 0)
            ),
            weight: format_number(&entry.weight, 2),
            quantity: entry.quantity,
        }
    }
}

pub fn totals_summary(totals: &PackageTotals) -> String {
    format!(
        "Peso Total: {} kg | Volume Total: {} m³ | Nº Pacotes: {}",
        format_number(&totals.total_weight, 2),
        format_number(&totals.total_volume, 4),
        totals.total_packages
    )
}

/// Controller for the package page. Owns the session state for one visit.
pub struct QuotePage<G: QuoteGateway> {
    catalog: PackageCatalog,
    session: PackageSession,
    submitter: QuoteSubmitter<G>,
}

impl<G: QuoteGateway> QuotePage<G> {
    pub fn new(catalog: PackageCatalog, gateway: G) -> Self {
        Self::with_session(catalog, PackageSession::new(), gateway)
    }

    pub fn with_session(catalog: PackageCatalog, session: PackageSession, gateway: G) -> Self {
        Self {
            catalog,
            session,
            submitter: QuoteSubmitter::new(gateway),
        }
    }

    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &PackageSession {
        &self.session
    }

    pub fn add_predefined(&mut self, selections: &[PredefinedSelection]) -> Result<PredefinedBatch> {
        self.session.add_predefined(&self.catalog, selections)
    }

    pub fn add_custom(&mut self, input: &CustomPackageInput) -> Result<&PackageEntry> {
        self.session.add_custom(input)
    }

    pub fn remove(&mut self, index: usize) -> Option<PackageEntry> {
        self.session.remove(index)
    }

    pub fn rows(&self) -> Vec<PackageRow> {
        self.session.entries().iter().map(PackageRow::from).collect()
    }

    pub fn totals(&self) -> PackageTotals {
        self.session.totals()
    }

    pub fn totals_summary(&self) -> String {
        totals_summary(&self.totals())
    }

    pub fn can_request_quotations(&self) -> bool {
        !self.session.is_empty() && !self.submitter.is_in_flight()
    }

    pub async fn request_quotations(&self) -> Result<SubmissionOutcome> {
        match self.submitter.submit(self.session.entries()).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!("Erro ao solicitar cotações: {}", e);
                Err(e)
            }
        }
    }

    /// Re-enables submission after a successful redirect was not followed.
    pub fn reset_submission(&self) {
        self.submitter.reset();
    }
}
