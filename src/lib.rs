pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::QuoteConfig;

pub use adapters::http::HttpQuoteGateway;
pub use core::{
    catalog::PackageCatalog,
    page::QuotePage,
    session::{CustomPackageInput, PackageSession, PredefinedSelection},
    submission::QuoteSubmitter,
    tax_id::TaxId,
};
pub use utils::error::{FreightError, Result};
