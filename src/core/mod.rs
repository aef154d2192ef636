pub mod catalog;
pub mod client_form;
pub mod page;
pub mod session;
pub mod submission;
pub mod tax_id;

pub use crate::domain::model::{PackageEntry, PackageOrigin, PackageTotals, SubmissionOutcome};
pub use crate::domain::ports::{ConfigProvider, QuoteGateway};
pub use crate::utils::error::Result;
