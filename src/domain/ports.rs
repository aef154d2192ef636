use crate::domain::model::{PackageEntry, SubmissionOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn endpoint_url(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
}

/// Backend that receives the package list and answers with a redirect.
#[async_trait]
pub trait QuoteGateway: Send + Sync {
    async fn submit(&self, packages: &[PackageEntry]) -> Result<SubmissionOutcome>;
}
