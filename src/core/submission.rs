use crate::domain::model::{PackageEntry, SubmissionOutcome};
use crate::domain::ports::QuoteGateway;
use crate::utils::error::{FreightError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

/// Sends the package list once at a time.
///
/// While a request is in flight further submissions are refused. A failed
/// request releases the guard so the user can try again; a successful one
/// keeps it engaged (the page is about to navigate away) until [`reset`].
///
/// [`reset`]: QuoteSubmitter::reset
pub struct QuoteSubmitter<G: QuoteGateway> {
    gateway: G,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, armed: true })
    }

    fn keep_engaged(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(false, Ordering::Release);
        }
    }
}

impl<G: QuoteGateway> QuoteSubmitter<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn submit(&self, packages: &[PackageEntry]) -> Result<SubmissionOutcome> {
        if packages.is_empty() {
            return Err(FreightError::EmptyPackageList);
        }

        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("Quotation request ignored: another one is in flight");
            return Err(FreightError::SubmissionInFlight);
        };

        tracing::info!("🚀 Requesting quotations for {} package lines", packages.len());
        let outcome = self.gateway.submit(packages).await?;
        guard.keep_engaged();
        Ok(outcome)
    }
}
