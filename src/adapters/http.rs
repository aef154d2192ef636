use crate::core::catalog::PackageCatalog;
use crate::core::page::QuotePage;
use crate::core::session::PackageSession;
use crate::domain::model::{PackageEntry, QuoteResponse, SubmissionOutcome};
use crate::domain::ports::{ConfigProvider, QuoteGateway};
use crate::utils::error::{FreightError, Result};
use crate::utils::validation::{require, validate_endpoint_url};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

/// Posts the package list to the quotation endpoint as JSON.
#[derive(Debug, Clone)]
pub struct HttpQuoteGateway {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpQuoteGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoint = config.endpoint_url().map(str::to_string);
        let endpoint = require("endpoint.url", &endpoint)?;
        validate_endpoint_url("endpoint.url", endpoint)?;
        Ok(Self::new(endpoint.clone()).with_timeout(config.request_timeout()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Page ready to send an already built package list. Sending never looks
/// at the catalog, so the configured one is not loaded.
pub fn submission_page<C: ConfigProvider>(
    config: &C,
    session: PackageSession,
) -> Result<QuotePage<HttpQuoteGateway>> {
    let gateway = HttpQuoteGateway::from_config(config)?;
    Ok(QuotePage::with_session(PackageCatalog::default(), session, gateway))
}

/// 失敗時優先使用伺服器回傳的 error 欄位，否則用 HTTP 狀態
fn failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<QuoteResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "Erro {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
        })
}

/// 錯誤回應的內容讀取失敗時仍回報 HTTP 狀態
fn backend_failure(status: StatusCode, body: reqwest::Result<String>) -> FreightError {
    let body = body.unwrap_or_else(|e| {
        tracing::warn!("Could not read error response body: {}", e);
        String::new()
    });
    let message = failure_message(status, &body);
    tracing::error!("❌ Quotation request failed: {}", message);
    FreightError::BackendError {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl QuoteGateway for HttpQuoteGateway {
    async fn submit(&self, packages: &[PackageEntry]) -> Result<SubmissionOutcome> {
        tracing::debug!(
            "📡 Posting {} packages to: {}",
            packages.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(packages)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Quotation endpoint response status: {}", status);

        if !status.is_success() {
            return Err(backend_failure(status, response.text().await));
        }

        let body = response.text().await?;

        let redirect = serde_json::from_str::<QuoteResponse>(&body)
            .ok()
            .and_then(|response| response.redirect);
        match redirect {
            Some(url) if !url.is_empty() => {
                tracing::info!("✅ Quotation accepted, redirecting to {}", url);
                Ok(SubmissionOutcome::Redirect(url))
            }
            _ => {
                tracing::warn!("Unexpected server response: {}", body);
                Err(FreightError::UnexpectedResponse { body })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_server_error() {
        let message = failure_message(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Dados de embalagem inválidos."}"#,
        );
        assert_eq!(message, "Dados de embalagem inválidos.");
    }

    #[test]
    fn test_failure_message_falls_back_to_status() {
        assert_eq!(
            failure_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Erro 500: Internal Server Error"
        );
        assert_eq!(
            failure_message(StatusCode::BAD_GATEWAY, r#"{"error": ""}"#),
            "Erro 502: Bad Gateway"
        );
    }

    #[test]
    fn test_unreadable_error_body_still_reports_status() {
        let read_error = Client::new().get("not a url").build().unwrap_err();
        let err = backend_failure(StatusCode::SERVICE_UNAVAILABLE, Err(read_error));
        assert!(matches!(
            err,
            FreightError::BackendError { status: 503, ref message } if message == "Erro 503: Service Unavailable"
        ));

        let err = backend_failure(
            StatusCode::BAD_REQUEST,
            Ok(r#"{"error": "Pacote inválido."}"#.to_string()),
        );
        assert!(matches!(
            err,
            FreightError::BackendError { status: 400, ref message } if message == "Pacote inválido."
        ));
    }

    #[test]
    fn test_submission_page_ignores_broken_catalog_file() {
        let config = crate::config::QuoteConfig::from_toml_str(
            "[endpoint]\nurl = \"http://localhost/packages\"\n\n[catalog]\nfile = \"/nonexistent/catalog.json\"\n",
        )
        .unwrap();
        assert!(config.load_catalog().is_err());

        let page = submission_page(&config, PackageSession::new()).unwrap();
        assert!(page.session().is_empty());
        assert!(!page.can_request_quotations());
    }

    struct StaticConfig(Option<String>);

    impl ConfigProvider for StaticConfig {
        fn endpoint_url(&self) -> Option<&str> {
            self.0.as_deref()
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    #[test]
    fn test_from_config_requires_valid_endpoint() {
        let gateway =
            HttpQuoteGateway::from_config(&StaticConfig(Some("http://localhost/packages".into())))
                .unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost/packages");

        assert!(matches!(
            HttpQuoteGateway::from_config(&StaticConfig(None)),
            Err(FreightError::MissingConfigError { .. })
        ));
        assert!(matches!(
            HttpQuoteGateway::from_config(&StaticConfig(Some("not a url".into()))),
            Err(FreightError::InvalidConfigValueError { .. })
        ));
    }
}
