//! Client identification form: a single field that takes either a CNPJ or a
//! customer code, plus the invoice value of the goods.

use crate::core::tax_id::{self, TaxId, TAX_ID_LEN};
use crate::utils::format::{mask_currency, parse_currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MSG_INVALID_TAX_ID: &str = "CNPJ inválido.";
pub const MSG_REQUIRED: &str = "Campo obrigatório.";
pub const MSG_INVALID_INVOICE: &str = "Valor da mercadoria inválido ou não informado.";

/// Decides whether identifier text should be treated as a CNPJ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierHeuristic {
    /// Any of these characters marks the input as a CNPJ.
    #[serde(default = "default_punctuation")]
    pub punctuation: String,
    /// Digit count from which the input is treated as a CNPJ.
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,
}

fn default_punctuation() -> String {
    "./-".to_string()
}

fn default_min_digits() -> usize {
    9
}

impl Default for IdentifierHeuristic {
    fn default() -> Self {
        Self {
            punctuation: default_punctuation(),
            min_digits: default_min_digits(),
        }
    }
}

impl IdentifierHeuristic {
    pub fn looks_like_tax_id(&self, raw: &str) -> bool {
        raw.chars().any(|c| self.punctuation.contains(c))
            || tax_id::normalize(raw).len() >= self.min_digits
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidity {
    /// Nothing to report yet.
    Neutral,
    Valid,
    Invalid(String),
}

impl FieldValidity {
    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldValidity::Invalid(_))
    }
}

/// What the identifier field should show after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierInput {
    pub display: String,
    pub validity: FieldValidity,
}

/// Live feedback while the identifier is typed.
pub fn live_identifier(raw: &str, heuristic: &IdentifierHeuristic) -> IdentifierInput {
    if !heuristic.looks_like_tax_id(raw) {
        return IdentifierInput {
            display: raw.to_string(),
            validity: FieldValidity::Neutral,
        };
    }

    let display = tax_id::format(raw);
    let validity = if tax_id::normalize(&display).len() == TAX_ID_LEN {
        if tax_id::is_valid(&display) {
            FieldValidity::Valid
        } else {
            FieldValidity::Invalid(MSG_INVALID_TAX_ID.to_string())
        }
    } else {
        FieldValidity::Neutral
    };

    IdentifierInput { display, validity }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Identifier {
    TaxId(TaxId),
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedClient {
    pub identifier: Identifier,
    pub invoice_value: Decimal,
}

/// Per-field messages collected on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFormErrors {
    pub identifier: Option<String>,
    pub invoice_value: Option<String>,
}

impl ClientFormErrors {
    pub fn is_empty(&self) -> bool {
        self.identifier.is_none() && self.invoice_value.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientForm {
    pub identifier: String,
    pub invoice_value: String,
}

impl ClientForm {
    pub fn new(identifier: impl Into<String>, invoice_value: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            invoice_value: invoice_value.into(),
        }
    }

    /// Submit-time validation. Every field is checked so all of them can be flagged at once.
    pub fn validate(
        &self,
        heuristic: &IdentifierHeuristic,
    ) -> std::result::Result<ValidatedClient, ClientFormErrors> {
        let mut errors = ClientFormErrors::default();

        let identifier = if heuristic.looks_like_tax_id(&self.identifier) {
            match TaxId::parse(&self.identifier) {
                Ok(id) => Some(Identifier::TaxId(id)),
                Err(_) => {
                    errors.identifier = Some(MSG_INVALID_TAX_ID.to_string());
                    None
                }
            }
        } else if self.identifier.trim().is_empty() {
            errors.identifier = Some(MSG_REQUIRED.to_string());
            None
        } else {
            Some(Identifier::Code(self.identifier.trim().to_string()))
        };

        let invoice_value = self.parse_invoice_value();
        if invoice_value.is_none() {
            errors.invoice_value = Some(MSG_INVALID_INVOICE.to_string());
        }

        match (identifier, invoice_value) {
            (Some(identifier), Some(invoice_value)) => Ok(ValidatedClient {
                identifier,
                invoice_value,
            }),
            _ => {
                tracing::debug!("Client form rejected: {:?}", errors);
                Err(errors)
            }
        }
    }

    fn parse_invoice_value(&self) -> Option<Decimal> {
        let digits = tax_id::normalize(&self.invoice_value);
        if digits.is_empty() || digits.bytes().all(|b| b == b'0') {
            return None;
        }
        // 未遮罩的輸入也一樣以分為單位讀取
        parse_currency(&mask_currency(&self.invoice_value)).filter(|value| *value > Decimal::ZERO)
    }
}
