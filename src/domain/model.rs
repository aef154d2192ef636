use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageOrigin {
    Predefined,
    Custom,
}

/// Largest accepted side of a package, in centimetres.
pub const MAX_DIMENSION_CM: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);
/// Largest accepted weight of a single package, in kilograms.
pub const MAX_WEIGHT_KG: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Package dimensions in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub length: Decimal,
    pub height: Decimal,
    pub width: Decimal,
}

impl Dimensions {
    pub fn new(length: Decimal, height: Decimal, width: Decimal) -> Self {
        Self {
            length,
            height,
            width,
        }
    }

    /// 單件體積 (m³)
    pub fn volume_m3(&self) -> Decimal {
        let hundred = Decimal::ONE_HUNDRED;
        (self.length / hundred) * (self.height / hundred) * (self.width / hundred)
    }
}

/// One line of the package list, in the shape the quotation endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    #[serde(rename = "type")]
    pub origin: PackageOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "comprimento", with = "rust_decimal::serde::float")]
    pub length: Decimal,
    #[serde(rename = "altura", with = "rust_decimal::serde::float")]
    pub height: Decimal,
    #[serde(rename = "largura", with = "rust_decimal::serde::float")]
    pub width: Decimal,
    #[serde(rename = "peso", with = "rust_decimal::serde::float")]
    pub weight: Decimal,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

impl PackageEntry {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.length, self.height, self.width)
    }

    pub fn volume_m3(&self) -> Decimal {
        self.dimensions().volume_m3()
    }

    pub fn total_weight(&self) -> Decimal {
        self.weight * Decimal::from(self.quantity)
    }

    pub fn total_volume(&self) -> Decimal {
        self.volume_m3() * Decimal::from(self.quantity)
    }

    /// Names of the measures outside `(0, MAX]`. Within these limits the
    /// totals of any realistic list stay far below `Decimal::MAX`.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let checks = [
            ("length", self.length, MAX_DIMENSION_CM),
            ("height", self.height, MAX_DIMENSION_CM),
            ("width", self.width, MAX_DIMENSION_CM),
            ("weight", self.weight, MAX_WEIGHT_KG),
        ];
        for (field, value, max) in checks {
            if value <= Decimal::ZERO || value > max {
                fields.push(field);
            }
        }
        if self.quantity == 0 {
            fields.push("quantity");
        }
        fields
    }
}

/// Catalog entry as supplied by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredefinedPackage {
    pub nome: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub comprimento: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub altura: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub largura: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub peso_padrao: Decimal,
}

impl PredefinedPackage {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.comprimento, self.altura, self.largura)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackageTotals {
    pub total_weight: Decimal,
    pub total_volume: Decimal,
    pub total_packages: u64,
}

/// Body returned by the quotation endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteResponse {
    pub redirect: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Redirect(String),
}

impl SubmissionOutcome {
    pub fn redirect_url(&self) -> &str {
        match self {
            SubmissionOutcome::Redirect(url) => url,
        }
    }
}
