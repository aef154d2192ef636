use crate::core::catalog::PackageCatalog;
use crate::domain::model::{
    PackageEntry, PackageOrigin, PackageTotals, MAX_DIMENSION_CM, MAX_WEIGHT_KG,
};
use crate::utils::error::{FreightError, Result};
use crate::utils::format::parse_number;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub const DEFAULT_CUSTOM_NAME: &str = "Personalizada";

/// One row of the predefined-package table as the user filled it in.
#[derive(Debug, Clone, Default)]
pub struct PredefinedSelection {
    pub package_id: String,
    pub quantity: u32,
    /// Raw text of the weight field when the user chose to override the default.
    pub weight_override: Option<String>,
}

impl PredefinedSelection {
    pub fn new(package_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            package_id: package_id.into(),
            quantity,
            weight_override: None,
        }
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight_override = Some(weight.into());
        self
    }
}

/// Raw text of the custom-package form.
#[derive(Debug, Clone, Default)]
pub struct CustomPackageInput {
    pub name: String,
    pub length: String,
    pub height: String,
    pub width: String,
    pub weight: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredefinedBatch {
    pub added: usize,
    /// Rows flagged invalid and left out of the list.
    pub rejected: Vec<String>,
}

fn parse_positive(raw: &str) -> Option<Decimal> {
    parse_number(raw).filter(|value| *value > Decimal::ZERO)
}

fn parse_measure(raw: &str, max: Decimal) -> Option<Decimal> {
    parse_positive(raw).filter(|value| *value <= max)
}

fn parse_quantity(raw: &str) -> Option<u32> {
    let value = parse_positive(raw)?;
    if !value.fract().is_zero() {
        return None;
    }
    value.to_u32()
}

/// Packages collected during one page session.
#[derive(Debug, Clone, Default)]
pub struct PackageSession {
    entries: Vec<PackageEntry>,
}

impl PackageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從既有清單建立 (例如從檔案載入)，每一筆都必須在允許範圍內
    pub fn from_entries(entries: Vec<PackageEntry>) -> Result<Self> {
        let invalid: Vec<String> = entries
            .iter()
            .enumerate()
            .flat_map(|(index, entry)| {
                entry
                    .out_of_range_fields()
                    .into_iter()
                    .map(move |field| format!("{}[{}]", field, index))
            })
            .collect();

        if !invalid.is_empty() {
            return Err(FreightError::InvalidPackageFields { fields: invalid });
        }
        Ok(Self { entries })
    }

    pub fn add_predefined(
        &mut self,
        catalog: &PackageCatalog,
        selections: &[PredefinedSelection],
    ) -> Result<PredefinedBatch> {
        let mut batch = PredefinedBatch::default();

        for selection in selections.iter().filter(|s| s.quantity > 0) {
            let package = match catalog.lookup(&selection.package_id) {
                Ok(package) => package,
                Err(e) => {
                    tracing::error!("Predefined package data not found: {}", e);
                    continue;
                }
            };

            let weight = match &selection.weight_override {
                Some(raw) => match parse_measure(raw, MAX_WEIGHT_KG) {
                    Some(weight) => weight,
                    None => {
                        tracing::warn!("Invalid weight override '{}' for {}", raw, package.nome);
                        batch.rejected.push(format!("weight[{}]", selection.package_id));
                        continue;
                    }
                },
                None => package.peso_padrao,
            };

            let entry = PackageEntry {
                origin: PackageOrigin::Predefined,
                package_id: Some(selection.package_id.trim().to_string()),
                name: package.nome.clone(),
                length: package.comprimento,
                height: package.altura,
                width: package.largura,
                weight,
                quantity: selection.quantity,
            };
            if !entry.out_of_range_fields().is_empty() {
                tracing::warn!("Catalog package {} is outside the accepted limits", package.nome);
                batch.rejected.push(format!("package[{}]", selection.package_id));
                continue;
            }

            self.entries.push(entry);
            batch.added += 1;
        }

        if batch.added == 0 {
            if batch.rejected.is_empty() {
                return Err(FreightError::NoPackagesSelected);
            }
            return Err(FreightError::InvalidPackageFields {
                fields: batch.rejected,
            });
        }

        tracing::debug!("Added {} predefined packages", batch.added);
        Ok(batch)
    }

    /// Adds a custom package; every numeric field must be positive and within
    /// the accepted limits or nothing is added.
    pub fn add_custom(&mut self, input: &CustomPackageInput) -> Result<&PackageEntry> {
        let mut invalid = Vec::new();

        let mut measure = |field: &str, raw: &str, max: Decimal| {
            let value = parse_measure(raw, max);
            if value.is_none() {
                invalid.push(field.to_string());
            }
            value
        };
        let length = measure("length", &input.length, MAX_DIMENSION_CM);
        let height = measure("height", &input.height, MAX_DIMENSION_CM);
        let width = measure("width", &input.width, MAX_DIMENSION_CM);
        let weight = measure("weight", &input.weight, MAX_WEIGHT_KG);

        let quantity = parse_quantity(&input.quantity);
        if quantity.is_none() {
            invalid.push("quantity".to_string());
        }

        let (Some(length), Some(height), Some(width), Some(weight), Some(quantity)) =
            (length, height, width, weight, quantity)
        else {
            return Err(FreightError::InvalidPackageFields { fields: invalid });
        };

        let name = match input.name.trim() {
            "" => DEFAULT_CUSTOM_NAME.to_string(),
            name => name.to_string(),
        };

        self.entries.push(PackageEntry {
            origin: PackageOrigin::Custom,
            package_id: None,
            name,
            length,
            height,
            width,
            weight,
            quantity,
        });
        tracing::debug!("Added custom package (quantity {})", quantity);

        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn remove(&mut self, index: usize) -> Option<PackageEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn totals(&self) -> PackageTotals {
        self.entries
            .iter()
            .fold(PackageTotals::default(), |mut totals, entry| {
                totals.total_weight += entry.total_weight();
                totals.total_volume += entry.total_volume();
                totals.total_packages += u64::from(entry.quantity);
                totals
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(length: &str, height: &str, width: &str, weight: &str, quantity: &str) -> CustomPackageInput {
        CustomPackageInput {
            name: String::new(),
            length: length.to_string(),
            height: height.to_string(),
            width: width.to_string(),
            weight: weight.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn test_totals_aggregate_weight_by_quantity() {
        let mut session = PackageSession::new();
        session.add_custom(&custom("100", "50", "40", "10", "2")).unwrap();
        session.add_custom(&custom("100", "50", "40", "5", "3")).unwrap();

        let totals = session.totals();
        assert_eq!(totals.total_weight, Decimal::from(35));
        assert_eq!(totals.total_volume, Decimal::from(1));
        assert_eq!(totals.total_packages, 5);
    }

    #[test]
    fn test_empty_session_totals_are_zero() {
        let session = PackageSession::new();
        assert!(session.is_empty());
        assert_eq!(session.totals(), PackageTotals::default());
    }

    #[test]
    fn test_custom_defaults_name() {
        let mut session = PackageSession::new();
        let entry = session.add_custom(&custom("10", "10", "10", "1", "1")).unwrap();
        assert_eq!(entry.name, DEFAULT_CUSTOM_NAME);
        assert_eq!(entry.origin, PackageOrigin::Custom);
    }

    #[test]
    fn test_custom_reports_every_invalid_field() {
        let mut session = PackageSession::new();
        let err = session.add_custom(&custom("", "0", "abc", "-1", "1.5")).unwrap_err();
        match err {
            FreightError::InvalidPackageFields { fields } => {
                assert_eq!(fields, vec!["length", "height", "width", "weight", "quantity"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(session.is_empty());
    }

    #[test]
    fn test_predefined_uses_catalog_and_override() {
        let catalog = PackageCatalog::default();
        let mut session = PackageSession::new();
        let batch = session
            .add_predefined(
                &catalog,
                &[
                    PredefinedSelection::new("1", 2),
                    PredefinedSelection::new("2", 0),
                    PredefinedSelection::new("3", 1).with_weight("12.5"),
                ],
            )
            .unwrap();

        assert_eq!(batch.added, 2);
        assert!(batch.rejected.is_empty());
        assert_eq!(session.entries()[0].name, "PP");
        assert_eq!(session.entries()[0].weight, Decimal::from(3));
        assert_eq!(session.entries()[1].weight, Decimal::new(125, 1));
        assert_eq!(session.entries()[1].package_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_predefined_flags_bad_override_but_keeps_others() {
        let catalog = PackageCatalog::default();
        let mut session = PackageSession::new();
        let batch = session
            .add_predefined(
                &catalog,
                &[
                    PredefinedSelection::new("4", 1).with_weight("0"),
                    PredefinedSelection::new("5", 1),
                ],
            )
            .unwrap();

        assert_eq!(batch.added, 1);
        assert_eq!(batch.rejected, vec!["weight[4]"]);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_predefined_nothing_selected() {
        let catalog = PackageCatalog::default();
        let mut session = PackageSession::new();

        let err = session
            .add_predefined(&catalog, &[PredefinedSelection::new("1", 0)])
            .unwrap_err();
        assert!(matches!(err, FreightError::NoPackagesSelected));

        let err = session
            .add_predefined(&catalog, &[PredefinedSelection::new("99", 3)])
            .unwrap_err();
        assert!(matches!(err, FreightError::NoPackagesSelected));

        let err = session
            .add_predefined(&catalog, &[PredefinedSelection::new("1", 1).with_weight("x")])
            .unwrap_err();
        assert!(matches!(err, FreightError::InvalidPackageFields { .. }));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut session = PackageSession::new();
        session.add_custom(&custom("10", "10", "10", "1", "1")).unwrap();
        session.add_custom(&custom("20", "20", "20", "2", "1")).unwrap();

        let removed = session.remove(0).unwrap();
        assert_eq!(removed.length, Decimal::from(10));
        assert!(session.remove(5).is_none());
        assert_eq!(session.len(), 1);

        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_from_entries_rejects_non_positive() {
        let mut session = PackageSession::new();
        session.add_custom(&custom("10", "10", "10", "1", "1")).unwrap();
        let mut entries = session.entries().to_vec();
        assert!(PackageSession::from_entries(entries.clone()).is_ok());

        entries[0].weight = Decimal::ZERO;
        assert!(PackageSession::from_entries(entries).is_err());
    }

    #[test]
    fn test_custom_rejects_oversized_measures() {
        let mut session = PackageSession::new();

        let err = session.add_custom(&custom("10", "10", "10", "7e28", "2")).unwrap_err();
        assert!(matches!(err, FreightError::InvalidPackageFields { ref fields } if fields == &["weight"]));

        let err = session.add_custom(&custom("1e28", "1e28", "1e28", "1", "1")).unwrap_err();
        assert!(matches!(
            err,
            FreightError::InvalidPackageFields { ref fields } if fields == &["length", "height", "width"]
        ));
        assert!(session.is_empty());
        assert_eq!(session.totals(), PackageTotals::default());
    }

    #[test]
    fn test_totals_at_the_limits_do_not_overflow() {
        let mut session = PackageSession::new();
        let max_side = MAX_DIMENSION_CM.to_string();
        let max_weight = MAX_WEIGHT_KG.to_string();
        let max_quantity = u32::MAX.to_string();
        for _ in 0..3 {
            session
                .add_custom(&custom(&max_side, &max_side, &max_side, &max_weight, &max_quantity))
                .unwrap();
        }

        let totals = session.totals();
        assert_eq!(totals.total_weight, MAX_WEIGHT_KG * Decimal::from(u32::MAX) * Decimal::from(3));
        assert_eq!(totals.total_packages, 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_predefined_rejects_oversized_override_and_catalog_package() {
        let json = r#"{
            "1": {"nome": "PP", "comprimento": 43, "altura": 35, "largura": 18, "peso_padrao": 3},
            "9": {"nome": "Gigante", "comprimento": 1e27, "altura": 10, "largura": 10, "peso_padrao": 1}
        }"#;
        let catalog = PackageCatalog::from_json(json).unwrap();
        let mut session = PackageSession::new();

        let err = session
            .add_predefined(
                &catalog,
                &[
                    PredefinedSelection::new("1", 2).with_weight("7e28"),
                    PredefinedSelection::new("9", 1),
                ],
            )
            .unwrap_err();
        match err {
            FreightError::InvalidPackageFields { fields } => {
                assert_eq!(fields, vec!["weight[1]", "package[9]"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(session.is_empty());
    }

    #[test]
    fn test_from_entries_rejects_oversized_measures() {
        let json = r#"[{"type": "custom", "nome": "X", "comprimento": 10, "altura": 10,
                        "largura": 10, "peso": 5e27, "quantidade": 2}]"#;
        let entries: Vec<PackageEntry> = serde_json::from_str(json).unwrap();

        let err = PackageSession::from_entries(entries).unwrap_err();
        assert!(matches!(
            err,
            FreightError::InvalidPackageFields { ref fields } if fields == &["weight[0]"]
        ));
    }
}
