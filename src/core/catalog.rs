use crate::domain::model::PredefinedPackage;
use crate::utils::error::{FreightError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Predefined package types keyed by their identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageCatalog {
    packages: BTreeMap<String, PredefinedPackage>,
}

impl PackageCatalog {
    pub fn new(packages: BTreeMap<String, PredefinedPackage>) -> Self {
        Self { packages }
    }

    /// 解析伺服器提供的 JSON 對應表 (id -> 包裝)
    pub fn from_json(content: &str) -> Result<Self> {
        let packages: BTreeMap<String, PredefinedPackage> = serde_json::from_str(content)?;
        tracing::debug!("Loaded {} predefined packages", packages.len());
        Ok(Self { packages })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn get(&self, id: &str) -> Option<&PredefinedPackage> {
        self.packages.get(id.trim())
    }

    pub fn lookup(&self, id: &str) -> Result<&PredefinedPackage> {
        self.get(id).ok_or_else(|| FreightError::UnknownPackage {
            id: id.trim().to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PredefinedPackage)> {
        self.packages.iter().map(|(id, pkg)| (id.as_str(), pkg))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn reference_package(nome: &str, comprimento: i64, altura: i64, largura: i64, peso: i64) -> PredefinedPackage {
    PredefinedPackage {
        nome: nome.to_string(),
        comprimento: Decimal::from(comprimento),
        altura: Decimal::from(altura),
        largura: Decimal::from(largura),
        peso_padrao: Decimal::from(peso),
    }
}

impl Default for PackageCatalog {
    fn default() -> Self {
        let packages = [
            ("1", reference_package("PP", 43, 35, 18, 3)),
            ("2", reference_package("P", 43, 35, 21, 6)),
            ("3", reference_package("M", 70, 43, 21, 10)),
            ("4", reference_package("G", 70, 43, 31, 20)),
            ("5", reference_package("Bau", 43, 35, 31, 10)),
            ("6", reference_package("Ternos", 96, 63, 26, 15)),
        ]
        .into_iter()
        .map(|(id, pkg)| (id.to_string(), pkg))
        .collect();

        Self { packages }
    }
}
