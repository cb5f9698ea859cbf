use serde::{Deserialize, Serialize};

use super::super::domain::CategoryKind;

/// External catalog format before validation. Values stay loosely typed so the
/// loader can report which service and field broke the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    pub version: String,
    #[serde(default)]
    pub categories: Vec<CategoryPolicyRecord>,
    pub services: Vec<ServiceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryPolicyRecord {
    pub category: String,
    pub selection: CategoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: String,
    pub cost: CostRecord,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub performance: PerformanceRecord,
    pub scale: ScaleRecord,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub external_dependencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostRecord {
    pub fixed_monthly: f64,
    #[serde(default)]
    pub usage_monthly: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerformanceRecord {
    pub tier: u8,
    pub availability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleRecord {
    pub min: String,
    pub max: String,
}
