//! Versioned, validated registry of candidate services.
//!
//! Loading is all-or-nothing: any invalid record rejects the whole catalog, so
//! the rest of the pipeline only ever sees a fully consistent registry.

mod document;
mod parser;

pub use document::{
    CatalogDocument, CategoryPolicyRecord, CostRecord, PerformanceRecord, ScaleRecord,
    ServiceRecord,
};

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{
    Category, CategoryKind, Certification, CostModel, PerformanceProfile, ScaleRange, ScaleTier,
    ServiceDefinition, ServiceId, MAX_PERFORMANCE_TIER, MIN_PERFORMANCE_TIER,
};

const BUILTIN_CATALOG: &str = include_str!("builtin.json");

/// Reasons a catalog is rejected at load time.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid catalog table: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog version must not be empty")]
    MissingVersion,
    #[error("catalog declares no services")]
    Empty,
    #[error("service at position {position} has an empty identifier")]
    EmptyId { position: usize },
    #[error("duplicate service identifier '{0}'")]
    DuplicateId(ServiceId),
    #[error("service '{service}' declares unknown category '{value}'")]
    UnknownCategory { service: ServiceId, value: String },
    #[error("service '{service}' has an invalid cost model: {detail}")]
    InvalidCostModel { service: ServiceId, detail: String },
    #[error("service '{service}' lists unknown certification '{value}'")]
    UnknownCertification { service: ServiceId, value: String },
    #[error("service '{service}' has an invalid performance profile: {detail}")]
    InvalidPerformance { service: ServiceId, detail: String },
    #[error("service '{service}' has an invalid scale range: {detail}")]
    InvalidScaleRange { service: ServiceId, detail: String },
    #[error("service '{service}' depends on unknown service '{dependency}'")]
    UnknownDependency {
        service: ServiceId,
        dependency: ServiceId,
    },
    #[error("service '{service}' has an invalid dependency on '{dependency}': {detail}")]
    InvalidDependency {
        service: ServiceId,
        dependency: ServiceId,
        detail: &'static str,
    },
    #[error("category policy '{category}' is invalid: {detail}")]
    InvalidSelectionPolicy { category: String, detail: String },
}

/// Immutable, validated service registry shared across evaluations.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    version: String,
    services: Vec<ServiceDefinition>,
    index: BTreeMap<ServiceId, usize>,
    policies: BTreeMap<Category, CategoryKind>,
}

impl ServiceCatalog {
    /// Validate a catalog document and build the registry.
    pub fn load(document: CatalogDocument) -> Result<Self, CatalogError> {
        let CatalogDocument {
            version,
            categories,
            services: records,
        } = document;

        let version = version.trim().to_string();
        if version.is_empty() {
            return Err(CatalogError::MissingVersion);
        }
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let policies = validate_policies(categories)?;

        let mut services = Vec::with_capacity(records.len());
        let mut index = BTreeMap::new();
        for (ordinal, record) in records.into_iter().enumerate() {
            let service = validate_service(ordinal, record)?;
            if index.insert(service.id.clone(), ordinal).is_some() {
                return Err(CatalogError::DuplicateId(service.id));
            }
            services.push(service);
        }

        for service in &services {
            validate_dependencies(service, &index)?;
        }

        info!(
            version = %version,
            services = services.len(),
            "service catalog loaded"
        );

        Ok(Self {
            version,
            services,
            index,
            policies,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::load(document)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::load(document)
    }

    /// Load a tabular catalog. Tables carry no category policies, so every
    /// category is single-select.
    pub fn from_csv_reader<R: Read>(reader: R, version: &str) -> Result<Self, CatalogError> {
        let services = parser::parse_records(reader)?;
        Self::load(CatalogDocument {
            version: version.to_string(),
            categories: Vec::new(),
            services,
        })
    }

    /// Load from disk, choosing the format by extension (`.csv` or JSON otherwise).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            let version = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("csv");
            Self::from_csv_reader(file, version)
        } else {
            Self::from_json_reader(file)
        }
    }

    /// Catalog of Azure services shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Services in declaration order.
    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    pub fn get(&self, id: &ServiceId) -> Option<&ServiceDefinition> {
        self.index.get(id).and_then(|position| self.services.get(*position))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Categories with at least one declared service, in enumeration order.
    pub fn categories(&self) -> Vec<Category> {
        let present: BTreeSet<Category> = self
            .services
            .iter()
            .map(|service| service.category)
            .collect();
        present.into_iter().collect()
    }

    pub fn category_kind(&self, category: Category) -> CategoryKind {
        self.policies.get(&category).copied().unwrap_or_default()
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            version: self.version.clone(),
            categories: self
                .categories()
                .into_iter()
                .map(|category| CategorySummary {
                    category,
                    label: category.label(),
                    selection: self.category_kind(category),
                    services: self
                        .services
                        .iter()
                        .filter(|service| service.category == category)
                        .map(|service| service.id.clone())
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Serializable overview of the catalog for API consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub version: String,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub label: &'static str,
    pub selection: CategoryKind,
    pub services: Vec<ServiceId>,
}

fn validate_policies(
    records: Vec<CategoryPolicyRecord>,
) -> Result<BTreeMap<Category, CategoryKind>, CatalogError> {
    let mut policies = BTreeMap::new();

    for record in records {
        let category = Category::parse_label(&record.category).ok_or_else(|| {
            CatalogError::InvalidSelectionPolicy {
                category: record.category.clone(),
                detail: "unknown category".to_string(),
            }
        })?;

        if let CategoryKind::MultiSelect { max, threshold } = record.selection {
            if max == 0 {
                return Err(CatalogError::InvalidSelectionPolicy {
                    category: record.category,
                    detail: "max must be at least 1".to_string(),
                });
            }
            if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
                return Err(CatalogError::InvalidSelectionPolicy {
                    category: record.category,
                    detail: format!("threshold {threshold} outside 0-100"),
                });
            }
        }

        if policies.insert(category, record.selection).is_some() {
            return Err(CatalogError::InvalidSelectionPolicy {
                category: record.category,
                detail: "declared more than once".to_string(),
            });
        }
    }

    Ok(policies)
}

fn validate_service(
    ordinal: usize,
    record: ServiceRecord,
) -> Result<ServiceDefinition, CatalogError> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(CatalogError::EmptyId { position: ordinal });
    }
    let id = ServiceId(id.to_string());

    let category = Category::parse_label(&record.category).ok_or_else(|| {
        CatalogError::UnknownCategory {
            service: id.clone(),
            value: record.category.clone(),
        }
    })?;

    let cost = CostModel {
        fixed_monthly: record.cost.fixed_monthly,
        usage_monthly: record.cost.usage_monthly,
    };
    for (label, value) in [
        ("fixed_monthly", cost.fixed_monthly),
        ("usage_monthly", cost.usage_monthly),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CatalogError::InvalidCostModel {
                service: id,
                detail: format!("{label} must be a non-negative number, found {value}"),
            });
        }
    }

    let mut certifications = BTreeSet::new();
    for raw in &record.certifications {
        let certification =
            Certification::parse(raw).ok_or_else(|| CatalogError::UnknownCertification {
                service: id.clone(),
                value: raw.clone(),
            })?;
        certifications.insert(certification);
    }

    let performance = PerformanceProfile {
        tier: record.performance.tier,
        availability: record.performance.availability,
    };
    if !(MIN_PERFORMANCE_TIER..=MAX_PERFORMANCE_TIER).contains(&performance.tier) {
        return Err(CatalogError::InvalidPerformance {
            service: id,
            detail: format!(
                "tier {} outside {MIN_PERFORMANCE_TIER}-{MAX_PERFORMANCE_TIER}",
                performance.tier
            ),
        });
    }
    if !performance.availability.is_finite()
        || performance.availability <= 0.0
        || performance.availability > 100.0
    {
        return Err(CatalogError::InvalidPerformance {
            service: id,
            detail: format!("availability {} outside (0, 100]", performance.availability),
        });
    }

    let scale = parse_scale(&id, &record.scale)?;

    let name = if record.name.trim().is_empty() {
        id.0.clone()
    } else {
        record.name.trim().to_string()
    };

    debug!(service = %id, category = %category, "validated catalog entry");

    Ok(ServiceDefinition {
        id,
        name,
        category,
        cost,
        certifications,
        performance,
        scale,
        dependencies: service_ids(&record.dependencies),
        external_dependencies: service_ids(&record.external_dependencies),
        ordinal,
    })
}

fn service_ids(raw: &[String]) -> Vec<ServiceId> {
    raw.iter()
        .map(|value| ServiceId(value.trim().to_string()))
        .collect()
}

fn parse_scale(id: &ServiceId, record: &ScaleRecord) -> Result<ScaleRange, CatalogError> {
    let parse = |raw: &str| {
        ScaleTier::parse_label(raw).ok_or_else(|| CatalogError::InvalidScaleRange {
            service: id.clone(),
            detail: format!("unknown scale tier '{raw}'"),
        })
    };
    let min = parse(&record.min)?;
    let max = parse(&record.max)?;
    if min > max {
        return Err(CatalogError::InvalidScaleRange {
            service: id.clone(),
            detail: format!("min {min} is above max {max}"),
        });
    }
    Ok(ScaleRange { min, max })
}

fn validate_dependencies(
    service: &ServiceDefinition,
    index: &BTreeMap<ServiceId, usize>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();

    for (dependency, external) in service.all_dependencies() {
        if dependency.0.is_empty() {
            return Err(CatalogError::InvalidDependency {
                service: service.id.clone(),
                dependency: dependency.clone(),
                detail: "empty identifier",
            });
        }
        if *dependency == service.id {
            return Err(CatalogError::InvalidDependency {
                service: service.id.clone(),
                dependency: dependency.clone(),
                detail: "a service cannot depend on itself",
            });
        }
        if !seen.insert(dependency) {
            return Err(CatalogError::InvalidDependency {
                service: service.id.clone(),
                dependency: dependency.clone(),
                detail: "listed more than once",
            });
        }
        if !external && !index.contains_key(dependency) {
            return Err(CatalogError::UnknownDependency {
                service: service.id.clone(),
                dependency: dependency.clone(),
            });
        }
    }

    Ok(())
}
