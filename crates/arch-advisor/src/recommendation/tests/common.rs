use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::recommendation::catalog::{
    CatalogDocument, CategoryPolicyRecord, CostRecord, PerformanceRecord, ScaleRecord,
    ServiceRecord,
};
use crate::recommendation::{
    AdvisorConfig, ArchitectureAdvisor, CategoryKind, Certification, Industry, Requirement,
    ScaleTier, ScoreWeights, ServiceCatalog, WeightTable,
};

pub(super) fn record(
    id: &str,
    category: &str,
    fixed_monthly: f64,
    certifications: &[&str],
    tier: u8,
) -> ServiceRecord {
    ServiceRecord {
        id: id.to_string(),
        name: String::new(),
        category: category.to_string(),
        cost: CostRecord {
            fixed_monthly,
            usage_monthly: 0.0,
        },
        certifications: certifications.iter().map(|cert| cert.to_string()).collect(),
        performance: PerformanceRecord {
            tier,
            availability: 99.95,
        },
        scale: ScaleRecord {
            min: "small".to_string(),
            max: "enterprise".to_string(),
        },
        dependencies: Vec::new(),
        external_dependencies: Vec::new(),
    }
}

pub(super) fn with_name(mut record: ServiceRecord, name: &str) -> ServiceRecord {
    record.name = name.to_string();
    record
}

pub(super) fn with_dependencies(mut record: ServiceRecord, dependencies: &[&str]) -> ServiceRecord {
    record.dependencies = dependencies.iter().map(|id| id.to_string()).collect();
    record
}

pub(super) fn with_scale(mut record: ServiceRecord, min: &str, max: &str) -> ServiceRecord {
    record.scale = ScaleRecord {
        min: min.to_string(),
        max: max.to_string(),
    };
    record
}

pub(super) fn document(services: Vec<ServiceRecord>) -> CatalogDocument {
    CatalogDocument {
        version: "test-1".to_string(),
        categories: Vec::new(),
        services,
    }
}

pub(super) fn multi_select(category: &str, max: u8, threshold: f64) -> CategoryPolicyRecord {
    CategoryPolicyRecord {
        category: category.to_string(),
        selection: CategoryKind::MultiSelect { max, threshold },
    }
}

pub(super) fn catalog_of(services: Vec<ServiceRecord>) -> ServiceCatalog {
    ServiceCatalog::load(document(services)).expect("fixture catalog is valid")
}

pub(super) fn catalog_with_policies(
    policies: Vec<CategoryPolicyRecord>,
    services: Vec<ServiceRecord>,
) -> ServiceCatalog {
    let mut fixture = document(services);
    fixture.categories = policies;
    ServiceCatalog::load(fixture).expect("fixture catalog is valid")
}

/// Two compute services: A is faster and pricier but lacks HIPAA.
pub(super) fn hipaa_example_catalog() -> ServiceCatalog {
    catalog_of(vec![
        record("service-a", "compute", 100.0, &["ISO27001"], 2),
        record("service-b", "compute", 50.0, &["ISO27001", "HIPAA"], 1),
    ])
}

pub(super) fn builtin_catalog() -> Arc<ServiceCatalog> {
    Arc::new(ServiceCatalog::builtin().expect("built-in catalog is valid"))
}

pub(super) fn certifications(names: &[&str]) -> BTreeSet<Certification> {
    names
        .iter()
        .map(|name| Certification::parse(name).expect("known certification"))
        .collect()
}

pub(super) fn requirement(scale: ScaleTier) -> Requirement {
    Requirement::new(Industry::General, scale)
}

pub(super) fn hipaa_requirement() -> Requirement {
    let mut requirement = requirement(ScaleTier::Small);
    requirement.compliance = certifications(&["HIPAA"]);
    requirement
}

pub(super) fn weights(performance: f64, cost: f64, scale: f64, compliance_bonus: f64) -> ScoreWeights {
    ScoreWeights::new(WeightTable {
        performance,
        cost,
        scale,
        compliance_bonus,
    })
    .expect("fixture weights are valid")
}

pub(super) fn advisor_with(catalog: ServiceCatalog, config: AdvisorConfig) -> ArchitectureAdvisor {
    ArchitectureAdvisor::new(Arc::new(catalog), config).expect("fixture config is valid")
}

pub(super) fn builtin_advisor() -> Arc<ArchitectureAdvisor> {
    Arc::new(
        ArchitectureAdvisor::new(builtin_catalog(), AdvisorConfig::default())
            .expect("default config is valid"),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
