use super::common::*;

use crate::recommendation::catalog::ServiceRecord;
use crate::recommendation::{
    AdvisorConfig, AdvisorConfigError, ArchitectureAdvisor, Category, CostBreakdown,
    CostEstimator, Requirement, SavingsOpportunity, ScaleTier, ServiceCatalog, ServiceId,
};

fn with_usage(mut record: ServiceRecord, usage_monthly: f64) -> ServiceRecord {
    record.cost.usage_monthly = usage_monthly;
    record
}

fn price(catalog: ServiceCatalog, config: AdvisorConfig, requirement: &Requirement) -> CostBreakdown {
    advisor_with(catalog, config)
        .evaluate(requirement)
        .expect("evaluation succeeds")
        .cost
}

/// Two compute services: the certified one outscores the cheaper one by ten points.
fn close_call_catalog() -> ServiceCatalog {
    catalog_of(vec![
        record(
            "premium-vm",
            "compute",
            200.0,
            &["SOC 2", "ISO 27001", "GDPR", "SOX"],
            3,
        ),
        record("budget-vm", "compute", 50.0, &[], 3),
    ])
}

fn close_call_config(savings_tolerance: f64) -> AdvisorConfig {
    AdvisorConfig {
        weights: weights(0.9, 0.0, 0.0, 0.1),
        savings_tolerance,
        ..AdvisorConfig::default()
    }
}

#[test]
fn prices_selected_services_at_requested_scale() {
    let catalog = catalog_of(vec![
        with_usage(record("vm", "compute", 100.0, &[], 3), 10.0),
        record("blob", "storage", 20.0, &[], 3),
    ]);

    let cost = price(
        catalog,
        AdvisorConfig::default(),
        &requirement(ScaleTier::Medium),
    );

    let lines: Vec<(&str, f64)> = cost
        .lines
        .iter()
        .map(|line| (line.service.as_str(), line.monthly))
        .collect();
    assert_eq!(lines, vec![("vm", 140.0), ("blob", 20.0)]);
    assert_eq!(cost.total_monthly, 160.0);
    assert_eq!(cost.total_annual, 1920.0);
    assert_eq!(cost.committed_annual, 1632.0);
    assert!(cost.reserved_capacity.is_empty());
}

#[test]
fn category_totals_sum_multi_select_services() {
    let mut document = document(vec![
        record("waf", "security", 30.0, &[], 3),
        record("vault", "security", 45.0, &[], 3),
        record("vm", "compute", 10.0, &[], 3),
    ]);
    document.categories = vec![multi_select("security", 3, 0.0)];
    let catalog = ServiceCatalog::load(document).expect("valid catalog");

    let cost = price(
        catalog,
        AdvisorConfig::default(),
        &requirement(ScaleTier::Small),
    );

    let security = cost
        .category_totals
        .iter()
        .find(|total| total.category == Category::Security)
        .expect("security priced");
    assert_eq!(security.monthly, 75.0);
    assert_eq!(cost.total_monthly, 85.0);
    assert_eq!(cost.lines.len(), 3);
}

#[test]
fn services_starting_at_larger_tiers_are_priced_at_their_minimum() {
    let catalog = catalog_of(vec![with_scale(
        with_usage(record("cluster", "containers", 10.0, &[], 3), 5.0),
        "large",
        "enterprise",
    )]);

    let cost = price(
        catalog,
        AdvisorConfig::default(),
        &requirement(ScaleTier::Small),
    );

    assert_eq!(cost.total_monthly, 70.0);
}

#[test]
fn flags_cheaper_alternative_within_tolerance() {
    let cost = price(
        close_call_catalog(),
        close_call_config(0.15),
        &requirement(ScaleTier::Small),
    );

    assert_eq!(
        cost.savings,
        vec![SavingsOpportunity {
            category: Category::Compute,
            selected: ServiceId::from("premium-vm"),
            alternative: ServiceId::from("budget-vm"),
            monthly_savings: 150.0,
            score_gap: 10.0,
        }]
    );
    assert_eq!(cost.total_monthly, 200.0);
}

#[test]
fn ignores_alternatives_outside_tolerance() {
    let cost = price(
        close_call_catalog(),
        close_call_config(0.05),
        &requirement(ScaleTier::Small),
    );

    assert!(cost.savings.is_empty());
}

#[test]
fn expensive_services_are_flagged_for_reserved_capacity() {
    let catalog = catalog_of(vec![
        record("warehouse", "analytics", 900.0, &[], 3),
        record("queue", "integration", 40.0, &[], 3),
    ]);

    let cost = price(
        catalog,
        AdvisorConfig::default(),
        &requirement(ScaleTier::Small),
    );
    assert_eq!(cost.reserved_capacity, vec![ServiceId::from("warehouse")]);

    let lowered = AdvisorConfig {
        reserved_capacity_threshold: 10.0,
        ..AdvisorConfig::default()
    };
    let catalog = catalog_of(vec![
        record("warehouse", "analytics", 900.0, &[], 3),
        record("queue", "integration", 40.0, &[], 3),
    ]);
    let cost = price(catalog, lowered, &requirement(ScaleTier::Small));
    assert_eq!(cost.reserved_capacity.len(), 2);
}

#[test]
fn empty_recommendation_costs_nothing() {
    let catalog = hipaa_example_catalog();
    let mut requirement = hipaa_requirement();
    requirement.compliance = certifications(&["FedRAMP"]);

    let cost = price(catalog, AdvisorConfig::default(), &requirement);

    assert!(cost.lines.is_empty());
    assert!(cost.category_totals.is_empty());
    assert_eq!(cost.total_monthly, 0.0);
    assert_eq!(cost.committed_annual, 0.0);
}

#[test]
fn estimator_rejects_out_of_range_tuning() {
    let cases = [
        (CostEstimator::new(1.0, 500.0, 0.15), "savings_tolerance"),
        (CostEstimator::new(0.05, -1.0, 0.15), "reserved_capacity_threshold"),
        (CostEstimator::new(0.05, 500.0, f64::NAN), "annual_commitment_discount"),
    ];

    for (result, expected) in cases {
        match result {
            Err(AdvisorConfigError::OutOfRange { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected {expected} to be rejected, got {other:?}"),
        }
    }
    assert!(CostEstimator::new(0.0, 0.0, 0.0).is_ok());
}

#[test]
fn advisor_refuses_unvalidated_config() {
    let config = AdvisorConfig {
        cost_reference: 0.0,
        ..AdvisorConfig::default()
    };

    match ArchitectureAdvisor::new(builtin_catalog(), config) {
        Err(AdvisorConfigError::OutOfRange { field, .. }) => assert_eq!(field, "cost_reference"),
        other => panic!("expected cost reference rejection, got {other:?}"),
    }
}
