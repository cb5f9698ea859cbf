use super::common::*;

use crate::recommendation::{
    ArchitectureAssembler, Category, DependencyEdge, EdgeKind, Layering, LayeringError,
    Recommendation, Requirement, ScaleTier, ScoreWeights, ScoringEngine, ServiceCatalog,
    ServiceDefinition, Warning,
};

fn assemble_with(
    catalog: &ServiceCatalog,
    eligible: &[&ServiceDefinition],
    requirement: &Requirement,
    assembler: &ArchitectureAssembler,
) -> Recommendation {
    let rankings = ScoringEngine::new(ScoreWeights::default(), 250.0)
        .expect("valid cost reference")
        .score(catalog, eligible, requirement);
    assembler.assemble(catalog.version(), &rankings, requirement)
}

fn assemble_all(catalog: &ServiceCatalog, requirement: &Requirement) -> Recommendation {
    let eligible: Vec<_> = catalog.services().iter().collect();
    let assembler = ArchitectureAssembler::new(Layering::default(), false);
    assemble_with(catalog, &eligible, requirement, &assembler)
}

fn edge(from: &str, to: &str, kind: EdgeKind) -> DependencyEdge {
    DependencyEdge {
        from: from.into(),
        to: to.into(),
        kind,
    }
}

fn category_order(recommendation: &Recommendation) -> Vec<Category> {
    recommendation
        .categories
        .iter()
        .map(|selection| selection.category)
        .collect()
}

#[test]
fn categories_follow_default_layering() {
    let catalog = catalog_of(vec![
        record("monitor", "monitoring", 10.0, &[], 3),
        record("vm", "compute", 10.0, &[], 3),
        record("vnet", "networking", 10.0, &[], 3),
        record("vault", "security", 10.0, &[], 3),
    ]);

    let recommendation = assemble_all(&catalog, &requirement(ScaleTier::Small));

    assert_eq!(
        category_order(&recommendation),
        vec![
            Category::Networking,
            Category::Compute,
            Category::Security,
            Category::Monitoring
        ]
    );
    assert_eq!(recommendation.catalog_version, "test-1");
    assert!(recommendation.complete);
}

#[test]
fn unlisted_categories_follow_listed_ones() {
    let catalog = catalog_of(vec![
        record("vm", "compute", 10.0, &[], 3),
        record("vnet", "networking", 10.0, &[], 3),
        record("monitor", "monitoring", 10.0, &[], 3),
    ]);
    let eligible: Vec<_> = catalog.services().iter().collect();
    let layering = Layering::new(vec![Category::Monitoring]).expect("valid layering");
    let assembler = ArchitectureAssembler::new(layering, false);

    let recommendation = assemble_with(
        &catalog,
        &eligible,
        &requirement(ScaleTier::Small),
        &assembler,
    );

    assert_eq!(
        category_order(&recommendation),
        vec![Category::Monitoring, Category::Networking, Category::Compute]
    );
}

#[test]
fn layering_rejects_repeated_categories() {
    assert_eq!(
        Layering::new(vec![Category::Compute, Category::Compute]),
        Err(LayeringError::Duplicate(Category::Compute))
    );
    assert!(serde_json::from_str::<Layering>(r#"["security", "security"]"#).is_err());
    let parsed: Layering =
        serde_json::from_str(r#"["compute", "ai_ml", "devops"]"#).expect("valid layering");
    assert_eq!(
        parsed.order(),
        &[Category::Compute, Category::AiMl, Category::DevOps]
    );
}

#[test]
fn selected_dependencies_become_requires_edges() {
    let catalog = catalog_of(vec![
        record("vnet", "networking", 10.0, &[], 3),
        with_dependencies(record("vm", "compute", 10.0, &[], 3), &["vnet"]),
    ]);

    let recommendation = assemble_all(&catalog, &requirement(ScaleTier::Small));

    assert_eq!(
        recommendation.edges,
        vec![edge("vm", "vnet", EdgeKind::Requires)]
    );
    assert!(recommendation.complete);
}

#[test]
fn unmet_dependency_is_a_warning_and_marks_incomplete() {
    let catalog = catalog_of(vec![
        with_dependencies(record("vm", "compute", 10.0, &["HIPAA"], 3), &["disk"]),
        record("disk", "storage", 10.0, &[], 3),
    ]);
    let eligible = vec![&catalog.services()[0]];
    let assembler = ArchitectureAssembler::new(Layering::default(), true);

    let recommendation = assemble_with(&catalog, &eligible, &hipaa_requirement(), &assembler);

    assert!(!recommendation.complete);
    assert!(recommendation.edges.is_empty());
    assert!(recommendation.warnings.contains(&Warning::DependencyGap {
        service: "vm".into(),
        dependency: "disk".into(),
    }));
    assert!(recommendation.warnings.contains(&Warning::CoverageGap {
        category: Category::Storage
    }));
    let storage = recommendation
        .category(Category::Storage)
        .expect("storage listed");
    assert!(storage.services.is_empty());
}

#[test]
fn externally_provided_dependencies_resolve_gaps() {
    let catalog = catalog_of(vec![
        with_dependencies(record("vm", "compute", 10.0, &["HIPAA"], 3), &["disk"]),
        record("disk", "storage", 10.0, &[], 3),
    ]);
    let eligible = vec![&catalog.services()[0]];
    let mut requirement = hipaa_requirement();
    requirement.externally_provided.insert("disk".into());
    let assembler = ArchitectureAssembler::new(Layering::default(), false);

    let recommendation = assemble_with(&catalog, &eligible, &requirement, &assembler);

    assert!(recommendation.complete);
    assert_eq!(
        recommendation.edges,
        vec![edge("vm", "disk", EdgeKind::External)]
    );
}

#[test]
fn catalog_external_dependencies_become_external_edges() {
    let mut sql = record("sql", "database", 10.0, &[], 3);
    sql.external_dependencies = vec!["directory".to_string()];
    let catalog = catalog_of(vec![sql]);

    let recommendation = assemble_all(&catalog, &requirement(ScaleTier::Small));

    assert_eq!(
        recommendation.edges,
        vec![edge("sql", "directory", EdgeKind::External)]
    );
    assert!(recommendation.complete);
}

#[test]
fn flow_edges_connect_category_leaders_once() {
    let catalog = catalog_of(vec![
        with_dependencies(record("vm", "compute", 10.0, &[], 3), &["db"]),
        record("db", "database", 10.0, &[], 3),
        record("blob", "storage", 10.0, &[], 3),
    ]);
    let eligible: Vec<_> = catalog.services().iter().collect();
    let requirement = requirement(ScaleTier::Small);

    let with_flow = assemble_with(
        &catalog,
        &eligible,
        &requirement,
        &ArchitectureAssembler::new(Layering::default(), true),
    );
    let without_flow = assemble_with(
        &catalog,
        &eligible,
        &requirement,
        &ArchitectureAssembler::new(Layering::default(), false),
    );

    assert_eq!(
        with_flow.edges,
        vec![
            edge("vm", "db", EdgeKind::Requires),
            edge("vm", "blob", EdgeKind::Flow),
        ]
    );
    assert_eq!(
        without_flow.edges,
        vec![edge("vm", "db", EdgeKind::Requires)]
    );
}

#[test]
fn unmet_targets_become_advisory_warnings() {
    let mut slow = with_scale(record("slow", "compute", 10.0, &[], 2), "small", "medium");
    slow.performance.availability = 99.0;
    let catalog = catalog_of(vec![slow]);

    let recommendation = assemble_all(&catalog, &requirement(ScaleTier::Large));

    assert_eq!(
        recommendation.warnings,
        vec![
            Warning::PerformanceBelowTarget {
                service: "slow".into(),
                tier: 2,
                target: 3,
            },
            Warning::AvailabilityBelowTarget {
                service: "slow".into(),
                availability: 99.0,
                target: 99.9,
            },
            Warning::ScaleUnsupported {
                service: "slow".into(),
                supported: (ScaleTier::Small, ScaleTier::Medium),
                requested: ScaleTier::Large,
            },
        ]
    );
    assert!(recommendation.complete);
}

#[test]
fn overall_score_is_mean_of_selected_scores() {
    let catalog = catalog_of(vec![
        record("vm", "compute", 10.0, &[], 3),
        record("blob", "storage", 10.0, &[], 5),
    ]);

    let recommendation = assemble_all(&catalog, &requirement(ScaleTier::Small));
    let scores: Vec<f64> = recommendation
        .selected_services()
        .map(|selected| selected.score)
        .collect();

    let mean = (scores[0] + scores[1]) / 2.0;
    assert!((recommendation.overall_score - mean).abs() < 1e-4);
    assert!(recommendation.is_selected(&"blob".into()));
}
