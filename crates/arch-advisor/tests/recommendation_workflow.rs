use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use arch_advisor::recommendation::{
    AdvisorConfig, ArchitectureAdvisor, Category, EvaluationError, Industry, RawRequirements,
    Recommendation, Requirement, ScaleTier, ServiceCatalog, Warning,
};

const CLINIC_CATALOG: &str = r#"{
  "version": "clinic-2",
  "services": [
    {
      "id": "service-a",
      "name": "Service A",
      "category": "compute",
      "cost": { "fixed_monthly": 100 },
      "certifications": ["ISO 27001"],
      "performance": { "tier": 2, "availability": 99.95 },
      "scale": { "min": "small", "max": "enterprise" }
    },
    {
      "id": "service-b",
      "name": "Service B",
      "category": "compute",
      "cost": { "fixed_monthly": 50 },
      "certifications": ["ISO 27001", "HIPAA"],
      "performance": { "tier": 1, "availability": 99.95 },
      "scale": { "min": "small", "max": "enterprise" }
    },
    {
      "id": "records-db",
      "name": "Records Database",
      "category": "database",
      "cost": { "fixed_monthly": 80, "usage_monthly": 20 },
      "certifications": ["HIPAA", "SOC 2"],
      "performance": { "tier": 3, "availability": 99.99 },
      "scale": { "min": "small", "max": "large" },
      "dependencies": ["service-b"],
      "external_dependencies": ["hospital-idp"]
    }
  ]
}"#;

const PERFORMANCE_AND_COST: &str = r#"{ "weights": { "performance": 0.5, "cost": 0.5 } }"#;

fn builtin_advisor() -> ArchitectureAdvisor {
    let catalog = ServiceCatalog::builtin().expect("built-in catalog loads");
    ArchitectureAdvisor::new(Arc::new(catalog), AdvisorConfig::default())
        .expect("default config is valid")
}

fn clinic_advisor() -> ArchitectureAdvisor {
    let catalog = ServiceCatalog::from_json_str(CLINIC_CATALOG).expect("clinic catalog loads");
    let config = AdvisorConfig::from_json_str(PERFORMANCE_AND_COST).expect("config loads");
    ArchitectureAdvisor::new(Arc::new(catalog), config).expect("clinic config is valid")
}

fn selected_ids(recommendation: &Recommendation) -> Vec<&str> {
    recommendation
        .selected_services()
        .map(|selected| selected.service.id.as_str())
        .collect()
}

#[test]
fn healthcare_request_selects_only_certified_services() {
    let advisor = clinic_advisor();
    let raw: RawRequirements =
        serde_json::from_str(r#"{ "industry": "Healthcare", "scale": "small" }"#)
            .expect("request parses");

    let recommendation = advisor.recommend(raw).expect("evaluation succeeds");

    assert_eq!(recommendation.catalog_version, "clinic-2");
    assert_eq!(selected_ids(&recommendation), vec!["service-b", "records-db"]);
    assert_eq!(recommendation.excluded.len(), 1);
    assert_eq!(recommendation.excluded[0].service.as_str(), "service-a");
    assert!(recommendation.complete);
    assert_eq!(recommendation.cost.total_monthly, 150.0);

    let edges: Vec<(&str, &str)> = recommendation
        .edges
        .iter()
        .map(|edge| (edge.from.as_str(), edge.to.as_str()))
        .collect();
    assert!(edges.contains(&("records-db", "service-b")));
    assert!(edges.contains(&("records-db", "hospital-idp")));
    assert!(edges.contains(&("service-b", "records-db")));
}

#[test]
fn general_request_prefers_the_faster_service() {
    let advisor = clinic_advisor();

    let recommendation = advisor
        .evaluate(&Requirement::new(Industry::General, ScaleTier::Small))
        .expect("evaluation succeeds");

    assert_eq!(selected_ids(&recommendation), vec!["service-a", "records-db"]);
    assert!(!recommendation.complete);
    assert!(recommendation
        .warnings
        .iter()
        .any(|warning| matches!(warning, Warning::DependencyGap { .. })));
}

#[test]
fn no_selected_service_ever_lacks_an_obligation() {
    let advisor = builtin_advisor();

    for industry in Industry::ALL {
        for scale in ScaleTier::ALL {
            let requirement = Requirement::new(industry, scale);
            let recommendation = advisor.evaluate(&requirement).expect("evaluation succeeds");

            for selected in recommendation.selected_services() {
                assert!(
                    selected.service.holds_all(&requirement.compliance),
                    "{} selected for {industry} without {:?}",
                    selected.service.id,
                    selected.service.missing_certifications(&requirement.compliance)
                );
            }
            for edge in &recommendation.edges {
                assert!(recommendation.is_selected(&edge.from));
            }
        }
    }
}

#[test]
fn government_gaps_are_reported_with_a_partial_architecture() {
    let advisor = builtin_advisor();

    let recommendation = advisor
        .evaluate(&Requirement::new(Industry::Government, ScaleTier::Medium))
        .expect("gaps are not fatal");

    for category in [Category::Containers, Category::Analytics, Category::DevOps] {
        assert!(
            recommendation
                .warnings
                .contains(&Warning::CoverageGap { category }),
            "expected a gap for {category}"
        );
    }
    assert!(recommendation.category(Category::Networking).is_some());
    assert!(recommendation.selected_services().count() > 0);
}

#[test]
fn repeated_and_concurrent_evaluations_agree() {
    let advisor = builtin_advisor();
    let requirements: Vec<Requirement> = Industry::ALL
        .into_iter()
        .map(|industry| Requirement::new(industry, ScaleTier::Large))
        .collect();

    let sequential: Vec<Recommendation> = requirements
        .iter()
        .map(|requirement| advisor.evaluate(requirement).expect("sequential evaluation"))
        .collect();

    let shared = &advisor;
    let concurrent: Vec<Recommendation> = thread::scope(|scope| {
        let handles: Vec<_> = requirements
            .iter()
            .map(|requirement| scope.spawn(move || shared.evaluate(requirement)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("evaluation thread")
                    .expect("concurrent evaluation")
            })
            .collect()
    });

    assert_eq!(sequential, concurrent);
    assert_eq!(sequential, {
        let fresh = builtin_advisor();
        requirements
            .iter()
            .map(|requirement| fresh.evaluate(requirement).expect("fresh evaluation"))
            .collect::<Vec<_>>()
    });
}

#[test]
fn soft_and_hard_budgets_differ_only_in_enforcement() {
    let advisor = clinic_advisor();
    let soft: RawRequirements = serde_json::from_str(
        r#"{ "industry": "healthcare", "scale": "small", "budget": { "monthly_ceiling": 120 } }"#,
    )
    .expect("request parses");
    let hard: RawRequirements = serde_json::from_str(
        r#"{ "industry": "healthcare", "scale": "small", "budget": { "monthly_ceiling": 120, "hard": true } }"#,
    )
    .expect("request parses");

    let recommendation = advisor.recommend(soft).expect("soft budget never fails");
    assert!(recommendation.warnings.contains(&Warning::BudgetExceeded {
        ceiling: 120.0,
        estimated: 150.0,
    }));

    match advisor.recommend(hard) {
        Err(EvaluationError::BudgetExceeded { ceiling, estimated }) => {
            assert_eq!(ceiling, 120.0);
            assert_eq!(estimated, 150.0);
        }
        other => panic!("expected hard budget failure, got {other:?}"),
    }
}

#[test]
fn tabular_catalogs_and_config_files_drive_the_same_pipeline() {
    let csv = "id,name,category,fixed_monthly,usage_monthly,certifications,performance_tier,availability,min_scale,max_scale,dependencies,external_dependencies\n\
edge-net,Edge Network,networking,20,2,SOC 2;PCI DSS,3,99.99,small,enterprise,,\n\
shop-app,Shop App Host,compute,60,15,SOC 2;PCI DSS,3,99.95,small,enterprise,edge-net,payments-gateway\n\
shop-db,Shop Database,database,90,30,PCI DSS,4,99.99,small,enterprise,,\n";
    let catalog =
        ServiceCatalog::from_csv_reader(Cursor::new(csv), "retail-sheet").expect("csv loads");

    let config_path = std::env::temp_dir().join(format!(
        "arch-advisor-config-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &config_path,
        r#"{ "infer_flow_edges": false, "annual_commitment_discount": 0.2 }"#,
    )
    .expect("config written");
    let config = AdvisorConfig::from_path(&config_path).expect("config file loads");
    std::fs::remove_file(&config_path).expect("config removed");

    let advisor = ArchitectureAdvisor::new(Arc::new(catalog), config).expect("config is valid");
    let recommendation = advisor
        .evaluate(&Requirement::new(Industry::Retail, ScaleTier::Medium))
        .expect("evaluation succeeds");

    assert_eq!(recommendation.catalog_version, "retail-sheet");
    assert_eq!(
        selected_ids(&recommendation),
        vec!["edge-net", "shop-app", "shop-db"]
    );
    assert_eq!(recommendation.edges.len(), 2);
    assert!(recommendation.complete);
    assert_eq!(recommendation.cost.total_monthly, 358.0);
    assert_eq!(recommendation.cost.committed_annual, 3436.8);
}

#[test]
fn malformed_config_is_rejected() {
    assert!(AdvisorConfig::from_json_str(r#"{ "weights": { "cost": -1 } }"#).is_err());
    assert!(AdvisorConfig::from_json_str(r#"{ "savings_tolerance": 1.5 }"#).is_err());
    assert!(AdvisorConfig::from_json_str(r#"{ "layering": ["compute", "compute"] }"#).is_err());
}
