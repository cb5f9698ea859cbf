use super::common::*;

use crate::recommendation::catalog::ServiceRecord;
use crate::recommendation::{
    AdvisorConfig, ArchitecturePattern, Completeness, Recommendation, ScaleTier, ServiceId,
    Warning,
};

fn evaluate(services: Vec<ServiceRecord>) -> Recommendation {
    advisor_with(catalog_of(services), AdvisorConfig::default())
        .evaluate(&requirement(ScaleTier::Medium))
        .expect("evaluation succeeds")
}

fn pattern_warnings(recommendation: &Recommendation) -> Vec<&Warning> {
    recommendation
        .warnings
        .iter()
        .filter(|warning| matches!(warning, Warning::PatternIncomplete { .. }))
        .collect()
}

#[test]
fn kubernetes_selection_reads_as_microservices() {
    let recommendation = evaluate(vec![
        record("azure-kubernetes-service", "containers", 70.0, &[], 4),
        record("azure-service-bus", "integration", 10.0, &[], 3),
    ]);

    assert_eq!(recommendation.patterns.len(), 1);
    let detected = &recommendation.patterns[0];
    assert_eq!(detected.pattern, ArchitecturePattern::Microservices);
    assert_eq!(detected.label, "Microservices Architecture");
    assert_eq!(
        detected.evidence,
        vec![ServiceId::from("azure-kubernetes-service")]
    );
    assert_eq!(detected.missing_recommended, vec!["Azure API Management"]);
    assert_eq!(detected.completeness, Completeness::Partial);
    assert_eq!(
        pattern_warnings(&recommendation),
        vec![&Warning::PatternIncomplete {
            pattern: ArchitecturePattern::Microservices,
            missing: vec!["Azure API Management"],
        }]
    );
}

#[test]
fn display_names_count_as_evidence() {
    let recommendation = evaluate(vec![with_name(
        record("cluster", "containers", 70.0, &[], 4),
        "Managed AKS Cluster",
    )]);

    assert_eq!(recommendation.patterns[0].pattern, ArchitecturePattern::Microservices);
    assert_eq!(
        recommendation.patterns[0].missing_recommended,
        vec!["Azure Service Bus", "Azure API Management"]
    );
}

#[test]
fn serverless_with_its_companions_is_complete() {
    let recommendation = evaluate(vec![
        record("azure-functions", "compute", 15.0, &[], 3),
        record("azure-event-grid", "integration", 5.0, &[], 3),
        with_name(
            record("workflows", "devops", 5.0, &[], 3),
            "Azure Logic Apps",
        ),
    ]);

    assert_eq!(recommendation.patterns.len(), 1);
    assert_eq!(recommendation.patterns[0].pattern, ArchitecturePattern::Serverless);
    assert_eq!(recommendation.patterns[0].completeness, Completeness::Complete);
    assert!(recommendation.patterns[0].missing_recommended.is_empty());
    assert!(pattern_warnings(&recommendation).is_empty());
}

#[test]
fn data_platform_lists_missing_reporting() {
    let recommendation = evaluate(vec![
        with_name(record("etl", "integration", 40.0, &[], 3), "Azure Data Factory"),
        with_name(record("lake", "storage", 20.0, &[], 3), "Azure Data Lake Storage Gen2"),
    ]);

    let detected = &recommendation.patterns[0];
    assert_eq!(detected.pattern, ArchitecturePattern::DataPlatform);
    assert_eq!(detected.evidence, vec![ServiceId::from("etl")]);
    assert_eq!(detected.missing_recommended, vec!["Power BI"]);
    assert_eq!(
        pattern_warnings(&recommendation)[0].summary(),
        "Modern Data Platform usually also needs Power BI"
    );
}

#[test]
fn phrases_match_whole_words_only() {
    let recommendation = evaluate(vec![
        record("functionsapp", "compute", 15.0, &[], 3),
        with_name(record("tasks", "devops", 5.0, &[], 3), "Snowflakes Scheduler"),
    ]);

    assert!(recommendation.patterns.is_empty());
    assert!(pattern_warnings(&recommendation).is_empty());
}
