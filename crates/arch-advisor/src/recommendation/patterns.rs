//! Recognizes well-known architecture patterns among the selected services and
//! lists the companion services each pattern usually relies on.

use std::sync::OnceLock;

use serde::Serialize;

use super::domain::ServiceId;
use super::outcome::{CategorySelection, Warning};
use super::vocabulary::word_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitecturePattern {
    Microservices,
    Serverless,
    DataPlatform,
}

impl ArchitecturePattern {
    pub const fn label(self) -> &'static str {
        match self {
            ArchitecturePattern::Microservices => "Microservices Architecture",
            ArchitecturePattern::Serverless => "Serverless Architecture",
            ArchitecturePattern::DataPlatform => "Modern Data Platform",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ArchitecturePattern::Microservices => {
                "Container-based microservices with Kubernetes orchestration"
            }
            ArchitecturePattern::Serverless => "Event-driven serverless computing",
            ArchitecturePattern::DataPlatform => {
                "Data integration, warehousing and reporting on one platform"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    Complete,
    Partial,
}

impl Completeness {
    pub const fn label(self) -> &'static str {
        match self {
            Completeness::Complete => "complete",
            Completeness::Partial => "partial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedPattern {
    pub pattern: ArchitecturePattern,
    pub label: &'static str,
    pub description: &'static str,
    /// Selected services that gave the pattern away.
    pub evidence: Vec<ServiceId>,
    pub missing_recommended: Vec<&'static str>,
    pub completeness: Completeness,
}

struct PatternRule {
    pattern: ArchitecturePattern,
    /// Phrases whose appearance in a selected service's name or id signals the pattern.
    triggers: &'static [&'static str],
    /// `(display name, phrase)` of the companions the pattern usually needs.
    recommended: &'static [(&'static str, &'static str)],
}

const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        pattern: ArchitecturePattern::Microservices,
        triggers: &["kubernetes", "aks"],
        recommended: &[
            ("Azure Service Bus", "service bus"),
            ("Azure API Management", "api management"),
        ],
    },
    PatternRule {
        pattern: ArchitecturePattern::Serverless,
        triggers: &["functions"],
        recommended: &[
            ("Azure Event Grid", "event grid"),
            ("Azure Logic Apps", "logic apps"),
        ],
    },
    PatternRule {
        pattern: ArchitecturePattern::DataPlatform,
        triggers: &["synapse", "data factory"],
        recommended: &[
            ("Azure Data Lake Storage", "data lake"),
            ("Power BI", "power bi"),
        ],
    },
];

struct CompiledRule {
    pattern: ArchitecturePattern,
    triggers: Vec<String>,
    recommended: Vec<(&'static str, String)>,
}

fn pattern_rules() -> &'static [CompiledRule] {
    static RULES: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        PATTERN_RULES
            .iter()
            .map(|rule| CompiledRule {
                pattern: rule.pattern,
                triggers: rule.triggers.iter().map(|phrase| word_key(phrase)).collect(),
                recommended: rule
                    .recommended
                    .iter()
                    .map(|(name, phrase)| (*name, word_key(phrase)))
                    .collect(),
            })
            .collect()
    })
}

/// Patterns present in the selection, in rule order, with one warning per
/// pattern that lacks recommended companions.
pub(crate) fn detect_patterns(
    categories: &[CategorySelection],
) -> (Vec<DetectedPattern>, Vec<Warning>) {
    let selected: Vec<(&ServiceId, String)> = categories
        .iter()
        .flat_map(|selection| selection.services.iter())
        .map(|selected| {
            let key = format!(
                "{}{}",
                word_key(&selected.service.name),
                word_key(selected.service.id.as_str())
            );
            (&selected.service.id, key)
        })
        .collect();
    let mentioned = |phrase: &str| selected.iter().any(|(_, key)| key.contains(phrase));

    let mut patterns = Vec::new();
    let mut warnings = Vec::new();

    for rule in pattern_rules() {
        let evidence: Vec<ServiceId> = selected
            .iter()
            .filter(|(_, key)| rule.triggers.iter().any(|phrase| key.contains(phrase.as_str())))
            .map(|(id, _)| (*id).clone())
            .collect();
        if evidence.is_empty() {
            continue;
        }

        let missing: Vec<&'static str> = rule
            .recommended
            .iter()
            .filter(|(_, phrase)| !mentioned(phrase.as_str()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            warnings.push(Warning::PatternIncomplete {
                pattern: rule.pattern,
                missing: missing.clone(),
            });
        }

        patterns.push(DetectedPattern {
            pattern: rule.pattern,
            label: rule.pattern.label(),
            description: rule.pattern.description(),
            evidence,
            completeness: if missing.is_empty() {
                Completeness::Complete
            } else {
                Completeness::Partial
            },
            missing_recommended: missing,
        });
    }

    (patterns, warnings)
}
