//! Security baseline every architecture is checked against, whatever its
//! industry obligations.

use std::sync::OnceLock;

use serde::Serialize;

use super::domain::Category;
use super::outcome::{CategorySelection, Warning};
use super::vocabulary::word_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineCheck {
    SecretsManagement,
    IdentityManagement,
    Monitoring,
    NetworkProtection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSeverity {
    Critical,
    Advisory,
}

impl BaselineSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            BaselineSeverity::Critical => "critical",
            BaselineSeverity::Advisory => "advisory",
        }
    }
}

impl BaselineCheck {
    pub const fn severity(self) -> BaselineSeverity {
        match self {
            BaselineCheck::SecretsManagement | BaselineCheck::IdentityManagement => {
                BaselineSeverity::Critical
            }
            BaselineCheck::Monitoring | BaselineCheck::NetworkProtection => {
                BaselineSeverity::Advisory
            }
        }
    }

    pub const fn finding(self) -> &'static str {
        match self {
            BaselineCheck::SecretsManagement => "no secrets management service",
            BaselineCheck::IdentityManagement => "no identity and access management service",
            BaselineCheck::Monitoring => "no monitoring service",
            BaselineCheck::NetworkProtection => "compute runs without network protection",
        }
    }

    pub const fn remedy(self) -> &'static str {
        match self {
            BaselineCheck::SecretsManagement => {
                "add Azure Key Vault for secrets, keys and certificates"
            }
            BaselineCheck::IdentityManagement => "add Microsoft Entra ID for identity",
            BaselineCheck::Monitoring => "add Azure Monitor for observability",
            BaselineCheck::NetworkProtection => {
                "add Azure Firewall or network security groups"
            }
        }
    }
}

/// What satisfies a check.
enum Evidence {
    /// A selected service whose name or id contains one of the phrases.
    Mentions(&'static [&'static str]),
    /// Any selected service in the category.
    Category(Category),
}

struct BaselineRule {
    check: BaselineCheck,
    /// Categories whose selection makes the check apply; empty applies always.
    applies_with: &'static [Category],
    satisfied_by: Evidence,
}

const BASELINE_RULES: &[BaselineRule] = &[
    BaselineRule {
        check: BaselineCheck::SecretsManagement,
        applies_with: &[],
        satisfied_by: Evidence::Mentions(&["key vault"]),
    },
    BaselineRule {
        check: BaselineCheck::IdentityManagement,
        applies_with: &[],
        satisfied_by: Evidence::Mentions(&["active directory", "entra"]),
    },
    BaselineRule {
        check: BaselineCheck::Monitoring,
        applies_with: &[],
        satisfied_by: Evidence::Category(Category::Monitoring),
    },
    BaselineRule {
        check: BaselineCheck::NetworkProtection,
        applies_with: &[Category::Compute, Category::Containers],
        satisfied_by: Evidence::Mentions(&["firewall", "network security"]),
    },
];

/// Phrase keys per rule, in rule order.
fn rule_phrases() -> &'static [Vec<String>] {
    static PHRASES: OnceLock<Vec<Vec<String>>> = OnceLock::new();
    PHRASES.get_or_init(|| {
        BASELINE_RULES
            .iter()
            .map(|rule| match rule.satisfied_by {
                Evidence::Mentions(phrases) => {
                    phrases.iter().map(|phrase| word_key(phrase)).collect()
                }
                Evidence::Category(_) => Vec::new(),
            })
            .collect()
    })
}

/// One warning per failed check, in rule order. An empty selection is not checked.
pub(crate) fn baseline_warnings(categories: &[CategorySelection]) -> Vec<Warning> {
    let populated: Vec<Category> = categories
        .iter()
        .filter(|selection| !selection.services.is_empty())
        .map(|selection| selection.category)
        .collect();
    if populated.is_empty() {
        return Vec::new();
    }

    let keys: Vec<String> = categories
        .iter()
        .flat_map(|selection| selection.services.iter())
        .map(|selected| {
            format!(
                "{}{}",
                word_key(&selected.service.name),
                word_key(selected.service.id.as_str())
            )
        })
        .collect();

    BASELINE_RULES
        .iter()
        .zip(rule_phrases())
        .filter(|(rule, _)| {
            rule.applies_with.is_empty()
                || rule
                    .applies_with
                    .iter()
                    .any(|category| populated.contains(category))
        })
        .filter(|(rule, phrases)| {
            let satisfied = match rule.satisfied_by {
                Evidence::Mentions(_) => keys
                    .iter()
                    .any(|key| phrases.iter().any(|phrase| key.contains(phrase.as_str()))),
                Evidence::Category(category) => populated.contains(&category),
            };
            !satisfied
        })
        .map(|(rule, _)| Warning::SecurityBaseline {
            check: rule.check,
            severity: rule.check.severity(),
        })
        .collect()
}
