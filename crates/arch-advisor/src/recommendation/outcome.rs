use serde::Serialize;

use super::baseline::{BaselineCheck, BaselineSeverity};
use super::compliance::ExclusionReason;
use super::cost::CostBreakdown;
use super::domain::{Category, CategoryKind, ScaleTier, ServiceDefinition, ServiceId};
use super::patterns::{ArchitecturePattern, DetectedPattern};
use super::scoring::ScoreComponent;

/// The priced architecture proposal handed to diagram, export and UI layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub catalog_version: String,
    /// Categories in architectural layer order.
    pub categories: Vec<CategorySelection>,
    pub edges: Vec<DependencyEdge>,
    /// Architecture patterns recognized among the selected services.
    pub patterns: Vec<DetectedPattern>,
    /// Mean total of the selected services.
    pub overall_score: f64,
    pub cost: CostBreakdown,
    pub warnings: Vec<Warning>,
    pub excluded: Vec<Exclusion>,
    /// False when a selected service has an unmet dependency.
    pub complete: bool,
}

impl Recommendation {
    pub fn selected_services(&self) -> impl Iterator<Item = &SelectedService> {
        self.categories
            .iter()
            .flat_map(|selection| selection.services.iter())
    }

    pub fn category(&self, category: Category) -> Option<&CategorySelection> {
        self.categories
            .iter()
            .find(|selection| selection.category == category)
    }

    pub fn is_selected(&self, id: &ServiceId) -> bool {
        self.selected_services()
            .any(|selected| selected.service.id == *id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySelection {
    pub category: Category,
    pub label: &'static str,
    pub kind: CategoryKind,
    pub services: Vec<SelectedService>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedService {
    pub service: ServiceDefinition,
    pub score: f64,
    pub breakdown: Vec<ScoreComponent>,
    pub monthly_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Declared dependency satisfied by another selected service.
    Requires,
    /// Dependency assumed to be provided outside the recommendation.
    External,
    /// Data or control flow between the leading services of two categories.
    Flow,
}

impl EdgeKind {
    pub const fn label(self) -> &'static str {
        match self {
            EdgeKind::Requires => "requires",
            EdgeKind::External => "external",
            EdgeKind::Flow => "flow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub from: ServiceId,
    pub to: ServiceId,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub service: ServiceId,
    pub category: Category,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// Non-fatal caveats attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    CoverageGap {
        category: Category,
    },
    DependencyGap {
        service: ServiceId,
        dependency: ServiceId,
    },
    BudgetExceeded {
        ceiling: f64,
        estimated: f64,
    },
    /// A pick traded for a cheaper candidate, or dropped, to meet a hard ceiling.
    BudgetReselection {
        category: Category,
        replaced: ServiceId,
        substitute: Option<ServiceId>,
        monthly_savings: f64,
    },
    PatternIncomplete {
        pattern: ArchitecturePattern,
        missing: Vec<&'static str>,
    },
    SecurityBaseline {
        check: BaselineCheck,
        severity: BaselineSeverity,
    },
    PerformanceBelowTarget {
        service: ServiceId,
        tier: u8,
        target: u8,
    },
    AvailabilityBelowTarget {
        service: ServiceId,
        availability: f64,
        target: f64,
    },
    ScaleUnsupported {
        service: ServiceId,
        supported: (ScaleTier, ScaleTier),
        requested: ScaleTier,
    },
}

impl Warning {
    pub fn summary(&self) -> String {
        match self {
            Warning::CoverageGap { category } => {
                format!("no eligible service left for {}", category.label())
            }
            Warning::DependencyGap {
                service,
                dependency,
            } => format!("{service} requires {dependency}, which is not part of the architecture"),
            Warning::BudgetExceeded { ceiling, estimated } => format!(
                "estimated monthly cost {estimated:.2} exceeds budget ceiling {ceiling:.2}"
            ),
            Warning::BudgetReselection {
                category,
                replaced,
                substitute: Some(substitute),
                monthly_savings,
            } => format!(
                "{substitute} replaces {replaced} in {} to meet the hard budget, saving {monthly_savings:.2}/month",
                category.label()
            ),
            Warning::BudgetReselection {
                category,
                replaced,
                substitute: None,
                monthly_savings,
            } => format!(
                "{replaced} dropped from {} to meet the hard budget, saving {monthly_savings:.2}/month",
                category.label()
            ),
            Warning::PatternIncomplete { pattern, missing } => format!(
                "{} usually also needs {}",
                pattern.label(),
                missing.join(", ")
            ),
            Warning::SecurityBaseline { check, severity } => {
                format!("{}: {}; {}", severity.label(), check.finding(), check.remedy())
            }
            Warning::PerformanceBelowTarget {
                service,
                tier,
                target,
            } => format!("{service} performance tier {tier} is below target {target}"),
            Warning::AvailabilityBelowTarget {
                service,
                availability,
                target,
            } => format!("{service} availability {availability}% is below target {target}%"),
            Warning::ScaleUnsupported {
                service,
                supported,
                requested,
            } => format!(
                "{service} supports {}-{} scale, requirement is {requested}",
                supported.0, supported.1
            ),
        }
    }
}
