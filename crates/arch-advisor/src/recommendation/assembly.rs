use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cost::CostBreakdown;
use super::domain::{Category, ServiceDefinition, ServiceId};
use super::outcome::{
    CategorySelection, DependencyEdge, EdgeKind, Recommendation, SelectedService, Warning,
};
use super::requirements::Requirement;
use super::scoring::{round_score, CategoryRanking};

const DEFAULT_LAYERING: [Category; 11] = [
    Category::Networking,
    Category::Compute,
    Category::Containers,
    Category::Database,
    Category::Storage,
    Category::Analytics,
    Category::AiMl,
    Category::Integration,
    Category::Security,
    Category::Monitoring,
    Category::DevOps,
];

/// Typical traffic between functional areas, drawn between the leading
/// service of each selected category.
const FLOW_RULES: &[(Category, &[Category])] = &[
    (
        Category::Integration,
        &[Category::Compute, Category::Analytics, Category::AiMl],
    ),
    (
        Category::Compute,
        &[Category::Database, Category::Storage, Category::AiMl],
    ),
    (
        Category::Containers,
        &[Category::Database, Category::Storage, Category::Networking],
    ),
    (Category::Analytics, &[Category::Storage, Category::Database]),
    (Category::AiMl, &[Category::Storage, Category::Analytics]),
    (Category::DevOps, &[Category::Compute, Category::Containers]),
    (Category::Networking, &[Category::Security]),
    (Category::Security, &[Category::Monitoring]),
];

fn flow_rules() -> &'static BTreeMap<Category, &'static [Category]> {
    static RULES: OnceLock<BTreeMap<Category, &'static [Category]>> = OnceLock::new();
    RULES.get_or_init(|| FLOW_RULES.iter().copied().collect())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayeringError {
    #[error("category '{0}' appears more than once in the layering")]
    Duplicate(Category),
}

/// Architectural order categories are presented in. Categories left out of
/// the list follow the listed ones in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct Layering {
    order: Vec<Category>,
}

impl Layering {
    pub fn new(order: Vec<Category>) -> Result<Self, LayeringError> {
        let mut seen = BTreeSet::new();
        for category in &order {
            if !seen.insert(*category) {
                return Err(LayeringError::Duplicate(*category));
            }
        }
        Ok(Self { order })
    }

    pub fn position(&self, category: Category) -> usize {
        self.order
            .iter()
            .position(|listed| *listed == category)
            .unwrap_or_else(|| self.order.len() + category as usize)
    }

    pub fn order(&self) -> &[Category] {
        &self.order
    }
}

impl Default for Layering {
    fn default() -> Self {
        Self {
            order: DEFAULT_LAYERING.to_vec(),
        }
    }
}

impl TryFrom<Vec<Category>> for Layering {
    type Error = LayeringError;

    fn try_from(order: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<Layering> for Vec<Category> {
    fn from(layering: Layering) -> Self {
        layering.order
    }
}

/// Turns per-category rankings into an ordered, dependency-resolved topology.
#[derive(Debug, Clone)]
pub struct ArchitectureAssembler {
    layering: Layering,
    infer_flow_edges: bool,
}

impl ArchitectureAssembler {
    pub fn new(layering: Layering, infer_flow_edges: bool) -> Self {
        Self {
            layering,
            infer_flow_edges,
        }
    }

    /// Build the unpriced recommendation. Gaps become warnings; an unmet
    /// internal dependency also marks the result incomplete.
    pub fn assemble(
        &self,
        catalog_version: &str,
        rankings: &[CategoryRanking<'_>],
        requirement: &Requirement,
    ) -> Recommendation {
        let mut ordered: Vec<&CategoryRanking<'_>> = rankings.iter().collect();
        ordered.sort_by_key(|ranking| self.layering.position(ranking.category));

        let mut warnings = Vec::new();
        let mut categories = Vec::with_capacity(ordered.len());
        for ranking in &ordered {
            if ranking.candidates.is_empty() {
                warnings.push(Warning::CoverageGap {
                    category: ranking.category,
                });
            }

            let services: Vec<SelectedService> = ranking
                .selected()
                .iter()
                .map(|candidate| SelectedService {
                    service: candidate.service.clone(),
                    score: candidate.total,
                    breakdown: candidate.breakdown.clone(),
                    monthly_cost: candidate.monthly_cost,
                })
                .collect();

            for selected in &services {
                debug!(
                    category = %ranking.category,
                    service = %selected.service.id,
                    score = selected.score,
                    "service selected"
                );
                warnings.extend(target_warnings(&selected.service, requirement));
            }

            categories.push(CategorySelection {
                category: ranking.category,
                label: ranking.category.label(),
                kind: ranking.kind,
                services,
            });
        }

        let (mut edges, gaps) = dependency_edges(&categories, requirement);
        let complete = gaps.is_empty();
        warnings.extend(gaps);

        if self.infer_flow_edges {
            flow_edges(&categories, &mut edges);
        }

        let scores: Vec<f64> = categories
            .iter()
            .flat_map(|selection| selection.services.iter().map(|selected| selected.score))
            .collect();
        let overall_score = if scores.is_empty() {
            0.0
        } else {
            round_score(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Recommendation {
            catalog_version: catalog_version.to_string(),
            categories,
            edges,
            patterns: Vec::new(),
            overall_score,
            cost: CostBreakdown::default(),
            warnings,
            excluded: Vec::new(),
            complete,
        }
    }
}

fn target_warnings(service: &ServiceDefinition, requirement: &Requirement) -> Vec<Warning> {
    let targets = requirement.targets;
    let mut warnings = Vec::new();

    if service.performance.tier < targets.tier {
        warnings.push(Warning::PerformanceBelowTarget {
            service: service.id.clone(),
            tier: service.performance.tier,
            target: targets.tier,
        });
    }
    if service.performance.availability < targets.availability {
        warnings.push(Warning::AvailabilityBelowTarget {
            service: service.id.clone(),
            availability: service.performance.availability,
            target: targets.availability,
        });
    }
    if !service.scale.covers(requirement.scale) {
        warnings.push(Warning::ScaleUnsupported {
            service: service.id.clone(),
            supported: (service.scale.min, service.scale.max),
            requested: requirement.scale,
        });
    }

    warnings
}

fn dependency_edges(
    categories: &[CategorySelection],
    requirement: &Requirement,
) -> (Vec<DependencyEdge>, Vec<Warning>) {
    let selected: HashSet<&ServiceId> = categories
        .iter()
        .flat_map(|selection| selection.services.iter())
        .map(|selected| &selected.service.id)
        .collect();

    let mut edges = Vec::new();
    let mut gaps = Vec::new();

    for selected_service in categories.iter().flat_map(|selection| selection.services.iter()) {
        let service = &selected_service.service;
        for (dependency, externally_satisfiable) in service.all_dependencies() {
            let kind = if selected.contains(dependency) {
                EdgeKind::Requires
            } else if externally_satisfiable || requirement.is_externally_provided(dependency) {
                EdgeKind::External
            } else {
                warn!(service = %service.id, dependency = %dependency, "unresolved dependency");
                gaps.push(Warning::DependencyGap {
                    service: service.id.clone(),
                    dependency: dependency.clone(),
                });
                continue;
            };

            edges.push(DependencyEdge {
                from: service.id.clone(),
                to: dependency.clone(),
                kind,
            });
        }
    }

    (edges, gaps)
}

fn flow_edges(categories: &[CategorySelection], edges: &mut Vec<DependencyEdge>) {
    let leaders: BTreeMap<Category, &ServiceId> = categories
        .iter()
        .filter_map(|selection| {
            selection
                .services
                .first()
                .map(|selected| (selection.category, &selected.service.id))
        })
        .collect();

    let mut connected: HashSet<(ServiceId, ServiceId)> = edges
        .iter()
        .map(|edge| (edge.from.clone(), edge.to.clone()))
        .collect();

    for (source, targets) in flow_rules() {
        let Some(from) = leaders.get(source) else {
            continue;
        };
        for target in targets.iter() {
            let Some(to) = leaders.get(target) else {
                continue;
            };
            if connected.insert(((*from).clone(), (*to).clone())) {
                edges.push(DependencyEdge {
                    from: (*from).clone(),
                    to: (*to).clone(),
                    kind: EdgeKind::Flow,
                });
            }
        }
    }
}
