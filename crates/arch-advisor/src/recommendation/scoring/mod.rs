mod config;
mod rules;
mod selection;

pub use config::{ScoreWeights, WeightTable, WeightsError};

pub(crate) use rules::round_score;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::catalog::ServiceCatalog;
use super::config::{check_cost_reference, AdvisorConfigError};
use super::domain::{Category, CategoryKind, ServiceDefinition};
use super::requirements::Requirement;
use rules::{score_service, ScoringInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Performance,
    Cost,
    Scale,
    ComplianceBonus,
}

/// One dimension's contribution, kept so every choice can be audited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub dimension: ScoreDimension,
    /// Suitability in [0, 1].
    pub fit: f64,
    /// Normalized weight applied to `fit`.
    pub weight: f64,
    pub notes: String,
}

/// An eligible service with its score for one requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'c> {
    pub service: &'c ServiceDefinition,
    /// Weighted total on a 0-100 scale.
    pub total: f64,
    pub breakdown: Vec<ScoreComponent>,
    pub monthly_cost: f64,
}

impl ScoredCandidate<'_> {
    pub fn fit(&self, dimension: ScoreDimension) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|component| component.dimension == dimension)
            .map(|component| component.fit)
    }
}

/// Candidates of one category, best first, with the category's selection policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRanking<'c> {
    pub category: Category,
    pub kind: CategoryKind,
    pub candidates: Vec<ScoredCandidate<'c>>,
    /// Indices into `candidates` of the picks, in ranking order.
    picks: Vec<usize>,
}

impl<'c> CategoryRanking<'c> {
    fn new(category: Category, kind: CategoryKind, candidates: Vec<ScoredCandidate<'c>>) -> Self {
        let picks = (0..selection::selection_count(kind, &candidates)).collect();
        Self {
            category,
            kind,
            candidates,
            picks,
        }
    }

    /// Candidates picked for the architecture; empty only for coverage gaps.
    pub fn selected(&self) -> Vec<&ScoredCandidate<'c>> {
        self.picks.iter().map(|&index| &self.candidates[index]).collect()
    }

    /// Ranked candidates left out of the architecture.
    pub fn alternatives(&self) -> Vec<&ScoredCandidate<'c>> {
        self.candidates
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.picks.contains(index))
            .map(|(_, candidate)| candidate)
            .collect()
    }

    pub(crate) fn picks(&self) -> &[usize] {
        &self.picks
    }

    /// Replace the pick in `slot` with another candidate, or drop it.
    pub(crate) fn repick(&mut self, slot: usize, substitute: Option<usize>) {
        match substitute {
            Some(index) => self.picks[slot] = index,
            None => {
                self.picks.remove(slot);
            }
        }
        self.picks.sort_unstable();
    }
}

/// Stateless engine applying the configured weights to eligible services.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: ScoreWeights,
    cost_reference: f64,
}

impl ScoringEngine {
    /// Fails when `cost_reference` is not a positive finite amount.
    pub fn new(weights: ScoreWeights, cost_reference: f64) -> Result<Self, AdvisorConfigError> {
        check_cost_reference(cost_reference)?;
        Ok(Self {
            weights,
            cost_reference,
        })
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Rank eligible services per catalog category. Every category the catalog
    /// declares appears, with an empty ranking when nothing was eligible.
    pub fn score<'c>(
        &self,
        catalog: &ServiceCatalog,
        eligible: &[&'c ServiceDefinition],
        requirement: &Requirement,
    ) -> Vec<CategoryRanking<'c>> {
        let inputs = ScoringInputs {
            weights: &self.weights,
            cost_reference: self.cost_reference,
        };

        let mut by_category: BTreeMap<Category, Vec<ScoredCandidate<'c>>> = catalog
            .categories()
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();

        for service in eligible {
            let (breakdown, total, monthly_cost) = score_service(service, requirement, &inputs);
            debug!(service = %service.id, total, monthly_cost, "scored candidate");
            by_category
                .entry(service.category)
                .or_default()
                .push(ScoredCandidate {
                    service,
                    total,
                    breakdown,
                    monthly_cost,
                });
        }

        by_category
            .into_iter()
            .map(|(category, mut candidates)| {
                candidates.sort_by(selection::rank_order);
                CategoryRanking::new(category, catalog.category_kind(category), candidates)
            })
            .collect()
    }
}
