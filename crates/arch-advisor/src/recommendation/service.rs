use std::sync::Arc;

use tracing::{debug, info, warn};

use super::assembly::ArchitectureAssembler;
use super::baseline::baseline_warnings;
use super::budget::fit_to_ceiling;
use super::catalog::ServiceCatalog;
use super::compliance::ComplianceFilter;
use super::config::{AdvisorConfig, AdvisorConfigError};
use super::cost::CostEstimator;
use super::outcome::{Exclusion, Recommendation, Warning};
use super::patterns::detect_patterns;
use super::requirements::{normalize, RawRequirements, Requirement, ValidationError};
use super::scoring::ScoringEngine;

/// Facade running filter, scoring, assembly and pricing against a shared
/// read-only catalog. Evaluations hold no state and may run concurrently.
#[derive(Debug, Clone)]
pub struct ArchitectureAdvisor {
    catalog: Arc<ServiceCatalog>,
    filter: ComplianceFilter,
    engine: ScoringEngine,
    assembler: ArchitectureAssembler,
    estimator: CostEstimator,
}

impl ArchitectureAdvisor {
    /// Fails when the config holds values the pipeline cannot work with.
    pub fn new(
        catalog: Arc<ServiceCatalog>,
        config: AdvisorConfig,
    ) -> Result<Self, AdvisorConfigError> {
        Ok(Self {
            catalog,
            filter: ComplianceFilter,
            engine: ScoringEngine::new(config.weights, config.cost_reference)?,
            assembler: ArchitectureAssembler::new(config.layering, config.infer_flow_edges),
            estimator: CostEstimator::new(
                config.savings_tolerance,
                config.reserved_capacity_threshold,
                config.annual_commitment_discount,
            )?,
        })
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Normalize raw input, then evaluate it.
    pub fn recommend(&self, raw: RawRequirements) -> Result<Recommendation, EvaluationError> {
        let requirement = normalize(raw)?;
        self.evaluate(&requirement)
    }

    /// Run the full pipeline for one requirement. Coverage and dependency gaps
    /// and soft budget overruns are reported as warnings. A hard budget ceiling
    /// first trades picks for cheaper eligible candidates and fails only when
    /// the cheapest attainable selection still exceeds it.
    pub fn evaluate(&self, requirement: &Requirement) -> Result<Recommendation, EvaluationError> {
        let outcome = self.filter.filter(&self.catalog, requirement);
        if !outcome.coverage_gaps.is_empty() {
            debug!(gaps = ?outcome.coverage_gaps, "categories without eligible services");
        }
        let mut rankings = self
            .engine
            .score(&self.catalog, &outcome.eligible, requirement);

        let reselections = match requirement.budget {
            Some(budget) if budget.is_hard() => fit_to_ceiling(&mut rankings, budget.monthly),
            _ => Vec::new(),
        };
        if !reselections.is_empty() {
            info!(
                changes = reselections.len(),
                ceiling = requirement.budget.map(|budget| budget.monthly),
                "selection adjusted to the hard budget"
            );
        }

        let mut recommendation = self
            .assembler
            .assemble(self.catalog.version(), &rankings, requirement);
        recommendation.warnings.extend(reselections);

        let (patterns, pattern_warnings) = detect_patterns(&recommendation.categories);
        recommendation.patterns = patterns;
        recommendation.warnings.extend(pattern_warnings);
        recommendation
            .warnings
            .extend(baseline_warnings(&recommendation.categories));

        recommendation.cost = self.estimator.estimate(&recommendation, &rankings, requirement);

        recommendation.excluded = outcome
            .excluded
            .into_iter()
            .filter_map(|(id, reason)| {
                self.catalog.get(&id).map(|service| Exclusion {
                    service: id,
                    category: service.category,
                    reason,
                })
            })
            .collect();

        if let Some(budget) = requirement.budget {
            let estimated = recommendation.cost.total_monthly;
            if estimated > budget.monthly {
                if budget.is_hard() {
                    warn!(
                        ceiling = budget.monthly,
                        estimated, "hard budget ceiling cannot be met"
                    );
                    return Err(EvaluationError::BudgetExceeded {
                        ceiling: budget.monthly,
                        estimated,
                    });
                }
                recommendation.warnings.push(Warning::BudgetExceeded {
                    ceiling: budget.monthly,
                    estimated,
                });
            }
        }

        info!(
            catalog = %recommendation.catalog_version,
            industry = %requirement.industry,
            scale = %requirement.scale,
            services = recommendation.selected_services().count(),
            patterns = recommendation.patterns.len(),
            warnings = recommendation.warnings.len(),
            complete = recommendation.complete,
            "recommendation assembled"
        );

        Ok(recommendation)
    }
}

/// Failure that leaves an evaluation without a recommendation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("estimated monthly cost {estimated:.2} exceeds hard budget ceiling {ceiling:.2}")]
    BudgetExceeded { ceiling: f64, estimated: f64 },
}

impl EvaluationError {
    /// Request field the failure is attributed to.
    pub fn field(&self) -> &'static str {
        match self {
            EvaluationError::Validation(error) => error.field(),
            EvaluationError::BudgetExceeded { .. } => "budget.monthly_ceiling",
        }
    }
}
