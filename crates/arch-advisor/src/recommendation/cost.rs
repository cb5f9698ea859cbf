use serde::Serialize;
use tracing::info;

use super::config::{check_cost_tuning, AdvisorConfigError};
use super::domain::{Category, ServiceId};
use super::outcome::Recommendation;
use super::requirements::Requirement;
use super::scoring::{round_score, CategoryRanking};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    pub lines: Vec<CostLine>,
    pub category_totals: Vec<CategoryCost>,
    pub total_monthly: f64,
    /// Twelve months at list price.
    pub total_annual: f64,
    /// Twelve months with the annual-commitment discount applied.
    pub committed_annual: f64,
    pub savings: Vec<SavingsOpportunity>,
    /// Services expensive enough that reserved capacity is worth pricing.
    pub reserved_capacity: Vec<ServiceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLine {
    pub service: ServiceId,
    pub name: String,
    pub category: Category,
    pub monthly: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCost {
    pub category: Category,
    pub monthly: f64,
}

/// Cheaper eligible alternative scoring close to a chosen service. Advisory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsOpportunity {
    pub category: Category,
    pub selected: ServiceId,
    pub alternative: ServiceId,
    pub monthly_savings: f64,
    pub score_gap: f64,
}

#[derive(Debug, Clone)]
pub struct CostEstimator {
    savings_tolerance: f64,
    reserved_capacity_threshold: f64,
    annual_commitment_discount: f64,
}

impl CostEstimator {
    /// Fails when a fraction falls outside [0, 1) or the threshold is negative.
    pub fn new(
        savings_tolerance: f64,
        reserved_capacity_threshold: f64,
        annual_commitment_discount: f64,
    ) -> Result<Self, AdvisorConfigError> {
        check_cost_tuning(
            savings_tolerance,
            reserved_capacity_threshold,
            annual_commitment_discount,
        )?;
        Ok(Self {
            savings_tolerance,
            reserved_capacity_threshold,
            annual_commitment_discount,
        })
    }

    /// Price every selected service at the requirement's scale tier.
    pub fn estimate(
        &self,
        recommendation: &Recommendation,
        rankings: &[CategoryRanking<'_>],
        requirement: &Requirement,
    ) -> CostBreakdown {
        let mut lines = Vec::new();
        let mut category_totals = Vec::new();
        let mut reserved_capacity = Vec::new();

        for selection in &recommendation.categories {
            if selection.services.is_empty() {
                continue;
            }

            let mut category_total = 0.0;
            for selected in &selection.services {
                let monthly =
                    round_cents(selected.service.projected_monthly_cost(requirement.scale));
                if monthly > self.reserved_capacity_threshold {
                    reserved_capacity.push(selected.service.id.clone());
                }
                category_total += monthly;
                lines.push(CostLine {
                    service: selected.service.id.clone(),
                    name: selected.service.name.clone(),
                    category: selection.category,
                    monthly,
                });
            }

            category_totals.push(CategoryCost {
                category: selection.category,
                monthly: round_cents(category_total),
            });
        }

        let total_monthly = round_cents(lines.iter().map(|line| line.monthly).sum());
        let total_annual = round_cents(total_monthly * 12.0);
        let committed_annual = round_cents(total_annual * (1.0 - self.annual_commitment_discount));
        let savings = self.savings_opportunities(rankings);

        info!(
            total_monthly,
            services = lines.len(),
            savings = savings.len(),
            "architecture priced"
        );

        CostBreakdown {
            lines,
            category_totals,
            total_monthly,
            total_annual,
            committed_annual,
            savings,
            reserved_capacity,
        }
    }

    fn savings_opportunities(&self, rankings: &[CategoryRanking<'_>]) -> Vec<SavingsOpportunity> {
        let mut opportunities = Vec::new();

        for ranking in rankings {
            let alternatives = ranking.alternatives();
            for chosen in ranking.selected() {
                let allowed_gap = chosen.total * self.savings_tolerance;
                let cheaper = alternatives.iter().find(|candidate| {
                    candidate.monthly_cost < chosen.monthly_cost
                        && chosen.total - candidate.total <= allowed_gap
                });

                if let Some(alternative) = cheaper {
                    opportunities.push(SavingsOpportunity {
                        category: ranking.category,
                        selected: chosen.service.id.clone(),
                        alternative: alternative.service.id.clone(),
                        monthly_savings: round_cents(
                            chosen.monthly_cost - alternative.monthly_cost,
                        ),
                        score_gap: round_score(chosen.total - alternative.total),
                    });
                }
            }
        }

        opportunities
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
