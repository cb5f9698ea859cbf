use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use super::catalog::ServiceCatalog;
use super::domain::{Category, Certification, ServiceDefinition, ServiceId};
use super::requirements::Requirement;

/// Why a service never reached scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingCertifications { missing: BTreeSet<Certification> },
    ExceedsBudget { monthly_cost: f64, ceiling: f64 },
}

impl ExclusionReason {
    pub fn summary(&self) -> String {
        match self {
            ExclusionReason::MissingCertifications { missing } => {
                let names: Vec<&str> = missing.iter().map(Certification::name).collect();
                format!("missing mandatory certifications: {}", names.join(", "))
            }
            ExclusionReason::ExceedsBudget {
                monthly_cost,
                ceiling,
            } => format!(
                "minimum monthly cost {monthly_cost:.2} exceeds hard ceiling {ceiling:.2}"
            ),
        }
    }
}

/// Result of the hard filter: what may be scored, what may not, and which
/// catalog categories were emptied.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'c> {
    pub eligible: Vec<&'c ServiceDefinition>,
    pub excluded: BTreeMap<ServiceId, ExclusionReason>,
    pub coverage_gaps: Vec<Category>,
}

/// Stateless guard applying mandatory certifications (and hard budget
/// ceilings) before any service is scored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceFilter;

impl ComplianceFilter {
    pub fn filter<'c>(
        &self,
        catalog: &'c ServiceCatalog,
        requirement: &Requirement,
    ) -> FilterOutcome<'c> {
        let hard_ceiling = requirement
            .budget
            .filter(|budget| budget.is_hard())
            .map(|budget| budget.monthly);

        let mut eligible = Vec::new();
        let mut excluded = BTreeMap::new();

        for service in catalog.services() {
            match exclusion_for(service, requirement, hard_ceiling) {
                Some(reason) => {
                    debug!(
                        service = %service.id,
                        reason = %reason.summary(),
                        "service excluded before scoring"
                    );
                    excluded.insert(service.id.clone(), reason);
                }
                None => eligible.push(service),
            }
        }

        let covered: BTreeSet<Category> = eligible.iter().map(|service| service.category).collect();
        let coverage_gaps = catalog
            .categories()
            .into_iter()
            .filter(|category| !covered.contains(category))
            .collect();

        FilterOutcome {
            eligible,
            excluded,
            coverage_gaps,
        }
    }
}

fn exclusion_for(
    service: &ServiceDefinition,
    requirement: &Requirement,
    hard_ceiling: Option<f64>,
) -> Option<ExclusionReason> {
    if !service.holds_all(&requirement.compliance) {
        return Some(ExclusionReason::MissingCertifications {
            missing: service.missing_certifications(&requirement.compliance),
        });
    }

    let ceiling = hard_ceiling?;
    let monthly_cost = service.projected_monthly_cost(requirement.scale);
    (monthly_cost > ceiling).then_some(ExclusionReason::ExceedsBudget {
        monthly_cost,
        ceiling,
    })
}
