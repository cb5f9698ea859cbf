use super::super::domain::{ServiceDefinition, MAX_PERFORMANCE_TIER, MIN_PERFORMANCE_TIER};
use super::super::requirements::Requirement;
use super::config::ScoreWeights;
use super::{ScoreComponent, ScoreDimension};

const SCALE_DISTANCE_PENALTY: f64 = 0.4;
const COMPLIANCE_BONUS_SATURATION: f64 = 4.0;

pub(crate) struct ScoringInputs<'a> {
    pub weights: &'a ScoreWeights,
    pub cost_reference: f64,
}

/// Score one eligible service. Returns the per-dimension components, the
/// weighted total on a 0-100 scale and the projected monthly cost.
pub(crate) fn score_service(
    service: &ServiceDefinition,
    requirement: &Requirement,
    inputs: &ScoringInputs<'_>,
) -> (Vec<ScoreComponent>, f64, f64) {
    let monthly_cost = service.projected_monthly_cost(requirement.scale);

    let components = vec![
        performance_fit(service, requirement, inputs.weights.performance()),
        cost_fit(monthly_cost, requirement, inputs),
        scale_fit(service, requirement, inputs.weights.scale()),
        compliance_bonus(service, requirement, inputs.weights.compliance_bonus()),
    ];

    let weighted: f64 = components
        .iter()
        .map(|component| component.weight * component.fit)
        .sum();

    (components, round_score(100.0 * weighted), monthly_cost)
}

fn performance_fit(
    service: &ServiceDefinition,
    requirement: &Requirement,
    weight: f64,
) -> ScoreComponent {
    let target = requirement.targets;
    let span = f64::from(MAX_PERFORMANCE_TIER - MIN_PERFORMANCE_TIER);
    let gap = service.performance.tier.abs_diff(target.tier);
    let mut fit = 1.0 - f64::from(gap) / span;
    let mut notes = format!("tier {} against target {}", service.performance.tier, target.tier);

    if service.performance.availability < target.availability {
        fit /= 2.0;
        notes.push_str(&format!(
            "; availability {}% below {}%",
            service.performance.availability, target.availability
        ));
    }

    ScoreComponent {
        dimension: ScoreDimension::Performance,
        fit: fit.clamp(0.0, 1.0),
        weight,
        notes,
    }
}

fn cost_fit(monthly_cost: f64, requirement: &Requirement, inputs: &ScoringInputs<'_>) -> ScoreComponent {
    let weight = inputs.weights.cost();

    if let Some(budget) = requirement.budget {
        if monthly_cost > budget.monthly {
            return ScoreComponent {
                dimension: ScoreDimension::Cost,
                fit: 0.0,
                weight,
                notes: format!(
                    "minimum monthly cost {monthly_cost:.2} exceeds ceiling {:.2}",
                    budget.monthly
                ),
            };
        }
    }

    ScoreComponent {
        dimension: ScoreDimension::Cost,
        fit: 1.0 / (1.0 + monthly_cost / inputs.cost_reference),
        weight,
        notes: format!("projected {monthly_cost:.2}/month at {} scale", requirement.scale),
    }
}

fn scale_fit(service: &ServiceDefinition, requirement: &Requirement, weight: f64) -> ScoreComponent {
    let distance = service.scale.distance_to(requirement.scale);
    let (fit, notes) = if distance == 0 {
        (1.0, format!("supports {} scale", requirement.scale))
    } else {
        (
            (1.0 - SCALE_DISTANCE_PENALTY * f64::from(distance)).max(0.0),
            format!(
                "supports {}-{}, requirement is {}",
                service.scale.min, service.scale.max, requirement.scale
            ),
        )
    };

    ScoreComponent {
        dimension: ScoreDimension::Scale,
        fit,
        weight,
        notes,
    }
}

fn compliance_bonus(
    service: &ServiceDefinition,
    requirement: &Requirement,
    weight: f64,
) -> ScoreComponent {
    let extra = service
        .certifications
        .difference(&requirement.compliance)
        .count();

    ScoreComponent {
        dimension: ScoreDimension::ComplianceBonus,
        fit: (extra as f64 / COMPLIANCE_BONUS_SATURATION).min(1.0),
        weight,
        notes: format!("{extra} certification(s) beyond the mandatory set"),
    }
}

pub(crate) fn round_score(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
