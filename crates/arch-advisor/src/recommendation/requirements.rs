use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::domain::{
    Certification, ScaleTier, ServiceId, MAX_PERFORMANCE_TIER, MIN_PERFORMANCE_TIER,
};
use super::vocabulary;

const DEFAULT_PERFORMANCE_TIER: u8 = 3;
const DEFAULT_AVAILABILITY: f64 = 99.9;

/// Certifications every service must hold for a given industry.
const INDUSTRY_OBLIGATIONS: &[(Industry, &[&str])] = &[
    (Industry::Healthcare, &["HIPAA"]),
    (Industry::Financial, &["PCI DSS", "SOC 2"]),
    (Industry::Government, &["FedRAMP"]),
    (Industry::Retail, &["PCI DSS"]),
    (Industry::Manufacturing, &["ISO 27001"]),
    (Industry::Technology, &["SOC 2"]),
    (Industry::Startup, &[]),
    (Industry::General, &[]),
];

/// Latency ceilings (milliseconds) mapped to the performance tier they demand.
const LATENCY_TIERS: &[(u32, u8)] = &[(10, 5), (50, 4), (200, 3), (1_000, 2)];

/// Input rejected during normalization; always names the offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: unknown value '{value}'")]
    UnknownValue { field: &'static str, value: String },
    #[error("{field}: {detail}")]
    InvalidValue { field: &'static str, detail: String },
    #[error("{0}: value is required")]
    MissingField(&'static str),
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UnknownValue { field, .. }
            | ValidationError::InvalidValue { field, .. }
            | ValidationError::MissingField(field) => field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Healthcare,
    Financial,
    Government,
    Retail,
    Manufacturing,
    Technology,
    Startup,
    General,
}

impl Industry {
    pub const ALL: [Industry; 8] = [
        Industry::Healthcare,
        Industry::Financial,
        Industry::Government,
        Industry::Retail,
        Industry::Manufacturing,
        Industry::Technology,
        Industry::Startup,
        Industry::General,
    ];

    pub fn parse_label(raw: &str) -> Option<Self> {
        match vocabulary::label_key(raw).as_str() {
            "healthcare" | "healthcarelifesciences" => Some(Industry::Healthcare),
            "financial" | "finance" | "financialservices" => Some(Industry::Financial),
            "government" | "publicsector" | "governmentpublicsector" => {
                Some(Industry::Government)
            }
            "retail" | "ecommerce" | "retailecommerce" => Some(Industry::Retail),
            "manufacturing" | "industrial" | "manufacturingindustrial" => {
                Some(Industry::Manufacturing)
            }
            "technology" | "tech" | "software" | "technologysoftware" => {
                Some(Industry::Technology)
            }
            "startup" | "smallbusiness" | "startupsmallbusiness" => Some(Industry::Startup),
            "general" | "other" => Some(Industry::General),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Industry::Healthcare => "healthcare",
            Industry::Financial => "financial",
            Industry::Government => "government",
            Industry::Retail => "retail",
            Industry::Manufacturing => "manufacturing",
            Industry::Technology => "technology",
            Industry::Startup => "startup",
            Industry::General => "general",
        }
    }

    /// Certifications this industry makes mandatory.
    pub fn mandatory_certifications(self) -> &'static BTreeSet<Certification> {
        static EMPTY: BTreeSet<Certification> = BTreeSet::new();
        industry_table().get(&self).unwrap_or(&EMPTY)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn industry_table() -> &'static BTreeMap<Industry, BTreeSet<Certification>> {
    static TABLE: OnceLock<BTreeMap<Industry, BTreeSet<Certification>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        INDUSTRY_OBLIGATIONS
            .iter()
            .map(|(industry, names)| {
                let certifications = names
                    .iter()
                    .filter_map(|name| Certification::parse(name))
                    .collect();
                (*industry, certifications)
            })
            .collect()
    })
}

/// Raw requirement input as captured by a form or API request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRequirements {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub compliance: Vec<String>,
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub expected_users: Option<u64>,
    #[serde(default)]
    pub budget: Option<RawBudget>,
    #[serde(default)]
    pub performance_tier: Option<u8>,
    #[serde(default)]
    pub latency_ms: Option<u32>,
    #[serde(default)]
    pub availability: Option<f64>,
    #[serde(default)]
    pub externally_provided: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBudget {
    pub monthly_ceiling: f64,
    #[serde(default)]
    pub hard: bool,
}

/// Whether exceeding the ceiling aborts the evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetEnforcement {
    #[default]
    Soft,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetCeiling {
    pub monthly: f64,
    pub enforcement: BudgetEnforcement,
}

impl BudgetCeiling {
    pub fn is_hard(&self) -> bool {
        self.enforcement == BudgetEnforcement::Hard
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTargets {
    pub tier: u8,
    pub availability: f64,
}

impl Default for PerformanceTargets {
    fn default() -> Self {
        Self {
            tier: DEFAULT_PERFORMANCE_TIER,
            availability: DEFAULT_AVAILABILITY,
        }
    }
}

/// Normalized constraints for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    pub industry: Industry,
    pub compliance: BTreeSet<Certification>,
    pub scale: ScaleTier,
    pub budget: Option<BudgetCeiling>,
    pub targets: PerformanceTargets,
    pub externally_provided: BTreeSet<ServiceId>,
}

impl Requirement {
    /// Requirement with industry obligations only and default targets.
    pub fn new(industry: Industry, scale: ScaleTier) -> Self {
        Self {
            industry,
            compliance: industry.mandatory_certifications().clone(),
            scale,
            budget: None,
            targets: PerformanceTargets::default(),
            externally_provided: BTreeSet::new(),
        }
    }

    pub fn is_externally_provided(&self, service: &ServiceId) -> bool {
        self.externally_provided.contains(service)
    }
}

/// Map raw input onto canonical values. Explicit compliance selections are
/// unioned with the industry's obligations; they can add but never remove.
pub fn normalize(raw: RawRequirements) -> Result<Requirement, ValidationError> {
    let industry = match raw.industry.as_deref() {
        None => Industry::General,
        Some(value) => Industry::parse_label(value).ok_or_else(|| {
            ValidationError::UnknownValue {
                field: "industry",
                value: value.to_string(),
            }
        })?,
    };

    let mut compliance = industry.mandatory_certifications().clone();
    for tag in &raw.compliance {
        let certification =
            Certification::parse(tag).ok_or_else(|| ValidationError::UnknownValue {
                field: "compliance",
                value: tag.clone(),
            })?;
        compliance.insert(certification);
    }

    let scale = match (raw.scale.as_deref(), raw.expected_users) {
        (Some(value), _) => {
            ScaleTier::parse_label(value).ok_or_else(|| ValidationError::UnknownValue {
                field: "scale",
                value: value.to_string(),
            })?
        }
        (None, Some(users)) => ScaleTier::from_expected_users(users),
        (None, None) => return Err(ValidationError::MissingField("scale")),
    };

    let budget = raw.budget.map(normalize_budget).transpose()?;
    let targets = normalize_targets(&raw)?;

    let mut externally_provided = BTreeSet::new();
    for id in &raw.externally_provided {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "externally_provided",
                detail: "service identifiers must not be empty".to_string(),
            });
        }
        externally_provided.insert(ServiceId(trimmed.to_string()));
    }

    Ok(Requirement {
        industry,
        compliance,
        scale,
        budget,
        targets,
        externally_provided,
    })
}

fn normalize_budget(raw: RawBudget) -> Result<BudgetCeiling, ValidationError> {
    if !raw.monthly_ceiling.is_finite() || raw.monthly_ceiling < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "budget.monthly_ceiling",
            detail: format!(
                "must be a non-negative amount, found {}",
                raw.monthly_ceiling
            ),
        });
    }

    Ok(BudgetCeiling {
        monthly: raw.monthly_ceiling,
        enforcement: if raw.hard {
            BudgetEnforcement::Hard
        } else {
            BudgetEnforcement::Soft
        },
    })
}

fn normalize_targets(raw: &RawRequirements) -> Result<PerformanceTargets, ValidationError> {
    let tier = match (raw.performance_tier, raw.latency_ms) {
        (Some(tier), _) => {
            if !(MIN_PERFORMANCE_TIER..=MAX_PERFORMANCE_TIER).contains(&tier) {
                return Err(ValidationError::InvalidValue {
                    field: "performance_tier",
                    detail: format!(
                        "{tier} outside {MIN_PERFORMANCE_TIER}-{MAX_PERFORMANCE_TIER}"
                    ),
                });
            }
            tier
        }
        (None, Some(latency)) => tier_for_latency(latency),
        (None, None) => DEFAULT_PERFORMANCE_TIER,
    };

    let availability = raw.availability.unwrap_or(DEFAULT_AVAILABILITY);
    if !availability.is_finite() || availability <= 0.0 || availability > 100.0 {
        return Err(ValidationError::InvalidValue {
            field: "availability",
            detail: format!("{availability} outside (0, 100]"),
        });
    }

    Ok(PerformanceTargets { tier, availability })
}

fn tier_for_latency(latency_ms: u32) -> u8 {
    LATENCY_TIERS
        .iter()
        .find(|(ceiling, _)| latency_ms <= *ceiling)
        .map(|(_, tier)| *tier)
        .unwrap_or(MIN_PERFORMANCE_TIER)
}
