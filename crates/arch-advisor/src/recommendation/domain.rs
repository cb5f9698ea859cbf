use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::vocabulary;

pub const MIN_PERFORMANCE_TIER: u8 = 1;
pub const MAX_PERFORMANCE_TIER: u8 = 5;

/// Identifier wrapper for catalog services.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Functional area a service covers. At most the category's declared number of
/// services is selected per area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Networking,
    Compute,
    Containers,
    Database,
    Storage,
    Analytics,
    AiMl,
    Integration,
    Security,
    Monitoring,
    #[serde(rename = "devops")]
    DevOps,
}

impl Category {
    pub const ALL: [Category; 11] = [
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

    pub const fn label(self) -> &'static str {
        match self {
            Category::Networking => "Networking",
            Category::Compute => "Compute",
            Category::Containers => "Containers",
            Category::Database => "Databases",
            Category::Storage => "Storage",
            Category::Analytics => "Analytics & BI",
            Category::AiMl => "AI & Machine Learning",
            Category::Integration => "Integration & Messaging",
            Category::Security => "Security & Identity",
            Category::Monitoring => "Monitoring & Management",
            Category::DevOps => "DevOps & Developer Tools",
        }
    }

    /// Parse a category from any accepted spelling ("Security & Identity",
    /// "security", "ai_ml", ...).
    pub fn parse_label(raw: &str) -> Option<Self> {
        vocabulary::lookup_category(raw)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Selection policy declared per category by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CategoryKind {
    #[default]
    SingleSelect,
    /// Composable services: every candidate scoring at least `threshold`
    /// (0-100) is selected, up to `max`.
    MultiSelect { max: u8, threshold: f64 },
}

impl CategoryKind {
    pub fn max_selections(&self) -> usize {
        match self {
            CategoryKind::SingleSelect => 1,
            CategoryKind::MultiSelect { max, .. } => usize::from(*max),
        }
    }
}

/// Ordinal deployment scale of a requirement or a service's supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleTier {
    Small,
    Medium,
    Large,
    Enterprise,
}

impl ScaleTier {
    pub const ALL: [ScaleTier; 4] = [
        ScaleTier::Small,
        ScaleTier::Medium,
        ScaleTier::Large,
        ScaleTier::Enterprise,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ScaleTier::Small => "small",
            ScaleTier::Medium => "medium",
            ScaleTier::Large => "large",
            ScaleTier::Enterprise => "enterprise",
        }
    }

    pub fn parse_label(raw: &str) -> Option<Self> {
        let key = vocabulary::label_key(raw);
        Self::ALL.into_iter().find(|tier| tier.label() == key)
    }

    /// Usage units a cost model's usage component is multiplied by.
    pub const fn usage_units(self) -> f64 {
        match self {
            ScaleTier::Small => 1.0,
            ScaleTier::Medium => 4.0,
            ScaleTier::Large => 12.0,
            ScaleTier::Enterprise => 30.0,
        }
    }

    pub fn from_expected_users(users: u64) -> Self {
        match users {
            0..=999 => ScaleTier::Small,
            1_000..=9_999 => ScaleTier::Medium,
            10_000..=99_999 => ScaleTier::Large,
            _ => ScaleTier::Enterprise,
        }
    }

    fn rank(self) -> u8 {
        self as u8
    }

    pub fn distance(self, other: ScaleTier) -> u8 {
        self.rank().abs_diff(other.rank())
    }
}

impl fmt::Display for ScaleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive range of scale tiers a service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: ScaleTier,
    pub max: ScaleTier,
}

impl ScaleRange {
    pub fn covers(&self, tier: ScaleTier) -> bool {
        self.min <= tier && tier <= self.max
    }

    /// Tiers between `tier` and the nearest end of the range; zero when covered.
    pub fn distance_to(&self, tier: ScaleTier) -> u8 {
        if tier < self.min {
            tier.distance(self.min)
        } else if tier > self.max {
            tier.distance(self.max)
        } else {
            0
        }
    }
}

/// Monthly cost model: a fixed fee plus a usage fee per scale unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub fixed_monthly: f64,
    pub usage_monthly: f64,
}

impl CostModel {
    pub fn monthly_at(&self, tier: ScaleTier) -> f64 {
        self.fixed_monthly + self.usage_monthly * tier.usage_units()
    }
}

/// Throughput/latency tier (1 = basic, 5 = premium) and availability SLA in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub tier: u8,
    pub availability: f64,
}

/// A certification drawn from the known vocabulary. Spelling variants of the
/// same certification compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Certification {
    key: &'static str,
    name: &'static str,
}

impl Certification {
    pub fn parse(raw: &str) -> Option<Self> {
        vocabulary::lookup_certification(raw).map(|(key, name)| Self { key, name })
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for Certification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Validated catalog entry. Only the catalog loader constructs these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDefinition {
    pub id: ServiceId,
    pub name: String,
    pub category: Category,
    pub cost: CostModel,
    pub certifications: BTreeSet<Certification>,
    pub performance: PerformanceProfile,
    pub scale: ScaleRange,
    pub dependencies: Vec<ServiceId>,
    pub external_dependencies: Vec<ServiceId>,
    /// Position in the catalog declaration, used as the final tie-break.
    #[serde(skip)]
    pub ordinal: usize,
}

impl ServiceDefinition {
    /// Minimum viable monthly cost at `tier`: services that only run from a larger
    /// tier are priced at their own minimum.
    pub fn projected_monthly_cost(&self, tier: ScaleTier) -> f64 {
        self.cost.monthly_at(tier.max(self.scale.min))
    }

    pub fn holds_all(&self, obligations: &BTreeSet<Certification>) -> bool {
        obligations.is_subset(&self.certifications)
    }

    pub fn missing_certifications(
        &self,
        obligations: &BTreeSet<Certification>,
    ) -> BTreeSet<Certification> {
        obligations
            .difference(&self.certifications)
            .copied()
            .collect()
    }

    /// Dependencies declared both internal and externally satisfiable.
    pub fn all_dependencies(&self) -> impl Iterator<Item = (&ServiceId, bool)> {
        self.dependencies
            .iter()
            .map(|id| (id, false))
            .chain(self.external_dependencies.iter().map(|id| (id, true)))
    }
}
