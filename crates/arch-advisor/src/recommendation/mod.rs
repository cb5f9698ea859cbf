//! Cloud architecture recommendation pipeline.
//!
//! Requirements are normalized, run through the compliance filter, scored per
//! category, assembled into a layered topology, reviewed for known patterns and
//! baseline security gaps, and priced. The catalog is immutable once loaded;
//! an [`ArchitectureAdvisor`] can be shared across threads and evaluated
//! concurrently.

pub mod assembly;
pub mod baseline;
mod budget;
pub mod catalog;
pub mod compliance;
pub mod config;
pub mod cost;
pub mod domain;
pub mod outcome;
pub mod patterns;
pub mod requirements;
pub mod router;
pub mod scoring;
pub mod service;
mod vocabulary;

#[cfg(test)]
mod tests;

pub use assembly::{ArchitectureAssembler, Layering, LayeringError};
pub use baseline::{BaselineCheck, BaselineSeverity};
pub use catalog::{CatalogDocument, CatalogError, CatalogSummary, ServiceCatalog};
pub use compliance::{ComplianceFilter, ExclusionReason, FilterOutcome};
pub use config::{AdvisorConfig, AdvisorConfigError};
pub use cost::{CostBreakdown, CostEstimator, CostLine, SavingsOpportunity};
pub use domain::{
    Category, CategoryKind, Certification, CostModel, PerformanceProfile, ScaleRange, ScaleTier,
    ServiceDefinition, ServiceId,
};
pub use outcome::{
    CategorySelection, DependencyEdge, EdgeKind, Exclusion, Recommendation, SelectedService,
    Warning,
};
pub use patterns::{ArchitecturePattern, Completeness, DetectedPattern};
pub use requirements::{
    normalize, BudgetCeiling, BudgetEnforcement, Industry, PerformanceTargets, RawBudget,
    RawRequirements, Requirement, ValidationError,
};
pub use router::recommendation_router;
pub use scoring::{
    CategoryRanking, ScoreComponent, ScoreDimension, ScoreWeights, ScoredCandidate, ScoringEngine,
    WeightTable, WeightsError,
};
pub use service::{ArchitectureAdvisor, EvaluationError};
pub use vocabulary::known_certifications;
