use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::assembly::Layering;
use super::scoring::ScoreWeights;

/// Tuning for scoring, cost estimation and assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    pub weights: ScoreWeights,
    /// Monthly cost at which the cost fit drops to one half.
    pub cost_reference: f64,
    /// Relative score gap (0-1) within which a cheaper alternative is flagged.
    pub savings_tolerance: f64,
    pub reserved_capacity_threshold: f64,
    pub annual_commitment_discount: f64,
    pub layering: Layering,
    pub infer_flow_edges: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            cost_reference: 250.0,
            savings_tolerance: 0.05,
            reserved_capacity_threshold: 500.0,
            annual_commitment_discount: 0.15,
            layering: Layering::default(),
            infer_flow_edges: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorConfigError {
    #[error("failed to read advisor config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed advisor config: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{field} {detail}")]
    OutOfRange { field: &'static str, detail: String },
}

impl AdvisorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, AdvisorConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, AdvisorConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AdvisorConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(file)
    }

    /// Reject values the pipeline cannot work with. Invalid weights or
    /// layering already fail deserialization.
    pub fn validate(&self) -> Result<(), AdvisorConfigError> {
        check_cost_reference(self.cost_reference)?;
        check_cost_tuning(
            self.savings_tolerance,
            self.reserved_capacity_threshold,
            self.annual_commitment_discount,
        )
    }
}

pub(crate) fn check_cost_reference(cost_reference: f64) -> Result<(), AdvisorConfigError> {
    if !cost_reference.is_finite() || cost_reference <= 0.0 {
        return Err(AdvisorConfigError::OutOfRange {
            field: "cost_reference",
            detail: format!("must be positive, found {cost_reference}"),
        });
    }
    Ok(())
}

pub(crate) fn check_cost_tuning(
    savings_tolerance: f64,
    reserved_capacity_threshold: f64,
    annual_commitment_discount: f64,
) -> Result<(), AdvisorConfigError> {
    for (field, value) in [
        ("savings_tolerance", savings_tolerance),
        ("annual_commitment_discount", annual_commitment_discount),
    ] {
        if !value.is_finite() || !(0.0..1.0).contains(&value) {
            return Err(AdvisorConfigError::OutOfRange {
                field,
                detail: format!("must be in [0, 1), found {value}"),
            });
        }
    }
    if !reserved_capacity_threshold.is_finite() || reserved_capacity_threshold < 0.0 {
        return Err(AdvisorConfigError::OutOfRange {
            field: "reserved_capacity_threshold",
            detail: format!("must be non-negative, found {reserved_capacity_threshold}"),
        });
    }
    Ok(())
}
