use serde::{Deserialize, Serialize};

/// Weight table as written in configuration. Missing dimensions weigh zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightTable {
    #[serde(default)]
    pub performance: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub scale: f64,
    #[serde(default)]
    pub compliance_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("weight '{dimension}' must be a finite, non-negative number (found {value})")]
    InvalidWeight { dimension: &'static str, value: f64 },
    #[error("weights must sum to a positive total")]
    ZeroTotal,
}

/// Validated dimension weights, normalized to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightTable", into = "WeightTable")]
pub struct ScoreWeights {
    performance: f64,
    cost: f64,
    scale: f64,
    compliance_bonus: f64,
}

impl ScoreWeights {
    pub fn new(table: WeightTable) -> Result<Self, WeightsError> {
        let entries = [
            ("performance", table.performance),
            ("cost", table.cost),
            ("scale", table.scale),
            ("compliance_bonus", table.compliance_bonus),
        ];
        for (dimension, value) in entries {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidWeight { dimension, value });
            }
        }

        let total: f64 = entries.iter().map(|(_, value)| value).sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(WeightsError::ZeroTotal);
        }

        Ok(Self {
            performance: table.performance / total,
            cost: table.cost / total,
            scale: table.scale / total,
            compliance_bonus: table.compliance_bonus / total,
        })
    }

    pub fn performance(&self) -> f64 {
        self.performance
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn compliance_bonus(&self) -> f64 {
        self.compliance_bonus
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            performance: 0.35,
            cost: 0.35,
            scale: 0.2,
            compliance_bonus: 0.1,
        }
    }
}

impl TryFrom<WeightTable> for ScoreWeights {
    type Error = WeightsError;

    fn try_from(table: WeightTable) -> Result<Self, Self::Error> {
        Self::new(table)
    }
}

impl From<ScoreWeights> for WeightTable {
    fn from(weights: ScoreWeights) -> Self {
        Self {
            performance: weights.performance,
            cost: weights.cost,
            scale: weights.scale,
            compliance_bonus: weights.compliance_bonus,
        }
    }
}
