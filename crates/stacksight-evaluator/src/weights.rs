//! Named coefficients of the fast evaluator.
//!
//! The order of [`FastEvalWeights::NAMES`] is the order in which the evaluator sums
//! weighted features and in which the lookup key lists the coefficients; changing it
//! changes both scores (in the last bits) and keys.

use serde::{Deserialize, Serialize};

/// One coefficient per board feature.
///
/// Negative coefficients penalize a feature, positive ones reward it. Missing fields
/// take their default when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastEvalWeights {
    pub aggregate_height: f32,
    pub max_height: f32,
    pub bumpiness: f32,
    pub roughness: f32,
    pub holes: f32,
    pub hole_depth: f32,
    pub row_transitions: f32,
    pub column_transitions: f32,
    pub well_depth: f32,
    pub edge_well: f32,
    pub line_clear: f32,
    pub tetris: f32,
    pub burn: f32,
    pub spin_clear: f32,
    pub danger: f32,
    pub top_out: f32,
    pub clear_points: f32,
}

impl Default for FastEvalWeights {
    fn default() -> Self {
        Self {
            aggregate_height: -0.51,
            max_height: -0.2,
            bumpiness: -0.18,
            roughness: -0.05,
            holes: -3.5,
            hole_depth: -0.5,
            row_transitions: -0.3,
            column_transitions: -0.3,
            well_depth: -0.4,
            edge_well: 0.3,
            line_clear: 0.76,
            tetris: 8.0,
            burn: -1.5,
            spin_clear: 1.0,
            danger: -2.0,
            top_out: -10_000.0,
            clear_points: 0.0,
        }
    }
}

impl FastEvalWeights {
    pub const COUNT: usize = 17;

    pub const NAMES: [&'static str; Self::COUNT] = [
        "aggregate_height",
        "max_height",
        "bumpiness",
        "roughness",
        "holes",
        "hole_depth",
        "row_transitions",
        "column_transitions",
        "well_depth",
        "edge_well",
        "line_clear",
        "tetris",
        "burn",
        "spin_clear",
        "danger",
        "top_out",
        "clear_points",
    ];

    /// Returns the coefficients in [`Self::NAMES`] order.
    #[must_use]
    pub fn to_array(&self) -> [f32; Self::COUNT] {
        [
            self.aggregate_height,
            self.max_height,
            self.bumpiness,
            self.roughness,
            self.holes,
            self.hole_depth,
            self.row_transitions,
            self.column_transitions,
            self.well_depth,
            self.edge_well,
            self.line_clear,
            self.tetris,
            self.burn,
            self.spin_clear,
            self.danger,
            self.top_out,
            self.clear_points,
        ]
    }

    /// Inverse of [`Self::to_array`].
    #[must_use]
    pub fn from_array(values: [f32; Self::COUNT]) -> Self {
        let [
            aggregate_height,
            max_height,
            bumpiness,
            roughness,
            holes,
            hole_depth,
            row_transitions,
            column_transitions,
            well_depth,
            edge_well,
            line_clear,
            tetris,
            burn,
            spin_clear,
            danger,
            top_out,
            clear_points,
        ] = values;
        Self {
            aggregate_height,
            max_height,
            bumpiness,
            roughness,
            holes,
            hole_depth,
            row_transitions,
            column_transitions,
            well_depth,
            edge_well,
            line_clear,
            tetris,
            burn,
            spin_clear,
            danger,
            top_out,
            clear_points,
        }
    }

    /// Largest accepted coefficient magnitude.
    ///
    /// Every feature stays below 2^20, so [`Self::COUNT`] terms of at most
    /// `2^20 * MAX_ABS_WEIGHT` each sum to well under `f32::MAX`.
    pub const MAX_ABS_WEIGHT: f32 = 1e30;

    /// Rejects coefficients that are NaN, infinite or larger in magnitude than
    /// [`Self::MAX_ABS_WEIGHT`].
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in Self::NAMES.into_iter().zip(self.to_array()) {
            if !value.is_finite() {
                return Err(WeightsError::NonFinite { name, value });
            }
            if value.abs() > Self::MAX_ABS_WEIGHT {
                return Err(WeightsError::OutOfRange {
                    name,
                    value,
                    max: Self::MAX_ABS_WEIGHT,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum WeightsError {
    #[display("weight `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[display("weight `{name}` must be within ±{max:e}, got {value:e}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        max: f32,
    },
}
