//! Rule variants that change how an outcome is scored.

use serde::{Deserialize, Serialize};
use stacksight_engine::{BitBoard, RotationSystem};

/// Which line clears the scoring treats as desirable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearRequirement {
    /// Every cleared line earns the line-clear bonus.
    #[default]
    AnyLines,
    /// Only four-line clears are the goal; smaller clears count as burned lines.
    TetrisOnly,
}

impl ClearRequirement {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ClearRequirement::AnyLines => "any_lines",
            ClearRequirement::TetrisOnly => "tetris_only",
        }
    }
}

/// Per-call rule configuration for the search and the evaluator.
///
/// # Example
///
/// ```
/// use stacksight_evaluator::{ClearRequirement, EvaluationContext};
///
/// let context: EvaluationContext =
///     serde_json::from_str(r#"{ "clear_requirement": "tetris_only" }"#).unwrap();
/// assert_eq!(context.clear_requirement, ClearRequirement::TetrisOnly);
/// assert_eq!(context.danger_zone_height, 15);
/// assert!(context.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationContext {
    pub rotation_system: RotationSystem,
    pub clear_requirement: ClearRequirement,
    /// Stack height (in rows from the floor) above which every extra row is penalized.
    pub danger_zone_height: u8,
    /// Whether spin placements that clear lines earn the spin bonus.
    pub reward_spin_clears: bool,
    /// Game level; multiplies the points every line clear is worth.
    pub level: u8,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self {
            rotation_system: RotationSystem::default(),
            clear_requirement: ClearRequirement::default(),
            danger_zone_height: 15,
            reward_spin_clears: true,
            level: 0,
        }
    }
}

impl EvaluationContext {
    pub fn validate(&self) -> Result<(), ContextError> {
        if usize::from(self.danger_zone_height) > BitBoard::PLAYABLE_HEIGHT {
            return Err(ContextError::DangerZoneHeight {
                height: self.danger_zone_height,
                max: BitBoard::PLAYABLE_HEIGHT,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ContextError {
    #[display("danger zone height {height} exceeds the board height {max}")]
    DangerZoneHeight { height: u8, max: usize },
}
