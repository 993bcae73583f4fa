use serde::{Deserialize, Serialize};

use crate::{FsmError, Result};

/// Per-guard tuning, authored alongside the state graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardStats {
    /// Vision cone half-angle, in degrees.
    pub max_vision_angle: f32,
    pub catch_distance: f32,
    /// How far from a source point navigation samples may land.
    pub sample_radius: f32,
    pub search_radius: f32,
    /// Seconds spent searching after losing sight of the target.
    pub search_time_limit: f32,
}

impl Default for GuardStats {
    fn default() -> Self {
        Self {
            max_vision_angle: 60.0,
            catch_distance: 2.0,
            sample_radius: 5.0,
            search_radius: 5.0,
            search_time_limit: 20.0,
        }
    }
}

impl GuardStats {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("max_vision_angle", self.max_vision_angle),
            ("catch_distance", self.catch_distance),
            ("sample_radius", self.sample_radius),
            ("search_radius", self.search_radius),
            ("search_time_limit", self.search_time_limit),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FsmError::InvalidStats(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        if self.max_vision_angle > 180.0 {
            return Err(FsmError::InvalidStats(format!(
                "max_vision_angle must be at most 180 degrees (got {})",
                self.max_vision_angle
            )));
        }
        Ok(())
    }
}
