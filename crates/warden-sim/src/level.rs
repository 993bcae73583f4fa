//! Level files: grid, patrol route, target script, guards and their behavior machine.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use warden_fsm::{
    GuardStats, MachineConfig, PatrolGraph, PatrolPointConfig, SameStateTransition,
};
use warden_nav::{NavGrid, Vec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub grid: GridConfig,
    pub patrol_points: Vec<PatrolPointConfig>,
    pub target: TargetConfig,
    pub guards: Vec<GuardConfig>,
    /// Behavior shared by every guard; the standard patrol/chase/search graph when absent.
    #[serde(default)]
    pub machine: Option<MachineConfig>,
    #[serde(default)]
    pub exit: Option<ExitConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    pub width: u32,
    pub depth: u32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default)]
    pub floor_y: f32,
    /// Blocked cells as `[x, z]`.
    #[serde(default)]
    pub blocked: Vec<[i32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub position: Vec3,
    #[serde(default = "default_target_speed")]
    pub speed: f32,
    #[serde(default)]
    pub route: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_forward")]
    pub forward: Vec3,
    #[serde(default = "default_guard_speed")]
    pub speed: f32,
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
    #[serde(default)]
    pub stats: GuardStats,
    /// Overrides the machine's initial state for this guard.
    #[serde(default)]
    pub initial_state: Option<String>,
    pub initial_patrol_point: String,
    #[serde(default)]
    pub same_state: SameStateTransition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExitConfig {
    pub position: Vec3,
    #[serde(default = "default_exit_radius")]
    pub radius: f32,
}

impl ExitConfig {
    pub fn contains(&self, point: Vec3) -> bool {
        self.position
            .with_y(0.0)
            .distance_squared(point.with_y(0.0))
            <= self.radius * self.radius
    }
}

fn default_cell_size() -> f32 {
    1.0
}
fn default_target_speed() -> f32 {
    3.0
}
fn default_guard_speed() -> f32 {
    3.5
}
fn default_stopping_distance() -> f32 {
    0.5
}
fn default_exit_radius() -> f32 {
    1.0
}
fn default_forward() -> Vec3 {
    Vec3::FORWARD
}

impl LevelConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read level {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to load level {}", path.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let level: Self = serde_yaml::from_str(yaml).context("invalid level YAML")?;
        level.validate()?;
        Ok(level)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed level")
    }

    pub fn nav_grid(&self) -> Result<NavGrid> {
        let grid = &self.grid;
        ensure!(
            grid.width > 0 && grid.depth > 0,
            "grid must be at least one cell wide and deep"
        );
        let cells = u64::from(grid.width) * u64::from(grid.depth);
        ensure!(
            cells <= NavGrid::MAX_CELLS,
            "grid {}x{} has {cells} cells, more than the supported {}",
            grid.width,
            grid.depth,
            NavGrid::MAX_CELLS
        );
        ensure!(
            grid.cell_size.is_finite() && grid.cell_size > 0.0,
            "grid cell size must be positive, got {}",
            grid.cell_size
        );

        let mut nav = NavGrid::new(grid.width, grid.depth, grid.cell_size).with_floor_y(grid.floor_y);
        for &[x, z] in &grid.blocked {
            let in_bounds = x >= 0 && z >= 0 && (x as u32) < grid.width && (z as u32) < grid.depth;
            ensure!(in_bounds, "blocked cell [{x}, {z}] is outside the grid");
            nav.set_blocked(x, z, true);
        }
        Ok(nav)
    }

    pub fn patrol_graph(&self) -> Result<PatrolGraph> {
        Ok(PatrolGraph::from_config(&self.patrol_points)?)
    }

    /// Structural checks that need no simulation state.
    pub fn validate(&self) -> Result<()> {
        let nav = self.nav_grid()?;
        let patrol = self.patrol_graph()?;
        ensure!(!patrol.is_empty(), "level has no patrol points");

        for point in &self.patrol_points {
            ensure!(
                nav.is_walkable(point.position),
                "patrol point `{}` is not on a walkable cell",
                point.name
            );
        }

        ensure!(
            nav.is_walkable(self.target.position),
            "target starts on an unwalkable cell"
        );
        ensure!(
            self.target.speed.is_finite() && self.target.speed >= 0.0,
            "target speed must be non-negative"
        );

        if self.guards.is_empty() {
            bail!("level has no guards");
        }
        let mut names = std::collections::BTreeSet::new();
        for guard in &self.guards {
            ensure!(names.insert(guard.name.as_str()), "duplicate guard `{}`", guard.name);
            ensure!(
                nav.is_walkable(guard.position),
                "guard `{}` starts on an unwalkable cell",
                guard.name
            );
            ensure!(
                patrol.find(&guard.initial_patrol_point).is_some(),
                "guard `{}` starts at unknown patrol point `{}`",
                guard.name,
                guard.initial_patrol_point
            );
            guard
                .stats
                .validate()
                .with_context(|| format!("guard `{}`", guard.name))?;
        }

        if let Some(machine) = &self.machine {
            machine.build().context("invalid behavior machine")?;
        }
        Ok(())
    }
}
