//! Headless reference world for warden guards.
//!
//! A grid level with walls, a target walking a scripted route and any number of guards driven by
//! [`warden_fsm::StateController`]s. Levels are YAML files loaded through [`LevelConfig`].

#![forbid(unsafe_code)]

pub mod level;
pub mod runner;
pub mod world;

pub use level::{ExitConfig, GridConfig, GuardConfig, LevelConfig, TargetConfig};
pub use runner::{Outcome, SimOptions, Simulation, TARGET_ID};
pub use world::{Caught, GuardBody, Quarry, SimWorld, BODY_RADIUS};
