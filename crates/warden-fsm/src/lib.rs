//! Data-driven guard behavior state machine.
//!
//! States hold ordered [`Action`]s and ordered [`Transition`]s. Every tick a [`StateController`]
//! runs its current state's actions, then fires at most one transition: the first whose
//! [`Condition`] matches its trigger polarity. States, transitions, actions and conditions are
//! immutable configuration shared by every controller; all per-agent data lives in the
//! controller and its [`Blackboard`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blackboard;
pub mod condition;
pub mod config;
pub mod controller;
pub mod error;
pub mod patrol;
pub mod preset;
pub mod state;
pub mod stats;
pub mod world;

pub use action::Action;
pub use blackboard::Blackboard;
pub use condition::Condition;
pub use config::{MachineConfig, PatrolPointConfig, StateConfig, TransitionConfig};
pub use controller::{tick_controllers, ControllerBuilder, SameStateTransition, StateController};
pub use error::{FsmError, Result};
pub use patrol::{PatrolGraph, PatrolGraphBuilder, PatrolPoint, PatrolPointId};
pub use state::{State, StateGraph, StateGraphBuilder, StateId, Transition};
pub use stats::GuardStats;
pub use world::{GuardWorldMut, GuardWorldView, RayHit};

/// Tags of the [`warden_tools::TraceEvent`]s emitted by controllers.
pub mod tags {
    /// `a` = previous state index, `b` = next state index.
    pub const TRANSITION: &str = "fsm.transition";
    /// `a` = target stable id.
    pub const CATCH: &str = "fsm.catch";
    pub const PAUSE: &str = "fsm.pause";
    pub const UNPAUSE: &str = "fsm.unpause";
    /// `a` = previous patrol point index, `b` = new patrol point index.
    pub const PATROL: &str = "fsm.patrol";
}
