//! Umbrella crate that re-exports the `warden-*` building blocks.
//!
//! Enable only the pieces you need through features; `full` (the default) pulls in everything.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use warden_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use warden_tools as tools;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use warden_nav as nav;

#[cfg(feature = "fsm")]
#[cfg_attr(docsrs, doc(cfg(feature = "fsm")))]
pub use warden_fsm as fsm;

/// The types most guard integrations touch.
#[cfg(feature = "fsm")]
#[cfg_attr(docsrs, doc(cfg(feature = "fsm")))]
pub mod prelude {
    pub use warden_core::{PauseSignal, SimClock, TickContext, WorldMut, WorldView};
    pub use warden_fsm::{
        preset, tick_controllers, Action, Condition, GuardStats, GuardWorldMut, GuardWorldView,
        MachineConfig, PatrolGraph, RayHit, StateController, StateGraph, Transition,
    };
    pub use warden_nav::{NavAgent, NavGrid, NavWorldMut, NavWorldView, PathfindingAgent, Vec3};
}
