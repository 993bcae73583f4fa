//! Navigation primitives: vector math, navigator backends, and pathfinding agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod grid;
pub mod math;
pub mod navigator;
pub mod world;

pub use agent::{NavAgent, PathfindingAgent};
pub use grid::NavGrid;
pub use math::Vec3;
pub use navigator::{NavPath, NavRaycastHit, Navigator};
pub use world::{NavWorldMut, NavWorldView};
