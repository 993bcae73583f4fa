//! Deterministic, engine-agnostic kernel primitives.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod observer;
pub mod pause;
pub mod rng;
pub mod tick;
pub mod world;

pub use agent::AgentId;
pub use observer::{ObserverId, ObserverList};
pub use pause::{PauseEdge, PauseSignal};
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::{SimClock, TickContext};
pub use world::{WorldMut, WorldView};
