use warden_core::{WorldMut, WorldView};

use crate::{Navigator, PathfindingAgent, Vec3};

pub trait NavWorldView: WorldView {
    fn position(&self, entity: Self::Agent) -> Option<Vec3>;

    /// Facing direction of an entity; need not be normalized.
    fn forward(&self, entity: Self::Agent) -> Option<Vec3>;

    fn navigator(&self) -> &dyn Navigator;

    fn pathfinding(&self, agent: Self::Agent) -> Option<&dyn PathfindingAgent>;
}

pub trait NavWorldMut: WorldMut + NavWorldView {
    fn pathfinding_mut(&mut self, agent: Self::Agent) -> Option<&mut dyn PathfindingAgent>;
}
