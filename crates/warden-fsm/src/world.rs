use warden_nav::{NavWorldMut, NavWorldView, Vec3};

/// Result of a visibility ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<A> {
    /// Entity owning the first surface hit, `None` for level geometry.
    pub entity: Option<A>,
    pub point: Vec3,
    pub distance: f32,
}

/// Queries guard behavior needs beyond navigation.
pub trait GuardWorldView: NavWorldView {
    /// Current velocity of an entity as reported by its movement controller.
    fn velocity(&self, entity: Self::Agent) -> Option<Vec3>;

    /// Cast a ray from `from`'s position along `direction` through the environment.
    ///
    /// `from` itself is never reported as a hit.
    fn raycast(&self, from: Self::Agent, direction: Vec3) -> Option<RayHit<Self::Agent>>;

    fn is_caught(&self, target: Self::Agent) -> bool;
}

pub trait GuardWorldMut: GuardWorldView + NavWorldMut {
    /// Deliver the "caught" transition to `target`.
    fn catch_target(&mut self, target: Self::Agent);
}
