use warden_nav::Vec3;

use crate::PatrolPointId;

/// Per-agent scratch memory carried across ticks.
///
/// A fixed set of typed fields: only actions and the owning controller write to it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Blackboard {
    /// Where the target was when last tracked or recorded.
    pub last_target_position: Option<Vec3>,
    /// Target velocity captured by a record action.
    pub last_target_velocity: Option<Vec3>,
    /// Point the guard was last told to move towards while chasing.
    pub desired_position: Option<Vec3>,
    pub previous_patrol_point: Option<PatrolPointId>,
    pub velocity_before_pause: Vec3,
    pub stopped_before_pause: bool,
}

impl Blackboard {
    /// Fresh blackboard for an agent starting its patrol at `initial_point`.
    pub fn new(initial_point: PatrolPointId) -> Self {
        Self {
            previous_patrol_point: Some(initial_point),
            ..Self::default()
        }
    }
}
