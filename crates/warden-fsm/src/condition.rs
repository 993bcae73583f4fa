use serde::{Deserialize, Serialize};
use warden_core::TickContext;
use warden_nav::PathfindingAgent;

use crate::{GuardWorldMut, StateController};

/// Stateless predicate gating a [`crate::Transition`].
///
/// Evaluation only sees shared references, so a condition can never write to the blackboard.
/// Any missing reference (no target, no pose, no pathfinding agent) evaluates to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Target inside the vision cone and the first thing a ray towards it hits.
    CanSeeTarget,
    /// `time_in_state >= seconds` (inclusive); `None` means the guard's search time limit.
    TimeInStateElapsed {
        #[serde(default)]
        seconds: Option<f32>,
    },
    /// No pending destination, or within stopping distance of it.
    AtDestination,
}

impl Condition {
    pub fn evaluate<W>(&self, _ctx: &TickContext, controller: &StateController<W>, world: &W) -> bool
    where
        W: GuardWorldMut,
    {
        match self {
            Condition::CanSeeTarget => can_see_target(controller, world),
            Condition::TimeInStateElapsed { seconds } => {
                let limit = seconds.unwrap_or(controller.stats().search_time_limit);
                controller.time_in_state() >= limit
            }
            Condition::AtDestination => world
                .pathfinding(controller.agent())
                .map(|nav| nav.destination().is_none() || nav.within_stopping_distance())
                .unwrap_or(false),
        }
    }
}

fn can_see_target<W>(controller: &StateController<W>, world: &W) -> bool
where
    W: GuardWorldMut,
{
    let Some(target) = controller.target() else {
        return false;
    };
    let agent = controller.agent();
    let (Some(from), Some(to), Some(forward)) = (
        world.position(agent),
        world.position(target),
        world.forward(agent),
    ) else {
        return false;
    };

    let direction = to - from;
    let Some(angle) = direction.angle_degrees(forward) else {
        return false;
    };
    if angle > controller.stats().max_vision_angle {
        return false;
    }

    matches!(world.raycast(agent, direction), Some(hit) if hit.entity == Some(target))
}
