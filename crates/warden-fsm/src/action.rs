use serde::{Deserialize, Serialize};
use warden_core::{AgentId, DeterministicRng, TickContext};
use warden_nav::{PathfindingAgent, Vec3};
use warden_tools::TraceEvent;

use crate::{tags, GuardWorldMut, StateController};

/// Stateless effect executed by a state every tick, or by a transition when it fires.
///
/// Every variant is pure configuration; the per-agent data it reads and writes lives on the
/// controller passed in. A missing reference makes the action skip its effect for that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Once arrived, walk to the next patrol point.
    Patrol,
    /// Head for the navigable point nearest the target and remember where it was.
    Chase,
    /// Once arrived, wander to a random point around the target's last known heading.
    Search,
    /// Catch the target when within catch distance and halt.
    Catch,
    /// Snapshot the target's position and velocity into the blackboard.
    RecordTargetState,
    /// Head back to the current patrol point.
    MoveToPatrolPoint,
    /// Head for the blackboard's desired position, if one was recorded.
    MoveToDesiredPosition,
}

impl Action {
    pub fn act<W>(&self, ctx: &TickContext, controller: &mut StateController<W>, world: &mut W)
    where
        W: GuardWorldMut,
    {
        match self {
            Action::Patrol => patrol(ctx, controller, world),
            Action::Chase => chase(controller, world),
            Action::Search => search(controller, world),
            Action::Catch => catch(ctx, controller, world),
            Action::RecordTargetState => record_target_state(controller, world),
            Action::MoveToPatrolPoint => {
                let point = controller.patrol_graph().point(controller.current_point());
                set_destination(controller, world, point.position());
            }
            Action::MoveToDesiredPosition => {
                if let Some(desired) = controller.blackboard().desired_position {
                    set_destination(controller, world, desired);
                }
            }
        }
    }
}

fn set_destination<W>(controller: &StateController<W>, world: &mut W, point: Vec3)
where
    W: GuardWorldMut,
{
    match world.pathfinding_mut(controller.agent()) {
        Some(nav) => nav.set_destination(point),
        None => tracing::warn!(agent = ?controller.agent(), "no pathfinding agent, destination dropped"),
    }
}

fn within_stopping_distance<W>(controller: &StateController<W>, world: &W) -> bool
where
    W: GuardWorldMut,
{
    world
        .pathfinding(controller.agent())
        .map(|nav| nav.within_stopping_distance())
        .unwrap_or(false)
}

fn patrol<W>(ctx: &TickContext, controller: &mut StateController<W>, world: &mut W)
where
    W: GuardWorldMut,
{
    if !within_stopping_distance(controller, world) {
        return;
    }

    let from = controller.current_point();
    let position = controller.next_patrol_position();
    let to = controller.current_point();
    set_destination(controller, world, position);

    let agent = controller.agent().stable_id();
    controller.tracer_mut().emit(
        TraceEvent::new(ctx.tick, tags::PATROL)
            .with_agent(agent)
            .with_a(from.index() as u64)
            .with_b(to.index() as u64),
    );
}

fn chase<W>(controller: &mut StateController<W>, world: &mut W)
where
    W: GuardWorldMut,
{
    let Some(target) = controller.target() else {
        return;
    };
    let Some(target_position) = world.position(target) else {
        return;
    };

    let blackboard = controller.blackboard_mut();
    blackboard.last_target_position = Some(target_position);
    blackboard.desired_position = Some(target_position);

    let radius = controller.stats().sample_radius;
    match world.navigator().sample_point_near(target_position, radius) {
        Some(point) => set_destination(controller, world, point),
        None => tracing::trace!(agent = ?controller.agent(), "no navigable point near target"),
    }
}

fn search<W>(controller: &mut StateController<W>, world: &mut W)
where
    W: GuardWorldMut,
{
    if !within_stopping_distance(controller, world) {
        return;
    }
    let Some(last_position) = controller.blackboard().last_target_position else {
        return;
    };
    let last_velocity = controller
        .blackboard()
        .last_target_velocity
        .unwrap_or(Vec3::ZERO);

    let stats = *controller.stats();
    let offset = random_in_unit_sphere(controller.rng_mut()) * stats.search_radius;
    let centre = last_position + last_velocity + offset;

    match world.navigator().sample_point_near(centre, stats.sample_radius) {
        Some(point) => set_destination(controller, world, point),
        None => tracing::trace!(agent = ?controller.agent(), "no navigable search point, retrying next tick"),
    }
}

fn catch<W>(ctx: &TickContext, controller: &mut StateController<W>, world: &mut W)
where
    W: GuardWorldMut,
{
    let Some(target) = controller.target() else {
        return;
    };
    let (Some(agent_position), Some(target_position)) =
        (world.position(controller.agent()), world.position(target))
    else {
        return;
    };

    let reach = controller.stats().catch_distance;
    if agent_position.distance_squared(target_position) > reach * reach {
        return;
    }

    if !world.is_caught(target) {
        tracing::debug!(agent = ?controller.agent(), ?target, tick = ctx.tick, "target caught");
        world.catch_target(target);
        let agent = controller.agent().stable_id();
        controller.tracer_mut().emit(
            TraceEvent::new(ctx.tick, tags::CATCH)
                .with_agent(agent)
                .with_a(target.stable_id()),
        );
    }

    if let Some(nav) = world.pathfinding_mut(controller.agent()) {
        nav.set_stopped(true);
    }
}

fn record_target_state<W>(controller: &mut StateController<W>, world: &W)
where
    W: GuardWorldMut,
{
    let Some(target) = controller.target() else {
        return;
    };
    let Some(position) = world.position(target) else {
        return;
    };
    let velocity = world.velocity(target);

    let blackboard = controller.blackboard_mut();
    blackboard.last_target_position = Some(position);
    blackboard.last_target_velocity = velocity;
}

/// Uniform point inside the unit sphere by rejection sampling; the origin if every draw misses.
pub(crate) fn random_in_unit_sphere(rng: &mut impl DeterministicRng) -> Vec3 {
    for _ in 0..16 {
        let p = Vec3::new(
            rng.next_f32_signed(),
            rng.next_f32_signed(),
            rng.next_f32_signed(),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
    Vec3::ZERO
}
