use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warden_core::{rng, AgentId, SplitMix64, TickContext};
use warden_nav::Vec3;
use warden_tools::{TraceEvent, Tracer};

use crate::{
    tags, Blackboard, FsmError, GuardStats, GuardWorldMut, PatrolGraph, PatrolPointId, Result,
    StateGraph, StateId,
};

const RNG_STREAM: u64 = 0x5EA2_C4ED;

/// What a transition back into the current state does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameStateTransition {
    /// Re-enter the state: `time_in_state` resets to zero.
    #[default]
    Restart,
    /// Stay in the state untouched: the timer keeps running.
    Ignore,
}

/// Drives one guard through a shared [`StateGraph`].
///
/// Owns everything per-agent: the current state selection, the time spent in it, the
/// blackboard, the patrol cursor, the RNG stream and the pause bookkeeping.
pub struct StateController<W>
where
    W: GuardWorldMut,
{
    agent: W::Agent,
    target: Option<W::Agent>,
    states: Arc<StateGraph>,
    initial_state: StateId,
    current_state: StateId,
    time_in_state: f32,
    blackboard: Blackboard,
    stats: GuardStats,
    patrol: Arc<PatrolGraph>,
    initial_point: PatrolPointId,
    current_point: PatrolPointId,
    same_state: SameStateTransition,
    seed: u64,
    rng: SplitMix64,
    paused: bool,
    tracer: Tracer,
}

impl<W> StateController<W>
where
    W: GuardWorldMut,
{
    pub fn builder(
        agent: W::Agent,
        states: Arc<StateGraph>,
        patrol: Arc<PatrolGraph>,
    ) -> ControllerBuilder<W> {
        ControllerBuilder {
            agent,
            target: None,
            states,
            patrol,
            initial_state: None,
            initial_point: None,
            stats: GuardStats::default(),
            same_state: SameStateTransition::default(),
            seed: 0,
        }
    }

    pub fn agent(&self) -> W::Agent {
        self.agent
    }

    pub fn target(&self) -> Option<W::Agent> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<W::Agent>) {
        self.target = target;
    }

    pub fn states(&self) -> &StateGraph {
        &self.states
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    pub fn current_state_name(&self) -> &str {
        self.states.state(self.current_state).name()
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub(crate) fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn stats(&self) -> &GuardStats {
        &self.stats
    }

    pub fn patrol_graph(&self) -> &PatrolGraph {
        &self.patrol
    }

    /// The patrol point the guard is currently heading to (or standing at).
    pub fn current_point(&self) -> PatrolPointId {
        self.current_point
    }

    pub fn same_state_policy(&self) -> SameStateTransition {
        self.same_state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn rng_mut(&mut self) -> &mut SplitMix64 {
        &mut self.rng
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Advance one simulation tick.
    ///
    /// While `ctx.paused` nothing but the one-time pause snapshot happens; otherwise the timer
    /// advances by the tick duration and the current state updates.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) {
        if ctx.paused {
            self.on_pause(ctx, world);
            return;
        }
        self.on_unpause(ctx, world);

        self.time_in_state += ctx.elapsed_seconds();

        let states = Arc::clone(&self.states);
        states.state(self.current_state).update(ctx, self, world);
    }

    /// Freeze the pathfinding agent, remembering its velocity. Idempotent until resumed.
    pub fn on_pause(&mut self, ctx: &TickContext, world: &mut W) {
        if self.paused {
            return;
        }
        self.paused = true;

        match world.pathfinding_mut(self.agent) {
            Some(nav) => {
                self.blackboard.velocity_before_pause = nav.velocity();
                self.blackboard.stopped_before_pause = nav.is_stopped();
                nav.set_velocity(Vec3::ZERO);
                nav.set_stopped(true);
            }
            None => tracing::warn!(agent = ?self.agent, "pausing agent without pathfinding agent"),
        }

        tracing::debug!(agent = ?self.agent, tick = ctx.tick, "controller paused");
        self.tracer
            .emit(TraceEvent::new(ctx.tick, tags::PAUSE).with_agent(self.agent.stable_id()));
    }

    /// Restore what [`StateController::on_pause`] saved. Idempotent until paused again.
    pub fn on_unpause(&mut self, ctx: &TickContext, world: &mut W) {
        if !self.paused {
            return;
        }
        self.paused = false;

        if let Some(nav) = world.pathfinding_mut(self.agent) {
            nav.set_velocity(self.blackboard.velocity_before_pause);
            nav.set_stopped(self.blackboard.stopped_before_pause);
        }

        tracing::debug!(agent = ?self.agent, tick = ctx.tick, "controller resumed");
        self.tracer
            .emit(TraceEvent::new(ctx.tick, tags::UNPAUSE).with_agent(self.agent.stable_id()));
    }

    /// Only reachable from transition evaluation, at most once per tick.
    pub(crate) fn change_state(&mut self, ctx: &TickContext, next: StateId) {
        let from = self.current_state;
        if next == from && self.same_state == SameStateTransition::Ignore {
            tracing::trace!(agent = ?self.agent, state = self.current_state_name(), "same-state transition ignored");
            return;
        }

        self.current_state = next;
        self.time_in_state = 0.0;

        tracing::debug!(
            agent = ?self.agent,
            tick = ctx.tick,
            from = self.states.state(from).name(),
            to = self.states.state(next).name(),
            "state transition"
        );
        self.tracer.emit(
            TraceEvent::new(ctx.tick, tags::TRANSITION)
                .with_agent(self.agent.stable_id())
                .with_a(from.index() as u64)
                .with_b(next.index() as u64),
        );
    }

    /// Advance the patrol cursor to a neighbor of the current point and return its position.
    ///
    /// The point just left becomes the blackboard's previous point, so the guard does not turn
    /// straight back unless it is at a dead end.
    pub fn next_patrol_position(&mut self) -> Vec3 {
        let previous = self.blackboard.previous_patrol_point;
        let next = self
            .patrol
            .choose_next(self.current_point, previous, &mut self.rng)
            .unwrap_or(self.current_point);

        self.blackboard.previous_patrol_point = Some(self.current_point);
        self.current_point = next;
        self.patrol.point(next).position()
    }

    /// Reset to the configured initial state and patrol point with a fresh blackboard.
    ///
    /// A pending pause snapshot survives the reset so the next unpaused tick still restores the
    /// agent's pre-pause motion.
    pub fn restart(&mut self) {
        let mut blackboard = Blackboard::new(self.initial_point);
        if self.paused {
            blackboard.velocity_before_pause = self.blackboard.velocity_before_pause;
            blackboard.stopped_before_pause = self.blackboard.stopped_before_pause;
        }

        self.current_state = self.initial_state;
        self.time_in_state = 0.0;
        self.current_point = self.initial_point;
        self.blackboard = blackboard;
        self.rng = agent_rng(self.seed, self.agent);
    }
}

fn agent_rng<A: AgentId>(seed: u64, agent: A) -> SplitMix64 {
    SplitMix64::new(rng::derive_seed(seed, agent.stable_id(), RNG_STREAM))
}

pub struct ControllerBuilder<W>
where
    W: GuardWorldMut,
{
    agent: W::Agent,
    target: Option<W::Agent>,
    states: Arc<StateGraph>,
    patrol: Arc<PatrolGraph>,
    initial_state: Option<StateId>,
    initial_point: Option<PatrolPointId>,
    stats: GuardStats,
    same_state: SameStateTransition,
    seed: u64,
}

impl<W> ControllerBuilder<W>
where
    W: GuardWorldMut,
{
    pub fn initial_state(mut self, state: StateId) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn initial_point(mut self, point: PatrolPointId) -> Self {
        self.initial_point = Some(point);
        self
    }

    pub fn target(mut self, target: W::Agent) -> Self {
        self.target = Some(target);
        self
    }

    pub fn stats(mut self, stats: GuardStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn same_state_policy(mut self, policy: SameStateTransition) -> Self {
        self.same_state = policy;
        self
    }

    /// Global seed the agent's RNG stream is derived from.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration. A failure here is an authoring error: the agent must not be
    /// scheduled.
    pub fn build(self) -> Result<StateController<W>> {
        let result = self.validate();
        if let Err(err) = &result {
            tracing::error!(agent = ?self.agent, error = %err, "rejecting guard configuration");
        }
        let (initial_state, initial_point) = result?;

        Ok(StateController {
            agent: self.agent,
            target: self.target,
            states: self.states,
            initial_state,
            current_state: initial_state,
            time_in_state: 0.0,
            blackboard: Blackboard::new(initial_point),
            stats: self.stats,
            patrol: self.patrol,
            initial_point,
            current_point: initial_point,
            same_state: self.same_state,
            seed: self.seed,
            rng: agent_rng(self.seed, self.agent),
            paused: false,
            tracer: Tracer::new(),
        })
    }

    fn validate(&self) -> Result<(StateId, PatrolPointId)> {
        let agent = format!("{:?}", self.agent);
        let initial_state = self
            .initial_state
            .ok_or_else(|| FsmError::MissingInitialState {
                agent: agent.clone(),
            })?;
        if !self.states.contains(initial_state) {
            return Err(FsmError::InvalidStateId(initial_state.index()));
        }

        let initial_point = self
            .initial_point
            .ok_or(FsmError::MissingInitialPatrolPoint { agent })?;
        if !self.patrol.contains(initial_point) {
            return Err(FsmError::InvalidPatrolPointId(initial_point.index()));
        }

        self.stats.validate()?;
        Ok((initial_state, initial_point))
    }
}

/// Tick every controller in stable agent order.
pub fn tick_controllers<W>(ctx: &TickContext, world: &mut W, controllers: &mut [StateController<W>])
where
    W: GuardWorldMut,
{
    controllers.sort_by_key(|c| c.agent().stable_id());
    for controller in controllers.iter_mut() {
        controller.tick(ctx, world);
    }
}
