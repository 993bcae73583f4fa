use std::sync::Arc;

use anyhow::{Context, Result};
use warden_core::{PauseEdge, PauseSignal, SimClock};
use warden_fsm::{preset, tick_controllers, FsmError, StateController};
use warden_nav::NavAgent;
use warden_tools::TraceEvent;

use crate::level::{ExitConfig, LevelConfig};
use crate::world::{GuardBody, Quarry, SimWorld};

/// Entity id of the target; guards are numbered from 1 in level order.
pub const TARGET_ID: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    pub dt_seconds: f32,
    pub seed: u64,
    /// Record every controller's trace events in memory.
    pub trace: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt_seconds: 0.02,
            seed: 0,
            trace: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    /// A guard caught the target on this tick.
    Caught { tick: u64 },
    /// The target reached the exit on this tick.
    Escaped { tick: u64 },
}

impl Outcome {
    pub fn is_finished(self) -> bool {
        !matches!(self, Outcome::Running)
    }
}

/// One level being played out: the world, the clock and a controller per guard.
pub struct Simulation {
    world: SimWorld,
    clock: SimClock,
    controllers: Vec<StateController<SimWorld>>,
    exit: Option<ExitConfig>,
    dt_seconds: f32,
    outcome: Outcome,
}

impl Simulation {
    pub fn from_level(level: &LevelConfig, options: &SimOptions) -> Result<Self> {
        let nav = level.nav_grid()?;
        let patrol = Arc::new(level.patrol_graph()?);
        let (graph, machine_initial) = match &level.machine {
            Some(machine) => machine.build().context("invalid behavior machine")?,
            None => preset::standard_guard(),
        };
        let graph = Arc::new(graph);

        let quarry = Quarry::new(
            TARGET_ID,
            level.target.position,
            level.target.speed,
            level.target.route.clone(),
        );
        let mut world = SimWorld::new(nav, quarry);

        let mut controllers = Vec::with_capacity(level.guards.len());
        for (id, guard) in (1u64..).zip(&level.guards) {
            let agent = NavAgent::new(guard.position, guard.speed, guard.stopping_distance)
                .with_forward(guard.forward);
            world.add_guard(
                id,
                GuardBody {
                    name: guard.name.clone(),
                    agent,
                },
            );

            let initial_state = match &guard.initial_state {
                Some(name) => graph
                    .find(name)
                    .ok_or_else(|| FsmError::UnknownState(name.clone()))
                    .with_context(|| format!("guard `{}`", guard.name))?,
                None => machine_initial,
            };
            let initial_point = patrol
                .find(&guard.initial_patrol_point)
                .ok_or_else(|| FsmError::UnknownPatrolPoint(guard.initial_patrol_point.clone()))
                .with_context(|| format!("guard `{}`", guard.name))?;

            let mut controller =
                StateController::builder(id, Arc::clone(&graph), Arc::clone(&patrol))
                    .initial_state(initial_state)
                    .initial_point(initial_point)
                    .target(TARGET_ID)
                    .stats(guard.stats)
                    .same_state_policy(guard.same_state)
                    .seed(options.seed)
                    .build()
                    .with_context(|| format!("guard `{}`", guard.name))?;
            if options.trace {
                controller.tracer_mut().enable_log();
            }
            controllers.push(controller);
        }

        tracing::debug!(
            level = level.display_name(),
            guards = controllers.len(),
            states = graph.len(),
            "simulation ready"
        );

        Ok(Self {
            world,
            clock: SimClock::new(options.seed),
            controllers,
            exit: level.exit,
            dt_seconds: options.dt_seconds,
            outcome: Outcome::Running,
        })
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    pub fn controllers(&self) -> &[StateController<SimWorld>] {
        &self.controllers
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Index of the next tick to run.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Seconds of play so far; paused ticks don't count.
    pub fn level_time(&self) -> f64 {
        self.clock.elapsed_seconds()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) -> Option<PauseEdge> {
        self.clock.set_paused(paused)
    }

    pub fn pause_signal_mut(&mut self) -> &mut PauseSignal {
        self.clock.pause_signal_mut()
    }

    /// Run one tick. Does nothing once the level has ended.
    pub fn step(&mut self) -> Outcome {
        if self.outcome.is_finished() {
            return self.outcome;
        }

        let ctx = self.clock.advance(self.dt_seconds);
        tick_controllers(&ctx, &mut self.world, &mut self.controllers);
        if !ctx.paused {
            self.world.step(ctx.dt_seconds);
        }

        self.outcome = if self.world.quarry.is_caught() {
            tracing::info!(tick = ctx.tick, "target caught");
            Outcome::Caught { tick: ctx.tick }
        } else if self
            .exit
            .is_some_and(|exit| exit.contains(self.world.quarry.position()))
        {
            tracing::info!(tick = ctx.tick, "target reached the exit");
            Outcome::Escaped { tick: ctx.tick }
        } else {
            Outcome::Running
        };
        self.outcome
    }

    /// Step until the level ends or `max_ticks` ticks have run.
    pub fn run(&mut self, max_ticks: u64) -> Outcome {
        for _ in 0..max_ticks {
            if self.step().is_finished() {
                break;
            }
        }
        self.outcome
    }

    /// `(guard name, current state name)` in agent order.
    pub fn guard_states(&self) -> Vec<(&str, &str)> {
        let mut states: Vec<_> = self
            .controllers
            .iter()
            .map(|c| {
                let name = self
                    .world
                    .guards
                    .get(&c.agent())
                    .map(|body| body.name.as_str())
                    .unwrap_or("?");
                (c.agent(), name, c.current_state_name())
            })
            .collect();
        states.sort_by_key(|(agent, _, _)| *agent);
        states.into_iter().map(|(_, name, state)| (name, state)).collect()
    }

    /// Recorded trace events of every guard, ordered by tick then agent.
    pub fn trace_events(&self) -> Vec<TraceEvent> {
        let mut events: Vec<TraceEvent> = self
            .controllers
            .iter()
            .filter_map(|c| c.tracer().log())
            .flat_map(|log| log.events.iter().cloned())
            .collect();
        events.sort_by_key(|e| (e.tick, e.agent));
        events
    }
}
