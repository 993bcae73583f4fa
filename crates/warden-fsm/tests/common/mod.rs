#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use warden_core::{TickContext, WorldMut, WorldView};
use warden_fsm::{
    GuardStats, GuardWorldMut, GuardWorldView, PatrolGraph, RayHit, StateController, StateGraph,
    StateId,
};
use warden_nav::{
    NavAgent, NavGrid, NavWorldMut, NavWorldView, Navigator, PathfindingAgent, Vec3,
};

pub const GUARD: u64 = 1;
pub const TARGET: u64 = 100;
pub const ENTITY_RADIUS: f32 = 0.5;
pub const DT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct TestTarget {
    pub position: Vec3,
    pub velocity: Vec3,
    pub caught_calls: u32,
}

#[derive(Debug)]
pub struct TestWorld {
    pub nav: NavGrid,
    pub guards: BTreeMap<u64, NavAgent>,
    pub targets: BTreeMap<u64, TestTarget>,
}

impl TestWorld {
    /// 40x40 open grid, one guard at the centre facing +Z, the target behind it.
    pub fn new() -> Self {
        let mut world = Self {
            nav: NavGrid::new(40, 40, 1.0),
            guards: BTreeMap::new(),
            targets: BTreeMap::new(),
        };
        world.guards.insert(
            GUARD,
            NavAgent::new(Vec3::new(20.5, 0.0, 20.5), 4.0, 0.5).with_forward(Vec3::FORWARD),
        );
        world.targets.insert(
            TARGET,
            TestTarget {
                position: Vec3::new(20.5, 0.0, 10.5),
                velocity: Vec3::ZERO,
                caught_calls: 0,
            },
        );
        world
    }

    pub fn guard(&self) -> &NavAgent {
        &self.guards[&GUARD]
    }

    pub fn guard_mut(&mut self) -> &mut NavAgent {
        self.guards.get_mut(&GUARD).unwrap()
    }

    pub fn target_mut(&mut self) -> &mut TestTarget {
        self.targets.get_mut(&TARGET).unwrap()
    }

    pub fn place_target(&mut self, position: Vec3) {
        self.target_mut().position = position;
    }

    /// Put the target straight ahead of the guard, `distance` away.
    pub fn target_ahead(&mut self, distance: f32) {
        let guard = self.guard().position();
        self.place_target(guard + Vec3::FORWARD * distance);
    }

    pub fn step_agents(&mut self, dt: f32) {
        for agent in self.guards.values_mut() {
            agent.step(dt, &self.nav);
        }
    }

    fn entity_hit(&self, origin: Vec3, dir: Vec3, from: u64) -> Option<(f32, u64)> {
        let centres = self
            .guards
            .iter()
            .map(|(id, g)| (*id, g.position()))
            .chain(self.targets.iter().map(|(id, t)| (*id, t.position)));

        let mut best: Option<(f32, u64)> = None;
        for (id, centre) in centres {
            if id == from {
                continue;
            }
            let oc = centre - origin;
            let along = oc.dot(dir);
            if along < 0.0 {
                continue;
            }
            let off2 = oc.length_squared() - along * along;
            let r2 = ENTITY_RADIUS * ENTITY_RADIUS;
            if off2 > r2 {
                continue;
            }
            let t = (along - (r2 - off2).sqrt()).max(0.0);
            if best.map(|(bt, _)| t < bt).unwrap_or(true) {
                best = Some((t, id));
            }
        }
        best
    }
}

impl WorldView for TestWorld {
    type Agent = u64;
}

impl WorldMut for TestWorld {}

impl NavWorldView for TestWorld {
    fn position(&self, entity: u64) -> Option<Vec3> {
        self.guards
            .get(&entity)
            .map(|g| g.position())
            .or_else(|| self.targets.get(&entity).map(|t| t.position))
    }

    fn forward(&self, entity: u64) -> Option<Vec3> {
        self.guards
            .get(&entity)
            .map(|g| g.forward())
            .or_else(|| self.targets.get(&entity).map(|_| Vec3::FORWARD))
    }

    fn navigator(&self) -> &dyn Navigator {
        &self.nav
    }

    fn pathfinding(&self, agent: u64) -> Option<&dyn PathfindingAgent> {
        self.guards.get(&agent).map(|g| g as &dyn PathfindingAgent)
    }
}

impl NavWorldMut for TestWorld {
    fn pathfinding_mut(&mut self, agent: u64) -> Option<&mut dyn PathfindingAgent> {
        self.guards
            .get_mut(&agent)
            .map(|g| g as &mut dyn PathfindingAgent)
    }
}

impl GuardWorldView for TestWorld {
    fn velocity(&self, entity: u64) -> Option<Vec3> {
        self.targets
            .get(&entity)
            .map(|t| t.velocity)
            .or_else(|| self.guards.get(&entity).map(|g| g.velocity()))
    }

    fn raycast(&self, from: u64, direction: Vec3) -> Option<RayHit<u64>> {
        let origin = self.position(from)?;
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let entity = self.entity_hit(origin, dir, from);
        let reach = entity.map(|(t, _)| t).unwrap_or(100.0);
        if let Some(wall) = self.nav.raycast(origin, dir, reach) {
            return Some(RayHit {
                entity: None,
                point: wall.point,
                distance: wall.distance,
            });
        }

        entity.map(|(t, id)| RayHit {
            entity: Some(id),
            point: origin + dir * t,
            distance: t,
        })
    }

    fn is_caught(&self, target: u64) -> bool {
        self.targets
            .get(&target)
            .map(|t| t.caught_calls > 0)
            .unwrap_or(false)
    }
}

impl GuardWorldMut for TestWorld {
    fn catch_target(&mut self, target: u64) {
        if let Some(t) = self.targets.get_mut(&target) {
            t.caught_calls += 1;
        }
    }
}

/// Four points on a square around the guard's start, linked in a ring.
pub fn square_patrol() -> PatrolGraph {
    let mut builder = PatrolGraph::builder();
    let a = builder.add_point("a", Vec3::new(15.5, 0.0, 15.5));
    let b = builder.add_point("b", Vec3::new(25.5, 0.0, 15.5));
    let c = builder.add_point("c", Vec3::new(25.5, 0.0, 25.5));
    let d = builder.add_point("d", Vec3::new(15.5, 0.0, 25.5));
    builder.connect(a, b).connect(b, c).connect(c, d).connect(d, a);
    builder.build()
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, DT, 7)
}

pub fn controller(graph: StateGraph, initial: StateId) -> StateController<TestWorld> {
    controller_with(graph, initial, GuardStats::default())
}

pub fn controller_with(
    graph: StateGraph,
    initial: StateId,
    stats: GuardStats,
) -> StateController<TestWorld> {
    let patrol = Arc::new(square_patrol());
    let first = patrol.find("a").unwrap();
    let mut controller = StateController::builder(GUARD, Arc::new(graph), patrol)
        .initial_state(initial)
        .initial_point(first)
        .target(TARGET)
        .stats(stats)
        .seed(7)
        .build()
        .expect("valid controller");
    controller.tracer_mut().enable_log();
    controller
}

/// `(tick, from, to)` for every recorded state change.
pub fn transitions(controller: &StateController<TestWorld>) -> Vec<(u64, u64, u64)> {
    controller
        .tracer()
        .log()
        .map(|log| {
            log.with_tag(warden_fsm::tags::TRANSITION)
                .map(|e| (e.tick, e.a, e.b))
                .collect()
        })
        .unwrap_or_default()
}
