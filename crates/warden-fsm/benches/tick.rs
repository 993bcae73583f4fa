use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warden_core::{TickContext, WorldMut, WorldView};
use warden_fsm::{
    preset, Condition, GuardWorldMut, GuardWorldView, PatrolGraph, RayHit, StateController,
    StateGraph, Transition,
};
use warden_nav::{NavAgent, NavGrid, NavWorldMut, NavWorldView, Navigator, PathfindingAgent, Vec3};

const GUARD: u64 = 1;
const TARGET: u64 = 2;

struct World {
    nav: NavGrid,
    guard: NavAgent,
    target: Vec3,
}

impl World {
    fn new() -> Self {
        Self {
            nav: NavGrid::new(64, 64, 1.0),
            guard: NavAgent::new(Vec3::new(32.5, 0.0, 32.5), 4.0, 0.5),
            target: Vec3::new(32.5, 0.0, 2.5),
        }
    }
}

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

impl NavWorldView for World {
    fn position(&self, entity: u64) -> Option<Vec3> {
        match entity {
            GUARD => Some(self.guard.position()),
            TARGET => Some(self.target),
            _ => None,
        }
    }

    fn forward(&self, entity: u64) -> Option<Vec3> {
        (entity == GUARD).then(|| self.guard.forward())
    }

    fn navigator(&self) -> &dyn Navigator {
        &self.nav
    }

    fn pathfinding(&self, agent: u64) -> Option<&dyn PathfindingAgent> {
        (agent == GUARD).then_some(&self.guard as &dyn PathfindingAgent)
    }
}

impl NavWorldMut for World {
    fn pathfinding_mut(&mut self, agent: u64) -> Option<&mut dyn PathfindingAgent> {
        if agent == GUARD {
            Some(&mut self.guard as &mut dyn PathfindingAgent)
        } else {
            None
        }
    }
}

impl GuardWorldView for World {
    fn velocity(&self, _entity: u64) -> Option<Vec3> {
        Some(Vec3::ZERO)
    }

    fn raycast(&self, _from: u64, _direction: Vec3) -> Option<RayHit<u64>> {
        None
    }

    fn is_caught(&self, _target: u64) -> bool {
        false
    }
}

impl GuardWorldMut for World {
    fn catch_target(&mut self, _target: u64) {}
}

fn route() -> Arc<PatrolGraph> {
    let mut builder = PatrolGraph::builder();
    let a = builder.add_point("a", Vec3::new(28.5, 0.0, 28.5));
    let b = builder.add_point("b", Vec3::new(36.5, 0.0, 28.5));
    let c = builder.add_point("c", Vec3::new(36.5, 0.0, 36.5));
    builder.connect(a, b).connect(b, c).connect(c, a);
    Arc::new(builder.build())
}

fn controller(graph: StateGraph, initial: warden_fsm::StateId) -> StateController<World> {
    let route = route();
    StateController::builder(GUARD, Arc::new(graph), Arc::clone(&route))
        .initial_state(initial)
        .initial_point(route.find("a").unwrap())
        .target(TARGET)
        .build()
        .unwrap()
}

fn bench_transition_scan(c: &mut Criterion) {
    let mut builder = StateGraph::builder();
    let idle = builder.state("idle");
    let never = builder.state("never");
    for _ in 0..32 {
        builder.transition(
            idle,
            Transition::new(Condition::TimeInStateElapsed { seconds: Some(1.0e9) }, never),
        );
    }
    let mut controller = controller(builder.build().unwrap(), idle);
    let mut world = World::new();

    let mut tick: u64 = 0;
    c.bench_function("warden-fsm/tick(transitions=32)", |b| {
        b.iter(|| {
            let ctx = TickContext::new(tick, 0.1, 0);
            controller.tick(&ctx, &mut world);
            black_box(controller.current_state());
            tick = tick.wrapping_add(1);
        })
    });
}

fn bench_standard_guard(c: &mut Criterion) {
    let (graph, patrol) = preset::standard_guard();
    let mut controller = controller(graph, patrol);
    let mut world = World::new();

    let mut tick: u64 = 0;
    c.bench_function("warden-fsm/tick(standard_guard)", |b| {
        b.iter(|| {
            let ctx = TickContext::new(tick, 0.1, 0);
            controller.tick(&ctx, &mut world);
            world.guard.step(0.1, &world.nav);
            black_box(controller.current_state());
            tick = tick.wrapping_add(1);
        })
    });
}

criterion_group!(benches, bench_transition_scan, bench_standard_guard);
criterion_main!(benches);
