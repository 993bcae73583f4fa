mod common;

use std::sync::Arc;

use common::*;
use warden_core::SplitMix64;
use warden_fsm::{
    tags, Action, PatrolGraph, PatrolPointConfig, StateController, StateGraph,
};
use warden_nav::Vec3;

fn patrol_only() -> (StateGraph, warden_fsm::StateId) {
    let mut builder = StateGraph::builder();
    let patrol = builder.state("patrol");
    builder.action(patrol, Action::Patrol);
    (builder.build().unwrap(), patrol)
}

fn patrol_steps(c: &StateController<TestWorld>) -> Vec<(usize, usize)> {
    c.tracer()
        .log()
        .unwrap()
        .with_tag(tags::PATROL)
        .map(|e| (e.a as usize, e.b as usize))
        .collect()
}

#[test]
fn choose_next_never_returns_previous_when_alternatives_exist() {
    let mut builder = PatrolGraph::builder();
    let hub = builder.add_point("hub", Vec3::ZERO);
    let x = builder.add_point("x", Vec3::new(1.0, 0.0, 0.0));
    let y = builder.add_point("y", Vec3::new(0.0, 0.0, 1.0));
    let z = builder.add_point("z", Vec3::new(-1.0, 0.0, 0.0));
    builder.connect(hub, x).connect(hub, y).connect(hub, z);
    let graph = builder.build();

    let mut rng = SplitMix64::new(11);
    let mut seen_y = false;
    let mut seen_z = false;
    for _ in 0..200 {
        let next = graph.choose_next(hub, Some(x), &mut rng).unwrap();
        assert_ne!(next, x);
        seen_y |= next == y;
        seen_z |= next == z;
    }
    assert!(seen_y && seen_z);
}

#[test]
fn dead_end_turns_back() {
    let mut builder = PatrolGraph::builder();
    let a = builder.add_point("a", Vec3::ZERO);
    let b = builder.add_point("b", Vec3::new(1.0, 0.0, 0.0));
    builder.connect(a, b);
    let graph = builder.build();

    let mut rng = SplitMix64::new(3);
    assert_eq!(graph.choose_next(b, Some(a), &mut rng), Some(a));
    assert_eq!(graph.choose_next(a, None, &mut rng), Some(b));
}

#[test]
fn isolated_point_stays_put() {
    let mut builder = PatrolGraph::builder();
    let lone = builder.add_point("lone", Vec3::ZERO);
    let graph = builder.build();

    let mut rng = SplitMix64::new(3);
    assert_eq!(graph.choose_next(lone, None, &mut rng), Some(lone));
}

#[test]
fn config_links_are_symmetric() {
    let points = vec![
        PatrolPointConfig {
            name: "gate".to_string(),
            position: Vec3::new(1.5, 0.0, 1.5),
            neighbors: vec!["yard".to_string()],
        },
        PatrolPointConfig {
            name: "yard".to_string(),
            position: Vec3::new(8.5, 0.0, 1.5),
            neighbors: Vec::new(),
        },
    ];
    let graph = PatrolGraph::from_config(&points).unwrap();
    let gate = graph.find("gate").unwrap();
    let yard = graph.find("yard").unwrap();

    assert_eq!(graph.point(gate).neighbors(), &[yard]);
    assert_eq!(graph.point(yard).neighbors(), &[gate]);
}

#[test]
fn guard_walks_the_ring_without_backtracking() {
    let (graph, patrol) = patrol_only();
    let mut world = TestWorld::new();
    let mut c = controller(graph, patrol);

    for tick in 0..600 {
        c.tick(&ctx(tick), &mut world);
        world.step_agents(DT);
    }

    let steps = patrol_steps(&c);
    assert!(steps.len() >= 5, "only {} patrol steps", steps.len());

    let ring = c.patrol_graph();
    for pair in steps.windows(2) {
        let (from, to) = pair[1];
        assert_eq!(from, pair[0].1);
        assert_ne!(to, pair[0].0, "guard turned back at a ring point");
    }
    for (from, to) in &steps[1..] {
        let from_id = ring.find(["a", "b", "c", "d"][*from]).unwrap();
        assert!(ring
            .point(from_id)
            .neighbors()
            .iter()
            .any(|n| n.index() == *to));
    }
}

#[test]
fn two_point_route_ping_pongs() {
    let mut builder = PatrolGraph::builder();
    let a = builder.add_point("a", Vec3::new(18.5, 0.0, 20.5));
    let b = builder.add_point("b", Vec3::new(22.5, 0.0, 20.5));
    builder.connect(a, b);
    let route = Arc::new(builder.build());

    let (graph, patrol) = patrol_only();
    let mut c = StateController::builder(GUARD, Arc::new(graph), route)
        .initial_state(patrol)
        .initial_point(a)
        .seed(5)
        .build()
        .unwrap();
    c.tracer_mut().enable_log();

    let mut world = TestWorld::new();
    for tick in 0..400 {
        c.tick(&ctx(tick), &mut world);
        world.step_agents(DT);
    }

    let steps = patrol_steps(&c);
    assert!(steps.len() >= 4);
    for (i, (_, to)) in steps.iter().enumerate() {
        let expected = if i % 2 == 0 { b } else { a };
        assert_eq!(*to, expected.index());
    }
}

#[test]
fn patrol_waits_until_arrival() {
    let (graph, patrol) = patrol_only();
    let mut world = TestWorld::new();
    let mut c = controller(graph, patrol);

    c.tick(&ctx(0), &mut world);
    let first = c.current_point();
    for tick in 1..5 {
        c.tick(&ctx(tick), &mut world);
    }

    assert_eq!(c.current_point(), first);
    assert_eq!(patrol_steps(&c).len(), 1);
}
