mod common;

use common::*;
use warden_fsm::{Action, StateController, StateGraph};
use warden_nav::{PathfindingAgent, Vec3};

fn idle_controller() -> StateController<TestWorld> {
    let mut builder = StateGraph::builder();
    let idle = builder.state("idle");
    controller(builder.build().unwrap(), idle)
}

#[test]
fn chase_heads_for_target_and_remembers_it() {
    let mut world = TestWorld::new();
    world.target_ahead(8.0);
    let target = world.targets[&TARGET].position;
    let mut c = idle_controller();

    Action::Chase.act(&ctx(0), &mut c, &mut world);

    assert_eq!(world.guard().destination(), Some(target));
    assert_eq!(c.blackboard().last_target_position, Some(target));
    assert_eq!(c.blackboard().desired_position, Some(target));
}

#[test]
fn chase_snaps_to_nearest_navigable_point() {
    let mut world = TestWorld::new();
    world.target_ahead(8.0);
    let target = world.targets[&TARGET].position;
    world.nav.set_blocked(20, 28, true);
    let mut c = idle_controller();

    Action::Chase.act(&ctx(0), &mut c, &mut world);

    let destination = world.guard().destination().unwrap();
    assert!(world.nav.is_walkable(destination));
    assert!(destination.distance(target) <= c.stats().sample_radius);
}

#[test]
fn chase_keeps_old_destination_when_nothing_is_navigable() {
    let mut world = TestWorld::new();
    let far = Vec3::new(200.0, 0.0, 200.0);
    world.place_target(far);
    let mut c = idle_controller();

    Action::Chase.act(&ctx(0), &mut c, &mut world);

    assert_eq!(world.guard().destination(), None);
    assert_eq!(c.blackboard().last_target_position, Some(far));
}

#[test]
fn record_target_state_captures_position_and_velocity() {
    let mut world = TestWorld::new();
    world.target_mut().velocity = Vec3::new(0.0, 0.0, -2.0);
    let mut c = idle_controller();

    Action::RecordTargetState.act(&ctx(0), &mut c, &mut world);

    assert_eq!(
        c.blackboard().last_target_position,
        Some(world.targets[&TARGET].position)
    );
    assert_eq!(
        c.blackboard().last_target_velocity,
        Some(Vec3::new(0.0, 0.0, -2.0))
    );
}

#[test]
fn search_wanders_around_last_known_heading() {
    let mut world = TestWorld::new();
    world.target_mut().velocity = Vec3::new(1.0, 0.0, 0.0);
    let mut c = idle_controller();
    Action::RecordTargetState.act(&ctx(0), &mut c, &mut world);
    let expected = world.targets[&TARGET].position + Vec3::new(1.0, 0.0, 0.0);

    for tick in 1..20 {
        Action::Search.act(&ctx(tick), &mut c, &mut world);
        if world.guard().destination().is_some() {
            break;
        }
    }

    let destination = world.guard().destination().expect("search picked a point");
    let stats = c.stats();
    assert!(world.nav.is_walkable(destination));
    assert!(
        destination.with_y(0.0).distance(expected.with_y(0.0))
            <= stats.search_radius + stats.sample_radius
    );
}

#[test]
fn search_waits_until_arrival() {
    let mut world = TestWorld::new();
    let mut c = idle_controller();
    Action::RecordTargetState.act(&ctx(0), &mut c, &mut world);

    let pending = Vec3::new(30.5, 0.0, 30.5);
    world.guard_mut().set_destination(pending);
    Action::Search.act(&ctx(1), &mut c, &mut world);

    assert_eq!(world.guard().destination(), Some(pending));
}

#[test]
fn search_without_last_position_does_nothing() {
    let mut world = TestWorld::new();
    let mut c = idle_controller();

    Action::Search.act(&ctx(0), &mut c, &mut world);

    assert_eq!(world.guard().destination(), None);
}

#[test]
fn move_to_patrol_point_targets_current_point() {
    let mut world = TestWorld::new();
    let mut c = idle_controller();

    Action::MoveToPatrolPoint.act(&ctx(0), &mut c, &mut world);

    let point = c.patrol_graph().point(c.current_point()).position();
    assert_eq!(world.guard().destination(), Some(point));
}

#[test]
fn move_to_desired_position_needs_a_recorded_position() {
    let mut world = TestWorld::new();
    let mut c = idle_controller();

    Action::MoveToDesiredPosition.act(&ctx(0), &mut c, &mut world);
    assert_eq!(world.guard().destination(), None);

    world.target_ahead(6.0);
    Action::Chase.act(&ctx(1), &mut c, &mut world);
    world.guard_mut().clear_destination();

    Action::MoveToDesiredPosition.act(&ctx(2), &mut c, &mut world);
    assert_eq!(world.guard().destination(), c.blackboard().desired_position);
}
