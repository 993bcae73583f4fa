use std::collections::BTreeMap;

use warden_core::{ObserverId, ObserverList, WorldMut, WorldView};
use warden_fsm::{GuardWorldMut, GuardWorldView, RayHit};
use warden_nav::{
    NavAgent, NavGrid, NavWorldMut, NavWorldView, Navigator, PathfindingAgent, Vec3,
};

/// Collision radius every body presents to vision rays.
pub const BODY_RADIUS: f32 = 0.5;

/// Longest vision ray the world will cast.
pub const MAX_SIGHT: f32 = 100.0;

/// Raised once, the first time the target is caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caught {
    pub target: u64,
}

/// A guard body: its name from the level and the nav agent moving it.
#[derive(Debug, Clone)]
pub struct GuardBody {
    pub name: String,
    pub agent: NavAgent,
}

/// The target walking a scripted route.
///
/// Moves in straight lines between waypoints and stops at the last one. Once caught it
/// never moves again.
#[derive(Debug)]
pub struct Quarry {
    id: u64,
    position: Vec3,
    velocity: Vec3,
    forward: Vec3,
    speed: f32,
    route: Vec<Vec3>,
    next_waypoint: usize,
    caught: bool,
    on_caught: ObserverList<Caught>,
}

impl Quarry {
    pub fn new(id: u64, position: Vec3, speed: f32, route: Vec<Vec3>) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            forward: Vec3::FORWARD,
            speed: speed.max(0.0),
            route,
            next_waypoint: 0,
            caught: false,
            on_caught: ObserverList::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_caught(&self) -> bool {
        self.caught
    }

    pub fn route_finished(&self) -> bool {
        self.next_waypoint >= self.route.len()
    }

    pub fn on_caught(&mut self, observer: impl FnMut(&Caught) + 'static) -> ObserverId {
        self.on_caught.subscribe(observer)
    }

    pub fn remove_caught_observer(&mut self, id: ObserverId) -> bool {
        self.on_caught.unsubscribe(id)
    }

    /// Mark the quarry caught. Observers hear about it once.
    pub fn catch(&mut self) {
        if self.caught {
            return;
        }
        self.caught = true;
        self.velocity = Vec3::ZERO;
        self.on_caught.notify(&Caught { target: self.id });
    }

    pub fn step(&mut self, dt_seconds: f32) {
        let dt = dt_seconds.max(0.0);
        if self.caught || dt <= 0.0 {
            self.velocity = Vec3::ZERO;
            return;
        }

        let start = self.position;
        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let Some(&waypoint) = self.route.get(self.next_waypoint) else {
                break;
            };
            let to_waypoint = waypoint - self.position;
            let dist = to_waypoint.length();
            if dist <= budget {
                self.position = waypoint;
                self.next_waypoint += 1;
                budget -= dist;
            } else {
                self.position += to_waypoint * (budget / dist);
                budget = 0.0;
            }
        }

        let moved = self.position - start;
        self.velocity = moved * (1.0 / dt);
        let heading = moved.with_y(0.0).normalize_or_zero();
        if heading != Vec3::ZERO {
            self.forward = heading;
        }
    }
}

/// Headless world: a nav grid, guard bodies keyed by id and one target.
#[derive(Debug)]
pub struct SimWorld {
    pub nav: NavGrid,
    pub guards: BTreeMap<u64, GuardBody>,
    pub quarry: Quarry,
}

impl SimWorld {
    pub fn new(nav: NavGrid, quarry: Quarry) -> Self {
        Self {
            nav,
            guards: BTreeMap::new(),
            quarry,
        }
    }

    pub fn add_guard(&mut self, id: u64, body: GuardBody) {
        self.guards.insert(id, body);
    }

    pub fn guard_by_name(&self, name: &str) -> Option<(u64, &GuardBody)> {
        self.guards
            .iter()
            .find(|(_, body)| body.name == name)
            .map(|(id, body)| (*id, body))
    }

    /// Move every body by one unpaused step, guards first in id order.
    pub fn step(&mut self, dt_seconds: f32) {
        for body in self.guards.values_mut() {
            body.agent.step(dt_seconds, &self.nav);
        }
        self.quarry.step(dt_seconds);
    }

    fn bodies(&self) -> impl Iterator<Item = (u64, Vec3)> + '_ {
        self.guards
            .iter()
            .map(|(id, body)| (*id, body.agent.position()))
            .chain(std::iter::once((self.quarry.id, self.quarry.position)))
    }

    /// Nearest body whose sphere the ray enters, skipping `from`.
    fn body_hit(&self, origin: Vec3, dir: Vec3, from: u64) -> Option<(f32, u64)> {
        let r2 = BODY_RADIUS * BODY_RADIUS;
        let mut best: Option<(f32, u64)> = None;
        for (id, centre) in self.bodies() {
            if id == from {
                continue;
            }
            let oc = centre - origin;
            let along = oc.dot(dir);
            let off2 = oc.length_squared() - along * along;
            if along < 0.0 || off2 > r2 {
                continue;
            }
            let t = (along - (r2 - off2).sqrt()).max(0.0);
            if t <= MAX_SIGHT && best.map(|(bt, _)| t < bt).unwrap_or(true) {
                best = Some((t, id));
            }
        }
        best
    }
}

impl WorldView for SimWorld {
    type Agent = u64;
}

impl WorldMut for SimWorld {}

impl NavWorldView for SimWorld {
    fn position(&self, entity: u64) -> Option<Vec3> {
        if entity == self.quarry.id {
            return Some(self.quarry.position);
        }
        self.guards.get(&entity).map(|body| body.agent.position())
    }

    fn forward(&self, entity: u64) -> Option<Vec3> {
        if entity == self.quarry.id {
            return Some(self.quarry.forward);
        }
        self.guards.get(&entity).map(|body| body.agent.forward())
    }

    fn navigator(&self) -> &dyn Navigator {
        &self.nav
    }

    fn pathfinding(&self, agent: u64) -> Option<&dyn PathfindingAgent> {
        self.guards
            .get(&agent)
            .map(|body| &body.agent as &dyn PathfindingAgent)
    }
}

impl NavWorldMut for SimWorld {
    fn pathfinding_mut(&mut self, agent: u64) -> Option<&mut dyn PathfindingAgent> {
        self.guards
            .get_mut(&agent)
            .map(|body| &mut body.agent as &mut dyn PathfindingAgent)
    }
}

impl GuardWorldView for SimWorld {
    fn velocity(&self, entity: u64) -> Option<Vec3> {
        if entity == self.quarry.id {
            return Some(self.quarry.velocity);
        }
        self.guards.get(&entity).map(|body| body.agent.velocity())
    }

    fn raycast(&self, from: u64, direction: Vec3) -> Option<RayHit<u64>> {
        let origin = self.position(from)?;
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let body = self.body_hit(origin, dir, from);
        let reach = body.map(|(t, _)| t).unwrap_or(MAX_SIGHT);
        if let Some(wall) = self.nav.raycast(origin, dir, reach) {
            return Some(RayHit {
                entity: None,
                point: wall.point,
                distance: wall.distance,
            });
        }

        body.map(|(t, id)| RayHit {
            entity: Some(id),
            point: origin + dir * t,
            distance: t,
        })
    }

    fn is_caught(&self, target: u64) -> bool {
        target == self.quarry.id && self.quarry.caught
    }
}

impl GuardWorldMut for SimWorld {
    fn catch_target(&mut self, target: u64) {
        if target == self.quarry.id {
            self.quarry.catch();
        } else {
            tracing::warn!(entity = target, "catch requested for unknown target");
        }
    }
}
