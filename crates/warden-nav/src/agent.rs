use crate::{NavPath, Navigator, Vec3};

/// Movement capability of a pathfinding agent, as seen by behavior code.
///
/// A destination is a request; the agent (or the engine behind it) produces motion towards it
/// along navigable terrain. Setting a new destination implicitly cancels the previous one.
pub trait PathfindingAgent {
    fn destination(&self) -> Option<Vec3>;

    fn set_destination(&mut self, point: Vec3);

    fn clear_destination(&mut self);

    /// Distance left along the current path; `0.0` when there is no destination.
    fn remaining_distance(&self) -> f32;

    /// Tolerance under which the agent counts as arrived.
    fn stopping_distance(&self) -> f32;

    fn velocity(&self) -> Vec3;

    fn set_velocity(&mut self, velocity: Vec3);

    fn is_stopped(&self) -> bool;

    fn set_stopped(&mut self, stopped: bool);

    fn within_stopping_distance(&self) -> bool {
        self.remaining_distance() <= self.stopping_distance()
    }
}

/// Reference [`PathfindingAgent`] that follows paths produced by any [`Navigator`].
///
/// Paths are planned lazily on the next [`NavAgent::step`] after a destination change. A
/// destination the navigator cannot reach is dropped, which reads as "arrived" to behavior code
/// so it picks something else on the following tick.
#[derive(Debug, Clone)]
pub struct NavAgent {
    position: Vec3,
    forward: Vec3,
    speed: f32,
    stopping_distance: f32,
    velocity: Vec3,
    is_stopped: bool,
    destination: Option<Vec3>,
    path: Option<NavPath>,
    next_index: usize,
}

impl NavAgent {
    pub fn new(position: Vec3, speed: f32, stopping_distance: f32) -> Self {
        Self {
            position,
            forward: Vec3::FORWARD,
            speed: speed.max(0.0),
            stopping_distance: stopping_distance.max(0.0),
            velocity: Vec3::ZERO,
            is_stopped: false,
            destination: None,
            path: None,
            next_index: 1,
        }
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        let forward = forward.normalize_or_zero();
        if forward != Vec3::ZERO {
            self.forward = forward;
        }
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }

    /// Teleport; the current path is replanned on the next step.
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.path = None;
        self.next_index = 1;
    }

    pub fn step(&mut self, dt_seconds: f32, navigator: &dyn Navigator) {
        if self.is_stopped {
            self.velocity = Vec3::ZERO;
            return;
        }

        let Some(goal) = self.destination else {
            self.velocity = Vec3::ZERO;
            return;
        };

        if self.path.is_none() {
            match navigator.find_path(self.position, goal) {
                Some(path) => {
                    self.path = Some(path);
                    self.next_index = 1;
                }
                None => {
                    tracing::trace!(?goal, "destination unreachable, dropping it");
                    self.destination = None;
                    self.velocity = Vec3::ZERO;
                    return;
                }
            }
        }

        if self.within_stopping_distance() {
            self.velocity = Vec3::ZERO;
            return;
        }

        let Some(path) = &self.path else {
            return;
        };

        let dt = dt_seconds.max(0.0);
        if dt <= 0.0 {
            return;
        }

        let start = self.position;
        let mut budget = self.speed * dt;
        let mut current = start;
        while self.next_index < path.points.len() && budget > 0.0 {
            let target = path.points[self.next_index].with_y(current.y);
            let to_target = target - current;
            let dist = to_target.length();

            if dist <= f32::EPSILON {
                self.next_index += 1;
                continue;
            }

            if budget >= dist {
                current = target;
                self.next_index += 1;
                budget -= dist;
                continue;
            }

            current = current + to_target * (budget / dist);
            break;
        }

        let moved = current - start;
        self.position = current;
        self.velocity = moved * (1.0 / dt);
        let heading = moved.with_y(0.0).normalize_or_zero();
        if heading != Vec3::ZERO {
            self.forward = heading;
        }
    }
}

impl PathfindingAgent for NavAgent {
    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn set_destination(&mut self, point: Vec3) {
        if self.destination == Some(point) {
            return;
        }
        self.destination = Some(point);
        self.path = None;
        self.next_index = 1;
    }

    fn clear_destination(&mut self) {
        self.destination = None;
        self.path = None;
        self.next_index = 1;
    }

    fn remaining_distance(&self) -> f32 {
        let Some(goal) = self.destination else {
            return 0.0;
        };

        let Some(path) = &self.path else {
            return self.position.with_y(0.0).distance(goal.with_y(0.0));
        };

        let mut total = 0.0;
        let mut from = self.position.with_y(0.0);
        for point in path.points.iter().skip(self.next_index) {
            let to = point.with_y(0.0);
            total += from.distance(to);
            from = to;
        }
        total
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.is_stopped = stopped;
    }
}
