use std::collections::BTreeMap;

use warden_core::DeterministicRng;
use warden_nav::Vec3;

use crate::config::PatrolPointConfig;
use crate::{FsmError, Result};

/// Index of a point inside the [`PatrolGraph`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatrolPointId(u32);

impl PatrolPointId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatrolPoint {
    name: String,
    position: Vec3,
    neighbors: Vec<PatrolPointId>,
}

impl PatrolPoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn neighbors(&self) -> &[PatrolPointId] {
        &self.neighbors
    }
}

/// Undirected network of waypoints guards wander between. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatrolGraph {
    points: Vec<PatrolPoint>,
}

impl PatrolGraph {
    pub fn builder() -> PatrolGraphBuilder {
        PatrolGraphBuilder::default()
    }

    /// Build from authored points; neighbor names are resolved and links made symmetric.
    pub fn from_config(points: &[PatrolPointConfig]) -> Result<Self> {
        let mut builder = Self::builder();
        let mut ids = BTreeMap::new();
        for point in points {
            if ids.contains_key(point.name.as_str()) {
                return Err(FsmError::DuplicatePatrolPoint(point.name.clone()));
            }
            let id = builder.add_point(point.name.clone(), point.position);
            ids.insert(point.name.as_str(), id);
        }

        for point in points {
            let from = ids[point.name.as_str()];
            for neighbor in &point.neighbors {
                let to = *ids
                    .get(neighbor.as_str())
                    .ok_or_else(|| FsmError::UnknownPatrolPoint(neighbor.clone()))?;
                builder.connect(from, to);
            }
        }

        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PatrolPointId) -> Option<&PatrolPoint> {
        self.points.get(id.index())
    }

    /// Like [`PatrolGraph::get`] for ids known to come from this graph.
    ///
    /// # Panics
    /// If `id` was issued by a different, smaller graph.
    pub fn point(&self, id: PatrolPointId) -> &PatrolPoint {
        &self.points[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<PatrolPointId> {
        self.points
            .iter()
            .position(|p| p.name == name)
            .map(|idx| PatrolPointId(idx as u32))
    }

    pub fn contains(&self, id: PatrolPointId) -> bool {
        id.index() < self.points.len()
    }

    /// Pick the point to walk to after `current`.
    ///
    /// Any neighbor except `previous` is eligible, uniformly at random. When no other neighbor
    /// remains, `previous` is returned (falling back to `current` if there is no previous point),
    /// so a dead end turns the guard around and a single-neighbor pair ping-pongs.
    pub fn choose_next(
        &self,
        current: PatrolPointId,
        previous: Option<PatrolPointId>,
        rng: &mut impl DeterministicRng,
    ) -> Option<PatrolPointId> {
        let point = self.get(current)?;
        let candidates: Vec<PatrolPointId> = point
            .neighbors
            .iter()
            .copied()
            .filter(|n| Some(*n) != previous)
            .collect();

        if candidates.is_empty() {
            return Some(previous.unwrap_or(current));
        }

        Some(candidates[rng.next_index(candidates.len())])
    }
}

#[derive(Debug, Default)]
pub struct PatrolGraphBuilder {
    points: Vec<PatrolPoint>,
}

impl PatrolGraphBuilder {
    pub fn add_point(&mut self, name: impl Into<String>, position: Vec3) -> PatrolPointId {
        let id = PatrolPointId(self.points.len() as u32);
        self.points.push(PatrolPoint {
            name: name.into(),
            position,
            neighbors: Vec::new(),
        });
        id
    }

    /// Link two points both ways. Linking a point to itself is allowed.
    ///
    /// # Panics
    /// If either id was not returned by this builder.
    pub fn connect(&mut self, a: PatrolPointId, b: PatrolPointId) -> &mut Self {
        self.link(a, b);
        self.link(b, a);
        self
    }

    fn link(&mut self, from: PatrolPointId, to: PatrolPointId) {
        let neighbors = &mut self.points[from.index()].neighbors;
        if !neighbors.contains(&to) {
            neighbors.push(to);
        }
    }

    pub fn build(self) -> PatrolGraph {
        PatrolGraph {
            points: self.points,
        }
    }
}
