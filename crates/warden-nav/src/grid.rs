use crate::{NavPath, NavRaycastHit, Navigator, Vec3};
use core::cmp::Ordering;
use std::collections::BinaryHeap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Cell {
    x: i32,
    z: i32,
}

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    cell: Cell,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, Cell, u64) {
        (self.f, self.g, self.cell, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Uniform occupancy grid on the XZ plane, with its origin at world `(0, floor_y, 0)`.
///
/// Cells outside the grid count as blocked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavGrid {
    width: i32,
    depth: i32,
    cell_size: f32,
    floor_y: f32,
    blocked: Vec<bool>,
}

impl NavGrid {
    /// Largest supported cell count; keeps every cell index inside `i32`.
    pub const MAX_CELLS: u64 = 1 << 24;

    pub fn new(width: u32, depth: u32, cell_size: f32) -> Self {
        assert!(width > 0 && depth > 0, "grid must be non-empty");
        assert!(
            u64::from(width) * u64::from(depth) <= Self::MAX_CELLS,
            "grid exceeds {} cells",
            Self::MAX_CELLS
        );
        assert!(cell_size > 0.0, "cell_size must be > 0");
        let width = width as i32;
        let depth = depth as i32;
        Self {
            width,
            depth,
            cell_size,
            floor_y: 0.0,
            blocked: vec![false; (width * depth) as usize],
        }
    }

    pub fn with_floor_y(mut self, floor_y: f32) -> Self {
        self.floor_y = floor_y;
        self
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn depth(&self) -> u32 {
        self.depth as u32
    }

    pub fn set_blocked(&mut self, x: i32, z: i32, blocked: bool) {
        if let Some(idx) = self.idx(Cell { x, z }) {
            self.blocked[idx] = blocked;
        }
    }

    pub fn is_blocked(&self, x: i32, z: i32) -> bool {
        self.idx(Cell { x, z })
            .map(|idx| self.blocked[idx])
            .unwrap_or(true)
    }

    /// Whether `point` projects onto a walkable cell.
    pub fn is_walkable(&self, point: Vec3) -> bool {
        self.world_to_cell(point)
            .and_then(|cell| self.idx(cell))
            .map(|idx| !self.blocked[idx])
            .unwrap_or(false)
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.z >= 0 && cell.x < self.width && cell.z < self.depth
    }

    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.z * self.width + cell.x) as usize)
    }

    fn unclamped_cell(&self, p: Vec3) -> Cell {
        Cell {
            x: (p.x / self.cell_size).floor() as i32,
            z: (p.z / self.cell_size).floor() as i32,
        }
    }

    fn world_to_cell(&self, p: Vec3) -> Option<Cell> {
        let cell = self.unclamped_cell(p);
        if self.in_bounds(cell) {
            Some(cell)
        } else {
            None
        }
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        Vec3::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            self.floor_y,
            (cell.z as f32 + 0.5) * self.cell_size,
        )
    }

    /// Closest point to `p` strictly inside `cell`, so it maps back onto the same cell.
    fn closest_point_in_cell(&self, cell: Cell, p: Vec3) -> Vec3 {
        let inset = self.cell_size * 1e-3;
        let min_x = cell.x as f32 * self.cell_size + inset;
        let min_z = cell.z as f32 * self.cell_size + inset;
        let max_x = (cell.x + 1) as f32 * self.cell_size - inset;
        let max_z = (cell.z + 1) as f32 * self.cell_size - inset;
        Vec3::new(
            p.x.clamp(min_x, max_x),
            self.floor_y,
            p.z.clamp(min_z, max_z),
        )
    }

    fn heuristic(&self, a: Cell, b: Cell) -> u32 {
        ((a.x - b.x).abs() + (a.z - b.z).abs()) as u32
    }

    fn neighbors(&self, cell: Cell) -> [Cell; 4] {
        // Fixed order for determinism: -Z, +X, +Z, -X.
        [
            Cell {
                x: cell.x,
                z: cell.z - 1,
            },
            Cell {
                x: cell.x + 1,
                z: cell.z,
            },
            Cell {
                x: cell.x,
                z: cell.z + 1,
            },
            Cell {
                x: cell.x - 1,
                z: cell.z,
            },
        ]
    }

    fn reconstruct_path(&self, came_from: &[Option<usize>], mut current: usize) -> Vec<usize> {
        let mut out = vec![current];
        while let Some(prev) = came_from[current] {
            current = prev;
            out.push(current);
        }
        out.reverse();
        out
    }

    fn cell_from_idx(&self, idx: usize) -> Cell {
        let idx = idx as i32;
        Cell {
            x: idx % self.width,
            z: idx / self.width,
        }
    }

    fn a_star(&self, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
        let start_idx = self.idx(start)?;
        let goal_idx = self.idx(goal)?;
        if self.blocked[start_idx] || self.blocked[goal_idx] {
            return None;
        }

        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        let grid_len = (self.width * self.depth) as usize;
        let mut g_score = vec![u32::MAX; grid_len];
        let mut came_from: Vec<Option<usize>> = vec![None; grid_len];

        g_score[start_idx] = 0;
        open.push(OpenNode {
            f: self.heuristic(start, goal),
            g: 0,
            cell: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if node.cell == goal {
                let idx_path = self.reconstruct_path(&came_from, goal_idx);
                return Some(idx_path.into_iter().map(|i| self.cell_from_idx(i)).collect());
            }

            let node_idx = self.idx(node.cell)?;
            if node.g != g_score[node_idx] {
                // Stale heap entry.
                continue;
            }

            for n in self.neighbors(node.cell) {
                let Some(n_idx) = self.idx(n) else { continue };
                if self.blocked[n_idx] {
                    continue;
                }

                let tentative_g = node.g.saturating_add(1);
                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(node_idx);
                g_score[n_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(self.heuristic(n, goal)),
                    g: tentative_g,
                    cell: n,
                    tie,
                });
                tie += 1;
            }
        }

        None
    }
}

impl Navigator for NavGrid {
    fn find_path(&self, start: Vec3, goal: Vec3) -> Option<NavPath> {
        let start = start.with_y(self.floor_y);
        let goal = goal.with_y(self.floor_y);
        let start_cell = self.world_to_cell(start)?;
        let goal_cell = self.world_to_cell(goal)?;
        let cells = self.a_star(start_cell, goal_cell)?;

        // Preserve exact endpoints for nicer movement.
        let inner_len = cells.len().saturating_sub(2);
        let mut points = Vec::with_capacity(cells.len().saturating_add(1));
        points.push(start);

        if cells.len() >= 2 {
            for cell in cells.into_iter().skip(1).take(inner_len) {
                points.push(self.cell_center(cell));
            }
        }

        points.push(goal);
        Some(NavPath::new(points))
    }

    fn sample_point_near(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        if !point.is_finite() || !(radius >= 0.0) {
            return None;
        }

        let vertical = (point.y - self.floor_y).abs();
        if vertical > radius {
            return None;
        }
        let flat_radius = (radius * radius - vertical * vertical).max(0.0).sqrt();
        let projected = point.with_y(self.floor_y);

        if self.is_walkable(projected) {
            return Some(projected);
        }

        let center = self.unclamped_cell(projected);
        let reach = (flat_radius / self.cell_size).ceil() as i32 + 1;
        let max_d2 = flat_radius * flat_radius;

        // Row-major scan keeps ties deterministic: first candidate at the minimum distance wins.
        let mut best: Option<(f32, Vec3)> = None;
        for dz in -reach..=reach {
            for dx in -reach..=reach {
                let cell = Cell {
                    x: center.x + dx,
                    z: center.z + dz,
                };
                let Some(idx) = self.idx(cell) else { continue };
                if self.blocked[idx] {
                    continue;
                }

                let candidate = self.closest_point_in_cell(cell, projected);
                let d2 = candidate.distance_squared(projected);
                if d2 > max_d2 {
                    continue;
                }
                if best.map(|(best_d2, _)| d2 < best_d2).unwrap_or(true) {
                    best = Some((d2, candidate));
                }
            }
        }

        best.map(|(_, p)| p)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<NavRaycastHit> {
        let dir = direction.with_y(0.0).normalize_or_zero();
        if dir == Vec3::ZERO || !(max_distance > 0.0) {
            return None;
        }

        let origin = origin.with_y(self.floor_y);
        let step = self.cell_size * 0.25;
        let mut t = 0.0f32;
        while t <= max_distance {
            let p = origin + dir * t;
            if !self.is_walkable(p) {
                return Some(NavRaycastHit {
                    point: p,
                    distance: t,
                });
            }
            t += step;
        }

        None
    }
}
