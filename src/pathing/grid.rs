//! # Path Grid
//!
//! 2D grid of weighted nodes with A* shortest-path queries.
//!
//! Grids can wrap a region of world space (nodes spaced by a diameter) or be
//! purely abstract with unit spacing, which is how room-layout validation
//! uses them. Nodes default to walkable; callers flip walkability to match
//! whatever they are validating.

use crate::pathing::heap::{HeapItem, SlabHeap, NOT_IN_HEAP};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Cost of a straight step, scaled by 10 to stay in integers.
pub const STRAIGHT_COST: i32 = 10;

/// Cost of a diagonal step.
pub const DIAGONAL_COST: i32 = 14;

const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];
const ALL_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A cell coordinate on a [`PathGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    /// Creates a new grid point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One node of a [`PathGrid`].
///
/// Carries the A* bookkeeping (costs, parent, heap index) alongside the
/// walkable flag and the node's position in grid and world space.
#[derive(Debug, Clone)]
pub struct PathNode {
    pub walkable: bool,
    pub world: (f32, f32),
    pub grid_x: i32,
    pub grid_y: i32,
    pub g_cost: i32,
    pub h_cost: i32,
    pub parent: Option<usize>,
    heap_index: usize,
}

impl PathNode {
    fn new(world: (f32, f32), grid_x: i32, grid_y: i32) -> Self {
        Self {
            walkable: true,
            world,
            grid_x,
            grid_y,
            g_cost: 0,
            h_cost: 0,
            parent: None,
            heap_index: NOT_IN_HEAP,
        }
    }

    /// Total cost used for heap ordering.
    pub fn f_cost(&self) -> i32 {
        self.g_cost + self.h_cost
    }

    /// The node's coordinate as a [`GridPoint`].
    pub fn point(&self) -> GridPoint {
        GridPoint::new(self.grid_x, self.grid_y)
    }
}

impl HeapItem for PathNode {
    fn heap_cmp(&self, other: &Self) -> Ordering {
        self.f_cost()
            .cmp(&other.f_cost())
            .then(self.h_cost.cmp(&other.h_cost))
    }

    fn heap_index(&self) -> usize {
        self.heap_index
    }

    fn set_heap_index(&mut self, index: usize) {
        self.heap_index = index;
    }
}

/// Rectangular grid of [`PathNode`]s supporting A* queries.
///
/// # Examples
///
/// ```
/// use warren::{GridPoint, PathGrid};
///
/// let mut grid = PathGrid::new(5, 5);
/// grid.set_walkable(2, 0, false);
/// grid.set_walkable(2, 1, false);
/// grid.set_walkable(2, 2, false);
///
/// let path = grid
///     .find_path(GridPoint::new(0, 0), GridPoint::new(4, 0), false)
///     .unwrap();
/// assert_eq!(path.last(), Some(&GridPoint::new(4, 0)));
/// ```
#[derive(Debug, Clone)]
pub struct PathGrid {
    width: i32,
    height: i32,
    node_radius: f32,
    origin: (f32, f32),
    nodes: Vec<PathNode>,
}

impl PathGrid {
    /// Creates an abstract unit-spaced grid with its origin at (0, 0).
    ///
    /// All nodes start walkable.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_layout(width as f32, height as f32, 0.5, (0.0, 0.0))
    }

    /// Creates a grid covering a world-space region.
    ///
    /// The node count per axis is the world size divided by the node
    /// diameter, rounded to the nearest integer.
    pub fn from_world(world_size: (f32, f32), node_radius: f32, origin: (f32, f32)) -> Self {
        Self::with_layout(world_size.0, world_size.1, node_radius, origin)
    }

    fn with_layout(world_w: f32, world_h: f32, node_radius: f32, origin: (f32, f32)) -> Self {
        let diameter = node_radius * 2.0;
        let width = (world_w / diameter).round() as i32;
        let height = (world_h / diameter).round() as i32;
        let width = width.max(0);
        let height = height.max(0);

        let mut nodes = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let world = (
                    origin.0 + x as f32 * diameter,
                    origin.1 + y as f32 * diameter,
                );
                nodes.push(PathNode::new(world, x, y));
            }
        }
        Self {
            width,
            height,
            node_radius,
            origin,
            nodes,
        }
    }

    /// Grid width in nodes.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in nodes.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total node count.
    pub fn area(&self) -> usize {
        self.nodes.len()
    }

    /// Node radius the grid was built with.
    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Borrows the node at (x, y).
    ///
    /// Returns `None` outside the grid.
    pub fn node(&self, x: i32, y: i32) -> Option<&PathNode> {
        if self.in_bounds(x, y) {
            Some(&self.nodes[self.index(x, y)])
        } else {
            None
        }
    }

    /// Sets the walkable flag of the node at (x, y). Out-of-bounds
    /// coordinates are ignored.
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.nodes[idx].walkable = walkable;
        }
    }

    /// Whether the node at (x, y) is walkable. Out-of-bounds is not.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.node(x, y).map(|n| n.walkable).unwrap_or(false)
    }

    /// Clamps a point into grid bounds.
    pub fn clamp_point(&self, p: GridPoint) -> GridPoint {
        GridPoint::new(
            p.x.clamp(0, (self.width - 1).max(0)),
            p.y.clamp(0, (self.height - 1).max(0)),
        )
    }

    /// The grid point containing a world position, clamped into bounds.
    pub fn point_from_world(&self, world: (f32, f32)) -> GridPoint {
        let diameter = self.node_radius * 2.0;
        let x = ((world.0 - self.origin.0) / diameter).floor() as i32;
        let y = ((world.1 - self.origin.1) / diameter).floor() as i32;
        self.clamp_point(GridPoint::new(x, y))
    }

    /// Octile distance between two cells, in step-cost units.
    pub fn distance(a: GridPoint, b: GridPoint) -> i32 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        DIAGONAL_COST * dx.min(dy) + STRAIGHT_COST * (dx - dy).abs()
    }

    /// Finds the cheapest path from `start` to `target`.
    ///
    /// Both endpoints are clamped into grid bounds. The returned path is
    /// ordered from `start` to `target` and excludes `start` itself; `None`
    /// means the target is unreachable through walkable nodes, which is an
    /// expected outcome for callers validating layouts.
    pub fn find_path(
        &mut self,
        start: GridPoint,
        target: GridPoint,
        include_diagonals: bool,
    ) -> Option<Vec<GridPoint>> {
        if self.nodes.is_empty() {
            return None;
        }
        let start = self.clamp_point(start);
        let target = self.clamp_point(target);
        let start_id = self.index(start.x, start.y);
        let target_id = self.index(target.x, target.y);

        for node in &mut self.nodes {
            node.g_cost = 0;
            node.h_cost = 0;
            node.parent = None;
            node.heap_index = NOT_IN_HEAP;
        }

        let offsets: &[(i32, i32)] = if include_diagonals {
            &ALL_OFFSETS
        } else {
            &CARDINAL_OFFSETS
        };
        let mut closed = vec![false; self.nodes.len()];
        let mut open: SlabHeap<PathNode> = SlabHeap::with_capacity(self.nodes.len());
        open.push(&mut self.nodes, start_id);

        while let Some(current) = open.pop(&mut self.nodes) {
            closed[current] = true;
            if current == target_id {
                return Some(self.retrace(start_id, target_id));
            }

            let cx = self.nodes[current].grid_x;
            let cy = self.nodes[current].grid_y;
            for &(dx, dy) in offsets {
                let nx = cx + dx;
                let ny = cy + dy;
                if !self.in_bounds(nx, ny) {
                    continue;
                }
                let neighbor = self.index(nx, ny);
                if !self.nodes[neighbor].walkable || closed[neighbor] {
                    continue;
                }

                let step = Self::distance(GridPoint::new(cx, cy), GridPoint::new(nx, ny));
                let tentative = self.nodes[current].g_cost + step;
                let queued = open.contains(&self.nodes, neighbor);
                if tentative < self.nodes[neighbor].g_cost || !queued {
                    self.nodes[neighbor].g_cost = tentative;
                    self.nodes[neighbor].h_cost =
                        Self::distance(GridPoint::new(nx, ny), target);
                    self.nodes[neighbor].parent = Some(current);
                    if queued {
                        open.update(&mut self.nodes, neighbor);
                    } else {
                        open.push(&mut self.nodes, neighbor);
                    }
                }
            }
        }
        None
    }

    fn retrace(&self, start_id: usize, target_id: usize) -> Vec<GridPoint> {
        let mut path = Vec::new();
        let mut current = target_id;
        while current != start_id {
            path.push(self.nodes[current].point());
            let Some(parent) = self.nodes[current].parent else {
                break;
            };
            current = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_walls(width: u32, height: u32, walls: &[(i32, i32)]) -> PathGrid {
        let mut grid = PathGrid::new(width, height);
        for &(x, y) in walls {
            grid.set_walkable(x, y, false);
        }
        grid
    }

    #[test]
    fn test_straight_path() {
        let mut grid = PathGrid::new(10, 10);
        let path = grid
            .find_path(GridPoint::new(0, 0), GridPoint::new(4, 0), false)
            .unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&GridPoint::new(4, 0)));
        assert!(!path.contains(&GridPoint::new(0, 0)));
    }

    #[test]
    fn test_path_routes_around_wall() {
        // Vertical wall with a gap at the bottom.
        let walls: Vec<(i32, i32)> = (1..5).map(|y| (2, y)).collect();
        let mut grid = grid_with_walls(5, 5, &walls);

        let path = grid
            .find_path(GridPoint::new(0, 2), GridPoint::new(4, 2), false)
            .unwrap();
        assert_eq!(path.last(), Some(&GridPoint::new(4, 2)));
        for p in &path {
            assert!(grid.is_walkable(p.x, p.y));
        }
    }

    #[test]
    fn test_no_path_when_sealed() {
        let walls: Vec<(i32, i32)> = (0..5).map(|y| (2, y)).collect();
        let mut grid = grid_with_walls(5, 5, &walls);

        let result = grid.find_path(GridPoint::new(0, 2), GridPoint::new(4, 2), false);
        assert!(result.is_none());
    }

    #[test]
    fn test_diagonal_flag_changes_reachability() {
        // Two walls leaving only a diagonal gap.
        let mut grid = grid_with_walls(3, 3, &[(1, 0), (0, 1), (2, 1), (1, 2)]);

        assert!(grid
            .find_path(GridPoint::new(0, 0), GridPoint::new(2, 2), false)
            .is_none());
        assert!(grid
            .find_path(GridPoint::new(0, 0), GridPoint::new(2, 2), true)
            .is_some());
    }

    #[test]
    fn test_start_equals_target() {
        let mut grid = PathGrid::new(4, 4);
        let path = grid
            .find_path(GridPoint::new(2, 2), GridPoint::new(2, 2), false)
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_endpoints_clamped_into_bounds() {
        let mut grid = PathGrid::new(4, 4);
        let path = grid
            .find_path(GridPoint::new(-3, 0), GridPoint::new(99, 0), false)
            .unwrap();
        assert_eq!(path.last(), Some(&GridPoint::new(3, 0)));
    }

    #[test]
    fn test_octile_distance() {
        let a = GridPoint::new(0, 0);
        assert_eq!(PathGrid::distance(a, GridPoint::new(3, 0)), 30);
        assert_eq!(PathGrid::distance(a, GridPoint::new(3, 3)), 42);
        assert_eq!(PathGrid::distance(a, GridPoint::new(5, 2)), 58);
    }

    #[test]
    fn test_repeated_queries_reset_state() {
        let mut grid = grid_with_walls(6, 6, &[(3, 1), (3, 2), (3, 3)]);

        let first = grid
            .find_path(GridPoint::new(0, 2), GridPoint::new(5, 2), false)
            .unwrap();
        let second = grid
            .find_path(GridPoint::new(0, 2), GridPoint::new(5, 2), false)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_world_space_grid() {
        let grid = PathGrid::from_world((10.0, 6.0), 1.0, (0.0, 0.0));
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);

        let p = grid.point_from_world((4.5, 2.1));
        assert_eq!(p, GridPoint::new(2, 1));
    }

    #[test]
    fn test_unwalkable_target_unreachable() {
        let mut grid = grid_with_walls(4, 4, &[(3, 3)]);
        assert!(grid
            .find_path(GridPoint::new(0, 0), GridPoint::new(3, 3), true)
            .is_none());
    }
}
