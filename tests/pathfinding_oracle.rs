//! Cross-checks the grid A* against the `pathfinding` crate.
//!
//! Random walkable grids are generated from the crate's own seeded
//! generator; reachability must agree with the oracle, and when a path
//! exists its cost must be optimal.

use pathfinding::prelude::astar;
use warren::{GridPoint, PathGrid, SeededRandom};

const WIDTH: i32 = 24;
const HEIGHT: i32 = 16;

fn random_grid(rng: &mut SeededRandom) -> PathGrid {
    let mut grid = PathGrid::new(WIDTH as u32, HEIGHT as u32);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            // Roughly a quarter of the cells become walls.
            if rng.range_u32(0, 3) == 0 {
                grid.set_walkable(x, y, false);
            }
        }
    }
    grid
}

fn oracle_cost(
    grid: &PathGrid,
    start: GridPoint,
    goal: GridPoint,
    diagonals: bool,
) -> Option<i32> {
    let successors = |&(x, y): &(i32, i32)| {
        let mut next: Vec<((i32, i32), i32)> = Vec::new();
        let offsets: &[(i32, i32, i32)] = if diagonals {
            &[
                (-1, -1, 14),
                (-1, 0, 10),
                (-1, 1, 14),
                (0, -1, 10),
                (0, 1, 10),
                (1, -1, 14),
                (1, 0, 10),
                (1, 1, 14),
            ]
        } else {
            &[(-1, 0, 10), (1, 0, 10), (0, -1, 10), (0, 1, 10)]
        };
        for &(dx, dy, cost) in offsets {
            let nx = x + dx;
            let ny = y + dy;
            if grid.is_walkable(nx, ny) {
                next.push(((nx, ny), cost));
            }
        }
        next
    };
    astar(
        &(start.x, start.y),
        successors,
        |&(x, y)| {
            let dx = (x - goal.x).abs();
            let dy = (y - goal.y).abs();
            14 * dx.min(dy) + 10 * (dx - dy).abs()
        },
        |&p| p == (goal.x, goal.y),
    )
    .map(|(_, cost)| cost)
}

fn path_cost(start: GridPoint, path: &[GridPoint]) -> i32 {
    let mut cost = 0;
    let mut prev = start;
    for &p in path {
        cost += PathGrid::distance(prev, p);
        prev = p;
    }
    cost
}

fn check_agreement(seed: i64, diagonals: bool) {
    let mut rng = SeededRandom::from_seed(seed);
    let mut grid = random_grid(&mut rng);

    for _ in 0..20 {
        let start = GridPoint::new(
            rng.range_u32(0, WIDTH as u32 - 1) as i32,
            rng.range_u32(0, HEIGHT as u32 - 1) as i32,
        );
        let goal = GridPoint::new(
            rng.range_u32(0, WIDTH as u32 - 1) as i32,
            rng.range_u32(0, HEIGHT as u32 - 1) as i32,
        );
        if !grid.is_walkable(start.x, start.y) || !grid.is_walkable(goal.x, goal.y) {
            continue;
        }

        let ours = grid.find_path(start, goal, diagonals);
        let oracle = oracle_cost(&grid, start, goal, diagonals);
        match (ours, oracle) {
            (Some(path), Some(cost)) => {
                assert_eq!(
                    path_cost(start, &path),
                    cost,
                    "suboptimal path from {start:?} to {goal:?} (seed {seed})"
                );
                // The path is continuous, walkable, and ends at the goal.
                if start != goal {
                    assert_eq!(path.last(), Some(&goal));
                }
                let mut prev = start;
                for p in &path {
                    let step = PathGrid::distance(prev, *p);
                    assert!(step == 10 || step == 14, "non-adjacent step to {p:?}");
                    assert!(grid.is_walkable(p.x, p.y));
                    prev = *p;
                }
            }
            (None, None) => {}
            (ours, oracle) => panic!(
                "reachability disagreement from {start:?} to {goal:?} (seed {seed}): ours {:?}, oracle {:?}",
                ours.map(|p| p.len()),
                oracle
            ),
        }
    }
}

#[test]
fn test_cardinal_agreement_across_seeds() {
    for seed in 1..=15 {
        check_agreement(seed, false);
    }
}

#[test]
fn test_diagonal_agreement_across_seeds() {
    for seed in 101..=115 {
        check_agreement(seed, true);
    }
}
