//! # Pathfinding
//!
//! Generic grid pathfinding used to validate room layouts.
//!
//! The engine is a classic A* over a rectangular grid of weighted nodes,
//! with the open set backed by an index-tracking binary heap. Unreachable
//! targets are an ordinary outcome, not an error: the layout validator
//! treats "no path" as a signal to reroll a room's template.

pub mod grid;
pub mod heap;

pub use grid::*;
pub use heap::*;
