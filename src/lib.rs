//! # Warren
//!
//! Procedural dungeon-floor generation for a top-down roguelike.
//!
//! ## Architecture Overview
//!
//! Warren grows a sparse graph of rooms over an integer sector lattice,
//! connects adjacent rooms with doors, and validates every room's interior
//! layout with tile-accurate pathfinding before committing anything to the
//! renderable tile buffers. The major pieces:
//!
//! - **Seeded randomness**: a single xorshift generator drives every draw, so
//!   a floor is reproducible from its seed
//! - **Pathfinding**: a generic grid A* backed by an index-tracking binary
//!   heap, used to prove each room is walkable between all of its doors
//! - **Room catalog**: immutable room templates bucketed by difficulty, with
//!   per-cell wall/floor classification and derived sector spans
//! - **Map graph**: the generator itself, including multi-sector room
//!   placement with transactional rollback and tile painting
//!
//! Rendering, input, and entity simulation are deliberately outside this
//! crate; generation produces plain data (sector map, doors, tile buffers)
//! for a renderer to consume.

pub mod catalog;
pub mod map;
pub mod pathing;
pub mod rng;

// Core module re-exports
pub use catalog::*;
pub use map::*;
pub use pathing::*;
pub use rng::*;

/// Core error type for the warren generation engine.
#[derive(thiserror::Error, Debug)]
pub enum WarrenError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Internal state is invalid
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Authored content (layouts, catalogs) is malformed
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Generation could not produce a valid floor
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the warren codebase.
pub type WarrenResult<T> = Result<T, WarrenError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation constants shared across the crate.
pub mod config {
    /// Base room width in tiles. Every room layout spans a whole number of
    /// base-sized sectors.
    pub const BASE_ROOM_X: i32 = 28;

    /// Base room height in tiles.
    pub const BASE_ROOM_Y: i32 = 16;

    /// Width of the connector gap between adjacent sectors.
    pub const DOOR_OFFSET: i32 = 1;

    /// Rows of wall face drawn below a wall boundary (the faux-3D front).
    pub const WALL_HEIGHT: i32 = 2;

    /// Default minimum room count on floor 1.
    pub const BASE_MIN_ROOMS: u32 = 8;

    /// Cap on RoomData rerolls per room before generation aborts.
    pub const MAX_LAYOUT_REROLLS: u32 = 256;

    /// Cap on random anchor offsets tried when placing a multi-sector room.
    pub const MAX_SPAN_ATTEMPTS: u32 = 16;
}
