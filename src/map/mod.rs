//! # Map Graph
//!
//! Sectors, rooms, doors, and the floor generator itself.
//!
//! A floor is a sparse graph of rooms keyed by integer sectors. Each sector
//! is one cell of the room lattice; a normal room occupies one sector and a
//! large room several contiguous ones, every one of which maps back to the
//! owning room. World-space geometry (room origins, sector centers) derives
//! from the base room size and the one-tile door gap between sectors.

pub mod door;
pub mod events;
pub mod generator;
pub mod room;
pub mod tiles;

pub use door::*;
pub use events::*;
pub use generator::*;
pub use room::*;
pub use tiles::*;

use crate::config;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Index of a room in the generator's arena.
pub type RoomId = usize;

/// Index of a door in the generator's arena.
pub type DoorId = usize;

/// Opaque id of an entity crossing doors. Assigned by the caller.
pub type EntityId = u64;

/// One cell of the room lattice.
///
/// The z axis is reserved for sub-floor layering and stays 0 for now. The
/// derived ordering keys sector maps deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Sector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Sector {
    /// The spawn sector at the lattice origin.
    pub const ZERO: Sector = Sector { x: 0, y: 0, z: 0 };

    /// Unit step upward on the lattice.
    pub const UP: Sector = Sector { x: 0, y: 1, z: 0 };
    /// Unit step downward.
    pub const DOWN: Sector = Sector { x: 0, y: -1, z: 0 };
    /// Unit step left.
    pub const LEFT: Sector = Sector { x: -1, y: 0, z: 0 };
    /// Unit step right.
    pub const RIGHT: Sector = Sector { x: 1, y: 0, z: 0 };

    /// Creates a sector on layer 0.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// The four lattice-adjacent sectors, in up/down/left/right order.
    pub fn cardinal_neighbors(self) -> [Sector; 4] {
        [
            self + Self::UP,
            self + Self::DOWN,
            self + Self::LEFT,
            self + Self::RIGHT,
        ]
    }

    /// World-space bottom-left corner of this sector.
    pub fn origin(self) -> TilePos {
        TilePos {
            x: self.x * (config::BASE_ROOM_X + config::DOOR_OFFSET),
            y: self.y * (config::BASE_ROOM_Y + config::DOOR_OFFSET),
            z: self.z,
        }
    }

    /// World-space center tile of this sector.
    pub fn center(self) -> TilePos {
        let origin = self.origin();
        TilePos {
            x: origin.x + config::BASE_ROOM_X / 2,
            y: origin.y + config::BASE_ROOM_Y / 2,
            z: origin.z,
        }
    }
}

impl Add for Sector {
    type Output = Sector;

    fn add(self, other: Sector) -> Sector {
        Sector {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Sector {
    type Output = Sector;

    fn sub(self, other: Sector) -> Sector {
        Sector {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/// A world-space tile position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TilePos {
    /// Creates a tile position on layer 0.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// This position shifted by (dx, dy) on the same layer.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }
}

impl Add for TilePos {
    type Output = TilePos;

    fn add(self, other: TilePos) -> TilePos {
        TilePos {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for TilePos {
    type Output = TilePos;

    fn sub(self, other: TilePos) -> TilePos {
        TilePos {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_origin_spacing() {
        assert_eq!(Sector::ZERO.origin(), TilePos::new(0, 0));
        assert_eq!(Sector::new(1, 0).origin(), TilePos::new(29, 0));
        assert_eq!(Sector::new(-1, 0).origin(), TilePos::new(-29, 0));
        assert_eq!(Sector::new(0, 2).origin(), TilePos::new(0, 34));
    }

    #[test]
    fn test_sector_center() {
        assert_eq!(Sector::ZERO.center(), TilePos::new(14, 8));
        assert_eq!(Sector::new(1, 1).center(), TilePos::new(43, 25));
    }

    #[test]
    fn test_cardinal_neighbors() {
        let neighbors = Sector::new(3, -2).cardinal_neighbors();
        assert_eq!(neighbors[0], Sector::new(3, -1));
        assert_eq!(neighbors[1], Sector::new(3, -3));
        assert_eq!(neighbors[2], Sector::new(2, -2));
        assert_eq!(neighbors[3], Sector::new(4, -2));
    }

    #[test]
    fn test_sector_ordering_is_stable() {
        let mut sectors = vec![Sector::new(1, 0), Sector::new(0, 1), Sector::new(0, 0)];
        sectors.sort();
        assert_eq!(
            sectors,
            vec![Sector::new(0, 0), Sector::new(0, 1), Sector::new(1, 0)]
        );
    }
}
