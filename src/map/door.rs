//! # Doors
//!
//! Connections between two adjacent sectors.
//!
//! A door joins exactly one unordered sector pair, stored as ordered
//! low/high references so room-entry logic can tell which side an entity
//! crossed from purely by the sign of its position delta. Orientation is
//! derived from the sector offset; a delta that does not differ in exactly
//! one axis is a generation bug and is rejected without touching state.

use crate::map::{Room, Sector, TilePos};
use crate::pathing::GridPoint;
use crate::{WarrenError, WarrenResult};
use log::warn;
use serde::{Deserialize, Serialize};

/// Which way a door faces. Horizontal doors join left/right neighbors,
/// vertical doors join up/down neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Tile footprint (width, height) a door of this orientation occupies,
    /// extending down and left from its position.
    pub fn footprint(self) -> (i32, i32) {
        match self {
            Orientation::Horizontal => (2, 2),
            Orientation::Vertical => (2, 4),
        }
    }
}

/// A door between two adjacent sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: usize,
    /// World-space tile position at the midpoint between the two sectors.
    pub position: TilePos,
    pub orientation: Orientation,
    /// Neighbor below or to the left, depending on orientation.
    pub low: Sector,
    /// Neighbor above or to the right.
    pub high: Sector,
    pub open: bool,
}

impl Door {
    /// Creates a door between two adjacent sectors.
    ///
    /// The sector delta must differ in exactly one of x and y, on the same
    /// layer. Anything else is an invariant violation: it is logged and
    /// rejected, leaving no partial state behind.
    pub fn spawn(id: usize, a: Sector, b: Sector) -> WarrenResult<Door> {
        let delta = a - b;
        let orientation = if delta.x != 0 && delta.y == 0 && delta.z == 0 {
            Orientation::Horizontal
        } else if delta.y != 0 && delta.x == 0 && delta.z == 0 {
            Orientation::Vertical
        } else {
            warn!("cannot place a door between non-adjacent sectors {a:?} and {b:?}");
            return Err(WarrenError::InvalidState(format!(
                "door between non-adjacent sectors {a:?} and {b:?}"
            )));
        };

        let center_a = a.center();
        let center_b = b.center();
        let position = TilePos {
            x: (center_a.x + center_b.x) / 2,
            y: (center_a.y + center_b.y) / 2,
            z: center_a.z,
        };

        let (low, high) = match orientation {
            Orientation::Horizontal => {
                if a.x < b.x {
                    (a, b)
                } else {
                    (b, a)
                }
            }
            Orientation::Vertical => {
                if a.y < b.y {
                    (a, b)
                } else {
                    (b, a)
                }
            }
        };

        Ok(Door {
            id,
            position,
            orientation,
            low,
            high,
            open: true,
        })
    }

    /// Whether this door joins the given unordered sector pair.
    pub fn connects(&self, a: Sector, b: Sector) -> bool {
        (self.low == a && self.high == b) || (self.low == b && self.high == a)
    }

    /// Whether either endpoint is `sector`.
    pub fn touches(&self, sector: Sector) -> bool {
        self.low == sector || self.high == sector
    }

    /// The endpoint opposite `sector`, if `sector` is an endpoint.
    pub fn other_side(&self, sector: Sector) -> Option<Sector> {
        if self.low == sector {
            Some(self.high)
        } else if self.high == sector {
            Some(self.low)
        } else {
            None
        }
    }

    /// Display correction applied on top of the integer position. Vertical
    /// doors sit half a tile low to counter midpoint rounding.
    pub fn display_offset(&self) -> (f32, f32) {
        match self.orientation {
            Orientation::Horizontal => (0.0, 0.0),
            Orientation::Vertical => (0.0, -0.5),
        }
    }

    /// World tiles covered by the door, extending down/left from its
    /// position. These are cleared from the wall buffer when the adjoining
    /// rooms load.
    pub fn occupied_tiles(&self) -> Vec<TilePos> {
        let (w, h) = self.orientation.footprint();
        let mut tiles = Vec::with_capacity((w * h) as usize);
        for dx in 0..w {
            for dy in 0..h {
                tiles.push(self.position.offset(-dx, -dy));
            }
        }
        tiles
    }

    /// The door's pair of cells in `room`'s layout space, clamped into the
    /// layout. The second cell is the one beside (vertical) or below
    /// (horizontal) the first, covering the walkable approach to the door.
    pub fn layout_cells(&self, room: &Room) -> Option<[GridPoint; 2]> {
        let data = room.data.as_ref()?;
        let width = data.layout.width() as i32;
        let height = data.layout.height() as i32;

        let rel_x = (self.position.x - room.origin.x).clamp(0, width - 1);
        let rel_y = (self.position.y - room.origin.y).clamp(0, height - 1);
        let first = GridPoint::new(rel_x, rel_y);
        let second = match self.orientation {
            Orientation::Vertical => GridPoint::new((rel_x - 1).clamp(0, width - 1), rel_y),
            Orientation::Horizontal => GridPoint::new(rel_x, (rel_y - 1).clamp(0, height - 1)),
        };
        Some([first, second])
    }

    /// The sector an entity at `world` ends up in after crossing, decided by
    /// the sign of its offset from the door along the door's axis. `None`
    /// when the entity sits exactly on the door line.
    pub fn entered_sector(&self, world: (f32, f32)) -> Option<Sector> {
        let delta = match self.orientation {
            Orientation::Horizontal => world.0 - self.position.x as f32,
            Orientation::Vertical => world.1 - self.position.y as f32,
        };
        if delta < 0.0 {
            Some(self.low)
        } else if delta > 0.0 {
            Some(self.high)
        } else {
            None
        }
    }
}
