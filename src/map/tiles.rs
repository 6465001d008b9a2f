//! # Tile Buffers
//!
//! Committed wall and floor tiles produced by room loading.
//!
//! Buffers are keyed by world tile position with deterministic iteration
//! order, so two runs of the same seed serialize identically. Walls and
//! floors live in separate buffers the way a renderer stacks tilemaps; a
//! floor tile is painted under every wall so removing a wall (for a door)
//! leaves walkable ground behind.

use crate::map::TilePos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a committed tile renders as. The variant byte indexes the catalog's
/// visual side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Room boundary wall.
    Bound { variant: u8 },
    /// Wall face, including the perspective rows under boundaries.
    Wall { variant: u8 },
    /// Walkable ground.
    Floor { variant: u8 },
}

#[derive(Serialize, Deserialize)]
struct TileBuffersRepr {
    walls: Vec<(TilePos, TileKind)>,
    floors: Vec<(TilePos, TileKind)>,
}

/// The floor's committed tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TileBuffersRepr", into = "TileBuffersRepr")]
pub struct TileBuffers {
    pub walls: BTreeMap<TilePos, TileKind>,
    pub floors: BTreeMap<TilePos, TileKind>,
}

impl TileBuffers {
    /// Creates empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints a wall-layer tile, replacing any previous one there.
    pub fn set_wall(&mut self, pos: TilePos, kind: TileKind) {
        self.walls.insert(pos, kind);
    }

    /// Paints a floor-layer tile.
    pub fn set_floor(&mut self, pos: TilePos, kind: TileKind) {
        self.floors.insert(pos, kind);
    }

    /// Removes a wall-layer tile. Returns whether one was there.
    pub fn clear_wall(&mut self, pos: TilePos) -> bool {
        self.walls.remove(&pos).is_some()
    }

    /// Whether any tile exists at `pos` on the wall layer.
    pub fn has_wall(&self, pos: TilePos) -> bool {
        self.walls.contains_key(&pos)
    }

    /// Whether any tile exists at `pos` on the floor layer.
    pub fn has_floor(&self, pos: TilePos) -> bool {
        self.floors.contains_key(&pos)
    }

    /// Total committed tile count across both layers.
    pub fn len(&self) -> usize {
        self.walls.len() + self.floors.len()
    }

    /// Whether nothing has been painted.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.floors.is_empty()
    }

    /// Bounding box over both layers, or `None` when empty.
    pub fn bounds(&self) -> Option<(TilePos, TilePos)> {
        let mut iter = self.walls.keys().chain(self.floors.keys());
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for pos in self.walls.keys().chain(self.floors.keys()) {
            min.x = min.x.min(pos.x);
            min.y = min.y.min(pos.y);
            min.z = min.z.min(pos.z);
            max.x = max.x.max(pos.x);
            max.y = max.y.max(pos.y);
            max.z = max.z.max(pos.z);
        }
        Some((min, max))
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.walls.clear();
        self.floors.clear();
    }
}

impl From<TileBuffersRepr> for TileBuffers {
    fn from(repr: TileBuffersRepr) -> Self {
        Self {
            walls: repr.walls.into_iter().collect(),
            floors: repr.floors.into_iter().collect(),
        }
    }
}

impl From<TileBuffers> for TileBuffersRepr {
    fn from(buffers: TileBuffers) -> Self {
        Self {
            walls: buffers.walls.into_iter().collect(),
            floors: buffers.floors.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut tiles = TileBuffers::new();
        let pos = TilePos::new(3, 4);
        tiles.set_wall(pos, TileKind::Bound { variant: 0 });
        tiles.set_floor(pos, TileKind::Floor { variant: 1 });

        assert!(tiles.has_wall(pos));
        assert!(tiles.has_floor(pos));
        assert_eq!(tiles.len(), 2);

        assert!(tiles.clear_wall(pos));
        assert!(!tiles.has_wall(pos));
        assert!(!tiles.clear_wall(pos));
        assert!(tiles.has_floor(pos));
    }

    #[test]
    fn test_bounds() {
        let mut tiles = TileBuffers::new();
        assert!(tiles.bounds().is_none());

        tiles.set_wall(TilePos::new(-2, 5), TileKind::Bound { variant: 0 });
        tiles.set_floor(TilePos::new(7, -1), TileKind::Floor { variant: 0 });
        let (min, max) = tiles.bounds().unwrap();
        assert_eq!(min, TilePos::new(-2, -1));
        assert_eq!(max, TilePos::new(7, 5));
    }

    #[test]
    fn test_json_round_trip() {
        let mut tiles = TileBuffers::new();
        tiles.set_wall(TilePos::new(0, 0), TileKind::Bound { variant: 2 });
        tiles.set_wall(TilePos::new(1, 0), TileKind::Wall { variant: 0 });
        tiles.set_floor(TilePos::new(0, 0), TileKind::Floor { variant: 0 });

        let json = serde_json::to_string(&tiles).unwrap();
        let parsed: TileBuffers = serde_json::from_str(&json).unwrap();
        assert_eq!(tiles, parsed);
    }
}
