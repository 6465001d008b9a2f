//! # Rooms
//!
//! One placed dungeon room and its lifecycle bookkeeping.
//!
//! Rooms are created with just an anchor sector, gain neighbor links as the
//! skeleton grows, are assigned a template (possibly several times when
//! validation rerolls), collect doors, and are finally loaded exactly once.
//! A room absorbed by a large-room placement is flagged as doomed rather
//! than freed so an in-flight placement can still be rolled back.

use crate::catalog::RoomData;
use crate::map::{DoorId, Sector, TilePos};
use crate::pathing::PathGrid;
use crate::{WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};

/// A room on the floor's sector lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: usize,
    pub name: String,
    /// The sector the room was first placed at.
    pub anchor: Sector,
    /// World-space bottom-left corner, derived from the occupied sectors.
    pub origin: TilePos,
    /// Assigned template; `None` until layout resolution succeeds or while
    /// a reroll is pending.
    pub data: Option<RoomData>,
    /// Every sector the room occupies. One entry for normal rooms.
    pub sectors: Vec<Sector>,
    /// Lattice-adjacent sectors that hold other rooms.
    pub neighbors: Vec<Sector>,
    /// Doors bordering this room.
    pub doors: Vec<DoorId>,
    pub pos_final: bool,
    pub dead_end: bool,
    pub loaded: bool,
    /// Set when a large room absorbs this one. The room is excluded from
    /// further processing but kept around until the placement commits.
    pub doomed: bool,
}

impl Room {
    /// Creates a room anchored at `sector`. Placement is final immediately;
    /// template assignment happens later.
    pub fn new(id: usize, name: impl Into<String>, anchor: Sector) -> Self {
        Self {
            id,
            name: name.into(),
            anchor,
            origin: anchor.origin(),
            data: None,
            sectors: vec![anchor],
            neighbors: Vec::new(),
            doors: Vec::new(),
            pos_final: true,
            dead_end: false,
            loaded: false,
            doomed: false,
        }
    }

    /// Assigns a template with the footprint's bottom-left sector at
    /// `min_corner`, recomputing the occupied sectors and world origin.
    ///
    /// The template must have a conforming sector span.
    pub fn assign_data(&mut self, data: RoomData, min_corner: Sector) -> WarrenResult<()> {
        let (span_x, span_y) = data.sector_span().ok_or_else(|| {
            WarrenError::InvalidContent(format!(
                "room template {:?} does not divide into whole sectors",
                data.name
            ))
        })?;

        self.sectors.clear();
        for sy in 0..span_y as i32 {
            for sx in 0..span_x as i32 {
                self.sectors.push(Sector {
                    x: min_corner.x + sx,
                    y: min_corner.y + sy,
                    z: min_corner.z,
                });
            }
        }
        self.origin = min_corner.origin();
        self.data = Some(data);
        Ok(())
    }

    /// Assigns a template anchored at the room's own sector.
    pub fn set_data(&mut self, data: RoomData) -> WarrenResult<()> {
        self.assign_data(data, self.anchor)
    }

    /// Whether the room spans more than one sector.
    pub fn is_large(&self) -> bool {
        self.sectors.len() > 1
    }

    /// Whether the room occupies `sector`.
    pub fn occupies(&self, sector: Sector) -> bool {
        self.sectors.contains(&sector)
    }

    /// Bottom-left sector of the occupied footprint.
    pub fn min_corner(&self) -> Sector {
        let mut min = self.anchor;
        for s in &self.sectors {
            min.x = min.x.min(s.x);
            min.y = min.y.min(s.y);
        }
        min
    }

    /// Records a neighboring sector, ignoring duplicates.
    pub fn add_neighbor(&mut self, sector: Sector) {
        if !self.neighbors.contains(&sector) {
            self.neighbors.push(sector);
        }
    }

    /// Records a bordering door, ignoring duplicates.
    pub fn add_door(&mut self, door: DoorId) {
        if !self.doors.contains(&door) {
            self.doors.push(door);
        }
    }

    /// Drops a door reference if present.
    pub fn remove_door(&mut self, door: DoorId) {
        self.doors.retain(|&d| d != door);
    }

    /// Builds the walkability grid for this room's layout.
    ///
    /// Cells are walkable iff the layout classifies them as free space. The
    /// grid is used only for door-to-door validation, not for gameplay
    /// collision.
    pub fn walkable_grid(&self) -> WarrenResult<PathGrid> {
        let data = self.data.as_ref().ok_or_else(|| {
            WarrenError::InvalidState(format!(
                "room {:?} has no template to build a walkable grid from",
                self.name
            ))
        })?;
        let layout = &data.layout;
        let mut grid = PathGrid::new(layout.width(), layout.height());
        for (x, y, cell) in layout.iter_cells() {
            if !cell.is_free() {
                grid.set_walkable(x, y, false);
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{open_layout, RoomData};

    fn template(name: &str, w: u32, h: u32) -> RoomData {
        RoomData::new(name, open_layout(w, h, &[]).unwrap())
    }

    #[test]
    fn test_new_room_defaults() {
        let room = Room::new(0, "Start Room", Sector::ZERO);
        assert_eq!(room.sectors, vec![Sector::ZERO]);
        assert_eq!(room.origin, TilePos::new(0, 0));
        assert!(room.pos_final);
        assert!(!room.loaded);
        assert!(!room.is_large());
    }

    #[test]
    fn test_assign_single_sector_data() {
        let mut room = Room::new(1, "Room_1", Sector::new(2, -1));
        room.set_data(template("open", 28, 16)).unwrap();
        assert_eq!(room.sectors, vec![Sector::new(2, -1)]);
        assert_eq!(room.origin, TilePos::new(58, -17));
    }

    #[test]
    fn test_assign_multi_sector_data() {
        let mut room = Room::new(1, "Room_1", Sector::new(1, 1));
        room.assign_data(template("hall", 57, 33), Sector::new(0, 1))
            .unwrap();

        assert_eq!(room.sectors.len(), 4);
        assert!(room.occupies(Sector::new(0, 1)));
        assert!(room.occupies(Sector::new(1, 1)));
        assert!(room.occupies(Sector::new(0, 2)));
        assert!(room.occupies(Sector::new(1, 2)));
        assert!(room.is_large());
        assert_eq!(room.min_corner(), Sector::new(0, 1));
        assert_eq!(room.origin, TilePos::new(0, 17));
    }

    #[test]
    fn test_assign_rejects_bad_span() {
        let mut room = Room::new(0, "Room_0", Sector::ZERO);
        assert!(room.set_data(template("bad", 30, 16)).is_err());
    }

    #[test]
    fn test_neighbor_and_door_dedup() {
        let mut room = Room::new(0, "Room_0", Sector::ZERO);
        room.add_neighbor(Sector::new(0, 1));
        room.add_neighbor(Sector::new(0, 1));
        assert_eq!(room.neighbors.len(), 1);

        room.add_door(3);
        room.add_door(3);
        assert_eq!(room.doors.len(), 1);
        room.remove_door(3);
        assert!(room.doors.is_empty());
    }

    #[test]
    fn test_walkable_grid_matches_layout() {
        let mut room = Room::new(0, "Room_0", Sector::ZERO);
        let data = RoomData::new("pillar", open_layout(28, 16, &[(6, 5, 2, 2)]).unwrap());
        room.set_data(data).unwrap();

        let grid = room.walkable_grid().unwrap();
        assert_eq!(grid.width(), 28);
        assert_eq!(grid.height(), 16);
        assert!(!grid.is_walkable(6, 5));
        assert!(!grid.is_walkable(7, 6));
        assert!(grid.is_walkable(5, 5));
    }

    #[test]
    fn test_walkable_grid_requires_data() {
        let room = Room::new(0, "Room_0", Sector::ZERO);
        assert!(room.walkable_grid().is_err());
    }
}
