//! # Room Templates
//!
//! A named layout plus its derived footprint on the sector lattice.

use crate::catalog::layout::RoomLayout;
use crate::config;
use serde::{Deserialize, Serialize};

/// Sentinel returned by the sector-span accessors when a layout's size does
/// not divide into whole sectors. A content-authoring error; call sites must
/// check before doing arithmetic with the span.
pub const INVALID_SECTOR_SPAN: i32 = -1;

/// Immutable room template.
///
/// # Examples
///
/// ```
/// use warren::{RoomData, RoomLayout};
///
/// let row = ".".repeat(28);
/// let rows = vec![row.as_str(); 16];
/// let data = RoomData::new("open", RoomLayout::from_rows(&rows).unwrap());
/// assert_eq!(data.num_sectors_x(), 1);
/// assert_eq!(data.sector_span(), Some((1, 1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomData {
    pub name: String,
    pub layout: RoomLayout,
}

impl RoomData {
    /// Creates a template from a name and layout.
    pub fn new(name: impl Into<String>, layout: RoomLayout) -> Self {
        Self {
            name: name.into(),
            layout,
        }
    }

    /// Sectors the template spans horizontally, or [`INVALID_SECTOR_SPAN`].
    ///
    /// A single sector is exactly the base room width; wider layouts must
    /// account for the door offset between sectors, so the size has to be a
    /// multiple of base width plus offset.
    pub fn num_sectors_x(&self) -> i32 {
        span_along(self.layout.width(), config::BASE_ROOM_X)
    }

    /// Sectors the template spans vertically, or [`INVALID_SECTOR_SPAN`].
    pub fn num_sectors_y(&self) -> i32 {
        span_along(self.layout.height(), config::BASE_ROOM_Y)
    }

    /// The template's sector footprint, or `None` if either axis does not
    /// conform. Prefer this over the raw accessors so the sentinel cannot
    /// leak into arithmetic.
    pub fn sector_span(&self) -> Option<(u32, u32)> {
        let x = self.num_sectors_x();
        let y = self.num_sectors_y();
        if x == INVALID_SECTOR_SPAN || y == INVALID_SECTOR_SPAN {
            None
        } else {
            Some((x as u32, y as u32))
        }
    }

    /// Whether the template occupies more than one sector.
    pub fn is_multi_sector(&self) -> bool {
        matches!(self.sector_span(), Some((x, y)) if x > 1 || y > 1)
    }
}

fn span_along(size: u32, base: i32) -> i32 {
    let size = size as i32;
    let unit = base + config::DOOR_OFFSET;
    if size == base {
        1
    } else if size > base && (size + config::DOOR_OFFSET) % unit == 0 {
        (size + config::DOOR_OFFSET) / unit
    } else {
        INVALID_SECTOR_SPAN
    }
}
