//! # Room Layouts
//!
//! Per-cell classification of a room template.
//!
//! Layouts are authored either as rows of glyphs (`#` wall, `.` floor, with
//! letters selecting visual variants) or as legacy RGBA tuples where the RGB
//! channels pick the base kind and the alpha channel indexes a variant table
//! (`variant = 255 - alpha`). Both forms normalize to the same cell grid.

use crate::{WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};

/// RGB triple marking a wall cell in legacy pixel layouts.
pub const BASE_WALL_RGB: [u8; 3] = [0x00, 0x00, 0x00];

/// RGB triple marking a floor cell in legacy pixel layouts.
pub const BASE_FLOOR_RGB: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Base classification of one layout cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Floor,
}

/// One cell of a room layout: its kind plus a visual variant index.
///
/// Variant 0 is the default look; nonzero variants index the catalog's
/// visual side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCell {
    pub kind: CellKind,
    pub variant: u8,
}

impl LayoutCell {
    /// Default wall cell.
    pub fn wall() -> Self {
        Self {
            kind: CellKind::Wall,
            variant: 0,
        }
    }

    /// Default floor cell.
    pub fn floor() -> Self {
        Self {
            kind: CellKind::Floor,
            variant: 0,
        }
    }

    /// Whether the cell is free space an entity could stand on.
    pub fn is_free(&self) -> bool {
        self.kind == CellKind::Floor
    }
}

/// A room template's cell grid.
///
/// Cells are stored row-major with y = 0 at the bottom, matching world
/// space. Serialized as rows of glyphs, listed top row first so authored
/// JSON reads the way the room looks.
///
/// # Examples
///
/// ```
/// use warren::{CellKind, RoomLayout};
///
/// let layout = RoomLayout::from_rows(&["##", ".."]).unwrap();
/// assert_eq!(layout.width(), 2);
/// assert!(layout.is_free(0, 0));
/// assert!(!layout.is_free(0, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct RoomLayout {
    width: u32,
    height: u32,
    cells: Vec<LayoutCell>,
}

impl RoomLayout {
    /// Builds a layout from glyph rows, top row first.
    ///
    /// Glyphs: `#` wall, `.` floor, `A`..`Z` wall variants 1..26, `a`..`z`
    /// floor variants 1..26. Ragged or empty rows and unknown glyphs are
    /// content errors.
    pub fn from_rows(rows: &[&str]) -> WarrenResult<Self> {
        let owned: Vec<String> = rows.iter().map(|r| (*r).to_string()).collect();
        Self::try_from(owned)
    }

    /// Builds a layout from legacy RGBA pixels, row-major with y = 0 at the
    /// bottom.
    ///
    /// RGB must match [`BASE_WALL_RGB`] or [`BASE_FLOOR_RGB`]; the variant
    /// index is `255 - alpha`.
    pub fn from_rgba(width: u32, height: u32, pixels: &[[u8; 4]]) -> WarrenResult<Self> {
        if width == 0 || height == 0 {
            return Err(WarrenError::InvalidContent(
                "layout dimensions must be nonzero".to_string(),
            ));
        }
        if pixels.len() != (width * height) as usize {
            return Err(WarrenError::InvalidContent(format!(
                "expected {} pixels for a {}x{} layout, got {}",
                width * height,
                width,
                height,
                pixels.len()
            )));
        }

        let mut cells = Vec::with_capacity(pixels.len());
        for (i, px) in pixels.iter().enumerate() {
            let rgb = [px[0], px[1], px[2]];
            let variant = 255 - px[3];
            let kind = if rgb == BASE_WALL_RGB {
                CellKind::Wall
            } else if rgb == BASE_FLOOR_RGB {
                CellKind::Floor
            } else {
                return Err(WarrenError::InvalidContent(format!(
                    "unrecognized base tile color {:02X}{:02X}{:02X} at pixel {}",
                    rgb[0], rgb[1], rgb[2], i
                )));
            };
            cells.push(LayoutCell { kind, variant });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Layout width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Layout height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrows the cell at (x, y), or `None` outside the layout.
    pub fn cell(&self, x: i32, y: i32) -> Option<LayoutCell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.cells[(y as u32 * self.width + x as u32) as usize])
    }

    /// Whether the cell at (x, y) is free space. Out-of-bounds is not.
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).map(|c| c.is_free()).unwrap_or(false)
    }

    /// Iterates all cells with their coordinates.
    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, LayoutCell)> + '_ {
        let width = self.width as i32;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i as i32 % width, i as i32 / width, *c))
    }

    /// Count of free cells.
    pub fn free_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_free()).count()
    }
}

fn cell_from_glyph(glyph: char) -> Option<LayoutCell> {
    match glyph {
        '#' => Some(LayoutCell::wall()),
        '.' => Some(LayoutCell::floor()),
        'A'..='Z' => Some(LayoutCell {
            kind: CellKind::Wall,
            variant: (glyph as u8 - b'A') + 1,
        }),
        'a'..='z' => Some(LayoutCell {
            kind: CellKind::Floor,
            variant: (glyph as u8 - b'a') + 1,
        }),
        _ => None,
    }
}

fn glyph_from_cell(cell: LayoutCell) -> char {
    match (cell.kind, cell.variant) {
        (CellKind::Wall, 0) => '#',
        (CellKind::Floor, 0) => '.',
        (CellKind::Wall, v) => (b'A' + (v - 1).min(25)) as char,
        (CellKind::Floor, v) => (b'a' + (v - 1).min(25)) as char,
    }
}

impl TryFrom<Vec<String>> for RoomLayout {
    type Error = WarrenError;

    fn try_from(rows: Vec<String>) -> WarrenResult<Self> {
        if rows.is_empty() {
            return Err(WarrenError::InvalidContent(
                "layout has no rows".to_string(),
            ));
        }
        let width = rows[0].chars().count() as u32;
        if width == 0 {
            return Err(WarrenError::InvalidContent(
                "layout rows are empty".to_string(),
            ));
        }
        let height = rows.len() as u32;

        let mut cells = vec![LayoutCell::floor(); (width * height) as usize];
        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return Err(WarrenError::InvalidContent(format!(
                    "layout row {} has {} cells, expected {}",
                    row_idx,
                    row.chars().count(),
                    width
                )));
            }
            // Rows are authored top first; flip into bottom-up storage.
            let y = height as usize - 1 - row_idx;
            for (x, glyph) in row.chars().enumerate() {
                let cell = cell_from_glyph(glyph).ok_or_else(|| {
                    WarrenError::InvalidContent(format!(
                        "unknown layout glyph {glyph:?} at row {row_idx}, column {x}"
                    ))
                })?;
                cells[y * width as usize + x] = cell;
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl From<RoomLayout> for Vec<String> {
    fn from(layout: RoomLayout) -> Vec<String> {
        let mut rows = Vec::with_capacity(layout.height as usize);
        for y in (0..layout.height as i32).rev() {
            let mut row = String::with_capacity(layout.width as usize);
            for x in 0..layout.width as i32 {
                let cell = layout.cell(x, y).unwrap_or_else(LayoutCell::floor);
                row.push(glyph_from_cell(cell));
            }
            rows.push(row);
        }
        rows
    }
}
