//! # Floor Catalogs
//!
//! Per-floor room pools and visual tables.
//!
//! A catalog buckets room templates by difficulty and records the visual
//! side tables (wall, floor, and boundary variants plus door sprites) that a
//! renderer resolves tile variant indices against. Catalogs are plain data;
//! authoring them as JSON files is the intended workflow.

use crate::catalog::layout::RoomLayout;
use crate::catalog::room_data::RoomData;
use crate::{config, WarrenError, WarrenResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Difficulty tier of a room pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Start,
    Easy,
    Medium,
    Hard,
    Extreme,
}

/// Room pools and visual data for one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorCatalog {
    pub floor_id: u8,
    /// Minimum room count on floor 1; scales with the floor number.
    pub base_min_rooms: u32,
    /// Floor-specific rooms that require dead ends, beyond what the walk
    /// produces naturally.
    pub extra_dead_ends: u8,

    pub start_rooms: Vec<RoomData>,
    pub easy_rooms: Vec<RoomData>,
    pub medium_rooms: Vec<RoomData>,
    pub hard_rooms: Vec<RoomData>,
    pub extreme_rooms: Vec<RoomData>,

    /// Visual variant tables, indexed by a cell's variant byte.
    pub wall_variants: Vec<String>,
    pub floor_variants: Vec<String>,
    pub bound_variants: Vec<String>,
    /// Door sprites, indexed by orientation.
    pub door_sprites: Vec<String>,
}

impl FloorCatalog {
    /// Creates an empty catalog with default counts.
    pub fn new(floor_id: u8) -> Self {
        Self {
            floor_id,
            base_min_rooms: config::BASE_MIN_ROOMS,
            extra_dead_ends: 0,
            start_rooms: Vec::new(),
            easy_rooms: Vec::new(),
            medium_rooms: Vec::new(),
            hard_rooms: Vec::new(),
            extreme_rooms: Vec::new(),
            wall_variants: Vec::new(),
            floor_variants: Vec::new(),
            bound_variants: Vec::new(),
            door_sprites: Vec::new(),
        }
    }

    /// The template pool for a difficulty tier.
    pub fn pool(&self, difficulty: Difficulty) -> &[RoomData] {
        match difficulty {
            Difficulty::Start => &self.start_rooms,
            Difficulty::Easy => &self.easy_rooms,
            Difficulty::Medium => &self.medium_rooms,
            Difficulty::Hard => &self.hard_rooms,
            Difficulty::Extreme => &self.extreme_rooms,
        }
    }

    /// Maps one `[0, 1)` roll onto a difficulty tier.
    ///
    /// Cumulative thresholds: under 5% extreme, under 20% hard, under 55%
    /// medium, the rest easy.
    pub fn difficulty_for_roll(&self, roll: f32) -> Difficulty {
        if roll < 0.05 {
            Difficulty::Extreme
        } else if roll < 0.20 {
            Difficulty::Hard
        } else if roll < 0.55 {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }

    /// The pool for a tier, degrading toward easy when a tier is empty.
    ///
    /// Returns the pool actually used together with its tier. An empty easy
    /// pool is a hard error since every fallback ends there.
    pub fn pool_with_fallback(
        &self,
        difficulty: Difficulty,
    ) -> WarrenResult<(&[RoomData], Difficulty)> {
        let order: &[Difficulty] = match difficulty {
            Difficulty::Start => &[Difficulty::Start],
            Difficulty::Extreme => &[
                Difficulty::Extreme,
                Difficulty::Hard,
                Difficulty::Medium,
                Difficulty::Easy,
            ],
            Difficulty::Hard => &[Difficulty::Hard, Difficulty::Medium, Difficulty::Easy],
            Difficulty::Medium => &[Difficulty::Medium, Difficulty::Easy],
            Difficulty::Easy => &[Difficulty::Easy],
        };
        for &tier in order {
            let pool = self.pool(tier);
            if !pool.is_empty() {
                return Ok((pool, tier));
            }
        }
        Err(WarrenError::GenerationFailed(format!(
            "no room templates available for {difficulty:?} or any fallback tier"
        )))
    }

    /// Checks the catalog for authoring mistakes.
    ///
    /// Non-conforming sector spans are rejected here so the sentinel never
    /// reaches placement arithmetic; an empty start or easy pool is also an
    /// error since generation cannot proceed without them.
    pub fn validate(&self) -> WarrenResult<()> {
        if self.start_rooms.is_empty() {
            return Err(WarrenError::InvalidContent(
                "catalog has no start rooms".to_string(),
            ));
        }
        if self.easy_rooms.is_empty() {
            return Err(WarrenError::InvalidContent(
                "catalog has no easy rooms".to_string(),
            ));
        }
        for (tier, pool) in [
            (Difficulty::Start, &self.start_rooms),
            (Difficulty::Easy, &self.easy_rooms),
            (Difficulty::Medium, &self.medium_rooms),
            (Difficulty::Hard, &self.hard_rooms),
            (Difficulty::Extreme, &self.extreme_rooms),
        ] {
            for data in pool {
                if data.sector_span().is_none() {
                    warn!(
                        "room template {:?} in {:?} pool has a non-conforming size {}x{}",
                        data.name,
                        tier,
                        data.layout.width(),
                        data.layout.height()
                    );
                    return Err(WarrenError::InvalidContent(format!(
                        "room template {:?} does not divide into whole sectors",
                        data.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Loads a catalog from a JSON file.
    pub fn load_json(path: &Path) -> WarrenResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let catalog: FloorCatalog = serde_json::from_str(&text)?;
        Ok(catalog)
    }

    /// Serializes the catalog to pretty JSON.
    pub fn to_json(&self) -> WarrenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A small built-in catalog used by the CLI and examples.
    pub fn demo() -> WarrenResult<Self> {
        let mut catalog = Self::new(0);
        catalog.wall_variants = vec!["wall_stone".to_string(), "wall_mossy".to_string()];
        catalog.floor_variants = vec!["floor_dirt".to_string(), "floor_tiled".to_string()];
        catalog.bound_variants = vec!["bound_stone".to_string()];
        catalog.door_sprites = vec!["door_horizontal".to_string(), "door_vertical".to_string()];

        catalog.start_rooms.push(RoomData::new(
            "start_open",
            open_layout(28, 16, &[])?,
        ));
        catalog.easy_rooms.push(RoomData::new(
            "easy_open",
            open_layout(28, 16, &[])?,
        ));
        catalog.easy_rooms.push(RoomData::new(
            "easy_pillars",
            open_layout(28, 16, &[(6, 5, 2, 2), (20, 9, 2, 2)])?,
        ));
        catalog.easy_rooms.push(RoomData::new(
            "easy_alcove",
            open_layout(28, 16, &[(11, 4, 6, 1)])?,
        ));
        catalog.medium_rooms.push(RoomData::new(
            "medium_columns",
            open_layout(28, 16, &[(5, 4, 1, 3), (22, 4, 1, 3), (13, 10, 2, 2)])?,
        ));
        catalog.medium_rooms.push(RoomData::new(
            "medium_hall",
            open_layout(57, 33, &[(10, 8, 3, 3), (44, 8, 3, 3), (26, 20, 4, 2)])?,
        ));
        catalog.hard_rooms.push(RoomData::new(
            "hard_maze",
            open_layout(28, 16, &[(4, 3, 8, 1), (16, 7, 8, 1), (4, 11, 8, 1)])?,
        ));
        catalog.extreme_rooms.push(RoomData::new(
            "extreme_arena",
            open_layout(28, 16, &[(12, 6, 4, 4)])?,
        ));

        catalog.validate()?;
        Ok(catalog)
    }
}

/// Builds an open-floor layout with rectangular wall blocks stamped in.
///
/// Blocks are (x, y, w, h) in layout coordinates, y up. Callers keep blocks
/// away from layout edges so door-adjacent cells stay free.
pub fn open_layout(
    width: u32,
    height: u32,
    blocks: &[(u32, u32, u32, u32)],
) -> WarrenResult<RoomLayout> {
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|_| vec!['.'; width as usize])
        .collect();
    for &(bx, by, bw, bh) in blocks {
        for y in by..(by + bh).min(height) {
            for x in bx..(bx + bw).min(width) {
                // rows are listed top first
                rows[(height - 1 - y) as usize][x as usize] = '#';
            }
        }
    }
    let rows: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
    RoomLayout::try_from(rows)
}
