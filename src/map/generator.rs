//! # Floor Generator
//!
//! Grows the room graph, places doors, resolves room templates, and paints
//! tiles.
//!
//! The generator is an explicit context object owning the sector map, the
//! room and door arenas, the catalog, and the seeded generator; nothing here
//! is global, so independent generations can run side by side (tests do).
//! Generation is single threaded and synchronous: every random draw is
//! ordered against the one shared generator, so reordering any draw changes
//! every floor generated after it.
//!
//! Multi-sector placement is transactional. An attempt snapshots exactly
//! what it touches (sector reassignments, doomed rooms, scheduled door
//! changes) and either commits the lot or reverts it, so a failed attempt
//! leaves the map bit-for-bit untouched.

use crate::catalog::{CellKind, Difficulty, FloorCatalog, RoomData, RoomLayout};
use crate::map::{
    Door, DoorId, EntityId, EventQueue, Orientation, Room, RoomEntered, RoomId, Sector,
    TileBuffers, TileKind, TilePos,
};
use crate::rng::SeededRandom;
use crate::{config, WarrenError, WarrenResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Tunable knobs for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Explicit seed for reproducible floors; `None` seeds from the clock.
    pub seed: Option<i64>,
    /// Floor number, scaling the room count.
    pub floor_num: u32,
    /// Cap on template rerolls per room before generation aborts.
    pub max_layout_rerolls: u32,
    /// Cap on random anchor offsets per multi-sector placement round.
    pub max_span_attempts: u32,
}

impl GenerationOptions {
    /// Options for the given floor with default caps and a clock seed.
    pub fn new(floor_num: u32) -> Self {
        Self {
            seed: None,
            floor_num,
            max_layout_rerolls: config::MAX_LAYOUT_REROLLS,
            max_span_attempts: config::MAX_SPAN_ATTEMPTS,
        }
    }

    /// Options for reproducible floor-1 runs in tests.
    pub fn for_testing(seed: i64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(1)
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Everything a renderer needs from one finished generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorLayout {
    pub floor_num: u32,
    /// The seed state the run started from.
    pub initial_rng_state: i64,
    pub min_rooms: u32,
    pub max_rooms: u32,
    pub start_room: RoomId,
    /// Sector to owning room, sorted by sector.
    pub sectors: Vec<(Sector, RoomId)>,
    /// Every room the run created, absorbed ones included (flagged doomed).
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub dead_ends: Vec<RoomId>,
    /// Dead ends still owed to floor-specific rooms; consumed by the
    /// planned forced-branching pass.
    pub dead_end_deficit: u32,
    pub tiles: TileBuffers,
}

impl FloorLayout {
    /// Rooms that survived generation.
    pub fn live_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| !r.doomed)
    }

    /// Count of surviving rooms.
    pub fn live_room_count(&self) -> usize {
        self.live_rooms().count()
    }

    /// The room owning `sector`, if any.
    pub fn room_of_sector(&self, sector: Sector) -> Option<RoomId> {
        self.sectors
            .iter()
            .find(|(s, _)| *s == sector)
            .map(|&(_, id)| id)
    }
}

/// Snapshot of everything a multi-sector placement attempt touched, applied
/// or reverted as a unit.
#[derive(Debug)]
struct PlacementTxn {
    prev_data: Option<RoomData>,
    prev_origin: TilePos,
    prev_sectors: Vec<Sector>,
    /// Sector map entries now pointing at the placing room, with their
    /// previous owner (`None` for previously empty sectors).
    reassigned: Vec<(Sector, Option<RoomId>)>,
    /// Rooms flagged for destruction by this attempt.
    absorbed: Vec<RoomId>,
    /// Doors that ended up entirely inside the footprint; deleted on
    /// commit, forgotten on rollback.
    removed_doors: Vec<DoorId>,
    /// Doors crossing the footprint boundary; promoted into the room's
    /// door list on commit.
    possible_doors: Vec<DoorId>,
}

/// Orchestrates one floor's generation pipeline.
///
/// # Examples
///
/// ```
/// use warren::{FloorCatalog, FloorGenerator, GenerationOptions};
///
/// let catalog = FloorCatalog::demo().unwrap();
/// let mut generator =
///     FloorGenerator::new(catalog, GenerationOptions::for_testing(42)).unwrap();
/// let layout = generator.generate().unwrap();
/// assert!(layout.live_room_count() >= layout.min_rooms as usize);
/// ```
#[derive(Debug)]
pub struct FloorGenerator {
    catalog: FloorCatalog,
    opts: GenerationOptions,
    rng: SeededRandom,
    rooms: Vec<Room>,
    map: BTreeMap<Sector, RoomId>,
    doors: Vec<Option<Door>>,
    dead_ends: Vec<RoomId>,
    tiles: TileBuffers,
    events: EventQueue,
    spawn_sector: Sector,
}

impl FloorGenerator {
    /// Creates a generator over a validated catalog.
    pub fn new(catalog: FloorCatalog, opts: GenerationOptions) -> WarrenResult<Self> {
        catalog.validate()?;
        let rng = match opts.seed {
            Some(seed) => SeededRandom::from_seed(seed),
            None => SeededRandom::new(),
        };
        Ok(Self {
            catalog,
            opts,
            rng,
            rooms: Vec::new(),
            map: BTreeMap::new(),
            doors: Vec::new(),
            dead_ends: Vec::new(),
            tiles: TileBuffers::new(),
            events: EventQueue::new(),
            spawn_sector: Sector::ZERO,
        })
    }

    /// Minimum room count for the configured floor.
    pub fn min_rooms(&self) -> u32 {
        let base = self.catalog.base_min_rooms as f32;
        (base * (self.opts.floor_num as f32).sqrt()).ceil() as u32
    }

    /// Maximum room count for the configured floor.
    pub fn max_rooms(&self) -> u32 {
        let min = self.min_rooms() as f32;
        (min + min.sqrt()).ceil() as u32
    }

    /// The rooms arena, absorbed rooms included.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Live doors.
    pub fn doors(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter().flatten()
    }

    /// The sector map.
    pub fn sector_map(&self) -> &BTreeMap<Sector, RoomId> {
        &self.map
    }

    /// Committed tiles.
    pub fn tiles(&self) -> &TileBuffers {
        &self.tiles
    }

    /// The catalog generation draws from.
    pub fn catalog(&self) -> &FloorCatalog {
        &self.catalog
    }

    /// The options generation runs with.
    pub fn options(&self) -> &GenerationOptions {
        &self.opts
    }

    fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id).and_then(|d| d.as_ref())
    }

    /// Runs the whole pipeline and returns the finished layout.
    ///
    /// The run restarts from the recorded seed, so repeated calls with the
    /// same options produce identical floors. On error nothing partial is
    /// returned; internal state is discarded on the next call.
    pub fn generate(&mut self) -> WarrenResult<FloorLayout> {
        self.reset();
        info!(
            "generating floor {} (seed state {})",
            self.opts.floor_num,
            self.rng.initial_state()
        );

        self.grow_skeleton()?;
        self.tag_dead_ends();
        self.instantiate_doors();
        self.resolve_layouts()?;

        let layout = self.snapshot();
        info!(
            "floor {} complete: {} rooms, {} doors, {} tiles",
            layout.floor_num,
            layout.live_room_count(),
            layout.doors.len(),
            layout.tiles.len()
        );
        Ok(layout)
    }

    /// Bumps the floor number and regenerates from scratch.
    pub fn generate_next_floor(&mut self) -> WarrenResult<FloorLayout> {
        self.opts.floor_num += 1;
        self.generate()
    }

    fn reset(&mut self) {
        let seed = self.rng.initial_state();
        self.rng.set_seed(seed);
        self.rooms.clear();
        self.map.clear();
        self.doors.clear();
        self.dead_ends.clear();
        self.tiles.clear();
        self.events.clear();
    }

    fn push_room(&mut self, name: String, anchor: Sector) -> RoomId {
        let id = self.rooms.len();
        self.rooms.push(Room::new(id, name, anchor));
        id
    }

    /// Places the start room and walks out the floor skeleton until the
    /// target sector count is reached.
    fn grow_skeleton(&mut self) -> WarrenResult<()> {
        let spawn = self.spawn_sector;

        let pick = self.rng.next_i32().unsigned_abs() as usize;
        let start_data = {
            let pool = &self.catalog.start_rooms;
            pool[pick % pool.len()].clone()
        };
        let start_id = self.push_room("Start Room".to_string(), spawn);
        self.rooms[start_id].set_data(start_data)?;
        self.map.insert(spawn, start_id);

        let target = self.rng.range_u32(self.min_rooms(), self.max_rooms());
        debug!("skeleton target is {target} sectors");

        let mut curr = spawn;
        while (self.map.len() as u32) < target {
            // Step in random cardinal directions until free space turns up.
            while self.map.contains_key(&curr) {
                let sign = if self.rng.next_i32() < 0 { -1 } else { 1 };
                if self.rng.next_u32() % 2 == 0 {
                    curr.x += sign;
                } else {
                    curr.y += sign;
                }
            }
            let name = format!("Room_{}", self.map.len());
            let id = self.push_room(name, curr);
            self.map.insert(curr, id);
            self.link_room_neighbors(id);
        }
        Ok(())
    }

    /// Links a freshly placed room with every lattice-adjacent room, both
    /// ways.
    fn link_room_neighbors(&mut self, id: RoomId) {
        let anchor = self.rooms[id].anchor;
        for dir in [Sector::UP, Sector::DOWN, Sector::LEFT, Sector::RIGHT] {
            let nb = anchor + dir;
            if let Some(&other) = self.map.get(&nb) {
                if other != id {
                    self.rooms[id].add_neighbor(nb);
                    self.rooms[other].add_neighbor(anchor);
                }
            }
        }
    }

    /// Flags rooms with fewer than two neighbors.
    ///
    /// Purely informational for now. The planned remediation pass will
    /// branch extra dead ends off well-connected rooms until the catalog's
    /// `extra_dead_ends` demand is met; the deficit is surfaced in the
    /// layout so callers can see what it would owe.
    fn tag_dead_ends(&mut self) {
        for id in 0..self.rooms.len() {
            if self.rooms[id].neighbors.len() < 2 {
                self.rooms[id].dead_end = true;
                self.dead_ends.push(id);
            }
        }
        debug!("{} dead ends tagged", self.dead_ends.len());
    }

    fn find_door(&self, a: Sector, b: Sector) -> Option<DoorId> {
        self.doors
            .iter()
            .flatten()
            .find(|d| d.connects(a, b))
            .map(|d| d.id)
    }

    /// Creates one door per adjacent finalized room pair, keeping both
    /// endpoint rooms' door lists consistent.
    fn instantiate_doors(&mut self) {
        for id in 0..self.rooms.len() {
            let anchor = self.rooms[id].anchor;
            let neighbors = self.rooms[id].neighbors.clone();
            for nb in neighbors {
                let Some(&other) = self.map.get(&nb) else {
                    continue;
                };
                if other == id || !self.rooms[other].pos_final {
                    continue;
                }
                if self.find_door(anchor, nb).is_some() {
                    continue;
                }
                match Door::spawn(self.doors.len(), anchor, nb) {
                    Ok(door) => {
                        let d_id = door.id;
                        self.doors.push(Some(door));
                        self.rooms[id].add_door(d_id);
                        self.rooms[other].add_door(d_id);
                    }
                    Err(err) => warn!("skipping door: {err}"),
                }
            }
        }
        debug!("{} doors instantiated", self.doors.len());
    }

    /// Resolves a template for every room, in room order.
    fn resolve_layouts(&mut self) -> WarrenResult<()> {
        for id in 0..self.rooms.len() {
            if self.rooms[id].loaded || self.rooms[id].doomed {
                continue;
            }
            self.resolve_room(id)?;
        }
        Ok(())
    }

    /// Draws, places, and validates templates for one room until a layout
    /// sticks or the reroll cap is hit.
    fn resolve_room(&mut self, id: RoomId) -> WarrenResult<()> {
        let is_start = self.rooms[id].anchor == self.spawn_sector;
        let difficulty = if is_start {
            Difficulty::Start
        } else {
            let roll = self.rng.next_f32();
            self.catalog.difficulty_for_roll(roll)
        };
        let (pool, used_tier) = {
            let (pool, tier) = self.catalog.pool_with_fallback(difficulty)?;
            (pool.to_vec(), tier)
        };
        if used_tier != difficulty {
            debug!("{difficulty:?} pool empty, using {used_tier:?} for room {id}");
        }

        // A pre-assigned template (the start room's) is the first attempt.
        let mut pending = self.rooms[id].data.clone();
        for _ in 0..self.opts.max_layout_rerolls {
            let data = match pending.take() {
                Some(data) => data,
                None => {
                    let pick = self.rng.next_i32().unsigned_abs() as usize;
                    pool[pick % pool.len()].clone()
                }
            };
            let name = data.name.clone();

            let Some(txn) = self.reconcile_span(id, data)? else {
                continue;
            };
            if self.navigable(id, &txn)? {
                self.commit(id, txn)?;
                return Ok(());
            }
            debug!("template {name:?} failed door validation for room {id}, rerolling");
            self.rollback(id, txn);
        }
        Err(WarrenError::GenerationFailed(format!(
            "no {used_tier:?} template produced a navigable layout for room {id} within {} rerolls",
            self.opts.max_layout_rerolls
        )))
    }

    /// Fits a template's sector footprint onto the map.
    ///
    /// Single-sector templates land on the room's anchor. Multi-sector
    /// templates try bounded random offsets of the footprint around the
    /// anchor, absorbing any unloaded single rooms they cover; the applied
    /// changes are recorded in the returned transaction. `Ok(None)` means
    /// this template cannot be placed and the caller should reroll.
    fn reconcile_span(
        &mut self,
        id: RoomId,
        data: RoomData,
    ) -> WarrenResult<Option<PlacementTxn>> {
        let Some((span_x, span_y)) = data.sector_span() else {
            warn!(
                "room template {:?} does not divide into whole sectors, rerolling",
                data.name
            );
            return Ok(None);
        };
        let anchor = self.rooms[id].anchor;
        let mut txn = PlacementTxn {
            prev_data: self.rooms[id].data.clone(),
            prev_origin: self.rooms[id].origin,
            prev_sectors: self.rooms[id].sectors.clone(),
            reassigned: Vec::new(),
            absorbed: Vec::new(),
            removed_doors: Vec::new(),
            possible_doors: Vec::new(),
        };

        if span_x == 1 && span_y == 1 {
            self.rooms[id].assign_data(data, anchor)?;
            return Ok(Some(txn));
        }

        for _ in 0..self.opts.max_span_attempts {
            // Anchor the footprint at a random offset that still contains
            // the original sector.
            let off_x = self.rng.range_u32(0, span_x - 1) as i32;
            let off_y = self.rng.range_u32(0, span_y - 1) as i32;
            let min_corner = Sector {
                x: anchor.x - off_x,
                y: anchor.y - off_y,
                z: anchor.z,
            };
            let mut footprint = Vec::with_capacity((span_x * span_y) as usize);
            for sy in 0..span_y as i32 {
                for sx in 0..span_x as i32 {
                    footprint.push(Sector {
                        x: min_corner.x + sx,
                        y: min_corner.y + sy,
                        z: min_corner.z,
                    });
                }
            }
            if !self.can_place_footprint(id, &footprint) {
                continue;
            }

            self.rooms[id].assign_data(data, min_corner)?;
            for &sector in &footprint {
                let prev = self.map.get(&sector).copied();
                if let Some(rid) = prev {
                    if rid != id && !txn.absorbed.contains(&rid) {
                        txn.absorbed.push(rid);
                        self.rooms[rid].doomed = true;
                    }
                }
                txn.reassigned.push((sector, prev));
                self.map.insert(sector, id);
            }
            for door in self.doors.iter().flatten() {
                let in_low = footprint.contains(&door.low);
                let in_high = footprint.contains(&door.high);
                if in_low && in_high {
                    txn.removed_doors.push(door.id);
                } else if (in_low || in_high) && !self.rooms[id].doors.contains(&door.id) {
                    txn.possible_doors.push(door.id);
                }
            }
            debug!(
                "room {id} expanded to {}x{} sectors at {min_corner:?}, absorbing {} rooms",
                span_x,
                span_y,
                txn.absorbed.len()
            );
            return Ok(Some(txn));
        }
        debug!(
            "no valid placement for multi-sector template {:?} around {anchor:?}",
            self.rooms[id].name
        );
        Ok(None)
    }

    /// Whether a footprint may claim its sectors: each covered sector must
    /// be empty or hold an unloaded, not-yet-resolved single room, and no
    /// covered sector may border a dead end or an already loaded room
    /// outside the footprint.
    fn can_place_footprint(&self, id: RoomId, footprint: &[Sector]) -> bool {
        for &sector in footprint {
            if let Some(&rid) = self.map.get(&sector) {
                if rid != id {
                    let room = &self.rooms[rid];
                    if room.loaded || room.doomed || room.is_large() || room.data.is_some() {
                        return false;
                    }
                }
            }
            for nb in sector.cardinal_neighbors() {
                if footprint.contains(&nb) {
                    continue;
                }
                if let Some(&rid) = self.map.get(&nb) {
                    if rid == id {
                        continue;
                    }
                    let room = &self.rooms[rid];
                    if room.dead_end || room.loaded {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Checks that the room's layout connects all of its doors.
    ///
    /// Dead ends only need the approach to their sole door walkable; other
    /// rooms need a path between an arbitrary reference door and every
    /// other door, counting boundary doors a pending placement would
    /// promote.
    fn navigable(&self, id: RoomId, txn: &PlacementTxn) -> WarrenResult<bool> {
        let room = &self.rooms[id];
        let data = room.data.as_ref().ok_or_else(|| {
            WarrenError::InvalidState(format!("room {} validated without a template", room.name))
        })?;

        let mut door_ids = room.doors.clone();
        for &d in &txn.possible_doors {
            if !door_ids.contains(&d) {
                door_ids.push(d);
            }
        }
        door_ids.retain(|d| !txn.removed_doors.contains(d));

        if door_ids.len() < 2 {
            let Some(&only) = door_ids.first() else {
                return Ok(true);
            };
            let Some(cells) = self.door(only).and_then(|d| d.layout_cells(room)) else {
                return Ok(false);
            };
            return Ok(cells.iter().all(|c| data.layout.is_free(c.x, c.y)));
        }

        let reference = door_ids[0];
        let Some(reference_cells) = self.door(reference).and_then(|d| d.layout_cells(room))
        else {
            return Ok(false);
        };
        let mut grid = room.walkable_grid()?;
        for &other in &door_ids[1..] {
            let Some(other_cells) = self.door(other).and_then(|d| d.layout_cells(room)) else {
                return Ok(false);
            };
            for &start in &reference_cells {
                for &end in &other_cells {
                    if grid.find_path(start, end, false).is_none() {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    /// Reverts everything a placement attempt changed.
    fn rollback(&mut self, id: RoomId, txn: PlacementTxn) {
        for (sector, prev) in txn.reassigned.into_iter().rev() {
            match prev {
                Some(rid) => {
                    self.map.insert(sector, rid);
                }
                None => {
                    self.map.remove(&sector);
                }
            }
        }
        for rid in txn.absorbed {
            self.rooms[rid].doomed = false;
        }
        let room = &mut self.rooms[id];
        room.data = txn.prev_data;
        room.origin = txn.prev_origin;
        room.sectors = txn.prev_sectors;
    }

    /// Makes a validated placement permanent and paints the room.
    fn commit(&mut self, id: RoomId, txn: PlacementTxn) -> WarrenResult<()> {
        for &d_id in &txn.removed_doors {
            for room in &mut self.rooms {
                room.remove_door(d_id);
            }
            self.doors[d_id] = None;
        }
        for d_id in txn.possible_doors {
            self.rooms[id].add_door(d_id);
        }
        for &rid in &txn.absorbed {
            let room = &mut self.rooms[rid];
            room.doors.clear();
            room.neighbors.clear();
            debug!("room {} absorbed into room {id}", room.name);
        }
        self.relink_footprint(id);

        self.paint_room(id)?;
        self.clear_door_tiles(id);
        self.rooms[id].loaded = true;
        Ok(())
    }

    /// Refreshes neighbor links between the room's footprint and the rooms
    /// bordering it, keeping sector symmetry intact after absorption.
    fn relink_footprint(&mut self, id: RoomId) {
        let sectors = self.rooms[id].sectors.clone();
        for &sector in &sectors {
            for nb in sector.cardinal_neighbors() {
                if sectors.contains(&nb) {
                    continue;
                }
                let Some(&other) = self.map.get(&nb) else {
                    continue;
                };
                if other == id {
                    continue;
                }
                self.rooms[id].add_neighbor(nb);
                self.rooms[other].add_neighbor(sector);
            }
        }
    }

    fn paint_room(&mut self, id: RoomId) -> WarrenResult<()> {
        let (layout, origin) = {
            let room = &self.rooms[id];
            let data = room.data.as_ref().ok_or_else(|| {
                WarrenError::InvalidState(format!("room {} loaded without a template", room.name))
            })?;
            (data.layout.clone(), room.origin)
        };
        paint_layout(&mut self.tiles, &layout, origin);
        Ok(())
    }

    /// Clears wall tiles under the room's doors, stamping a lintel above
    /// horizontal door openings so the wall face stays continuous.
    fn clear_door_tiles(&mut self, id: RoomId) {
        let door_ids = self.rooms[id].doors.clone();
        for d_id in door_ids {
            let Some(door) = self.door(d_id).cloned() else {
                warn!("room {id} lists missing door {d_id}");
                continue;
            };
            let occupied: BTreeSet<TilePos> = door.occupied_tiles().into_iter().collect();
            let mut cleared = Vec::new();
            for &pos in &occupied {
                if self.tiles.clear_wall(pos) {
                    cleared.push(pos);
                }
            }
            if door.orientation == Orientation::Horizontal {
                for pos in cleared {
                    let above = pos.offset(0, 1);
                    if !occupied.contains(&above) {
                        self.tiles.set_wall(above, TileKind::Wall { variant: 0 });
                    }
                }
            }
        }
    }

    fn snapshot(&self) -> FloorLayout {
        FloorLayout {
            floor_num: self.opts.floor_num,
            initial_rng_state: self.rng.initial_state(),
            min_rooms: self.min_rooms(),
            max_rooms: self.max_rooms(),
            start_room: 0,
            sectors: self.map.iter().map(|(&s, &r)| (s, r)).collect(),
            rooms: self.rooms.clone(),
            doors: self.doors.iter().flatten().cloned().collect(),
            dead_ends: self.dead_ends.clone(),
            dead_end_deficit: (self.catalog.extra_dead_ends as usize)
                .saturating_sub(self.dead_ends.len()) as u32,
            tiles: self.tiles.clone(),
        }
    }

    /// Reports an entity crossing a door's trigger boundary. Queues a
    /// room-entry event when the door is open and the entity is clearly on
    /// one side.
    pub fn door_crossed(&mut self, door_id: DoorId, world: (f32, f32), entity: EntityId) {
        let Some(door) = self.door(door_id) else {
            warn!("crossing reported for missing door {door_id}");
            return;
        };
        if !door.open {
            return;
        }
        if let Some(sector) = door.entered_sector(world) {
            self.events.push(RoomEntered {
                sector,
                entity,
                door: door_id,
            });
        }
    }

    /// Takes all pending room-entry events.
    pub fn drain_events(&mut self) -> Vec<RoomEntered> {
        self.events.drain()
    }
}

/// Paints a room layout into the buffers at a world origin.
///
/// The layout is scanned with a one-cell boundary ring around it; ring
/// cells always get boundary walls. Every wall gets a floor painted under
/// it so door clearing leaves ground behind, and a wall whose two cells
/// below are free grows a wall face that fakes vertical depth.
fn paint_layout(tiles: &mut TileBuffers, layout: &RoomLayout, origin: TilePos) {
    let w = layout.width() as i32;
    let h = layout.height() as i32;
    for y in (-1..=h).rev() {
        for x in (-1..=w).rev() {
            if x < 0 || x >= w || y < 0 || y >= h {
                spawn_wall_bound(tiles, layout, origin, x, y, 0);
                continue;
            }
            let Some(cell) = layout.cell(x, y) else {
                continue;
            };
            match cell.kind {
                CellKind::Wall => spawn_wall_bound(tiles, layout, origin, x, y, cell.variant),
                CellKind::Floor => tiles.set_floor(
                    origin.offset(x, y),
                    TileKind::Floor {
                        variant: cell.variant,
                    },
                ),
            }
        }
    }
}

fn spawn_wall_bound(
    tiles: &mut TileBuffers,
    layout: &RoomLayout,
    origin: TilePos,
    x: i32,
    y: i32,
    variant: u8,
) {
    let pos = origin.offset(x, y);
    tiles.set_wall(pos, TileKind::Bound { variant });
    // Floor under every wall in case a door removes it.
    tiles.set_floor(pos, TileKind::Floor { variant: 0 });

    if y > 1 && x >= 0 && x < layout.width() as i32 {
        if layout.is_free(x, y - 1) && layout.is_free(x, y - 2) {
            for step in 1..=config::WALL_HEIGHT {
                let below = origin.offset(x, y - step);
                tiles.set_wall(below, TileKind::Wall { variant: 0 });
                tiles.set_floor(below, TileKind::Floor { variant: 0 });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{open_layout, RoomData};

    fn minimal_catalog() -> FloorCatalog {
        let mut catalog = FloorCatalog::new(0);
        catalog
            .start_rooms
            .push(RoomData::new("start", open_layout(28, 16, &[]).unwrap()));
        for i in 0..3 {
            catalog.easy_rooms.push(RoomData::new(
                format!("easy_{i}"),
                open_layout(28, 16, &[]).unwrap(),
            ));
        }
        catalog
    }

    fn catalog_with_hall() -> FloorCatalog {
        let mut catalog = minimal_catalog();
        catalog
            .medium_rooms
            .push(RoomData::new("hall", open_layout(57, 33, &[]).unwrap()));
        catalog
    }

    #[test]
    fn test_generate_full_floor() {
        let mut generator =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(42)).unwrap();
        let layout = generator.generate().unwrap();

        let live = layout.live_room_count() as u32;
        assert!(live >= layout.min_rooms && live <= layout.max_rooms);
        for room in layout.live_rooms() {
            assert!(room.loaded, "room {} never loaded", room.name);
            assert!(room.data.is_some());
        }
        assert!(!layout.tiles.is_empty());
    }

    #[test]
    fn test_room_count_bounds_floor_one() {
        let generator =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(7)).unwrap();
        assert_eq!(generator.min_rooms(), 8);
        assert_eq!(generator.max_rooms(), 11);
    }

    #[test]
    fn test_room_count_bounds_scale_with_floor() {
        let mut opts = GenerationOptions::for_testing(7);
        opts.floor_num = 4;
        let generator = FloorGenerator::new(minimal_catalog(), opts).unwrap();
        assert_eq!(generator.min_rooms(), 16);
        assert_eq!(generator.max_rooms(), 20);
    }

    #[test]
    fn test_door_tiles_cleared() {
        let mut generator =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(99)).unwrap();
        let layout = generator.generate().unwrap();

        for door in &layout.doors {
            for pos in door.occupied_tiles() {
                assert!(
                    !layout.tiles.has_wall(pos),
                    "door {} tile {pos:?} still walled",
                    door.id
                );
            }
        }
    }

    #[test]
    fn test_sealed_template_aborts_generation() {
        // A fully walled interior can never connect a door, so every
        // non-start room fails validation until the reroll cap trips.
        let mut catalog = FloorCatalog::new(0);
        catalog
            .start_rooms
            .push(RoomData::new("start", open_layout(28, 16, &[]).unwrap()));
        catalog.easy_rooms.push(RoomData::new(
            "sealed",
            open_layout(28, 16, &[(0, 0, 28, 16)]).unwrap(),
        ));

        let mut opts = GenerationOptions::for_testing(42);
        opts.max_layout_rerolls = 16;
        let mut generator = FloorGenerator::new(catalog, opts).unwrap();
        assert!(matches!(
            generator.generate(),
            Err(WarrenError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_failed_footprint_leaves_map_untouched() {
        let mut generator =
            FloorGenerator::new(catalog_with_hall(), GenerationOptions::for_testing(5)).unwrap();

        // Anchor surrounded on all eight sides by loaded rooms, so every
        // 2x2 footprint containing the anchor overlaps a loaded room.
        let anchor = Sector::ZERO;
        let anchor_id = generator.push_room("Room_0".to_string(), anchor);
        generator.map.insert(anchor, anchor_id);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let sector = Sector::new(dx, dy);
                let id = generator.push_room(format!("Blocker_{dx}_{dy}"), sector);
                generator.rooms[id].loaded = true;
                generator.map.insert(sector, id);
            }
        }

        let map_before = generator.map.clone();
        let rooms_before = generator.rooms.clone();
        let hall = generator.catalog.medium_rooms[0].clone();

        let outcome = generator.reconcile_span(anchor_id, hall).unwrap();
        assert!(outcome.is_none());
        assert_eq!(generator.map, map_before);
        assert_eq!(generator.rooms, rooms_before);
    }

    #[test]
    fn test_rollback_restores_absorption() {
        let mut generator =
            FloorGenerator::new(catalog_with_hall(), GenerationOptions::for_testing(5)).unwrap();

        // The anchor with unresolved single rooms on all eight sides, so
        // every candidate 2x2 footprint absorbs exactly three of them.
        let anchor = Sector::ZERO;
        let anchor_id = generator.push_room("Room_0".to_string(), anchor);
        generator.map.insert(anchor, anchor_id);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let sector = Sector::new(dx, dy);
                let id = generator.push_room(format!("Filler_{dx}_{dy}"), sector);
                generator.map.insert(sector, id);
            }
        }

        let map_before = generator.map.clone();
        let rooms_before = generator.rooms.clone();
        let hall = generator.catalog.medium_rooms[0].clone();

        let txn = generator
            .reconcile_span(anchor_id, hall)
            .unwrap()
            .expect("placement should succeed on unresolved fillers");
        // The map now points every footprint sector at the anchor room.
        let footprint = generator.rooms[anchor_id].sectors.clone();
        assert_eq!(footprint.len(), 4);
        for &sector in &footprint {
            assert_eq!(generator.map.get(&sector), Some(&anchor_id));
        }
        assert_eq!(txn.absorbed.len(), 3);
        for &rid in &txn.absorbed {
            assert!(generator.rooms[rid].doomed);
        }

        generator.rollback(anchor_id, txn);
        assert_eq!(generator.map, map_before);
        assert_eq!(generator.rooms, rooms_before);
    }

    #[test]
    fn test_large_room_commit_absorbs_and_rewires_doors() {
        let mut generator =
            FloorGenerator::new(catalog_with_hall(), GenerationOptions::for_testing(5)).unwrap();

        // 3x3 block of unresolved rooms around the anchor, fully doored.
        let anchor = Sector::ZERO;
        let anchor_id = generator.push_room("Room_0".to_string(), anchor);
        generator.map.insert(anchor, anchor_id);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let sector = Sector::new(dx, dy);
                let id = generator.push_room(format!("Filler_{dx}_{dy}"), sector);
                generator.map.insert(sector, id);
            }
        }
        for id in 0..generator.rooms.len() {
            generator.link_room_neighbors(id);
        }
        generator.instantiate_doors();
        assert_eq!(generator.doors().count(), 12);

        let hall = generator.catalog.medium_rooms[0].clone();
        let txn = generator
            .reconcile_span(anchor_id, hall)
            .unwrap()
            .expect("placement should succeed on unresolved fillers");
        assert!(generator.navigable(anchor_id, &txn).unwrap());
        generator.commit(anchor_id, txn).unwrap();

        let hall_room = &generator.rooms[anchor_id];
        assert!(hall_room.loaded);
        assert!(hall_room.is_large());
        assert_eq!(hall_room.sectors.len(), 4);
        // A 2x2 footprint in the block has 4 interior doors, leaving 8.
        assert_eq!(generator.doors().count(), 8);
        assert_eq!(hall_room.doors.len(), 4);
        for &sector in &hall_room.sectors {
            assert_eq!(generator.map.get(&sector), Some(&anchor_id));
        }
        for room in &generator.rooms {
            if room.doomed {
                assert!(room.doors.is_empty());
            }
        }
        assert_eq!(
            generator.rooms.iter().filter(|r| r.doomed).count(),
            3
        );
    }

    #[test]
    fn test_door_crossing_queues_event() {
        let mut generator =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(42)).unwrap();
        generator.generate().unwrap();

        let door = generator.doors().next().cloned().expect("floor has doors");
        let beyond = match door.orientation {
            Orientation::Horizontal => (door.position.x as f32 + 1.5, door.position.y as f32),
            Orientation::Vertical => (door.position.x as f32, door.position.y as f32 + 1.5),
        };
        generator.door_crossed(door.id, beyond, 7);

        let events = generator.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sector, door.high);
        assert_eq!(events[0].entity, 7);
        assert!(generator.drain_events().is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut a =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(1234)).unwrap();
        let mut b =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(1234)).unwrap();
        assert_eq!(a.generate().unwrap(), b.generate().unwrap());
    }

    #[test]
    fn test_regenerate_same_floor_is_stable() {
        let mut generator =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(77)).unwrap();
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_next_floor_changes_bounds() {
        let mut generator =
            FloorGenerator::new(minimal_catalog(), GenerationOptions::for_testing(77)).unwrap();
        generator.generate().unwrap();
        let next = generator.generate_next_floor().unwrap();
        assert_eq!(next.floor_num, 2);
        assert_eq!(next.min_rooms, 12);
        assert_eq!(next.max_rooms, 16);
    }
}
