//! Environment Grid — per-cell soil, water, decay and heat state.
//!
//! The grid is the garden's substrate. Player actions change it directly
//! (till, plant, water, harvest, sprinklers); three passes evolve it on
//! every tick:
//!
//! 1. **Irrigation** — sprinklers water every cell within their Chebyshev
//!    radius (tier 1..=3 waters radius 1..=3).
//! 2. **Decomposition** — logs rot one stage every `decomposition_interval`
//!    game-seconds, up to stage 2.
//! 3. **Thermal** — heated stones warm toward 1.0 by day and cool toward 0.0
//!    by night.
//!
//! Each pass touches only its own cell kind, so the order doesn't matter,
//! and irrigation is idempotent. Invalid coordinates and unmet
//! preconditions make every mutation a silent no-op.
//!
//! Cells live in a `BTreeMap` so pool queries come back in a stable order,
//! which keeps seeded runs reproducible.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;
use verdant_core::error::{ConfigError, Result};
use verdant_core::plants::{PlantCatalog, PlantDescriptor};
use verdant_core::types::{AgentId, CellPos, Position, TileKind};
use verdant_core::zone::ZoneDefinition;

/// Highest stage a log can rot to.
pub const MAX_DECOMPOSITION_STAGE: u8 = 2;
/// Highest sprinkler tier (and watering radius).
pub const MAX_SPRINKLER_TIER: u8 = 3;

/// Grid tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// World units per tile edge (default: 128).
    pub tile_size: f64,
    /// Visitor slots on cells without a plant-specific capacity (default: 2).
    pub default_agent_slots: u8,
    /// Game-seconds per decomposition stage (default: 180).
    pub decomposition_interval: f64,
    /// Game-seconds for a stone to heat from cold to full (default: 120).
    pub stone_heat_seconds: f64,
    /// Game-seconds for a stone to cool from full to cold (default: 180).
    pub stone_cool_seconds: f64,
    /// Heat at which a stone counts as warm for spawning (default: 0.5).
    pub warm_stone_threshold: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size: 128.0,
            default_agent_slots: 2,
            decomposition_interval: 180.0,
            stone_heat_seconds: 120.0,
            stone_cool_seconds: 180.0,
            warm_stone_threshold: 0.5,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("grid.tile_size", self.tile_size),
            ("grid.decomposition_interval", self.decomposition_interval),
            ("grid.stone_heat_seconds", self.stone_heat_seconds),
            ("grid.stone_cool_seconds", self.stone_cool_seconds),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value }.into());
            }
        }
        if !(0.0..=1.0).contains(&self.warm_stone_threshold) {
            return Err(ConfigError::NotAProbability {
                field: "grid.warm_stone_threshold",
                value: self.warm_stone_threshold,
            }
            .into());
        }
        Ok(())
    }
}

/// A rotting log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogState {
    /// 0..=2, never decreases.
    pub stage: u8,
    /// Game-seconds accumulated toward the next stage.
    pub timer: f64,
}

/// One tile of the garden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub tile_kind: TileKind,
    pub plant_id: Option<String>,
    pub is_watered: bool,
    pub is_water_tile: bool,
    /// Sprinkler tier 1..=3, if one stands here.
    pub sprinkler: Option<u8>,
    pub max_agent_slots: u8,
    pub occupying_agents: BTreeSet<AgentId>,
    pub log: Option<LogState>,
    /// Heat of a heated stone in [0, 1], if this is one.
    pub stone_heat: Option<f64>,
    pub has_uv_lamp: bool,
    /// Watered game-hours spent in the current growth stage.
    pub growth_hours: u32,
}

impl Cell {
    fn tilled(slots: u8) -> Self {
        Self {
            tile_kind: TileKind::Tilled,
            plant_id: None,
            is_watered: false,
            is_water_tile: false,
            sprinkler: None,
            max_agent_slots: slots,
            occupying_agents: BTreeSet::new(),
            log: None,
            stone_heat: None,
            has_uv_lamp: false,
            growth_hours: 0,
        }
    }

    /// Water, log, stone or lamp.
    pub fn is_fixture(&self) -> bool {
        self.is_water_tile || self.log.is_some() || self.stone_heat.is_some() || self.has_uv_lamp
    }

    pub fn has_free_slot(&self) -> bool {
        self.occupying_agents.len() < self.max_agent_slots as usize
    }

    pub fn occupant_count(&self) -> usize {
        self.occupying_agents.len()
    }

    pub fn decomposition_stage(&self) -> Option<u8> {
        self.log.map(|l| l.stage)
    }

    fn clear_plant(&mut self) {
        self.plant_id = None;
        self.growth_hours = 0;
        self.is_watered = false;
    }

    fn evict_all(&mut self) -> Vec<AgentId> {
        std::mem::take(&mut self.occupying_agents).into_iter().collect()
    }
}

/// The tile grid of one zone.
#[derive(Debug, Clone)]
pub struct GardenGrid {
    config: GridConfig,
    width: u32,
    height: u32,
    cells: BTreeMap<CellPos, Cell>,
}

impl GardenGrid {
    /// An empty 0x0 grid; call [`GardenGrid::initialize`] to lay it out.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            width: 0,
            height: 0,
            cells: BTreeMap::new(),
        }
    }

    /// Lay out a zone at the given expansion tier.
    pub fn for_zone(def: &ZoneDefinition, tier: usize, config: GridConfig) -> Self {
        let mut grid = Self::new(config);
        let (width, height) = def.grid_size(0);
        grid.initialize(
            width,
            height,
            &def.water_tiles,
            &def.log_tiles,
            &def.stone_tiles,
            &def.lamp_tiles,
        );
        if tier > 0 {
            let (w, h) = def.grid_size(tier);
            grid.expand(w, h);
        }
        grid
    }

    /// Allocate `width`×`height` tilled cells, then overlay fixtures.
    /// Fixture coordinates outside the grid, or already claimed by an
    /// earlier fixture, are skipped.
    pub fn initialize(
        &mut self,
        width: u32,
        height: u32,
        water: &[CellPos],
        logs: &[CellPos],
        stones: &[CellPos],
        lamps: &[CellPos],
    ) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                self.cells
                    .insert(CellPos::new(x, y), Cell::tilled(self.config.default_agent_slots));
            }
        }

        self.overlay(water, |cell| cell.is_water_tile = true);
        self.overlay(logs, |cell| {
            cell.log = Some(LogState {
                stage: 0,
                timer: 0.0,
            })
        });
        self.overlay(stones, |cell| cell.stone_heat = Some(0.0));
        self.overlay(lamps, |cell| cell.has_uv_lamp = true);
    }

    fn overlay(&mut self, positions: &[CellPos], apply: impl Fn(&mut Cell)) {
        for pos in positions {
            if let Some(cell) = self.cells.get_mut(pos) {
                if cell.is_fixture() {
                    continue;
                }
                cell.tile_kind = TileKind::Empty;
                cell.clear_plant();
                apply(cell);
            }
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellPos, &Cell)> {
        self.cells.iter()
    }

    // --- Per-tick passes ---

    /// Run irrigation, decomposition and thermal passes.
    pub fn tick(&mut self, dt: f64, speed_multiplier: f64, is_daytime: bool) {
        let scaled = (dt * speed_multiplier).max(0.0);
        let watered = self.irrigate();
        self.decompose(scaled);
        self.update_heat(scaled, is_daytime);
        if watered > 0 {
            trace!(watered, "irrigation pass");
        }
    }

    /// Water every eligible cell in range of a sprinkler. Returns how many
    /// cells changed.
    pub fn irrigate(&mut self) -> usize {
        let sprinklers: Vec<(CellPos, u8)> = self
            .cells
            .iter()
            .filter_map(|(pos, cell)| cell.sprinkler.map(|tier| (*pos, tier)))
            .collect();

        let mut changed = 0;
        for (center, tier) in sprinklers {
            let r = tier as i32;
            for dx in -r..=r {
                for dy in -r..=r {
                    if let Some(cell) = self.cells.get_mut(&center.offset(dx, dy)) {
                        if !cell.is_water_tile && cell.sprinkler.is_none() && !cell.is_watered {
                            cell.is_watered = true;
                            changed += 1;
                        }
                    }
                }
            }
        }
        changed
    }

    fn decompose(&mut self, scaled_dt: f64) {
        let interval = self.config.decomposition_interval;
        for log in self.cells.values_mut().filter_map(|c| c.log.as_mut()) {
            if log.stage >= MAX_DECOMPOSITION_STAGE {
                log.timer = 0.0;
                continue;
            }
            log.timer += scaled_dt;
            while log.timer >= interval && log.stage < MAX_DECOMPOSITION_STAGE {
                log.timer -= interval;
                log.stage += 1;
            }
            if log.stage >= MAX_DECOMPOSITION_STAGE {
                log.timer = 0.0;
            }
        }
    }

    fn update_heat(&mut self, scaled_dt: f64, is_daytime: bool) {
        let (target, rate) = if is_daytime {
            (1.0, 1.0 / self.config.stone_heat_seconds)
        } else {
            (0.0, 1.0 / self.config.stone_cool_seconds)
        };
        let step = rate * scaled_dt;
        for heat in self.cells.values_mut().filter_map(|c| c.stone_heat.as_mut()) {
            *heat = if target > *heat {
                (*heat + step).min(target)
            } else {
                (*heat - step).max(target)
            }
            .clamp(0.0, 1.0);
        }
    }

    // --- Layout changes ---

    /// Grow the grid to `new_width`×`new_height`, keeping it centered.
    /// Returns the offset applied to every existing coordinate, or `None`
    /// if either axis would shrink.
    pub fn expand(&mut self, new_width: u32, new_height: u32) -> Option<(i32, i32)> {
        if new_width < self.width || new_height < self.height {
            return None;
        }
        let dx = (new_width - self.width) as i32 / 2;
        let dy = (new_height - self.height) as i32 / 2;

        let slots = self.config.default_agent_slots;
        let old = std::mem::take(&mut self.cells);
        for (pos, cell) in old {
            self.cells.insert(pos.offset(dx, dy), cell);
        }
        for x in 0..new_width as i32 {
            for y in 0..new_height as i32 {
                self.cells
                    .entry(CellPos::new(x, y))
                    .or_insert_with(|| Cell::tilled(slots));
            }
        }
        self.width = new_width;
        self.height = new_height;
        Some((dx, dy))
    }

    /// Stand a sprinkler on `pos`. Rejected on water, fixtures and existing
    /// sprinklers. Returns the agents evicted from the cell.
    pub fn place_sprinkler(&mut self, pos: CellPos, tier: u8) -> Option<Vec<AgentId>> {
        if !(1..=MAX_SPRINKLER_TIER).contains(&tier) {
            return None;
        }
        let cell = self.cells.get_mut(&pos)?;
        if cell.sprinkler.is_some() || cell.is_fixture() {
            return None;
        }
        cell.sprinkler = Some(tier);
        cell.tile_kind = TileKind::Empty;
        cell.clear_plant();
        cell.max_agent_slots = 0;
        Some(cell.evict_all())
    }

    /// Take a sprinkler away, leaving bare ground.
    pub fn remove_sprinkler(&mut self, pos: CellPos) -> bool {
        let default_slots = self.config.default_agent_slots;
        match self.cells.get_mut(&pos) {
            Some(cell) if cell.sprinkler.is_some() => {
                cell.sprinkler = None;
                cell.tile_kind = TileKind::Empty;
                cell.max_agent_slots = default_slots;
                true
            }
            _ => false,
        }
    }

    // --- Agent slots ---

    /// Bind `agent` to `pos`. Fails when the cell is full or missing.
    pub fn occupy_slot(&mut self, pos: CellPos, agent: AgentId) -> bool {
        match self.cells.get_mut(&pos) {
            Some(cell) if cell.has_free_slot() => cell.occupying_agents.insert(agent),
            _ => false,
        }
    }

    pub fn vacate_slot(&mut self, pos: CellPos, agent: AgentId) -> bool {
        self.cells
            .get_mut(&pos)
            .map(|cell| cell.occupying_agents.remove(&agent))
            .unwrap_or(false)
    }

    // --- Planting ---

    /// Work bare ground into soil.
    pub fn till(&mut self, pos: CellPos) -> bool {
        match self.cells.get_mut(&pos) {
            Some(cell)
                if cell.tile_kind == TileKind::Empty
                    && cell.sprinkler.is_none()
                    && !cell.is_fixture() =>
            {
                cell.tile_kind = TileKind::Tilled;
                true
            }
            _ => false,
        }
    }

    /// Sow `plant` on tilled soil.
    pub fn plant(&mut self, pos: CellPos, plant: &PlantDescriptor) -> bool {
        match self.cells.get_mut(&pos) {
            Some(cell) if cell.tile_kind == TileKind::Tilled && !cell.is_fixture() => {
                cell.tile_kind = TileKind::Planted;
                cell.plant_id = Some(plant.id.clone());
                cell.growth_hours = 0;
                cell.max_agent_slots = plant.insect_slots;
                debug_assert!(cell.occupying_agents.len() <= cell.max_agent_slots as usize);
                true
            }
            _ => false,
        }
    }

    /// Swap whatever grows on `pos` for a fresh `plant`. Returns the evicted
    /// visitors of the old plant.
    pub fn replant(&mut self, pos: CellPos, plant: &PlantDescriptor) -> Option<Vec<AgentId>> {
        let cell = self.cells.get_mut(&pos)?;
        if !cell.tile_kind.has_plant() {
            return None;
        }
        let evicted = cell.evict_all();
        cell.clear_plant();
        cell.tile_kind = TileKind::Planted;
        cell.plant_id = Some(plant.id.clone());
        cell.max_agent_slots = plant.insect_slots;
        Some(evicted)
    }

    /// Water a cell by hand.
    pub fn water(&mut self, pos: CellPos) -> bool {
        match self.cells.get_mut(&pos) {
            Some(cell) if !cell.is_water_tile && cell.sprinkler.is_none() && !cell.is_watered => {
                cell.is_watered = true;
                true
            }
            _ => false,
        }
    }

    /// One game-hour of growth: every watered seedling or growing plant
    /// gains an hour; a full stage advances it and uses up the water.
    /// Returns the cells that came into bloom, with their plant ids.
    pub fn advance_growth_hour(&mut self, plants: &PlantCatalog) -> Vec<(CellPos, String)> {
        let mut bloomed = Vec::new();
        for (pos, cell) in self.cells.iter_mut() {
            if !cell.is_watered
                || !matches!(cell.tile_kind, TileKind::Planted | TileKind::Growing)
            {
                continue;
            }
            let Some(plant_id) = cell.plant_id.clone() else {
                continue;
            };
            let cycles = plants.get(&plant_id).map(|p| p.growth_cycles).unwrap_or(1);
            cell.growth_hours += 1;
            if cell.growth_hours < cycles {
                continue;
            }
            cell.growth_hours = 0;
            cell.is_watered = false;
            cell.tile_kind = match cell.tile_kind {
                TileKind::Planted => TileKind::Growing,
                _ => {
                    bloomed.push((*pos, plant_id));
                    TileKind::Blooming
                }
            };
        }
        bloomed
    }

    /// Pick a blooming plant. It drops back to the start of growing.
    pub fn harvest(&mut self, pos: CellPos) -> Option<String> {
        let cell = self.cells.get_mut(&pos)?;
        if cell.tile_kind != TileKind::Blooming {
            return None;
        }
        cell.tile_kind = TileKind::Growing;
        cell.growth_hours = 0;
        cell.is_watered = false;
        cell.plant_id.clone()
    }

    /// Pull a plant out, returning its id and the evicted visitors.
    pub fn remove_plant(&mut self, pos: CellPos) -> Option<(String, Vec<AgentId>)> {
        let default_slots = self.config.default_agent_slots;
        let cell = self.cells.get_mut(&pos)?;
        if !cell.tile_kind.has_plant() {
            return None;
        }
        let plant_id = cell.plant_id.take().unwrap_or_default();
        cell.clear_plant();
        cell.tile_kind = TileKind::Tilled;
        cell.max_agent_slots = default_slots;
        Some((plant_id, cell.evict_all()))
    }

    // --- Queries ---

    fn free_cells_where(&self, pred: impl Fn(&Cell) -> bool) -> Vec<CellPos> {
        self.cells
            .iter()
            .filter(|(_, c)| c.has_free_slot() && pred(c))
            .map(|(p, _)| *p)
            .collect()
    }

    pub fn blooming_cells_with_free_slot(&self) -> Vec<CellPos> {
        self.free_cells_where(|c| c.tile_kind == TileKind::Blooming)
    }

    pub fn water_cells_with_free_slot(&self) -> Vec<CellPos> {
        self.free_cells_where(|c| c.is_water_tile)
    }

    pub fn log_cells_with_free_slot(&self) -> Vec<CellPos> {
        self.free_cells_where(|c| c.log.is_some())
    }

    pub fn warm_stone_cells_with_free_slot(&self) -> Vec<CellPos> {
        let threshold = self.config.warm_stone_threshold;
        self.free_cells_where(|c| c.stone_heat.is_some_and(|h| h >= threshold))
    }

    /// Ids of every plant currently in bloom, occupied or not.
    pub fn blooming_plant_ids(&self) -> BTreeSet<String> {
        self.cells
            .values()
            .filter(|c| c.tile_kind == TileKind::Blooming)
            .filter_map(|c| c.plant_id.clone())
            .collect()
    }

    pub fn blooming_plant_count(&self) -> usize {
        self.cells
            .values()
            .filter(|c| c.tile_kind == TileKind::Blooming)
            .count()
    }

    pub fn water_tile_count(&self) -> usize {
        self.cells.values().filter(|c| c.is_water_tile).count()
    }

    pub fn has_uv_lamp(&self) -> bool {
        self.cells.values().any(|c| c.has_uv_lamp)
    }

    pub fn total_occupants(&self) -> usize {
        self.cells.values().map(|c| c.occupying_agents.len()).sum()
    }

    /// World position of a cell's center, with the grid centered on the origin.
    pub fn cell_to_world(&self, pos: CellPos) -> Position {
        let t = self.config.tile_size;
        Position::new(
            -(self.width as f64) * t / 2.0 + pos.x as f64 * t + t / 2.0,
            -(self.height as f64) * t / 2.0 + pos.y as f64 * t + t / 2.0,
        )
    }

    /// Cell under a world position, if inside the grid.
    pub fn world_to_cell(&self, world: Position) -> Option<CellPos> {
        let t = self.config.tile_size;
        let lx = world.x + self.width as f64 * t / 2.0;
        let ly = world.y + self.height as f64 * t / 2.0;
        if lx < 0.0 || ly < 0.0 {
            return None;
        }
        let pos = CellPos::new((lx / t) as i32, (ly / t) as i32);
        self.contains(pos).then_some(pos)
    }

    /// Check every cell invariant, reporting the first violation.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (pos, cell) in &self.cells {
            if cell.occupying_agents.len() > cell.max_agent_slots as usize {
                return Err(format!(
                    "{} holds {} agents with {} slots",
                    pos,
                    cell.occupying_agents.len(),
                    cell.max_agent_slots
                ));
            }
            if cell.is_water_tile && (cell.tile_kind != TileKind::Empty || cell.plant_id.is_some()) {
                return Err(format!("water tile {} carries soil state", pos));
            }
            if let Some(log) = cell.log {
                if log.stage > MAX_DECOMPOSITION_STAGE {
                    return Err(format!("log {} at stage {}", pos, log.stage));
                }
            }
            if let Some(heat) = cell.stone_heat {
                if !(0.0..=1.0).contains(&heat) {
                    return Err(format!("stone {} at heat {}", pos, heat));
                }
            }
            if cell.sprinkler.is_some() && cell.max_agent_slots != 0 {
                return Err(format!("sprinkler {} offers slots", pos));
            }
        }
        Ok(())
    }
}
