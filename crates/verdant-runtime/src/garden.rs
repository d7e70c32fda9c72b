//! Garden — the host-facing simulation.
//!
//! The garden owns everything that changes: one grid per unlocked zone, the
//! clock, the spawn scheduler, the visitor registry, the nectar wallet and
//! the journal. The host calls [`Garden::tick`] once per frame, issues
//! player actions through the planting and zone methods, and drains the
//! outbound [`GardenEvent`] queue.
//!
//! Each tick (skipped entirely while paused):
//! 1. The clock advances; every game-hour grows the active zone's plants,
//!    every period change is forwarded to the active zone's visitors as an
//!    interrupt
//! 2. The active grid runs its irrigation, decomposition and thermal passes
//! 3. The scheduler may plan a spawn, which claims a host slot
//! 4. Every visitor of the active zone ticks
//! 5. Freed visitors leave the registry and their host slot is vacated
//!
//! Only the active zone is simulated; other zones wait, visitors included,
//! until the player switches back. Switching back hands those visitors the
//! current period once, so a day species still leaves if it is now night.

use crate::config::GardenConfig;
use crate::economy::Economy;
use crate::grid::{GardenGrid, MAX_SPRINKLER_TIER};
use crate::journal::{star_rating, Journal, JournalChange};
use crate::scheduler::{SchedulerStats, SpawnContext, SpawnScheduler};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use verdant_agents::insect::{Insect, InsectState};
use verdant_core::clock::{ClockEvent, DayPeriod, GameClock};
use verdant_core::error::{ConfigError, Result};
use verdant_core::events::{GardenEvent, Interrupt};
use verdant_core::plants::PlantCatalog;
use verdant_core::species::SpeciesCatalog;
use verdant_core::types::{AgentId, CellPos, Position, ZoneType};
use verdant_core::zone::ZoneTable;

/// Unlock state and expansion tier of one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ZoneProgress {
    pub unlocked: bool,
    pub tier: usize,
}

/// A live insect and the zone it visits.
#[derive(Debug, Clone)]
struct Visitor {
    insect: Insect,
    zone: ZoneType,
}

/// Statistics about the garden.
#[derive(Debug, Clone, Serialize)]
pub struct GardenStats {
    pub day: u64,
    pub hour: u32,
    pub minute: u32,
    pub period: DayPeriod,
    pub active_zone: ZoneType,
    pub zones_unlocked: usize,
    pub visitors: usize,
    pub insect_cap: usize,
    pub total_spawned: u64,
    pub total_departed: u64,
    pub blooming_cells: usize,
    pub nectar: u64,
    pub species_discovered: usize,
    pub scheduler: SchedulerStats,
}

/// A serializable view of one visitor.
#[derive(Debug, Clone, Serialize)]
pub struct VisitorSnapshot {
    pub agent: AgentId,
    pub species_id: String,
    pub state: InsectState,
    pub position: Position,
    pub host: CellPos,
    pub capturable: bool,
}

/// A serializable view of the active zone at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct GardenSnapshot {
    pub stats: GardenStats,
    pub visitors: Vec<VisitorSnapshot>,
}

/// The whole simulation.
#[derive(Debug)]
pub struct Garden {
    config: GardenConfig,
    species: SpeciesCatalog,
    plants: PlantCatalog,
    zones: ZoneTable,

    grids: BTreeMap<ZoneType, GardenGrid>,
    progress: BTreeMap<ZoneType, ZoneProgress>,
    active_zone: ZoneType,

    visitors: BTreeMap<AgentId, Visitor>,
    clock: GameClock,
    scheduler: SpawnScheduler,
    economy: Economy,
    journal: Journal,

    events: Vec<GardenEvent>,
    paused: bool,
    speed: f64,
    total_spawned: u64,
    total_departed: u64,
}

impl Garden {
    /// A garden over the builtin catalogs.
    pub fn new(config: GardenConfig) -> Result<Self> {
        Self::with_catalogs(
            config,
            SpeciesCatalog::builtin()?,
            PlantCatalog::builtin()?,
            ZoneTable::builtin()?,
        )
    }

    /// A garden over custom catalogs. The zone table must define the
    /// starter zone, which begins unlocked and active.
    pub fn with_catalogs(
        config: GardenConfig,
        species: SpeciesCatalog,
        plants: PlantCatalog,
        zones: ZoneTable,
    ) -> Result<Self> {
        config.validate()?;
        species.validate_against(&plants)?;
        let starter = zones.get(ZoneType::Starter).ok_or_else(|| ConfigError::Invalid {
            field: "zones",
            reason: "the zone table has no starter zone".into(),
        })?;

        let mut grids = BTreeMap::new();
        grids.insert(
            ZoneType::Starter,
            GardenGrid::for_zone(starter, 0, config.grid.clone()),
        );
        let progress = zones
            .iter()
            .map(|def| {
                let unlocked = def.zone == ZoneType::Starter;
                (def.zone, ZoneProgress { unlocked, tier: 0 })
            })
            .collect();

        Ok(Self {
            clock: GameClock::new(config.clock.clone()),
            scheduler: SpawnScheduler::new(config.spawn.clone(), config.seed),
            economy: Economy::new(config.starting_nectar),
            journal: Journal::new(),
            species,
            plants,
            zones,
            grids,
            progress,
            active_zone: ZoneType::Starter,
            visitors: BTreeMap::new(),
            events: Vec::new(),
            paused: false,
            speed: 1.0,
            total_spawned: 0,
            total_departed: 0,
            config,
        })
    }

    // --- Simulation ---

    /// Advance the garden by `dt` real seconds.
    pub fn tick(&mut self, dt: f64) {
        if self.paused || !(dt > 0.0) {
            return;
        }
        let speed = self.speed;
        let scaled = dt * speed;
        let active = self.active_zone;

        for event in self.clock.advance(scaled) {
            match event {
                ClockEvent::HourPassed(hour) => {
                    self.events.push(GardenEvent::HourPassed { hour });
                    if let Some(grid) = self.grids.get_mut(&active) {
                        for (cell, plant_id) in grid.advance_growth_hour(&self.plants) {
                            debug!(%cell, plant = %plant_id, "plant bloomed");
                            self.events.push(GardenEvent::PlantBloomed {
                                zone: active,
                                cell,
                                plant_id,
                            });
                        }
                    }
                }
                ClockEvent::PeriodChanged { old, new } => {
                    debug!(%old, %new, "time of day changed");
                    self.events.push(GardenEvent::TimeOfDayChanged { old, new });
                    for visitor in self.visitors.values_mut().filter(|v| v.zone == active) {
                        visitor.insect.interrupt(Interrupt::PeriodChanged(new));
                    }
                }
            }
        }

        let is_daytime = self.clock.is_daytime();
        let ctx = SpawnContext {
            is_daytime,
            zone: active,
            insect_cap: self.insect_cap(active),
            population: self.population(active),
        };

        if let Some(grid) = self.grids.get_mut(&active) {
            grid.tick(dt, speed, is_daytime);

            let outcome = self.scheduler.tick(dt, speed, &ctx, grid, &self.species);
            if let Some(plan) = outcome.into_plan() {
                if let Some(insect) = SpawnScheduler::instantiate(plan, grid, &self.config.insect) {
                    self.events.push(GardenEvent::AgentSpawned {
                        agent: insect.id(),
                        species_id: insect.species_id().to_string(),
                        zone: active,
                        cell: insect.host_cell(),
                    });
                    self.total_spawned += 1;
                    self.visitors.insert(
                        insect.id(),
                        Visitor {
                            insect,
                            zone: active,
                        },
                    );
                }
            }
        }

        let mut freed = Vec::new();
        for (id, visitor) in self.visitors.iter_mut() {
            if visitor.zone != active {
                continue;
            }
            visitor.insect.tick(scaled, &mut self.events);
            if visitor.insect.is_freed() {
                freed.push(*id);
            }
        }
        for id in freed {
            self.release(id);
        }

        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
    }

    /// Run `frames` ticks of `dt` seconds each.
    pub fn run(&mut self, frames: u64, dt: f64) {
        for _ in 0..frames {
            self.tick(dt);
        }
    }

    /// Remove a freed visitor and give back its host slot.
    fn release(&mut self, id: AgentId) {
        if let Some(visitor) = self.visitors.remove(&id) {
            if let Some(grid) = self.grids.get_mut(&visitor.zone) {
                grid.vacate_slot(visitor.insect.host_cell(), id);
            }
            self.total_departed += 1;
        }
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GardenEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GardenEvent] {
        &self.events
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Set the game-speed multiplier (negative values clamp to 0).
    pub fn set_speed(&mut self, multiplier: f64) {
        self.speed = multiplier.max(0.0);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    // --- Visitor queries ---

    pub fn visitor(&self, agent: AgentId) -> Option<&Insect> {
        self.visitors.get(&agent).map(|v| &v.insect)
    }

    /// Visitors of the active zone.
    pub fn visitors(&self) -> impl Iterator<Item = &Insect> {
        let active = self.active_zone;
        self.visitors
            .values()
            .filter(move |v| v.zone == active)
            .map(|v| &v.insect)
    }

    pub fn is_capturable(&self, agent: AgentId) -> bool {
        self.visitor(agent).is_some_and(|i| i.is_capturable())
    }

    pub fn species_id(&self, agent: AgentId) -> Option<&str> {
        self.visitor(agent).map(|i| i.species_id())
    }

    pub fn display_name(&self, agent: AgentId) -> Option<&str> {
        self.visitor(agent).map(|i| i.display_name())
    }

    pub fn current_position(&self, agent: AgentId) -> Option<Position> {
        self.visitor(agent).map(|i| i.position())
    }

    pub fn try_freeze(&mut self, agent: AgentId) -> bool {
        self.visitors
            .get_mut(&agent)
            .is_some_and(|v| v.insect.try_freeze())
    }

    /// Photograph a visitor, aiming at `aim` with a frame of `frame_radius`
    /// world units. A hit freezes the insect and records it in the journal.
    /// Returns the star rating, or `None` for a miss.
    pub fn photograph(&mut self, agent: AgentId, aim: Position, frame_radius: f64) -> Option<u8> {
        let visitor = self.visitors.get_mut(&agent)?;
        if visitor.zone != self.active_zone || !visitor.insect.is_capturable() {
            return None;
        }
        let stars = star_rating(aim.distance_to(&visitor.insect.position()), frame_radius)?;
        visitor.insect.try_freeze();

        let species_id = visitor.insect.species_id().to_string();
        match self.journal.record(&species_id, stars) {
            JournalChange::Discovered => {
                info!(species = %species_id, stars, "new species photographed");
                self.events.push(GardenEvent::SpeciesDiscovered {
                    species_id: species_id.clone(),
                });
                self.events.push(GardenEvent::JournalUpdated { species_id, stars });
            }
            JournalChange::Improved => {
                self.events.push(GardenEvent::JournalUpdated { species_id, stars });
            }
            JournalChange::Unchanged => {}
        }
        Some(stars)
    }

    /// Live visitors in `zone`.
    pub fn population(&self, zone: ZoneType) -> usize {
        self.visitors.values().filter(|v| v.zone == zone).count()
    }

    // --- Planting ---

    fn active_grid_mut(&mut self) -> Option<&mut GardenGrid> {
        self.grids.get_mut(&self.active_zone)
    }

    fn interrupt_all(&mut self, agents: &[AgentId]) {
        for agent in agents {
            if let Some(visitor) = self.visitors.get_mut(agent) {
                visitor.insect.interrupt(Interrupt::HostCleared);
            }
        }
    }

    pub fn till(&mut self, pos: CellPos) -> bool {
        self.active_grid_mut().is_some_and(|g| g.till(pos))
    }

    /// Buy and sow `plant_id` on tilled soil of the active zone. Only
    /// starter plants and plants of the active zone can be sown.
    pub fn plant(&mut self, pos: CellPos, plant_id: &str) -> bool {
        let zone = self.active_zone;
        let Some(plant) = self.plants.get(plant_id) else {
            return false;
        };
        if plant.zone != ZoneType::Starter && plant.zone != zone {
            return false;
        }
        let cost = plant.seed_cost as u64;
        if !self.economy.can_afford(cost) {
            return false;
        }
        let Some(grid) = self.grids.get_mut(&zone) else {
            return false;
        };
        if !grid.plant(pos, plant) {
            return false;
        }
        self.economy.try_spend(cost);
        debug!(cell = %pos, plant = plant_id, "planted");
        self.events.push(GardenEvent::PlantPlanted {
            zone,
            cell: pos,
            plant_id: plant_id.to_string(),
        });
        self.events.push(GardenEvent::NectarChanged {
            balance: self.economy.nectar(),
        });
        true
    }

    /// Swap the plant on `pos` for a newly bought `plant_id`. Visitors of
    /// the old plant are sent away.
    pub fn replant(&mut self, pos: CellPos, plant_id: &str) -> bool {
        let zone = self.active_zone;
        let Some(plant) = self.plants.get(plant_id) else {
            return false;
        };
        if plant.zone != ZoneType::Starter && plant.zone != zone {
            return false;
        }
        let cost = plant.seed_cost as u64;
        if !self.economy.can_afford(cost) {
            return false;
        }
        let Some(grid) = self.grids.get_mut(&zone) else {
            return false;
        };
        let Some(old) = grid.cell(pos).and_then(|c| c.plant_id.clone()) else {
            return false;
        };
        let Some(evicted) = grid.replant(pos, plant) else {
            return false;
        };
        self.economy.try_spend(cost);
        self.interrupt_all(&evicted);
        self.events.push(GardenEvent::PlantRemoved {
            zone,
            cell: pos,
            plant_id: old,
        });
        self.events.push(GardenEvent::PlantPlanted {
            zone,
            cell: pos,
            plant_id: plant_id.to_string(),
        });
        self.events.push(GardenEvent::NectarChanged {
            balance: self.economy.nectar(),
        });
        true
    }

    pub fn water(&mut self, pos: CellPos) -> bool {
        self.active_grid_mut().is_some_and(|g| g.water(pos))
    }

    /// Harvest a blooming plant. Returns the nectar earned.
    pub fn harvest(&mut self, pos: CellPos) -> Option<u64> {
        let zone = self.active_zone;
        let plant_id = self.grids.get_mut(&zone)?.harvest(pos)?;
        let base_yield = self.plants.get(&plant_id).map(|p| p.nectar_yield).unwrap_or(0);
        let payout = self.economy.record_harvest(&plant_id, base_yield);

        self.events.push(GardenEvent::PlantHarvested {
            zone,
            cell: pos,
            plant_id: plant_id.clone(),
            nectar: payout.nectar,
        });
        self.events.push(GardenEvent::NectarChanged {
            balance: self.economy.nectar(),
        });
        if payout.leveled_up {
            info!(plant = %plant_id, level = payout.level, "plant leveled up");
            self.events.push(GardenEvent::PlantLevelUp {
                plant_id,
                level: payout.level,
            });
        }
        Some(payout.nectar)
    }

    /// Pull a plant out. Its visitors are sent away.
    pub fn remove_plant(&mut self, pos: CellPos) -> Option<String> {
        let zone = self.active_zone;
        let (plant_id, evicted) = self.grids.get_mut(&zone)?.remove_plant(pos)?;
        self.interrupt_all(&evicted);
        self.events.push(GardenEvent::PlantRemoved {
            zone,
            cell: pos,
            plant_id: plant_id.clone(),
        });
        Some(plant_id)
    }

    /// Put a sprinkler of `tier` (1..=3) on `pos`. Anything growing there
    /// is lost and its visitors are sent away.
    pub fn place_sprinkler(&mut self, pos: CellPos, tier: u8) -> bool {
        if !(1..=MAX_SPRINKLER_TIER).contains(&tier) {
            return false;
        }
        let zone = self.active_zone;
        let Some(grid) = self.grids.get_mut(&zone) else {
            return false;
        };
        let old_plant = grid.cell(pos).and_then(|c| c.plant_id.clone());
        let Some(evicted) = grid.place_sprinkler(pos, tier) else {
            return false;
        };
        self.interrupt_all(&evicted);
        if let Some(plant_id) = old_plant {
            self.events.push(GardenEvent::PlantRemoved {
                zone,
                cell: pos,
                plant_id,
            });
        }
        true
    }

    pub fn remove_sprinkler(&mut self, pos: CellPos) -> bool {
        self.active_grid_mut().is_some_and(|g| g.remove_sprinkler(pos))
    }

    // --- Zones ---

    pub fn active_zone(&self) -> ZoneType {
        self.active_zone
    }

    pub fn zone_progress(&self, zone: ZoneType) -> ZoneProgress {
        self.progress.get(&zone).copied().unwrap_or_default()
    }

    pub fn is_unlocked(&self, zone: ZoneType) -> bool {
        self.zone_progress(zone).unlocked
    }

    /// Base cap plus the bonuses of every unlocked expansion tier.
    pub fn insect_cap(&self, zone: ZoneType) -> usize {
        self.zones.insect_cap(
            zone,
            self.zone_progress(zone).tier,
            self.config.spawn.base_insect_cap,
        )
    }

    /// Locked, affordable, and enough species in the journal.
    pub fn can_unlock(&self, zone: ZoneType) -> bool {
        match self.zones.get(zone) {
            Some(def) => {
                !self.is_unlocked(zone)
                    && self.economy.can_afford(def.unlock_cost)
                    && self.journal.discovered_count() >= def.journal_required
            }
            None => false,
        }
    }

    pub fn unlock_zone(&mut self, zone: ZoneType) -> bool {
        if !self.can_unlock(zone) {
            return false;
        }
        let Some(def) = self.zones.get(zone) else {
            return false;
        };
        if !self.economy.try_spend(def.unlock_cost) {
            return false;
        }
        self.grids
            .insert(zone, GardenGrid::for_zone(def, 0, self.config.grid.clone()));
        self.progress.entry(zone).or_default().unlocked = true;
        info!(%zone, cost = def.unlock_cost, "zone unlocked");
        self.events.push(GardenEvent::ZoneUnlocked { zone });
        self.events.push(GardenEvent::NectarChanged {
            balance: self.economy.nectar(),
        });
        true
    }

    /// Make `zone` the simulated one. No-op if locked or already active.
    pub fn switch_zone(&mut self, zone: ZoneType) -> bool {
        if zone == self.active_zone || !self.is_unlocked(zone) {
            return false;
        }
        let old = self.active_zone;
        self.active_zone = zone;
        // Resumed visitors missed every period change while suspended.
        let period = self.clock.period();
        for visitor in self.visitors.values_mut().filter(|v| v.zone == zone) {
            visitor.insect.interrupt(Interrupt::PeriodChanged(period));
        }
        info!(%old, new = %zone, "zone changed");
        self.events.push(GardenEvent::ZoneChanged { old, new: zone });
        true
    }

    /// Buy the next expansion tier of `zone`. Every cell and visitor moves
    /// with the recentered grid.
    pub fn expand_zone(&mut self, zone: ZoneType) -> bool {
        let progress = self.zone_progress(zone);
        if !progress.unlocked {
            return false;
        }
        let Some(next) = self.zones.get(zone).and_then(|d| d.next_tier(progress.tier)) else {
            return false;
        };
        let (width, height, cost) = (next.width, next.height, next.nectar_cost);
        if !self.economy.can_afford(cost) {
            return false;
        }
        let Some(grid) = self.grids.get_mut(&zone) else {
            return false;
        };
        let Some((dx, dy)) = grid.expand(width, height) else {
            return false;
        };
        self.economy.try_spend(cost);

        for visitor in self.visitors.values_mut().filter(|v| v.zone == zone) {
            let host = visitor.insect.host_cell().offset(dx, dy);
            visitor.insect.rehost(host, grid.cell_to_world(host));
        }

        let tier = progress.tier + 1;
        self.progress.entry(zone).or_default().tier = tier;
        info!(%zone, tier, width, height, "zone expanded");
        self.events.push(GardenEvent::ZoneExpanded {
            zone,
            tier,
            width,
            height,
        });
        self.events.push(GardenEvent::NectarChanged {
            balance: self.economy.nectar(),
        });
        true
    }

    // --- Accessors ---

    pub fn grid(&self, zone: ZoneType) -> Option<&GardenGrid> {
        self.grids.get(&zone)
    }

    pub fn active_grid(&self) -> Option<&GardenGrid> {
        self.grids.get(&self.active_zone)
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn species(&self) -> &SpeciesCatalog {
        &self.species
    }

    pub fn plants(&self) -> &PlantCatalog {
        &self.plants
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    /// Make the scheduler evaluate on the next tick.
    pub fn make_spawn_due(&mut self) {
        self.scheduler.make_due();
    }

    pub fn stats(&self) -> GardenStats {
        GardenStats {
            day: self.clock.day(),
            hour: self.clock.hour(),
            minute: self.clock.minute(),
            period: self.clock.period(),
            active_zone: self.active_zone,
            zones_unlocked: self.progress.values().filter(|p| p.unlocked).count(),
            visitors: self.visitors.len(),
            insect_cap: self.insect_cap(self.active_zone),
            total_spawned: self.total_spawned,
            total_departed: self.total_departed,
            blooming_cells: self
                .active_grid()
                .map(|g| g.blooming_plant_count())
                .unwrap_or(0),
            nectar: self.economy.nectar(),
            species_discovered: self.journal.discovered_count(),
            scheduler: self.scheduler.stats(),
        }
    }

    pub fn snapshot(&self) -> GardenSnapshot {
        GardenSnapshot {
            stats: self.stats(),
            visitors: self
                .visitors()
                .map(|insect| VisitorSnapshot {
                    agent: insect.id(),
                    species_id: insect.species_id().to_string(),
                    state: insect.state(),
                    position: insect.position(),
                    host: insect.host_cell(),
                    capturable: insect.is_capturable(),
                })
                .collect(),
        }
    }

    /// Grid invariants plus registry consistency: every occupant is a live
    /// visitor of that zone hosted on that cell, and no cell is over capacity.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (zone, grid) in &self.grids {
            grid.check_invariants()?;
            for (pos, cell) in grid.cells() {
                for agent in &cell.occupying_agents {
                    match self.visitors.get(agent) {
                        Some(v) if v.zone == *zone && v.insect.host_cell() == *pos => {}
                        _ => return Err(format!("{} on {} {} is not a visitor there", agent, zone, pos)),
                    }
                }
            }
        }
        if self.population(self.active_zone) > self.insect_cap(self.active_zone) {
            return Err(format!("{} is over its insect cap", self.active_zone));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SpawnConfig;
    use verdant_core::types::TileKind;

    fn garden() -> Garden {
        let config = GardenConfig {
            starting_nectar: 10_000,
            spawn: SpawnConfig {
                quiet_tick_chance: 0.0,
                ..SpawnConfig::default()
            },
            ..GardenConfig::default()
        };
        Garden::new(config).unwrap()
    }

    fn soil_cell(g: &Garden) -> CellPos {
        g.active_grid()
            .unwrap()
            .cells()
            .find(|(_, c)| c.tile_kind == TileKind::Tilled && !c.is_fixture())
            .map(|(p, _)| *p)
            .unwrap()
    }

    #[test]
    fn starts_in_the_unlocked_starter_zone() {
        let g = garden();
        assert_eq!(g.active_zone(), ZoneType::Starter);
        assert!(g.is_unlocked(ZoneType::Starter));
        assert!(!g.is_unlocked(ZoneType::Meadow));
        assert_eq!(g.insect_cap(ZoneType::Starter), 12);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn planting_costs_seed_nectar() {
        let mut g = garden();
        let pos = soil_cell(&g);
        let cost = g.plants().get("lavender").unwrap().seed_cost as u64;
        assert!(g.plant(pos, "lavender"));
        assert_eq!(g.economy().nectar(), 10_000 - cost);
        assert!(!g.plant(pos, "lavender"), "cell is taken");
        assert!(!g.plant(soil_cell(&g), "no_such_plant"));
        let events = g.drain_events();
        assert!(matches!(events[0], GardenEvent::PlantPlanted { .. }));
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn pause_freezes_everything() {
        let mut g = garden();
        g.pause();
        g.run(600, 0.1);
        assert_eq!(g.stats().scheduler.evaluations, 0);
        assert!(g.drain_events().is_empty());
        g.resume();
        g.run(60, 0.1);
        assert_eq!(g.stats().scheduler.evaluations, 1);
    }

    #[test]
    fn zones_unlock_with_nectar_and_journal() {
        let mut g = garden();
        let required = g.zones().get(ZoneType::Meadow).unwrap().journal_required;
        assert!(required > 0);
        assert!(!g.unlock_zone(ZoneType::Meadow), "journal too thin");
        assert!(!g.switch_zone(ZoneType::Meadow));
        for i in 0..required {
            g.journal.record(&format!("species_{}", i), 1);
        }
        let before = g.economy().nectar();
        assert!(g.unlock_zone(ZoneType::Meadow));
        assert!(g.economy().nectar() < before);
        assert!(g.grid(ZoneType::Meadow).is_some());
        assert!(!g.unlock_zone(ZoneType::Meadow), "already unlocked");
        assert!(g.switch_zone(ZoneType::Meadow));
        assert_eq!(g.active_zone(), ZoneType::Meadow);
        assert!(!g.switch_zone(ZoneType::Meadow));
    }

    #[test]
    fn speed_scales_the_clock() {
        let mut a = garden();
        let mut b = garden();
        b.set_speed(2.0);
        a.run(90, 0.1);
        b.run(45, 0.1);
        assert_eq!(a.clock().hour(), b.clock().hour());
        assert_eq!(a.clock().minute(), b.clock().minute());
    }
}
