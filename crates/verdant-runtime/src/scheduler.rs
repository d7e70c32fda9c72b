//! Spawn Scheduler — decides who visits, and where.
//!
//! Every few seconds (`check_interval ± interval_jitter`) the scheduler runs
//! one evaluation:
//!
//! 1. Stop if the zone is at its insect cap.
//! 2. Stop on a quiet tick (`quiet_tick_chance`), so visits feel sporadic.
//! 3. Gather the four anchor pools: blooming plants, water, logs and warm
//!    stones, each restricted to cells with a free visitor slot.
//! 4. Filter the catalog down to species whose conditions the grid meets.
//! 5. Roulette-wheel pick among them by spawn weight.
//! 6. Choose a host cell from the pool that species needs.
//!
//! The result is a [`SpawnPlan`]; [`SpawnScheduler::instantiate`] turns it
//! into a live [`Insect`] and claims the host slot.

use crate::grid::GardenGrid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::TAU;
use std::sync::Arc;
use tracing::{debug, info, trace};
use verdant_agents::insect::{Insect, InsectConfig};
use verdant_core::error::{ConfigError, Result};
use verdant_core::species::{SpeciesCatalog, SpeciesDescriptor};
use verdant_core::types::{AgentId, CellPos, Position, ZoneType};
use verdant_core::zone::DEFAULT_BASE_INSECT_CAP;

/// Scheduler tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Mean game-seconds between evaluations (default: 5).
    pub check_interval: f64,
    /// Uniform jitter applied to each interval (default: 1).
    pub interval_jitter: f64,
    /// Probability that an evaluation spawns nothing (default: 0.6).
    pub quiet_tick_chance: f64,
    /// Insect cap before expansion bonuses (default: 12).
    pub base_insect_cap: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            check_interval: 5.0,
            interval_jitter: 1.0,
            quiet_tick_chance: 0.6,
            base_insect_cap: DEFAULT_BASE_INSECT_CAP,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.check_interval > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "spawn.check_interval",
                value: self.check_interval,
            }
            .into());
        }
        if !(self.interval_jitter >= 0.0 && self.interval_jitter < self.check_interval) {
            return Err(ConfigError::Invalid {
                field: "spawn.interval_jitter",
                reason: format!(
                    "{} must be non-negative and below check_interval",
                    self.interval_jitter
                ),
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.quiet_tick_chance) {
            return Err(ConfigError::NotAProbability {
                field: "spawn.quiet_tick_chance",
                value: self.quiet_tick_chance,
            }
            .into());
        }
        Ok(())
    }
}

/// What the scheduler needs to know about the world beyond the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnContext {
    pub is_daytime: bool,
    pub zone: ZoneType,
    pub insect_cap: usize,
    /// Live insects in the zone right now.
    pub population: usize,
}

/// Candidate host cells and the environment summary eligibility runs on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorPools {
    pub blooming: Vec<CellPos>,
    pub water: Vec<CellPos>,
    /// Log cells with their decomposition stage.
    pub logs: Vec<(CellPos, u8)>,
    pub warm_stones: Vec<CellPos>,
    pub blooming_plant_ids: BTreeSet<String>,
    pub water_tile_count: usize,
    pub has_uv_lamp: bool,
}

impl AnchorPools {
    pub fn gather(grid: &GardenGrid) -> Self {
        let logs = grid
            .log_cells_with_free_slot()
            .into_iter()
            .filter_map(|pos| {
                grid.cell(pos)
                    .and_then(|c| c.decomposition_stage())
                    .map(|stage| (pos, stage))
            })
            .collect();
        Self {
            blooming: grid.blooming_cells_with_free_slot(),
            water: grid.water_cells_with_free_slot(),
            logs,
            warm_stones: grid.warm_stone_cells_with_free_slot(),
            blooming_plant_ids: grid.blooming_plant_ids(),
            water_tile_count: grid.water_tile_count(),
            has_uv_lamp: grid.has_uv_lamp(),
        }
    }

    /// No free host cell of any kind.
    pub fn is_empty(&self) -> bool {
        self.blooming.is_empty()
            && self.water.is_empty()
            && self.logs.is_empty()
            && self.warm_stones.is_empty()
    }

    /// Most decomposed log with a free slot.
    pub fn max_log_stage(&self) -> Option<u8> {
        self.logs.iter().map(|(_, stage)| *stage).max()
    }
}

/// Whether `species` may appear given the time, zone and grid conditions.
pub fn is_eligible(species: &SpeciesDescriptor, ctx: &SpawnContext, pools: &AnchorPools) -> bool {
    if !species.time_of_day.matches(ctx.is_daytime) || !species.fits_zone(ctx.zone) {
        return false;
    }
    if !species
        .required_plants
        .iter()
        .all(|plant| pools.blooming_plant_ids.contains(plant))
    {
        return false;
    }
    if species.required_water_tiles as usize > pools.water_tile_count {
        return false;
    }
    if let Some(stage) = species.min_decomposition_stage() {
        match pools.max_log_stage() {
            Some(max) if max >= stage => {}
            _ => return false,
        }
    }
    if species.requires_heated_stone && pools.warm_stones.is_empty() {
        return false;
    }
    if species.requires_uv_lamp && !pools.has_uv_lamp {
        return false;
    }
    true
}

/// Every catalog species that is eligible right now, in catalog order.
pub fn eligible_species<'a>(
    catalog: &'a SpeciesCatalog,
    ctx: &SpawnContext,
    pools: &AnchorPools,
) -> Vec<&'a Arc<SpeciesDescriptor>> {
    catalog
        .iter()
        .filter(|s| is_eligible(s, ctx, pools))
        .collect()
}

/// Roulette-wheel selection. Draws uniformly in `[0, Σweight)` and returns
/// the first candidate whose running total exceeds the draw; the last
/// candidate absorbs float round-off. `None` when nothing carries weight.
pub fn weighted_pick<'a, T, R: Rng + ?Sized>(
    candidates: &'a [T],
    weight: impl Fn(&T) -> f64,
    rng: &mut R,
) -> Option<&'a T> {
    let total: f64 = candidates.iter().map(|c| weight(c).max(0.0)).sum();
    if !(total > 0.0) {
        return None;
    }
    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for candidate in candidates {
        cumulative += weight(candidate).max(0.0);
        if roll < cumulative {
            return Some(candidate);
        }
    }
    candidates.last()
}

/// Pick the host cell `species` needs, or `None` if its pool is empty.
pub fn choose_anchor<R: Rng + ?Sized>(
    species: &SpeciesDescriptor,
    pools: &AnchorPools,
    rng: &mut R,
) -> Option<CellPos> {
    fn pick<R: Rng + ?Sized>(cells: &[CellPos], rng: &mut R) -> Option<CellPos> {
        if cells.is_empty() {
            None
        } else {
            Some(cells[rng.gen_range(0..cells.len())])
        }
    }

    if species.is_aquatic_only() {
        pick(&pools.water, rng)
    } else if let Some(stage) = species.min_decomposition_stage() {
        let rotten: Vec<CellPos> = pools
            .logs
            .iter()
            .filter(|(_, s)| *s >= stage)
            .map(|(pos, _)| *pos)
            .collect();
        pick(&rotten, rng)
    } else if species.requires_heated_stone {
        pick(&pools.warm_stones, rng)
    } else {
        pick(&pools.blooming, rng)
    }
}

/// Everything needed to bring one insect into the garden.
#[derive(Debug, Clone)]
pub struct SpawnPlan {
    pub agent: AgentId,
    pub species: Arc<SpeciesDescriptor>,
    pub cell: CellPos,
    pub anchor: Position,
    /// Direction the insect flies in from, in radians.
    pub entry_angle: f64,
    /// Seed for the insect's private random stream.
    pub seed: u64,
}

/// Result of one scheduler tick.
#[derive(Debug, Clone)]
pub enum SpawnOutcome {
    /// The interval hasn't elapsed yet.
    NotDue,
    AtCapacity,
    Quiet,
    /// No host cell of any kind has a free slot.
    NoAnchors,
    NoEligibleSpecies,
    /// The picked species' pool was empty.
    NoAnchorCell { species_id: String },
    Spawn(SpawnPlan),
}

impl SpawnOutcome {
    pub fn into_plan(self) -> Option<SpawnPlan> {
        match self {
            SpawnOutcome::Spawn(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Running totals, for stats output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub evaluations: u64,
    pub quiet_ticks: u64,
    pub plans: u64,
}

/// The periodic spawn evaluator of one garden.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    config: SpawnConfig,
    rng: ChaCha12Rng,
    timer: f64,
    stats: SchedulerStats,
}

impl SpawnScheduler {
    pub fn new(config: SpawnConfig, seed: u64) -> Self {
        let timer = config.check_interval;
        Self {
            config,
            rng: ChaCha12Rng::seed_from_u64(seed),
            timer,
            stats: SchedulerStats::default(),
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Seconds until the next evaluation.
    pub fn time_until_check(&self) -> f64 {
        self.timer
    }

    /// Force the next tick to evaluate.
    pub fn make_due(&mut self) {
        self.timer = 0.0;
    }

    /// Count down and, once due, run one evaluation.
    pub fn tick(
        &mut self,
        dt: f64,
        speed_multiplier: f64,
        ctx: &SpawnContext,
        grid: &GardenGrid,
        catalog: &SpeciesCatalog,
    ) -> SpawnOutcome {
        self.timer -= (dt * speed_multiplier).max(0.0);
        if self.timer > 0.0 {
            return SpawnOutcome::NotDue;
        }
        let jitter = self.config.interval_jitter;
        self.timer = self.config.check_interval
            + if jitter > 0.0 {
                self.rng.gen_range(-jitter..jitter)
            } else {
                0.0
            };
        self.evaluate(ctx, grid, catalog)
    }

    /// Run one evaluation right now, ignoring the timer.
    pub fn evaluate(
        &mut self,
        ctx: &SpawnContext,
        grid: &GardenGrid,
        catalog: &SpeciesCatalog,
    ) -> SpawnOutcome {
        self.stats.evaluations += 1;

        if ctx.population >= ctx.insect_cap {
            trace!(population = ctx.population, cap = ctx.insect_cap, "at insect cap");
            return SpawnOutcome::AtCapacity;
        }
        if self.rng.gen_bool(self.config.quiet_tick_chance) {
            self.stats.quiet_ticks += 1;
            debug!("quiet tick");
            return SpawnOutcome::Quiet;
        }

        let pools = AnchorPools::gather(grid);
        if pools.is_empty() {
            return SpawnOutcome::NoAnchors;
        }

        let eligible = eligible_species(catalog, ctx, &pools);
        let Some(species) = weighted_pick(&eligible, |s| s.spawn_weight, &mut self.rng) else {
            debug!(zone = %ctx.zone, "no eligible species");
            return SpawnOutcome::NoEligibleSpecies;
        };
        let species = Arc::clone(species);

        let Some(cell) = choose_anchor(&species, &pools, &mut self.rng) else {
            debug!(species = %species.id, "no free host cell for species");
            return SpawnOutcome::NoAnchorCell {
                species_id: species.id.clone(),
            };
        };

        self.stats.plans += 1;
        let plan = SpawnPlan {
            agent: AgentId::from_rng(&mut self.rng),
            anchor: grid.cell_to_world(cell),
            entry_angle: self.rng.gen_range(0.0..TAU),
            seed: self.rng.gen(),
            species,
            cell,
        };
        SpawnOutcome::Spawn(plan)
    }

    /// Claim the host slot and build the insect. `None` if the slot was
    /// taken in the meantime.
    pub fn instantiate(
        plan: SpawnPlan,
        grid: &mut GardenGrid,
        config: &InsectConfig,
    ) -> Option<Insect> {
        if !grid.occupy_slot(plan.cell, plan.agent) {
            return None;
        }
        let entry = plan.anchor + Position::from_angle(plan.entry_angle).scale(config.entry_distance);
        info!(
            agent = %plan.agent,
            species = %plan.species.id,
            cell = %plan.cell,
            "insect spawned"
        );
        Some(Insect::new(
            plan.agent,
            plan.species,
            plan.cell,
            plan.anchor,
            entry,
            plan.seed,
            config.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use rand::SeedableRng;
    use verdant_core::plants::PlantDescriptor;
    use verdant_core::types::{DayAffinity, MotionPattern, TileKind};

    fn species(id: &str, weight: f64) -> SpeciesDescriptor {
        SpeciesDescriptor {
            id: id.into(),
            display_name: id.into(),
            zone: Some(ZoneType::Starter),
            rarity: "common".into(),
            time_of_day: DayAffinity::Day,
            spawn_weight: weight,
            visit_duration_min: 30.0,
            visit_duration_max: 60.0,
            required_plants: vec![],
            required_water_tiles: 0,
            required_decomposition_stage: -1,
            requires_heated_stone: false,
            requires_uv_lamp: false,
            motion_pattern: MotionPattern::Hover,
            motion_speed: 30.0,
            body_color_seed: 0,
        }
    }

    fn bloom(grid: &mut GardenGrid, pos: CellPos, plant_id: &str) {
        let plant = PlantDescriptor {
            id: plant_id.into(),
            display_name: plant_id.into(),
            zone: ZoneType::Starter,
            rarity: "common".into(),
            seed_cost: 1,
            nectar_yield: 1,
            growth_cycles: 1,
            insect_slots: 2,
            night_blooming: false,
        };
        let plants = verdant_core::plants::PlantCatalog::new(vec![plant.clone()]).unwrap();
        assert!(grid.plant(pos, &plant));
        for _ in 0..2 {
            grid.water(pos);
            grid.advance_growth_hour(&plants);
        }
        assert_eq!(grid.cell(pos).unwrap().tile_kind, TileKind::Blooming);
    }

    fn ctx() -> SpawnContext {
        SpawnContext {
            is_daytime: true,
            zone: ZoneType::Starter,
            insect_cap: 10,
            population: 0,
        }
    }

    fn always_spawn() -> SpawnConfig {
        SpawnConfig {
            quiet_tick_chance: 0.0,
            ..SpawnConfig::default()
        }
    }

    fn grid(w: u32, h: u32) -> GardenGrid {
        let mut g = GardenGrid::new(GridConfig::default());
        g.initialize(w, h, &[], &[], &[], &[]);
        g
    }

    #[test]
    fn single_blooming_cell_gets_exactly_one_visitor() {
        let mut g = grid(4, 4);
        let host = CellPos::new(1, 2);
        bloom(&mut g, host, "alpha_flower");
        let mut alpha = species("alpha", 1.0);
        alpha.required_plants = vec!["alpha_flower".into()];
        let catalog = SpeciesCatalog::new(vec![alpha]).unwrap();

        let mut scheduler = SpawnScheduler::new(always_spawn(), 1);
        scheduler.make_due();
        let plan = scheduler
            .tick(0.016, 1.0, &ctx(), &g, &catalog)
            .into_plan()
            .expect("one spawn");
        assert_eq!(plan.cell, host);
        assert_eq!(plan.species.id, "alpha");

        let insect = SpawnScheduler::instantiate(plan, &mut g, &InsectConfig::default()).unwrap();
        assert_eq!(insect.host_cell(), host);
        assert_eq!(insect.anchor(), g.cell_to_world(host));
        assert!((insect.position().distance_to(&insect.anchor()) - 400.0).abs() < 1e-6);
        assert_eq!(g.cell(host).unwrap().occupant_count(), 1);
    }

    #[test]
    fn timer_gates_evaluations() {
        let g = grid(2, 2);
        let catalog = SpeciesCatalog::default();
        let mut scheduler = SpawnScheduler::new(always_spawn(), 1);
        assert!(matches!(
            scheduler.tick(1.0, 1.0, &ctx(), &g, &catalog),
            SpawnOutcome::NotDue
        ));
        // Speed multiplier scales the countdown.
        assert!(!matches!(
            scheduler.tick(2.0, 2.0, &ctx(), &g, &catalog),
            SpawnOutcome::NotDue
        ));
        let next = scheduler.time_until_check();
        assert!((4.0..6.0).contains(&next));
        assert_eq!(scheduler.stats().evaluations, 1);
    }

    #[test]
    fn cap_blocks_before_anything_else() {
        let mut g = grid(3, 3);
        bloom(&mut g, CellPos::new(0, 0), "p");
        let catalog = SpeciesCatalog::new(vec![species("a", 1.0)]).unwrap();
        let mut scheduler = SpawnScheduler::new(always_spawn(), 2);
        let full = SpawnContext {
            population: 10,
            ..ctx()
        };
        assert!(matches!(
            scheduler.evaluate(&full, &g, &catalog),
            SpawnOutcome::AtCapacity
        ));
    }

    #[test]
    fn quiet_ticks_happen_at_the_configured_rate() {
        let mut g = grid(3, 3);
        bloom(&mut g, CellPos::new(0, 0), "p");
        let catalog = SpeciesCatalog::new(vec![species("a", 1.0)]).unwrap();
        let mut scheduler = SpawnScheduler::new(SpawnConfig::default(), 3);
        let n = 5000;
        for _ in 0..n {
            scheduler.evaluate(&ctx(), &g, &catalog);
        }
        let rate = scheduler.stats().quiet_ticks as f64 / n as f64;
        assert!((rate - 0.6).abs() < 0.03, "quiet rate {}", rate);
    }

    #[test]
    fn empty_pools_abort() {
        let g = grid(3, 3);
        let catalog = SpeciesCatalog::new(vec![species("a", 1.0)]).unwrap();
        let mut scheduler = SpawnScheduler::new(always_spawn(), 4);
        assert!(matches!(
            scheduler.evaluate(&ctx(), &g, &catalog),
            SpawnOutcome::NoAnchors
        ));
    }

    #[test]
    fn weighted_pick_converges_to_weights() {
        let weights = [1.0, 3.0, 6.0];
        let mut rng = ChaCha12Rng::seed_from_u64(17);
        let mut counts = [0usize; 3];
        let n = 30_000;
        for _ in 0..n {
            let picked = weighted_pick(&[0usize, 1, 2], |i| weights[*i], &mut rng).unwrap();
            counts[*picked] += 1;
        }
        for (i, w) in weights.iter().enumerate() {
            let share = counts[i] as f64 / n as f64;
            assert!((share - w / 10.0).abs() < 0.02, "candidate {} share {}", i, share);
        }
    }

    #[test]
    fn weighted_pick_edge_cases() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let empty: [f64; 0] = [];
        assert!(weighted_pick(&empty, |w| *w, &mut rng).is_none());
        assert!(weighted_pick(&[0.0, 0.0], |w| *w, &mut rng).is_none());
        for _ in 0..100 {
            assert_eq!(weighted_pick(&[0.0, 2.0, 0.0], |w| *w, &mut rng), Some(&2.0));
        }
    }

    #[test]
    fn eligibility_checks_each_condition() {
        let mut g = GardenGrid::new(GridConfig::default());
        g.initialize(
            4,
            4,
            &[CellPos::new(0, 0), CellPos::new(0, 1)],
            &[CellPos::new(3, 3)],
            &[CellPos::new(3, 0)],
            &[],
        );
        bloom(&mut g, CellPos::new(1, 1), "lavender");
        let pools = AnchorPools::gather(&g);
        let c = ctx();

        let mut s = species("s", 1.0);
        assert!(is_eligible(&s, &c, &pools));

        s.time_of_day = DayAffinity::Night;
        assert!(!is_eligible(&s, &c, &pools));
        s.time_of_day = DayAffinity::Both;
        assert!(is_eligible(&s, &c, &pools));

        s.zone = Some(ZoneType::Pond);
        assert!(!is_eligible(&s, &c, &pools));
        s.zone = None;
        assert!(is_eligible(&s, &c, &pools));

        s.required_plants = vec!["lavender".into(), "daisy".into()];
        assert!(!is_eligible(&s, &c, &pools), "daisy isn't blooming");
        s.required_plants = vec!["lavender".into()];
        assert!(is_eligible(&s, &c, &pools));

        s.required_water_tiles = 3;
        assert!(!is_eligible(&s, &c, &pools));
        s.required_water_tiles = 2;
        assert!(is_eligible(&s, &c, &pools));

        s.required_decomposition_stage = 1;
        assert!(!is_eligible(&s, &c, &pools), "log is still fresh");
        s.required_decomposition_stage = 0;
        assert!(is_eligible(&s, &c, &pools));

        s.requires_heated_stone = true;
        assert!(!is_eligible(&s, &c, &pools), "stone is cold");
        s.requires_heated_stone = false;

        s.requires_uv_lamp = true;
        assert!(!is_eligible(&s, &c, &pools));
    }

    #[test]
    fn anchor_follows_species_needs() {
        let mut g = GardenGrid::new(GridConfig::default());
        g.initialize(
            4,
            4,
            &[CellPos::new(0, 0)],
            &[CellPos::new(3, 3)],
            &[CellPos::new(3, 0)],
            &[],
        );
        g.tick(120.0, 1.0, true);
        bloom(&mut g, CellPos::new(1, 1), "lavender");
        let pools = AnchorPools::gather(&g);
        let mut rng = ChaCha12Rng::seed_from_u64(5);

        let mut strider = species("strider", 1.0);
        strider.required_water_tiles = 1;
        assert_eq!(choose_anchor(&strider, &pools, &mut rng), Some(CellPos::new(0, 0)));

        let mut beetle = species("beetle", 1.0);
        beetle.required_decomposition_stage = 0;
        assert_eq!(choose_anchor(&beetle, &pools, &mut rng), Some(CellPos::new(3, 3)));
        beetle.required_decomposition_stage = 2;
        assert_eq!(choose_anchor(&beetle, &pools, &mut rng), None);

        let mut hopper = species("hopper", 1.0);
        hopper.requires_heated_stone = true;
        assert_eq!(choose_anchor(&hopper, &pools, &mut rng), Some(CellPos::new(3, 0)));

        let mut darter = species("darter", 1.0);
        darter.required_water_tiles = 1;
        darter.required_plants = vec!["lavender".into()];
        assert_eq!(choose_anchor(&darter, &pools, &mut rng), Some(CellPos::new(1, 1)));
    }

    #[test]
    fn full_host_is_not_offered() {
        let mut g = grid(2, 2);
        let host = CellPos::new(0, 0);
        bloom(&mut g, host, "p");
        g.occupy_slot(host, AgentId::from_seed(1));
        g.occupy_slot(host, AgentId::from_seed(2));
        let catalog = SpeciesCatalog::new(vec![species("a", 1.0)]).unwrap();
        let mut scheduler = SpawnScheduler::new(always_spawn(), 6);
        assert!(matches!(
            scheduler.evaluate(&ctx(), &g, &catalog),
            SpawnOutcome::NoAnchors
        ));
    }

    #[test]
    fn config_validation() {
        assert!(SpawnConfig::default().validate().is_ok());
        let bad = SpawnConfig {
            quiet_tick_chance: 1.5,
            ..SpawnConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = SpawnConfig {
            check_interval: 0.0,
            ..SpawnConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
