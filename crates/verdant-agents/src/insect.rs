//! Insect Agent — a single visitor's life from arrival to departure.
//!
//! An insect glides in from outside the garden toward its host cell, wanders
//! around it with its species' motion strategy until the visit runs out,
//! circles for a few seconds, then flies off and frees itself.
//!
//! ```text
//! Arriving ──► Visiting ──► PreDeparture ──► Departing ──► Freed
//!    │            │                              ▲
//!    └────────────┴──── interrupt ───────────────┘
//! ```
//!
//! The agent never touches the grid. It reports what happened through the
//! event buffer handed to [`Insect::tick`]; whoever owns the registry
//! vacates the host slot once [`Insect::is_freed`] turns true.

use crate::motion::MotionStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;
use tracing::debug;
use verdant_core::clock::DayPeriod;
use verdant_core::error::{ConfigError, Result};
use verdant_core::events::{GardenEvent, Interrupt};
use verdant_core::species::SpeciesDescriptor;
use verdant_core::types::{AgentId, CellPos, DayAffinity, Position};

/// Lifecycle of a visiting insect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsectState {
    /// Gliding in from the entry point.
    Arriving,
    /// Wandering around the host cell.
    Visiting,
    /// Circling the host before leaving.
    PreDeparture,
    /// Flying off and fading out.
    Departing,
    /// Gone. Terminal.
    Freed,
}

/// Timing and distance tuning shared by every insect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsectConfig {
    /// Distance from the anchor at which insects enter (default: 400).
    pub entry_distance: f64,
    /// Entry glide duration in seconds (default: 1.5).
    pub arrive_duration: f64,
    /// Fade-in duration in seconds (default: 0.5).
    pub arrive_fade: f64,
    /// Maximum distance from the anchor while visiting (default: 50).
    pub max_wander: f64,
    /// Exponential smoothing rate toward the strategy target, per second (default: 8).
    pub follow_rate: f64,
    /// Shortest pre-departure orbit in seconds (default: 5).
    pub pre_departure_min: f64,
    /// Longest pre-departure orbit in seconds (default: 8).
    pub pre_departure_max: f64,
    /// Orbit angular rate in radians per second (default: 2.5).
    pub orbit_angular_speed: f64,
    /// Orbit radius at the start of pre-departure (default: 12).
    pub orbit_start_radius: f64,
    /// Orbit radius growth per second (default: 4).
    pub orbit_growth: f64,
    /// Exit glide duration in seconds (default: 1.2).
    pub depart_duration: f64,
    /// Fade-out duration in seconds (default: 0.8).
    pub depart_fade: f64,
    /// How far the exit glide travels (default: 500).
    pub exit_distance: f64,
    /// How long a freeze holds the insect still (default: 1.5).
    pub freeze_duration: f64,
}

impl Default for InsectConfig {
    fn default() -> Self {
        Self {
            entry_distance: 400.0,
            arrive_duration: 1.5,
            arrive_fade: 0.5,
            max_wander: 50.0,
            follow_rate: 8.0,
            pre_departure_min: 5.0,
            pre_departure_max: 8.0,
            orbit_angular_speed: 2.5,
            orbit_start_radius: 12.0,
            orbit_growth: 4.0,
            depart_duration: 1.2,
            depart_fade: 0.8,
            exit_distance: 500.0,
            freeze_duration: 1.5,
        }
    }
}

impl InsectConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("insect.entry_distance", self.entry_distance),
            ("insect.arrive_duration", self.arrive_duration),
            ("insect.arrive_fade", self.arrive_fade),
            ("insect.max_wander", self.max_wander),
            ("insect.follow_rate", self.follow_rate),
            ("insect.pre_departure_min", self.pre_departure_min),
            ("insect.depart_duration", self.depart_duration),
            ("insect.depart_fade", self.depart_fade),
            ("insect.exit_distance", self.exit_distance),
            ("insect.freeze_duration", self.freeze_duration),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value }.into());
            }
        }
        if self.pre_departure_max < self.pre_departure_min {
            return Err(ConfigError::Invalid {
                field: "insect.pre_departure_max",
                reason: format!(
                    "{} is shorter than pre_departure_min {}",
                    self.pre_departure_max, self.pre_departure_min
                ),
            }
            .into());
        }
        Ok(())
    }
}

fn ease_out_sine(t: f64) -> f64 {
    (t * FRAC_PI_2).sin()
}

fn ease_in_sine(t: f64) -> f64 {
    1.0 - (t * FRAC_PI_2).cos()
}

/// Whether a species with `affinity` should leave when the day turns to `period`.
pub fn leaves_at(affinity: DayAffinity, period: DayPeriod) -> bool {
    match affinity {
        DayAffinity::Day => matches!(period, DayPeriod::Dusk | DayPeriod::Night),
        DayAffinity::Night => matches!(period, DayPeriod::Dawn | DayPeriod::Morning),
        DayAffinity::Both => false,
    }
}

/// One live visitor.
#[derive(Debug, Clone)]
pub struct Insect {
    id: AgentId,
    species: Arc<SpeciesDescriptor>,
    config: InsectConfig,
    rng: ChaCha12Rng,
    motion: MotionStrategy,
    state: InsectState,

    anchor: Position,
    host: CellPos,
    position: Position,
    alpha: f64,

    /// Seconds in the current tweened phase (arrive or depart).
    phase_elapsed: f64,
    entry: Position,
    exit_from: Position,
    exit_to: Position,
    exit_alpha: f64,

    remaining_visit: f64,
    pre_departure_remaining: f64,
    orbit_angle: f64,
    orbit_radius: f64,

    freeze_remaining: f64,
    age: f64,
    interrupts: VecDeque<Interrupt>,
}

impl Insect {
    /// Create an insect bound to `host`, starting at `entry` and gliding to
    /// `anchor`. All of its randomness comes from `seed`.
    pub fn new(
        id: AgentId,
        species: Arc<SpeciesDescriptor>,
        host: CellPos,
        anchor: Position,
        entry: Position,
        seed: u64,
        config: InsectConfig,
    ) -> Self {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let mut motion =
            MotionStrategy::for_pattern(species.motion_pattern, species.motion_speed, &mut rng);
        motion.reset(anchor, &mut rng);
        let remaining_visit =
            rng.gen_range(species.visit_duration_min..=species.visit_duration_max);

        Self {
            id,
            species,
            config,
            rng,
            motion,
            state: InsectState::Arriving,
            anchor,
            host,
            position: entry,
            alpha: 0.0,
            phase_elapsed: 0.0,
            entry,
            exit_from: entry,
            exit_to: entry,
            exit_alpha: 0.0,
            remaining_visit,
            pre_departure_remaining: 0.0,
            orbit_angle: 0.0,
            orbit_radius: 0.0,
            freeze_remaining: 0.0,
            age: 0.0,
            interrupts: VecDeque::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn species(&self) -> &Arc<SpeciesDescriptor> {
        &self.species
    }

    pub fn species_id(&self) -> &str {
        &self.species.id
    }

    pub fn display_name(&self) -> &str {
        &self.species.display_name
    }

    pub fn state(&self) -> InsectState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn host_cell(&self) -> CellPos {
        self.host
    }

    /// Opacity in [0, 1].
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn remaining_visit(&self) -> f64 {
        self.remaining_visit
    }

    pub fn motion(&self) -> &MotionStrategy {
        &self.motion
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_remaining > 0.0
    }

    pub fn is_freed(&self) -> bool {
        self.state == InsectState::Freed
    }

    /// Visiting or circling, and not frozen.
    pub fn is_capturable(&self) -> bool {
        matches!(self.state, InsectState::Visiting | InsectState::PreDeparture) && !self.is_frozen()
    }

    /// Vertical idle bob for presentation. Holds still while frozen.
    pub fn bob_offset(&self) -> f64 {
        (self.age * 3.0).sin() * 1.5
    }

    /// Queue an interrupt; it is handled at the start of the next tick.
    pub fn interrupt(&mut self, interrupt: Interrupt) {
        if self.state != InsectState::Freed {
            self.interrupts.push_back(interrupt);
        }
    }

    /// Move the insect to a new host after its grid was remapped. Every
    /// world-space point it tracks shifts by the same delta, so the flight
    /// continues undisturbed relative to the host.
    pub fn rehost(&mut self, host: CellPos, anchor: Position) {
        let delta = anchor - self.anchor;
        self.host = host;
        self.anchor = anchor;
        self.position = self.position + delta;
        self.entry = self.entry + delta;
        self.exit_from = self.exit_from + delta;
        self.exit_to = self.exit_to + delta;
        self.motion.reset(anchor, &mut self.rng);
    }

    /// Hold the insect still. Only accepted while visiting or circling.
    pub fn try_freeze(&mut self) -> bool {
        if !matches!(self.state, InsectState::Visiting | InsectState::PreDeparture) {
            return false;
        }
        self.freeze_remaining = self.config.freeze_duration;
        debug!(agent = %self.id, species = %self.species.id, "frozen");
        true
    }

    /// Advance by `dt` game-seconds (already scaled by game speed).
    pub fn tick(&mut self, dt: f64, events: &mut Vec<GardenEvent>) {
        if self.state == InsectState::Freed {
            return;
        }
        self.drain_interrupts(events);

        if self.freeze_remaining > 0.0 {
            self.freeze_remaining = (self.freeze_remaining - dt).max(0.0);
            return;
        }
        if dt <= 0.0 {
            return;
        }
        self.age += dt;

        match self.state {
            InsectState::Arriving => self.tick_arriving(dt, events),
            InsectState::Visiting => self.tick_visiting(dt, events),
            InsectState::PreDeparture => self.tick_pre_departure(dt),
            InsectState::Departing => self.tick_departing(dt, events),
            InsectState::Freed => {}
        }
    }

    fn drain_interrupts(&mut self, events: &mut Vec<GardenEvent>) {
        while let Some(interrupt) = self.interrupts.pop_front() {
            let leave = match interrupt {
                Interrupt::HostCleared => true,
                Interrupt::PeriodChanged(period) => leaves_at(self.species.time_of_day, period),
            };
            if leave {
                debug!(agent = %self.id, ?interrupt, "forced departure");
                self.force_departure(events);
            }
        }
    }

    /// Skip straight to departing. No-op once departing or freed.
    pub fn force_departure(&mut self, events: &mut Vec<GardenEvent>) {
        match self.state {
            InsectState::Departing | InsectState::Freed => return,
            InsectState::Arriving | InsectState::Visiting => self.publish_departing(events),
            // The notice already went out on entering pre-departure.
            InsectState::PreDeparture => {}
        }
        self.freeze_remaining = 0.0;
        self.start_departure();
    }

    fn publish_departing(&self, events: &mut Vec<GardenEvent>) {
        events.push(GardenEvent::AgentDeparting {
            agent: self.id,
            species_id: self.species.id.clone(),
        });
    }

    fn tick_arriving(&mut self, dt: f64, events: &mut Vec<GardenEvent>) {
        self.phase_elapsed += dt;
        let t = (self.phase_elapsed / self.config.arrive_duration).min(1.0);
        self.position = self.entry.lerp(&self.anchor, ease_out_sine(t));
        self.alpha = (self.phase_elapsed / self.config.arrive_fade).min(1.0);

        if t >= 1.0 {
            self.position = self.anchor;
            self.alpha = 1.0;
            self.state = InsectState::Visiting;
            debug!(agent = %self.id, species = %self.species.id, "arrived");
            events.push(GardenEvent::AgentArrived {
                agent: self.id,
                species_id: self.species.id.clone(),
                position: self.position,
            });
        }
    }

    fn tick_visiting(&mut self, dt: f64, events: &mut Vec<GardenEvent>) {
        self.remaining_visit -= dt;
        if self.remaining_visit <= 0.0 {
            self.remaining_visit = 0.0;
            self.start_pre_departure(events);
            return;
        }

        let mut target = self.motion.compute_target(dt, &mut self.rng);
        let offset = target - self.anchor;
        if offset.length() > self.config.max_wander {
            target = self.anchor + offset.normalized().scale(self.config.max_wander);
        }
        self.follow(target, dt);
    }

    fn follow(&mut self, target: Position, dt: f64) {
        let weight = (dt * self.config.follow_rate).min(1.0);
        self.position = self.position.lerp(&target, weight);
    }

    fn start_pre_departure(&mut self, events: &mut Vec<GardenEvent>) {
        self.state = InsectState::PreDeparture;
        self.pre_departure_remaining = self
            .rng
            .gen_range(self.config.pre_departure_min..=self.config.pre_departure_max);
        let offset = self.position - self.anchor;
        self.orbit_angle = offset.y.atan2(offset.x);
        self.orbit_radius = offset.length().max(self.config.orbit_start_radius);
        debug!(
            agent = %self.id,
            seconds = self.pre_departure_remaining,
            "circling before departure"
        );
        self.publish_departing(events);
    }

    fn tick_pre_departure(&mut self, dt: f64) {
        self.pre_departure_remaining -= dt;
        if self.pre_departure_remaining <= 0.0 {
            self.start_departure();
            return;
        }
        self.orbit_angle += self.config.orbit_angular_speed * dt;
        self.orbit_radius += self.config.orbit_growth * dt;
        let target = self.anchor + Position::from_angle(self.orbit_angle).scale(self.orbit_radius);
        self.follow(target, dt);
    }

    fn start_departure(&mut self) {
        self.state = InsectState::Departing;
        self.phase_elapsed = 0.0;
        let mut direction = (self.position - self.anchor).normalized();
        if direction.length_squared() < 0.1 {
            direction = Position::new(1.0, 0.0);
        }
        self.exit_from = self.position;
        self.exit_to = self.position + direction.scale(self.config.exit_distance);
        self.exit_alpha = self.alpha;
        debug!(agent = %self.id, species = %self.species.id, "departing");
    }

    fn tick_departing(&mut self, dt: f64, events: &mut Vec<GardenEvent>) {
        self.phase_elapsed += dt;
        let t = (self.phase_elapsed / self.config.depart_duration).min(1.0);
        self.position = self.exit_from.lerp(&self.exit_to, ease_in_sine(t));
        let fade = (self.phase_elapsed / self.config.depart_fade).min(1.0);
        self.alpha = self.exit_alpha * (1.0 - fade);

        if t >= 1.0 {
            self.position = self.exit_to;
            self.alpha = 0.0;
            self.state = InsectState::Freed;
            self.interrupts.clear();
            debug!(agent = %self.id, species = %self.species.id, "freed");
            events.push(GardenEvent::AgentDeparted {
                agent: self.id,
                species_id: self.species.id.clone(),
                position: self.position,
            });
        }
    }
}
