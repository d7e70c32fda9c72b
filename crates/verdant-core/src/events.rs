//! Events flowing out of the garden and interrupts flowing into agents.

use crate::clock::DayPeriod;
use crate::types::{AgentId, CellPos, Position, ZoneType};
use serde::Serialize;

/// Event emitted by the garden during simulation, drained by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GardenEvent {
    /// An insect was created and bound to a host cell.
    AgentSpawned {
        agent: AgentId,
        species_id: String,
        zone: ZoneType,
        cell: CellPos,
    },
    /// An insect finished its entry glide.
    AgentArrived {
        agent: AgentId,
        species_id: String,
        position: Position,
    },
    /// An insect is about to leave; last chance for a photo.
    AgentDeparting { agent: AgentId, species_id: String },
    /// An insect left the garden for good at its exit point.
    AgentDeparted {
        agent: AgentId,
        species_id: String,
        position: Position,
    },
    PlantPlanted {
        zone: ZoneType,
        cell: CellPos,
        plant_id: String,
    },
    PlantBloomed {
        zone: ZoneType,
        cell: CellPos,
        plant_id: String,
    },
    PlantHarvested {
        zone: ZoneType,
        cell: CellPos,
        plant_id: String,
        nectar: u64,
    },
    PlantRemoved {
        zone: ZoneType,
        cell: CellPos,
        plant_id: String,
    },
    /// A zone's grid grew to the given tier.
    ZoneExpanded {
        zone: ZoneType,
        tier: usize,
        width: u32,
        height: u32,
    },
    ZoneChanged { old: ZoneType, new: ZoneType },
    ZoneUnlocked { zone: ZoneType },
    TimeOfDayChanged { old: DayPeriod, new: DayPeriod },
    HourPassed { hour: u32 },
    NectarChanged { balance: u64 },
    SpeciesDiscovered { species_id: String },
    /// A journal entry was added or its star rating improved.
    JournalUpdated { species_id: String, stars: u8 },
    PlantLevelUp { plant_id: String, level: u8 },
}

/// External notice delivered to one agent, consumed at the start of its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// The agent's host cell lost its plant, got a sprinkler, or vanished.
    HostCleared,
    /// The day period changed to the given one.
    PeriodChanged(DayPeriod),
}
