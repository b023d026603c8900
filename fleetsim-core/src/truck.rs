//! Single-truck trip simulation and the per-rarity economy table.
use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modifiers::Modifiers;

/// Hours one trip consumes; the period length is divided by this cadence.
pub const HOURS_PER_TRIP: u32 = 12;

/// One-time fee charged per truck when the repair tool is active.
pub const REPAIR_TOOL_FEE: f64 = 1.0;

/// Breakdown-probability reduction while the repair tool still has charges.
pub const REPAIR_TOOL_REDUCTION: f64 = 0.05;

/// Number of trips covered by the repair tool.
pub const REPAIR_TOOL_TRIPS: u32 = 2;

/// Truck rarity class, the key into the economy table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rarity {
    Common = 1,
    Uncommon = 2,
    Rare = 3,
    Epic = 4,
    Legendary = 5,
}

impl Rarity {
    /// Number of rarity classes; buckets indexed by [`Rarity::index`] use this.
    pub const COUNT: usize = 5;

    /// All classes in ascending key order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
    ];

    /// Numeric class key (1-5).
    #[must_use]
    pub const fn key(self) -> u8 {
        self as u8
    }

    /// Zero-based position for fixed per-class bucket arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Economy profile for this class.
    #[must_use]
    pub const fn config(self) -> TruckConfig {
        match self {
            Self::Common => TruckConfig {
                earnings_per_trip: 4.0,
                fuel_cost: 2.0,
                fuel_frequency: 2,
                tire_cost: 4.0,
                tire_frequency: 4,
                repair_cost: 6.0,
                breakdown_probability: 0.30,
            },
            Self::Uncommon => TruckConfig {
                earnings_per_trip: 5.0,
                fuel_cost: 2.0,
                fuel_frequency: 2,
                tire_cost: 4.0,
                tire_frequency: 4,
                repair_cost: 6.0,
                breakdown_probability: 0.26,
            },
            Self::Rare => TruckConfig {
                earnings_per_trip: 7.0,
                fuel_cost: 2.0,
                fuel_frequency: 2,
                tire_cost: 4.0,
                tire_frequency: 4,
                repair_cost: 6.0,
                breakdown_probability: 0.20,
            },
            Self::Epic => TruckConfig {
                earnings_per_trip: 9.0,
                fuel_cost: 1.0,
                fuel_frequency: 2,
                tire_cost: 4.0,
                tire_frequency: 4,
                repair_cost: 10.0,
                breakdown_probability: 0.17,
            },
            Self::Legendary => TruckConfig {
                earnings_per_trip: 11.0,
                fuel_cost: 1.0,
                fuel_frequency: 2,
                tire_cost: 4.0,
                tire_frequency: 4,
                repair_cost: 10.0,
                breakdown_probability: 0.14,
            },
        }
    }
}

/// Error raised when a numeric class key falls outside 1-5.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid truck rarity {0} (expected 1-5)")]
pub struct InvalidRarity(pub u8);

impl TryFrom<u8> for Rarity {
    type Error = InvalidRarity;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Common),
            2 => Ok(Self::Uncommon),
            3 => Ok(Self::Rare),
            4 => Ok(Self::Epic),
            5 => Ok(Self::Legendary),
            other => Err(InvalidRarity(other)),
        }
    }
}

impl From<Rarity> for u8 {
    fn from(rarity: Rarity) -> Self {
        rarity.key()
    }
}

/// Immutable per-class economy profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckConfig {
    pub earnings_per_trip: f64,
    pub fuel_cost: f64,
    /// Fuel is charged every Nth trip.
    pub fuel_frequency: u32,
    pub tire_cost: f64,
    /// Tires are charged every Nth trip.
    pub tire_frequency: u32,
    pub repair_cost: f64,
    /// Base per-trip breakdown probability before any benefit reductions.
    pub breakdown_probability: f64,
}

/// Apply the referral discount and, optionally, the tool discount to a base
/// breakdown probability. Each subtraction clamps at zero before the next one
/// applies, so a later step can never restore probability lost to the floor.
#[must_use]
pub fn effective_breakdown_probability(
    base: f64,
    referral_reduction: f64,
    tool_active: bool,
) -> f64 {
    let after_referral = (base - referral_reduction).max(0.0);
    if tool_active {
        (after_referral - REPAIR_TOOL_REDUCTION).max(0.0)
    } else {
        after_referral
    }
}

/// Cost and earning components of one simulated trip.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TripOutcome {
    pub earnings: f64,
    pub fuel_cost: f64,
    pub tire_cost: f64,
    pub repair_cost: f64,
    pub breakdown: bool,
}

impl TripOutcome {
    /// Total cost incurred on this trip.
    #[must_use]
    pub fn costs(&self) -> f64 {
        self.fuel_cost + self.tire_cost + self.repair_cost
    }
}

/// Cumulative results of simulating one truck over one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub trips: u32,
    pub earnings: f64,
    pub costs: f64,
    pub net_profit: f64,
    pub repairs: u32,
}

/// One truck inside one trial. Constructed fresh per trial; state never
/// carries over between trials.
#[derive(Debug, Clone)]
pub struct Truck {
    rarity: Rarity,
    config: TruckConfig,
    referral_reduction: f64,
    trip_count: u32,
    total_earnings: f64,
    total_costs: f64,
    repairs_count: u32,
    tool_trips_remaining: u32,
}

impl Truck {
    /// Put a truck of the given class into service. The repair tool fee is
    /// charged up front, before any trip runs.
    #[must_use]
    pub fn new(rarity: Rarity, modifiers: Modifiers) -> Self {
        let tool_trips_remaining = if modifiers.repair_tool {
            REPAIR_TOOL_TRIPS
        } else {
            0
        };
        let total_costs = if modifiers.repair_tool {
            REPAIR_TOOL_FEE
        } else {
            0.0
        };
        Self {
            rarity,
            config: rarity.config(),
            referral_reduction: modifiers.referral_tier.reduction(),
            trip_count: 0,
            total_earnings: 0.0,
            total_costs,
            repairs_count: 0,
            tool_trips_remaining,
        }
    }

    #[must_use]
    pub const fn rarity(&self) -> Rarity {
        self.rarity
    }

    #[must_use]
    pub const fn trip_count(&self) -> u32 {
        self.trip_count
    }

    #[must_use]
    pub const fn total_earnings(&self) -> f64 {
        self.total_earnings
    }

    #[must_use]
    pub const fn total_costs(&self) -> f64 {
        self.total_costs
    }

    #[must_use]
    pub const fn repairs_count(&self) -> u32 {
        self.repairs_count
    }

    #[must_use]
    pub fn net_profit(&self) -> f64 {
        self.total_earnings - self.total_costs
    }

    /// Breakdown probability the next trip will roll against.
    #[must_use]
    pub fn next_trip_probability(&self) -> f64 {
        effective_breakdown_probability(
            self.config.breakdown_probability,
            self.referral_reduction,
            self.tool_trips_remaining > 0,
        )
    }

    /// Advance the truck by one trip. A breakdown adds the repair cost but
    /// never blocks the trip; the truck is repaired and continues.
    pub fn simulate_trip<R: Rng>(&mut self, rng: &mut R) -> TripOutcome {
        let probability = self.next_trip_probability();
        if self.tool_trips_remaining > 0 {
            self.tool_trips_remaining -= 1;
        }

        let mut outcome = TripOutcome::default();
        if rng.r#gen::<f64>() < probability {
            outcome.breakdown = true;
            outcome.repair_cost = self.config.repair_cost;
            self.repairs_count += 1;
        }

        self.trip_count += 1;
        outcome.earnings = self.config.earnings_per_trip;

        if self.trip_count % self.config.fuel_frequency == 0 {
            outcome.fuel_cost = self.config.fuel_cost;
        }
        if self.trip_count % self.config.tire_frequency == 0 {
            outcome.tire_cost = self.config.tire_cost;
        }

        self.total_earnings += outcome.earnings;
        self.total_costs += outcome.costs();
        outcome
    }

    /// Run every trip the period allows (one per 12 hours, in order) and
    /// summarize the truck's cumulative results.
    pub fn simulate_period<R: Rng>(&mut self, hours: u32, rng: &mut R) -> PeriodSummary {
        let trips = hours / HOURS_PER_TRIP;
        for _ in 0..trips {
            self.simulate_trip(rng);
        }
        PeriodSummary {
            trips,
            earnings: self.total_earnings,
            costs: self.total_costs,
            net_profit: self.net_profit(),
            repairs: self.repairs_count,
        }
    }
}

/// Per-rarity composition of a fleet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total_trucks: usize,
    pub by_rarity: BTreeMap<Rarity, u32>,
}

/// Count the trucks of each class in a fleet.
#[must_use]
pub fn fleet_summary(fleet: &[Rarity]) -> FleetSummary {
    let mut by_rarity = BTreeMap::new();
    for &rarity in fleet {
        *by_rarity.entry(rarity).or_insert(0u32) += 1;
    }
    FleetSummary {
        total_trucks: fleet.len(),
        by_rarity,
    }
}
