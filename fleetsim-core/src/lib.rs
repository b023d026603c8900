//! Fleetsim Core Engine
//!
//! Monte Carlo profit simulation for a fleet of trucks in a game economy.
//! The crate is platform-agnostic and I/O-free: callers pass the fleet,
//! horizon, and benefit modifiers explicitly, and every random draw flows
//! through an injectable RNG, so results are reproducible from a single
//! seed.

pub mod estimate;
pub mod modifiers;
pub mod monte_carlo;
pub mod numbers;
pub mod seed;
pub mod stats;
pub mod trial;
pub mod truck;

// Re-export commonly used types
pub use estimate::{ProfitEstimate, estimate_expected_profit};
pub use modifiers::{InvalidReferralTier, Modifiers, ReferralTier};
pub use monte_carlo::{
    AggregateResult, DEFAULT_ITERATIONS, RarityBreakdown, SimulationError, SimulationPlan,
    TimePeriod, run_simulation,
};
pub use seed::derive_trial_seed;
pub use trial::{ClassTotals, TrialOutcome, run_trial};
pub use truck::{
    FleetSummary, HOURS_PER_TRIP, InvalidRarity, PeriodSummary, Rarity, TripOutcome, Truck,
    TruckConfig, fleet_summary,
};
