//! Monte Carlo aggregation across independent fleet trials.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modifiers::Modifiers;
use crate::numbers::{u64_to_f64, usize_to_f64};
use crate::seed::derive_trial_seed;
use crate::stats;
use crate::trial::run_trial;
use crate::truck::Rarity;

/// Trial count used when the caller does not override it.
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Simulation horizon. One trip runs every 12 hours, so the horizon fixes
/// the per-truck trip count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "1_week")]
    OneWeek,
    #[serde(rename = "30_days")]
    ThirtyDays,
    #[serde(rename = "1_year")]
    OneYear,
}

impl TimePeriod {
    /// All recognized horizons in ascending length.
    pub const ALL: [Self; 3] = [Self::OneWeek, Self::ThirtyDays, Self::OneYear];

    /// Horizon length in simulated hours.
    #[must_use]
    pub const fn hours(self) -> u32 {
        match self {
            Self::OneWeek => 7 * 24,
            Self::ThirtyDays => 30 * 24,
            Self::OneYear => 365 * 24,
        }
    }

    /// Caller-facing period key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::OneWeek => "1_week",
            Self::ThirtyDays => "30_days",
            Self::OneYear => "1_year",
        }
    }

    /// Parse a caller-facing period key.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownPeriod`] for any key outside the
    /// three recognized values.
    pub fn from_key(key: &str) -> Result<Self, SimulationError> {
        match key {
            "1_week" => Ok(Self::OneWeek),
            "30_days" => Ok(Self::ThirtyDays),
            "1_year" => Ok(Self::OneYear),
            other => Err(SimulationError::UnknownPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TimePeriod {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// Invalid-argument errors raised before any trial runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("fleet must contain at least one truck")]
    EmptyFleet,
    #[error("unknown time period '{0}' (expected 1_week, 30_days, or 1_year)")]
    UnknownPeriod(String),
    #[error("iterations must be greater than zero")]
    ZeroIterations,
}

/// Everything needed to reproduce one Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPlan {
    pub fleet: Vec<Rarity>,
    pub period: TimePeriod,
    pub iterations: usize,
    pub modifiers: Modifiers,
    /// Base seed; each trial derives its own independent stream from it.
    pub seed: u64,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(fleet: Vec<Rarity>, period: TimePeriod, seed: u64) -> Self {
        Self {
            fleet,
            period,
            iterations: DEFAULT_ITERATIONS,
            modifiers: Modifiers::default(),
            seed,
        }
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// # Errors
    ///
    /// Returns an invalid-argument error when the fleet is empty or the
    /// iteration count is zero.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.fleet.is_empty() {
            return Err(SimulationError::EmptyFleet);
        }
        if self.iterations == 0 {
            return Err(SimulationError::ZeroIterations);
        }
        Ok(())
    }
}

/// Cross-trial statistics for one rarity class. `avg_*` fields are
/// normalized per individual truck; `total_profit` is the expected combined
/// contribution of all trucks of the class per trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityBreakdown {
    pub count: u32,
    pub avg_profit: f64,
    pub total_profit: f64,
    pub std_profit: f64,
    pub avg_trips: f64,
    pub avg_repairs: f64,
}

/// Full Monte Carlo output. Owned by the caller and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub iterations: usize,
    pub period: TimePeriod,
    pub fleet_size: usize,
    /// Every trial's total profit, in trial order (len == iterations).
    pub all_profits: Vec<f64>,
    pub mean_profit: f64,
    pub std_profit: f64,
    pub min_profit: f64,
    pub max_profit: f64,
    pub median_profit: f64,
    /// Percent of trials ending with profit strictly above zero.
    pub positive_probability: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    /// Classes present in the fleet only.
    pub rarity_breakdown: BTreeMap<Rarity, RarityBreakdown>,
}

/// Run the full Monte Carlo loop and reduce the outcomes.
///
/// Trials are independent: each one simulates the identical fleet, period,
/// and modifiers against its own derived RNG stream. All reductions are
/// order-independent over the outcome multiset.
///
/// # Errors
///
/// Fails fast with [`SimulationError`] on an empty fleet or zero iterations;
/// no trial runs on invalid input.
pub fn run_simulation(plan: &SimulationPlan) -> Result<AggregateResult, SimulationError> {
    plan.validate()?;
    let hours = plan.period.hours();

    let mut all_profits = Vec::with_capacity(plan.iterations);
    let mut class_counts = [0u32; Rarity::COUNT];
    let mut class_profits: [Vec<f64>; Rarity::COUNT] = Default::default();
    let mut class_trips = [0u64; Rarity::COUNT];
    let mut class_repairs = [0u64; Rarity::COUNT];

    for trial_index in 0..plan.iterations {
        let stream = derive_trial_seed(plan.seed, u64::try_from(trial_index).unwrap_or(u64::MAX));
        let mut rng = ChaCha20Rng::seed_from_u64(stream);
        let outcome = run_trial(&plan.fleet, hours, plan.modifiers, &mut rng);

        all_profits.push(outcome.total_profit);
        for rarity in Rarity::ALL {
            let bucket = outcome.for_rarity(rarity);
            if bucket.count == 0 {
                continue;
            }
            let idx = rarity.index();
            class_counts[idx] = bucket.count;
            class_profits[idx].push(bucket.total_profit);
            class_trips[idx] += u64::from(bucket.total_trips);
            class_repairs[idx] += u64::from(bucket.total_repairs);
        }
    }

    let mut sorted = all_profits.clone();
    sorted.sort_by(f64::total_cmp);

    let positive = all_profits.iter().filter(|profit| **profit > 0.0).count();
    let trials = usize_to_f64(plan.iterations);

    let mut rarity_breakdown = BTreeMap::new();
    for rarity in Rarity::ALL {
        let idx = rarity.index();
        let count = class_counts[idx];
        if count == 0 {
            continue;
        }
        let per_truck = f64::from(count);
        let mean_class_profit = stats::mean(&class_profits[idx]);
        rarity_breakdown.insert(
            rarity,
            RarityBreakdown {
                count,
                avg_profit: mean_class_profit / per_truck,
                total_profit: mean_class_profit,
                std_profit: stats::population_std(&class_profits[idx]),
                avg_trips: u64_to_f64(class_trips[idx]) / trials / per_truck,
                avg_repairs: u64_to_f64(class_repairs[idx]) / trials / per_truck,
            },
        );
    }

    Ok(AggregateResult {
        iterations: plan.iterations,
        period: plan.period,
        fleet_size: plan.fleet.len(),
        mean_profit: stats::mean(&all_profits),
        std_profit: stats::population_std(&all_profits),
        min_profit: sorted.first().copied().unwrap_or(0.0),
        max_profit: sorted.last().copied().unwrap_or(0.0),
        median_profit: stats::median(&sorted),
        positive_probability: usize_to_f64(positive) / trials * 100.0,
        percentile_25: stats::percentile(&sorted, 25.0),
        percentile_75: stats::percentile(&sorted, 75.0),
        rarity_breakdown,
        all_profits,
    })
}
