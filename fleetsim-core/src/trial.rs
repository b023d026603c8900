//! One complete fleet run over a single period.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::modifiers::Modifiers;
use crate::truck::{Rarity, Truck};

/// Totals for all trucks of one class within a single trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassTotals {
    pub count: u32,
    pub total_profit: f64,
    pub total_trips: u32,
    pub total_repairs: u32,
}

/// Outcome of simulating the whole fleet once. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub total_profit: f64,
    /// Fixed per-class buckets, zero-initialized for classes absent from the
    /// fleet; indexed by [`Rarity::index`].
    pub class_totals: [ClassTotals; Rarity::COUNT],
}

impl TrialOutcome {
    /// Bucket for one class.
    #[must_use]
    pub const fn for_rarity(&self, rarity: Rarity) -> ClassTotals {
        self.class_totals[rarity.index()]
    }
}

/// Simulate every truck in the fleet independently over one period and
/// accumulate the results. Fleet order carries no meaning; trucks never
/// interact, so the only variation across repeated calls is the RNG draws.
pub fn run_trial<R: Rng>(
    fleet: &[Rarity],
    hours: u32,
    modifiers: Modifiers,
    rng: &mut R,
) -> TrialOutcome {
    let mut outcome = TrialOutcome {
        total_profit: 0.0,
        class_totals: [ClassTotals::default(); Rarity::COUNT],
    };

    for &rarity in fleet {
        let mut truck = Truck::new(rarity, modifiers);
        let summary = truck.simulate_period(hours, rng);

        outcome.total_profit += summary.net_profit;
        let bucket = &mut outcome.class_totals[rarity.index()];
        bucket.count += 1;
        bucket.total_profit += summary.net_profit;
        bucket.total_trips += summary.trips;
        bucket.total_repairs += summary.repairs;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn never_breaks() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn empty_fleet_yields_a_zero_trial() {
        let outcome = run_trial(&[], 168, Modifiers::default(), &mut never_breaks());
        assert!(outcome.total_profit.abs() < f64::EPSILON);
        assert!(outcome.class_totals.iter().all(|b| b.count == 0));
    }

    #[test]
    fn buckets_sum_units_sharing_a_class() {
        let fleet = [Rarity::Common, Rarity::Common, Rarity::Uncommon];
        let outcome = run_trial(&fleet, 168, Modifiers::default(), &mut never_breaks());

        // Without breakdowns each class 1 truck nets 30 over a week and each
        // class 2 truck nets 70 - 26 = 44.
        let common = outcome.for_rarity(Rarity::Common);
        assert_eq!(common.count, 2);
        assert_eq!(common.total_trips, 28);
        assert_eq!(common.total_repairs, 0);
        assert!((common.total_profit - 60.0).abs() < f64::EPSILON);

        let uncommon = outcome.for_rarity(Rarity::Uncommon);
        assert_eq!(uncommon.count, 1);
        assert!((uncommon.total_profit - 44.0).abs() < f64::EPSILON);

        assert!((outcome.total_profit - 104.0).abs() < f64::EPSILON);
        assert_eq!(outcome.for_rarity(Rarity::Epic).count, 0);
    }

    #[test]
    fn trial_total_is_the_sum_of_buckets() {
        let fleet = [Rarity::Rare, Rarity::Epic, Rarity::Legendary];
        let outcome = run_trial(&fleet, 720, Modifiers::default(), &mut StepRng::new(0, 0));
        let bucket_sum: f64 = outcome.class_totals.iter().map(|b| b.total_profit).sum();
        assert!((outcome.total_profit - bucket_sum).abs() < 1e-9);
    }
}
