//! Closed-form expected profit, the non-random cross-check for the Monte
//! Carlo loop.
use serde::{Deserialize, Serialize};

use crate::modifiers::Modifiers;
use crate::monte_carlo::TimePeriod;
use crate::truck::{
    HOURS_PER_TRIP, REPAIR_TOOL_FEE, REPAIR_TOOL_TRIPS, Rarity, effective_breakdown_probability,
};

/// Expected-value summary for a fleet over one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitEstimate {
    pub expected_profit: f64,
    pub trips_per_truck: u32,
    pub period_hours: u32,
}

/// Compute the expected fleet profit without sampling.
///
/// Pure function of its arguments: identical inputs always produce identical
/// estimates.
#[must_use]
pub fn estimate_expected_profit(
    fleet: &[Rarity],
    period: TimePeriod,
    modifiers: Modifiers,
) -> ProfitEstimate {
    let period_hours = period.hours();
    let trips_per_truck = period_hours / HOURS_PER_TRIP;
    let trips = f64::from(trips_per_truck);
    let referral_reduction = modifiers.referral_tier.reduction();

    let mut expected_profit = 0.0;
    for &rarity in fleet {
        let config = rarity.config();

        let expected_earnings = trips * config.earnings_per_trip;
        let fuel_costs = f64::from(trips_per_truck / config.fuel_frequency) * config.fuel_cost;
        let tire_costs = f64::from(trips_per_truck / config.tire_frequency) * config.tire_cost;

        let probability = effective_breakdown_probability(
            config.breakdown_probability,
            referral_reduction,
            false,
        );
        let repair_costs = if modifiers.repair_tool && trips_per_truck > 0 {
            let tool_trips = REPAIR_TOOL_TRIPS.min(trips_per_truck);
            let reduced = effective_breakdown_probability(
                config.breakdown_probability,
                referral_reduction,
                true,
            );
            (f64::from(tool_trips) * reduced
                + f64::from(trips_per_truck - tool_trips) * probability)
                * config.repair_cost
        } else {
            trips * probability * config.repair_cost
        };

        let mut expected_costs = fuel_costs + tire_costs + repair_costs;
        if modifiers.repair_tool {
            expected_costs += REPAIR_TOOL_FEE;
        }
        expected_profit += expected_earnings - expected_costs;
    }

    ProfitEstimate {
        expected_profit,
        trips_per_truck,
        period_hours,
    }
}
