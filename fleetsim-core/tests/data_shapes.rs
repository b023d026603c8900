use fleetsim_core::{
    AggregateResult, Modifiers, Rarity, ReferralTier, SimulationPlan, TimePeriod, run_simulation,
};
use serde_json::Value;

fn sample_result() -> AggregateResult {
    let plan = SimulationPlan::new(
        vec![Rarity::Common, Rarity::Common, Rarity::Legendary],
        TimePeriod::OneWeek,
        0x5EED,
    )
    .with_iterations(50)
    .with_modifiers(Modifiers {
        repair_tool: true,
        referral_tier: ReferralTier::Tier1,
    });
    run_simulation(&plan).expect("valid plan")
}

#[test]
fn aggregate_result_round_trips_through_json() {
    let result = sample_result();
    let json = serde_json::to_string(&result).expect("serialize");
    let back: AggregateResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(result, back);
}

#[test]
fn rarity_keys_serialize_as_numeric_strings() {
    let result = sample_result();
    let value = serde_json::to_value(&result).expect("serialize");
    let breakdown = value
        .get("rarity_breakdown")
        .and_then(Value::as_object)
        .expect("breakdown is an object");
    let mut keys: Vec<&str> = breakdown.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["1", "5"]);
}

#[test]
fn period_serializes_with_its_caller_facing_key() {
    let value = serde_json::to_value(TimePeriod::ThirtyDays).expect("serialize");
    assert_eq!(value, Value::String("30_days".to_string()));
    let parsed: TimePeriod = serde_json::from_value(value).expect("deserialize");
    assert_eq!(parsed, TimePeriod::ThirtyDays);
}

#[test]
fn plan_round_trips_with_modifiers_and_seed() {
    let plan = SimulationPlan::new(vec![Rarity::Rare], TimePeriod::OneYear, 99)
        .with_iterations(7)
        .with_modifiers(Modifiers {
            repair_tool: false,
            referral_tier: ReferralTier::Tier3,
        });
    let json = serde_json::to_string(&plan).expect("serialize");
    let back: SimulationPlan = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(plan, back);
}

#[test]
fn referral_tier_serializes_as_its_numeric_key() {
    let json = serde_json::to_string(&ReferralTier::Tier2).expect("serialize");
    assert_eq!(json, "2");
    let back: ReferralTier = serde_json::from_str("3").expect("deserialize");
    assert_eq!(back, ReferralTier::Tier3);
    assert!(serde_json::from_str::<ReferralTier>("7").is_err());
}
