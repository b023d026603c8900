//! Console, JSON, and markdown renderings of a finished simulation run.
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use fleetsim_core::{
    AggregateResult, FleetSummary, Modifiers, ProfitEstimate, Rarity, RarityBreakdown,
    ReferralTier, SimulationPlan, TimePeriod,
};

/// Everything a report renders, borrowed from the finished run.
pub struct RunReport<'a> {
    pub plan: &'a SimulationPlan,
    pub summary: &'a FleetSummary,
    pub result: &'a AggregateResult,
    /// Second run without benefits, present when `--compare` applied.
    pub baseline: Option<&'a AggregateResult>,
    pub estimate: Option<&'a ProfitEstimate>,
    pub elapsed: Duration,
}

/// Headline distribution metrics shared by every report format.
#[derive(Debug, Clone, Copy, Serialize)]
struct ProfitMetrics {
    mean_profit: f64,
    std_profit: f64,
    min_profit: f64,
    max_profit: f64,
    median_profit: f64,
    percentile_25: f64,
    percentile_75: f64,
    positive_probability: f64,
}

impl From<&AggregateResult> for ProfitMetrics {
    fn from(result: &AggregateResult) -> Self {
        Self {
            mean_profit: result.mean_profit,
            std_profit: result.std_profit,
            min_profit: result.min_profit,
            max_profit: result.max_profit,
            median_profit: result.median_profit,
            percentile_25: result.percentile_25,
            percentile_75: result.percentile_75,
            positive_probability: result.positive_probability,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    seed: u64,
    period: TimePeriod,
    iterations: usize,
    modifiers: Modifiers,
    fleet: &'a FleetSummary,
    metrics: ProfitMetrics,
    rarity_breakdown: &'a BTreeMap<Rarity, RarityBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    baseline: Option<ProfitMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimate: Option<&'a ProfitEstimate>,
}

fn describe_fleet(summary: &FleetSummary) -> String {
    let parts: Vec<String> = summary
        .by_rarity
        .iter()
        .map(|(rarity, count)| format!("{count}x rarity {}", rarity.key()))
        .collect();
    format!("{} trucks ({})", summary.total_trucks, parts.join(", "))
}

fn describe_modifiers(modifiers: Modifiers) -> String {
    let mut parts = Vec::new();
    if modifiers.repair_tool {
        parts.push("repair tool".to_string());
    }
    if modifiers.referral_tier != ReferralTier::None {
        parts.push(format!("referral tier {}", modifiers.referral_tier.key()));
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(" + ")
    }
}

fn trips_per_truck(period: TimePeriod) -> u32 {
    period.hours() / fleetsim_core::HOURS_PER_TRIP
}

pub fn generate_console_report<W: Write>(out: &mut W, report: &RunReport) -> Result<()> {
    let result = report.result;

    writeln!(out)?;
    writeln!(out, "{}", "📊 Fleet Profit Simulation".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;
    writeln!(out, "Fleet: {}", describe_fleet(report.summary))?;
    writeln!(
        out,
        "Period: {} ({} h, {} trips/truck)",
        result.period,
        result.period.hours(),
        trips_per_truck(result.period)
    )?;
    writeln!(
        out,
        "Iterations: {} | Seed: {} | Benefits: {}",
        result.iterations,
        report.plan.seed,
        describe_modifiers(report.plan.modifiers)
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "💰 Mean profit: {} ± {:.2}",
        format!("{:.2}", result.mean_profit).bright_white().bold(),
        result.std_profit
    )?;
    writeln!(out, "📈 Max profit: {:.2}", result.max_profit)?;
    writeln!(out, "📉 Min profit: {:.2}", result.min_profit)?;
    writeln!(
        out,
        "Median: {:.2} | P25: {:.2} | P75: {:.2}",
        result.median_profit, result.percentile_25, result.percentile_75
    )?;
    let positive = format!("{:.1}%", result.positive_probability);
    let positive = if result.positive_probability >= 50.0 {
        positive.green()
    } else {
        positive.red()
    };
    writeln!(out, "🎯 Positive outcome probability: {positive}")?;
    writeln!(out)?;

    writeln!(out, "{}", "🚚 Per-rarity breakdown".bright_yellow().bold())?;
    writeln!(
        out,
        "{:<8} {:>7} {:>14} {:>13} {:>9} {:>12} {:>14}",
        "Rarity", "Trucks", "Profit/truck", "Class total", "Std", "Trips/truck", "Repairs/truck"
    )?;
    for (rarity, breakdown) in &result.rarity_breakdown {
        writeln!(
            out,
            "{:<8} {:>7} {:>14.2} {:>13.2} {:>9.2} {:>12.1} {:>14.2}",
            rarity.key(),
            breakdown.count,
            breakdown.avg_profit,
            breakdown.total_profit,
            breakdown.std_profit,
            breakdown.avg_trips,
            breakdown.avg_repairs
        )?;
    }

    if let Some(estimate) = report.estimate {
        writeln!(out)?;
        writeln!(out, "{}", "🧮 Closed-form estimate".bright_yellow().bold())?;
        writeln!(out, "Expected profit: {:.2}", estimate.expected_profit)?;
        writeln!(
            out,
            "Simulated mean differs by {}",
            signed(result.mean_profit - estimate.expected_profit)
        )?;
    }

    if let Some(baseline) = report.baseline {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            "🆚 Comparison vs no-benefit baseline".bright_yellow().bold()
        )?;
        writeln!(
            out,
            "Mean profit: {:.2} ({})",
            result.mean_profit,
            signed(result.mean_profit - baseline.mean_profit)
        )?;
        writeln!(
            out,
            "Max profit: {:.2} ({})",
            result.max_profit,
            signed(result.max_profit - baseline.max_profit)
        )?;
        writeln!(
            out,
            "Min profit: {:.2} ({})",
            result.min_profit,
            signed(result.min_profit - baseline.min_profit)
        )?;
        writeln!(
            out,
            "Positive outcome: {:.1}% ({})",
            result.positive_probability,
            signed(result.positive_probability - baseline.positive_probability)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "🏁 Total time: {:?}", report.elapsed)?;
    Ok(())
}

fn signed(delta: f64) -> String {
    let text = format!("{delta:+.2}");
    if delta >= 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

pub fn generate_json_report<W: Write>(out: &mut W, report: &RunReport) -> Result<()> {
    let document = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        seed: report.plan.seed,
        period: report.result.period,
        iterations: report.result.iterations,
        modifiers: report.plan.modifiers,
        fleet: report.summary,
        metrics: ProfitMetrics::from(report.result),
        rarity_breakdown: &report.result.rarity_breakdown,
        baseline: report.baseline.map(ProfitMetrics::from),
        estimate: report.estimate,
    };
    let json = serde_json::to_string_pretty(&document)?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(out: &mut W, report: &RunReport) -> Result<()> {
    let result = report.result;

    writeln!(out, "# Fleet Profit Simulation\n")?;
    writeln!(out, "- **Fleet**: {}", describe_fleet(report.summary))?;
    writeln!(
        out,
        "- **Period**: {} ({} h, {} trips/truck)",
        result.period,
        result.period.hours(),
        trips_per_truck(result.period)
    )?;
    writeln!(out, "- **Iterations**: {}", result.iterations)?;
    writeln!(out, "- **Seed**: {}", report.plan.seed)?;
    writeln!(
        out,
        "- **Benefits**: {}\n",
        describe_modifiers(report.plan.modifiers)
    )?;

    writeln!(out, "## Profit distribution\n")?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(
        out,
        "| Mean | {:.2} ± {:.2} |",
        result.mean_profit, result.std_profit
    )?;
    writeln!(out, "| Median | {:.2} |", result.median_profit)?;
    writeln!(out, "| Min | {:.2} |", result.min_profit)?;
    writeln!(out, "| Max | {:.2} |", result.max_profit)?;
    writeln!(out, "| P25 | {:.2} |", result.percentile_25)?;
    writeln!(out, "| P75 | {:.2} |", result.percentile_75)?;
    writeln!(
        out,
        "| Positive outcome | {:.1}% |\n",
        result.positive_probability
    )?;

    writeln!(out, "## Per-rarity breakdown\n")?;
    writeln!(
        out,
        "| Rarity | Trucks | Profit/truck | Class total | Std | Trips/truck | Repairs/truck |"
    )?;
    writeln!(
        out,
        "|--------|--------|--------------|-------------|-----|-------------|---------------|"
    )?;
    for (rarity, breakdown) in &result.rarity_breakdown {
        writeln!(
            out,
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.1} | {:.2} |",
            rarity.key(),
            breakdown.count,
            breakdown.avg_profit,
            breakdown.total_profit,
            breakdown.std_profit,
            breakdown.avg_trips,
            breakdown.avg_repairs
        )?;
    }
    writeln!(out)?;

    if let Some(estimate) = report.estimate {
        writeln!(out, "## Closed-form estimate\n")?;
        writeln!(
            out,
            "- **Expected profit**: {:.2}",
            estimate.expected_profit
        )?;
        writeln!(
            out,
            "- **Simulated mean delta**: {:+.2}\n",
            result.mean_profit - estimate.expected_profit
        )?;
    }

    if let Some(baseline) = report.baseline {
        writeln!(out, "## Comparison vs no-benefit baseline\n")?;
        writeln!(out, "| Metric | With benefits | Baseline | Delta |")?;
        writeln!(out, "|--------|---------------|----------|-------|")?;
        writeln!(
            out,
            "| Mean | {:.2} | {:.2} | {:+.2} |",
            result.mean_profit,
            baseline.mean_profit,
            result.mean_profit - baseline.mean_profit
        )?;
        writeln!(
            out,
            "| Max | {:.2} | {:.2} | {:+.2} |",
            result.max_profit,
            baseline.max_profit,
            result.max_profit - baseline.max_profit
        )?;
        writeln!(
            out,
            "| Min | {:.2} | {:.2} | {:+.2} |",
            result.min_profit,
            baseline.min_profit,
            result.min_profit - baseline.min_profit
        )?;
        writeln!(
            out,
            "| Positive outcome | {:.1}% | {:.1}% | {:+.1}% |",
            result.positive_probability,
            baseline.positive_probability,
            result.positive_probability - baseline.positive_probability
        )?;
        writeln!(out)?;
    }

    writeln!(out, "_Total time: {:?}_", report.elapsed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsim_core::{fleet_summary, run_simulation};

    fn finished_run() -> (SimulationPlan, FleetSummary, AggregateResult) {
        let plan = SimulationPlan::new(
            vec![Rarity::Common, Rarity::Rare],
            TimePeriod::OneWeek,
            0xFADE,
        )
        .with_iterations(40);
        let result = run_simulation(&plan).expect("valid plan");
        let summary = fleet_summary(&plan.fleet);
        (plan, summary, result)
    }

    #[test]
    fn console_report_mentions_the_headline_metrics() {
        let (plan, summary, result) = finished_run();
        let report = RunReport {
            plan: &plan,
            summary: &summary,
            result: &result,
            baseline: None,
            estimate: None,
            elapsed: Duration::from_millis(5),
        };
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, &report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Fleet Profit Simulation"));
        assert!(text.contains("Mean profit"));
        assert!(text.contains("Per-rarity breakdown"));
    }

    #[test]
    fn json_report_is_valid_json_with_expected_fields() {
        let (plan, summary, result) = finished_run();
        let report = RunReport {
            plan: &plan,
            summary: &summary,
            result: &result,
            baseline: None,
            estimate: None,
            elapsed: Duration::from_millis(5),
        };
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["iterations"], 40);
        assert_eq!(value["period"], "1_week");
        assert!(value["metrics"]["mean_profit"].is_number());
        assert!(value.get("baseline").is_none());
    }

    #[test]
    fn markdown_report_renders_breakdown_rows() {
        let (plan, summary, result) = finished_run();
        let report = RunReport {
            plan: &plan,
            summary: &summary,
            result: &result,
            baseline: Some(&result),
            estimate: None,
            elapsed: Duration::from_millis(5),
        };
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("| Rarity |"));
        assert!(text.contains("## Comparison vs no-benefit baseline"));
    }
}
