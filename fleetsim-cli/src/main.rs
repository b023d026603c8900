mod fleet_spec;
mod reports;

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use fleetsim_core::{
    DEFAULT_ITERATIONS, Modifiers, ReferralTier, SimulationPlan, TimePeriod,
    estimate_expected_profit, fleet_summary, run_simulation,
};
use reports::RunReport;

#[derive(Debug, Parser)]
#[command(name = "fleetsim", version)]
#[command(about = "Monte Carlo profit simulation for truck fleets")]
struct Args {
    /// Fleet composition: comma-separated rarities 1-5, each entry `R` or
    /// `NxR` (e.g. "1,1,3" or "2x1,1x5")
    #[arg(long, default_value = "1")]
    fleet: String,

    /// Simulation period (1_week, 30_days, or 1_year)
    #[arg(long, default_value = "30_days", value_parser = TimePeriod::from_key)]
    period: TimePeriod,

    /// Number of Monte Carlo iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Base seed for the per-trial RNG streams (default: entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Activate the repair tool (breakdown discount on each truck's first
    /// two trips, one-time fee per truck)
    #[arg(long)]
    repair_tool: bool,

    /// Referral tier 0-3 (permanent breakdown-probability discount)
    #[arg(long, default_value_t = 0)]
    referral_tier: u8,

    /// Also print the closed-form expected-profit estimate
    #[arg(long)]
    estimate: bool,

    /// Run a second baseline simulation without benefits and report deltas
    #[arg(long)]
    compare: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let fleet = fleet_spec::parse_fleet_spec(&args.fleet)?;
    let referral_tier =
        ReferralTier::try_from(args.referral_tier).context("invalid --referral-tier")?;
    let modifiers = Modifiers {
        repair_tool: args.repair_tool,
        referral_tier,
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    log::info!(
        "simulating {} trucks over {} for {} iterations (seed {seed})",
        fleet.len(),
        args.period,
        args.iterations
    );

    let plan = SimulationPlan::new(fleet.clone(), args.period, seed)
        .with_iterations(args.iterations)
        .with_modifiers(modifiers);

    let started = Instant::now();
    let result = run_simulation(&plan)?;

    let baseline = if args.compare && modifiers.is_active() {
        log::info!("running no-benefit baseline for comparison");
        let baseline_plan =
            SimulationPlan::new(fleet.clone(), args.period, seed).with_iterations(args.iterations);
        Some(run_simulation(&baseline_plan)?)
    } else {
        if args.compare {
            log::warn!("--compare has no effect without active benefits");
        }
        None
    };
    let elapsed = started.elapsed();

    let estimate = args
        .estimate
        .then(|| estimate_expected_profit(&fleet, args.period, modifiers));
    let summary = fleet_summary(&fleet);

    let report = RunReport {
        plan: &plan,
        summary: &summary,
        result: &result,
        baseline: baseline.as_ref(),
        estimate: estimate.as_ref(),
        elapsed,
    };

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, &report)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, &report)?,
        _ => reports::generate_console_report(&mut output_target, &report)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
