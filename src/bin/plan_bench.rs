use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use meal_plan_engine::bench::{BenchConfig, print_summary, run_bench, write_csv, write_summary_json};
use meal_plan_engine::logging::init_logging;
use meal_plan_engine::planner::PlanConstraints;

#[derive(Parser, Debug)]
#[command(name = "plan-bench")]
#[command(about = "Benchmark and verify the daily plan search on synthetic catalogs")]
struct Args {
    /// Number of trials
    #[arg(long, default_value = "100")]
    trials: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Slots per day (categories repeat past four)
    #[arg(long, default_value = "4")]
    slots: usize,

    /// Generated meals per category
    #[arg(long, default_value = "12")]
    meals_per_slot: usize,

    /// Largest combination count checked by exhaustive enumeration
    #[arg(long, default_value = "50000")]
    verify_limit: u64,

    /// Ceiling on the summed plan price
    #[arg(long)]
    max_price: Option<f64>,

    /// Forbid the same meal in two slots
    #[arg(long)]
    distinct: bool,

    /// Exclude one random allergen per trial
    #[arg(long)]
    restrict: bool,

    /// Per-trial search timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output CSV file for per-trial results
    #[arg(long, default_value = "bench_results.csv")]
    csv: PathBuf,

    /// Output JSON file for the summary
    #[arg(long, default_value = "bench_summary.json")]
    json: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    if args.slots == 0 {
        eprintln!("Error: --slots must be at least 1");
        std::process::exit(1);
    }

    let config = BenchConfig {
        trials: args.trials,
        seed: args.seed,
        slots: args.slots,
        meals_per_slot: args.meals_per_slot,
        verify_limit: args.verify_limit,
        constraints: PlanConstraints {
            max_total_price: args.max_price,
            distinct_meals: args.distinct,
        },
        timeout: args.timeout_ms.map(Duration::from_millis),
        restrict: args.restrict,
    };

    println!(
        "Running {} trials: {} slots, {} meals per category, seed {}",
        config.trials, config.slots, config.meals_per_slot, config.seed
    );

    let report = run_bench(&config);
    print_summary(&report.summary, &report.trials);

    if let Err(e) = write_csv(&report.trials, &args.csv) {
        eprintln!("Error writing CSV: {}", e);
    } else {
        println!("Wrote per-trial results to {:?}", args.csv);
    }

    if let Err(e) = write_summary_json(&report.summary, &args.json) {
        eprintln!("Error writing JSON: {}", e);
    } else {
        println!("Wrote summary to {:?}", args.json);
    }

    if report.summary.mismatches > 0 {
        std::process::exit(1);
    }
}
