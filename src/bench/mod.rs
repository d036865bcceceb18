pub mod evaluation;
pub mod output;
pub mod synth;

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::Allergen;
use crate::planner::{PlanConstraints, PlanRequest};

pub use evaluation::{TrialResult, brute_force_best_score, combination_count, run_trial};
pub use output::{print_summary, write_csv, write_summary_json};
pub use synth::{bench_partition, random_catalog, random_targets};

/// Configuration for a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub trials: usize,
    pub seed: u64,
    /// Number of slots per day; past four the categories repeat.
    pub slots: usize,
    pub meals_per_slot: usize,
    /// Largest combination count still checked by enumeration.
    pub verify_limit: u64,
    pub constraints: PlanConstraints,
    /// Per-trial search budget.
    pub timeout: Option<Duration>,
    /// Exclude one random allergen per trial.
    pub restrict: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            seed: 123,
            slots: 4,
            meals_per_slot: 12,
            verify_limit: 50_000,
            constraints: PlanConstraints::default(),
            timeout: None,
            restrict: false,
        }
    }
}

/// Aggregate figures over every trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchSummary {
    pub trials: usize,
    pub feasible: usize,
    pub verified: usize,
    pub mismatches: usize,
    pub timed_out: usize,
    pub mean_elapsed_ms: f64,
    pub max_elapsed_ms: f64,
    pub mean_nodes_expanded: f64,
}

impl BenchSummary {
    pub fn from_trials(trials: &[TrialResult]) -> Self {
        if trials.is_empty() {
            return Self::default();
        }
        let n = trials.len() as f64;
        Self {
            trials: trials.len(),
            feasible: trials.iter().filter(|t| t.feasible).count(),
            verified: trials.iter().filter(|t| t.verified).count(),
            mismatches: trials.iter().filter(|t| t.mismatch).count(),
            timed_out: trials.iter().filter(|t| t.timed_out).count(),
            mean_elapsed_ms: trials.iter().map(|t| t.elapsed_ms).sum::<f64>() / n,
            max_elapsed_ms: trials.iter().map(|t| t.elapsed_ms).fold(0.0, f64::max),
            mean_nodes_expanded: trials.iter().map(|t| t.nodes_expanded as f64).sum::<f64>() / n,
        }
    }
}

pub struct BenchReport {
    pub trials: Vec<TrialResult>,
    pub summary: BenchSummary,
}

/// Run `config.trials` seeded trials.
///
/// The same config and seed always produce the same catalogs and targets.
pub fn run_bench(config: &BenchConfig) -> BenchReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let partition = bench_partition(config.slots);
    let allergens = Allergen::all();
    let mut trials = Vec::with_capacity(config.trials);

    info!(
        trials = config.trials,
        slots = config.slots,
        meals_per_slot = config.meals_per_slot,
        "starting benchmark"
    );

    for i in 0..config.trials {
        let targets = random_targets(&mut rng);
        let catalog = random_catalog(&mut rng, &partition, &targets, config.meals_per_slot);

        let mut request = PlanRequest::new(targets);
        request.slots = partition.clone();
        request.constraints = config.constraints;
        if config.restrict {
            request.allergies = allergens.choose(&mut rng).copied().into_iter().collect();
        }
        request.deadline = config.timeout.map(|t| Instant::now() + t);

        let result = run_trial(i + 1, &catalog, &request, config.verify_limit);
        if result.mismatch {
            warn!(
                trial = result.trial,
                score = ?result.score,
                exhaustive = ?result.exhaustive_score,
                "search disagrees with enumeration"
            );
        }
        trials.push(result);

        // Progress indicator every 10%
        if (i + 1) % (config.trials / 10).max(1) == 0 {
            let pct = ((i + 1) as f64 / config.trials as f64) * 100.0;
            eprint!("\r{:.0}% complete", pct);
        }
    }
    eprintln!();

    let summary = BenchSummary::from_trials(&trials);
    BenchReport { trials, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> BenchConfig {
        BenchConfig {
            trials: 8,
            seed: 7,
            slots: 3,
            meals_per_slot: 6,
            ..Default::default()
        }
    }

    #[test]
    fn test_bench_is_reproducible() {
        let a = run_bench(&small_config());
        let b = run_bench(&small_config());
        let scores = |r: &BenchReport| r.trials.iter().map(|t| t.score).collect::<Vec<_>>();
        assert_eq!(scores(&a), scores(&b));
    }

    #[test]
    fn test_small_trials_all_verified_without_mismatch() {
        let report = run_bench(&small_config());
        assert_eq!(report.summary.trials, 8);
        assert_eq!(report.summary.verified, 8);
        assert_eq!(report.summary.mismatches, 0);
    }

    #[test]
    fn test_constrained_trials_match_enumeration() {
        let config = BenchConfig {
            slots: 5,
            meals_per_slot: 5,
            constraints: PlanConstraints {
                max_total_price: Some(30.0),
                distinct_meals: true,
            },
            restrict: true,
            ..small_config()
        };
        let report = run_bench(&config);
        assert_eq!(report.summary.mismatches, 0);
    }

    #[test]
    fn test_summary_of_no_trials_is_zeroed() {
        assert_eq!(BenchSummary::from_trials(&[]), BenchSummary::default());
    }
}
