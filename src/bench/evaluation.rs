use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;

use crate::models::{Meal, SlotAllocation};
use crate::planner::scoring::calculate_score;
use crate::planner::{MealsBySlot, PlanRequest, SearchOptions, build_slot_pools, search_plan};

/// Largest difference between two mean scores still counted as equal.
const VERIFY_EPSILON: f64 = 1e-9;

/// Outcome of one benchmark trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    pub trial: usize,
    pub catalog_size: usize,
    /// Saturating product of the slot pool sizes.
    pub combinations: u64,
    pub feasible: bool,
    pub score: Option<f64>,
    pub exhaustive_score: Option<f64>,
    /// Whether enumeration ran for this trial.
    pub verified: bool,
    pub mismatch: bool,
    pub elapsed_ms: f64,
    pub nodes_expanded: usize,
    pub completions: usize,
    pub pruned: usize,
    pub timed_out: bool,
}

/// Number of complete assignments, before constraints.
pub fn combination_count(allocations: &[SlotAllocation], meals_by_slot: &MealsBySlot<'_>) -> u64 {
    if allocations.is_empty() {
        return 0;
    }
    allocations.iter().fold(1u64, |acc, allocation| {
        let size = meals_by_slot.get(&allocation.slot).map_or(0, Vec::len);
        acc.saturating_mul(size as u64)
    })
}

/// Best mean slot score over every assignment that satisfies the constraints.
///
/// Visits the full cartesian product; only usable on small pools.
pub fn brute_force_best_score(
    allocations: &[SlotAllocation],
    meals_by_slot: &MealsBySlot<'_>,
    options: &SearchOptions,
) -> Option<f64> {
    if allocations.is_empty() {
        return None;
    }

    let pools: Vec<Vec<(&Meal, f64)>> = allocations
        .iter()
        .map(|allocation| {
            meals_by_slot
                .get(&allocation.slot)
                .map(|meals| {
                    meals
                        .iter()
                        .map(|&meal| {
                            let score = calculate_score(
                                &meal.nutritional_info,
                                &allocation.targets,
                                &options.weights,
                            );
                            (meal, score)
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();

    if pools.iter().any(Vec::is_empty) {
        return None;
    }

    let constraints = &options.constraints;
    let mut odometer = vec![0usize; pools.len()];
    let mut best: Option<f64> = None;

    loop {
        let picks = odometer.iter().zip(&pools).map(|(&i, pool)| pool[i]);

        let (score, price) = picks
            .clone()
            .fold((0.0, 0.0), |(s, p), (meal, score)| (s + score, p + meal.price));
        let within_budget = constraints
            .max_total_price
            .is_none_or(|limit| price <= limit);
        let distinct = !constraints.distinct_meals || {
            let mut ids = HashSet::new();
            picks.clone().all(|(meal, _)| ids.insert(meal.id.as_str()))
        };

        if within_budget && distinct && best.is_none_or(|b| score > b) {
            best = Some(score);
        }

        let mut slot = 0;
        loop {
            if slot == pools.len() {
                return best.map(|sum| sum / pools.len() as f64);
            }
            odometer[slot] += 1;
            if odometer[slot] < pools[slot].len() {
                break;
            }
            odometer[slot] = 0;
            slot += 1;
        }
    }
}

fn scores_agree(search: Option<f64>, exhaustive: Option<f64>) -> bool {
    match (search, exhaustive) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() <= VERIFY_EPSILON,
        _ => false,
    }
}

/// Time one plan search and, when small enough, check it by enumeration.
///
/// Timed-out searches are never verified since they may stop early.
pub fn run_trial(trial: usize, catalog: &[Meal], request: &PlanRequest, verify_limit: u64) -> TrialResult {
    let (allocations, meals_by_slot) = build_slot_pools(catalog, request, &[]);
    let options = request.search_options();
    let combinations = combination_count(&allocations, &meals_by_slot);

    let started = Instant::now();
    let outcome = search_plan(
        &allocations,
        &meals_by_slot,
        Some(&request.daily_targets),
        &options,
    );
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let score = outcome.plan.as_ref().map(|plan| plan.total_score);
    let verified = combinations <= verify_limit && !outcome.stats.timed_out;
    let exhaustive_score = if verified {
        brute_force_best_score(&allocations, &meals_by_slot, &options)
    } else {
        None
    };

    TrialResult {
        trial,
        catalog_size: catalog.len(),
        combinations,
        feasible: score.is_some(),
        score,
        exhaustive_score,
        verified,
        mismatch: verified && !scores_agree(score, exhaustive_score),
        elapsed_ms,
        nodes_expanded: outcome.stats.nodes_expanded,
        completions: outcome.stats.completions,
        pruned: outcome.stats.pruned,
        timed_out: outcome.stats.timed_out,
    }
}
