use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, warn};

use crate::models::{
    MacroTargets, Meal, MealSlot, NutritionalInfo, PlanItem, PlanResult, ScoringWeights,
    SlotAllocation,
};
use crate::planner::allocation::sum_allocations;
use crate::planner::constants::SCORE_EPSILON;
use crate::planner::scoring::calculate_score;

/// Candidate pools keyed by the slot they may fill, each in catalog order.
pub type MealsBySlot<'a> = HashMap<MealSlot, Vec<&'a Meal>>;

/// Constraints spanning more than one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanConstraints {
    /// Ceiling on the summed price of the chosen meals.
    pub max_total_price: Option<f64>,
    /// Forbid the same meal id in two slots.
    pub distinct_meals: bool,
}

impl PlanConstraints {
    pub fn is_unconstrained(&self) -> bool {
        self.max_total_price.is_none() && !self.distinct_meals
    }
}

/// Knobs for a single plan search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub weights: ScoringWeights,
    /// Stop and return the best plan found so far once this instant passes.
    pub deadline: Option<Instant>,
    pub constraints: PlanConstraints,
}

/// Counters describing how much of the search tree was visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub completions: usize,
    pub pruned: usize,
    pub timed_out: bool,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub plan: Option<PlanResult>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    fn infeasible() -> Self {
        Self {
            plan: None,
            stats: SearchStats::default(),
        }
    }
}

/// A pool entry with its slot score, kept best-first.
#[derive(Debug, Clone, Copy)]
struct Ranked {
    /// Position in the slot's input pool.
    index: usize,
    score: f64,
    price: f64,
}

struct SlotPool<'a> {
    meals: &'a [&'a Meal],
    ranked: Vec<Ranked>,
}

impl<'a> SlotPool<'a> {
    fn meal_at(&self, position: usize) -> &'a Meal {
        self.meals[self.ranked[position].index]
    }

    fn cheapest(&self) -> f64 {
        self.ranked
            .iter()
            .map(|r| r.price)
            .fold(f64::INFINITY, f64::min)
    }
}

/// One level of the explicit search stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Next ranked position to try at this depth.
    cursor: usize,
    /// Summed score of the slots assigned above this depth.
    score: f64,
    /// Summed price of the slots assigned above this depth.
    price: f64,
}

struct Best {
    score_sum: f64,
    /// Ranked position chosen for each allocation, in allocation order.
    positions: Vec<usize>,
}

/// Best one-meal-per-slot assignment, or `None` when infeasible.
///
/// `daily_targets` becomes the plan's `target_macros`; without it the
/// allocations' targets are summed back together.
pub fn find_optimal_plan(
    allocations: &[SlotAllocation],
    meals_by_slot: &MealsBySlot<'_>,
    daily_targets: Option<&MacroTargets>,
    options: &SearchOptions,
) -> Option<PlanResult> {
    search_plan(allocations, meals_by_slot, daily_targets, options).plan
}

/// Branch-and-bound search maximizing the mean slot score.
///
/// Slots are visited smallest pool first, and each pool is tried best score
/// first (input order among equal scores). A branch is cut when the assigned
/// scores plus the best remaining score of every open slot cannot beat the
/// incumbent, so ties keep the earliest candidates.
pub fn search_plan(
    allocations: &[SlotAllocation],
    meals_by_slot: &MealsBySlot<'_>,
    daily_targets: Option<&MacroTargets>,
    options: &SearchOptions,
) -> SearchOutcome {
    if allocations.is_empty() {
        return SearchOutcome::infeasible();
    }

    let mut pools: Vec<SlotPool> = Vec::with_capacity(allocations.len());
    for allocation in allocations {
        let meals = match meals_by_slot.get(&allocation.slot) {
            Some(meals) if !meals.is_empty() => meals.as_slice(),
            _ => {
                debug!(slot = %allocation.slot, "no candidates for slot");
                return SearchOutcome::infeasible();
            }
        };

        let mut ranked: Vec<Ranked> = meals
            .iter()
            .enumerate()
            .map(|(index, meal)| Ranked {
                index,
                score: calculate_score(&meal.nutritional_info, &allocation.targets, &options.weights),
                price: meal.price,
            })
            .collect();
        // Stable: equal scores stay in input order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        pools.push(SlotPool { meals, ranked });
    }

    let slot_count = pools.len();

    // Most constrained slot first; stable so equal sizes keep allocation order.
    let mut order: Vec<usize> = (0..slot_count).collect();
    order.sort_by_key(|&i| pools[i].ranked.len());

    // Optimistic completions for the slots from a given depth onwards.
    let mut best_rest = vec![0.0; slot_count + 1];
    let mut cheapest_rest = vec![0.0; slot_count + 1];
    for depth in (0..slot_count).rev() {
        let pool = &pools[order[depth]];
        best_rest[depth] = best_rest[depth + 1] + pool.ranked[0].score;
        cheapest_rest[depth] = cheapest_rest[depth + 1] + pool.cheapest();
    }

    let constraints = &options.constraints;
    let mut stats = SearchStats::default();
    let mut best: Option<Best> = None;

    // chosen[d] is the ranked position picked at depth d.
    let mut chosen: Vec<usize> = Vec::with_capacity(slot_count);
    let mut stack: Vec<Frame> = Vec::with_capacity(slot_count);
    stack.push(Frame {
        cursor: 0,
        score: 0.0,
        price: 0.0,
    });

    while let Some(frame) = stack.last_mut() {
        if options.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            stats.timed_out = true;
            warn!(
                nodes = stats.nodes_expanded,
                found = best.is_some(),
                "plan search deadline reached"
            );
            break;
        }

        let depth = chosen.len();
        let pool = &pools[order[depth]];

        if frame.cursor >= pool.ranked.len() {
            stack.pop();
            chosen.pop();
            continue;
        }

        let position = frame.cursor;
        let candidate = pool.ranked[position];
        frame.cursor += 1;

        let score = frame.score + candidate.score;
        if let Some(incumbent) = &best {
            // Later candidates at this depth score no higher, so the whole
            // level is done.
            if score + best_rest[depth + 1] <= incumbent.score_sum + SCORE_EPSILON {
                stats.pruned += 1;
                frame.cursor = pool.ranked.len();
                continue;
            }
        }

        let price = frame.price + candidate.price;
        if let Some(limit) = constraints.max_total_price {
            if price + cheapest_rest[depth + 1] > limit {
                stats.pruned += 1;
                continue;
            }
        }

        if constraints.distinct_meals {
            let meal = pool.meal_at(position);
            let repeated = chosen
                .iter()
                .enumerate()
                .any(|(d, &p)| pools[order[d]].meal_at(p).id == meal.id);
            if repeated {
                continue;
            }
        }

        stats.nodes_expanded += 1;
        chosen.push(position);

        if depth + 1 == slot_count {
            stats.completions += 1;
            let mut positions = vec![0; slot_count];
            for (d, &p) in chosen.iter().enumerate() {
                positions[order[d]] = p;
            }
            best = Some(Best {
                score_sum: score,
                positions,
            });
            chosen.pop();
            continue;
        }

        stack.push(Frame {
            cursor: 0,
            score,
            price,
        });
    }

    debug!(
        slots = slot_count,
        nodes = stats.nodes_expanded,
        completions = stats.completions,
        pruned = stats.pruned,
        timed_out = stats.timed_out,
        "plan search finished"
    );

    let plan = best.map(|best| build_plan(allocations, &pools, &best, daily_targets));
    SearchOutcome { plan, stats }
}

fn build_plan(
    allocations: &[SlotAllocation],
    pools: &[SlotPool],
    best: &Best,
    daily_targets: Option<&MacroTargets>,
) -> PlanResult {
    let items: Vec<PlanItem> = allocations
        .iter()
        .zip(pools)
        .zip(&best.positions)
        .map(|((allocation, pool), &position)| PlanItem {
            slot: allocation.slot,
            meal: pool.meal_at(position).clone(),
            score: pool.ranked[position].score,
            slot_targets: allocation.targets,
        })
        .collect();

    let actual_macros = items
        .iter()
        .fold(NutritionalInfo::default(), |acc, item| {
            acc + item.meal.nutritional_info
        });

    PlanResult {
        total_score: best.score_sum / items.len() as f64,
        items,
        actual_macros,
        target_macros: daily_targets
            .copied()
            .unwrap_or_else(|| sum_allocations(allocations)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(id: &str, slot: MealSlot, cal: f64, p: f64, c: f64, f: f64) -> Meal {
        Meal::new(id, id, slot, NutritionalInfo::new(cal, p, c, f))
    }

    fn allocation(slot: MealSlot, targets: MacroTargets) -> SlotAllocation {
        SlotAllocation {
            slot,
            percentage: 0.5,
            targets,
        }
    }

    #[test]
    fn test_empty_allocations_infeasible() {
        let pools = MealsBySlot::new();
        assert!(find_optimal_plan(&[], &pools, None, &SearchOptions::default()).is_none());
    }

    #[test]
    fn test_missing_or_empty_pool_infeasible() {
        let bf = meal("bf", MealSlot::Breakfast, 300.0, 20.0, 30.0, 10.0);
        let target = MacroTargets::new(300.0, 20.0, 30.0, 10.0);
        let allocations = [
            allocation(MealSlot::Breakfast, target),
            allocation(MealSlot::Lunch, target),
        ];

        let mut pools = MealsBySlot::new();
        pools.insert(MealSlot::Breakfast, vec![&bf]);
        assert!(find_optimal_plan(&allocations, &pools, None, &SearchOptions::default()).is_none());

        pools.insert(MealSlot::Lunch, vec![]);
        assert!(find_optimal_plan(&allocations, &pools, None, &SearchOptions::default()).is_none());
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let target = MacroTargets::new(400.0, 30.0, 40.0, 10.0);
        let a = meal("a", MealSlot::Lunch, 400.0, 30.0, 40.0, 10.0);
        let b = meal("b", MealSlot::Lunch, 400.0, 30.0, 40.0, 10.0);
        let mut pools = MealsBySlot::new();
        pools.insert(MealSlot::Lunch, vec![&b, &a]);

        let plan = find_optimal_plan(
            &[allocation(MealSlot::Lunch, target)],
            &pools,
            None,
            &SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.items[0].meal.id, "b");
    }

    #[test]
    fn test_distinct_meals_shared_pool() {
        let target = MacroTargets::new(200.0, 10.0, 20.0, 5.0);
        let best = meal("best", MealSlot::Snack, 200.0, 10.0, 20.0, 5.0);
        let next = meal("next", MealSlot::Snack, 220.0, 10.0, 20.0, 5.0);
        let mut pools = MealsBySlot::new();
        pools.insert(MealSlot::Snack, vec![&best, &next]);
        let allocations = [
            allocation(MealSlot::Snack, target),
            allocation(MealSlot::Snack, target),
        ];

        let free = find_optimal_plan(&allocations, &pools, None, &SearchOptions::default()).unwrap();
        assert_eq!(free.meal_ids().collect::<Vec<_>>(), vec!["best", "best"]);

        let options = SearchOptions {
            constraints: PlanConstraints {
                distinct_meals: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let distinct = find_optimal_plan(&allocations, &pools, None, &options).unwrap();
        assert_eq!(distinct.meal_ids().collect::<Vec<_>>(), vec!["best", "next"]);
    }

    #[test]
    fn test_expired_deadline_returns_none() {
        let target = MacroTargets::new(200.0, 10.0, 20.0, 5.0);
        let m = meal("m", MealSlot::Snack, 200.0, 10.0, 20.0, 5.0);
        let mut pools = MealsBySlot::new();
        pools.insert(MealSlot::Snack, vec![&m]);

        let options = SearchOptions {
            deadline: Some(Instant::now()),
            ..Default::default()
        };
        let outcome = search_plan(&[allocation(MealSlot::Snack, target)], &pools, None, &options);
        assert!(outcome.plan.is_none());
        assert!(outcome.stats.timed_out);
    }

    #[test]
    fn test_independent_slots_prune_after_first_completion() {
        let target = MacroTargets::new(500.0, 40.0, 50.0, 15.0);
        let meals: Vec<Meal> = (0..20)
            .map(|i| meal(&format!("l{i}"), MealSlot::Lunch, 400.0 + i as f64 * 10.0, 40.0, 50.0, 15.0))
            .collect();
        let dinners: Vec<Meal> = (0..20)
            .map(|i| meal(&format!("d{i}"), MealSlot::Dinner, 300.0 + i as f64 * 10.0, 40.0, 50.0, 15.0))
            .collect();
        let mut pools = MealsBySlot::new();
        pools.insert(MealSlot::Lunch, meals.iter().collect());
        pools.insert(MealSlot::Dinner, dinners.iter().collect());

        let outcome = search_plan(
            &[allocation(MealSlot::Lunch, target), allocation(MealSlot::Dinner, target)],
            &pools,
            None,
            &SearchOptions::default(),
        );
        assert_eq!(outcome.stats.completions, 1);
        let plan = outcome.plan.unwrap();
        assert_eq!(plan.items[0].meal.id, "l10");
        assert_eq!(plan.items[1].meal.id, "d19");
    }
}
