use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    Allergen, DietaryTag, MacroTargets, Meal, MealSlot, PlanResult, ScoredMeal, ScoringWeights,
    SlotAllocation, SlotPercentage,
};
use crate::planner::allocation::allocate_slots;
use crate::planner::filters::{FilterOptions, filter_by_category, filter_candidates};
use crate::planner::optimizer::{MealsBySlot, PlanConstraints, SearchOptions, find_optimal_plan};
use crate::planner::scoring::{calculate_deviation, calculate_score};

/// Nutritional and dietary constraints of a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConstraints {
    pub targets: MacroTargets,
    #[serde(default)]
    pub allergies: Vec<Allergen>,
    #[serde(default)]
    pub dietary_preferences: Vec<DietaryTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<ScoringWeights>,
}

impl MatchConstraints {
    pub fn new(targets: MacroTargets) -> Self {
        Self {
            targets,
            allergies: Vec::new(),
            dietary_preferences: Vec::new(),
            weights: None,
        }
    }
}

/// Ranked single-slot recommendation request.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub constraints: MatchConstraints,
    pub category: Option<MealSlot>,
    /// Maximum number of results; `None` returns every candidate.
    pub limit: Option<usize>,
}

/// Full-day plan request.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub daily_targets: MacroTargets,
    pub slots: Vec<SlotPercentage>,
    pub allergies: Vec<Allergen>,
    pub dietary_preferences: Vec<DietaryTag>,
    pub weights: Option<ScoringWeights>,
    pub constraints: PlanConstraints,
    pub deadline: Option<Instant>,
}

impl PlanRequest {
    /// Request over the default slot partition with no restrictions.
    pub fn new(daily_targets: MacroTargets) -> Self {
        Self {
            daily_targets,
            slots: SlotPercentage::default_partition(),
            allergies: Vec::new(),
            dietary_preferences: Vec::new(),
            weights: None,
            constraints: PlanConstraints::default(),
            deadline: None,
        }
    }

    /// Search knobs derived from this request.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            weights: self.weights.unwrap_or_default(),
            deadline: self.deadline,
            constraints: self.constraints,
        }
    }
}

/// Ranked recommendations for one target.
///
/// Filter, score, sort by score descending (catalog order among ties), truncate.
pub fn match_meals(catalog: &[Meal], request: &MatchRequest) -> Vec<ScoredMeal> {
    if request.limit == Some(0) {
        return Vec::new();
    }

    let constraints = &request.constraints;
    let weights = constraints.weights.unwrap_or_default();
    let opts = FilterOptions {
        category: request.category,
        exclude_allergens: constraints.allergies.clone(),
        require_dietary_tags: constraints.dietary_preferences.clone(),
        ..Default::default()
    };

    let mut scored: Vec<ScoredMeal> = filter_candidates(catalog, &opts)
        .into_iter()
        .map(|meal| ScoredMeal {
            meal: meal.clone(),
            score: calculate_score(&meal.nutritional_info, &constraints.targets, &weights),
            deviation: calculate_deviation(&meal.nutritional_info, &constraints.targets),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(limit) = request.limit {
        scored.truncate(limit);
    }
    scored
}

/// Optimal daily plan, or `None` when some slot has no eligible meal.
pub fn generate_daily_plan(catalog: &[Meal], request: &PlanRequest) -> Option<PlanResult> {
    plan_excluding(catalog, request, &[])
}

/// Up to `count` plans, each avoiding every meal used by the earlier ones.
///
/// Stops at the first plan that can no longer be built.
pub fn generate_plan_variants(
    catalog: &[Meal],
    request: &PlanRequest,
    count: usize,
) -> Vec<PlanResult> {
    let mut variants = Vec::with_capacity(count);
    let mut used: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for _ in 0..count {
        let Some(plan) = plan_excluding(catalog, request, &used) else {
            break;
        };
        for id in plan.meal_ids() {
            if seen.insert(id.to_string()) {
                used.push(id.to_string());
            }
        }
        variants.push(plan);
    }

    debug!(requested = count, built = variants.len(), "plan variants generated");
    variants
}

fn plan_excluding(catalog: &[Meal], request: &PlanRequest, excluded: &[String]) -> Option<PlanResult> {
    let (allocations, meals_by_slot) = build_slot_pools(catalog, request, excluded);
    find_optimal_plan(
        &allocations,
        &meals_by_slot,
        Some(&request.daily_targets),
        &request.search_options(),
    )
}

/// Slot allocations plus the eligible candidate pool of each slot.
///
/// Pools keep catalog order. Slots sharing a category share one pool.
pub fn build_slot_pools<'a>(
    catalog: &'a [Meal],
    request: &PlanRequest,
    excluded: &[String],
) -> (Vec<SlotAllocation>, MealsBySlot<'a>) {
    let opts = FilterOptions {
        exclude_allergens: request.allergies.clone(),
        require_dietary_tags: request.dietary_preferences.clone(),
        exclude_meal_ids: excluded.to_vec(),
        ..Default::default()
    };
    let eligible = filter_candidates(catalog, &opts);

    let allocations = allocate_slots(&request.daily_targets, &request.slots);

    let mut meals_by_slot = MealsBySlot::new();
    for allocation in &allocations {
        meals_by_slot
            .entry(allocation.slot)
            .or_insert_with(|| filter_by_category(eligible.clone(), allocation.slot));
    }

    (allocations, meals_by_slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionalInfo;

    fn meal(id: &str, slot: MealSlot, cal: f64) -> Meal {
        Meal::new(id, id, slot, NutritionalInfo::new(cal, 20.0, 40.0, 10.0))
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let catalog = vec![meal("a", MealSlot::Lunch, 400.0)];
        let request = MatchRequest {
            constraints: MatchConstraints::new(MacroTargets::new(400.0, 20.0, 40.0, 10.0)),
            category: None,
            limit: Some(0),
        };
        assert!(match_meals(&catalog, &request).is_empty());
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = vec![
            meal("over", MealSlot::Lunch, 440.0),
            meal("under", MealSlot::Lunch, 360.0),
            meal("exact", MealSlot::Lunch, 400.0),
        ];
        let request = MatchRequest {
            constraints: MatchConstraints::new(MacroTargets::new(400.0, 20.0, 40.0, 10.0)),
            category: Some(MealSlot::Lunch),
            limit: None,
        };
        let ids: Vec<String> = match_meals(&catalog, &request)
            .into_iter()
            .map(|s| s.meal.id)
            .collect();
        assert_eq!(ids, vec!["exact", "over", "under"]);
    }

    #[test]
    fn test_variants_do_not_reuse_meals() {
        let catalog = vec![
            meal("b1", MealSlot::Breakfast, 500.0),
            meal("b2", MealSlot::Breakfast, 450.0),
            meal("l1", MealSlot::Lunch, 500.0),
            meal("l2", MealSlot::Lunch, 550.0),
            meal("l3", MealSlot::Lunch, 600.0),
        ];
        let mut request = PlanRequest::new(MacroTargets::new(1000.0, 40.0, 80.0, 20.0));
        request.slots = vec![
            SlotPercentage::new(MealSlot::Breakfast, 0.5),
            SlotPercentage::new(MealSlot::Lunch, 0.5),
        ];

        let variants = generate_plan_variants(&catalog, &request, 3);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].meal_ids().collect::<Vec<_>>(), vec!["b1", "l1"]);
        assert_eq!(variants[1].meal_ids().collect::<Vec<_>>(), vec!["b2", "l2"]);
    }
}
