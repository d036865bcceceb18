use serde::{Deserialize, Serialize};

use crate::models::{MacroDeviation, MacroTargets, Meal, MealSlot, NutritionalInfo, Tolerance};
use crate::planner::constants::DEFAULT_SLOT_PERCENTAGES;
use crate::planner::scoring::within_tolerance;

/// Share of the daily targets assigned to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotPercentage {
    pub slot: MealSlot,
    pub percentage: f64,
}

impl SlotPercentage {
    pub fn new(slot: MealSlot, percentage: f64) -> Self {
        Self { slot, percentage }
    }

    /// Breakfast 25%, lunch 35%, dinner 30%, snack 10%.
    pub fn default_partition() -> Vec<SlotPercentage> {
        DEFAULT_SLOT_PERCENTAGES
            .iter()
            .map(|&(slot, percentage)| SlotPercentage { slot, percentage })
            .collect()
    }
}

/// Per-slot sub-target derived from the daily targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotAllocation {
    pub slot: MealSlot,
    pub percentage: f64,
    pub targets: MacroTargets,
}

/// One meal scored against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMeal {
    pub meal: Meal,
    pub score: f64,
    pub deviation: MacroDeviation,
}

impl ScoredMeal {
    /// Whether the meal sits inside `tolerance` of `target` on every macro.
    pub fn within_tolerance(&self, target: &MacroTargets, tolerance: &Tolerance) -> bool {
        within_tolerance(&self.meal.nutritional_info, target, tolerance)
    }
}

/// One slot's chosen meal within a daily plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub slot: MealSlot,
    pub meal: Meal,
    pub score: f64,
    pub slot_targets: MacroTargets,
}

/// A full-day assignment of one meal per slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub items: Vec<PlanItem>,
    pub total_score: f64,
    pub actual_macros: NutritionalInfo,
    pub target_macros: MacroTargets,
}

impl PlanResult {
    pub fn item(&self, slot: MealSlot) -> Option<&PlanItem> {
        self.items.iter().find(|i| i.slot == slot)
    }

    pub fn meal_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.meal.id.as_str())
    }

    /// Sum of chosen meals' prices.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(|i| i.meal.price).sum()
    }
}
