pub mod macros;
pub mod meal;
pub mod plan;

pub use macros::{MacroDeviation, MacroTargets, NutritionalInfo, ScoringWeights, Tolerance};
pub use meal::{Allergen, DietaryTag, Meal, MealSlot};
pub use plan::{PlanItem, PlanResult, ScoredMeal, SlotAllocation, SlotPercentage};
