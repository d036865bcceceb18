pub mod bench;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;

pub use error::{EngineError, Result};
pub use models::{MacroTargets, Meal, MealSlot, NutritionalInfo, PlanResult, ScoredMeal};
pub use planner::{MatchRequest, PlanRequest, generate_daily_plan, match_meals};
