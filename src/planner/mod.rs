pub mod allocation;
pub mod constants;
pub mod filters;
pub mod matching;
pub mod optimizer;
pub mod scoring;

pub use allocation::{allocate_slots, check_partition, sum_allocations};
pub use constants::*;
pub use filters::{
    FilterOptions, filter_by_allergens, filter_by_category, filter_by_dietary_tags,
    filter_candidates,
};
pub use matching::{
    MatchConstraints, MatchRequest, PlanRequest, build_slot_pools, generate_daily_plan,
    generate_plan_variants, match_meals,
};
pub use optimizer::{
    MealsBySlot, PlanConstraints, SearchOptions, SearchOutcome, SearchStats, find_optimal_plan,
    search_plan,
};
pub use scoring::{calculate_deviation, calculate_score, macro_score, within_tolerance};
