use crate::models::MealSlot;

// ─────────────────────────────────────────────────────────────────────────────
// Scoring weights
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_WEIGHT_CALORIES: f64 = 0.4;
pub const DEFAULT_WEIGHT_PROTEIN: f64 = 0.3;
pub const DEFAULT_WEIGHT_CARBS: f64 = 0.15;
pub const DEFAULT_WEIGHT_FAT: f64 = 0.15;

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance (max relative deviation per macro to count as on-target)
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_TOLERANCE_CALORIES: f64 = 0.10;
pub const DEFAULT_TOLERANCE_PROTEIN: f64 = 0.15;
pub const DEFAULT_TOLERANCE_CARBS: f64 = 0.15;
pub const DEFAULT_TOLERANCE_FAT: f64 = 0.15;

// ─────────────────────────────────────────────────────────────────────────────
// Slot partition
// ─────────────────────────────────────────────────────────────────────────────

/// Default share of the daily targets per slot.
pub const DEFAULT_SLOT_PERCENTAGES: [(MealSlot, f64); 4] = [
    (MealSlot::Breakfast, 0.25),
    (MealSlot::Lunch, 0.35),
    (MealSlot::Dinner, 0.30),
    (MealSlot::Snack, 0.10),
];

/// Allowed distance of a slot partition's sum from 1.0.
pub const PERCENTAGE_SUM_TOLERANCE: f64 = 0.01;

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

/// Slack when comparing summed slot scores, absorbs float noise.
pub const SCORE_EPSILON: f64 = 1e-12;

/// Default number of recommendations returned by the CLI.
pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Decimal places used when printing scores.
pub const SCORE_DISPLAY_DECIMALS: usize = 3;
