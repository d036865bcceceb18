use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Daily or per-slot macro-nutrient targets.
///
/// Calories are in kcal, the other three in grams.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroTargets {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Every macro multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

impl Add for MacroTargets {
    type Output = MacroTargets;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

/// Actual macro content of a meal.
///
/// `fiber` and `sugar` are carried through for display only; scoring looks
/// at the four macros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
}

impl NutritionalInfo {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
            fiber: None,
            sugar: None,
        }
    }

    /// The four scored macros as a target-shaped vector.
    pub fn macros(&self) -> MacroTargets {
        MacroTargets::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

impl From<MacroTargets> for NutritionalInfo {
    fn from(t: MacroTargets) -> Self {
        Self::new(t.calories, t.protein, t.carbs, t.fat)
    }
}

impl Add for NutritionalInfo {
    type Output = NutritionalInfo;

    /// Optional fields sum when either side has them.
    fn add(self, rhs: Self) -> Self::Output {
        fn add_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
            match (a, b) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
            }
        }

        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
            fiber: add_opt(self.fiber, rhs.fiber),
            sugar: add_opt(self.sugar, rhs.sugar),
        }
    }
}

/// Absolute per-macro difference between actual and target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroDeviation {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Relative importance of each macro in the fit score.
///
/// Weights do not need to sum to 1; the score normalizes by their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.calories + self.protein + self.carbs + self.fat
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        use crate::planner::constants::*;
        Self {
            calories: DEFAULT_WEIGHT_CALORIES,
            protein: DEFAULT_WEIGHT_PROTEIN,
            carbs: DEFAULT_WEIGHT_CARBS,
            fat: DEFAULT_WEIGHT_FAT,
        }
    }
}

/// Maximum relative deviation per macro for a meal to count as "on target".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        use crate::planner::constants::*;
        Self {
            calories: DEFAULT_TOLERANCE_CALORIES,
            protein: DEFAULT_TOLERANCE_PROTEIN,
            carbs: DEFAULT_TOLERANCE_CARBS,
            fat: DEFAULT_TOLERANCE_FAT,
        }
    }
}
