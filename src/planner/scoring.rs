use crate::models::{MacroDeviation, MacroTargets, NutritionalInfo, ScoringWeights, Tolerance};

/// Absolute per-macro deviation of `actual` from `target`.
pub fn calculate_deviation(actual: &NutritionalInfo, target: &MacroTargets) -> MacroDeviation {
    MacroDeviation {
        calories: (actual.calories - target.calories).abs(),
        protein: (actual.protein - target.protein).abs(),
        carbs: (actual.carbs - target.carbs).abs(),
        fat: (actual.fat - target.fat).abs(),
    }
}

/// Score of a single macro in [0, 1].
///
/// A zero target only accepts a zero actual; otherwise the relative deviation
/// is subtracted from 1 and clamped.
#[inline]
pub fn macro_score(actual: f64, target: f64) -> f64 {
    if target == 0.0 {
        return if actual == 0.0 { 1.0 } else { 0.0 };
    }
    let relative = (actual - target).abs() / target;
    (1.0 - relative).clamp(0.0, 1.0)
}

/// Weighted fit of `actual` against `target` in [0, 1], 1 being an exact match.
///
/// Weights are normalized by their sum. All-zero weights fall back to the
/// unweighted mean.
pub fn calculate_score(
    actual: &NutritionalInfo,
    target: &MacroTargets,
    weights: &ScoringWeights,
) -> f64 {
    let calories = macro_score(actual.calories, target.calories);
    let protein = macro_score(actual.protein, target.protein);
    let carbs = macro_score(actual.carbs, target.carbs);
    let fat = macro_score(actual.fat, target.fat);

    let total_weight = weights.total();
    if total_weight == 0.0 {
        return (calories + protein + carbs + fat) / 4.0;
    }

    (calories * weights.calories
        + protein * weights.protein
        + carbs * weights.carbs
        + fat * weights.fat)
        / total_weight
}

/// Whether every macro's relative deviation is within `tolerance`.
pub fn within_tolerance(
    actual: &NutritionalInfo,
    target: &MacroTargets,
    tolerance: &Tolerance,
) -> bool {
    fn ok(actual: f64, target: f64, limit: f64) -> bool {
        if target == 0.0 {
            return actual == 0.0;
        }
        (actual - target).abs() / target <= limit
    }

    ok(actual.calories, target.calories, tolerance.calories)
        && ok(actual.protein, target.protein, tolerance.protein)
        && ok(actual.carbs, target.carbs, tolerance.carbs)
        && ok(actual.fat, target.fat, tolerance.fat)
}
