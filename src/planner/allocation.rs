use crate::error::{EngineError, Result};
use crate::models::{MacroTargets, SlotAllocation, SlotPercentage};
use crate::planner::constants::PERCENTAGE_SUM_TOLERANCE;

/// Split daily targets into per-slot sub-targets.
///
/// Purely multiplicative: each slot gets `daily * percentage` on every macro.
/// Percentages are not required to sum to 1; see [`check_partition`].
pub fn allocate_slots(daily: &MacroTargets, percentages: &[SlotPercentage]) -> Vec<SlotAllocation> {
    percentages
        .iter()
        .map(|p| SlotAllocation {
            slot: p.slot,
            percentage: p.percentage,
            targets: daily.scaled(p.percentage),
        })
        .collect()
}

/// Per-macro sum of the allocations' targets.
pub fn sum_allocations(allocations: &[SlotAllocation]) -> MacroTargets {
    allocations
        .iter()
        .fold(MacroTargets::default(), |acc, a| acc + a.targets)
}

/// Check that a partition sums to 1.0 within [`PERCENTAGE_SUM_TOLERANCE`].
pub fn check_partition(percentages: &[SlotPercentage]) -> Result<()> {
    let total: f64 = percentages.iter().map(|p| p.percentage).sum();
    if (total - 1.0).abs() > PERCENTAGE_SUM_TOLERANCE {
        return Err(EngineError::PercentageSum(total));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealSlot;

    #[test]
    fn test_default_partition_reconstructs_daily() {
        let daily = MacroTargets::new(2000.0, 150.0, 200.0, 67.0);
        let allocations = allocate_slots(&daily, &SlotPercentage::default_partition());

        assert_eq!(allocations.len(), 4);
        let total = sum_allocations(&allocations);
        assert!((total.calories - 2000.0).abs() < 1e-9);
        assert!((total.fat - 67.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_partition_is_not_rescaled() {
        let daily = MacroTargets::new(2000.0, 150.0, 200.0, 67.0);
        let allocations = allocate_slots(&daily, &[SlotPercentage::new(MealSlot::Dinner, 0.5)]);
        assert_eq!(allocations[0].targets.calories, 1000.0);
    }

    #[test]
    fn test_check_partition() {
        assert!(check_partition(&SlotPercentage::default_partition()).is_ok());

        let short = [
            SlotPercentage::new(MealSlot::Breakfast, 0.4),
            SlotPercentage::new(MealSlot::Lunch, 0.4),
        ];
        match check_partition(&short) {
            Err(EngineError::PercentageSum(total)) => assert!((total - 0.8).abs() < 1e-12),
            other => panic!("expected PercentageSum, got {other:?}"),
        }
    }
}
