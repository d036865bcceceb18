use rand::Rng;

use crate::models::{
    Allergen, DietaryTag, MacroTargets, Meal, MealSlot, NutritionalInfo, SlotPercentage,
};

const ALLERGEN_RATE: f64 = 0.15;
const TAG_RATE: f64 = 0.3;
const ACTIVE_RATE: f64 = 0.95;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Equal shares over `count` slots, cycling breakfast, lunch, dinner, snack.
///
/// Past four slots the categories repeat, so some slots share a pool.
pub fn bench_partition(count: usize) -> Vec<SlotPercentage> {
    let share = 1.0 / count.max(1) as f64;
    (0..count)
        .map(|i| SlotPercentage::new(MealSlot::ALL[i % MealSlot::ALL.len()], share))
        .collect()
}

/// Plausible daily targets: 1500-3000 kcal with a randomized macro split.
pub fn random_targets(rng: &mut impl Rng) -> MacroTargets {
    let calories: f64 = rng.gen_range(1500.0..=3000.0_f64).round();
    let protein_share: f64 = rng.gen_range(0.20..=0.30);
    let fat_share: f64 = rng.gen_range(0.25..=0.35);
    let carb_share = 1.0 - protein_share - fat_share;

    MacroTargets::new(
        calories,
        round1(calories * protein_share / 4.0),
        round1(calories * carb_share / 4.0),
        round1(calories * fat_share / 9.0),
    )
}

fn jitter(rng: &mut impl Rng, value: f64) -> f64 {
    round1(value * rng.gen_range(0.5..=1.5))
}

/// One meal whose macros land within +-50% of `target`.
pub fn random_meal(rng: &mut impl Rng, id: usize, slot: MealSlot, target: &MacroTargets) -> Meal {
    let nutrition = NutritionalInfo::new(
        jitter(rng, target.calories),
        jitter(rng, target.protein),
        jitter(rng, target.carbs),
        jitter(rng, target.fat),
    );

    let mut meal = Meal::new(
        format!("m{:04}", id),
        format!("{} #{}", slot, id),
        slot,
        nutrition,
    );
    meal.price = (rng.gen_range(2.0..15.0_f64) * 100.0).round() / 100.0;
    meal.allergens = Allergen::all()
        .into_iter()
        .filter(|_| rng.gen_bool(ALLERGEN_RATE))
        .collect();
    meal.dietary_tags = DietaryTag::all()
        .into_iter()
        .filter(|_| rng.gen_bool(TAG_RATE))
        .collect();
    meal.active = rng.gen_bool(ACTIVE_RATE);
    meal
}

/// `meals_per_slot` meals for each distinct category in `partition`.
///
/// Each category's meals are centred on its first slot's share of `daily`.
pub fn random_catalog(
    rng: &mut impl Rng,
    partition: &[SlotPercentage],
    daily: &MacroTargets,
    meals_per_slot: usize,
) -> Vec<Meal> {
    let mut seen: Vec<MealSlot> = Vec::new();
    let mut catalog = Vec::with_capacity(partition.len() * meals_per_slot);

    for share in partition {
        if seen.contains(&share.slot) {
            continue;
        }
        seen.push(share.slot);

        let target = daily.scaled(share.percentage);
        for _ in 0..meals_per_slot {
            let id = catalog.len();
            catalog.push(random_meal(rng, id, share.slot, &target));
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_partition_cycles_categories() {
        let slots: Vec<MealSlot> = bench_partition(6).iter().map(|s| s.slot).collect();
        assert_eq!(
            slots,
            vec![
                MealSlot::Breakfast,
                MealSlot::Lunch,
                MealSlot::Dinner,
                MealSlot::Snack,
                MealSlot::Breakfast,
                MealSlot::Lunch,
            ]
        );
        let total: f64 = bench_partition(6).iter().map(|s| s.percentage).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_catalog_has_unique_ids_per_category() {
        let mut rng = StdRng::seed_from_u64(42);
        let targets = random_targets(&mut rng);
        let catalog = random_catalog(&mut rng, &bench_partition(5), &targets, 7);

        // Five slots span four categories.
        assert_eq!(catalog.len(), 28);
        let mut ids: Vec<&str> = catalog.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 28);
    }

    #[test]
    fn test_targets_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let t = random_targets(&mut rng);
            assert!((1500.0..=3000.0).contains(&t.calories));
            assert!(t.protein > 0.0 && t.carbs > 0.0 && t.fat > 0.0);
        }
    }
}
