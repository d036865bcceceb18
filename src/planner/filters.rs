use crate::models::{Allergen, DietaryTag, Meal, MealSlot};

/// Constraints narrowing a catalog to eligible candidates.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub category: Option<MealSlot>,
    pub exclude_allergens: Vec<Allergen>,
    pub require_dietary_tags: Vec<DietaryTag>,
    /// Meals that must not be offered again (e.g. used by an earlier variant).
    pub exclude_meal_ids: Vec<String>,
}

/// Drop meals listing any of `allergens`. Empty list keeps everything.
pub fn filter_by_allergens<'a>(meals: Vec<&'a Meal>, allergens: &[Allergen]) -> Vec<&'a Meal> {
    if allergens.is_empty() {
        return meals;
    }
    meals
        .into_iter()
        .filter(|m| !m.contains_any_allergen(allergens))
        .collect()
}

/// Keep meals carrying every tag in `tags`.
pub fn filter_by_dietary_tags<'a>(meals: Vec<&'a Meal>, tags: &[DietaryTag]) -> Vec<&'a Meal> {
    if tags.is_empty() {
        return meals;
    }
    meals.into_iter().filter(|m| m.has_all_tags(tags)).collect()
}

pub fn filter_by_category<'a>(meals: Vec<&'a Meal>, category: MealSlot) -> Vec<&'a Meal> {
    meals.into_iter().filter(|m| m.category == category).collect()
}

/// Active meals satisfying every option, in catalog order.
///
/// Never fails; an empty result means no candidate for the request.
pub fn filter_candidates<'a>(meals: &'a [Meal], opts: &FilterOptions) -> Vec<&'a Meal> {
    let mut result: Vec<&Meal> = meals
        .iter()
        .filter(|m| m.active)
        .filter(|m| !opts.exclude_meal_ids.iter().any(|id| *id == m.id))
        .collect();

    if let Some(category) = opts.category {
        result = filter_by_category(result, category);
    }
    result = filter_by_allergens(result, &opts.exclude_allergens);
    filter_by_dietary_tags(result, &opts.require_dietary_tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionalInfo;

    fn meal(id: &str, slot: MealSlot, allergens: &[Allergen], tags: &[DietaryTag]) -> Meal {
        let mut m = Meal::new(id, id, slot, NutritionalInfo::new(400.0, 20.0, 40.0, 10.0));
        m.allergens = allergens.to_vec();
        m.dietary_tags = tags.to_vec();
        m
    }

    fn catalog() -> Vec<Meal> {
        let mut inactive = meal("inactive", MealSlot::Lunch, &[], &[DietaryTag::Vegan]);
        inactive.active = false;
        vec![
            meal("omelette", MealSlot::Breakfast, &[Allergen::Eggs], &[DietaryTag::GlutenFree]),
            meal("tofu", MealSlot::Breakfast, &[Allergen::Soy], &[DietaryTag::Vegan, DietaryTag::GlutenFree]),
            meal("salad", MealSlot::Lunch, &[], &[DietaryTag::Vegan]),
            inactive,
        ]
    }

    fn ids(meals: &[&Meal]) -> Vec<String> {
        meals.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_inactive_meals_dropped() {
        let catalog = catalog();
        let result = filter_candidates(&catalog, &FilterOptions::default());
        assert_eq!(ids(&result), vec!["omelette", "tofu", "salad"]);
    }

    #[test]
    fn test_combined_filters() {
        let catalog = catalog();
        let opts = FilterOptions {
            category: Some(MealSlot::Breakfast),
            exclude_allergens: vec![Allergen::Eggs],
            require_dietary_tags: vec![DietaryTag::GlutenFree],
            ..Default::default()
        };
        assert_eq!(ids(&filter_candidates(&catalog, &opts)), vec!["tofu"]);
    }

    #[test]
    fn test_excluded_ids() {
        let catalog = catalog();
        let opts = FilterOptions {
            exclude_meal_ids: vec!["tofu".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter_candidates(&catalog, &opts)), vec!["omelette", "salad"]);
    }

    #[test]
    fn test_nothing_matches_is_empty() {
        let catalog = catalog();
        let opts = FilterOptions {
            require_dietary_tags: vec![DietaryTag::Keto],
            ..Default::default()
        };
        assert!(filter_candidates(&catalog, &opts).is_empty());
    }
}
