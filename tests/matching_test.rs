#[macro_use]
extern crate assert_float_eq;

use std::collections::HashSet;

use meal_plan_engine::catalog::load_catalog;
use meal_plan_engine::models::{
    Allergen, DietaryTag, MacroTargets, Meal, MealSlot, SlotPercentage, Tolerance,
};
use meal_plan_engine::planner::{
    MatchConstraints, MatchRequest, PlanRequest, generate_daily_plan, generate_plan_variants,
    match_meals,
};

fn fixture() -> Vec<Meal> {
    load_catalog(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/meals.json"))
        .expect("fixture catalog should load")
}

fn daily() -> MacroTargets {
    MacroTargets::new(2000.0, 150.0, 200.0, 67.0)
}

fn ids<'a>(meals: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    meals.into_iter().collect()
}

#[test]
fn test_default_plan_uses_exact_matches() {
    let catalog = fixture();
    let plan = generate_daily_plan(&catalog, &PlanRequest::new(daily())).expect("feasible");

    assert_eq!(
        ids(plan.meal_ids()),
        vec!["bf-omelette", "lunch-chicken", "dinner-steak", "snack-yogurt"]
    );
    assert_float_absolute_eq!(plan.total_score, 1.0, 1e-9);
    assert_float_absolute_eq!(plan.actual_macros.calories, 2000.0, 1e-9);
    assert_eq!(plan.target_macros, daily());
    assert_float_absolute_eq!(plan.total_price(), 38.5, 1e-9);
}

#[test]
fn test_vegan_plan_only_uses_vegan_meals() {
    let catalog = fixture();
    let mut request = PlanRequest::new(daily());
    request.dietary_preferences = vec![DietaryTag::Vegan];

    let plan = generate_daily_plan(&catalog, &request).expect("feasible");
    assert_eq!(
        ids(plan.meal_ids()),
        vec!["bf-tofu", "lunch-lentil", "dinner-curry", "snack-hummus"]
    );
    assert!(plan.items.iter().all(|i| i.meal.has_all_tags(&[DietaryTag::Vegan])));
    assert!(plan.total_score < 1.0);
}

#[test]
fn test_plan_is_none_when_a_slot_empties() {
    let catalog = fixture();
    let mut request = PlanRequest::new(daily());
    request.dietary_preferences = vec![DietaryTag::Vegan];
    request.allergies = vec![Allergen::Soy];

    assert!(generate_daily_plan(&catalog, &request).is_none());
}

#[test]
fn test_single_slot_plan() {
    let catalog = fixture();
    let mut request = PlanRequest::new(MacroTargets::new(700.0, 52.5, 70.0, 23.45));
    request.slots = vec![SlotPercentage::new(MealSlot::Lunch, 1.0)];

    let plan = generate_daily_plan(&catalog, &request).expect("feasible");
    assert_eq!(plan.items.len(), 1);
    assert_eq!(plan.items[0].meal.id, "lunch-chicken");
    assert_float_absolute_eq!(plan.total_score, 1.0, 1e-12);
}

#[test]
fn test_match_excludes_allergens_in_category() {
    let catalog = fixture();
    let mut constraints = MatchConstraints::new(MacroTargets::new(500.0, 37.5, 50.0, 16.75));
    constraints.allergies = vec![Allergen::Dairy];

    let request = MatchRequest {
        constraints,
        category: Some(MealSlot::Breakfast),
        limit: Some(10),
    };
    let results = match_meals(&catalog, &request);
    assert_eq!(ids(results.iter().map(|r| r.meal.id.as_str())), vec!["bf-tofu"]);
}

#[test]
fn test_match_sorts_and_truncates() {
    let catalog = fixture();
    let targets = MacroTargets::new(600.0, 45.0, 60.0, 20.1);
    let request = MatchRequest {
        constraints: MatchConstraints::new(targets),
        category: None,
        limit: Some(3),
    };

    let results = match_meals(&catalog, &request);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].meal.id, "dinner-steak");
    assert!(results[0].within_tolerance(&targets, &Tolerance::default()));
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_match_skips_inactive_meals() {
    let catalog = fixture();
    let request = MatchRequest {
        constraints: MatchConstraints::new(MacroTargets::new(750.0, 25.0, 110.0, 20.0)),
        category: Some(MealSlot::Dinner),
        limit: None,
    };
    let results = match_meals(&catalog, &request);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.meal.id != "dinner-pasta"));
}

#[test]
fn test_empty_catalog() {
    let request = MatchRequest {
        constraints: MatchConstraints::new(daily()),
        category: None,
        limit: Some(5),
    };
    assert!(match_meals(&[], &request).is_empty());
    assert!(generate_daily_plan(&[], &PlanRequest::new(daily())).is_none());
}

#[test]
fn test_variants_share_no_meals() {
    let catalog = fixture();
    let variants = generate_plan_variants(&catalog, &PlanRequest::new(daily()), 4);

    // Dinner has only two active meals.
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0], generate_daily_plan(&catalog, &PlanRequest::new(daily())).unwrap());

    let first: HashSet<&str> = variants[0].meal_ids().collect();
    assert!(variants[1].meal_ids().all(|id| !first.contains(id)));
}
