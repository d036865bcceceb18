use crate::models::{MacroTargets, Meal, MealSlot, NutritionalInfo, PlanResult, ScoredMeal, Tolerance};
use crate::planner::constants::SCORE_DISPLAY_DECIMALS;

fn macros_line(n: &NutritionalInfo) -> String {
    format!(
        "{:>4.0} kcal  P:{:>5.1}  C:{:>5.1}  F:{:>5.1}",
        n.calories, n.protein, n.carbs, n.fat
    )
}

fn targets_line(t: &MacroTargets) -> String {
    macros_line(&NutritionalInfo::from(*t))
}

/// Display ranked recommendations.
pub fn display_match_results(results: &[ScoredMeal], targets: &MacroTargets, tolerance: &Tolerance) {
    if results.is_empty() {
        println!("No meals match the given constraints.");
        return;
    }

    println!();
    println!("=== Recommendations ===");
    println!("Target: {}", targets_line(targets));
    println!();

    let max_name_len = results.iter().map(|r| r.meal.name.len()).max().unwrap_or(10);

    for (i, scored) in results.iter().enumerate() {
        let mark = if scored.within_tolerance(targets, tolerance) {
            "  [on target]"
        } else {
            ""
        };
        println!(
            "{:>3}. {:<width$} - {} | score {:.prec$} (Δ {:.0} kcal){}",
            i + 1,
            scored.meal.name,
            macros_line(&scored.meal.nutritional_info),
            scored.score,
            scored.deviation.calories,
            mark,
            width = max_name_len,
            prec = SCORE_DISPLAY_DECIMALS
        );
    }
    println!();
}

/// Display a daily plan, one line per slot, followed by totals.
pub fn display_plan(plan: &PlanResult, title: &str) {
    println!();
    println!("=== {} ===", title);
    println!();

    let max_name_len = plan.items.iter().map(|i| i.meal.name.len()).max().unwrap_or(10);

    for item in &plan.items {
        println!(
            "{:<9} {:<width$} - {} | score {:.prec$}",
            item.slot.as_str(),
            item.meal.name,
            macros_line(&item.meal.nutritional_info),
            item.score,
            width = max_name_len,
            prec = SCORE_DISPLAY_DECIMALS
        );
    }

    println!();
    println!("--- Summary ---");
    println!("Actual: {}", macros_line(&plan.actual_macros));
    println!("Target: {}", targets_line(&plan.target_macros));
    println!("Total score: {:.prec$}", plan.total_score, prec = SCORE_DISPLAY_DECIMALS);
    if plan.total_price() > 0.0 {
        println!("Total price: {:.2}", plan.total_price());
    }
    println!();
}

/// Display the active meals of a catalog grouped by slot.
pub fn display_catalog(meals: &[&Meal], slots: &[MealSlot]) {
    if meals.is_empty() {
        println!("Catalog: (none)");
        return;
    }

    for slot in slots {
        let in_slot: Vec<&&Meal> = meals.iter().filter(|m| m.category == *slot).collect();
        println!();
        println!("=== {} ({} meals) ===", slot, in_slot.len());
        for meal in in_slot {
            let allergens: Vec<&str> = meal.allergens.iter().map(|a| a.as_str()).collect();
            let tags: Vec<&str> = meal.dietary_tags.iter().map(|t| t.as_str()).collect();
            println!(
                "  {:<12} {} - {}  allergens: [{}] tags: [{}]",
                meal.id,
                meal.name,
                macros_line(&meal.nutritional_info),
                allergens.join(", "),
                tags.join(", ")
            );
        }
    }
    println!();
}
