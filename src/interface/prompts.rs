use dialoguer::{Confirm, Input, MultiSelect};

use crate::error::{EngineError, Result};
use crate::models::{Allergen, DietaryTag, MacroTargets};

fn prompt_grams(prompt: &str, default: f64) -> Result<f64> {
    let value: f64 = Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()?;

    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "{prompt}: expected a non-negative number"
        )));
    }
    Ok(value)
}

/// Prompt for daily macro targets.
pub fn prompt_macro_targets() -> Result<MacroTargets> {
    let calories = prompt_grams("Daily calories (kcal)", 2000.0)?;
    if calories <= 0.0 {
        return Err(EngineError::InvalidInput(
            "Daily calories must be positive".to_string(),
        ));
    }

    let protein = prompt_grams("Daily protein (g)", 150.0)?;
    let carbs = prompt_grams("Daily carbs (g)", 200.0)?;
    let fat = prompt_grams("Daily fat (g)", 67.0)?;

    Ok(MacroTargets::new(calories, protein, carbs, fat))
}

/// Prompt for allergies to exclude.
pub fn prompt_allergies() -> Result<Vec<Allergen>> {
    let all = Allergen::all();
    let names: Vec<&str> = all.iter().map(|a| a.as_str()).collect();

    let picked = MultiSelect::new()
        .with_prompt("Allergies (space to toggle, enter to confirm)")
        .items(&names)
        .interact()?;

    Ok(picked.into_iter().map(|i| all[i]).collect())
}

/// Prompt for required dietary tags.
pub fn prompt_dietary_preferences() -> Result<Vec<DietaryTag>> {
    let all = DietaryTag::all();
    let names: Vec<&str> = all.iter().map(|t| t.as_str()).collect();

    let picked = MultiSelect::new()
        .with_prompt("Dietary preferences (space to toggle, enter to confirm)")
        .items(&names)
        .interact()?;

    Ok(picked.into_iter().map(|i| all[i]).collect())
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
