use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Allergen, DietaryTag, Meal, MealSlot, NutritionalInfo, PlanResult};

fn default_active() -> bool {
    true
}

/// Flat CSV shape of a catalog row. List columns are `;`-separated.
#[derive(Debug, Deserialize)]
struct MealRow {
    id: String,
    name: String,
    category: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    allergens: String,
    #[serde(default)]
    dietary_tags: String,
    #[serde(default = "default_active")]
    active: bool,
}

fn parse_list<T: std::str::FromStr<Err = crate::EngineError>>(raw: &str) -> Result<Vec<T>> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

impl MealRow {
    fn into_meal(self) -> Result<Meal> {
        let category: MealSlot = self.category.parse()?;
        let allergens: Vec<Allergen> = parse_list(&self.allergens)?;
        let dietary_tags: Vec<DietaryTag> = parse_list(&self.dietary_tags)?;

        let mut meal = Meal::new(
            self.id,
            self.name,
            category,
            NutritionalInfo::new(self.calories, self.protein, self.carbs, self.fat),
        );
        meal.price = self.price;
        meal.allergens = allergens;
        meal.dietary_tags = dietary_tags;
        meal.active = self.active;
        Ok(meal)
    }
}

/// Deduplicate by id: the last occurrence wins but keeps the first position.
pub fn dedup_by_id(meals: Vec<Meal>) -> Vec<Meal> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Meal> = Vec::with_capacity(meals.len());

    for meal in meals {
        match positions.get(&meal.id) {
            Some(&i) => out[i] = meal,
            None => {
                positions.insert(meal.id.clone(), out.len());
                out.push(meal);
            }
        }
    }
    out
}

/// Load a meal catalog from a `.csv` file, or JSON for any other extension.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Meal>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let meals = if is_csv {
        let mut rdr = csv::Reader::from_path(path)?;
        let mut meals = Vec::new();
        for row in rdr.deserialize::<MealRow>() {
            meals.push(row?.into_meal()?);
        }
        meals
    } else {
        let content = fs::read_to_string(path)?;
        serde_json::from_str::<Vec<Meal>>(&content)?
    };

    Ok(dedup_by_id(meals))
}

/// Save a plan as pretty JSON.
pub fn save_plan<P: AsRef<Path>>(path: P, plan: &PlanResult) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    variant: usize,
    slot: MealSlot,
    meal_id: &'a str,
    meal_name: &'a str,
    score: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    price: f64,
}

/// Write one CSV row per plan item, numbering plans from 1.
pub fn write_plan_csv<P: AsRef<Path>>(path: P, plans: &[PlanResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for (i, plan) in plans.iter().enumerate() {
        for item in &plan.items {
            let n = &item.meal.nutritional_info;
            wtr.serialize(PlanRow {
                variant: i + 1,
                slot: item.slot,
                meal_id: &item.meal.id,
                meal_name: &item.meal.name,
                score: format!("{:.4}", item.score),
                calories: n.calories,
                protein: n.protein,
                carbs: n.carbs,
                fat: n.fat,
                price: item.meal.price,
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}
