use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::error::{EngineError, Result};
use crate::models::NutritionalInfo;

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Case-insensitive lookup of `input` in a name table, with a fuzzy
/// suggestion on failure.
fn parse_named<T: Copy>(kind: &'static str, input: &str, table: &[(&'static str, T)]) -> Result<T> {
    let normalized = input.trim().to_lowercase().replace(['-', ' '], "_");

    if let Some((_, value)) = table.iter().find(|(name, _)| *name == normalized) {
        return Ok(*value);
    }

    let suggestion = table
        .iter()
        .map(|(name, _)| (*name, jaro_winkler(name, &normalized)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name.to_string());

    Err(EngineError::UnknownValue {
        kind,
        value: input.to_string(),
        suggestion,
    })
}

/// A meal occasion. Catalog categories use the same vocabulary, so a meal's
/// category is the slot it can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    const NAMES: [(&'static str, MealSlot); 4] = [
        ("breakfast", MealSlot::Breakfast),
        ("lunch", MealSlot::Lunch),
        ("dinner", MealSlot::Dinner),
        ("snack", MealSlot::Snack),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_named("meal slot", s, &Self::NAMES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Dairy,
    Eggs,
    Fish,
    Shellfish,
    TreeNuts,
    Peanuts,
    Wheat,
    Soy,
    Sesame,
}

impl Allergen {
    const NAMES: [(&'static str, Allergen); 9] = [
        ("dairy", Allergen::Dairy),
        ("eggs", Allergen::Eggs),
        ("fish", Allergen::Fish),
        ("shellfish", Allergen::Shellfish),
        ("tree_nuts", Allergen::TreeNuts),
        ("peanuts", Allergen::Peanuts),
        ("wheat", Allergen::Wheat),
        ("soy", Allergen::Soy),
        ("sesame", Allergen::Sesame),
    ];

    /// Every variant, in declaration order.
    pub fn all() -> Vec<Allergen> {
        Self::NAMES.iter().map(|(_, v)| *v).collect()
    }

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, a)| a == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Allergen {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_named("allergen", s, &Self::NAMES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryTag {
    Vegetarian,
    Vegan,
    GlutenFree,
    Keto,
    LowCarb,
    HighProtein,
    DairyFree,
    Halal,
}

impl DietaryTag {
    const NAMES: [(&'static str, DietaryTag); 8] = [
        ("vegetarian", DietaryTag::Vegetarian),
        ("vegan", DietaryTag::Vegan),
        ("gluten_free", DietaryTag::GlutenFree),
        ("keto", DietaryTag::Keto),
        ("low_carb", DietaryTag::LowCarb),
        ("high_protein", DietaryTag::HighProtein),
        ("dairy_free", DietaryTag::DairyFree),
        ("halal", DietaryTag::Halal),
    ];

    /// Every variant, in declaration order.
    pub fn all() -> Vec<DietaryTag> {
        Self::NAMES.iter().map(|(_, v)| *v).collect()
    }

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, t)| t == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for DietaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryTag {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_named("dietary tag", s, &Self::NAMES)
    }
}

fn default_active() -> bool {
    true
}

/// A catalog entry. The engine reads meals and never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: MealSlot,
    pub nutritional_info: NutritionalInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub dietary_tags: Vec<DietaryTag>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Meal {
    /// Minimal active meal with no allergens or tags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: MealSlot,
        nutritional_info: NutritionalInfo,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            category,
            nutritional_info,
            serving_size: None,
            price: 0.0,
            allergens: Vec::new(),
            dietary_tags: Vec::new(),
            active: true,
            image_url: None,
        }
    }

    pub fn contains_any_allergen(&self, allergens: &[Allergen]) -> bool {
        self.allergens.iter().any(|a| allergens.contains(a))
    }

    pub fn has_all_tags(&self, tags: &[DietaryTag]) -> bool {
        tags.iter().all(|t| self.dietary_tags.contains(t))
    }

    /// One-line summary for logs and listings.
    pub fn debug_string(&self) -> String {
        let n = &self.nutritional_info;
        format!(
            "{} [{}]: {} kcal, P:{} C:{} F:{}",
            self.name, self.category, n.calories, n.protein, n.carbs, n.fat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_parse_case_insensitive() {
        assert_eq!("Breakfast".parse::<MealSlot>().unwrap(), MealSlot::Breakfast);
        assert_eq!(" SNACK ".parse::<MealSlot>().unwrap(), MealSlot::Snack);
    }

    #[test]
    fn test_tag_parse_accepts_dash_and_space() {
        assert_eq!("gluten-free".parse::<DietaryTag>().unwrap(), DietaryTag::GlutenFree);
        assert_eq!("high protein".parse::<DietaryTag>().unwrap(), DietaryTag::HighProtein);
    }

    #[test]
    fn test_unknown_value_suggests_closest() {
        let err = "peanut".parse::<Allergen>().unwrap_err();
        match err {
            EngineError::UnknownValue { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("peanuts"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_value_without_suggestion() {
        let err = "zzzz".parse::<MealSlot>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown meal slot 'zzzz'");
    }

    #[test]
    fn test_meal_json_defaults() {
        let json = r#"{
            "id": "m1",
            "name": "Tofu Scramble",
            "category": "breakfast",
            "nutritionalInfo": {"calories": 280, "protein": 20, "carbs": 18, "fat": 12},
            "allergens": ["soy"],
            "dietaryTags": ["vegan", "gluten_free"]
        }"#;
        let meal: Meal = serde_json::from_str(json).unwrap();
        assert!(meal.active);
        assert_eq!(meal.price, 0.0);
        assert!(meal.contains_any_allergen(&[Allergen::Soy, Allergen::Dairy]));
        assert!(meal.has_all_tags(&[DietaryTag::Vegan]));
        assert!(!meal.has_all_tags(&[DietaryTag::Vegan, DietaryTag::Halal]));
    }
}
