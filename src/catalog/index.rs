use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::catalog::persistence::dedup_by_id;
use crate::error::{EngineError, Result};
use crate::models::{Meal, MealSlot};

/// Minimum name similarity for a fuzzy suggestion.
const NAME_MATCH_THRESHOLD: f64 = 0.7;

/// In-memory catalog with id and name lookups. Preserves catalog order.
pub struct Catalog {
    meals: Vec<Meal>,
    /// Meal index keyed by id.
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(meals: Vec<Meal>) -> Self {
        let meals = dedup_by_id(meals);
        let by_id = meals
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        Self { meals, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Meal> {
        self.by_id.get(id).map(|&i| &self.meals[i])
    }

    /// Case-insensitive exact name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Meal> {
        let needle = name.trim().to_lowercase();
        self.meals.iter().find(|m| m.name.to_lowercase() == needle)
    }

    /// Meals whose names resemble `name`, most similar first.
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<&Meal> {
        let needle = name.trim().to_lowercase();
        let mut scored: Vec<(&Meal, f64)> = self
            .meals
            .iter()
            .map(|m| (m, jaro_winkler(&m.name.to_lowercase(), &needle)))
            .filter(|(_, score)| *score > NAME_MATCH_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().take(limit).map(|(m, _)| m).collect()
    }

    /// Resolve a meal by id, then by name, failing with the closest name.
    pub fn resolve(&self, id_or_name: &str) -> Result<&Meal> {
        if let Some(meal) = self.get(id_or_name).or_else(|| self.find_by_name(id_or_name)) {
            return Ok(meal);
        }

        let hint = self
            .suggest(id_or_name, 1)
            .first()
            .map(|m| format!(" (did you mean '{}'?)", m.name))
            .unwrap_or_default();
        Err(EngineError::MealNotFound(format!("{id_or_name}{hint}")))
    }

    /// Catalog without the given ids, order preserved.
    pub fn without(&self, ids: &[&str]) -> Vec<Meal> {
        self.meals
            .iter()
            .filter(|m| !ids.contains(&m.id.as_str()))
            .cloned()
            .collect()
    }

    /// Active meals of one slot.
    pub fn active_in_slot(&self, slot: MealSlot) -> Vec<&Meal> {
        self.meals
            .iter()
            .filter(|m| m.active && m.category == slot)
            .collect()
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}
