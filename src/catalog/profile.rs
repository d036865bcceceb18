use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Allergen, DietaryTag, MacroTargets, ScoringWeights, SlotPercentage};
use crate::planner::{MatchConstraints, PlanRequest};

/// A user's planning profile as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub targets: MacroTargets,
    #[serde(default)]
    pub allergies: Vec<Allergen>,
    #[serde(default)]
    pub dietary_preferences: Vec<DietaryTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<SlotPercentage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<ScoringWeights>,
}

impl Profile {
    pub fn new(targets: MacroTargets) -> Self {
        Self {
            targets,
            allergies: Vec::new(),
            dietary_preferences: Vec::new(),
            slots: None,
            weights: None,
        }
    }

    /// Slot partition, falling back to the default one.
    pub fn slot_partition(&self) -> Vec<SlotPercentage> {
        self.slots
            .clone()
            .unwrap_or_else(SlotPercentage::default_partition)
    }

    pub fn match_constraints(&self, targets: MacroTargets) -> MatchConstraints {
        MatchConstraints {
            targets,
            allergies: self.allergies.clone(),
            dietary_preferences: self.dietary_preferences.clone(),
            weights: self.weights,
        }
    }

    pub fn plan_request(&self) -> PlanRequest {
        PlanRequest {
            slots: self.slot_partition(),
            allergies: self.allergies.clone(),
            dietary_preferences: self.dietary_preferences.clone(),
            weights: self.weights,
            ..PlanRequest::new(self.targets)
        }
    }
}

pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Profile> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_profile<P: AsRef<Path>>(path: P, profile: &Profile) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(profile)?)?;
    Ok(())
}
