use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown {kind} '{value}'{}", .suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
    UnknownValue {
        kind: &'static str,
        value: String,
        suggestion: Option<String>,
    },

    #[error("Slot percentages must sum to 1.0 (got {0:.4})")]
    PercentageSum(f64),

    #[error("No feasible plan for the requested slots")]
    NoFeasiblePlan,
}

pub type Result<T> = std::result::Result<T, EngineError>;
