pub mod prompts;
pub mod render;

pub use prompts::{prompt_allergies, prompt_dietary_preferences, prompt_macro_targets, prompt_yes_no};
pub use render::{display_catalog, display_match_results, display_plan};
