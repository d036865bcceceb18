use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::planner::constants::DEFAULT_MATCH_LIMIT;

/// Meal plan engine: ranked meal matching and optimal daily plans.
#[derive(Parser, Debug)]
#[command(name = "meal-plan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the meal catalog (.json or .csv).
    #[arg(short, long, global = true, default_value = "meals.json")]
    pub catalog: PathBuf,

    /// Path to a profile JSON file with targets and restrictions.
    #[arg(short, long, global = true)]
    pub profile: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// Overrides applied on top of the profile.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Daily calories (kcal).
    #[arg(long)]
    pub calories: Option<f64>,

    /// Daily protein (g).
    #[arg(long)]
    pub protein: Option<f64>,

    /// Daily carbs (g).
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Daily fat (g).
    #[arg(long)]
    pub fat: Option<f64>,

    /// Allergen to exclude (repeatable).
    #[arg(long = "allergy")]
    pub allergies: Vec<String>,

    /// Dietary tag every meal must carry (repeatable).
    #[arg(long = "diet")]
    pub diets: Vec<String>,

    /// Prompt for anything missing from the profile.
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank meals against a target. With --slot, the target is the slot's
    /// share of the daily targets.
    Match {
        #[command(flatten)]
        targets: TargetArgs,

        /// Only consider meals of this slot.
        #[arg(long)]
        slot: Option<String>,

        /// Maximum number of results.
        #[arg(long, default_value_t = DEFAULT_MATCH_LIMIT)]
        limit: usize,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Build an optimal one-meal-per-slot daily plan.
    Plan {
        #[command(flatten)]
        targets: TargetArgs,

        /// Number of alternative plans, each avoiding earlier meals.
        #[arg(long, default_value_t = 1)]
        variants: usize,

        /// Ceiling on the summed price of the chosen meals.
        #[arg(long)]
        max_price: Option<f64>,

        /// Never use the same meal in two slots.
        #[arg(long)]
        distinct: bool,

        /// Give up after this many milliseconds and keep the best plan so far.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Meal id or name to leave out (repeatable).
        #[arg(long)]
        exclude: Vec<String>,

        /// Write the first plan as JSON to this path.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write every plan item as a CSV row to this path.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print plans as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List active meals by slot.
    Catalog {
        /// Only list this slot.
        #[arg(long)]
        slot: Option<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Catalog { slot: None }
    }
}
