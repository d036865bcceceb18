use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{info, warn};

use meal_plan_engine::catalog::{
    Catalog, Profile, load_catalog, load_profile, save_plan, write_plan_csv,
};
use meal_plan_engine::cli::{Cli, Command, TargetArgs};
use meal_plan_engine::error::{EngineError, Result};
use meal_plan_engine::interface::{
    display_catalog, display_match_results, display_plan, prompt_allergies,
    prompt_dietary_preferences, prompt_macro_targets, prompt_yes_no,
};
use meal_plan_engine::logging::init_logging;
use meal_plan_engine::models::{
    Allergen, DietaryTag, MacroTargets, MealSlot, PlanResult, Tolerance,
};
use meal_plan_engine::planner::{
    MatchRequest, PlanConstraints, allocate_slots, check_partition, generate_daily_plan,
    generate_plan_variants, match_meals,
};

/// Exit code when no plan satisfies the request.
const EXIT_NO_PLAN: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        let code = match e {
            EngineError::NoFeasiblePlan => EXIT_NO_PLAN,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or_default();

    let catalog = Catalog::new(load_catalog(&cli.catalog)?);
    info!(meals = catalog.len(), path = %cli.catalog.display(), "catalog loaded");

    let profile_path = cli.profile.as_deref();

    match command {
        Command::Match {
            targets,
            slot,
            limit,
            json,
        } => cmd_match(&catalog, profile_path, &targets, slot.as_deref(), limit, json),
        Command::Plan {
            targets,
            variants,
            max_price,
            distinct,
            timeout_ms,
            exclude,
            out,
            csv,
            json,
        } => cmd_plan(
            &catalog,
            profile_path,
            &targets,
            PlanArgs {
                variants,
                constraints: PlanConstraints {
                    max_total_price: max_price,
                    distinct_meals: distinct,
                },
                timeout: timeout_ms.map(Duration::from_millis),
                exclude,
                out,
                csv,
                json,
            },
        ),
        Command::Catalog { slot } => cmd_catalog(&catalog, slot.as_deref()),
    }
}

/// Build the effective profile: file, then flags, then prompts.
fn resolve_profile(path: Option<&Path>, args: &TargetArgs) -> Result<Profile> {
    let mut profile = match path {
        Some(path) => load_profile(path)?,
        None => match args.calories {
            Some(calories) => Profile::new(MacroTargets::new(
                calories,
                args.protein.unwrap_or(0.0),
                args.carbs.unwrap_or(0.0),
                args.fat.unwrap_or(0.0),
            )),
            None if args.interactive => Profile::new(prompt_macro_targets()?),
            None => {
                return Err(EngineError::InvalidInput(
                    "no targets given: pass --profile, --calories or --interactive".to_string(),
                ));
            }
        },
    };

    if let Some(v) = args.calories {
        profile.targets.calories = v;
    }
    if let Some(v) = args.protein {
        profile.targets.protein = v;
    }
    if let Some(v) = args.carbs {
        profile.targets.carbs = v;
    }
    if let Some(v) = args.fat {
        profile.targets.fat = v;
    }

    let t = &profile.targets;
    let valid = t.calories > 0.0 && [t.protein, t.carbs, t.fat].iter().all(|v| *v >= 0.0);
    if !valid {
        return Err(EngineError::InvalidInput(format!(
            "targets must have positive calories and non-negative macros (got {:?})",
            t
        )));
    }

    for raw in &args.allergies {
        let allergen: Allergen = raw.parse()?;
        if !profile.allergies.contains(&allergen) {
            profile.allergies.push(allergen);
        }
    }
    for raw in &args.diets {
        let tag: DietaryTag = raw.parse()?;
        if !profile.dietary_preferences.contains(&tag) {
            profile.dietary_preferences.push(tag);
        }
    }

    if args.interactive && path.is_none() {
        if args.allergies.is_empty() {
            profile.allergies = prompt_allergies()?;
        }
        if args.diets.is_empty() {
            profile.dietary_preferences = prompt_dietary_preferences()?;
        }
    }

    if let Err(e) = check_partition(&profile.slot_partition()) {
        warn!("{}; slot targets will not add up to the daily targets", e);
    }

    Ok(profile)
}

fn parse_slot(raw: Option<&str>) -> Result<Option<MealSlot>> {
    raw.map(str::parse).transpose()
}

/// Rank meals against the (slot) targets.
fn cmd_match(
    catalog: &Catalog,
    profile_path: Option<&Path>,
    args: &TargetArgs,
    slot: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let profile = resolve_profile(profile_path, args)?;
    let slot = parse_slot(slot)?;

    let targets = match slot {
        Some(slot) => allocate_slots(&profile.targets, &profile.slot_partition())
            .into_iter()
            .find(|a| a.slot == slot)
            .map(|a| a.targets)
            .ok_or_else(|| {
                EngineError::InvalidInput(format!("slot '{}' is not in the profile's partition", slot))
            })?,
        None => profile.targets,
    };

    let request = MatchRequest {
        constraints: profile.match_constraints(targets),
        category: slot,
        limit: Some(limit),
    };
    let results = match_meals(catalog.meals(), &request);
    info!(results = results.len(), "meals matched");

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        display_match_results(&results, &targets, &Tolerance::default());
    }
    Ok(())
}

struct PlanArgs {
    variants: usize,
    constraints: PlanConstraints,
    timeout: Option<Duration>,
    exclude: Vec<String>,
    out: Option<PathBuf>,
    csv: Option<PathBuf>,
    json: bool,
}

/// Build one or more daily plans.
fn cmd_plan(
    catalog: &Catalog,
    profile_path: Option<&Path>,
    targets: &TargetArgs,
    args: PlanArgs,
) -> Result<()> {
    let profile = resolve_profile(profile_path, targets)?;

    let excluded = args
        .exclude
        .iter()
        .map(|e| catalog.resolve(e).map(|m| m.id.as_str()))
        .collect::<Result<Vec<&str>>>()?;
    let meals = catalog.without(&excluded);

    let mut request = profile.plan_request();
    request.constraints = args.constraints;
    request.deadline = args.timeout.map(|t| Instant::now() + t);

    let plans: Vec<PlanResult> = if args.variants <= 1 {
        generate_daily_plan(&meals, &request).into_iter().collect()
    } else {
        generate_plan_variants(&meals, &request, args.variants)
    };

    if plans.is_empty() {
        return Err(EngineError::NoFeasiblePlan);
    }
    if plans.len() < args.variants {
        warn!(
            requested = args.variants,
            built = plans.len(),
            "catalog ran out of meals for further variants"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        for (i, plan) in plans.iter().enumerate() {
            let title = if plans.len() == 1 {
                "Daily Plan".to_string()
            } else {
                format!("Variant {}", i + 1)
            };
            display_plan(plan, &title);
        }
    }

    if let Some(path) = &args.csv {
        write_plan_csv(path, &plans)?;
        info!(path = %path.display(), "plan CSV written");
    }

    match &args.out {
        Some(path) => {
            save_plan(path, &plans[0])?;
            info!(path = %path.display(), "plan saved");
        }
        None if targets.interactive => {
            if prompt_yes_no("Save this plan to plan.json?", false)? {
                save_plan("plan.json", &plans[0])?;
                println!("Plan saved.");
            }
        }
        None => {}
    }

    Ok(())
}

/// List the active catalog.
fn cmd_catalog(catalog: &Catalog, slot: Option<&str>) -> Result<()> {
    let slots: Vec<MealSlot> = match parse_slot(slot)? {
        Some(slot) => vec![slot],
        None => MealSlot::ALL.to_vec(),
    };

    let meals: Vec<_> = slots
        .iter()
        .flat_map(|&slot| catalog.active_in_slot(slot))
        .collect();

    println!("Loaded {} meals, {} active in listed slots", catalog.len(), meals.len());
    display_catalog(&meals, &slots);
    Ok(())
}
