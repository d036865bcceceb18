use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::bench::BenchSummary;
use crate::bench::evaluation::TrialResult;
use crate::error::Result;

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}

/// Write one row per trial to a CSV file.
pub fn write_csv(trials: &[TrialResult], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "trial",
        "catalog_size",
        "combinations",
        "feasible",
        "score",
        "exhaustive_score",
        "verified",
        "mismatch",
        "elapsed_ms",
        "nodes_expanded",
        "completions",
        "pruned",
        "timed_out",
    ])?;

    for t in trials {
        wtr.write_record([
            t.trial.to_string(),
            t.catalog_size.to_string(),
            t.combinations.to_string(),
            t.feasible.to_string(),
            optional(t.score),
            optional(t.exhaustive_score),
            t.verified.to_string(),
            t.mismatch.to_string(),
            format!("{:.3}", t.elapsed_ms),
            t.nodes_expanded.to_string(),
            t.completions.to_string(),
            t.pruned.to_string(),
            t.timed_out.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the run summary as pretty JSON.
pub fn write_summary_json(summary: &BenchSummary, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(summary)?.as_bytes())?;
    Ok(())
}

/// Print the summary and any mismatching trials to stdout.
pub fn print_summary(summary: &BenchSummary, trials: &[TrialResult]) {
    println!("\n=== Benchmark Summary ===\n");
    println!(
        "Trials: {}  feasible: {}  verified: {}  timed out: {}",
        summary.trials, summary.feasible, summary.verified, summary.timed_out
    );
    println!(
        "Elapsed: mean {:.3} ms  max {:.3} ms  nodes/trial {:.1}",
        summary.mean_elapsed_ms, summary.max_elapsed_ms, summary.mean_nodes_expanded
    );

    if summary.mismatches == 0 {
        println!("All verified trials match enumeration.");
        return;
    }

    println!("\n{} mismatching trial(s):", summary.mismatches);
    for t in trials.iter().filter(|t| t.mismatch) {
        println!(
            "  #{}: search={} exhaustive={}",
            t.trial,
            optional(t.score),
            optional(t.exhaustive_score)
        );
    }
}
