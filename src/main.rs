//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use fpl_transfer_planner::{
    cache::memo::PlannerCaches,
    cli::{Cli, Commands},
    commands::plan::run,
    config::PlannerConfig,
    source::FplHttpSource,
    Result,
};
use std::time::Duration;

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    let app = Cli::parse();

    match app.command {
        Commands::Plan {
            entry_id,
            gameweeks,
            discount,
            allow_first_week_transfers,
            json,
            verbose,
            solver_timeout_secs,
        } => {
            let mut config = PlannerConfig::new(gameweeks, discount);
            config.allow_first_week_transfers = allow_first_week_transfers;
            config.solver.solver_time_limit = Duration::from_secs(solver_timeout_secs);
            config.validate()?;

            if verbose {
                println!("Planning {gameweeks} gameweek(s) for entry {entry_id}...");
            }

            let source = FplHttpSource::new(config.max_retries, config.retry_base_delay);
            let caches = PlannerCaches::new(&config);
            let plan = run(&source, entry_id, &config, &caches).await?;

            match plan {
                None => {
                    println!("Entry {entry_id} has no active squad to plan around.");
                }
                Some(plan) if json => {
                    println!("{}", serde_json::to_string_pretty(&plan)?);
                }
                Some(plan) => print_report(&plan, verbose),
            }
        }
    }

    Ok(())
}

fn print_report(plan: &fpl_transfer_planner::plan::TransferPlan, verbose: bool) {
    println!("Transfer plan starting gameweek {}", plan.current_gameweek);
    for week in &plan.weekly {
        println!(
            "GW{}: {:.1} xp, {} in / {} out, hit {}, FT used {} / left {}",
            week.gameweek,
            week.expected_points,
            week.transfers_in.len(),
            week.transfers_out.len(),
            week.hit_cost,
            week.free_used,
            week.free_left,
        );
        if verbose {
            for mv in &week.transfers_in {
                println!("  + {} ({})", mv.name, mv.position);
            }
            for mv in &week.transfers_out {
                println!("  - {} ({})", mv.name, mv.position);
            }
        }
    }
    println!(
        "Total expected: {:.1} (baseline {:.1}, improvement {:.1}), total hits: {}",
        plan.total_expected, plan.baseline, plan.improvement, plan.total_hit_cost
    );
}
