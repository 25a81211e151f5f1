//! CLI argument definitions and parsing.

pub mod types;

use clap::{Parser, Subcommand};
use types::EntryId;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a multi-gameweek transfer plan for a manager's entry.
    Plan {
        /// The manager's FPL entry ID.
        #[clap(long)]
        entry_id: EntryId,

        /// Number of upcoming gameweeks to plan over (1..=10).
        #[clap(long, short, default_value_t = 5)]
        gameweeks: u8,

        /// Per-gameweek discount factor applied to future expected points (0.5..=1.0).
        #[clap(long, default_value_t = 0.9)]
        discount: f64,

        /// Allow the plan to suggest transfers at the very first horizon step.
        #[clap(long)]
        allow_first_week_transfers: bool,

        /// Output the plan as JSON instead of a formatted report.
        #[clap(long)]
        json: bool,

        /// Print progress and intermediate diagnostics.
        #[clap(long, short)]
        verbose: bool,

        /// Wall-clock budget, in seconds, given to the MIP solver.
        #[clap(long, default_value_t = 60)]
        solver_timeout_secs: u64,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "fpl-planner", about = "FPL multi-gameweek transfer planner")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
