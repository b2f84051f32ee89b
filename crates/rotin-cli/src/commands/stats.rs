//! Streak and monthly statistics commands for CLI.

use clap::Subcommand;
use rotin_core::day::parse_month;
use serde_json::json;

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Consecutive perfect days ending today (or yesterday)
    Streak,
    /// Monthly totals and calendar grid
    Month {
        /// Month (YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<String>,
    },
}

pub async fn run(ctx: &Context, action: StatsAction) -> CmdResult {
    let routine = ctx.routine().await;

    match action {
        StatsAction::Streak => {
            print_json(&json!({ "currentStreak": routine.current_streak() }))?;
        }
        StatsAction::Month { month } => {
            let reference = match month {
                Some(month) => parse_month(&month)?,
                None => ctx.today(),
            };
            print_json(&routine.monthly(reference))?;
        }
    }
    Ok(())
}
