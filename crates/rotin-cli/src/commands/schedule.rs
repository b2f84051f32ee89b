//! Schedule block commands for CLI.

use clap::Subcommand;
use rotin_core::{Category, ScheduleDraft, SchedulePatch};

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Add a block to a day
    Add {
        /// Block title
        title: String,
        /// Start time (HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// Duration label, e.g. "45min" or "2h" (default: 30min)
        #[arg(long)]
        duration: Option<String>,
        /// work, personal, health or learning
        #[arg(long, default_value = "work")]
        category: String,
        /// Day (YYYY-MM-DD, default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// List the blocks shown for a day, dayless ones included
    List {
        /// Day (YYYY-MM-DD, default: today)
        #[arg(long)]
        day: Option<String>,
        /// List every block regardless of day
        #[arg(long)]
        all: bool,
    },
    /// Flip a block between done and not done
    Toggle {
        /// Block ID
        id: String,
    },
    /// Edit a block; omitted or blank fields are kept
    Edit {
        /// Block ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a block
    Delete {
        /// Block ID
        id: String,
    },
}

pub async fn run(ctx: &Context, action: ScheduleAction) -> CmdResult {
    let routine = ctx.routine().await;
    let schedule = &routine.schedule;

    match action {
        ScheduleAction::Add {
            title,
            time,
            duration,
            category,
            day,
        } => {
            let day = ctx.day_or_today(day.as_deref())?;
            let draft = ScheduleDraft {
                title,
                time,
                duration,
                category: category.parse::<Category>()?,
            };
            let item = schedule.create(draft, day).await?;
            print_json(&item)?;
        }
        ScheduleAction::List { day, all } => {
            if all {
                print_json(&schedule.all())?;
            } else {
                let day = ctx.day_or_today(day.as_deref())?;
                print_json(&schedule.visible(&day))?;
            }
        }
        ScheduleAction::Toggle { id } => {
            let item = schedule.toggle(&id).await?;
            print_json(&item)?;
        }
        ScheduleAction::Edit {
            id,
            title,
            time,
            duration,
            category,
        } => {
            let patch = SchedulePatch {
                title,
                time,
                duration,
                category: category.map(|c| c.parse::<Category>()).transpose()?,
            };
            let item = schedule.edit(&id, &patch).await?;
            print_json(&item)?;
        }
        ScheduleAction::Delete { id } => {
            schedule.delete(&id).await?;
        }
    }
    Ok(())
}
