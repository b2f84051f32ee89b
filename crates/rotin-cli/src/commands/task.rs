//! Task management commands for CLI.

use clap::Subcommand;
use rotin_core::{TaskDraft, TaskPatch};

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a day
    Add {
        /// Task title
        title: String,
        /// Time of day (HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// Day (YYYY-MM-DD, default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// List the tasks shown for a day, dayless ones included
    List {
        /// Day (YYYY-MM-DD, default: today)
        #[arg(long)]
        day: Option<String>,
        /// List every task regardless of day
        #[arg(long)]
        all: bool,
    },
    /// Flip a task between done and not done
    Toggle {
        /// Task ID
        id: String,
    },
    /// Edit a task; omitted or blank fields are kept
    Edit {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        time: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub async fn run(ctx: &Context, action: TaskAction) -> CmdResult {
    let routine = ctx.routine().await;
    let tasks = &routine.tasks;

    match action {
        TaskAction::Add { title, time, day } => {
            let day = ctx.day_or_today(day.as_deref())?;
            let mut draft = TaskDraft::new(title);
            if let Some(time) = time {
                draft = draft.at(time);
            }
            let task = tasks.create(draft, day).await?;
            print_json(&task)?;
        }
        TaskAction::List { day, all } => {
            if all {
                print_json(&tasks.all())?;
            } else {
                let day = ctx.day_or_today(day.as_deref())?;
                print_json(&tasks.visible(&day))?;
            }
        }
        TaskAction::Toggle { id } => {
            let task = tasks.toggle(&id).await?;
            print_json(&task)?;
        }
        TaskAction::Edit { id, title, time } => {
            let task = tasks.edit(&id, &TaskPatch { title, time }).await?;
            print_json(&task)?;
        }
        TaskAction::Delete { id } => {
            tasks.delete(&id).await?;
        }
    }
    Ok(())
}
