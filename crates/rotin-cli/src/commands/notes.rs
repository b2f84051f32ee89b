//! Subject notes commands for CLI.

use clap::Subcommand;
use rotin_core::{DayKey, SubjectNotes};
use serde_json::json;

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum NotesAction {
    /// List the subjects of a day (an empty day gets the default subjects)
    List {
        #[arg(long)]
        day: Option<String>,
    },
    /// Add a subject at the top of the list
    Add {
        /// Subject name
        title: String,
        /// Emoji placed before the name
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        day: Option<String>,
    },
    /// Rename a subject
    Rename {
        id: String,
        title: String,
        #[arg(long)]
        day: Option<String>,
    },
    /// Remove a subject and its notes
    Remove {
        id: String,
        #[arg(long)]
        day: Option<String>,
    },
    /// Make a subject the active one
    Select {
        id: String,
        #[arg(long)]
        day: Option<String>,
    },
    /// Replace the notes of a subject
    Write {
        id: String,
        /// New note content
        content: String,
        #[arg(long)]
        day: Option<String>,
    },
}

fn print_day(day: DayKey, notes: &SubjectNotes) -> CmdResult {
    print_json(&json!({
        "day": day,
        "active": notes.active().map(|s| s.id),
        "status": notes.status(),
        "subjects": notes.subjects(),
    }))
}

pub async fn run(ctx: &Context, action: NotesAction) -> CmdResult {
    let notes = ctx.subject_notes();

    match action {
        NotesAction::List { day } => {
            let day = ctx.day_or_today(day.as_deref())?;
            notes.open(day).await;
            print_day(day, &notes)?;
        }
        NotesAction::Add { title, emoji, day } => {
            let day = ctx.day_or_today(day.as_deref())?;
            notes.open(day).await;
            let subject = notes.create(emoji.as_deref(), &title).await?;
            print_json(&subject)?;
        }
        NotesAction::Rename { id, title, day } => {
            let day = ctx.day_or_today(day.as_deref())?;
            notes.open(day).await;
            let subject = notes.rename(&id, &title).await?;
            print_json(&subject)?;
        }
        NotesAction::Remove { id, day } => {
            let day = ctx.day_or_today(day.as_deref())?;
            notes.open(day).await;
            notes.remove(&id).await?;
            print_day(day, &notes)?;
        }
        NotesAction::Select { id, day } => {
            let day = ctx.day_or_today(day.as_deref())?;
            notes.open(day).await;
            notes.select(&id)?;
            print_day(day, &notes)?;
        }
        NotesAction::Write { id, content, day } => {
            let day = ctx.day_or_today(day.as_deref())?;
            notes.open(day).await;
            notes.open_editor(&id)?;
            notes.edit(content)?;
            notes.close_editor().await?;
            print_day(day, &notes)?;
        }
    }
    Ok(())
}
