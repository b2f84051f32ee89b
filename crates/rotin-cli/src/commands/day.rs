use super::{print_json, CmdResult, Context};

/// Week strip, the day's tasks and blocks, its summary and the streak.
pub async fn run(ctx: &Context, day: Option<String>) -> CmdResult {
    let day = ctx.day_or_today(day.as_deref())?;
    let routine = ctx.routine().await;
    routine.select(day);
    print_json(&routine.day_view())
}
