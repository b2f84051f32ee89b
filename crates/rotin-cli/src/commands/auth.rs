use std::sync::Arc;

use clap::Subcommand;
use rotin_core::{AuthSession, LocalOnlyProvider};

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Show the signed-in user, if any
    Status,
    /// Sign out and clear the local cache
    Logout,
}

pub async fn run(ctx: &Context, action: AuthAction) -> CmdResult {
    let session = AuthSession::new(Arc::new(LocalOnlyProvider), Some(ctx.cache.clone()));

    match action {
        AuthAction::Status => match session.restore().await {
            Some(identity) => print_json(&identity)?,
            None => println!("not signed in"),
        },
        AuthAction::Logout => {
            if session.sign_out().await {
                println!("signed out");
            } else {
                eprintln!("sign-out failed; local data kept");
            }
        }
    }
    Ok(())
}
