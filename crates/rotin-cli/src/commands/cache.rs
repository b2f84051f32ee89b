use clap::Subcommand;
use rotin_core::LocalCache;

use super::CmdResult;

#[derive(Subcommand)]
pub enum CacheAction {
    /// Forget cached collections and notes
    Clear,
}

pub fn run(action: CacheAction) -> CmdResult {
    match action {
        CacheAction::Clear => {
            LocalCache::open()?.clear()?;
            println!("cache cleared");
        }
    }
    Ok(())
}
