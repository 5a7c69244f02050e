//! Locale command
//!
//! Usage: propline locale <FILE>

use clap::Args;
use propline_core::locale_tag;
use std::path::PathBuf;

use super::{CommandResult, Context};

#[derive(Debug, Args)]
pub struct LocaleArgs {
    /// Properties file named `<base>_<locale>.<ext>`
    pub file: PathBuf,
}

/// Execute locale command
pub fn execute(args: LocaleArgs, ctx: &Context) -> CommandResult {
    let tag = locale_tag(&args.file)?;
    if ctx.json {
        println!("{}", serde_json::json!({ "locale": tag }));
    } else {
        println!("{}", tag);
    }
    Ok(())
}
