//! Generate command
//!
//! Usage: propline generate <REFERENCE> (--output <FILE> | --name <FILE_NAME>)

use clap::Args;
use propline_store::file::sibling_path;
use propline_store::{generate_pseudo_locale, WriteRegistry};
use std::path::PathBuf;

use super::{CommandResult, Context};

#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("destination").required(true).args(["output", "name"])))]
pub struct GenerateArgs {
    /// Reference file to copy keys from
    pub reference: PathBuf,

    /// Path of the file to generate
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File name to generate next to the reference file
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Execute generate command
pub fn execute(args: GenerateArgs, ctx: &Context) -> CommandResult {
    let output = match (args.output, args.name) {
        (Some(output), _) => output,
        (None, Some(name)) => sibling_path(&args.reference, &name),
        (None, None) => return Err("either --output or --name is required".into()),
    };

    let written = generate_pseudo_locale(
        &WriteRegistry::new(),
        &output,
        &args.reference,
        &ctx.config,
    )?;

    if ctx.json {
        println!(
            "{}",
            serde_json::json!({ "output": output.display().to_string(), "keys": written })
        );
    } else {
        println!("✓ Generated {} ({} keys)", output.display(), written);
    }
    Ok(())
}
