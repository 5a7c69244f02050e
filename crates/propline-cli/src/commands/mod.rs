//! Subcommand implementations

use clap::Args;
use propline_core::DifferenceRecord;
use propline_store::{PropertiesFile, StoreConfig, WriteRegistry};
use std::path::PathBuf;

pub mod generate;
pub mod locale;
pub mod query;
pub mod set;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Options shared by every subcommand
#[derive(Debug)]
pub struct Context {
    pub json: bool,
    pub config: StoreConfig,
}

pub fn store_config(timeout_ms: Option<u64>) -> StoreConfig {
    StoreConfig {
        wait_timeout_ms: timeout_ms,
        ..StoreConfig::default()
    }
}

/// A target file and the reference file it follows
#[derive(Debug, Args)]
pub struct FileArgs {
    /// Properties file to check or edit
    pub target: PathBuf,

    /// Reference (default locale) file giving the layout
    #[arg(short, long)]
    pub reference: PathBuf,
}

impl FileArgs {
    pub fn open(
        &self,
        registry: &WriteRegistry,
        ctx: &Context,
    ) -> Result<PropertiesFile, Box<dyn std::error::Error>> {
        Ok(PropertiesFile::open_with_config(
            registry,
            &self.target,
            &self.reference,
            ctx.config.clone(),
        )?)
    }
}

/// Print records one per line, or as a JSON array
pub fn print_records(records: &[DifferenceRecord], ctx: &Context) -> CommandResult {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        for record in records {
            println!("{}", record);
        }
    }
    Ok(())
}
