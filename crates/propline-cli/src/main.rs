//! propline CLI
//!
//! Command-line interface for checking and editing locale properties files

use clap::{Parser, Subcommand};
use propline_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "propline")]
#[command(about = "propline - Keep locale properties files in line", long_about = None)]
struct Cli {
    /// Logging profile (dev, prod or test); no logging when omitted
    #[arg(long, global = true)]
    log_profile: Option<Profile>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Give up waiting for file access after this many milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List reference keys the target has not translated
    Missing(commands::query::QueryArgs),
    /// List target keys with an empty value
    Empty(commands::query::QueryArgs),
    /// List target keys with no usable value, with reference values
    Bad(commands::query::QueryArgs),
    /// Search keys by name and reference value
    Search(commands::query::SearchArgs),
    /// Insert or update a key
    Set(commands::set::SetArgs),
    /// Generate a pseudo-locale whose values are the keys
    Generate(commands::generate::GenerateArgs),
    /// Print the locale tag of a properties file
    Locale(commands::locale::LocaleArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = cli.log_profile {
        init(profile);
    }

    let ctx = commands::Context {
        json: cli.json,
        config: commands::store_config(cli.timeout_ms),
    };

    let result = match cli.command {
        Commands::Missing(args) => commands::query::execute_missing(args, &ctx),
        Commands::Empty(args) => commands::query::execute_empty(args, &ctx),
        Commands::Bad(args) => commands::query::execute_bad(args, &ctx),
        Commands::Search(args) => commands::query::execute_search(args, &ctx),
        Commands::Set(args) => commands::set::execute(args, &ctx),
        Commands::Generate(args) => commands::generate::execute(args, &ctx),
        Commands::Locale(args) => commands::locale::execute(args, &ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
