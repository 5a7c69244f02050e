//! Read-only queries
//!
//! Usage: propline missing|empty|bad <TARGET> --reference <REF>
//!        propline search <TARGET> --reference <REF> --name <NAME> [--value <VALUE>] [--translate-only]

use clap::Args;
use propline_store::WriteRegistry;

use super::{print_records, CommandResult, Context, FileArgs};

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub files: FileArgs,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub files: FileArgs,

    /// Substring the key must contain (case-sensitive)
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Substring the reference value must contain (case-insensitive)
    #[arg(short, long)]
    pub value: Option<String>,

    /// Only search keys that still need translating
    #[arg(long)]
    pub translate_only: bool,
}

/// Execute missing command
pub fn execute_missing(args: QueryArgs, ctx: &Context) -> CommandResult {
    let file = args.files.open(&WriteRegistry::new(), ctx)?;
    print_records(&file.document().keys_to_translate(), ctx)
}

/// Execute empty command
pub fn execute_empty(args: QueryArgs, ctx: &Context) -> CommandResult {
    let file = args.files.open(&WriteRegistry::new(), ctx)?;
    print_records(&file.document().empty_keys(), ctx)
}

/// Execute bad command
pub fn execute_bad(args: QueryArgs, ctx: &Context) -> CommandResult {
    let file = args.files.open(&WriteRegistry::new(), ctx)?;
    print_records(&file.document().bad_keys(), ctx)
}

/// Execute search command
pub fn execute_search(args: SearchArgs, ctx: &Context) -> CommandResult {
    let file = args.files.open(&WriteRegistry::new(), ctx)?;
    let found = file
        .document()
        .search(&args.name, args.translate_only, args.value.as_deref());
    print_records(&found, ctx)
}
