//! Set command
//!
//! Usage: propline set <TARGET> --reference <REF> --key <KEY> --value <VALUE> [--after <ANCHOR>] [--versioned]

use clap::Args;
use propline_core::EditOutcome;
use propline_store::WriteRegistry;

use super::{CommandResult, Context, FileArgs};

#[derive(Debug, Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub files: FileArgs,

    /// Key to insert or update
    #[arg(short, long)]
    pub key: String,

    /// New value (must not be empty)
    #[arg(long)]
    pub value: String,

    /// Key of the line to insert after when the key is new
    ///
    /// Defaults to the anchor reported by `missing` for this key.
    #[arg(short, long)]
    pub after: Option<String>,

    /// Back up the current file under the versioning directory first
    #[arg(long)]
    pub versioned: bool,
}

/// Execute set command
pub fn execute(args: SetArgs, ctx: &Context) -> CommandResult {
    let registry = WriteRegistry::new();
    let mut file = args.files.open(&registry, ctx)?;

    let anchor = match args.after {
        Some(anchor) => anchor,
        None => file
            .document()
            .keys_to_translate()
            .into_iter()
            .find(|d| d.key == args.key)
            .map(|d| d.preceding_key)
            .unwrap_or_default(),
    };

    let outcome = file
        .document_mut()
        .insert_or_update(&anchor, &args.key, &args.value);
    let index = match outcome {
        EditOutcome::Rejected => {
            return Err(format!("refusing to set '{}' to an empty value", args.key).into())
        }
        EditOutcome::Updated { index } | EditOutcome::Inserted { index } => index,
    };

    let backup = if args.versioned {
        Some(file.save_with_versioning()?)
    } else {
        file.save()?;
        None
    };

    if ctx.json {
        println!(
            "{}",
            serde_json::json!({
                "key": args.key,
                "line": index + 1,
                "inserted": matches!(outcome, EditOutcome::Inserted { .. }),
                "backup": backup.map(|p| p.display().to_string()),
            })
        );
    } else {
        let verb = match outcome {
            EditOutcome::Inserted { .. } => "Inserted",
            _ => "Updated",
        };
        println!("✓ {} {} at line {}", verb, args.key, index + 1);
        if let Some(backup) = backup {
            println!("  backup: {}", backup.display());
        }
    }
    Ok(())
}
