use std::fs;
use std::path::PathBuf;

use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};

use super::{required, split_subcommand};

const SNAPSHOT_USAGE: &str = "snapshot <create [note]|list|restore <name>>";
const EXPORT_DIR: &str = "exports";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Data,
            "export",
            "Write income, expenses, limit, and summaries to a JSON file",
            "export [path]",
            cmd_export,
        ),
        CommandEntry::new(
            CommandGroup::Data,
            "import",
            "Replace income, expenses, limit, and summaries from a JSON file",
            "import <path>",
            cmd_import,
        ),
        CommandEntry::new(CommandGroup::Data, "clear", "Delete all stored data", "clear", cmd_clear),
        CommandEntry::new(
            CommandGroup::Data,
            "snapshot",
            "Create, list, or restore whole-store snapshots",
            SNAPSHOT_USAGE,
            cmd_snapshot,
        )
        .with_subcommands(&["create", "list", "restore"]),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(raw) => PathBuf::from(raw),
        None => {
            let dir = context.app_dir.join(EXPORT_DIR);
            fs::create_dir_all(&dir)?;
            dir.join(format!(
                "expense-tracker-backup-{}.json",
                context.tracker.clock().today().format("%Y-%m-%d")
            ))
        }
    };
    let json = context.tracker.export_json()?;
    fs::write(&path, json)?;
    io::print_success(format!("Data exported to {}.", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = PathBuf::from(required(args, 0, "path")?);
    let raw = fs::read_to_string(&path)?;
    let snapshot = take_snapshot(context, "pre-import")?;
    context.tracker.import_json(&raw)?;
    io::print_success(format!(
        "Imported {} expenses from {}.",
        context.tracker.expenses().len(),
        path.display()
    ));
    io::print_hint(format!("Previous data saved as snapshot `{snapshot}`."));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Are you sure you want to clear all data? This cannot be undone.")? {
        io::print_info("Clear cancelled.");
        return Ok(());
    }
    let snapshot = take_snapshot(context, "pre-clear")?;
    context.tracker.clear_all()?;
    io::print_success("All data cleared.");
    io::print_hint(format!("Previous data saved as snapshot `{snapshot}`."));
    Ok(())
}

fn cmd_snapshot(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, SNAPSHOT_USAGE)?;
    match sub.as_str() {
        "create" => {
            let note = (!rest.is_empty()).then(|| rest.join(" "));
            let name = context
                .tracker
                .store()
                .snapshot(note.as_deref(), context.tracker.now())?;
            io::print_success(format!("Snapshot `{name}` created."));
            Ok(())
        }
        "list" => {
            output_section("Snapshots");
            let names = context.tracker.store().list_snapshots()?;
            if names.is_empty() {
                io::print_info("No snapshots yet.");
            }
            for name in names {
                io::print_info(format!("  {name}"));
            }
            Ok(())
        }
        "restore" => {
            let name = required(rest, 0, "name")?;
            if !context.confirm(&format!("Replace all data with snapshot `{name}`?"))? {
                io::print_info("Restore cancelled.");
                return Ok(());
            }
            context.tracker.store().restore_snapshot(name)?;
            context.tracker.reload()?;
            for warning in context.tracker.load_warnings() {
                io::print_warning(warning);
            }
            io::print_success(format!("Snapshot `{name}` restored."));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown snapshot subcommand `{other}`"
        ))),
    }
}

fn take_snapshot(context: &ShellContext, note: &str) -> Result<String, CommandError> {
    let name = context
        .tracker
        .store()
        .snapshot(Some(note), context.tracker.now())?;
    Ok(name)
}
