use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::config::Config;

const USAGE: &str = "config [show|set <key> <value>|backup [note]|backups|restore <name>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Data,
        "config",
        "View and manage preferences",
        USAGE,
        cmd_config,
    )
    .with_subcommands(&["show", "set", "backup", "backups", "restore"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            context.config.set(key, &value)?;
            context.persist_config()?;
            io::print_success(format!("{key} = {}", context.config.get(key)?));
            if matches!(key, "data_dir" | "default_spending_limit") {
                io::print_hint("Takes effect the next time the shell starts.");
            }
            Ok(())
        }
        "backup" => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            io::print_success(format!("Configuration backed up as `{name}`."));
            Ok(())
        }
        "backups" => {
            output_section("Configuration backups");
            let names = context.config_manager.list_backups()?;
            if names.is_empty() {
                io::print_info("No configuration backups yet.");
            }
            for name in names {
                io::print_info(format!("  {name}"));
            }
            Ok(())
        }
        "restore" => {
            let name = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: config restore <name>".into())
            })?;
            context.config = context.config_manager.restore(name)?;
            context.persist_config()?;
            io::print_success(format!("Configuration restored from `{name}`."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for key in Config::KEYS {
        io::print_info(format!("  {:<24} {}", key, context.config.get(key)?));
    }
    io::print_info(format!(
        "  {:<24} {}",
        "(config file)",
        context.config_manager.config_path().display()
    ));
    Ok(())
}
