use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::help;
use crate::cli::io::Figures;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::utils::build_info::{self, STORAGE_LAYOUT_VERSION};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(CommandGroup::Shell, "version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            CommandGroup::Shell,
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(CommandGroup::Shell, "exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Expense Core {}", meta.version));
    let figures = Figures::new(11);
    figures.show("Storage ver", format!("v{STORAGE_LAYOUT_VERSION}"));
    figures.show("Build hash", format!("{} ({})", meta.git_hash, meta.git_status));
    figures.show("Built at", meta.timestamp);
    figures.show("Target", meta.target);
    figures.show("Profile", meta.profile);
    figures.show("Rustc", meta.rustc);
    figures.show("Data dir", context.app_dir.display());
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
