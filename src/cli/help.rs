use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::domain::ExpenseCategory;

const NAME_WIDTH: usize = 10;

/// Lists every command under the tracker area it belongs to.
pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for (group, entries) in registry.by_group() {
        io::print_info(format!("{}:", group.title()));
        for entry in entries {
            io::print_info(overview_line(entry));
        }
    }
    io::print_hint("Use `help <command>` for usage and subcommands.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    for line in detail_lines(entry) {
        io::print_info(line);
    }
}

fn overview_line(entry: &CommandEntry) -> String {
    format!("  {:<width$} {}", entry.name, entry.description, width = NAME_WIDTH)
}

fn detail_lines(entry: &CommandEntry) -> Vec<String> {
    let mut lines = vec![
        format!("  {} ({})", entry.description, entry.group.title()),
        format!("  Usage: {}", entry.usage),
    ];
    if !entry.subcommands.is_empty() {
        lines.push(format!("  Subcommands: {}", entry.subcommands.join(", ")));
    }
    if entry.category_args {
        let labels: Vec<String> = ExpenseCategory::ALL
            .iter()
            .map(|category| category.label().to_ascii_lowercase())
            .collect();
        lines.push(format!("  Categories: {}", labels.join(", ")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::register_all;

    #[test]
    fn expense_help_lists_subcommands_and_categories() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let lines = detail_lines(registry.get("expense").expect("expense command"));
        assert!(lines.iter().any(|line| line == "  Subcommands: add, edit, delete, list"));
        assert!(lines
            .iter()
            .any(|line| line.starts_with("  Categories: food, travel")));
    }

    #[test]
    fn plain_commands_show_usage_only() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let lines = detail_lines(registry.get("balance").expect("balance command"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "  Usage: balance");
    }
}
