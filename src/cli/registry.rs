//! Command table for the shell. Entries carry enough metadata for help output and
//! tab completion: the area of the tracker they touch, their subcommands, and whether
//! later arguments name an expense category.

use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;

pub type CommandResult = Result<(), CommandError>;
pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Area of the tracker a command works on; help lists commands in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Money,
    Analysis,
    Planning,
    Data,
    Shell,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 5] = [
        CommandGroup::Money,
        CommandGroup::Analysis,
        CommandGroup::Planning,
        CommandGroup::Data,
        CommandGroup::Shell,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Money => "Income & spending",
            CommandGroup::Analysis => "Summaries & insights",
            CommandGroup::Planning => "Goals & bills",
            CommandGroup::Data => "Data & settings",
            CommandGroup::Shell => "Shell",
        }
    }
}

pub struct CommandEntry {
    pub group: CommandGroup,
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub subcommands: &'static [&'static str],
    pub category_args: bool,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub fn new(
        group: CommandGroup,
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            group,
            name,
            description,
            usage,
            subcommands: &[],
            category_args: false,
            handler,
        }
    }

    pub fn with_subcommands(self, subcommands: &'static [&'static str]) -> Self {
        Self {
            subcommands,
            ..self
        }
    }

    /// Marks arguments after the subcommand as completable expense categories.
    pub fn with_category_args(self) -> Self {
        Self {
            category_args: true,
            ..self
        }
    }
}

/// Commands in registration order; re-registering a name replaces it in place.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Non-empty groups in [`CommandGroup::ALL`] order.
    pub fn by_group(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        CommandGroup::ALL
            .into_iter()
            .filter_map(|group| {
                let members: Vec<&CommandEntry> =
                    self.entries().filter(|entry| entry.group == group).collect();
                (!members.is_empty()).then_some((group, members))
            })
            .collect()
    }
}
