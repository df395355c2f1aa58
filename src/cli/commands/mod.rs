use chrono::{NaiveDate, NaiveDateTime};

pub mod config;
pub mod data;
pub mod expense;
pub mod goal;
pub mod income;
pub mod insights;
pub mod limit;
pub mod recurring;
pub mod summary;
pub mod system;

use crate::cli::error::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::domain::{common::parse_timestamp, parse_amount, ExpenseCategory};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "income",
    "expense",
    "limit",
    "balance",
    "summary",
    "insights",
    "safe",
    "report",
    "goal",
    "recurring",
    "export",
    "import",
    "clear",
    "snapshot",
    "config",
    "version",
    "help",
    "exit",
];

pub fn register_all(registry: &mut CommandRegistry) {
    let mut entries: Vec<CommandEntry> = Vec::new();
    entries.extend(income::definitions());
    entries.extend(expense::definitions());
    entries.extend(limit::definitions());
    entries.extend(summary::definitions());
    entries.extend(insights::definitions());
    entries.extend(goal::definitions());
    entries.extend(recurring::definitions());
    entries.extend(data::definitions());
    entries.extend(config::definitions());
    entries.extend(system::definitions());

    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| *name == entry.name)
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Splits `args` into its subcommand and the remaining arguments.
pub(crate) fn split_subcommand<'a, 'b>(
    args: &'a [&'b str],
    usage: &str,
) -> Result<(String, &'a [&'b str]), CommandError> {
    match args.split_first() {
        Some((first, rest)) => Ok((first.to_lowercase(), rest)),
        None => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

pub(crate) fn required<'a>(args: &[&'a str], index: usize, name: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("missing <{name}>")))
}

pub(crate) fn parse_amount_arg(raw: &str, name: &str) -> Result<f64, CommandError> {
    parse_amount(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!("<{name}> must be a number, got `{raw}`"))
    })
}

pub(crate) fn parse_id(raw: &str) -> Result<i64, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid id `{raw}`")))
}

pub(crate) fn parse_index(raw: &str) -> Result<usize, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid position `{raw}`")))
}

pub(crate) fn parse_category(raw: &str) -> Result<ExpenseCategory, CommandError> {
    ExpenseCategory::try_from_label(raw).ok_or_else(|| {
        let known = ExpenseCategory::ALL
            .iter()
            .map(|category| category.label().to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        CommandError::InvalidArguments(format!("unknown category `{raw}` (expected one of: {known})"))
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidArguments(format!("invalid date `{raw}` (use YYYY-MM-DD)")))
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, CommandError> {
    parse_timestamp(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "invalid date `{raw}` (use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)"
        ))
    })
}

/// Splits trailing `--flag value` pairs from positional arguments.
pub(crate) fn split_flags<'a>(args: &[&'a str]) -> Result<(Vec<&'a str>, Vec<(String, &'a str)>), CommandError> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("flag `--{flag}` needs a value"))
            })?;
            flags.push((flag.to_lowercase(), *value));
        } else {
            positional.push(*arg);
        }
    }
    Ok((positional, flags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_follows_root_order() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ROOT_COMMAND_ORDER);
    }

    #[test]
    fn flags_are_separated() {
        let (positional, flags) = split_flags(&["150", "food", "--date", "2024-07-01"]).unwrap();
        assert_eq!(positional, vec!["150", "food"]);
        assert_eq!(flags, vec![("date".to_string(), "2024-07-01")]);
        assert!(split_flags(&["--date"]).is_err());
    }

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!(parse_category("FOOD").unwrap(), ExpenseCategory::Food);
        assert!(parse_category("rent").is_err());
    }
}
