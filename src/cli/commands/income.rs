use crate::cli::context::ShellContext;
use crate::cli::io::{self, Figures};
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::cli::table::{Table, TableColumn};
use crate::cli::error::CommandError;
use crate::domain::Amounted;

use super::{parse_amount_arg, parse_index, required, split_subcommand};

const USAGE: &str = "income <add <amount>|set <amount>|edit <position> <amount>|show>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Money,
        "income",
        "Record and review income",
        USAGE,
        cmd_income,
    )
    .with_subcommands(&["add", "set", "edit", "show", "list"])]
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => {
            let amount = parse_amount_arg(required(rest, 0, "amount")?, "amount")?;
            context.tracker.add_income(amount)?;
            io::print_success(format!(
                "Added {}. Total income: {}",
                context.money(amount),
                context.money(context.tracker.income().amount())
            ));
            Ok(())
        }
        "set" => {
            let amount = parse_amount_arg(required(rest, 0, "amount")?, "amount")?;
            context.tracker.set_income_total(amount)?;
            io::print_success(format!("Income total set to {}.", context.money(amount)));
            Ok(())
        }
        "edit" => {
            let position = parse_index(required(rest, 0, "position")?)?;
            let amount = parse_amount_arg(required(rest, 1, "amount")?, "amount")?;
            let index = position.checked_sub(1).ok_or_else(|| {
                CommandError::InvalidArguments("positions start at 1".to_string())
            })?;
            let delta = context.tracker.edit_income_entry(index, amount)?;
            io::print_success(format!(
                "Entry #{position} updated ({}{}).",
                if delta >= 0.0 { "+" } else { "" },
                context.money(delta)
            ));
            Ok(())
        }
        "show" | "list" => show_income(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown income subcommand `{other}`"
        ))),
    }
}

fn show_income(context: &ShellContext) -> CommandResult {
    let income = context.tracker.income();
    output_section("Income");
    let figures = Figures::new(10);
    figures.show("Total", context.money(income.amount()));
    figures.show("Since", income.start_date.format("%Y-%m-%d %H:%M"));
    if !income.is_consistent() {
        io::print_warning(format!(
            "Total differs from recorded entries ({}).",
            context.money(income.derived_amount())
        ));
    }
    if income.history.is_empty() {
        io::print_info("No income entries recorded.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Date"),
        TableColumn::right("Amount"),
    ]);
    for (index, entry) in income.history.iter().enumerate() {
        table.push_row(vec![
            (index + 1).to_string(),
            entry.date.format("%Y-%m-%d %H:%M").to_string(),
            context.money(entry.amount),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}
