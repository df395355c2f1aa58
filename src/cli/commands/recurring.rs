use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::RecurringService;
use crate::core::FinanceError;
use crate::domain::{Displayable, Frequency, RecurringExpense};

use super::{
    parse_amount_arg, parse_category, parse_date, parse_id, required, split_flags,
    split_subcommand,
};

const USAGE: &str = "recurring <add <name> <amount> <daily|weekly|monthly|yearly> [--start D] [--category C] [--remind N]|\
edit <id> <name> <amount> <frequency> [flags]|pay <id>|toggle <id>|delete <id>|list>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Planning,
        "recurring",
        "Manage recurring bills and subscriptions",
        USAGE,
        cmd_recurring,
    )
    .with_subcommands(&["add", "edit", "pay", "toggle", "delete", "list"])
    .with_category_args()]
}

fn cmd_recurring(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => {
            let item = item_from(context, rest)?;
            let name = item.name.clone();
            let id = context.tracker.add_recurring(item)?;
            io::print_success(format!("Recurring expense `{name}` added with id {id}."));
            Ok(())
        }
        "edit" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let mut item = item_from(context, &rest[1..])?;
            if let Some(existing) = context.tracker.recurring().iter().find(|i| i.id == id) {
                item.is_active = existing.is_active;
            }
            context.tracker.edit_recurring(id, item)?;
            io::print_success(format!("Recurring expense {id} updated."));
            Ok(())
        }
        "pay" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let expense_id = context.tracker.pay_recurring(id)?;
            io::print_success(format!(
                "Payment recorded as expense {expense_id}. Balance: {}",
                context.money(context.tracker.current_balance())
            ));
            Ok(())
        }
        "toggle" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let active = context.tracker.toggle_recurring(id)?;
            io::print_success(format!(
                "Recurring expense {id} is now {}.",
                if active { "active" } else { "paused" }
            ));
            Ok(())
        }
        "delete" | "remove" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let Some(item) = context.tracker.recurring().iter().find(|item| item.id == id) else {
                return Err(FinanceError::RecurringNotFound(id).into());
            };
            if !context.confirm(&format!("Delete recurring expense {}?", item.display_label()))? {
                io::print_info("Delete cancelled.");
                return Ok(());
            }
            let removed = context.tracker.delete_recurring(id)?;
            io::print_success(format!("Recurring expense `{}` deleted.", removed.name));
            Ok(())
        }
        "list" => list_recurring(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown recurring subcommand `{other}`"
        ))),
    }
}

fn item_from(context: &ShellContext, args: &[&str]) -> Result<RecurringExpense, CommandError> {
    let (positional, flags) = split_flags(args)?;
    let name = required(&positional, 0, "name")?;
    let amount = parse_amount_arg(required(&positional, 1, "amount")?, "amount")?;
    let raw_frequency = required(&positional, 2, "frequency")?;
    let frequency = Frequency::from_label(raw_frequency).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown frequency `{raw_frequency}` (expected daily, weekly, monthly, or yearly)"
        ))
    })?;
    let today = context.tracker.clock().today();
    let mut start = today;
    let mut category = None;
    let mut remind = None;
    for (flag, value) in flags {
        match flag.as_str() {
            "start" => start = parse_date(value)?,
            "category" => category = Some(parse_category(value)?),
            "remind" => {
                remind = Some(value.parse::<u32>().map_err(|_| {
                    CommandError::InvalidArguments(format!("invalid reminder days `{value}`"))
                })?);
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `--{other}`"
                )))
            }
        }
    }
    let mut item = RecurringExpense::new(0, name, amount, frequency, start, today);
    if let Some(category) = category {
        item.category = category;
    }
    if let Some(days) = remind {
        item.remind_days_before = days;
    }
    Ok(item)
}

fn list_recurring(context: &ShellContext) -> CommandResult {
    output_section("Recurring expenses");
    let items = context.tracker.recurring();
    if items.is_empty() {
        io::print_info("No recurring expenses yet.");
        return Ok(());
    }
    let today = context.tracker.clock().today();
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Name"),
        TableColumn::right("Amount"),
        TableColumn::left("Every"),
        TableColumn::left("Next due"),
        TableColumn::left("Status"),
    ]);
    for item in items {
        table.push_row(vec![
            item.id.to_string(),
            item.name.clone(),
            context.money(item.amount),
            item.frequency.to_string(),
            item.next_due_date.to_string(),
            if item.is_active { "active" } else { "paused" }.to_string(),
        ]);
    }
    io::print_info(table.render());
    io::print_info(format!(
        "Monthly commitment: {}",
        context.money(RecurringService::monthly_total(items))
    ));
    for item in RecurringService::due_soon(items, today) {
        let days = item.days_until_due(today);
        let when = match days {
            d if d < 0 => format!("overdue by {} days", -d),
            0 => "due today".to_string(),
            d => format!("due in {d} days"),
        };
        io::print_warning(format!("`{}` is {when}.", item.name));
    }
    Ok(())
}
