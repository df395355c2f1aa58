use chrono::Datelike;

use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::BalanceService;
use crate::core::FinanceError;
use crate::domain::{Displayable, Expense, ExpenseDraft};

use super::{
    parse_amount_arg, parse_category, parse_datetime, parse_id, required, split_flags,
    split_subcommand,
};

const USAGE: &str = "expense <add <amount> <category> [description] [--date D]|\
edit <id> <amount> <category> [description] [--date D]|delete <id>|\
list [--month YYYY-MM] [--category C]>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Money,
        "expense",
        "Add, edit, delete, or list expenses",
        USAGE,
        cmd_expense,
    )
    .with_subcommands(&["add", "edit", "delete", "list"])
    .with_category_args()]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => add_expense(context, rest),
        "edit" => edit_expense(context, rest),
        "delete" | "remove" => delete_expense(context, rest),
        "list" => list_expenses(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown expense subcommand `{other}`"
        ))),
    }
}

fn draft_from(args: &[&str]) -> Result<ExpenseDraft, CommandError> {
    let (positional, flags) = split_flags(args)?;
    let amount = parse_amount_arg(required(&positional, 0, "amount")?, "amount")?;
    let category = parse_category(required(&positional, 1, "category")?)?;
    let mut draft = ExpenseDraft::new(amount, category);
    if positional.len() > 2 {
        draft = draft.described(positional[2..].join(" "));
    }
    for (flag, value) in flags {
        match flag.as_str() {
            "date" => draft = draft.on(parse_datetime(value)?),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `--{other}`"
                )))
            }
        }
    }
    Ok(draft)
}

fn add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = draft_from(args)?;
    let summaries_before = context.tracker.summary_history().len();
    let id = context.tracker.add_expense(draft)?;
    io::print_success(format!(
        "Expense {id} recorded. Balance: {}",
        context.money(context.tracker.current_balance())
    ));
    report_new_summary(context, summaries_before);
    warn_over_limit(context);
    Ok(())
}

fn edit_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(required(args, 0, "id")?)?;
    let draft = draft_from(&args[1..])?;
    let summaries_before = context.tracker.summary_history().len();
    context.tracker.update_expense(id, draft)?;
    io::print_success(format!("Expense {id} updated."));
    report_new_summary(context, summaries_before);
    Ok(())
}

fn delete_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(required(args, 0, "id")?)?;
    let Some(expense) = context.tracker.expenses().iter().find(|e| e.id == id) else {
        return Err(FinanceError::ExpenseNotFound(id).into());
    };
    if !context.confirm(&format!("Delete expense {}?", expense.display_label()))? {
        io::print_info("Delete cancelled.");
        return Ok(());
    }
    let summaries_before = context.tracker.summary_history().len();
    let removed = context.tracker.delete_expense(id)?;
    io::print_success(format!(
        "Deleted expense {} ({}).",
        removed.id,
        context.money(removed.amount)
    ));
    report_new_summary(context, summaries_before);
    Ok(())
}

fn list_expenses(context: &ShellContext, args: &[&str]) -> CommandResult {
    let (_, flags) = split_flags(args)?;
    let mut selected: Vec<&Expense> = context.tracker.expenses().iter().collect();
    for (flag, value) in flags {
        match flag.as_str() {
            "month" => {
                let (year, month) = super::insights::parse_month(value)?;
                selected.retain(|expense| {
                    let day = expense.day();
                    day.year() == year && day.month() == month
                });
            }
            "category" => {
                let category = parse_category(value)?;
                selected.retain(|expense| expense.category == category);
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `--{other}`"
                )))
            }
        }
    }
    selected.sort_by_key(|expense| expense.date);

    output_section("Expenses");
    if selected.is_empty() {
        io::print_info("No expenses recorded.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::left("Description"),
    ]);
    let mut total = 0.0;
    for expense in &selected {
        total += expense.amount;
        table.push_row(vec![
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d %H:%M").to_string(),
            expense.category.to_string(),
            context.money(expense.amount),
            expense.description_or_default().to_string(),
        ]);
    }
    io::print_info(table.render());
    io::print_info(format!(
        "{} expenses, total {}",
        selected.len(),
        context.money(total)
    ));
    Ok(())
}

fn report_new_summary(context: &ShellContext, before: usize) {
    if context.tracker.summary_history().len() > before {
        io::print_info("A new 30-day summary was generated. See `summary list`.");
    }
}

fn warn_over_limit(context: &ShellContext) {
    let today = context.tracker.clock().today();
    let spent = BalanceService::spent_on(context.tracker.expenses(), today);
    let limit = context.tracker.spending_limit();
    if spent > limit {
        io::print_warning(format!(
            "Today's spending {} is over the daily limit of {}.",
            context.money(spent),
            context.money(limit)
        ));
    }
}
