use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::SummaryService;
use crate::domain::SummarySnapshot;

use super::split_subcommand;

const USAGE: &str = "summary <generate|list|check>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Analysis,
        "summary",
        "Generate or review 30-day summaries",
        USAGE,
        cmd_summary,
    )
    .with_subcommands(&["generate", "check", "list"])]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, _) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "generate" => {
            let snapshot = context.tracker.generate_summary()?.clone();
            io::print_success("Summary generated.");
            print_snapshot(context, &snapshot);
            Ok(())
        }
        "check" => {
            let tracker = &context.tracker;
            let start = tracker.income().start_date;
            let now = tracker.now();
            io::print_info(format!(
                "{} days tracked, {} summaries stored, {} expected.",
                SummaryService::elapsed_days(start, now),
                tracker.summary_history().len(),
                SummaryService::expected_summaries(start, now)
            ));
            if context.tracker.check_and_generate_summary()? {
                io::print_success("A new 30-day summary was generated.");
            } else {
                io::print_info("No summary is due.");
            }
            Ok(())
        }
        "list" => list_summaries(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown summary subcommand `{other}`"
        ))),
    }
}

fn list_summaries(context: &ShellContext) -> CommandResult {
    output_section("Summary history");
    let history = context.tracker.summary_history();
    if history.is_empty() {
        io::print_info("No summaries yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::right("Income"),
        TableColumn::right("Expenses"),
        TableColumn::right("Balance"),
        TableColumn::right("Count"),
        TableColumn::right("Over limit"),
        TableColumn::right("Daily avg"),
    ]);
    for snapshot in history {
        table.push_row(vec![
            snapshot.date.format("%Y-%m-%d").to_string(),
            context.money(snapshot.total_income),
            context.money(snapshot.total_expenses),
            context.money(snapshot.balance),
            snapshot.expense_count.to_string(),
            snapshot.overshoot_days.to_string(),
            context.money(snapshot.daily_average),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn print_snapshot(context: &ShellContext, snapshot: &SummarySnapshot) {
    io::print_info(format!(
        "Period {} ending {}",
        snapshot.period,
        snapshot.date.format("%Y-%m-%d")
    ));
    io::print_info(format!(
        "Income {} | Expenses {} | Balance {}",
        context.money(snapshot.total_income),
        context.money(snapshot.total_expenses),
        context.money(snapshot.balance)
    ));
    io::print_info(format!(
        "{} expenses, {} days over the limit, {} per day",
        snapshot.expense_count,
        snapshot.overshoot_days,
        context.money(snapshot.daily_average)
    ));
    for (category, total) in &snapshot.category_data {
        io::print_info(format!("  {:<14} {}", category.to_string(), context.money(*total)));
    }
}
