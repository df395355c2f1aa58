use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io::{self, Figures, Tone};
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::core::services::{BalanceService, InsightService, LimitProgress};
use crate::domain::Amounted;

use super::{parse_amount_arg, required, split_subcommand};

const LIMIT_USAGE: &str = "limit <set <amount>|show>";
const BALANCE_FIGURES: Figures = Figures::new(9);

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Money,
            "limit",
            "Set or show the daily spending limit",
            LIMIT_USAGE,
            cmd_limit,
        )
        .with_subcommands(&["set", "show"]),
        CommandEntry::new(
            CommandGroup::Money,
            "balance",
            "Show income, spending, and the current balance",
            "balance",
            cmd_balance,
        ),
    ]
}

fn cmd_limit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, LIMIT_USAGE)?;
    match sub.as_str() {
        "set" => {
            let limit = parse_amount_arg(required(rest, 0, "amount")?, "amount")?;
            context.tracker.set_spending_limit(limit)?;
            io::print_success(format!("Daily limit set to {}.", context.money(limit)));
            Ok(())
        }
        "show" => {
            output_section("Daily limit");
            print_progress(context, &today_progress(context));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown limit subcommand `{other}`"
        ))),
    }
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let tracker = &context.tracker;
    let income = tracker.income().amount();
    let spent = BalanceService::total_expenses(tracker.expenses());
    let balance = tracker.current_balance();
    output_section("Balance");
    BALANCE_FIGURES.show("Income", context.money(income));
    BALANCE_FIGURES.show("Expenses", context.money(spent));
    let tone = if balance < 0.0 { Tone::Caution } else { Tone::Neutral };
    BALANCE_FIGURES.show_toned(tone, "Balance", context.money(balance));
    print_progress(context, &today_progress(context));
    Ok(())
}

fn today_progress(context: &ShellContext) -> LimitProgress {
    let today = context.tracker.clock().today();
    let spent = BalanceService::spent_on(context.tracker.expenses(), today);
    InsightService::limit_progress(spent, context.tracker.spending_limit())
}

fn print_progress(context: &ShellContext, progress: &LimitProgress) {
    BALANCE_FIGURES.show_toned(
        progress.level.into(),
        "Today",
        format!(
            "{} of {} ({:.0}%)",
            context.money(progress.spent),
            context.money(progress.limit),
            progress.percent
        ),
    );
}
