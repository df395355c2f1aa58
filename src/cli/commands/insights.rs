use chrono::Datelike;

use crate::ai::AiError;
use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io::{self, Figures};
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::core::services::{
    weekday_name, AnomalyReport, BehaviorProfile, InsightService, ReportService,
    SafeToSpendService,
};
use crate::domain::Amounted;

use super::{parse_amount_arg, split_flags};

const INSIGHTS_USAGE: &str = "insights [narrate <summary|patterns|prediction|safe|anomalies|stability|behavior>|ask <question>|clear-cache]";
const FORECAST_DAYS: u32 = 7;
const SERIES_DAYS: u32 = 7;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Analysis,
            "insights",
            "Show spending metrics or narrate them",
            INSIGHTS_USAGE,
            cmd_insights,
        )
        .with_subcommands(&["narrate", "ask", "clear-cache"]),
        CommandEntry::new(
            CommandGroup::Analysis,
            "safe",
            "Show how much is safe to spend per day this month",
            "safe [monthly budget]",
            cmd_safe,
        ),
        CommandEntry::new(
            CommandGroup::Analysis,
            "report",
            "Show a monthly report",
            "report [YYYY-MM] [--narrate yes]",
            cmd_report,
        ),
    ]
}

pub(crate) fn parse_month(raw: &str) -> Result<(i32, u32), CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("invalid month `{raw}` (use YYYY-MM)"));
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

fn cmd_insights(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        print_metrics(context);
        return Ok(());
    };
    match sub.to_lowercase().as_str() {
        "narrate" => {
            let kind = super::required(rest, 0, "kind")?.to_lowercase();
            let text = narrate_kind(context, &kind)?;
            output_section(format!("Insight: {kind}"));
            io::print_info(text);
            Ok(())
        }
        "ask" => {
            if rest.is_empty() {
                return Err(CommandError::InvalidArguments("missing <question>".into()));
            }
            let question = rest.join(" ");
            let tracker = &context.tracker;
            let answer = context
                .assistant
                .chat(&question, tracker.income(), tracker.expenses())?;
            io::print_info(answer);
            Ok(())
        }
        "clear-cache" => {
            context.insight_cache().clear()?;
            io::print_success("Cached insights cleared.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown insights subcommand `{other}`"
        ))),
    }
}

fn print_metrics(context: &ShellContext) {
    let expenses = context.tracker.expenses();
    output_section("Insights");

    let figures = Figures::new(9);
    let stability = InsightService::stability_score(expenses);
    match (stability.coefficient_of_variation(), stability.message) {
        (Some(cv), _) => figures.show(
            "Stability",
            format!("{}/100 (variation {:.1}%)", stability.score, cv * 100.0),
        ),
        (None, message) => {
            figures.show("Stability", format!("{}/100", stability.score));
            if let Some(message) = message {
                io::print_hint(message);
            }
        }
    }

    figures.show("Trend", format!("{:+.1}%", InsightService::trend(expenses)));
    figures.show(
        "Daily avg",
        context.money(InsightService::average_daily_spend(expenses)),
    );
    if let Some(forecast) = InsightService::predict_spending(expenses, FORECAST_DAYS) {
        io::print_info(format!(
            "Next {} days: {}",
            forecast.days,
            context.money(forecast.projected)
        ));
    }

    match InsightService::detect_anomalies(expenses) {
        AnomalyReport::Found { stats, anomalies } => {
            io::print_warning(format!(
                "{} unusual transactions (mean {}, deviation {}):",
                anomalies.len(),
                context.money(stats.mean),
                context.money(stats.std_dev)
            ));
            for expense in &anomalies {
                io::print_info(format!(
                    "  {} on {} - {}",
                    context.money(expense.amount),
                    expense.day(),
                    expense.description_or_default()
                ));
            }
        }
        report => {
            if let Some(message) = report.message() {
                io::print_hint(message);
            }
        }
    }

    if let BehaviorProfile::Profile {
        highest_day,
        lowest_day,
        ..
    } = InsightService::behavior_profile(expenses)
    {
        io::print_info(format!(
            "Busiest day: {} ({}), quietest: {} ({})",
            weekday_name(highest_day.0),
            context.money(highest_day.1),
            weekday_name(lowest_day.0),
            context.money(lowest_day.1)
        ));
    }

    let today = context.tracker.clock().today();
    let series = InsightService::daily_series(expenses, today, SERIES_DAYS);
    let velocity = InsightService::velocity(&series);
    io::print_info(format!("Last {SERIES_DAYS} days:"));
    for ((day, amount), (_, running)) in series.iter().zip(&velocity) {
        io::print_info(format!(
            "  {day} {:>12} {:>12}",
            context.money(*amount),
            context.money(*running)
        ));
    }
}

/// Cached narrative for `kind`, generating and caching it on a miss.
fn narrate_kind(context: &ShellContext, kind: &str) -> Result<String, CommandError> {
    let now = context.tracker.now();
    let cache = context.insight_cache();
    if let Some(text) = cache.get(kind, now) {
        return Ok(text);
    }
    let text = generate(context, kind)?;
    cache.put(kind, &text, now)?;
    Ok(text)
}

fn generate(context: &ShellContext, kind: &str) -> Result<String, CommandError> {
    let assistant = &context.assistant;
    let tracker = &context.tracker;
    let expenses = tracker.expenses();
    let text: Result<String, AiError> = match kind {
        "summary" => assistant.financial_summary(tracker.income(), expenses),
        "patterns" => assistant.overspending_patterns(expenses),
        "prediction" => assistant.predict(expenses, FORECAST_DAYS),
        "safe" => assistant
            .safe_to_spend(
                expenses,
                tracker.income().amount(),
                tracker.clock().today(),
                tracker.spending_limit(),
            )
            .map(|(_, narrative)| narrative),
        "anomalies" => assistant.anomalies(expenses),
        "stability" => assistant
            .stability(expenses)
            .map(|insight| format!("Score {}/100. {}", insight.score, insight.explanation)),
        "behavior" => assistant.behavior(expenses),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown insight `{other}`"
            )))
        }
    };
    Ok(text?)
}

fn cmd_safe(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let tracker = &context.tracker;
    let budget = match args.first() {
        Some(raw) => parse_amount_arg(raw, "monthly budget")?,
        None => tracker.income().amount(),
    };
    let safe = SafeToSpendService::for_expenses(
        tracker.expenses(),
        budget,
        tracker.clock().today(),
        tracker.spending_limit(),
    );
    output_section("Safe to spend");
    let figures = Figures::new(14);
    figures.show("Monthly budget", context.money(safe.monthly_budget));
    figures.show("Spent so far", context.money(safe.spent_this_month));
    figures.show("Remaining", context.money(safe.remaining));
    figures.show(
        "Days remaining",
        format!("{} of {}", safe.days_remaining, safe.days_in_month),
    );
    figures.show_toned(safe.status.into(), "Safe per day", context.money(safe.safe_daily));
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = split_flags(args)?;
    let (year, month) = match positional.first() {
        Some(raw) => parse_month(raw)?,
        None => {
            let today = context.tracker.clock().today();
            (today.year(), today.month())
        }
    };
    let narrate = flags
        .iter()
        .any(|(flag, value)| flag == "narrate" && matches!(*value, "yes" | "true" | "1"));

    let tracker = &context.tracker;
    let report = ReportService::monthly(tracker.expenses(), tracker.income().amount(), year, month);
    output_section(format!("Report {year:04}-{month:02}"));
    let figures = Figures::new(12);
    figures.show("Income", context.money(report.income));
    figures.show("Spent", context.money(report.total));
    figures.show("Savings", context.money(report.savings));
    figures.show("Savings rate", format!("{:.1}%", report.savings_rate));
    figures.show("Transactions", report.expenses.len());
    for (category, total) in &report.top_categories {
        io::print_info(format!("  {:<14} {}", category.to_string(), context.money(*total)));
    }
    if narrate {
        io::print_info(context.assistant.monthly_report(&report)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_parse_strictly() {
        assert_eq!(parse_month("2024-07").unwrap(), (2024, 7));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("July").is_err());
    }
}
