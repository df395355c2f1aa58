use crate::cli::context::ShellContext;
use crate::cli::error::CommandError;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, CommandResult};
use crate::cli::table::{Table, TableColumn};
use crate::core::FinanceError;
use crate::domain::{Displayable, GoalPriority, SavingsGoal};

use super::{parse_amount_arg, parse_date, parse_id, required, split_flags, split_subcommand};

const USAGE: &str = "goal <add <name> <target> [--deadline D] [--priority P] [--saved X]|\
edit <id> <name> <target> [--deadline D] [--priority P] [--saved X]|\
progress <id> <amount>|delete <id>|list>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Planning,
        "goal",
        "Track savings goals",
        USAGE,
        cmd_goal,
    )
    .with_subcommands(&["add", "edit", "progress", "delete", "list"])]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => {
            let goal = goal_from(rest)?;
            let name = goal.name.clone();
            let id = context.tracker.add_savings_goal(goal)?;
            io::print_success(format!("Goal `{name}` added with id {id}."));
            Ok(())
        }
        "edit" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let goal = goal_from(&rest[1..])?;
            context.tracker.edit_savings_goal(id, goal)?;
            io::print_success(format!("Goal {id} updated."));
            Ok(())
        }
        "progress" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let amount = parse_amount_arg(required(rest, 1, "amount")?, "amount")?;
            let percent = context.tracker.add_goal_progress(id, amount)?;
            if percent >= 100.0 {
                io::print_success(format!("Goal {id} reached!"));
            } else {
                io::print_success(format!("Goal {id} is {percent:.1}% funded."));
            }
            Ok(())
        }
        "delete" | "remove" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let Some(item) = context.tracker.savings_goals().iter().find(|item| item.id == id) else {
                return Err(FinanceError::GoalNotFound(id).into());
            };
            if !context.confirm(&format!("Delete savings goal {}?", item.display_label()))? {
                io::print_info("Delete cancelled.");
                return Ok(());
            }
            let removed = context.tracker.delete_savings_goal(id)?;
            io::print_success(format!("Goal `{}` deleted.", removed.name));
            Ok(())
        }
        "list" => list_goals(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown goal subcommand `{other}`"
        ))),
    }
}

fn goal_from(args: &[&str]) -> Result<SavingsGoal, CommandError> {
    let (positional, flags) = split_flags(args)?;
    let name = required(&positional, 0, "name")?;
    let target = parse_amount_arg(required(&positional, 1, "target")?, "target")?;
    let mut goal = SavingsGoal::new(0, name, target);
    for (flag, value) in flags {
        match flag.as_str() {
            "deadline" => goal.deadline = Some(parse_date(value)?),
            "priority" => {
                goal.priority = GoalPriority::from_label(value).ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "unknown priority `{value}` (expected low, medium, or high)"
                    ))
                })?;
            }
            "saved" => goal.current_amount = parse_amount_arg(value, "saved")?,
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `--{other}`"
                )))
            }
        }
    }
    Ok(goal)
}

fn list_goals(context: &ShellContext) -> CommandResult {
    output_section("Savings goals");
    let goals = context.tracker.savings_goals();
    if goals.is_empty() {
        io::print_info("No savings goals yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Name"),
        TableColumn::right("Saved"),
        TableColumn::right("Target"),
        TableColumn::right("Progress"),
        TableColumn::left("Priority"),
        TableColumn::left("Deadline"),
    ]);
    for goal in goals {
        table.push_row(vec![
            goal.id.to_string(),
            goal.name.clone(),
            context.money(goal.current_amount),
            context.money(goal.target_amount),
            format!("{:.1}%", goal.progress_percent()),
            goal.priority.to_string(),
            goal.deadline
                .map(|day| day.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}
