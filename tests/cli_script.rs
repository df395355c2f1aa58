use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("expense_core_cli").unwrap();
    cmd.env("EXPENSE_CORE_CLI_SCRIPT", "1")
        .env("EXPENSE_CORE_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = tempdir().unwrap();
    let input = "income add 1000\nexpense add 150 food \"Team lunch\"\nbalance\nexit\n";

    cli(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Expense"))
        .stdout(contains("Balance   : ₹850.00"));

    let stored =
        std::fs::read_to_string(home.path().join("data/values/dailyExpenses.json")).unwrap();
    assert!(stored.contains("Team lunch"));
}

#[test]
fn unknown_command_suggests_closest() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("balanse\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `balanse`"))
        .stdout(contains("Suggestion: `balance`?"));
}

#[test]
fn invalid_input_reports_and_continues() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("expense add abc food\nlimit set 0\nlimit show\n")
        .assert()
        .success()
        .stdout(contains("<amount> must be a number"))
        .stdout(contains("Spending limit"))
        .stdout(contains("of ₹200.00"));
}

#[test]
fn export_then_import_into_fresh_home() {
    let source = tempdir().unwrap();
    let backup = source.path().join("backup.json");
    cli(source.path())
        .write_stdin(format!(
            "income add 500\nexpense add 40 travel Bus\nexport {}\n",
            backup.display()
        ))
        .assert()
        .success()
        .stdout(contains("Data exported"));

    let target = tempdir().unwrap();
    cli(target.path())
        .write_stdin(format!("import {}\nsnapshot list\nbalance\n", backup.display()))
        .assert()
        .success()
        .stdout(contains("Imported 1 expenses"))
        .stdout(contains("pre-import"))
        .stdout(contains("₹460.00"));
}

#[test]
fn insights_without_provider_still_show_metrics() {
    let home = tempdir().unwrap();
    let mut input = String::new();
    for _ in 0..7 {
        input.push_str("expense add 100 food\n");
    }
    input.push_str("insights\ninsights narrate summary\n");
    cli(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Stability : 100/100"))
        .stdout(contains("No insight provider is configured"));
}

#[test]
fn summaries_due_after_edit_or_delete_are_announced() {
    let home = tempdir().unwrap();
    let values = home.path().join("data/values");
    std::fs::create_dir_all(&values).unwrap();
    let now = chrono::Local::now().naive_local();
    let stamp = |days_ago: i64| {
        (now - chrono::Duration::days(days_ago))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    };
    std::fs::write(
        values.join("userIncome.json"),
        format!(
            r#"{{"amount":1000,"startDate":"{}","history":[]}}"#,
            stamp(95)
        ),
    )
    .unwrap();
    std::fs::write(
        values.join("dailyExpenses.json"),
        format!(
            r#"[{{"id":1,"amount":10,"category":"Food","date":"{day}"}},{{"id":2,"amount":15,"category":"Bills","date":"{day}"}}]"#,
            day = stamp(1)
        ),
    )
    .unwrap();

    cli(home.path())
        .write_stdin("expense edit 1 20 food\nexpense delete 2\nsummary list\nexit\n")
        .assert()
        .success()
        .stdout(contains("A new 30-day summary was generated").count(2));
}
