//! Prompt text for each insight. Every figure is computed by `core::services` first.

use crate::core::services::{
    weekday_name, AmountStats, BalanceService, InsightService, MonthlyReport, SafeToSpend,
    SpendingForecast,
};
use crate::domain::{Expense, Income};
use chrono::Weekday;

/// Builds prompts with amounts rendered in one currency.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    symbol: String,
}

impl PromptBuilder {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.symbol, amount)
    }

    pub fn financial_summary(&self, income_total: f64, expenses: &[Expense]) -> String {
        let total = BalanceService::total_expenses(expenses);
        let average_daily = if expenses.is_empty() {
            total
        } else {
            InsightService::average_daily_spend(expenses)
        };
        format!(
            "Analyze this financial situation and provide helpful insights:\n\n\
             Income: {}\n\
             Total Expenses: {}\n\
             Current Balance: {}\n\
             Number of Transactions: {}\n\
             Average Daily Spend: {}\n\n\
             Provide a clear 3-4 sentence summary of their financial health with actionable advice.",
            self.money(income_total),
            self.money(total),
            self.money(income_total - total),
            expenses.len(),
            self.money(average_daily),
        )
    }

    pub fn overspending_patterns(&self, expenses: &[Expense]) -> String {
        let average = BalanceService::total_expenses(expenses) / expenses.len().max(1) as f64;
        let by_day = InsightService::by_day_of_week(expenses)
            .into_iter()
            .map(|(day, bucket)| {
                format!(
                    "{}: {} transactions, {} total, {} avg",
                    weekday_name(day),
                    bucket.count,
                    self.money(bucket.total),
                    self.money(bucket.average())
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let by_time = InsightService::by_time_of_day(expenses)
            .into_iter()
            .map(|(slot, bucket)| {
                format!(
                    "{}: {} transactions, {} total",
                    slot,
                    bucket.count,
                    self.money(bucket.total)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Analyze these spending patterns and identify areas for improvement:\n\n\
             Average Transaction: {}\n\n\
             Spending by Day of Week:\n{by_day}\n\n\
             Spending by Time of Day:\n{by_time}\n\n\
             Identify key spending patterns and provide 3-4 actionable recommendations.",
            self.money(average),
        )
    }

    pub fn prediction(&self, forecast: &SpendingForecast) -> String {
        let direction = if forecast.trend > 0.0 {
            "increasing"
        } else {
            "decreasing"
        };
        format!(
            "Based on this spending pattern, provide a forecast:\n\n\
             Last 14 days total: {}\n\
             Average daily spend: {}\n\
             Spending trend: {direction} by {:.1}% per week\n\n\
             Predict spending for the next {} days with practical insights. 2-3 sentences.",
            self.money(forecast.recent_total),
            self.money(forecast.average_daily),
            forecast.trend.abs(),
            forecast.days,
        )
    }

    pub fn safe_to_spend(&self, safe: &SafeToSpend) -> String {
        format!(
            "Calculate safe spending amount:\n\n\
             Monthly Budget: {}\n\
             Already Spent: {}\n\
             Remaining Budget: {}\n\
             Days Remaining: {}\n\
             Safe Daily Amount: {}\n\n\
             Provide clear guidance on safe spending in 2-3 sentences.",
            self.money(safe.monthly_budget),
            self.money(safe.spent_this_month),
            self.money(safe.remaining),
            safe.days_remaining,
            self.money(safe.safe_daily),
        )
    }

    pub fn anomalies(&self, stats: &AmountStats, anomalies: &[Expense]) -> String {
        let listed = anomalies
            .iter()
            .map(|expense| {
                format!(
                    "{} on {} - {}",
                    self.money(expense.amount),
                    expense.day().format("%Y-%m-%d"),
                    expense.description_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Identify unusual transactions:\n\n\
             Average Transaction: {}\n\
             Standard Deviation: {}\n\n\
             Unusual Transactions:\n{listed}\n\n\
             Explain why these transactions are unusual and provide recommendations. 2-3 sentences.",
            self.money(stats.mean),
            self.money(stats.std_dev),
        )
    }

    pub fn stability(&self, score: u8, stats: &AmountStats) -> String {
        format!(
            "Analyze financial stability:\n\n\
             Stability Score: {score}/100\n\
             Average Transaction: {}\n\
             Variation: {:.1}%\n\n\
             Explain what this score means and provide 2-3 actionable tips to improve financial stability.",
            self.money(stats.mean),
            stats.coefficient_of_variation() * 100.0,
        )
    }

    pub fn behavior(
        &self,
        transactions: usize,
        average: f64,
        highest_day: (Weekday, f64),
        lowest_day: (Weekday, f64),
    ) -> String {
        format!(
            "Analyze spending behavior profile:\n\n\
             Total Transactions: {transactions}\n\
             Average Transaction: {}\n\
             Highest Spending Day: {} ({})\n\
             Lowest Spending Day: {} ({})\n\n\
             Provide a spending personality profile with strengths and areas for improvement. 3-4 sentences.",
            self.money(average),
            weekday_name(highest_day.0),
            self.money(highest_day.1),
            weekday_name(lowest_day.0),
            self.money(lowest_day.1),
        )
    }

    pub fn monthly_report(&self, report: &MonthlyReport) -> String {
        let categories = if report.top_categories.is_empty() {
            "none".to_string()
        } else {
            report
                .top_categories
                .iter()
                .map(|(category, total)| format!("{category}: {}", self.money(*total)))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Review this monthly report for {:04}-{:02}:\n\n\
             Income: {}\n\
             Total Spent: {}\n\
             Savings: {}\n\
             Savings Rate: {:.1}%\n\
             Top Categories: {categories}\n\
             Transactions: {}\n\n\
             Summarize the month and suggest one concrete goal for next month. 3-4 sentences.",
            report.year,
            report.month,
            self.money(report.income),
            self.money(report.total),
            self.money(report.savings),
            report.savings_rate,
            report.expenses.len(),
        )
    }

    pub fn chat(&self, question: &str, income: &Income, expenses: &[Expense]) -> String {
        let income_total = crate::domain::Amounted::amount(income);
        let total = BalanceService::total_expenses(expenses);
        format!(
            "Answer this financial question professionally:\n\n\
             Question: \"{}\"\n\n\
             Financial Context:\n\
             - Income: {}\n\
             - Total Expenses: {}\n\
             - Current Balance: {}\n\
             - Total Transactions: {}\n\n\
             Provide a clear, helpful answer with actionable advice. 2-4 sentences.",
            question.trim(),
            self.money(income_total),
            self.money(total),
            self.money(income_total - total),
            expenses.len(),
        )
    }
}
