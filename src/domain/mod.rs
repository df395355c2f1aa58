//! Finance records: income, expenses, categories, summaries, goals, and recurring bills.
//! Pure data types plus the lenient decoding rules used for persisted values.

pub mod category;
pub mod common;
pub mod expense;
pub mod income;
pub mod recurring;
pub mod savings;
pub mod summary;

pub use category::ExpenseCategory;
pub use common::{parse_amount, sanitize_amount, Amounted, Displayable, Identifiable};
pub use expense::{Expense, ExpenseDraft};
pub use income::{Income, IncomeEntry};
pub use recurring::{Frequency, RecurringExpense};
pub use savings::{GoalPriority, SavingsGoal};
pub use summary::{SummarySnapshot, SUMMARY_PERIOD_LABEL};
