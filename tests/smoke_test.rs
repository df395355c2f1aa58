use std::sync::Arc;

use expense_core::{
    ai::{AiError, CompletionRequest, FallbackChain, InsightAssistant, InsightProvider},
    config::AiSettings,
    core::{FinanceTracker, FixedClock},
    domain::{ExpenseCategory, ExpenseDraft},
    init,
    storage::MemoryStore,
};

mod common;
use common::at;

struct Offline;

impl InsightProvider for Offline {
    fn name(&self) -> &str {
        "gemini"
    }

    fn complete(&self, _request: &CompletionRequest) -> Result<String, AiError> {
        Err(AiError::Unavailable {
            provider: "gemini".into(),
            message: "offline".into(),
        })
    }
}

struct Echo;

impl InsightProvider for Echo {
    fn name(&self) -> &str {
        "groq"
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        Ok(format!("echo: {}", request.prompt.lines().next().unwrap_or_default()))
    }
}

#[test]
fn tracker_and_assistant_smoke() {
    init();

    let clock = FixedClock::new(at(2025, 1, 6, 10));
    let mut tracker =
        FinanceTracker::open_with(MemoryStore::new(), Arc::new(clock), 200.0).unwrap();
    tracker.add_income(1000.0).unwrap();
    for _ in 0..7 {
        tracker
            .add_expense(ExpenseDraft::new(100.0, ExpenseCategory::Food))
            .unwrap();
    }
    assert_eq!(tracker.current_balance(), 300.0);

    let chain = FallbackChain::new()
        .with_provider(Box::new(Echo))
        .with_provider(Box::new(Offline))
        .ordered_by(&["gemini".to_string(), "groq".to_string()]);
    assert_eq!(chain.names(), vec!["gemini", "groq"]);

    let assistant = InsightAssistant::new(chain, AiSettings::default(), "₹");
    let stability = assistant.stability(tracker.expenses()).unwrap();
    assert_eq!(stability.score, 100);
    assert_eq!(stability.explanation, "echo: Analyze financial stability:");
}
