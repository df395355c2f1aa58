use chrono::NaiveDate;

use crate::config::AiSettings;
use crate::core::services::{
    insight_service::{
        BEHAVIOR_INSUFFICIENT_MESSAGE, PATTERNS_EMPTY_MESSAGE, PREDICTION_EMPTY_MESSAGE,
    },
    AnomalyReport, BehaviorProfile, InsightService, MonthlyReport, SafeToSpend,
    SafeToSpendService,
};
use crate::domain::{Amounted, Expense, Income};

use super::{AiError, CompletionRequest, InsightProvider, PromptBuilder};

/// Stability score paired with its narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityInsight {
    pub score: u8,
    pub explanation: String,
}

/// Computes each metric locally, then asks the provider to narrate it.
///
/// Small samples never reach the provider; they get the fixed guidance messages instead.
pub struct InsightAssistant<P: InsightProvider> {
    provider: P,
    settings: AiSettings,
    prompts: PromptBuilder,
}

impl<P: InsightProvider> InsightAssistant<P> {
    pub fn new(provider: P, settings: AiSettings, currency_symbol: &str) -> Self {
        Self {
            provider,
            settings,
            prompts: PromptBuilder::new(currency_symbol),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn ask(&self, prompt: String) -> Result<String, AiError> {
        self.provider
            .complete(&CompletionRequest::new(prompt, &self.settings))
    }

    pub fn financial_summary(&self, income: &Income, expenses: &[Expense]) -> Result<String, AiError> {
        self.ask(self.prompts.financial_summary(income.amount(), expenses))
    }

    pub fn overspending_patterns(&self, expenses: &[Expense]) -> Result<String, AiError> {
        if expenses.is_empty() {
            return Ok(PATTERNS_EMPTY_MESSAGE.to_string());
        }
        self.ask(self.prompts.overspending_patterns(expenses))
    }

    pub fn predict(&self, expenses: &[Expense], days: u32) -> Result<String, AiError> {
        match InsightService::predict_spending(expenses, days) {
            Some(forecast) => self.ask(self.prompts.prediction(&forecast)),
            None => Ok(PREDICTION_EMPTY_MESSAGE.to_string()),
        }
    }

    /// Returns the computed figures together with the narrative.
    pub fn safe_to_spend(
        &self,
        expenses: &[Expense],
        monthly_budget: f64,
        today: NaiveDate,
        daily_limit: f64,
    ) -> Result<(SafeToSpend, String), AiError> {
        let safe = SafeToSpendService::for_expenses(expenses, monthly_budget, today, daily_limit);
        let narrative = self.ask(self.prompts.safe_to_spend(&safe))?;
        Ok((safe, narrative))
    }

    pub fn anomalies(&self, expenses: &[Expense]) -> Result<String, AiError> {
        match InsightService::detect_anomalies(expenses) {
            AnomalyReport::Found { stats, anomalies } => {
                self.ask(self.prompts.anomalies(&stats, &anomalies))
            }
            report => Ok(report.message().unwrap_or_default().to_string()),
        }
    }

    pub fn stability(&self, expenses: &[Expense]) -> Result<StabilityInsight, AiError> {
        let result = InsightService::stability_score(expenses);
        let explanation = match (result.stats, result.message) {
            (Some(stats), _) => self.ask(self.prompts.stability(result.score, &stats))?,
            (None, message) => message.unwrap_or_default().to_string(),
        };
        Ok(StabilityInsight {
            score: result.score,
            explanation,
        })
    }

    pub fn behavior(&self, expenses: &[Expense]) -> Result<String, AiError> {
        match InsightService::behavior_profile(expenses) {
            BehaviorProfile::InsufficientData => Ok(BEHAVIOR_INSUFFICIENT_MESSAGE.to_string()),
            BehaviorProfile::Profile {
                transactions,
                average,
                highest_day,
                lowest_day,
            } => self.ask(
                self.prompts
                    .behavior(transactions, average, highest_day, lowest_day),
            ),
        }
    }

    pub fn monthly_report(&self, report: &MonthlyReport) -> Result<String, AiError> {
        self.ask(self.prompts.monthly_report(report))
    }

    pub fn chat(&self, question: &str, income: &Income, expenses: &[Expense]) -> Result<String, AiError> {
        self.ask(self.prompts.chat(question, income, expenses))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ai::testing::ScriptedProvider;
    use crate::ai::FallbackChain;
    use crate::core::services::insight_service::{
        ANOMALY_INSUFFICIENT_MESSAGE, ANOMALY_NONE_MESSAGE, STABILITY_INSUFFICIENT_MESSAGE,
    };
    use crate::domain::ExpenseCategory;

    fn expenses(amounts: &[f64]) -> Vec<Expense> {
        amounts
            .iter()
            .enumerate()
            .map(|(index, amount)| {
                let date = NaiveDate::from_ymd_opt(2024, 7, 1 + index as u32)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap();
                Expense::new(index as i64 + 1, *amount, ExpenseCategory::Food, date)
            })
            .collect()
    }

    fn assistant(reply: &str) -> (Arc<ScriptedProvider>, InsightAssistant<Arc<ScriptedProvider>>) {
        let provider = Arc::new(ScriptedProvider::ok("local", reply));
        let assistant = InsightAssistant::new(provider.clone(), AiSettings::default(), "₹");
        (provider, assistant)
    }

    #[test]
    fn small_samples_skip_the_provider() {
        let (provider, assistant) = assistant("narrative");
        let few = expenses(&[10.0, 12.0, 11.0]);
        assert_eq!(assistant.anomalies(&few).unwrap(), ANOMALY_INSUFFICIENT_MESSAGE);
        assert_eq!(assistant.behavior(&few).unwrap(), BEHAVIOR_INSUFFICIENT_MESSAGE);
        assert_eq!(assistant.overspending_patterns(&[]).unwrap(), PATTERNS_EMPTY_MESSAGE);
        assert_eq!(assistant.predict(&[], 7).unwrap(), PREDICTION_EMPTY_MESSAGE);
        let stability = assistant.stability(&few).unwrap();
        assert_eq!(stability.score, 50);
        assert_eq!(stability.explanation, STABILITY_INSUFFICIENT_MESSAGE);
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn consistent_spending_needs_no_narrative() {
        let (provider, assistant) = assistant("narrative");
        let steady = expenses(&[20.0; 6]);
        assert_eq!(assistant.anomalies(&steady).unwrap(), ANOMALY_NONE_MESSAGE);
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn sufficient_data_is_narrated() {
        let (provider, assistant) = assistant("Steady as a rock.");
        let steady = expenses(&[100.0; 7]);
        let stability = assistant.stability(&steady).unwrap();
        assert_eq!(stability.score, 100);
        assert_eq!(stability.explanation, "Steady as a rock.");
        assert!(provider.prompts.lock().unwrap()[0].contains("Stability Score: 100/100"));
    }

    #[test]
    fn provider_failures_propagate() {
        let assistant = InsightAssistant::new(FallbackChain::new(), AiSettings::default(), "₹");
        let income = Income::starting(
            NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        assert_eq!(
            assistant.chat("Can I afford a trip?", &income, &[]),
            Err(AiError::NotConfigured)
        );
    }
}
