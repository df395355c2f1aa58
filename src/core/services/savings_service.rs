use chrono::NaiveDateTime;

use crate::core::errors::FinanceError;
use crate::domain::SavingsGoal;

use super::{next_record_id, position_by_id, require_positive, ServiceResult};

pub struct SavingsService;

impl SavingsService {
    pub fn add(
        goals: &mut Vec<SavingsGoal>,
        mut goal: SavingsGoal,
        now: NaiveDateTime,
    ) -> ServiceResult<i64> {
        Self::validate(&goal)?;
        goal.id = next_record_id(goals.iter().map(|existing| existing.id), now);
        let id = goal.id;
        goals.push(goal);
        Ok(id)
    }

    pub fn edit(goals: &mut [SavingsGoal], id: i64, changes: SavingsGoal) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let goal = goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or(FinanceError::GoalNotFound(id))?;
        *goal = SavingsGoal { id, ..changes };
        Ok(())
    }

    pub fn remove(goals: &mut Vec<SavingsGoal>, id: i64) -> ServiceResult<SavingsGoal> {
        let position = position_by_id(goals, id).ok_or(FinanceError::GoalNotFound(id))?;
        Ok(goals.remove(position))
    }

    /// Adds `amount` to the saved balance and returns the new progress percentage.
    pub fn add_progress(goals: &mut [SavingsGoal], id: i64, amount: f64) -> ServiceResult<f64> {
        let amount = require_positive(amount, "Contribution")?;
        let goal = goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or(FinanceError::GoalNotFound(id))?;
        goal.current_amount += amount;
        Ok(goal.progress_percent())
    }

    fn validate(goal: &SavingsGoal) -> ServiceResult<()> {
        if goal.name.trim().is_empty() {
            return Err(FinanceError::InvalidInput("Goal name cannot be empty".into()));
        }
        require_positive(goal.target_amount, "Target amount")?;
        if !goal.current_amount.is_finite() || goal.current_amount < 0.0 {
            return Err(FinanceError::InvalidInput(
                "Current amount cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn goal_lifecycle() {
        let mut goals = Vec::new();
        let id = SavingsService::add(&mut goals, SavingsGoal::new(0, "Bike", 400.0), now()).unwrap();
        let progress = SavingsService::add_progress(&mut goals, id, 100.0).unwrap();
        assert_eq!(progress, 25.0);

        let mut changes = goals[0].clone();
        changes.name = "E-bike".into();
        changes.id = 999;
        SavingsService::edit(&mut goals, id, changes).unwrap();
        assert_eq!(goals[0].id, id);
        assert_eq!(goals[0].name, "E-bike");

        SavingsService::remove(&mut goals, id).unwrap();
        assert!(goals.is_empty());
    }

    #[test]
    fn rejects_blank_names_and_bad_targets() {
        let mut goals = Vec::new();
        assert!(SavingsService::add(&mut goals, SavingsGoal::new(0, " ", 10.0), now()).is_err());
        assert!(SavingsService::add(&mut goals, SavingsGoal::new(0, "Trip", 0.0), now()).is_err());
        assert!(matches!(
            SavingsService::add_progress(&mut goals, 7, 5.0),
            Err(FinanceError::GoalNotFound(7))
        ));
    }
}
