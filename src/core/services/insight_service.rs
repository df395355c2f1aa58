//! Statistical insight metrics: anomalies, stability, trend, and spending buckets.
//!
//! Every function here is pure over an expense snapshot. Minimum sample sizes are
//! enforced by returning placeholder results instead of failing.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::{Amounted, Expense};

use super::BalanceService;

pub const ANOMALY_MIN_SAMPLES: usize = 5;
pub const STABILITY_MIN_SAMPLES: usize = 7;
pub const BEHAVIOR_MIN_SAMPLES: usize = 10;
pub const TREND_MIN_SAMPLES: usize = 14;
pub const PREDICTION_WINDOW: usize = 14;
pub const DEFAULT_STABILITY_SCORE: u8 = 50;
/// Deviations beyond this many standard deviations are flagged.
pub const ANOMALY_SIGMA: f64 = 2.0;

pub const ANOMALY_INSUFFICIENT_MESSAGE: &str =
    "You need at least 5 transactions to detect spending anomalies. Keep tracking your expenses.";
pub const ANOMALY_NONE_MESSAGE: &str = "Your spending is consistent with no unusual transactions detected. Great job maintaining regular spending patterns!";
pub const STABILITY_INSUFFICIENT_MESSAGE: &str = "Insufficient data for stability analysis. Please track expenses for at least one week to get an accurate stability score.";
pub const BEHAVIOR_INSUFFICIENT_MESSAGE: &str = "Need at least 10 transactions to analyze your spending behavior. Continue tracking to unlock this insight.";
pub const PATTERNS_EMPTY_MESSAGE: &str = "You don't have enough transaction data yet. Start tracking your expenses to get personalized insights.";
pub const PREDICTION_EMPTY_MESSAGE: &str = "Insufficient data for predictions. Please track expenses for at least 2 weeks to get accurate forecasts.";

/// Weekday order used by every day-of-week breakdown.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Full English weekday name, as used in reports.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Mean and population standard deviation of expense amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl AmountStats {
    pub fn from_expenses(expenses: &[Expense]) -> Option<Self> {
        if expenses.is_empty() {
            return None;
        }
        let count = expenses.len();
        let mean = BalanceService::total_expenses(expenses) / count as f64;
        let variance = expenses
            .iter()
            .map(|expense| (expense.amount() - mean).powi(2))
            .sum::<f64>()
            / count as f64;
        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Standard deviation over mean. Zero when the mean is zero.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnomalyReport {
    /// Fewer than [`ANOMALY_MIN_SAMPLES`] expenses.
    InsufficientData,
    Consistent(AmountStats),
    Found {
        stats: AmountStats,
        anomalies: Vec<Expense>,
    },
}

impl AnomalyReport {
    pub fn anomalies(&self) -> &[Expense] {
        match self {
            AnomalyReport::Found { anomalies, .. } => anomalies,
            _ => &[],
        }
    }

    pub fn stats(&self) -> Option<AmountStats> {
        match self {
            AnomalyReport::InsufficientData => None,
            AnomalyReport::Consistent(stats) | AnomalyReport::Found { stats, .. } => Some(*stats),
        }
    }

    /// Fixed informational text for reports that need no further analysis.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AnomalyReport::InsufficientData => Some(ANOMALY_INSUFFICIENT_MESSAGE),
            AnomalyReport::Consistent(_) => Some(ANOMALY_NONE_MESSAGE),
            AnomalyReport::Found { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityScore {
    pub score: u8,
    /// `None` when there were too few samples to compute one.
    pub stats: Option<AmountStats>,
    pub message: Option<&'static str>,
}

impl StabilityScore {
    pub fn is_provisional(&self) -> bool {
        self.stats.is_none()
    }

    pub fn coefficient_of_variation(&self) -> Option<f64> {
        self.stats.map(|stats| stats.coefficient_of_variation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning (6AM-12PM)",
            TimeOfDay::Afternoon => "Afternoon (12PM-6PM)",
            TimeOfDay::Evening => "Evening (6PM-10PM)",
            TimeOfDay::Night => "Night (10PM-6AM)",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count and total of the expenses that landed in one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpendBucket {
    pub count: usize,
    pub total: f64,
}

impl SpendBucket {
    fn record(&mut self, amount: f64) {
        self.count += 1;
        self.total += amount;
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorProfile {
    InsufficientData,
    Profile {
        transactions: usize,
        average: f64,
        highest_day: (Weekday, f64),
        lowest_day: (Weekday, f64),
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendingForecast {
    pub recent_total: f64,
    pub average_daily: f64,
    pub projected: f64,
    pub days: u32,
    /// Percentage change between halves; see [`InsightService::trend`].
    pub trend: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitLevel {
    Safe,
    Caution,
    Exceeded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitProgress {
    pub spent: f64,
    pub limit: f64,
    /// Share of the limit used, capped at 100.
    pub percent: f64,
    pub level: LimitLevel,
}

pub struct InsightService;

impl InsightService {
    /// Flags expenses more than two standard deviations from the mean.
    pub fn detect_anomalies(expenses: &[Expense]) -> AnomalyReport {
        if expenses.len() < ANOMALY_MIN_SAMPLES {
            return AnomalyReport::InsufficientData;
        }
        let Some(stats) = AmountStats::from_expenses(expenses) else {
            return AnomalyReport::InsufficientData;
        };
        let threshold = ANOMALY_SIGMA * stats.std_dev;
        let anomalies: Vec<Expense> = expenses
            .iter()
            .filter(|expense| (expense.amount() - stats.mean).abs() > threshold)
            .cloned()
            .collect();
        if anomalies.is_empty() {
            AnomalyReport::Consistent(stats)
        } else {
            AnomalyReport::Found { stats, anomalies }
        }
    }

    /// Score in `0..=100` derived from the coefficient of variation; lower dispersion scores higher.
    pub fn stability_score(expenses: &[Expense]) -> StabilityScore {
        let stats = if expenses.len() < STABILITY_MIN_SAMPLES {
            None
        } else {
            AmountStats::from_expenses(expenses)
        };
        match stats {
            Some(stats) => {
                let raw = 100.0 - stats.coefficient_of_variation() * 100.0;
                StabilityScore {
                    score: raw.clamp(0.0, 100.0).round() as u8,
                    stats: Some(stats),
                    message: None,
                }
            }
            None => StabilityScore {
                score: DEFAULT_STABILITY_SCORE,
                stats: None,
                message: Some(STABILITY_INSUFFICIENT_MESSAGE),
            },
        }
    }

    /// Percentage change of the mean amount from the older half to the newer half.
    ///
    /// Returns zero below [`TREND_MIN_SAMPLES`] expenses or when the older half averages zero.
    pub fn trend(expenses: &[Expense]) -> f64 {
        if expenses.len() < TREND_MIN_SAMPLES {
            return 0.0;
        }
        let mut sorted = expenses.to_vec();
        sorted.sort_by_key(|expense| expense.date);
        let (first, second) = sorted.split_at(sorted.len() / 2);
        let first_avg = BalanceService::total_expenses(first) / first.len() as f64;
        let second_avg = BalanceService::total_expenses(second) / second.len() as f64;
        if first_avg == 0.0 {
            return 0.0;
        }
        (second_avg - first_avg) / first_avg * 100.0
    }

    pub fn by_time_of_day(expenses: &[Expense]) -> Vec<(TimeOfDay, SpendBucket)> {
        let mut buckets = [SpendBucket::default(); 4];
        for expense in expenses {
            let slot = TimeOfDay::from_hour(expense.hour());
            let index = TimeOfDay::ALL
                .iter()
                .position(|candidate| *candidate == slot)
                .unwrap_or(3);
            buckets[index].record(expense.amount());
        }
        TimeOfDay::ALL.into_iter().zip(buckets).collect()
    }

    /// Buckets ordered Sunday through Saturday.
    pub fn by_day_of_week(expenses: &[Expense]) -> Vec<(Weekday, SpendBucket)> {
        let mut buckets = [SpendBucket::default(); 7];
        for expense in expenses {
            let index = expense.date.weekday().num_days_from_sunday() as usize;
            buckets[index].record(expense.amount());
        }
        WEEKDAYS.into_iter().zip(buckets).collect()
    }

    /// Total divided by the inclusive span of days between the first and last expense.
    pub fn average_daily_spend(expenses: &[Expense]) -> f64 {
        let total = BalanceService::total_expenses(expenses);
        let (Some(first), Some(last)) = (
            expenses.iter().map(|expense| expense.date).min(),
            expenses.iter().map(|expense| expense.date).max(),
        ) else {
            return 0.0;
        };
        let seconds = (last - first).num_seconds();
        let span_days = (seconds + 86_399).div_euclid(86_400) + 1;
        total / span_days.max(1) as f64
    }

    pub fn behavior_profile(expenses: &[Expense]) -> BehaviorProfile {
        if expenses.len() < BEHAVIOR_MIN_SAMPLES {
            return BehaviorProfile::InsufficientData;
        }
        let buckets = Self::by_day_of_week(expenses);
        let mut highest = (buckets[0].0, buckets[0].1.total);
        let mut lowest = highest;
        for (day, bucket) in buckets.iter().skip(1) {
            if bucket.total > highest.1 {
                highest = (*day, bucket.total);
            }
            if bucket.total < lowest.1 {
                lowest = (*day, bucket.total);
            }
        }
        BehaviorProfile::Profile {
            transactions: expenses.len(),
            average: BalanceService::total_expenses(expenses) / expenses.len() as f64,
            highest_day: highest,
            lowest_day: lowest,
        }
    }

    /// Projects spending over `days` from the most recent fourteen entries.
    pub fn predict_spending(expenses: &[Expense], days: u32) -> Option<SpendingForecast> {
        if expenses.is_empty() {
            return None;
        }
        let recent = &expenses[expenses.len().saturating_sub(PREDICTION_WINDOW)..];
        let recent_total = BalanceService::total_expenses(recent);
        let average_daily = recent_total / PREDICTION_WINDOW as f64;
        Some(SpendingForecast {
            recent_total,
            average_daily,
            projected: average_daily * f64::from(days),
            days,
            trend: Self::trend(expenses),
        })
    }

    /// Per-day totals for the `days` days ending on `today`, oldest first.
    pub fn daily_series(expenses: &[Expense], today: NaiveDate, days: u32) -> Vec<(NaiveDate, f64)> {
        let totals = BalanceService::daily_totals(expenses);
        (0..i64::from(days))
            .rev()
            .map(|offset| {
                let day = today - Duration::days(offset);
                (day, totals.get(&day).copied().unwrap_or(0.0))
            })
            .collect()
    }

    /// Running cumulative totals of a daily series.
    pub fn velocity(series: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, f64)> {
        series
            .iter()
            .scan(0.0, |running, (day, amount)| {
                *running += amount;
                Some((*day, *running))
            })
            .collect()
    }

    pub fn limit_progress(spent: f64, limit: f64) -> LimitProgress {
        let percent = if limit > 0.0 {
            (spent / limit * 100.0).min(100.0)
        } else {
            100.0
        };
        let level = if percent > 80.0 {
            LimitLevel::Exceeded
        } else if percent > 50.0 {
            LimitLevel::Caution
        } else {
            LimitLevel::Safe
        };
        LimitProgress {
            spent,
            limit,
            percent,
            level,
        }
    }
}
