//! Current-month derived metrics.
//!
//! A pure function of (expense list, budget, saving goal, "today"): no
//! caching, no incremental update. Callers recompute on every inbound list or
//! settings change, which is fine at personal-finance record counts.

use chrono::{Datelike, NaiveDate};

use crate::{AmountMinor, Expense, UserSettings};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthlySummary {
    /// Sum of amounts over records dated in `today`'s month.
    pub total_expenses: AmountMinor,
    /// `budget - saving_goal`; deliberately not floored, a negative value
    /// just short-circuits the usage percentage to 0.
    pub adjusted_budget: AmountMinor,
    /// `max(0, adjusted_budget - total_expenses)`.
    pub remaining_budget: AmountMinor,
    /// `total / adjusted * 100`, or 0 when the adjusted budget is zero or
    /// negative.
    pub budget_usage_percent: f64,
    /// `total / day_of_month(today)`, truncated to minor units.
    pub daily_average: AmountMinor,
}

/// Computes the dashboard figures for the calendar month containing `today`.
///
/// A record's effective date is its explicit date when present, else its
/// creation day ([`Expense::effective_date`]). Unset budget figures default
/// to 0.
pub fn monthly_summary(
    expenses: &[Expense],
    settings: UserSettings,
    today: NaiveDate,
) -> MonthlySummary {
    let in_month = |date: NaiveDate| date.year() == today.year() && date.month() == today.month();

    let total_expenses: AmountMinor = expenses
        .iter()
        .filter(|e| in_month(e.effective_date()))
        .map(|e| e.amount)
        .sum();

    let budget = settings.monthly_budget.unwrap_or_default();
    let saving_goal = settings.saving_goal.unwrap_or_default();
    let adjusted_budget = budget - saving_goal;

    let budget_usage_percent = if adjusted_budget.minor() > 0 {
        total_expenses.minor() as f64 / adjusted_budget.minor() as f64 * 100.0
    } else {
        0.0
    };

    let daily_average = AmountMinor::new(total_expenses.minor() / i64::from(today.day()));

    MonthlySummary {
        total_expenses,
        adjusted_budget,
        remaining_budget: adjusted_budget.saturating_remaining(total_expenses),
        budget_usage_percent,
        daily_average,
    }
}
