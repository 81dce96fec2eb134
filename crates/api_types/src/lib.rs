use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Signup {
        pub username: String,
        pub password: String,
    }

    /// Request body for starting a password reset.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetRequest {
        pub username: String,
    }

    /// Request body for completing a password reset.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetConfirm {
        pub username: String,
        pub code: String,
        pub new_password: String,
    }
}

pub mod expense {
    use super::*;

    /// Request body for recording an expense.
    ///
    /// `amount` is a decimal string ("150" or "99.50"); the server parses and
    /// validates it. `date` is the day the expense belongs to.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: String,
        pub category: String,
        pub amount: String,
        pub date: Option<NaiveDate>,
        pub notes: Option<String>,
        pub payment_method: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub title: String,
        pub category: String,
        pub amount_minor: i64,
        pub date: Option<NaiveDate>,
        pub notes: Option<String>,
        pub payment_method: Option<String>,
        /// RFC3339 timestamp (UTC).
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }
}

pub mod settings {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettingsView {
        pub monthly_budget_minor: Option<i64>,
        pub saving_goal_minor: Option<i64>,
    }

    /// Partial update: absent fields keep their stored value.
    ///
    /// Amounts are decimal strings, parsed server-side like expense amounts.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SettingsUpdate {
        pub monthly_budget: Option<String>,
        pub saving_goal: Option<String>,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub total_expenses_minor: i64,
        pub adjusted_budget_minor: i64,
        pub remaining_budget_minor: i64,
        pub budget_usage_percent: f64,
        pub daily_average_minor: i64,
    }
}
