//! Expense record primitives.
//!
//! An `Expense` is an immutable record scoped to one owner: it is created by
//! the add-expense form, listed and deleted, never updated in place.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AmountMinor, Category, PaymentMethod, StoreError};

/// Raw add-expense form fields, validated by [`Expense::new`] before any
/// write reaches the store.
#[derive(Clone, Debug, Default)]
pub struct NewExpense {
    pub title: String,
    /// Canonical category string, see [`Category`].
    pub category: String,
    /// Decimal form input, parsed into minor units.
    pub amount: String,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub category: Category,
    pub amount: AmountMinor,
    /// User-entered calendar date. Optional on stored rows (legacy records
    /// predate the field), required on create.
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    /// Store-assigned creation time.
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Builds a validated expense from form fields.
    ///
    /// Required: non-empty title, known category, non-negative parseable
    /// amount and a calendar date. Empty optional strings are treated as
    /// absent, matching the form's blank fields.
    pub fn new(
        owner_id: &str,
        fields: NewExpense,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let title = fields.title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("title is required".to_string()));
        }
        let category = Category::try_from(fields.category.as_str())?;
        let amount: AmountMinor = fields.amount.parse()?;
        let Some(date) = fields.date else {
            return Err(StoreError::Validation("date is required".to_string()));
        };

        let notes = fields
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let payment_method = match fields.payment_method.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(PaymentMethod::try_from(raw)?),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            category,
            amount,
            date: Some(date),
            notes,
            payment_method,
            created_at,
        })
    }

    /// Date used for monthly bucketing: the explicit user-entered date when
    /// present, else the day the record was created.
    pub fn effective_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| self.created_at.date_naive())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub category: String,
    pub amount_minor: i64,
    pub date: Option<Date>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            owner_id: ActiveValue::Set(expense.owner_id.clone()),
            title: ActiveValue::Set(expense.title.clone()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            date: ActiveValue::Set(expense.date),
            notes: ActiveValue::Set(expense.notes.clone()),
            payment_method: ActiveValue::Set(
                expense.payment_method.map(|m| m.as_str().to_string()),
            ),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| StoreError::KeyNotFound("expense not exists".to_string()))?,
            owner_id: model.owner_id,
            title: model.title,
            category: Category::try_from(model.category.as_str())?,
            amount: AmountMinor::new(model.amount_minor),
            date: model.date,
            notes: model.notes,
            payment_method: match model.payment_method.as_deref() {
                None => None,
                Some(raw) => Some(PaymentMethod::try_from(raw)?),
            },
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> NewExpense {
        NewExpense {
            title: "Groceries".to_string(),
            category: "food_dining".to_string(),
            amount: "450.50".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 15),
            notes: Some("weekly run".to_string()),
            payment_method: Some("upi".to_string()),
        }
    }

    #[test]
    fn new_builds_a_validated_record() {
        let expense = Expense::new("alice", fields(), Utc::now()).unwrap();
        assert_eq!(expense.owner_id, "alice");
        assert_eq!(expense.category, Category::FoodDining);
        assert_eq!(expense.amount.minor(), 45050);
        assert_eq!(expense.payment_method, Some(PaymentMethod::Upi));
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut f = fields();
        f.title = "   ".to_string();
        assert!(matches!(
            Expense::new("alice", f, Utc::now()),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn missing_date_is_rejected() {
        let mut f = fields();
        f.date = None;
        assert!(matches!(
            Expense::new("alice", f, Utc::now()),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut f = fields();
        f.amount = "-3".to_string();
        assert!(Expense::new("alice", f, Utc::now()).is_err());
    }

    #[test]
    fn blank_optionals_become_absent() {
        let mut f = fields();
        f.notes = Some("  ".to_string());
        f.payment_method = Some(String::new());
        let expense = Expense::new("alice", f, Utc::now()).unwrap();
        assert_eq!(expense.notes, None);
        assert_eq!(expense.payment_method, None);
    }

    #[test]
    fn effective_date_falls_back_to_creation_day() {
        let created = "2026-08-03T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let mut expense = Expense::new("alice", fields(), created).unwrap();
        assert_eq!(
            expense.effective_date(),
            NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
        );
        expense.date = None;
        assert_eq!(
            expense.effective_date(),
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
        );
    }
}
