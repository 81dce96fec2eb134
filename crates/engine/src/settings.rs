//! Per-user budget settings.
//!
//! One row per owner, holding an optional monthly budget and an optional
//! saving goal. There is no history: last write wins, and a partial update
//! must never clobber the field it does not carry.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::AmountMinor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserSettings {
    pub monthly_budget: Option<AmountMinor>,
    pub saving_goal: Option<AmountMinor>,
}

/// Merge-write payload: `Some` sets a field, `None` keeps the stored value.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettingsPatch {
    pub monthly_budget: Option<AmountMinor>,
    pub saving_goal: Option<AmountMinor>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub owner_id: String,
    pub monthly_budget_minor: Option<i64>,
    pub saving_goal_minor: Option<i64>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for UserSettings {
    fn from(model: &Model) -> Self {
        Self {
            monthly_budget: model.monthly_budget_minor.map(AmountMinor::new),
            saving_goal: model.saving_goal_minor.map(AmountMinor::new),
        }
    }
}

impl Model {
    pub fn fresh(owner_id: &str, patch: SettingsPatch, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            owner_id: ActiveValue::Set(owner_id.to_string()),
            monthly_budget_minor: ActiveValue::Set(patch.monthly_budget.map(AmountMinor::minor)),
            saving_goal_minor: ActiveValue::Set(patch.saving_goal.map(AmountMinor::minor)),
            updated_at: ActiveValue::Set(now),
        }
    }
}
