//! Per-user settings operations: point read and merge-write.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{ResultStore, SettingsPatch, UserSettings, settings};

use super::{Engine, with_tx};

impl Engine {
    /// Reads the owner's settings; an absent row reads as both fields unset.
    pub async fn user_settings(&self, owner_id: &str) -> ResultStore<UserSettings> {
        let model = settings::Entity::find_by_id(owner_id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.as_ref().map(UserSettings::from).unwrap_or_default())
    }

    /// Merge-writes the owner's settings: fields absent from the patch keep
    /// their stored value. Last write wins; no history.
    pub async fn update_user_settings(
        &self,
        owner_id: &str,
        patch: SettingsPatch,
    ) -> ResultStore<UserSettings> {
        let now = Utc::now();

        let updated = with_tx!(self, |tx| {
            match settings::Entity::find_by_id(owner_id.to_string())
                .one(&tx)
                .await?
            {
                Some(existing) => {
                    let mut active: settings::ActiveModel = existing.into();
                    if let Some(budget) = patch.monthly_budget {
                        active.monthly_budget_minor = ActiveValue::Set(Some(budget.minor()));
                    }
                    if let Some(goal) = patch.saving_goal {
                        active.saving_goal_minor = ActiveValue::Set(Some(goal.minor()));
                    }
                    active.updated_at = ActiveValue::Set(now);
                    active.update(&tx).await.map_err(crate::StoreError::from)
                }
                None => settings::Model::fresh(owner_id, patch, now)
                    .insert(&tx)
                    .await
                    .map_err(crate::StoreError::from),
            }
        })?;

        Ok(UserSettings::from(&updated))
    }
}
