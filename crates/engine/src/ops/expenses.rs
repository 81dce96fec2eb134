//! Expense record operations: add, list, delete, subscribe.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{Expense, ExpenseFeed, ExpenseSnapshot, NewExpense, ResultStore, expenses};

use super::Engine;

impl Engine {
    /// Validates and writes a new expense record for `owner_id`, stamping the
    /// store-side creation time, then publishes a fresh snapshot to the
    /// owner's feed.
    pub async fn add_expense(&self, owner_id: &str, fields: NewExpense) -> ResultStore<Expense> {
        let expense = Expense::new(owner_id, fields, Utc::now())?;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        self.publish_expenses(owner_id).await?;
        Ok(expense)
    }

    /// Full expense list for one owner, newest first (descending creation
    /// time, ties in store order).
    pub async fn expenses(&self, owner_id: &str) -> ResultStore<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::OwnerId.eq(owner_id))
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Expense::try_from).collect()
    }

    /// Deletes an expense record.
    ///
    /// Idempotent: deleting an absent or already-deleted id is absorbed
    /// silently. A snapshot is published only when a row was actually
    /// removed.
    pub async fn delete_expense(&self, owner_id: &str, expense_id: Uuid) -> ResultStore<()> {
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::OwnerId.eq(owner_id))
            .filter(expenses::Column::Id.eq(expense_id.to_string()))
            .exec(&self.database)
            .await?;

        if result.rows_affected > 0 {
            self.publish_expenses(owner_id).await?;
        }
        Ok(())
    }

    /// Opens a live subscription scoped to `owner_id`.
    ///
    /// The feed is primed with the current list and receives the full
    /// refreshed result set after every change by this owner. Dropping the
    /// feed cancels it; the sender is pruned once no receivers remain.
    pub async fn subscribe_expenses(&self, owner_id: &str) -> ResultStore<ExpenseFeed> {
        let snapshot: ExpenseSnapshot = Arc::new(self.expenses(owner_id).await?);

        let mut feeds = self.feeds_lock();
        let rx = match feeds.entry(owner_id.to_string()) {
            Entry::Occupied(entry) => {
                // Refresh so the new subscriber starts from the latest list;
                // existing subscribers just see one extra snapshot.
                entry.get().send_replace(snapshot);
                entry.get().subscribe()
            }
            Entry::Vacant(entry) => {
                let (tx, rx) = watch::channel(snapshot);
                entry.insert(tx);
                rx
            }
        };

        Ok(ExpenseFeed::new(rx))
    }

    /// Re-reads the owner's list and pushes it to the feed, if anyone is
    /// listening.
    async fn publish_expenses(&self, owner_id: &str) -> ResultStore<()> {
        let has_listeners = {
            let mut feeds = self.feeds_lock();
            match feeds.get(owner_id) {
                Some(tx) if tx.receiver_count() > 0 => true,
                Some(_) => {
                    feeds.remove(owner_id);
                    false
                }
                None => false,
            }
        };
        if !has_listeners {
            return Ok(());
        }

        let snapshot: ExpenseSnapshot = Arc::new(self.expenses(owner_id).await?);
        if let Some(tx) = self.feeds_lock().get(owner_id) {
            let _ = tx.send(snapshot);
        }
        Ok(())
    }
}
