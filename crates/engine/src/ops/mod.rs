use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sea_orm::DatabaseConnection;
use tokio::sync::watch;

use crate::ExpenseSnapshot;

mod expenses;
mod settings;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The store engine: owns the database handle and the per-owner live feeds.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    feeds: Mutex<HashMap<String, watch::Sender<ExpenseSnapshot>>>,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn feeds_lock(&self) -> MutexGuard<'_, HashMap<String, watch::Sender<ExpenseSnapshot>>> {
        self.feeds.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            feeds: Mutex::new(HashMap::new()),
        }
    }
}
