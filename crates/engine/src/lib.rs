pub use categories::{Category, PaymentMethod};
pub use error::StoreError;
pub use expenses::{Expense, NewExpense};
pub use feed::{ExpenseFeed, ExpenseSnapshot};
pub use money::AmountMinor;
pub use ops::{Engine, EngineBuilder};
pub use settings::{SettingsPatch, UserSettings};
pub use summary::{MonthlySummary, monthly_summary};

mod categories;
mod error;
pub mod expenses;
mod feed;
mod money;
mod ops;
pub mod settings;
pub mod summary;

type ResultStore<T> = Result<T, StoreError>;
