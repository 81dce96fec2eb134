//! The module contains the errors the store engine can throw.
//!
//! - [`Validation`] thrown when a submitted record fails the typed contract.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`ExistingKey`] thrown when a unique key is already taken.
//! - [`Unavailable`] wraps transport/database failures.
//!
//!  [`Validation`]: StoreError::Validation
//!  [`KeyNotFound`]: StoreError::KeyNotFound
//!  [`ExistingKey`]: StoreError::ExistingKey
//!  [`Unavailable`]: StoreError::Unavailable
use sea_orm::DbErr;
use thiserror::Error;

/// Store engine custom errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid record: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Unavailable(#[from] DbErr),
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Unavailable(a), Self::Unavailable(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
