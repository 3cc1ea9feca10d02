pub mod cms;
pub mod init;
pub mod storage;
pub mod web;

use anyhow::Error as AnyhowError;
use cms::CmsError;
use config::ConfigError;
use init::InitContextError;
use sea_orm::{DbErr, TransactionError};
use serde_json::Error as SerdeJsonError;
use std::{error::Error as StdError, io::Error as IoError};
use storage::StorageError;
use thiserror::Error;
use web::WebError;

pub type WedResult<T, E = WedError> = anyhow::Result<T, E>;
pub type WebResult<T, E = WebError> = anyhow::Result<T, E>;
pub type StorageResult<T, E = StorageError> = Result<T, E>;
pub type CmsResult<T, E = CmsError> = Result<T, E>;

/// Top-level error for startup, shutdown and anything crossing crate lines.
///
/// Handlers convert it into [`WebError`] at the HTTP boundary.
#[derive(Error, Debug)]
pub enum WedError {
    #[error("{0}")]
    Error(String),
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    StorageError(#[from] StorageError),
    #[error("{0}")]
    InitContextError(#[from] InitContextError),
    #[error("{0}")]
    CmsError(#[from] CmsError),
    #[error("{0}")]
    WebError(#[from] WebError),
    /// Business rule rejected the input; surfaces as 400
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<String> for WedError {
    #[inline]
    fn from(e: String) -> Self {
        WedError::Msg(e)
    }
}

impl From<&str> for WedError {
    #[inline]
    fn from(e: &str) -> Self {
        WedError::Msg(e.to_string())
    }
}

impl From<DbErr> for WedError {
    #[inline]
    fn from(e: DbErr) -> Self {
        WedError::StorageError(StorageError::DBError(e))
    }
}

impl From<TransactionError<WedError>> for WedError {
    #[inline]
    fn from(e: TransactionError<WedError>) -> Self {
        match e {
            TransactionError::Connection(db) => db.into(),
            TransactionError::Transaction(inner) => inner,
        }
    }
}

impl From<Box<dyn StdError + Send + Sync>> for WedError {
    #[inline]
    fn from(e: Box<dyn StdError + Send + Sync>) -> Self {
        WedError::Error(e.to_string())
    }
}
