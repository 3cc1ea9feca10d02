use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Zero ttl or an expiry instant that already passed
    #[error("invalid cache ttl: {0}")]
    InvalidTtl(String),
    #[error("cache error: {0}")]
    Msg(String),
    /// Cache was registered twice under the same name
    #[error("cache already exists: {0}")]
    AlreadyExists(String),
    #[error("cache not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug, Default)]
pub enum StorageError {
    #[error("database unavailable")]
    #[default]
    StorageUnavailable,

    #[error("database error: `{0}`")]
    DBError(#[from] sea_orm::DbErr),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Media file could not be written, read or removed
    #[error("media store error: {0}")]
    MediaStore(String),

    #[error("{0}")]
    CacheKind(#[from] CacheError),
}
