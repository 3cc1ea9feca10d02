//! Database access, one repository per table.
//!
//! Every function takes the connection to run on, so callers decide whether a
//! call joins a transaction or runs on the pool.
pub mod admin_user;
pub mod content;
pub mod guest;
pub mod invitation;
pub mod media;
pub mod timeline;

pub use admin_user::AdminUserRepository;
pub use content::ContentRepository;
pub use guest::GuestRepository;
pub use invitation::InvitationRepository;
pub use media::MediaRepository;
pub use timeline::TimelineRepository;

use sea_orm::DeleteResult;
use wedding_error::{storage::StorageError, StorageResult};

/// Turns a delete that matched no row into `EntityNotFound`.
#[inline]
pub(crate) fn expect_deleted(result: DeleteResult, what: impl FnOnce() -> String) -> StorageResult<()> {
    if result.rows_affected == 0 {
        Err(StorageError::EntityNotFound(what()))
    } else {
        Ok(())
    }
}
