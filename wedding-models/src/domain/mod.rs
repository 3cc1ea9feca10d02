#[allow(clippy::needless_update)]
mod admin_user;
mod auth;
mod common;
#[allow(clippy::needless_update)]
mod content;
#[allow(clippy::needless_update)]
mod guest;
#[allow(clippy::needless_update)]
mod invitation;
#[allow(clippy::needless_update)]
mod media;
pub mod prelude;
mod stats;
#[allow(clippy::needless_update)]
mod timeline;
