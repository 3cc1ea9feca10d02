pub mod admin_user;
pub mod cms_document;
pub mod invitation;
pub mod media_item;
pub mod prelude;
pub mod simple_guest;
pub mod timeline_event;
