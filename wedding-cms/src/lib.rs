//! Structured content model for the wedding site.
//!
//! Content types are declared once in [`Schema`]; every other module in this
//! crate reads from it.

mod catalog;
pub mod desk;
pub mod preview;
pub mod resolve;
pub mod schema;
pub mod validate;

pub use catalog::{NAVIGATION, PAGE, RSVP_SETTINGS, SITE_SETTINGS};
pub use desk::{desk_structure, DeskItem};
pub use preview::{PreviewValue, UNTITLED};
pub use resolve::{resolve_page, section_refs, ResolvedPage, ResolvedSection, RsvpWindow};
pub use schema::{DocumentKind, DocumentType, Field, FieldType, Preview, RuleValue, Rules, Schema};
pub use validate::{is_slug, slugify, ReferenceSite};
