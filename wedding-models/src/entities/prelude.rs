pub use super::admin_user::{
    ActiveModel as AdminUserActiveModel, Column as AdminUserColumn, Entity as AdminUser,
    Model as AdminUserModel,
};
pub use super::cms_document::{
    ActiveModel as CmsDocumentActiveModel, Column as CmsDocumentColumn, Entity as CmsDocument,
    Model as CmsDocumentModel,
};
pub use super::invitation::{
    ActiveModel as InvitationActiveModel, Column as InvitationColumn, Entity as Invitation,
    Model as InvitationModel,
};
pub use super::media_item::{
    ActiveModel as MediaItemActiveModel, Column as MediaItemColumn, Entity as MediaItem,
    Model as MediaItemModel,
};
pub use super::simple_guest::{
    ActiveModel as SimpleGuestActiveModel, Column as SimpleGuestColumn, Entity as SimpleGuest,
    Model as SimpleGuestModel,
};
pub use super::timeline_event::{
    ActiveModel as TimelineEventActiveModel, Column as TimelineEventColumn,
    Entity as TimelineEvent, Model as TimelineEventModel,
};
