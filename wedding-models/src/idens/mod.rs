pub mod admin_user;
pub mod cms_document;
pub mod invitation;
pub mod media_item;
pub mod simple_guest;
pub mod timeline_event;

const INIT_SYSTEM_ORDER: i32 = 0;
const INIT_ADMIN_USER_ORDER: i32 = INIT_SYSTEM_ORDER + 1;

const INIT_GUEST_ORDER: i32 = 100;
const INIT_INVITATION_ORDER: i32 = INIT_GUEST_ORDER;
const INIT_SIMPLE_GUEST_ORDER: i32 = INIT_INVITATION_ORDER + 1;

const INIT_GALLERY_ORDER: i32 = 200;
const INIT_MEDIA_ITEM_ORDER: i32 = INIT_GALLERY_ORDER;
const INIT_TIMELINE_EVENT_ORDER: i32 = INIT_MEDIA_ITEM_ORDER + 1;

const INIT_CONTENT_ORDER: i32 = 300;
const INIT_CMS_DOCUMENT_ORDER: i32 = INIT_CONTENT_ORDER;
