use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::domain::{
    admin_user::NewAdminUserWithId,
    auth::{Claims, LoginRequest, LoginResponse},
    common::{BatchDeletePayload, PageParams, PageResult},
    content::{DocumentQuery, DocumentSummary, NewCmsDocument, UpsertDocument},
    guest::{ChangeGuestAttendance, GuestPageParams, NewGuest, UpdateGuest},
    invitation::{
        InvitationPageParams, NewInvitation, PublicInvitation, RsvpRequest, SelfRegistration,
        SelfRegistrationResponse, UpdateInvitation,
    },
    media::{
        CategorySummary, ChangeMediaFlags, GalleryQuery, MediaInfo, Neighbors, NewMediaItem,
        UpdateMediaItem,
    },
    stats::{DashboardStats, GuestStats, InvitationStats},
    timeline::{NewTimelineEvent, UpdateTimelineEvent},
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PathId {
    pub id: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PathCode {
    pub code: String,
}
