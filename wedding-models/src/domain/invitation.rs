use super::common::PageParams;
use crate::{
    entities::invitation::{ActiveModel, Model as InvitationModel},
    enums::common::{Attendance, Relationship},
};
use chrono::{DateTime, Utc};
use sea_orm::DeriveIntoActiveModel;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Page query parameters for invitation listing
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvitationPageParams {
    /// Fuzzy search by guest name
    pub guest_name: Option<String>,
    /// Fuzzy search by code
    pub code: Option<String>,
    pub relationship: Option<Relationship>,
    pub attendance: Option<Attendance>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
}

fn default_party_size() -> i32 {
    1
}

/// Payload to create an invitation. A code is generated when none is given.
#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewInvitation {
    #[validate(length(min = 4, max = 32, message = "code must be 4 to 32 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 128, message = "guestName is required"))]
    pub guest_name: String,
    #[validate(length(max = 128))]
    pub partner_name: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[serde(default)]
    pub relationship: Relationship,
    #[serde(default = "default_party_size")]
    #[validate(range(min = 1, max = 50, message = "partySize must be between 1 and 50"))]
    pub party_size: i32,
    #[validate(range(min = 1))]
    pub table_number: Option<i32>,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

/// Full replacement of the admin-editable invitation fields
#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvitation {
    pub id: i32,
    #[validate(length(min = 4, max = 32, message = "code must be 4 to 32 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 128, message = "guestName is required"))]
    pub guest_name: String,
    #[validate(length(max = 128))]
    pub partner_name: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    pub relationship: Relationship,
    #[validate(range(min = 1, max = 50, message = "partySize must be between 1 and 50"))]
    pub party_size: i32,
    pub attendance: Attendance,
    #[validate(range(min = 0, max = 50))]
    pub confirmed_party_size: Option<i32>,
    #[validate(range(min = 1))]
    pub table_number: Option<i32>,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
    #[validate(length(max = 500))]
    pub dietary_notes: Option<String>,
    pub rsvp_completed: bool,
    pub gift_completed: bool,
    pub photo_completed: bool,
}

/// What a guest sees when opening their invitation link
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicInvitation {
    pub code: String,
    pub guest_name: String,
    pub partner_name: Option<String>,
    pub party_size: i32,
    pub attendance: Attendance,
    pub confirmed_party_size: Option<i32>,
    pub dietary_notes: Option<String>,
    pub message: Option<String>,
    pub rsvp_completed: bool,
    pub gift_completed: bool,
    pub photo_completed: bool,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<InvitationModel> for PublicInvitation {
    fn from(m: InvitationModel) -> Self {
        Self {
            code: m.code,
            guest_name: m.guest_name,
            partner_name: m.partner_name,
            party_size: m.party_size,
            attendance: m.attendance,
            confirmed_party_size: m.confirmed_party_size,
            dietary_notes: m.dietary_notes,
            message: m.message,
            rsvp_completed: m.rsvp_completed,
            gift_completed: m.gift_completed,
            photo_completed: m.photo_completed,
            responded_at: m.responded_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    #[validate(required(message = "attending is required"))]
    pub attending: Option<bool>,
    #[validate(range(min = 1, message = "partySize must be at least 1"))]
    pub party_size: Option<i32>,
    #[validate(length(max = 500))]
    pub dietary_notes: Option<String>,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

impl RsvpRequest {
    /// Seats being confirmed: the requested size, one by default, none when declining.
    pub fn confirmed_party_size(&self) -> i32 {
        if self.attending.unwrap_or(false) {
            self.party_size.unwrap_or(1)
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelfRegistration {
    #[validate(length(min = 1, max = 128, message = "guestName is required"))]
    pub guest_name: String,
    #[validate(length(max = 128))]
    pub partner_name: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    pub relationship: Option<Relationship>,
    #[validate(range(min = 1, message = "partySize must be at least 1"))]
    pub party_size: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfRegistrationResponse {
    pub code: String,
    pub guest_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_invitation_defaults() {
        let new: NewInvitation = serde_json::from_value(json!({"guestName": "Ada"})).unwrap();
        assert_eq!(new.party_size, 1);
        assert_eq!(new.relationship, Relationship::Other);
        assert!(new.code.is_none());
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_new_invitation_rejects_bad_email_and_party_size() {
        let new: NewInvitation = serde_json::from_value(json!({
            "guestName": "Ada",
            "email": "not-an-email",
            "partySize": 0
        }))
        .unwrap();
        let errors = new.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("party_size"));
    }

    #[test]
    fn test_rsvp_confirmed_party_size() {
        let yes: RsvpRequest = serde_json::from_value(json!({"attending": true})).unwrap();
        assert_eq!(yes.confirmed_party_size(), 1);
        let no: RsvpRequest =
            serde_json::from_value(json!({"attending": false, "partySize": 3})).unwrap();
        assert_eq!(no.confirmed_party_size(), 0);
        let missing: RsvpRequest = serde_json::from_value(json!({})).unwrap();
        assert!(missing.validate().is_err());
    }
}
