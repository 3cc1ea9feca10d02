use super::common::PageParams;
use crate::{entities::simple_guest::ActiveModel, enums::common::Attendance};
use sea_orm::DeriveIntoActiveModel;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestPageParams {
    /// Fuzzy search by name
    pub name: Option<String>,
    pub attendance: Option<Attendance>,
    pub invitation_code: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
}

#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[serde(default)]
    pub attendance: Attendance,
    #[serde(default)]
    #[validate(range(min = 0, max = 20, message = "plusOnes must be between 0 and 20"))]
    pub plus_ones: i32,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Must name an existing invitation when present
    pub invitation_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuest {
    pub id: i32,
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    pub attendance: Attendance,
    #[validate(range(min = 0, max = 20, message = "plusOnes must be between 0 and 20"))]
    pub plus_ones: i32,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    pub invitation_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
pub struct ChangeGuestAttendance {
    pub id: i32,
    pub attendance: Attendance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_guest_defaults_to_pending() {
        let guest: NewGuest = serde_json::from_value(json!({"name": "Grace"})).unwrap();
        assert_eq!(guest.attendance, Attendance::Pending);
        assert_eq!(guest.plus_ones, 0);
        assert!(guest.validate().is_ok());
    }

    #[test]
    fn test_negative_plus_ones_rejected() {
        let guest: NewGuest =
            serde_json::from_value(json!({"name": "Grace", "plusOnes": -1})).unwrap();
        assert!(guest.validate().is_err());
    }
}
