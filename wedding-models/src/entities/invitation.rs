//! `SeaORM` Entity for guest invitations.
//!
//! One row per invitation link. Guests identify themselves with `code`;
//! the tracking columns are only written by the public invitation routes.

use crate::enums::common::{Attendance, Relationship};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invitations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub guest_name: String,
    pub partner_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Relationship,
    /// Seats offered on this invitation
    pub party_size: i32,
    pub attendance: Attendance,
    /// Seats the guest confirmed when answering
    pub confirmed_party_size: Option<i32>,
    pub rsvp_completed: bool,
    pub gift_completed: bool,
    pub photo_completed: bool,
    pub open_count: i32,
    pub first_opened_at: Option<DateTimeUtc>,
    pub last_opened_at: Option<DateTimeUtc>,
    pub message: Option<String>,
    pub dietary_notes: Option<String>,
    pub table_number: Option<i32>,
    pub self_registered: bool,
    pub responded_at: Option<DateTimeUtc>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Seats this invitation contributes to the expected headcount.
    pub fn headcount(&self) -> i64 {
        match self.attendance {
            Attendance::Yes => i64::from(self.confirmed_party_size.unwrap_or(1)),
            _ => 0,
        }
    }
}
