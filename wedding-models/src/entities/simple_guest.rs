use crate::enums::common::Attendance;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "simple_guests")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub attendance: Attendance,
    pub plus_ones: i32,
    pub notes: Option<String>,
    /// Code of the invitation this guest belongs to
    pub invitation_code: Option<String>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Confirmed guests count themselves plus their plus-ones.
    pub fn headcount(&self) -> i64 {
        match self.attendance {
            Attendance::Yes => 1 + i64::from(self.plus_ones),
            _ => 0,
        }
    }
}
