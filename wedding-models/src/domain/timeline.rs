use crate::entities::timeline_event::ActiveModel;
use chrono::{DateTime, Utc};
use sea_orm::DeriveIntoActiveModel;
use serde::Deserialize;
use validator::Validate;

fn default_visible() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTimelineEvent {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 512))]
    pub image_url: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimelineEvent {
    pub id: i32,
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 512))]
    pub image_url: Option<String>,
    pub visible: bool,
    pub sort_order: i32,
}
