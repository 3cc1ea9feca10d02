use crate::{
    entities::media_item::{ActiveModel, Model as MediaItemModel},
    enums::common::MediaKind,
};
use chrono::{DateTime, Utc};
use sea_orm::DeriveIntoActiveModel;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Row written after an upload has been stored on disk
#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct NewMediaItem {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub kind: MediaKind,
    pub file_name: String,
    pub original_name: String,
    pub mime: String,
    pub size_bytes: i64,
    pub featured: bool,
    pub visible: bool,
    pub sort_order: i32,
    pub uploaded_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaItem {
    pub id: i32,
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64, message = "category is required"))]
    pub category: String,
    pub sort_order: i32,
    pub taken_at: Option<DateTime<Utc>>,
}

/// Flags left out of the payload keep their current value
#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
pub struct ChangeMediaFlags {
    pub id: i32,
    pub featured: Option<bool>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

/// Media row plus the URL its file is served from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    #[serde(flatten)]
    pub item: MediaItemModel,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    /// File name of the first item in gallery order
    pub cover: Option<String>,
}

impl CategorySummary {
    /// One entry per category in first-seen order of `items`.
    pub fn summarize(items: &[MediaItemModel]) -> Vec<CategorySummary> {
        let mut summaries: Vec<CategorySummary> = Vec::new();
        for item in items {
            match summaries.iter_mut().find(|s| s.category == item.category) {
                Some(summary) => summary.count += 1,
                None => summaries.push(CategorySummary {
                    category: item.category.clone(),
                    count: 1,
                    cover: Some(item.file_name.clone()),
                }),
            }
        }
        summaries
    }
}

/// Lightbox position of one item among an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighbors {
    pub id: i32,
    pub previous: Option<i32>,
    pub next: Option<i32>,
    pub index: usize,
    pub total: usize,
}

impl Neighbors {
    /// Previous and next ids wrap around at both ends. A lone item has neither.
    pub fn locate(ids: &[i32], id: i32) -> Option<Neighbors> {
        let index = ids.iter().position(|&i| i == id)?;
        let total = ids.len();
        let (previous, next) = if total > 1 {
            (
                Some(ids[(index + total - 1) % total]),
                Some(ids[(index + 1) % total]),
            )
        } else {
            (None, None)
        };
        Some(Neighbors {
            id,
            previous,
            next,
            index,
            total,
        })
    }
}
