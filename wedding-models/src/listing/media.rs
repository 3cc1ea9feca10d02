use super::{cmp_missing_last, matches_search};
use crate::{entities::media_item::Model as MediaItemModel, enums::common::MediaKind};
use serde::Deserialize;
use std::cmp::Ordering;

/// Media has a fixed gallery order instead of user-selected sorting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListParams {
    /// Matched against title, description and original file name
    pub search: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub visible: Option<bool>,
    pub kind: Option<MediaKind>,
}

impl MediaListParams {
    /// Only what the public gallery may show, optionally narrowed to one category.
    pub fn public(category: Option<String>) -> Self {
        Self {
            category,
            visible: Some(true),
            ..Default::default()
        }
    }

    pub fn matches(&self, item: &MediaItemModel) -> bool {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map_or(true, |c| item.category.eq_ignore_ascii_case(c.trim()))
            && self.featured.map_or(true, |f| item.featured == f)
            && self.visible.map_or(true, |v| item.visible == v)
            && self.kind.map_or(true, |k| item.kind == k)
            && matches_search(
                [
                    Some(item.title.as_str()),
                    item.description.as_deref(),
                    Some(item.original_name.as_str()),
                ],
                self.search.as_deref().unwrap_or_default(),
            )
    }

    pub fn apply(&self, items: Vec<MediaItemModel>) -> Vec<MediaItemModel> {
        let mut items: Vec<_> = items.into_iter().filter(|i| self.matches(i)).collect();
        items.sort_by(gallery_order);
        items
    }
}

/// Featured first, then `sort_order`, then newest.
fn gallery_order(a: &MediaItemModel, b: &MediaItemModel) -> Ordering {
    b.featured
        .cmp(&a.featured)
        .then(a.sort_order.cmp(&b.sort_order))
        .then_with(|| match (a.created_at, b.created_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (a, b) => cmp_missing_last(a, b),
        })
        .then(b.id.cmp(&a.id))
}
