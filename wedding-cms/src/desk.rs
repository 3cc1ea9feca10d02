//! Authoring desk layout: pinned singleton editors, a divider, then document lists.
use crate::schema::{DocumentKind, Schema};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeskItem {
    /// Opens the single document of a singleton type directly
    #[serde(rename_all = "camelCase")]
    Singleton {
        id: String,
        title: String,
        document_id: String,
        icon: Option<String>,
    },
    Divider,
    /// A list of documents of one type
    #[serde(rename_all = "camelCase")]
    List {
        id: String,
        title: String,
        doc_type: String,
        icon: Option<String>,
    },
    /// Folder holding several lists
    Group {
        id: String,
        title: String,
        children: Vec<DeskItem>,
    },
}

const GROUPS: [(DocumentKind, &str, &str); 3] = [
    (DocumentKind::Page, "pages", "Pages"),
    (DocumentKind::Section, "sections", "Sections"),
    (DocumentKind::Document, "documents", "Documents"),
];

pub fn desk_structure(schema: &Schema) -> Vec<DeskItem> {
    let mut items: Vec<DeskItem> = schema
        .singletons()
        .map(|ty| DeskItem::Singleton {
            id: ty.name.clone(),
            title: ty.title.clone(),
            document_id: ty.name.clone(),
            icon: ty.icon.clone(),
        })
        .collect();

    items.push(DeskItem::Divider);

    for (kind, id, title) in GROUPS {
        let children: Vec<DeskItem> = schema
            .of_kind(kind)
            .map(|ty| DeskItem::List {
                id: ty.name.clone(),
                title: ty.title.clone(),
                doc_type: ty.name.clone(),
                icon: ty.icon.clone(),
            })
            .collect();
        if !children.is_empty() {
            items.push(DeskItem::Group {
                id: id.into(),
                title: title.into(),
                children,
            });
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons_pinned_before_divider() {
        let desk = desk_structure(&Schema::wedding());
        let divider = desk
            .iter()
            .position(|i| *i == DeskItem::Divider)
            .unwrap();
        assert_eq!(divider, 3);
        assert!(desk[..divider]
            .iter()
            .all(|i| matches!(i, DeskItem::Singleton { id, document_id, .. } if id == document_id)));
    }

    #[test]
    fn test_groups_in_order() {
        let desk = desk_structure(&Schema::wedding());
        let groups: Vec<_> = desk
            .iter()
            .filter_map(|i| match i {
                DeskItem::Group { id, children, .. } => Some((id.as_str(), children.len())),
                _ => None,
            })
            .collect();
        assert_eq!(groups, vec![("pages", 1), ("sections", 7), ("documents", 1)]);
    }

    #[test]
    fn test_serialized_shape() {
        let desk = desk_structure(&Schema::wedding());
        let value = serde_json::to_value(&desk).unwrap();
        assert_eq!(value[0]["kind"], "singleton");
        assert_eq!(value[0]["documentId"], "siteSettings");
        assert_eq!(value[3]["kind"], "divider");
    }
}
