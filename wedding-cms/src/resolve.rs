//! Expands a page's section references into the referenced section documents.
use crate::{
    catalog::RSVP_SETTINGS,
    schema::{DocumentKind, Schema},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as Json;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSection {
    pub id: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub content: Json,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPage {
    pub id: String,
    pub page: Json,
    pub sections: Vec<ResolvedSection>,
    /// References that point at nothing, or at a document that is not a section
    pub missing: Vec<String>,
}

/// Ids referenced by `page.sections`, in order.
pub fn section_refs(page: &Json) -> Vec<String> {
    page.get("sections")
        .and_then(Json::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|r| r.get("_ref").and_then(Json::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `fetch` maps a document id to its `(type, content)`.
pub fn resolve_page<F>(schema: &Schema, id: &str, page: Json, mut fetch: F) -> ResolvedPage
where
    F: FnMut(&str) -> Option<(String, Json)>,
{
    let mut sections = Vec::new();
    let mut missing = Vec::new();

    for section_id in section_refs(&page) {
        match fetch(&section_id) {
            Some((doc_type, content))
                if schema
                    .get(&doc_type)
                    .is_some_and(|t| t.kind == DocumentKind::Section) =>
            {
                sections.push(ResolvedSection {
                    id: section_id,
                    doc_type,
                    content,
                })
            }
            _ => missing.push(section_id),
        }
    }

    ResolvedPage {
        id: id.to_string(),
        page,
        sections,
        missing,
    }
}

/// RSVP availability read from the `rsvpSettings` singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpWindow {
    pub is_open: bool,
    pub deadline: Option<DateTime<Utc>>,
}

impl Default for RsvpWindow {
    fn default() -> Self {
        Self {
            is_open: true,
            deadline: None,
        }
    }
}

impl RsvpWindow {
    pub const DOC_ID: &'static str = RSVP_SETTINGS;

    pub fn from_content(content: &Json) -> Self {
        Self {
            is_open: content
                .get("isOpen")
                .and_then(Json::as_bool)
                .unwrap_or(true),
            deadline: content
                .get("deadline")
                .and_then(Json::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| d.with_timezone(&Utc)),
        }
    }

    pub fn accepts(&self, now: DateTime<Utc>) -> bool {
        self.is_open && self.deadline.map_or(true, |d| now <= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_resolve_in_order_and_report_missing() {
        let schema = Schema::wedding();
        let page = json!({
            "title": "Home",
            "slug": {"current": "home"},
            "sections": [{"_ref": "faq"}, {"_ref": "gone"}, {"_ref": "hero"}, {"_ref": "member"}]
        });
        let docs: HashMap<&str, (String, Json)> = HashMap::from([
            ("hero", ("heroSection".to_string(), json!({"heading": "Hi"}))),
            ("faq", ("faqSection".to_string(), json!({"heading": "FAQ"}))),
            ("member", ("weddingPartyMember".to_string(), json!({"name": "Kim"}))),
        ]);

        let resolved = resolve_page(&schema, "home", page, |id| docs.get(id).cloned());
        let ids: Vec<_> = resolved.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["faq", "hero"]);
        assert_eq!(resolved.missing, vec!["gone", "member"]);
    }

    #[test]
    fn test_section_refs_without_sections() {
        assert!(section_refs(&json!({"title": "Empty"})).is_empty());
    }

    #[test]
    fn test_rsvp_window() {
        let now = Utc::now();
        assert!(RsvpWindow::default().accepts(now));

        let closed = RsvpWindow::from_content(&json!({"isOpen": false}));
        assert!(!closed.accepts(now));

        let past = (now - Duration::days(1)).to_rfc3339();
        let expired = RsvpWindow::from_content(&json!({"isOpen": true, "deadline": past}));
        assert!(!expired.accepts(now));

        let future = (now + Duration::days(1)).to_rfc3339();
        let open = RsvpWindow::from_content(&json!({"isOpen": true, "deadline": future}));
        assert!(open.accepts(now));
    }
}
