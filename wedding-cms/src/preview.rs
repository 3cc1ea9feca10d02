use crate::schema::DocumentType;
use serde::Serialize;
use serde_json::Value as Json;

pub const UNTITLED: &str = "Untitled";

/// What the desk shows for one document row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewValue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

impl PreviewValue {
    pub fn untitled() -> Self {
        Self {
            title: UNTITLED.to_string(),
            subtitle: None,
            media: None,
        }
    }
}

/// Follows a dotted path (`slug.current`, `items.0.label`) into `content`.
pub fn lookup<'a>(content: &'a Json, path: &str) -> Option<&'a Json> {
    path.split('.').try_fold(content, |node, segment| match node {
        Json::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => node.get(segment),
    })
}

fn as_text(value: &Json) -> Option<String> {
    match value {
        Json::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl DocumentType {
    pub fn preview_of(&self, content: &Json) -> PreviewValue {
        let text_at = |path: &Option<String>| {
            path.as_deref()
                .and_then(|p| lookup(content, p))
                .and_then(as_text)
        };

        PreviewValue {
            title: text_at(&self.preview.title).unwrap_or_else(|| UNTITLED.to_string()),
            subtitle: text_at(&self.preview.subtitle),
            // image fields hold `{ url, alt }`
            media: self
                .preview
                .media
                .as_deref()
                .and_then(|p| lookup(content, p))
                .and_then(|img| img.get("url").or(Some(img)))
                .and_then(as_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn test_preview_paths() {
        let schema = Schema::wedding();
        let page = schema.get("page").unwrap();
        let preview = page.preview_of(&json!({
            "title": "Travel",
            "slug": {"current": "travel"}
        }));
        assert_eq!(preview.title, "Travel");
        assert_eq!(preview.subtitle.as_deref(), Some("travel"));
        assert_eq!(preview.media, None);
    }

    #[test]
    fn test_untitled_fallback() {
        let schema = Schema::wedding();
        let member = schema.get("weddingPartyMember").unwrap();
        let preview = member.preview_of(&json!({"name": "   ", "photo": {"url": "/media/a.jpg"}}));
        assert_eq!(preview.title, UNTITLED);
        assert_eq!(preview.media.as_deref(), Some("/media/a.jpg"));
    }

    #[test]
    fn test_lookup_into_arrays() {
        let content = json!({"items": [{"label": "Home"}, {"label": "RSVP"}]});
        assert_eq!(lookup(&content, "items.1.label"), Some(&json!("RSVP")));
        assert_eq!(lookup(&content, "items.5.label"), None);
    }
}
