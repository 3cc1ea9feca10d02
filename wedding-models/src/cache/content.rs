/// Keys of the resolved-content cache. Every content write clears the whole
/// cache, so keys only need to be unique, not invalidated one by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCacheKey<'a> {
    Home,
    Page(&'a str),
    Settings(&'a str),
}

impl ContentCacheKey<'_> {
    pub fn to_key(&self) -> String {
        match self {
            ContentCacheKey::Home => "home".into(),
            ContentCacheKey::Page(slug) => format!("page:{slug}"),
            ContentCacheKey::Settings(doc_type) => format!("settings:{doc_type}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_do_not_collide() {
        assert_eq!(ContentCacheKey::Home.to_key(), "home");
        assert_eq!(ContentCacheKey::Page("home").to_key(), "page:home");
        assert_ne!(
            ContentCacheKey::Page("rsvpSettings").to_key(),
            ContentCacheKey::Settings("rsvpSettings").to_key()
        );
    }
}
