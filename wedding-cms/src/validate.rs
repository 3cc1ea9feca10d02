use crate::schema::{DocumentType, Field, FieldType, Rules, Schema};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value as Json};
use std::collections::HashMap;
use wedding_error::{
    cms::{CmsError, ContentIssue},
    CmsResult,
};

impl Schema {
    /// Checks `content` against the named type; every problem is reported at once.
    pub fn validate_document(&self, doc_type: &str, content: &Json) -> CmsResult<()> {
        let ty = self.require(doc_type)?;
        let issues = ty.validate(content)?;
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CmsError::Invalid(issues))
        }
    }
}

/// A `_ref` found in document content together with the types it may target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSite {
    pub path: String,
    pub id: String,
    pub to: Vec<String>,
}

impl Schema {
    /// Every reference in `content`, in field order.
    pub fn references(&self, doc_type: &str, content: &Json) -> CmsResult<Vec<ReferenceSite>> {
        let ty = self.require(doc_type)?;
        let Some(object) = content.as_object() else {
            return Err(CmsError::NotAnObject);
        };
        let mut sites = Vec::new();
        collect_in_fields(&ty.fields, object, "", &mut sites);
        Ok(sites)
    }

    /// `targets` maps referenced ids to their stored type. Ids missing from
    /// it are dangling and left to page resolution.
    pub fn check_reference_targets(
        sites: &[ReferenceSite],
        targets: &HashMap<String, String>,
    ) -> CmsResult<()> {
        let issues: Vec<_> = sites
            .iter()
            .filter_map(|site| {
                let target = targets.get(&site.id)?;
                (!site.to.contains(target)).then(|| {
                    ContentIssue::new(
                        site.path.clone(),
                        format!(
                            "`{}` is a `{target}`, expected one of {}",
                            site.id,
                            site.to.join(", ")
                        ),
                    )
                })
            })
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CmsError::Invalid(issues))
        }
    }
}

fn collect_in_fields(
    fields: &[Field],
    object: &Map<String, Json>,
    prefix: &str,
    sites: &mut Vec<ReferenceSite>,
) {
    for field in fields {
        if let Some(value) = object.get(&field.name) {
            collect_in_value(&field.field_type, value, &join(prefix, &field.name), sites);
        }
    }
}

fn collect_in_value(
    field_type: &FieldType,
    value: &Json,
    path: &str,
    sites: &mut Vec<ReferenceSite>,
) {
    match field_type {
        FieldType::Reference { to } => {
            if let Some(id) = value.get("_ref").and_then(Json::as_str) {
                sites.push(ReferenceSite {
                    path: path.to_string(),
                    id: id.to_string(),
                    to: to.clone(),
                });
            }
        }
        FieldType::Array { of } => {
            for (i, item) in value.as_array().into_iter().flatten().enumerate() {
                collect_in_value(of, item, &format!("{path}[{i}]"), sites);
            }
        }
        FieldType::Object { fields } => {
            if let Some(object) = value.as_object() {
                collect_in_fields(fields, object, path, sites);
            }
        }
        _ => {}
    }
}

impl DocumentType {
    pub fn validate(&self, content: &Json) -> CmsResult<Vec<ContentIssue>> {
        let Some(object) = content.as_object() else {
            return Err(CmsError::NotAnObject);
        };
        let mut issues = Vec::new();
        validate_fields(&self.fields, object, "", &mut issues);
        Ok(issues)
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn validate_fields(
    fields: &[Field],
    object: &Map<String, Json>,
    prefix: &str,
    issues: &mut Vec<ContentIssue>,
) {
    for field in fields {
        let path = join(prefix, &field.name);
        match object.get(&field.name) {
            Some(value) if !is_blank(value) => {
                validate_value(&field.field_type, &field.rules, value, &path, issues)
            }
            _ if field.is_required() => issues.push(ContentIssue::new(
                path,
                message_or(field.rules.required.as_ref().and_then(|r| r.message()), || {
                    format!("{} is required", field.title)
                }),
            )),
            _ => {}
        }
    }

    // Keys starting with `_` are system keys (`_key`, `_type`, `_id`)
    for key in object.keys() {
        if !key.starts_with('_') && !fields.iter().any(|f| &f.name == key) {
            issues.push(ContentIssue::new(join(prefix, key), "unknown field"));
        }
    }
}

fn is_blank(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::String(s) => s.trim().is_empty(),
        Json::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn message_or(custom: Option<&str>, default: impl FnOnce() -> String) -> String {
    custom.map(str::to_string).unwrap_or_else(default)
}

fn validate_value(
    field_type: &FieldType,
    rules: &Rules,
    value: &Json,
    path: &str,
    issues: &mut Vec<ContentIssue>,
) {
    let mismatch = |issues: &mut Vec<ContentIssue>, expected: &str| {
        issues.push(ContentIssue::new(path, format!("expected {expected}")));
    };

    match field_type {
        FieldType::String | FieldType::Text => match value.as_str() {
            Some(s) => check_length(rules, s.chars().count(), "characters", path, issues),
            None => mismatch(issues, "a string"),
        },
        FieldType::Url => match value.as_str() {
            Some(s) if is_url(s) => check_length(rules, s.chars().count(), "characters", path, issues),
            Some(_) => issues.push(ContentIssue::new(
                path,
                "must be an absolute http(s) URL, a mailto: link or a path starting with /",
            )),
            None => mismatch(issues, "a URL string"),
        },
        FieldType::Number => match value.as_f64() {
            Some(n) => check_number(rules, n, path, issues),
            None => mismatch(issues, "a number"),
        },
        FieldType::Boolean => {
            if !value.is_boolean() {
                mismatch(issues, "true or false");
            }
        }
        FieldType::Date => match value.as_str() {
            Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {}
            _ => mismatch(issues, "a date formatted YYYY-MM-DD"),
        },
        FieldType::Datetime => match value.as_str() {
            Some(s) if DateTime::parse_from_rfc3339(s).is_ok() => {}
            _ => mismatch(issues, "an RFC 3339 timestamp"),
        },
        FieldType::Slug { .. } => {
            match value.get("current").and_then(Json::as_str) {
                Some(slug) if is_slug(slug) => {
                    check_length(rules, slug.chars().count(), "characters", path, issues)
                }
                Some(_) => issues.push(ContentIssue::new(
                    join(path, "current"),
                    "may only contain lowercase letters, digits and single dashes",
                )),
                None => mismatch(issues, "an object with a `current` slug"),
            }
        }
        FieldType::Image => match value.get("url").and_then(Json::as_str) {
            Some(url) if !url.trim().is_empty() => {
                if let Some(alt) = value.get("alt") {
                    if !alt.is_string() && !alt.is_null() {
                        issues.push(ContentIssue::new(join(path, "alt"), "expected a string"));
                    }
                }
            }
            _ => mismatch(issues, "an image with a `url`"),
        },
        FieldType::Block => match value.as_array() {
            Some(blocks) => {
                for (i, block) in blocks.iter().enumerate() {
                    if block.get("_type").and_then(Json::as_str).is_none() {
                        issues.push(ContentIssue::new(
                            format!("{path}[{i}]"),
                            "rich text blocks need a `_type`",
                        ));
                    }
                }
                check_length(rules, blocks.len(), "blocks", path, issues);
            }
            None => mismatch(issues, "an array of rich text blocks"),
        },
        FieldType::Array { of } => match value.as_array() {
            Some(items) => {
                check_length(rules, items.len(), "items", path, issues);
                let item_rules = Rules::default();
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    if item.is_null() {
                        issues.push(ContentIssue::new(item_path, "empty item"));
                    } else {
                        validate_value(of, &item_rules, item, &item_path, issues);
                    }
                }
            }
            None => mismatch(issues, "an array"),
        },
        FieldType::Object { fields } => match value.as_object() {
            Some(object) => validate_fields(fields, object, path, issues),
            None => mismatch(issues, "an object"),
        },
        FieldType::Reference { .. } => {
            if value.get("_ref").and_then(Json::as_str).is_none() {
                mismatch(issues, "a reference with a `_ref` id");
            }
        }
    }

    if let Some(rule) = &rules.one_of {
        if !rule.value().contains(value) {
            let allowed = rule
                .value()
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            issues.push(ContentIssue::new(
                path,
                message_or(rule.message(), || format!("must be one of {allowed}")),
            ));
        }
    }
}

fn check_length(rules: &Rules, len: usize, unit: &str, path: &str, issues: &mut Vec<ContentIssue>) {
    if let Some(rule) = &rules.min_length {
        if len < *rule.value() {
            issues.push(ContentIssue::new(
                path,
                message_or(rule.message(), || {
                    format!("needs at least {} {unit}", rule.value())
                }),
            ));
        }
    }
    if let Some(rule) = &rules.max_length {
        if len > *rule.value() {
            issues.push(ContentIssue::new(
                path,
                message_or(rule.message(), || {
                    format!("allows at most {} {unit}", rule.value())
                }),
            ));
        }
    }
}

fn check_number(rules: &Rules, n: f64, path: &str, issues: &mut Vec<ContentIssue>) {
    if let Some(rule) = &rules.integer {
        if *rule.value() && n.fract() != 0.0 {
            issues.push(ContentIssue::new(
                path,
                message_or(rule.message(), || "must be a whole number".into()),
            ));
        }
    }
    if let Some(rule) = &rules.min {
        if n < *rule.value() {
            issues.push(ContentIssue::new(
                path,
                message_or(rule.message(), || format!("must be at least {}", rule.value())),
            ));
        }
    }
    if let Some(rule) = &rules.max {
        if n > *rule.value() {
            issues.push(ContentIssue::new(
                path,
                message_or(rule.message(), || format!("must be at most {}", rule.value())),
            ));
        }
    }
}

fn is_url(s: &str) -> bool {
    let s = s.trim();
    s.starts_with("https://")
        || s.starts_with("http://")
        || s.starts_with("mailto:")
        || (s.starts_with('/') && !s.starts_with("//"))
}

pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Lowercase, dash-separated slug derived from free text such as a page title.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(err: CmsError) -> Vec<String> {
        match err {
            CmsError::Invalid(issues) => issues.into_iter().map(|i| i.path).collect(),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_valid_faq_section() {
        let schema = Schema::wedding();
        let content = json!({
            "heading": "Questions",
            "items": [
                {"_key": "a1", "question": "Is there parking?", "answer": "Yes, on site."}
            ]
        });
        assert!(schema.validate_document("faqSection", &content).is_ok());
    }

    #[test]
    fn test_collects_all_issues_with_paths() {
        let schema = Schema::wedding();
        let content = json!({
            "heading": "",
            "items": [
                {"question": "Dress code?", "answer": "Garden formal"},
                {"answer": "No question here"}
            ],
            "colour": "blue"
        });
        let err = schema.validate_document("faqSection", &content).unwrap_err();
        let mut found = paths(err);
        found.sort();
        assert_eq!(found, vec!["colour", "heading", "items[1].question"]);
    }

    #[test]
    fn test_max_length_on_page_seo_description() {
        let schema = Schema::wedding();
        let content = json!({
            "title": "Home",
            "slug": {"current": "home"},
            "seoDescription": "x".repeat(161)
        });
        let err = schema.validate_document("page", &content).unwrap_err();
        assert_eq!(paths(err), vec!["seoDescription"]);
    }

    #[test]
    fn test_number_rules() {
        let schema = Schema::wedding();
        let content = json!({"heading": "Gallery", "limit": 2.5});
        assert_eq!(
            paths(schema.validate_document("gallerySection", &content).unwrap_err()),
            vec!["limit"]
        );
        let content = json!({"heading": "Gallery", "limit": 0});
        assert!(schema.validate_document("gallerySection", &content).is_err());
        let content = json!({"heading": "Gallery", "limit": 12});
        assert!(schema.validate_document("gallerySection", &content).is_ok());
    }

    #[test]
    fn test_one_of_rule() {
        let schema = Schema::wedding();
        let content = json!({"name": "Sam", "role": "bouncer"});
        assert_eq!(
            paths(schema.validate_document("weddingPartyMember", &content).unwrap_err()),
            vec!["role"]
        );
    }

    #[test]
    fn test_references_and_slugs() {
        let schema = Schema::wedding();
        let content = json!({
            "title": "Our story",
            "slug": {"current": "Our Story"},
            "sections": [{"_ref": "hero-1"}, {"id": "oops"}]
        });
        let mut found = paths(schema.validate_document("page", &content).unwrap_err());
        found.sort();
        assert_eq!(found, vec!["sections[1]", "slug.current"]);
    }

    #[test]
    fn test_reference_sites_and_targets() {
        let schema = Schema::wedding();
        let content = json!({
            "title": "Home",
            "slug": {"current": "home"},
            "sections": [{"_ref": "hero-1"}, {"_ref": "bm"}]
        });
        let sites = schema.references("page", &content).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].path, "sections[1]");
        assert!(sites[1].to.iter().any(|t| t == "heroSection"));

        let mut targets = HashMap::new();
        targets.insert("hero-1".to_string(), "heroSection".to_string());
        assert!(Schema::check_reference_targets(&sites, &targets).is_ok());

        targets.insert("bm".to_string(), "weddingPartyMember".to_string());
        let err = Schema::check_reference_targets(&sites, &targets).unwrap_err();
        assert_eq!(paths(err), vec!["sections[1]"]);
    }

    #[test]
    fn test_non_object_and_unknown_type() {
        let schema = Schema::wedding();
        assert!(matches!(
            schema.validate_document("page", &json!([1, 2])),
            Err(CmsError::NotAnObject)
        ));
        assert!(matches!(
            schema.validate_document("poster", &json!({})),
            Err(CmsError::UnknownType(_))
        ));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Travel & Stay!"), "travel-stay");
        assert_eq!(slugify("  Hello   World "), "hello-world");
        assert!(is_slug(&slugify("RSVP 2025")));
    }
}
