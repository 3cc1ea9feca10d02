use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use wedding_error::{cms::CmsError, CmsResult};

/// The full set of content types known to the desk and the API.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Schema {
    pub types: Vec<DocumentType>,
}

impl Schema {
    pub fn new(types: Vec<DocumentType>) -> Self {
        Self { types }
    }

    pub fn get(&self, name: &str) -> Option<&DocumentType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn require(&self, name: &str) -> CmsResult<&DocumentType> {
        self.get(name)
            .ok_or_else(|| CmsError::UnknownType(name.to_string()))
    }

    pub fn of_kind(&self, kind: DocumentKind) -> impl Iterator<Item = &DocumentType> {
        self.types.iter().filter(move |t| t.kind == kind)
    }

    pub fn singletons(&self) -> impl Iterator<Item = &DocumentType> {
        self.of_kind(DocumentKind::Singleton)
    }

    pub fn is_singleton(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|t| t.kind == DocumentKind::Singleton)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    /// Free-standing documents with any number of instances
    Document,
    /// Exactly one instance, stored under `id == type name`
    Singleton,
    /// Reusable page building block, referenced from pages
    Section,
    /// Routable page composed of section references
    Page,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    pub name: String,
    pub title: String,
    pub kind: DocumentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub preview: Preview,
}

impl DocumentType {
    pub fn new(name: &str, title: &str, kind: DocumentKind) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind,
            icon: None,
            fields: Vec::new(),
            preview: Preview::default(),
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn preview(mut self, preview: Preview) -> Self {
        self.preview = preview;
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Content built from the `initial_value` of every field that declares one.
    pub fn initial_content(&self) -> Json {
        let content: Map<String, Json> = self
            .fields
            .iter()
            .filter_map(|f| f.initial_value.clone().map(|v| (f.name.clone(), v)))
            .collect();
        Json::Object(content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Rules::is_empty")]
    pub rules: Rules,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Json>,
}

/// Value shape of a field. Serialized with a `type` tag, e.g. `{"type":"array","of":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldType {
    String,
    /// Multi-line plain text
    Text,
    Number,
    Boolean,
    /// `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp
    Datetime,
    Url,
    /// `{ "current": "our-story" }`, generated from `source`
    Slug { source: String },
    /// `{ "url": "...", "alt": "..." }`
    Image,
    /// Portable rich text: an array of `{ "_type": ... }` blocks
    Block,
    Array { of: Box<FieldType> },
    Object { fields: Vec<Field> },
    /// `{ "_ref": "<document id>" }` pointing at one of the `to` types
    Reference { to: Vec<String> },
}

impl FieldType {
    pub fn array_of(of: FieldType) -> Self {
        FieldType::Array { of: Box::new(of) }
    }

    pub fn reference_to(to: &[&str]) -> Self {
        FieldType::Reference {
            to: to.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Url => "url",
            FieldType::Slug { .. } => "slug",
            FieldType::Image => "image",
            FieldType::Block => "block",
            FieldType::Array { .. } => "array",
            FieldType::Object { .. } => "object",
            FieldType::Reference { .. } => "reference",
        }
    }
}

impl Field {
    pub fn new(name: &str, title: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            field_type,
            description: None,
            rules: Rules::default(),
            initial_value: None,
        }
    }

    pub fn string(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::String)
    }

    pub fn text(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Text)
    }

    pub fn number(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Number)
    }

    pub fn boolean(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Boolean)
    }

    pub fn datetime(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Datetime)
    }

    pub fn url(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Url)
    }

    pub fn image(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Image)
    }

    pub fn block(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Block)
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.rules.required = Some(RuleValue::Value(true));
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.rules.min_length = Some(RuleValue::Value(n));
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.rules.max_length = Some(RuleValue::Value(n));
        self
    }

    pub fn min(mut self, n: f64) -> Self {
        self.rules.min = Some(RuleValue::Value(n));
        self
    }

    pub fn max(mut self, n: f64) -> Self {
        self.rules.max = Some(RuleValue::Value(n));
        self
    }

    pub fn integer(mut self) -> Self {
        self.rules.integer = Some(RuleValue::Value(true));
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.one_of = Some(RuleValue::Value(
            values.into_iter().map(|v| Json::String(v.into())).collect(),
        ));
        self
    }

    pub fn initial(mut self, value: Json) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules
            .required
            .as_ref()
            .map(|r| *r.value())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<RuleValue<bool>>,
    /// Characters for strings, items for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<RuleValue<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<RuleValue<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<RuleValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<RuleValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer: Option<RuleValue<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<RuleValue<Vec<Json>>>,
}

impl Rules {
    pub fn is_empty(&self) -> bool {
        self.required.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.integer.is_none()
            && self.one_of.is_none()
    }
}

/// A rule given either as a bare value or with a custom message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue<T> {
    Value(T),
    WithMessage { value: T, message: Option<String> },
}

impl<T> RuleValue<T> {
    pub fn value(&self) -> &T {
        match self {
            RuleValue::Value(v) => v,
            RuleValue::WithMessage { value, .. } => value,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RuleValue::Value(_) => None,
            RuleValue::WithMessage { message, .. } => message.as_deref(),
        }
    }
}

/// Dotted field paths used to render a document row in the desk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

impl Preview {
    pub fn title(path: &str) -> Self {
        Self {
            title: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn subtitle(mut self, path: &str) -> Self {
        self.subtitle = Some(path.into());
        self
    }

    pub fn media(mut self, path: &str) -> Self {
        self.media = Some(path.into());
        self
    }
}
