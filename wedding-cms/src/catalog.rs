use crate::schema::{DocumentKind, DocumentType, Field, FieldType, Preview, Schema};
use serde_json::json;

pub const SITE_SETTINGS: &str = "siteSettings";
pub const NAVIGATION: &str = "navigation";
pub const RSVP_SETTINGS: &str = "rsvpSettings";
pub const PAGE: &str = "page";

const SECTION_TYPES: [&str; 7] = [
    "heroSection",
    "storySection",
    "scheduleSection",
    "gallerySection",
    "rsvpSection",
    "faqSection",
    "travelSection",
];

const PARTY_ROLES: [&str; 8] = [
    "maidOfHonor",
    "bestMan",
    "bridesmaid",
    "groomsman",
    "flowerGirl",
    "ringBearer",
    "officiant",
    "other",
];

impl Schema {
    /// Content model shipped with the site.
    pub fn wedding() -> Self {
        let mut types = vec![site_settings(), navigation(), rsvp_settings()];
        types.extend(sections());
        types.push(page());
        types.push(wedding_party_member());
        Schema::new(types)
    }
}

fn heading() -> Field {
    Field::string("heading", "Heading").required().max_length(80)
}

fn site_settings() -> DocumentType {
    DocumentType::new(SITE_SETTINGS, "Site settings", DocumentKind::Singleton)
        .icon("cog")
        .field(
            Field::string("title", "Site title")
                .required()
                .max_length(80)
                .initial(json!("Our Wedding")),
        )
        .field(
            Field::string("coupleNames", "Couple names")
                .description("Shown in the header, e.g. \"Alex & Sam\"")
                .max_length(120),
        )
        .field(Field::datetime("weddingDate", "Wedding date"))
        .field(Field::string("venueName", "Venue"))
        .field(Field::text("venueAddress", "Venue address"))
        .field(Field::image("heroImage", "Hero image"))
        .field(Field::string("contactEmail", "Contact email"))
        .field(Field::text("seoDescription", "SEO description").max_length(160))
        .preview(Preview::title("title").subtitle("coupleNames").media("heroImage"))
}

fn navigation() -> DocumentType {
    let link = FieldType::Object {
        fields: vec![
            Field::string("label", "Label").required().max_length(40),
            Field::url("href", "Link").required(),
            Field::boolean("external", "Open in new tab"),
        ],
    };
    DocumentType::new(NAVIGATION, "Navigation", DocumentKind::Singleton)
        .icon("menu")
        .field(Field::string("title", "Title").initial(json!("Main navigation")))
        .field(Field::new("items", "Menu items", FieldType::array_of(link)).max_length(10))
        .preview(Preview::title("title"))
}

fn rsvp_settings() -> DocumentType {
    DocumentType::new(RSVP_SETTINGS, "RSVP settings", DocumentKind::Singleton)
        .icon("envelope")
        .field(
            Field::boolean("isOpen", "Accepting responses")
                .required()
                .initial(json!(true)),
        )
        .field(
            Field::datetime("deadline", "Deadline")
                .description("Responses are refused after this moment"),
        )
        .field(Field::text("introText", "Intro text").max_length(500))
        .field(Field::text("confirmationMessage", "Confirmation message").max_length(500))
        .preview(Preview::title("introText"))
}

fn sections() -> Vec<DocumentType> {
    let schedule_item = FieldType::Object {
        fields: vec![
            Field::string("time", "Time").required(),
            Field::string("title", "Title").required().max_length(80),
            Field::text("description", "Description"),
            Field::string("location", "Location"),
        ],
    };
    let faq_item = FieldType::Object {
        fields: vec![
            Field::string("question", "Question").required().max_length(200),
            Field::text("answer", "Answer").required(),
        ],
    };
    let hotel = FieldType::Object {
        fields: vec![
            Field::string("name", "Name").required(),
            Field::url("url", "Website"),
            Field::text("notes", "Notes"),
        ],
    };

    vec![
        DocumentType::new(SECTION_TYPES[0], "Hero", DocumentKind::Section)
            .field(heading())
            .field(Field::string("subheading", "Subheading").max_length(160))
            .field(Field::image("backgroundImage", "Background image"))
            .field(Field::boolean("showCountdown", "Show countdown").initial(json!(true)))
            .field(Field::string("ctaLabel", "Button label").max_length(40))
            .field(Field::url("ctaHref", "Button link"))
            .preview(Preview::title("heading").subtitle("subheading").media("backgroundImage")),
        DocumentType::new(SECTION_TYPES[1], "Our story", DocumentKind::Section)
            .field(heading())
            .field(Field::block("body", "Story"))
            .field(
                Field::new("photos", "Photos", FieldType::array_of(FieldType::Image))
                    .max_length(12),
            )
            .preview(Preview::title("heading")),
        DocumentType::new(SECTION_TYPES[2], "Schedule", DocumentKind::Section)
            .field(heading())
            .field(
                Field::new("events", "Events", FieldType::array_of(schedule_item))
                    .required()
                    .min_length(1),
            )
            .preview(Preview::title("heading")),
        DocumentType::new(SECTION_TYPES[3], "Gallery", DocumentKind::Section)
            .field(heading())
            .field(
                Field::string("category", "Category")
                    .description("Only show media from this category"),
            )
            .field(Field::number("limit", "Max items").integer().min(1.0).max(48.0))
            .field(Field::boolean("showFeaturedOnly", "Featured only"))
            .preview(Preview::title("heading").subtitle("category")),
        DocumentType::new(SECTION_TYPES[4], "RSVP", DocumentKind::Section)
            .field(heading())
            .field(Field::text("body", "Body"))
            .field(
                Field::string("buttonLabel", "Button label")
                    .max_length(40)
                    .initial(json!("RSVP")),
            )
            .preview(Preview::title("heading")),
        DocumentType::new(SECTION_TYPES[5], "FAQ", DocumentKind::Section)
            .field(heading())
            .field(Field::new("items", "Questions", FieldType::array_of(faq_item)))
            .preview(Preview::title("heading")),
        DocumentType::new(SECTION_TYPES[6], "Travel", DocumentKind::Section)
            .field(heading())
            .field(Field::block("directions", "Directions"))
            .field(Field::new("hotels", "Hotels", FieldType::array_of(hotel)))
            .preview(Preview::title("heading")),
    ]
}

fn page() -> DocumentType {
    DocumentType::new(PAGE, "Page", DocumentKind::Page)
        .icon("document")
        .field(Field::string("title", "Title").required().max_length(80))
        .field(
            Field::new(
                "slug",
                "Slug",
                FieldType::Slug {
                    source: "title".into(),
                },
            )
            .required()
            .max_length(96),
        )
        .field(
            Field::boolean("isHome", "Home page")
                .description("Served at the site root")
                .initial(json!(false)),
        )
        .field(Field::new(
            "sections",
            "Sections",
            FieldType::array_of(FieldType::reference_to(&SECTION_TYPES)),
        ))
        .field(Field::text("seoDescription", "SEO description").max_length(160))
        .preview(Preview::title("title").subtitle("slug.current"))
}

fn wedding_party_member() -> DocumentType {
    DocumentType::new("weddingPartyMember", "Wedding party", DocumentKind::Document)
        .icon("users")
        .field(Field::string("name", "Name").required().max_length(80))
        .field(Field::string("role", "Role").required().one_of(PARTY_ROLES))
        .field(Field::image("photo", "Photo"))
        .field(Field::text("bio", "Bio").max_length(500))
        .field(Field::number("order", "Order").integer().min(0.0))
        .preview(Preview::title("name").subtitle("role").media("photo"))
}
