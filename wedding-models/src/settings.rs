use config::{Config, File};
use serde::{self, Deserialize};
use std::{ops::Deref, sync::Arc};
use sysinfo::System;
use wedding_error::WedResult;

use crate::constants::{DATA_DIR, MEDIA_DIR};

#[derive(Debug, Clone)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    pub fn new(config_path: String) -> WedResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path.as_str()).required(false))
            .add_source(
                config::Environment::with_prefix("WED")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("web.cors.whitelist.origins")
                    .with_list_parse_key("web.cors.whitelist.methods")
                    .with_list_parse_key("web.cors.whitelist.headers")
                    .with_list_parse_key("media.allowed_mime_types"),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }

    pub fn from_inner(inner: Inner) -> Self {
        Self(Arc::new(inner))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_inner(Inner::default())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inner {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub db: Db,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub rsvp: Rsvp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Directory every relative path (`./data`, `./media`, `./logs`) is resolved from.
    ///
    /// The process changes its working directory to this value at startup.
    /// Override with `WED__GENERAL__RUNTIME_DIR=/var/lib/wedding`.
    #[serde(default = "General::runtime_dir_default")]
    pub runtime_dir: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            runtime_dir: General::runtime_dir_default(),
        }
    }
}

impl General {
    fn runtime_dir_default() -> String {
        ".".into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    #[serde(default = "Web::router_prefix_default")]
    pub router_prefix: String,
    #[serde(default = "Web::host_default")]
    pub host: String,
    #[serde(default = "Web::port_default")]
    pub port: u16,
    #[serde(default = "Web::workers_default")]
    pub workers: i32,
    /// Pre-built frontend served from the same port as the API.
    #[serde(default)]
    pub site: Site,
    #[serde(default)]
    pub cors: Cors,
    #[serde(default)]
    pub jwt: Jwt,
}

impl Default for Web {
    fn default() -> Self {
        Web {
            router_prefix: Web::router_prefix_default(),
            host: Web::host_default(),
            port: Web::port_default(),
            workers: Web::workers_default(),
            site: Default::default(),
            cors: Default::default(),
            jwt: Default::default(),
        }
    }
}

impl Web {
    fn router_prefix_default() -> String {
        "/api".into()
    }

    fn port_default() -> u16 {
        8080
    }

    fn host_default() -> String {
        "0.0.0.0".into()
    }

    fn workers_default() -> i32 {
        0
    }

    /// `0` uses every CPU, a negative value `-n` uses `cpus / n` (at least one).
    pub fn get_worker_count(&self) -> usize {
        match self.workers {
            0 => System::new_all().cpus().len().max(1),
            n if n > 0 => n as usize,
            n => std::cmp::max(
                1,
                (System::new_all().cpus().len() as i32 / n.abs()) as usize,
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    #[serde(default = "Site::enabled_default")]
    pub enabled: bool,
    /// Directory holding `index.html` and the frontend assets.
    #[serde(default = "Site::root_default")]
    pub root: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            enabled: Site::enabled_default(),
            root: Site::root_default(),
        }
    }
}

impl Site {
    fn enabled_default() -> bool {
        false
    }

    fn root_default() -> String {
        "./site/dist".into()
    }
}

#[derive(Default, Debug, Clone, Deserialize)]
pub struct Cors {
    #[serde(default)]
    pub mode: CorsMode,
    #[serde(default)]
    pub whitelist: Whitelist,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsMode {
    #[default]
    AllowAll,
    Whitelist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Whitelist {
    #[serde(default = "Whitelist::origins_default")]
    pub origins: Vec<String>,
    #[serde(default = "Whitelist::methods_default")]
    pub methods: Vec<String>,
    #[serde(default = "Whitelist::headers_default")]
    pub headers: Vec<String>,
    #[serde(default = "Whitelist::credentials_default")]
    pub credentials: bool,
}

impl Default for Whitelist {
    fn default() -> Self {
        Whitelist {
            origins: Whitelist::origins_default(),
            methods: Whitelist::methods_default(),
            headers: Whitelist::headers_default(),
            credentials: Whitelist::credentials_default(),
        }
    }
}

impl Whitelist {
    fn origins_default() -> Vec<String> {
        vec!["*".into()]
    }

    fn methods_default() -> Vec<String> {
        vec!["GET".into(), "POST".into(), "PUT".into(), "DELETE".into()]
    }

    fn headers_default() -> Vec<String> {
        vec![
            "Content-Type".into(),
            "Authorization".into(),
            "X-API-Version".into(),
            "Accept-Api-Version".into(),
        ]
    }

    fn credentials_default() -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Jwt {
    #[serde(default = "Jwt::secret_default")]
    pub secret: String,
    /// Token lifetime in milliseconds
    #[serde(default = "Jwt::expire_default")]
    pub expire: i64,
    #[serde(default = "Jwt::issuer_default")]
    pub issuer: String,
}

impl Default for Jwt {
    fn default() -> Self {
        Jwt {
            secret: Jwt::secret_default(),
            expire: Jwt::expire_default(),
            issuer: Jwt::issuer_default(),
        }
    }
}

impl Jwt {
    fn secret_default() -> String {
        "wedding".into()
    }

    fn expire_default() -> i64 {
        43_200_000
    }

    fn issuer_default() -> String {
        "wedding".into()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Db {
    #[serde(default)]
    pub sqlite: Sqlite,
}

/// Connection details every database backend has to provide.
pub trait WedDbConfig: Send + Sync {
    fn db_path(&self) -> String;

    fn to_url(&self) -> String;

    fn db_dir(&self) -> String;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sqlite {
    #[serde(default = "Sqlite::path_default")]
    pub path: String,
    #[serde(default = "Sqlite::timeout_default")]
    pub timeout: u64,
    #[serde(default = "Sqlite::idle_timeout_default")]
    pub idle_timeout: u64,
    #[serde(default = "Sqlite::max_lifetime_default")]
    pub max_lifetime: u64,
    #[serde(default = "Sqlite::max_connections_default")]
    pub max_connections: u32,
    #[serde(default = "Sqlite::auto_create_default")]
    pub auto_create: bool,
}

impl Default for Sqlite {
    fn default() -> Self {
        Sqlite {
            path: Sqlite::path_default(),
            timeout: Sqlite::timeout_default(),
            idle_timeout: Sqlite::idle_timeout_default(),
            max_lifetime: Sqlite::max_lifetime_default(),
            max_connections: Sqlite::max_connections_default(),
            auto_create: Sqlite::auto_create_default(),
        }
    }
}

impl WedDbConfig for Sqlite {
    fn db_path(&self) -> String {
        self.path.clone()
    }

    fn to_url(&self) -> String {
        if self.path == ":memory:" {
            return "sqlite::memory:".into();
        }
        if self.auto_create {
            // rwc: read, write, create
            format!("sqlite:{}/{}?mode=rwc", DATA_DIR, self.path)
        } else {
            format!("sqlite:{}/{}", DATA_DIR, self.path)
        }
    }

    fn db_dir(&self) -> String {
        DATA_DIR.into()
    }
}

impl Sqlite {
    fn path_default() -> String {
        "wedding.db".into()
    }

    fn timeout_default() -> u64 {
        5000
    }

    fn idle_timeout_default() -> u64 {
        5000
    }

    fn max_lifetime_default() -> u64 {
        5000
    }

    fn max_connections_default() -> u32 {
        20
    }

    fn auto_create_default() -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cache {
    #[serde(default)]
    pub r#type: CacheType,
    #[serde(default = "Cache::prefix_default")]
    pub prefix: String,
    #[serde(default = "Cache::delimiter_default")]
    pub delimiter: String,
    /// Lifetime of resolved public content, in seconds
    #[serde(default = "Cache::content_ttl_secs_default")]
    pub content_ttl_secs: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Cache {
            r#type: Default::default(),
            prefix: Cache::prefix_default(),
            delimiter: Cache::delimiter_default(),
            content_ttl_secs: Cache::content_ttl_secs_default(),
        }
    }
}

impl Cache {
    fn prefix_default() -> String {
        "wed".into()
    }

    fn delimiter_default() -> String {
        ":".into()
    }

    fn content_ttl_secs_default() -> u64 {
        300
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    #[default]
    Moka,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    /// Directory uploaded files are written to
    #[serde(default = "Media::root_dir_default")]
    pub root_dir: String,
    #[serde(default = "Media::max_upload_bytes_default")]
    pub max_upload_bytes: usize,
    /// Public path the stored files are served under
    #[serde(default = "Media::url_prefix_default")]
    pub url_prefix: String,
    #[serde(default = "Media::allowed_mime_types_default")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for Media {
    fn default() -> Self {
        Self {
            root_dir: Media::root_dir_default(),
            max_upload_bytes: Media::max_upload_bytes_default(),
            url_prefix: Media::url_prefix_default(),
            allowed_mime_types: Media::allowed_mime_types_default(),
        }
    }
}

impl Media {
    fn root_dir_default() -> String {
        MEDIA_DIR.into()
    }

    fn max_upload_bytes_default() -> usize {
        50 * 1024 * 1024
    }

    fn url_prefix_default() -> String {
        "/media".into()
    }

    fn allowed_mime_types_default() -> Vec<String> {
        [
            "image/jpeg",
            "image/png",
            "image/webp",
            "image/gif",
            "image/heic",
            "video/mp4",
            "video/webm",
            "video/quicktime",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Public URL for a stored file name.
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), file_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rsvp {
    #[serde(default = "Rsvp::allow_self_registration_default")]
    pub allow_self_registration: bool,
    /// Length of generated invitation codes
    #[serde(default = "Rsvp::code_length_default")]
    pub code_length: usize,
    /// Upper bound on seats any single invitation may confirm
    #[serde(default = "Rsvp::max_party_size_default")]
    pub max_party_size: i32,
}

impl Default for Rsvp {
    fn default() -> Self {
        Self {
            allow_self_registration: Rsvp::allow_self_registration_default(),
            code_length: Rsvp::code_length_default(),
            max_party_size: Rsvp::max_party_size_default(),
        }
    }
}

impl Rsvp {
    fn allow_self_registration_default() -> bool {
        true
    }

    fn code_length_default() -> usize {
        8
    }

    fn max_party_size_default() -> i32 {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::new("does-not-exist".into()).unwrap();
        assert_eq!(settings.web.router_prefix, "/api");
        assert_eq!(settings.rsvp.code_length, 8);
        assert!(settings.media.allowed_mime_types.contains(&"image/jpeg".to_string()));
    }

    #[test]
    fn test_sqlite_url() {
        let sqlite = Sqlite::default();
        assert_eq!(sqlite.to_url(), "sqlite:./data/wedding.db?mode=rwc");

        let memory = Sqlite {
            path: ":memory:".into(),
            ..Default::default()
        };
        assert_eq!(memory.to_url(), "sqlite::memory:");
    }

    #[test]
    fn test_media_url_for() {
        let media = Media {
            url_prefix: "/media/".into(),
            ..Default::default()
        };
        assert_eq!(media.url_for("a.jpg"), "/media/a.jpg");
    }
}
