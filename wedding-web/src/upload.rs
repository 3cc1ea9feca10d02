//! Multipart parsing shared by the admin upload and the guest photo upload.

use actix_multipart::{Field, Multipart};
use futures::StreamExt;
use std::collections::HashMap;
use tracing::debug;
use wedding_error::{web::WebError, WebResult};
use wedding_models::{enums::common::MediaKind, settings::Media};
use wedding_storage::{MediaStore, StagedUpload};

/// Name of the multipart part carrying the file.
pub(crate) const FILE_FIELD: &str = "file";

const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

/// A validated file staged in the media root plus the text parts sent with it.
pub(crate) struct MediaUpload {
    pub staged: StagedUpload,
    pub original_name: String,
    pub mime: String,
    pub kind: MediaKind,
    fields: HashMap<String, String>,
}

impl MediaUpload {
    /// Trimmed text part, `None` when missing or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.text(name)
            .and_then(|v| match v.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Some(true),
                "false" | "0" | "off" | "no" => Some(false),
                _ => None,
            })
    }

    pub fn number(&self, name: &str) -> Option<i32> {
        self.text(name).and_then(|v| v.parse().ok())
    }

    /// Title from the form, falling back to the uploaded file's stem.
    pub fn title(&self) -> String {
        self.text("title").map(str::to_string).unwrap_or_else(|| {
            std::path::Path::new(&self.original_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled")
                .to_string()
        })
    }

    pub fn size_bytes(&self) -> i64 {
        i64::try_from(self.staged.size()).unwrap_or(i64::MAX)
    }
}

/// Reads the whole multipart body. The `file` part is streamed into the media
/// root; every other part is kept as text.
pub(crate) async fn read_media_upload(
    multipart: &mut Multipart,
    store: &MediaStore,
    limits: &Media,
) -> WebResult<MediaUpload> {
    let mut fields = HashMap::new();
    let mut file: Option<(StagedUpload, String, String, MediaKind)> = None;

    while let Some(field) = multipart.next().await {
        let mut field = field?;
        let name = field.name().unwrap_or_default().to_string();
        if name == FILE_FIELD {
            if file.is_some() {
                return Err(WebError::BadRequest("only one file may be uploaded".into()));
            }
            file = Some(stage_file(&mut field, store, limits).await?);
        } else {
            let value = read_text(&mut field, &name).await?;
            fields.insert(name, value);
        }
    }

    let (staged, original_name, mime, kind) =
        file.ok_or_else(|| WebError::BadRequest("No file uploaded".into()))?;
    Ok(MediaUpload {
        staged,
        original_name,
        mime,
        kind,
        fields,
    })
}

async fn stage_file(
    field: &mut Field,
    store: &MediaStore,
    limits: &Media,
) -> WebResult<(StagedUpload, String, String, MediaKind)> {
    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename().map(String::from))
        .unwrap_or_default();
    let mime = field
        .content_type()
        .map(|m| m.essence_str().to_ascii_lowercase())
        .ok_or_else(|| WebError::BadRequest("file content type is missing".into()))?;

    if !limits
        .allowed_mime_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&mime))
    {
        return Err(WebError::BadRequest(format!("unsupported file type {mime}")));
    }
    let kind = MediaKind::from_mime(&mime)
        .ok_or_else(|| WebError::BadRequest(format!("unsupported file type {mime}")))?;

    let name = (!original_name.is_empty()).then_some(original_name.as_str());
    let mut staged = store.stage(name, &mime)?;
    let limit = limits.max_upload_bytes as u64;
    while let Some(chunk) = field.next().await {
        let data = chunk?;
        if staged.size() + data.len() as u64 > limit {
            // dropping `staged` removes the partial file
            return Err(WebError::BadRequest(format!(
                "file exceeds the {limit} byte upload limit"
            )));
        }
        staged.write_chunk(&data).await?;
    }
    if staged.size() == 0 {
        return Err(WebError::BadRequest("uploaded file is empty".into()));
    }

    debug!(file = %original_name, %mime, size = staged.size(), "Upload staged");
    Ok((staged, original_name, mime, kind))
}

async fn read_text(field: &mut Field, name: &str) -> WebResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk?;
        if buf.len() + data.len() > MAX_TEXT_FIELD_BYTES {
            return Err(WebError::BadRequest(format!("field {name} is too large")));
        }
        buf.extend_from_slice(&data);
    }
    String::from_utf8(buf).map_err(|_| WebError::BadRequest(format!("field {name} is not UTF-8")))
}
