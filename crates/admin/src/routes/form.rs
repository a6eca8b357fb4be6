//! Multipart form decoding shared by the editors with image uploads.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::AppError;
use crate::services::{MediaError, MediaStore};

/// A file field from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
}

/// Fully buffered multipart form.
///
/// Text fields keep every value in submission order. File inputs left empty
/// by the browser are skipped.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl MultipartForm {
    /// Read every part of the request body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the body is not valid multipart data.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_owned) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.push_file(&name, UploadedFile { file_name, bytes });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.push_text(&name, value);
            }
        }

        Ok(form)
    }

    /// Add a text value.
    pub fn push_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .entry(name.to_owned())
            .or_default()
            .push(value.into());
    }

    /// Add a file.
    pub fn push_file(&mut self, name: &str, file: UploadedFile) {
        self.files.entry(name.to_owned()).or_default().push(file);
    }

    /// First value of a text field, or `""` when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }

    /// First value of a text field, trimmed, or `None` when blank.
    #[must_use]
    pub fn optional_text(&self, name: &str) -> Option<String> {
        let value = self.text(name).trim();
        (!value.is_empty()).then(|| value.to_owned())
    }

    /// Every value of a repeated text field.
    #[must_use]
    pub fn all(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// First uploaded file for a field.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).and_then(|files| files.first())
    }

    /// Every uploaded file for a field.
    #[must_use]
    pub fn files(&self, name: &str) -> &[UploadedFile] {
        self.files.get(name).map_or(&[], Vec::as_slice)
    }
}

/// Store an upload under `folder` and return its public URL.
///
/// # Errors
///
/// Returns a user-facing message when the file is rejected or cannot be written.
pub async fn store_upload<M: MediaStore>(
    media: &M,
    folder: &str,
    file: &UploadedFile,
) -> Result<String, String> {
    media
        .upload_image(folder, &file.file_name, file.bytes.clone())
        .await
        .map_err(|e| {
            if matches!(e, MediaError::Io(_)) {
                tracing::error!(error = %e, "Failed to store upload");
                format!("Could not save {}", file.file_name)
            } else {
                format!("{}: {e}", file.file_name)
            }
        })
}
