// EditionGuard SDK - Rust client for the EditionGuard API
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Book file uploads
//!
//! Book uploads are a multipart body with a single part named `resource`.
//! EditionGuard uses the part's file name to decide how to process the book,
//! so the name is synthesized from the payload's sniffed MIME type:
//! `application/epub+zip` becomes `book.epub`, `application/pdf` becomes
//! `book.pdf`. Payloads that cannot be identified are sent as `book`.

use crate::error::{EditionGuardError, Result};
use reqwest::multipart::{Form, Part};

/// Multipart field name for the book payload
pub const RESOURCE_FIELD: &str = "resource";

/// Base file name for uploaded books
const FILE_STEM: &str = "book";

/// Content type for payloads that could not be identified
const FALLBACK_MIME: &str = "application/octet-stream";

/// Sniff the MIME type of a payload from its magic bytes
pub fn sniff_mime(resource: &[u8]) -> Option<&'static str> {
    infer::get(resource).map(|kind| kind.mime_type())
}

/// File extension for a MIME type
///
/// Takes the subtype and drops any structured-syntax suffix
/// (`application/epub+zip` -> `epub`).
pub fn extension_for_mime(mime: &str) -> Option<&str> {
    let (_, subtype) = mime.split_once('/')?;
    let subtype = subtype.split(';').next().unwrap_or(subtype).trim();
    let ext = subtype.split('+').next().unwrap_or(subtype);
    (!ext.is_empty()).then_some(ext)
}

/// File name sent for a payload of the given MIME type
pub fn file_name_for_mime(mime: Option<&str>) -> String {
    match mime.and_then(extension_for_mime) {
        Some(ext) => format!("{}.{}", FILE_STEM, ext),
        None => FILE_STEM.to_string(),
    }
}

/// File name sent for a payload, based on its sniffed MIME type
pub fn resource_file_name(resource: &[u8]) -> String {
    file_name_for_mime(sniff_mime(resource))
}

/// Build the multipart body for a book upload
///
/// # Errors
/// Returns `InvalidInput` if the sniffed MIME type is not a valid content type.
pub fn resource_form(resource: Vec<u8>) -> Result<Form> {
    let mime = sniff_mime(&resource);
    let file_name = file_name_for_mime(mime);

    tracing::debug!(file_name = %file_name, size = resource.len(), "Prepared book upload");

    let part = Part::bytes(resource)
        .file_name(file_name)
        .mime_str(mime.unwrap_or(FALLBACK_MIME))
        .map_err(|e| EditionGuardError::invalid_input(format!("Invalid resource content type: {}", e)))?;

    Ok(Form::new().part(RESOURCE_FIELD, part))
}
