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


//! Book management
//!
//! # API Endpoints
//! - `GET book` / `GET book/{id}` - List books, read one book
//! - `POST book` - Upload a new book (multipart `resource`)
//! - `PATCH book/{id}` - Replace a book's file and settings (multipart `resource`)
//! - `DELETE book/{id}` - Remove a book
//! - `POST book/{id}/generate_links` - Mint download links
//!
//! Upload and update send `title` and `drm` as query parameters. `drm`
//! defaults to the client's [`default_drm`](EditionGuardClient::default_drm)
//! (Adobe hardened unless configured otherwise); callers can override either
//! through the optional parameters.

use crate::api::client::EditionGuardClient;
use crate::api::query::{self, Params};
use crate::api::resource;
use crate::error::{EditionGuardError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// DRM protection scheme applied to an uploaded book
///
/// Serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum DrmType {
    /// Adobe Content Server, legacy (code 1)
    AdobeLegacy,
    /// Adobe Content Server, hardened (code 2)
    #[default]
    AdobeHardened,
    /// EditionMark social DRM watermarking (code 3)
    EditionMark,
    /// EditionLink, no DRM (code 4)
    EditionLink,
}

impl DrmType {
    /// Integer code used by the API
    pub fn code(self) -> i64 {
        match self {
            Self::AdobeLegacy => 1,
            Self::AdobeHardened => 2,
            Self::EditionMark => 3,
            Self::EditionLink => 4,
        }
    }
}

impl From<DrmType> for i64 {
    fn from(drm: DrmType) -> Self {
        drm.code()
    }
}

impl TryFrom<i64> for DrmType {
    type Error = EditionGuardError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Self::AdobeLegacy),
            2 => Ok(Self::AdobeHardened),
            3 => Ok(Self::EditionMark),
            4 => Ok(Self::EditionLink),
            other => Err(EditionGuardError::invalid_input(format!("Unknown DRM type code: {}", other))),
        }
    }
}

impl fmt::Display for DrmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl EditionGuardClient {
    /// Get all attributes of one book
    pub async fn get_book(&self, id: i64) -> Result<Value> {
        let id = id.to_string();
        self.request_json(Method::GET, &["book", &id], &Params::new(), None).await
    }

    /// List books, including DRM type, page count and other attributes
    ///
    /// `optional` is passed through as query parameters (filters, paging).
    pub async fn get_books(&self, optional: &Params) -> Result<Value> {
        self.request_json(Method::GET, &["book"], optional, None).await
    }

    /// Upload a new book
    ///
    /// `resource` is the ebook file. Its MIME type is sniffed to name the
    /// upload `book.<ext>`. DRM options such as expiry or device limits go in
    /// `optional`.
    ///
    /// # Errors
    /// Returns error if the request fails, the API answers non-2xx, or the
    /// response is not JSON.
    pub async fn save_book(&self, title: &str, resource: impl Into<Vec<u8>>, optional: &Params) -> Result<Value> {
        let params = self.book_params(title, optional);
        let form = resource::resource_form(resource.into())?;

        self.request_json(Method::POST, &["book"], &params, Some(form)).await
    }

    /// Replace a book's file and settings
    ///
    /// Parameters not provided are left unchanged by the API. DRM changes are
    /// not retroactive for copies already downloaded.
    pub async fn update_book(
        &self,
        id: i64,
        title: &str,
        resource: impl Into<Vec<u8>>,
        optional: &Params,
    ) -> Result<Value> {
        let id = id.to_string();
        let params = self.book_params(title, optional);
        let form = resource::resource_form(resource.into())?;

        self.request_json(Method::PATCH, &["book", &id], &params, Some(form)).await
    }

    /// Remove a book
    ///
    /// Returns `true` if the API answered 2xx.
    pub async fn delete_book(&self, id: i64) -> Result<bool> {
        let id = id.to_string();
        self.request_status(Method::DELETE, &["book", &id], &Params::new()).await
    }

    /// Generate `count` download links for a book
    pub async fn generate_book_links(&self, id: i64, count: u32) -> Result<Value> {
        let id = id.to_string();
        let mut params = Params::new();
        params.insert("links_count".to_string(), json!(count));

        self.request_json(Method::POST, &["book", &id, "generate_links"], &params, None)
            .await
    }

    /// `title` and `drm` defaults, with the caller's optional parameters on top
    fn book_params(&self, title: &str, optional: &Params) -> Params {
        let mut defaults = Params::new();
        defaults.insert("title".to_string(), json!(title));
        defaults.insert("drm".to_string(), json!(self.default_drm().code()));

        query::merge(defaults, optional)
    }
}
