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


//! Delivery emails and download listing
//!
//! # API Endpoints
//! - `POST deliver-book-link` - Email a download link for one book
//! - `POST deliver-book-links` - Email download links for several books
//! - `GET download` - List books fulfilled through their download link
//!
//! Deliveries report a boolean outcome: `true` when the API accepted the
//! request (2xx), `false` otherwise.

use crate::api::client::EditionGuardClient;
use crate::api::query::{self, Params};
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One book in a multi-book delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookListEntry {
    /// Book resource id, e.g. `urn:uuid:cf5475bd-ac2a-4443-9809-71fd8211fd65`
    pub resource_id: String,
    /// Number of download links to send for this book
    pub quantity: u32,
}

impl BookListEntry {
    pub fn new<S: Into<String>>(resource_id: S, quantity: u32) -> Self {
        Self {
            resource_id: resource_id.into(),
            quantity,
        }
    }
}

impl EditionGuardClient {
    /// Email a download link for the book identified by `resource_id`
    ///
    /// A `full_name` in `optional` is not required but is shown in the email.
    pub async fn deliver_book_link(&self, resource_id: &str, email: &str, optional: &Params) -> Result<bool> {
        let mut defaults = Params::new();
        defaults.insert("resource_id".to_string(), json!(resource_id));
        defaults.insert("email".to_string(), json!(email));

        let params = query::merge(defaults, optional);
        self.request_status(Method::POST, &["deliver-book-link"], &params).await
    }

    /// Email download links for several books in one message
    ///
    /// `book_list` is sent as `book_list[i][resource_id]` / `book_list[i][quantity]`.
    pub async fn deliver_book_links(
        &self,
        book_list: &[BookListEntry],
        email: &str,
        optional: &Params,
    ) -> Result<bool> {
        let mut defaults = Params::new();
        defaults.insert("book_list".to_string(), json!(book_list));
        defaults.insert("email".to_string(), json!(email));

        let params = query::merge(defaults, optional);
        self.request_status(Method::POST, &["deliver-book-links"], &params).await
    }

    /// List books fulfilled through their download link
    ///
    /// Downloads differ from transactions: a book can be purchased without
    /// ever being downloaded.
    pub async fn download(&self, optional: &Params) -> Result<Value> {
        self.request_json(Method::GET, &["download"], optional, None).await
    }
}
