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


//! Download transactions
//!
//! A transaction is one fulfillment of a book to one recipient. It carries the
//! download link, watermarking settings and a remaining-uses counter.
//!
//! # API Endpoints
//! - `GET transaction` / `GET transaction/{id}`
//! - `POST transaction` - Create a transaction for a `resource_id`
//! - `PUT transaction/{id}` - Replace watermarking and usage settings
//! - `DELETE transaction/{id}`

use crate::api::client::EditionGuardClient;
use crate::api::query::{self, Params};
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Full settings written by [`EditionGuardClient::update_transaction`]
///
/// `PUT` replaces the transaction, so every field is always sent, empty
/// strings included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    pub resource_id: String,
    /// Include download instructions instead of a direct download URL
    pub show_instructions: bool,
    pub watermark_name: String,
    pub watermark_email: String,
    pub watermark_phone: String,
    pub watermark_place_begin: bool,
    pub watermark_place_end: bool,
    pub watermark_place_random: bool,
    pub watermark_place_random_count: String,
    pub uses_remaining: String,
}

impl TransactionUpdate {
    pub fn new<S: Into<String>>(resource_id: S) -> Self {
        Self {
            resource_id: resource_id.into(),
            ..Self::default()
        }
    }

    /// Query parameters for this update, all ten fields present
    pub fn to_params(&self) -> Result<Params> {
        query::to_params(self)
    }
}

impl EditionGuardClient {
    /// Get one transaction
    pub async fn get_transaction(&self, id: &str) -> Result<Value> {
        self.request_json(Method::GET, &["transaction", id], &Params::new(), None).await
    }

    /// List transactions for all books, or one book via `resource_id` in `optional`
    pub async fn get_transactions(&self, optional: &Params) -> Result<Value> {
        self.request_json(Method::GET, &["transaction"], optional, None).await
    }

    /// Create a transaction for the book identified by `resource_id`
    ///
    /// The response includes the download link. Set `show_instructions` to
    /// `false` in `optional` to get a direct download URL.
    pub async fn create_transaction(&self, resource_id: &str, optional: &Params) -> Result<Value> {
        let mut defaults = Params::new();
        defaults.insert("resource_id".to_string(), json!(resource_id));

        let params = query::merge(defaults, optional);
        self.request_json(Method::POST, &["transaction"], &params, None).await
    }

    /// Replace a transaction's watermarking and usage settings
    pub async fn update_transaction(&self, id: &str, update: &TransactionUpdate, optional: &Params) -> Result<Value> {
        let params = query::merge(update.to_params()?, optional);
        self.request_json(Method::PUT, &["transaction", id], &params, None).await
    }

    /// Delete a transaction
    ///
    /// Returns `true` if the API answered 2xx.
    pub async fn delete_transaction(&self, id: &str) -> Result<bool> {
        self.request_status(Method::DELETE, &["transaction", id], &Params::new()).await
    }
}
