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


//! Master links
//!
//! A master link is reusable: each redemption creates a new transaction and
//! yields a new download. Expiry (number of uses, expiry date) is set through
//! the optional parameters.

use crate::api::client::EditionGuardClient;
use crate::api::query::{self, Params};
use crate::error::Result;
use reqwest::Method;
use serde_json::{json, Value};

impl EditionGuardClient {
    /// Get details of one master link
    pub async fn get_master_link(&self, id: &str) -> Result<Value> {
        self.request_json(Method::GET, &["master_link", id], &Params::new(), None).await
    }

    /// List all master links on the account
    pub async fn get_master_links(&self, optional: &Params) -> Result<Value> {
        self.request_json(Method::GET, &["master_link"], optional, None).await
    }

    /// Create a master link for the book identified by `resource_id`
    pub async fn create_master_link(&self, resource_id: &str, optional: &Params) -> Result<Value> {
        let params = resource_params(resource_id, optional);
        self.request_json(Method::POST, &["master_link"], &params, None).await
    }

    /// Partially update a master link
    pub async fn update_master_link(&self, id: &str, resource_id: &str, optional: &Params) -> Result<Value> {
        let params = resource_params(resource_id, optional);
        self.request_json(Method::PATCH, &["master_link", id], &params, None).await
    }

    /// Delete a master link, making it unusable
    ///
    /// Returns `true` if the API answered 2xx.
    pub async fn delete_master_link(&self, id: &str) -> Result<bool> {
        self.request_status(Method::DELETE, &["master_link", id], &Params::new()).await
    }
}

fn resource_params(resource_id: &str, optional: &Params) -> Params {
    let mut defaults = Params::new();
    defaults.insert("resource_id".to_string(), json!(resource_id));
    query::merge(defaults, optional)
}
