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


//! EditionGuard API client implementation
//!
//! [`EditionGuardClient`] is the single entry point. The operations are split
//! by resource:
//!
//! - `book` - upload, update, list, delete books; generate download links
//! - `delivery` - email download links, list downloads
//! - `transaction` - per-recipient fulfillment records
//! - `master_link` - reusable links that mint transactions

pub mod book;
pub mod client;
pub mod delivery;
pub mod master_link;
pub mod query;
pub mod resource;
pub mod transaction;

// Re-export commonly used types
pub use book::DrmType;
pub use client::{ClientConfig, ClientConfigBuilder, EditionGuardClient, DEFAULT_BASE_URL};
pub use delivery::BookListEntry;
pub use query::{to_params, Params};
pub use transaction::TransactionUpdate;
