//! Async client for the EditionGuard ebook DRM and distribution API
//!
//! Build one [`EditionGuardClient`] at startup and pass it (or a clone) to
//! whatever needs it:
//!
//! ```rust,no_run
//! use editionguard::{EditionGuardClient, Params};
//!
//! # async fn example() -> editionguard::Result<()> {
//! let client = EditionGuardClient::from_env()?;
//! let books = client.get_books(&Params::new()).await?;
//! println!("{}", books);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;

pub use api::{BookListEntry, ClientConfig, DrmType, EditionGuardClient, Params, TransactionUpdate};
pub use error::{EditionGuardError, Result};
