//! # Stockman
//!
//! A product catalog and admin API server, usable both as a standalone
//! binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! stockman = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::Path;
//! use stockman::server::{AppState, create_router};
//! use stockman::store::{SqliteStore, Store};
//! use stockman::uploads::UploadStorage;
//!
//! let store = SqliteStore::new("./data/stockman.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     uploads: UploadStorage::new(Path::new("./data")),
//!     require_margin: false,
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the binary's CLI. Disable with
//!   `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
pub mod uploads;
