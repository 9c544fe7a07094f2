//! # Protocolo
//!
//! A protocol tracking server, usable both as a standalone binary and as a library.
//!
//! Serves a JSON API with role-based logins, document templates with `{{tag}}`
//! placeholders, temporal protocol identifiers, and an append-only audit log,
//! all backed by a single SQLite database.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! protocolo = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use protocolo::auth::password;
//! use protocolo::server::{AppState, create_router};
//! use protocolo::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/protocolo.db")).unwrap();
//! store.initialize().unwrap();
//! store.seed_defaults(&password::hash("admin123").unwrap()).unwrap();
//!
//! let state = Arc::new(AppState { store: Arc::new(store) });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI entry point. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod store;
pub mod types;
