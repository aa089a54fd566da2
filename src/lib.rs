//! A terminal browser for the TVMaze show catalog written in Rust.
//!
//! tvmaze-browser fetches the TVMaze show list once at startup and lets you
//! browse it as a list of cards. Selecting a show loads its episodes, which
//! are cached for the rest of the session.
//!
//! # Features
//!
//! - Case-insensitive filtering by name, genre or summary
//! - Picking a single show or episode from a selector
//! - Episode lists fetched lazily and cached per show
//! - Late responses for abandoned shows never overwrite the current view
//!
//! # Usage
//!
//! ```bash
//! # Run against the public API
//! cargo run
//!
//! # Run against a local mirror with debug logging
//! cargo run -- --shows-url http://localhost:8080/shows \
//!     --episodes-url 'http://localhost:8080/shows/{id}/episodes' -l 3
//! ```

pub mod api;
pub mod browser;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod tui;
pub mod types;
