//! # CLI Module
//!
//! Command implementations behind the `clouder` binary. The binary is mostly
//! a server launcher, with two read-only commands that print the curated
//! metadata straight from the document store for operators.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the HTTP API
//! - [`weeks`] - Prints all curated weeks as a table, newest first
//! - [`playlists`] - Prints the playlists curated for one week
//!
//! ## Usage Patterns
//!
//! ```bash
//! clouder serve                      # Serve on SERVER_ADDRESS
//! clouder serve --addr 127.0.0.1:9000
//! clouder weeks                      # What has been ingested?
//! clouder playlists 2025-W14         # Playlists of one week
//! ```
//!
//! Fatal problems (unreadable configuration, store failures) are reported
//! with the `error!` macro, which exits the process.

mod serve;
mod tables;

pub use serve::serve;
pub use tables::playlists;
pub use tables::weeks;
