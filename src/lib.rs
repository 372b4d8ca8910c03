//! # Postbear
//!
//! A terminal HTTP client whose requests live in a plain-text `.http` file.
//!
//! ## Features
//! - Named requests with method, URL, headers and body
//! - Global variables substituted into `{{placeholders}}` at send time
//! - Lossless load/save of the request file, hand-editable in between
//! - One-off and named requests from the command line
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)
//!
//! The request file format itself lives in [`httpfile`] and is pure:
//! [`httpfile::parse`] and [`httpfile::serialize`] never touch the disk.

pub mod app;
pub mod cli;
pub mod constants;
pub mod httpfile;
pub mod messages;
pub mod models;
pub mod network;
pub mod params;
pub mod storage;
pub mod ui;
pub mod vars;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use httpfile::{parse, serialize};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{RequestCollection, RequestEntry, Response};
pub use network::NetworkActor;
pub use storage::StorageError;
