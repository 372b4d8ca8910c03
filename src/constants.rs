//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// First line of every saved request file. Cosmetic only, never parsed back.
pub const FILE_MARKER: &str = "### ||| POSTBEAR |||";

/// Section header introducing the global variable block
pub const GLOBALS_HEADER: &str = "### Global Variables";

/// Prefix shared by every section header line
pub const SECTION_PREFIX: &str = "### ";

/// Delimiter between a global variable name and its value
pub const GLOBAL_VAR_DELIMITER: &str = " = ";

/// Request file used when none is given on the command line
pub const DEFAULT_FILE_NAME: &str = "postbear.http";

/// Extension appended to request file names that lack it
pub const HTTP_EXTENSION: &str = ".http";

/// Log file written next to the request file
pub const LOG_FILE_NAME: &str = "postbear.log";

/// Timeout applied to every outgoing request
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agent sent by one-off command line requests
pub const USER_AGENT: &str = concat!("postbear/", env!("CARGO_PKG_VERSION"));

/// Name given to requests created from the UI
pub const NEW_REQUEST_NAME: &str = "New Request";

/// Headers pre-filled on requests created from the UI
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("Accept", "*/*"),
    ("Connection", "keep-alive"),
    ("Content-Type", "application/json"),
];

/// Methods the method selector cycles through
pub const METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Application name
pub const APP_NAME: &str = "POSTBEAR";
