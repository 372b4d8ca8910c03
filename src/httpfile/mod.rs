//! Request file format
//!
//! A plain-text, line-oriented format holding a global variable block and a
//! list of named requests:
//!
//! ```text
//! ### ||| POSTBEAR |||
//! ### Global Variables
//! @host = https://api.example.com
//!
//! ### Create user
//! POST {{host}}/users
//! Content-Type: application/json
//!
//! {"name": "Ada"}
//! ```
//!
//! Headers and body are told apart by line shape only: a line containing `:`
//! starts a header run, a line starting with `{` or `[` starts the body.

pub mod headers;
pub mod parser;
pub mod serializer;

pub use parser::{parse, HeaderPhase, ParseState, Parser};
pub use serializer::{check_request, serialize, UnsavableRequest};
