//! Line-oriented parser for request files.
//!
//! The file has no explicit delimiters between headers and body, so every
//! line is classified by its shape and fed through a small state machine.

use crate::constants::{FILE_MARKER, GLOBALS_HEADER, GLOBAL_VAR_DELIMITER, SECTION_PREFIX};
use crate::httpfile::headers::{encode_pairs, parse_header_line};
use crate::models::{RequestCollection, RequestEntry};

/// Where the parser currently is inside a request section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderPhase {
    /// Waiting for the `METHOD URL` line
    MethodLine,
    /// Method line seen; the next shaped line decides between headers and body
    Pending,
    /// Inside a run of `Key: Value` lines
    Collecting,
}

/// Parser state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseState {
    Outside,
    Globals,
    RequestHeaders(HeaderPhase),
    RequestBody,
}

/// Shape of a single input line
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Marker,
    GlobalsHeader,
    Section(&'a str),
    Blank,
    Content(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed == FILE_MARKER {
        LineKind::Marker
    } else if trimmed.starts_with(GLOBALS_HEADER) {
        LineKind::GlobalsHeader
    } else if let Some(name) = trimmed.strip_prefix(SECTION_PREFIX) {
        LineKind::Section(name)
    } else if trimmed == SECTION_PREFIX.trim_end() {
        // `### ` with an empty name loses its space to trimming
        LineKind::Section("")
    } else if trimmed.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Content(trimmed)
    }
}

fn starts_body(trimmed: &str) -> bool {
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

fn starts_header(trimmed: &str) -> bool {
    trimmed.contains(':') && !starts_body(trimmed)
}

/// Incremental request-file parser.
///
/// Feed it lines in order, then call [`Parser::finish`].
#[derive(Debug)]
pub struct Parser {
    state: ParseState,
    collection: RequestCollection,
    current: Option<RequestEntry>,
    header_run: Vec<(String, String)>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            state: ParseState::Outside,
            collection: RequestCollection::default(),
            current: None,
            header_run: Vec::new(),
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Consume one line of input
    pub fn feed(&mut self, line: &str) {
        self.state = match classify(line) {
            LineKind::Marker => {
                self.flush();
                ParseState::Outside
            }
            LineKind::GlobalsHeader => {
                self.flush();
                ParseState::Globals
            }
            LineKind::Section(name) => {
                self.flush();
                self.current = Some(RequestEntry {
                    name: name.to_string(),
                    ..Default::default()
                });
                ParseState::RequestHeaders(HeaderPhase::MethodLine)
            }
            kind => self.feed_content(kind, line),
        };
    }

    fn feed_content(&mut self, kind: LineKind<'_>, raw: &str) -> ParseState {
        match self.state {
            ParseState::Outside => {
                if let LineKind::Content(text) = kind {
                    tracing::debug!(line = text, "Skipping line outside any section");
                }
                ParseState::Outside
            }
            ParseState::Globals => {
                if let LineKind::Content(text) = kind {
                    self.global_var(text);
                }
                ParseState::Globals
            }
            ParseState::RequestHeaders(phase) => self.request_line(phase, kind, raw),
            ParseState::RequestBody => {
                self.push_body(raw);
                ParseState::RequestBody
            }
        }
    }

    fn global_var(&mut self, text: &str) {
        let Some(assignment) = text.strip_prefix('@') else {
            return;
        };
        match assignment.split_once(GLOBAL_VAR_DELIMITER) {
            Some((name, value)) => {
                self.collection
                    .global_vars
                    .insert(name.to_string(), value.to_string());
            }
            None => tracing::debug!(line = text, "Global variable without delimiter"),
        }
    }

    fn request_line(&mut self, phase: HeaderPhase, kind: LineKind<'_>, raw: &str) -> ParseState {
        let text = match kind {
            LineKind::Content(text) => text,
            _ => {
                // Blank line: closes a header run, otherwise meaningless here
                if phase == HeaderPhase::Collecting {
                    self.resolve_headers();
                    return ParseState::RequestHeaders(HeaderPhase::Pending);
                }
                return ParseState::RequestHeaders(phase);
            }
        };

        match phase {
            HeaderPhase::MethodLine => {
                if let (Some(entry), Some((method, url))) = (self.current.as_mut(), text.split_once(' ')) {
                    entry.method = method.to_string();
                    entry.url = url.to_string();
                    entry.sync_params();
                    ParseState::RequestHeaders(HeaderPhase::Pending)
                } else {
                    tracing::debug!(line = text, "Method line without a URL");
                    ParseState::RequestHeaders(HeaderPhase::MethodLine)
                }
            }
            HeaderPhase::Pending => {
                if starts_body(text) {
                    self.push_body(raw);
                    ParseState::RequestBody
                } else if starts_header(text) {
                    self.push_header(text);
                    ParseState::RequestHeaders(HeaderPhase::Collecting)
                } else {
                    tracing::debug!(line = text, "Dropping unrecognized request line");
                    ParseState::RequestHeaders(HeaderPhase::Pending)
                }
            }
            HeaderPhase::Collecting => {
                if starts_body(text) {
                    self.resolve_headers();
                    self.push_body(raw);
                    ParseState::RequestBody
                } else {
                    self.push_header(text);
                    ParseState::RequestHeaders(HeaderPhase::Collecting)
                }
            }
        }
    }

    fn push_header(&mut self, text: &str) {
        if let Some(pair) = parse_header_line(text) {
            self.header_run.push(pair);
        }
    }

    fn push_body(&mut self, raw: &str) {
        if let Some(entry) = self.current.as_mut() {
            entry.body.push_str(raw);
            entry.body.push('\n');
        }
    }

    /// Replace the current request's headers with the run collected so far
    fn resolve_headers(&mut self) {
        if let Some(entry) = self.current.as_mut() {
            entry.headers = encode_pairs(&self.header_run);
        }
        self.header_run.clear();
    }

    fn flush(&mut self) {
        if self.state == ParseState::RequestHeaders(HeaderPhase::Collecting) {
            self.resolve_headers();
        }
        self.header_run.clear();

        if let Some(mut entry) = self.current.take() {
            if !entry.is_defined() {
                tracing::debug!(name = %entry.name, "Dropping request without a method line");
                return;
            }
            entry.body = entry.body.trim().to_string();
            self.collection.requests.push(entry);
        }
    }

    /// Flush the request in progress and hand back the collection
    pub fn finish(mut self) -> RequestCollection {
        self.flush();
        self.collection
    }
}

/// Parse a whole request file. Never fails; unrecognized lines are skipped.
pub fn parse(text: &str) -> RequestCollection {
    text.lines()
        .fold(Parser::new(), |mut parser, line| {
            parser.feed(line);
            parser
        })
        .finish()
}
