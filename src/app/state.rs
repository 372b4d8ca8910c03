//! App state - the loaded collection plus everything the editor needs

use std::path::{Path, PathBuf};

use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{RequestCollection, RequestEntry, Response};
use crate::storage;

/// Main application state
pub struct AppState {
    // Request file
    pub file_path: PathBuf,
    pub collection: RequestCollection,
    pub selected: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub response_scroll: u16,
    /// Rows being edited in the params panel
    pub params_buffer: String,

    // HTTP Response
    pub response: Response,
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,

    // Status line
    pub message: String,

    // Popups
    pub show_help: bool,
    pub show_env: bool,
    pub env_buffer: String,
}

impl AppState {
    /// Load the request file and build the initial state
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let (collection, message) = match storage::load(&file_path) {
            Ok(collection) => (collection, String::from("Ctrl+C to quit, ? for help")),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load request file");
                (RequestCollection::default(), format!("Error: {}", e))
            }
        };
        Self::with_collection(file_path, collection, message)
    }

    /// Build state around an already loaded collection
    pub fn with_collection(
        file_path: PathBuf,
        mut collection: RequestCollection,
        message: String,
    ) -> Self {
        if collection.requests.is_empty() {
            collection.requests.push(RequestEntry::blank());
        }
        AppState {
            file_path,
            collection,
            selected: 0,
            active_panel: Panel::Requests,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            response_scroll: 0,
            params_buffer: String::new(),
            response: Response::welcome(),
            is_loading: false,
            next_request_id: 1,
            pending_request_id: None,
            message,
            show_help: false,
            show_env: false,
            env_buffer: String::new(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn current_request(&self) -> Option<&RequestEntry> {
        self.collection.requests.get(self.selected)
    }

    pub fn current_request_mut(&mut self) -> Option<&mut RequestEntry> {
        self.collection.requests.get_mut(self.selected)
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        if self.active_panel == Panel::Params {
            return &self.params_buffer;
        }
        let Some(request) = self.current_request() else {
            return "";
        };
        match self.active_panel {
            Panel::Name => &request.name,
            Panel::Url => &request.url,
            Panel::Headers => &request.headers,
            Panel::Body => &request.body,
            _ => "",
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        let panel = self.active_panel;
        if panel == Panel::Params {
            return self
                .current_request()
                .is_some()
                .then_some(&mut self.params_buffer);
        }
        let request = self.current_request_mut()?;
        match panel {
            Panel::Name => Some(&mut request.name),
            Panel::Url => Some(&mut request.url),
            Panel::Headers => Some(&mut request.headers),
            Panel::Body => Some(&mut request.body),
            _ => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            file_name: self
                .file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            requests: self.collection.requests.clone(),
            selected: self.selected,
            global_var_count: self.collection.global_vars.len(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            params_buffer: self.params_buffer.clone(),
            response: self.response.clone(),
            response_scroll: self.response_scroll,
            is_loading: self.is_loading,
            message: self.message.clone(),
            show_help: self.show_help,
            show_env: self.show_env,
            env_buffer: self.env_buffer.clone(),
        }
    }
}
