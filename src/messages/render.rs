//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, Panel};
use crate::models::{RequestEntry, Response};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub file_name: String,

    // Requests
    pub requests: Vec<RequestEntry>,
    pub selected: usize,
    pub global_var_count: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub params_buffer: String,

    // HTTP Response
    pub response: Response,
    pub response_scroll: u16,
    pub is_loading: bool,

    // Status line
    pub message: String,

    // Popups
    pub show_help: bool,
    pub show_env: bool,
    pub env_buffer: String,
}

impl RenderState {
    /// The request the editor panels show
    pub fn current(&self) -> Option<&RequestEntry> {
        self.requests.get(self.selected)
    }
}
