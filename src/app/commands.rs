//! Command handlers - business logic for processing UI events

use std::collections::BTreeMap;

use crate::app::AppState;
use crate::httpfile::check_request;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{next_method, RequestEntry, Response};
use crate::params::{parse_lines, parse_query, to_lines, with_query};
use crate::storage;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    // ========================
    // Requests list
    // ========================

    pub fn next_request(&mut self) {
        let len = self.collection.requests.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn prev_request(&mut self) {
        let len = self.collection.requests.len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    pub fn new_request(&mut self) {
        self.collection.requests.push(RequestEntry::blank());
        self.selected = self.collection.requests.len() - 1;
        self.active_panel = Panel::Url;
        self.message = String::from("New request added, press Ctrl+S to save");
    }

    pub fn delete_request(&mut self) {
        if self.selected < self.collection.requests.len() {
            let removed = self.collection.requests.remove(self.selected);
            self.message = format!("Deleted '{}', press Ctrl+S to save", removed.name);
        }
        if self.selected >= self.collection.requests.len() {
            self.selected = self.collection.requests.len().saturating_sub(1);
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.active_panel == Panel::Params {
            if let Some(rows) = self
                .current_request()
                .map(|request| to_lines(&parse_query(&request.params)))
            {
                self.params_buffer = rows;
            }
        }
        if self.active_panel.is_editable() && self.current_request().is_some() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        if cursor_pos <= input.len() && input.is_char_boundary(cursor_pos) {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
            self.after_edit();
        }
    }

    pub fn insert_newline(&mut self) {
        if self.active_panel.is_multiline() {
            self.enter_char('\n');
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        let prev_pos = input[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        input.remove(prev_pos);
        self.cursor_position = prev_pos;
        self.after_edit();
    }

    fn after_edit(&mut self) {
        match self.active_panel {
            Panel::Url => {
                if let Some(request) = self.current_request_mut() {
                    request.sync_params();
                }
            }
            Panel::Params => {
                let pairs = parse_lines(&self.params_buffer);
                if let Some(request) = self.current_request_mut() {
                    request.url = with_query(&request.url, &pairs);
                    request.sync_params();
                }
            }
            _ => {}
        }
    }

    // ========================
    // HTTP Method
    // ========================

    pub fn cycle_method(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(request) = self.current_request_mut() {
            request.method = next_method(&request.method).to_string();
        }
    }

    // ========================
    // Persistence
    // ========================

    /// Write every request to disk, keeping the globals already there.
    ///
    /// Refuses while any request would not read back as itself, and selects
    /// the first such request.
    pub fn save_file(&mut self) {
        self.stop_editing();
        let problem = self
            .collection
            .requests
            .iter()
            .enumerate()
            .find_map(|(i, request)| check_request(request).err().map(|e| (i, e)));
        if let Some((index, problem)) = problem {
            tracing::info!(%problem, "Refusing to save request file");
            self.selected = index;
            self.message = format!("Not saved: {}", problem);
            return;
        }

        match storage::save_requests(&self.file_path, &self.collection.requests) {
            Ok(()) => {
                self.message = format!("Requests saved in {}", self.file_path.display());
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save requests");
                self.message = format!("Error saving file: {}", e);
            }
        }
    }

    /// Global variables as currently stored on disk
    fn disk_globals(&self) -> BTreeMap<String, String> {
        match storage::load_global_vars(&self.file_path) {
            Ok(vars) => vars,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to in-memory global variables");
                self.collection.global_vars.clone()
            }
        }
    }

    // ========================
    // Global variables editor
    // ========================

    pub fn open_env(&mut self) {
        let vars = self.disk_globals();
        self.env_buffer = if vars.is_empty() {
            String::from("{}")
        } else {
            serde_json::to_string_pretty(&vars).unwrap_or_else(|_| String::from("{}"))
        };
        self.show_env = true;
        self.message = String::from("Ctrl+S to save variables, Esc to go back");
    }

    pub fn close_env(&mut self) {
        self.show_env = false;
        self.message = String::from("Ctrl+C to quit, ? for help");
    }

    pub fn env_char(&mut self, c: char) {
        self.env_buffer.push(c);
    }

    pub fn env_backspace(&mut self) {
        self.env_buffer.pop();
    }

    /// Parse the editor buffer and write it as the file's globals
    pub fn save_env(&mut self) {
        let vars: BTreeMap<String, String> = match serde_json::from_str(&self.env_buffer) {
            Ok(vars) => vars,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected global variables buffer");
                self.message = String::from("Error: Invalid JSON for environment variables");
                return;
            }
        };

        match storage::save_global_vars(&self.file_path, &vars) {
            Ok(()) => {
                self.collection.global_vars = vars;
                self.message = format!(
                    "Environment variables saved to {}!",
                    self.file_path.display()
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save global variables");
                self.message = format!("Error saving file: {}", e);
            }
        }
    }

    // ========================
    // Sending
    // ========================

    /// Build the network command for the selected request
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        self.stop_editing();
        let request = self.current_request()?.clone();
        let variables = self.disk_globals();

        let id = self.next_id();
        self.pending_request_id = Some(id);
        self.is_loading = true;
        self.response_scroll = 0;
        let missing = request.unresolved_vars(&variables);
        self.message = if missing.is_empty() {
            String::from("Sending request...")
        } else {
            tracing::warn!(?missing, "Sending with unresolved variables");
            format!("Sending request... unresolved: {}", missing.join(", "))
        };

        Some(NetworkCommand::ExecuteRequest {
            id,
            request,
            variables,
        })
    }

    pub fn handle_response(&mut self, response: NetworkResponse) {
        if self.pending_request_id != Some(response.id()) {
            tracing::debug!(id = response.id(), "Ignoring stale response");
            return;
        }
        self.pending_request_id = None;
        self.is_loading = false;

        match response {
            NetworkResponse::Success { response, .. } => {
                self.message = String::from("Request sent!");
                self.response = response;
            }
            NetworkResponse::Error {
                message, time_ms, ..
            } => {
                self.message = message.clone();
                self.response = Response {
                    body: message,
                    time_ms,
                    ..Default::default()
                };
            }
        }
    }

    // ========================
    // Help
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::httpfile::headers::decode_headers;
    use crate::models::RequestCollection;
    use std::fs;
    use tempfile::TempDir;

    fn state_with(dir: &TempDir, text: &str) -> AppState {
        let path = dir.path().join("app.http");
        fs::write(&path, text).unwrap();
        AppState::new(path)
    }

    #[test]
    fn test_empty_file_gets_blank_request() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(dir.path().join("new.http"));
        assert_eq!(state.collection.requests.len(), 1);
        assert_eq!(state.collection.requests[0].name, "New Request");
    }

    #[test]
    fn test_editing_url_refreshes_params() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nGET /a\n");
        state.active_panel = Panel::Url;
        state.start_editing();
        for c in "?x=1".chars() {
            state.enter_char(c);
        }
        let request = state.current_request().unwrap();
        assert_eq!(request.url, "/a?x=1");
        assert_eq!(request.params, "?x=1");

        state.delete_char();
        state.delete_char();
        state.delete_char();
        state.delete_char();
        assert_eq!(state.current_request().unwrap().params, "");
    }

    #[test]
    fn test_editing_params_rewrites_url() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nGET {{host}}/items?page=1\n");
        state.active_panel = Panel::Params;
        state.start_editing();
        assert_eq!(state.params_buffer, "page=1");

        state.delete_char();
        state.enter_char('2');
        state.insert_newline();
        for c in "limit=10".chars() {
            state.enter_char(c);
        }
        let request = state.current_request().unwrap();
        assert_eq!(request.url, "{{host}}/items?page=2&limit=10");
        assert_eq!(request.params, "?page=2&limit=10");

        state.params_buffer.clear();
        state.cursor_position = 0;
        state.enter_char(' ');
        assert_eq!(state.current_request().unwrap().url, "{{host}}/items");
    }

    #[test]
    fn test_cursor_handles_multibyte() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nGET /é\n");
        state.active_panel = Panel::Url;
        state.start_editing();
        state.move_cursor_left();
        state.enter_char('x');
        assert_eq!(state.current_request().unwrap().url, "/xé");
    }

    #[test]
    fn test_newline_only_in_multiline_panels() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nPOST /a\n");
        state.active_panel = Panel::Name;
        state.start_editing();
        state.insert_newline();
        assert_eq!(state.current_request().unwrap().name, "R");

        state.active_panel = Panel::Body;
        state.start_editing();
        state.enter_char('{');
        state.insert_newline();
        state.enter_char('}');
        assert_eq!(state.current_request().unwrap().body, "{\n}");
    }

    #[test]
    fn test_save_file_preserves_globals() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### Global Variables\n@host = api.test\n\n### R\nGET /a\n");
        state.new_request();
        state.save_file();

        let loaded = storage::load(state.file_path()).unwrap();
        assert_eq!(loaded.global_vars["host"], "api.test");
        assert_eq!(loaded.requests.len(), 2);
    }

    #[test]
    fn test_save_refused_while_new_request_has_no_url() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nGET /a\n");
        state.new_request();
        state.selected = 0;
        state.save_file();

        assert!(state.message.starts_with("Not saved"));
        assert_eq!(state.selected, 1);
        assert_eq!(storage::load(state.file_path()).unwrap().requests.len(), 1);

        state.active_panel = Panel::Url;
        state.start_editing();
        for c in "/b".chars() {
            state.enter_char(c);
        }
        state.save_file();

        let loaded = storage::load(state.file_path()).unwrap();
        assert_eq!(loaded.requests.len(), 2);
        assert_eq!(loaded.requests[1].method, "GET");
        assert_eq!(loaded.requests[1].url, "/b");
        assert_eq!(
            decode_headers(&loaded.requests[1].headers).unwrap().len(),
            crate::constants::DEFAULT_HEADERS.len()
        );
    }

    #[test]
    fn test_save_keeps_unnamed_request_separate() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### A\nPOST /a\n\n{\"a\":1}\n\n### B\nGET /b\n");
        state.selected = 1;
        state.active_panel = Panel::Name;
        state.start_editing();
        state.delete_char();
        state.save_file();

        let loaded = storage::load(state.file_path()).unwrap();
        assert_eq!(loaded.requests.len(), 2);
        assert_eq!(loaded.requests[0].body, "{\"a\":1}");
        assert_eq!(loaded.requests[1].name, "");
        assert_eq!(loaded.requests[1].url, "/b");
    }

    #[test]
    fn test_save_env_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nGET /a\n");
        state.open_env();
        assert_eq!(state.env_buffer, "{}");
        state.env_backspace();
        state.save_env();
        assert!(state.message.starts_with("Error"));
        assert!(storage::load_global_vars(state.file_path()).unwrap().is_empty());
    }

    #[test]
    fn test_save_env_keeps_saved_requests() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nGET /a\n");
        state.open_env();
        state.env_buffer = String::from(r#"{"host": "api.test"}"#);
        state.save_env();

        let loaded: RequestCollection = storage::load(state.file_path()).unwrap();
        assert_eq!(loaded.global_vars["host"], "api.test");
        assert_eq!(loaded.requests.len(), 1);
        assert_eq!(state.collection.global_vars["host"], "api.test");
    }

    #[test]
    fn test_prepare_and_handle_response() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### Global Variables\n@host = api.test\n\n### R\nGET {{host}}/a\n");

        let cmd = state.prepare_request().unwrap();
        let NetworkCommand::ExecuteRequest { id, variables, .. } = cmd else {
            panic!("expected an execute command");
        };
        assert_eq!(variables["host"], "api.test");
        assert_eq!(state.message, "Sending request...");
        assert!(state.is_loading);
        assert!(state.prepare_request().is_none());

        state.handle_response(NetworkResponse::Error {
            id: id + 100,
            message: "stale".to_string(),
            time_ms: 1,
        });
        assert!(state.is_loading);

        state.handle_response(NetworkResponse::Success {
            id,
            response: Response {
                status_code: Some(200),
                body: "ok".to_string(),
                ..Default::default()
            },
        });
        assert!(!state.is_loading);
        assert_eq!(state.response.status_code, Some(200));
    }

    #[test]
    fn test_send_reports_unresolved_variables() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### R\nGET {{host}}/a?key={{api_key}}\n");
        assert!(state.prepare_request().is_some());
        assert_eq!(state.message, "Sending request... unresolved: api_key, host");
    }

    #[test]
    fn test_delete_and_navigation() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, "### A\nGET /a\n### B\nGET /b\n");
        state.prev_request();
        assert_eq!(state.selected, 1);
        state.delete_request();
        assert_eq!(state.selected, 0);
        assert_eq!(state.current_request().unwrap().name, "A");
        state.cycle_method();
        assert_eq!(state.current_request().unwrap().method, "POST");
    }
}
