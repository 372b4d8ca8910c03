//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input mode for text fields
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Focusable panels, in Tab order
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Panel {
    #[default]
    Requests,
    Name,
    Url,
    Params,
    Headers,
    Body,
    Response,
}

impl Panel {
    const ORDER: [Panel; 7] = [
        Panel::Requests,
        Panel::Name,
        Panel::Url,
        Panel::Params,
        Panel::Headers,
        Panel::Body,
        Panel::Response,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Panel {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Panel {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Panels backed by a text field of the selected request
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            Panel::Name | Panel::Url | Panel::Params | Panel::Headers | Panel::Body
        )
    }

    /// Panels whose text may span several lines
    pub fn is_multiline(self) -> bool {
        matches!(self, Panel::Params | Panel::Headers | Panel::Body)
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Requests list
    NextRequest,
    PrevRequest,
    NewRequest,
    DeleteRequest,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Newline,
    Backspace,
    CursorLeft,
    CursorRight,

    // Request actions
    SendRequest,
    CycleMethod,
    SaveFile,

    // Global variables editor
    OpenEnv,
    EnvChar(char),
    EnvNewline,
    EnvBackspace,
    SaveEnv,
    CloseEnv,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UI event based on current state
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
    show_env: bool,
) -> Option<UiEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_env {
        return match key.code {
            KeyCode::Char('s') if ctrl => Some(UiEvent::SaveEnv),
            KeyCode::Esc => Some(UiEvent::CloseEnv),
            KeyCode::Enter => Some(UiEvent::EnvNewline),
            KeyCode::Backspace => Some(UiEvent::EnvBackspace),
            KeyCode::Char(c) if !ctrl => Some(UiEvent::EnvChar(c)),
            _ => None,
        };
    }

    if ctrl && key.code == KeyCode::Char('s') {
        return Some(UiEvent::SaveFile);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Char('e') | KeyCode::Enter if active_panel.is_editable() => {
                Some(UiEvent::StartEditing)
            }
            KeyCode::Enter if active_panel == Panel::Requests => Some(UiEvent::SendRequest),
            KeyCode::Char('s') => Some(UiEvent::SendRequest),
            KeyCode::Char('m') => Some(UiEvent::CycleMethod),
            KeyCode::Char('n') => Some(UiEvent::NewRequest),
            KeyCode::Char('d') if active_panel == Panel::Requests => Some(UiEvent::DeleteRequest),
            KeyCode::Char('v') => Some(UiEvent::OpenEnv),
            KeyCode::Up => match active_panel {
                Panel::Response => Some(UiEvent::ScrollUp),
                _ => Some(UiEvent::PrevRequest),
            },
            KeyCode::Down => match active_panel {
                Panel::Response => Some(UiEvent::ScrollDown),
                _ => Some(UiEvent::NextRequest),
            },
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Enter if active_panel.is_multiline() => Some(UiEvent::Newline),
            KeyCode::Enter if active_panel == Panel::Url => Some(UiEvent::SendRequest),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Tab => Some(UiEvent::StopEditing),
            KeyCode::Char(c) if !ctrl => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
