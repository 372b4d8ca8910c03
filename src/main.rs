//! Postbear - terminal HTTP client backed by a `.http` request file
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use postbear::cli::{self, Cli};
use postbear::constants::{APP_NAME, LOG_FILE_NAME};
use postbear::messages::ui_events::{key_to_ui_event, InputMode, Panel};
use postbear::models::method_has_body;
use postbear::params::{parse_query, to_lines};
use postbear::ui::{cursor_offset, highlight_json, method_color, panel_block, status_color};
use postbear::{
    storage, AppActor, AppState, NetworkActor, NetworkCommand, NetworkResponse, RenderState,
    UiEvent,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let file_path = storage::resolve_path(&args.file)?;
    match args.command {
        Some(command) => cli::run(&file_path, command).await,
        None => run_tui(file_path).await,
    }
}

async fn run_tui(file_path: PathBuf) -> anyhow::Result<()> {
    let state = AppState::new(file_path);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_env,
                ) {
                    let quit = event == UiEvent::Quit;
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(main_chunks[1]);

    draw_requests_list(f, state, content[0]);
    draw_editor(f, state, content[1]);
    draw_status_bar(f, state, main_chunks[2]);

    if state.show_env {
        draw_env_popup(f, state, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Red).bold(),
        ),
        Span::raw(" "),
        Span::styled(state.file_name.clone(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("  {} global variable(s)", state.global_var_count),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_requests_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Requests;

    let items: Vec<ListItem> = state
        .requests
        .iter()
        .map(|req| {
            let method_span = Span::styled(
                format!("{:7}", req.method),
                Style::default().fg(method_color(&req.method)).bold(),
            );
            ListItem::new(Line::from(vec![method_span, Span::raw(req.name.clone())]))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block(
            format!(" Requests ({}) n:new d:del ", state.requests.len()),
            is_focused,
            false,
        ))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_editor(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Name
            Constraint::Length(3),      // Method + URL
            Constraint::Percentage(40), // Params + Headers + Body
            Constraint::Min(5),         // Response
        ])
        .split(area);

    let Some(request) = state.current() else {
        let empty = Paragraph::new("No request selected. Press 'n' to add one.")
            .block(panel_block(" Request ", false, false));
        f.render_widget(empty, area);
        return;
    };

    draw_text_field(f, state, chunks[0], Panel::Name, Line::from(" Name "), &request.name);

    let loading = if state.is_loading { " [...]" } else { "" };
    let url_title = Line::from(Span::styled(
        format!(" {}{} ", request.method, loading),
        Style::default().fg(method_color(&request.method)).bold(),
    ));
    draw_text_field(f, state, chunks[1], Panel::Url, url_title, &request.url);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(40),
        ])
        .split(chunks[2]);

    // The buffer is only live while the panel is being edited
    let params = if state.active_panel == Panel::Params && state.input_mode == InputMode::Editing {
        state.params_buffer.clone()
    } else {
        to_lines(&parse_query(&request.params))
    };
    draw_text_field(f, state, middle[0], Panel::Params, Line::from(" Params (key=value) "), &params);
    draw_text_field(f, state, middle[1], Panel::Headers, Line::from(" Headers (JSON) "), &request.headers);
    let body_title = if method_has_body(&request.method) {
        " Body "
    } else {
        " Body (not sent with this method) "
    };
    draw_text_field(f, state, middle[2], Panel::Body, Line::from(body_title), &request.body);

    draw_response(f, state, chunks[3]);
}

/// Editable text field; multi-line fields scroll to keep the cursor visible
fn draw_text_field(
    f: &mut Frame,
    state: &RenderState,
    area: Rect,
    panel: Panel,
    title: Line<'static>,
    text: &str,
) {
    let is_focused = state.active_panel == panel;
    let is_editing = is_focused && state.input_mode == InputMode::Editing;
    let block = panel_block(title, is_focused, is_editing);

    if !is_editing {
        let content = if matches!(panel, Panel::Headers | Panel::Body) {
            Text::from(highlight_json(text))
        } else {
            Text::raw(text.to_string())
        };
        f.render_widget(Paragraph::new(content).block(block), area);
        return;
    }

    let (row, col) = cursor_offset(text, state.cursor_position);
    let inner_height = area.height.saturating_sub(2).max(1);
    let inner_width = area.width.saturating_sub(2).max(1);
    let scroll_y = row.saturating_sub(inner_height - 1);
    let scroll_x = col.saturating_sub(inner_width - 1);

    let paragraph = Paragraph::new(text.to_string())
        .block(block)
        .scroll((scroll_y, scroll_x));
    f.render_widget(paragraph, area);

    f.set_cursor_position(Position::new(
        area.x + 1 + col - scroll_x,
        area.y + 1 + row - scroll_y,
    ));
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Response;

    let status_text = match state.response.status_code {
        Some(code) => Span::styled(
            format!(" {} {} ", code, state.response.status_text),
            Style::default().fg(status_color(code)).bold(),
        ),
        None => Span::raw(" Response "),
    };

    let time_text = if state.response.time_ms > 0 {
        format!(" {}ms ", state.response.time_ms)
    } else {
        String::new()
    };

    let block = panel_block(status_text, is_focused, false)
        .title_bottom(Line::from(time_text).right_aligned());

    let response = Paragraph::new(highlight_json(&state.response.body))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.is_loading {
        " Loading... "
    } else if state.show_env {
        " Ctrl+S:save variables | Esc:back "
    } else if state.input_mode == InputMode::Editing {
        " Esc:stop editing | arrows:move | Ctrl+S:save "
    } else {
        " Tab:panel | e:edit | m:method | s:send | v:vars | Ctrl+S:save | ?:help | q:quit "
    };

    let bar = Line::from(vec![
        Span::styled(format!(" {} ", state.message), Style::default().fg(Color::Yellow)),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(bar), area);
}

fn draw_env_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(70, 60, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Global Variables (JSON) - Ctrl+S to save, Esc to go back ")
        .style(Style::default().bg(Color::Black));

    let input = Paragraph::new(state.env_buffer.as_str()).block(block);

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);

    let (row, col) = cursor_offset(&state.env_buffer, state.env_buffer.len());
    let max_x = popup_area.x + popup_area.width.saturating_sub(2);
    let max_y = popup_area.y + popup_area.height.saturating_sub(2);
    f.set_cursor_position(Position::new(
        (popup_area.x + 1 + col).min(max_x),
        (popup_area.y + 1 + row).min(max_y),
    ));
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 POSTBEAR - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   ↑ / ↓              Select request / scroll response

 REQUESTS
   n                  New request
   d                  Delete selected request (list panel)
   m                  Cycle HTTP method
   s / Enter          Send selected request
   e / Enter          Edit name, URL, params, headers or body
                      Params are key=value rows, one per line
   Ctrl+S             Save all requests to the file

 GLOBAL VARIABLES
   v                  Edit variables as JSON
   Ctrl+S             Save variables (requests are kept)
   {{name}}           Placeholder replaced when sending

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
