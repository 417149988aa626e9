//! Jarvis Console - terminal client for the Jarvis assistant backend
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - login and log polling

use std::io;
use std::sync::Arc;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use jarvis_console::app::{AppActor, AppState};
use jarvis_console::config::Config;
use jarvis_console::constants::APP_NAME;
use jarvis_console::messages::ui_events::{key_to_ui_event, LoginField, Screen};
use jarvis_console::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use jarvis_console::network::{create_client, HttpBackend, NetworkActor};
use jarvis_console::ui::{centered_rect, mask, message_lines, render_input, scroll_offset};

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
    let config = Config::load()?;

    // Initialize logging to file, the terminal belongs to the UI
    let log_path = config.log_path();
    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let log_name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "jarvis-console.log".into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(backend = %config.backend_url, poll_ms = config.poll_interval_ms, "Starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let http = HttpBackend::new(create_client(config.request_timeout()), config.backend_url.clone());
    let network_actor = NetworkActor::new(Arc::new(http), config.poll_interval(), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(config.backend_url.clone()), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
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
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.alert.is_some(),
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        // let the app actor shut the network actor down
                        tokio::time::sleep(Duration::from_millis(20)).await;
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

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, chunks[0]);
    match state.screen {
        Screen::Login => draw_login(f, state, chunks[1]),
        Screen::Chat => draw_chat(f, state, chunks[1]),
    }
    draw_status_bar(f, state, chunks[2]);

    if state.show_help {
        draw_help_popup(f, state.screen, area);
    }
    if let Some(alert) = &state.alert {
        draw_alert_popup(f, &alert.title, &alert.message, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::styled(format!(" {}", state.backend_url), Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_login(f: &mut Frame, state: &RenderState, area: Rect) {
    let form_area = centered_rect(60, 60, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(1),
            Constraint::Length(1), // Button hint
            Constraint::Min(0),
        ])
        .split(form_area);

    let email_focused = state.login_field == LoginField::Email;
    let masked = mask(state.password_len);

    f.render_widget(render_input(&state.email, " Email ", email_focused), chunks[0]);
    f.render_widget(render_input(&masked, " Password ", !email_focused), chunks[1]);

    let button = if state.is_submitting {
        Span::styled("[ Logging in... ]", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("[ Login ]  Enter     [ Register ]  Ctrl+R", Style::default().fg(Color::Cyan).bold())
    };
    f.render_widget(Paragraph::new(Line::from(button)).alignment(Alignment::Center), chunks[3]);

    if state.alert.is_none() && !state.show_help && !state.is_submitting {
        let field = if email_focused { chunks[0] } else { chunks[1] };
        let max_x = field.x + field.width.saturating_sub(2);
        let cursor_x = (field.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, field.y + 1));
    }
}

fn draw_chat(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Jarvis ")
        .title_bottom(
            Line::from(
                state
                    .last_updated
                    .as_ref()
                    .map(|t| format!(" updated {} ", t))
                    .unwrap_or_default(),
            )
            .right_aligned(),
        );

    let inner = block.inner(area);
    let lines = if state.messages.is_empty() {
        vec![Line::from(Span::styled(
            "Waiting for Jarvis...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        message_lines(&state.messages, inner.width)
    };

    let offset = scroll_offset(lines.len(), inner.height, state.scroll_from_bottom);
    let log = Paragraph::new(lines).block(block).scroll((offset, 0));
    f.render_widget(log, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = match state.screen {
        Screen::Login if state.is_submitting => " Contacting backend... ",
        Screen::Login => " Tab:next field | Enter:login | Ctrl+R:register | F1:help | Esc:quit ",
        Screen::Chat => " ↑/↓:scroll | End:latest | l:logout | ?:help | q:quit ",
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, screen: Screen, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = match screen {
        Screen::Login => {
            r#"
 LOGIN

   Tab / ↑ / ↓        Switch between email and password
   Enter              Log in
   Ctrl+R             Register a new account
   Esc / Ctrl+C       Quit

 Press any key to close...
"#
        }
        Screen::Chat => {
            r#"
 CHAT LOG

   ↑ / k              Scroll up
   ↓ / j              Scroll down
   End / G            Jump to latest message
   l / Esc            Log out
   q / Ctrl+C         Quit

 The log refreshes every few seconds.

 Press any key to close...
"#
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_alert_popup(f: &mut Frame, title: &str, message: &str, area: Rect) {
    let popup_area = centered_rect(50, 25, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", title))
        .style(Style::default().bg(Color::Black));

    let text = vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from(Span::styled("Press any key", Style::default().fg(Color::DarkGray))),
    ];
    let alert = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(alert, popup_area);
}
