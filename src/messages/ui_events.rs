//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which screen is showing
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Login,
    Chat,
}

/// Focused field on the login form
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    pub fn next(&self) -> LoginField {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Login form
    NextField,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    SubmitLogin,
    SubmitRegister,

    // Chat log
    ScrollUp,
    ScrollDown,
    ScrollToLatest,
    Logout,

    // Popups
    DismissAlert,
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    show_alert: bool,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('r') if screen == Screen::Login && !show_alert => {
                return Some(UiEvent::SubmitRegister)
            }
            _ => return None,
        }
    }

    // Popups swallow the next key
    if show_alert {
        return Some(UiEvent::DismissAlert);
    }
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match screen {
        Screen::Login => handle_login_keys(key),
        Screen::Chat => handle_chat_keys(key),
    }
}

/// The login form is always in editing mode, so letters are text
fn handle_login_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::Quit),
        KeyCode::F(1) => Some(UiEvent::ToggleHelp),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::Enter => Some(UiEvent::SubmitLogin),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_chat_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') | KeyCode::F(1) => Some(UiEvent::ToggleHelp),
        KeyCode::Char('l') | KeyCode::Esc => Some(UiEvent::Logout),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
        KeyCode::End | KeyCode::Char('G') => Some(UiEvent::ScrollToLatest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letters_are_text_on_login() {
        let event = key_to_ui_event(press(KeyCode::Char('q')), Screen::Login, false, false);
        assert_eq!(event, Some(UiEvent::CharInput('q')));
    }

    #[test]
    fn test_q_quits_on_chat() {
        let event = key_to_ui_event(press(KeyCode::Char('q')), Screen::Chat, false, false);
        assert_eq!(event, Some(UiEvent::Quit));
    }

    #[test]
    fn test_alert_swallows_key() {
        let event = key_to_ui_event(press(KeyCode::Enter), Screen::Login, true, false);
        assert_eq!(event, Some(UiEvent::DismissAlert));
    }

    #[test]
    fn test_ctrl_r_registers() {
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(key, Screen::Login, false, false), Some(UiEvent::SubmitRegister));
        assert_eq!(key_to_ui_event(key, Screen::Chat, false, false), None);
    }
}
