//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_email_char, can_add_field_char, can_add_password_char, can_add_search_char, App,
    AppState, LoginFocus, Tab,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Any key dismisses a one-off status message
    app.status_message = None;

    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::EditingUser => {
            handle_edit_input(app, key);
            return Ok(false);
        }
        AppState::Searching => {
            handle_search_input(app, key);
            return Ok(false);
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Quitting => return Ok(true),
        AppState::Normal => {}
    }

    // Settings tab owns ←/→ and Esc for its form
    if app.current_tab == Tab::Settings && handle_settings_input(app, key) {
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.current_tab = Tab::Dashboard,
        KeyCode::Char('2') => app.current_tab = Tab::Users,
        KeyCode::Char('3') => app.current_tab = Tab::Settings,
        KeyCode::Right | KeyCode::Tab => app.current_tab = app.current_tab.next(),
        KeyCode::Left | KeyCode::BackTab => app.current_tab = app.current_tab.prev(),
        KeyCode::Char('d') => app.toggle_dark_mode(),
        KeyCode::Char('L') => app.logout(),
        _ => {
            if app.current_tab == Tab::Users {
                handle_users_input(app, key);
            }
        }
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            // Enter in the password field submits, like a web form
            LoginFocus::Password | LoginFocus::Button => app.attempt_login().await,
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.chars().count(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
            app.apply_search();
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.apply_search();
        }
        KeyCode::Char(c) => {
            if can_add_search_char(app.search_query.chars().count(), c) {
                app.search_query.push(c);
                app.apply_search();
            }
        }
        _ => {}
    }
}

fn handle_edit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.save_edit(),
        KeyCode::Down | KeyCode::Tab => {
            if let Some(form) = app.edit_form.as_mut() {
                form.focus = form.focus.next();
            }
        }
        KeyCode::Up | KeyCode::BackTab => {
            if let Some(form) = app.edit_form.as_mut() {
                form.focus = form.focus.prev();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.edit_form.as_mut() {
                form.focused_value_mut().pop();
                form.error = None;
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.edit_form.as_mut() {
                let value = form.focused_value_mut();
                if can_add_field_char(value.chars().count(), c) {
                    value.push(c);
                    form.error = None;
                }
            }
        }
        _ => {}
    }
}

fn handle_users_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_user_selection(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_user_selection(true),
        KeyCode::Char('n') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('p') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Char('/') => {
            app.search_query = app.listing.filters().search.clone();
            app.state = AppState::Searching;
        }
        KeyCode::Char('c') => app.cycle_city_filter(),
        KeyCode::Char('o') => app.cycle_company_filter(),
        KeyCode::Char('x') | KeyCode::Esc => app.clear_filters(),
        KeyCode::Char('r') => app.refresh_users(),
        KeyCode::Enter => app.begin_edit(),
        _ => {}
    }
}

/// Returns true if the key was consumed by the settings form
fn handle_settings_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.settings_field = app.settings_field.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_field = app.settings_field.next(),
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right => app.adjust_setting(true),
        KeyCode::Left => app.adjust_setting(false),
        KeyCode::Char('s') => app.save_settings(),
        KeyCode::Esc => app.cancel_settings(),
        KeyCode::Char('R') => app.reset_settings(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use admindash_core::api::{ApiError, HttpRequest, HttpResponse, HttpTransport};
    use admindash_core::storage::MemoryStore;
    use admindash_core::Config;
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;

    struct OfflineTransport;

    #[async_trait]
    impl HttpTransport for OfflineTransport {
        async fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Network("offline".to_string()))
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        let config = Config {
            login_delay_ms: 0,
            max_retries: 0,
            ..Config::default()
        };
        let mut app = App::with_backends(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(OfflineTransport),
        )
        .unwrap();
        app.login_email.clear();
        app.login_password.clear();
        app
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_login_via_keyboard() {
        let mut app = test_app();
        app.start_login();

        type_text(&mut app, "admin@example.com").await;
        handle_input(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.login_focus, LoginFocus::Password);
        type_text(&mut app, "admin123").await;
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.state, AppState::Normal);
        assert!(app.is_authenticated());
    }

    #[tokio::test]
    async fn test_escape_on_login_quits() {
        let mut app = test_app();
        app.start_login();
        let quit = handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert!(quit);
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_email_field_rejects_spaces() {
        let mut app = test_app();
        app.start_login();
        type_text(&mut app, "a b").await;
        assert_eq!(app.login_email, "ab");
        handle_input(&mut app, key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.login_email, "a");
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert_eq!(app.state, AppState::ConfirmingQuit);
        handle_input(&mut app, key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        let quit = handle_input(&mut app, key(KeyCode::Char('y'))).await.unwrap();
        assert!(quit);
    }

    #[tokio::test]
    async fn test_tab_switching() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('2'))).await.unwrap();
        assert_eq!(app.current_tab, Tab::Users);
        handle_input(&mut app, key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.current_tab, Tab::Settings);
        // ←/→ belong to the settings form here; Tab still moves on
        handle_input(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.current_tab, Tab::Dashboard);
    }

    #[tokio::test]
    async fn test_settings_keys() {
        let mut app = test_app();
        app.current_tab = Tab::Settings;

        handle_input(&mut app, key(KeyCode::Char(' '))).await.unwrap();
        assert!(app.settings_draft.dark_mode);
        assert!(app.settings_has_changes());

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert!(!app.settings_has_changes());

        handle_input(&mut app, key(KeyCode::Down)).await.unwrap();
        handle_input(&mut app, key(KeyCode::Char(' '))).await.unwrap();
        handle_input(&mut app, key(KeyCode::Char('s'))).await.unwrap();
        assert!(!app.settings.preferences().notifications.email);
        assert!(!app.settings_has_changes());
    }

    #[tokio::test]
    async fn test_search_mode_filters_as_you_type() {
        let mut app = test_app();
        app.current_tab = Tab::Users;
        handle_input(&mut app, key(KeyCode::Char('/'))).await.unwrap();
        assert_eq!(app.state, AppState::Searching);

        type_text(&mut app, "qq").await;
        assert_eq!(app.listing.filters().search, "qq");
        // 'q' is text while searching, not quit
        assert_eq!(app.state, AppState::Searching);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.listing.filters().search.is_empty());
    }

    #[tokio::test]
    async fn test_dark_mode_shortcut() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('d'))).await.unwrap();
        assert!(app.dark_mode());
    }
}
