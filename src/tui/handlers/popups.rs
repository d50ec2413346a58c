//! Popup input handlers: customizer modal and help overlay.

use anyhow::Result;
use crossterm::event::{self, KeyCode};
use tracing::warn;

use crate::tui::{AppState, Component, CustomizerEvent, PopupType};

/// Lines moved by PgUp/PgDn in the help overlay.
const HELP_PAGE: usize = 10;

/// Handle input for the active popup
pub fn handle_popup_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    match state.active_popup {
        Some(PopupType::Customizer) => handle_customizer_input(state, key),
        Some(PopupType::Help) => handle_help_overlay_input(state, key),
        None => Ok(false),
    }
}

/// Handle input for the customizer modal
pub fn handle_customizer_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let Some(customizer) = state.customizer.as_mut() else {
        state.active_popup = None;
        return Ok(false);
    };

    match customizer.handle_input(key) {
        Some(CustomizerEvent::SaveRequested(layout)) => {
            if let Err(e) = state.start_save(layout) {
                warn!(error = %e, "Failed to start layout save");
                state.set_error(format!("{e:#}"));
            }
        }
        Some(CustomizerEvent::Cancelled) => {
            state.close_customizer();
            state.set_status("Changes discarded");
        }
        None => {}
    }
    Ok(false)
}

/// Handle input for help overlay
pub fn handle_help_overlay_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?' | 'q') => state.active_popup = None,
        KeyCode::Up | KeyCode::Char('k') => state.help_overlay_state.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => state.help_overlay_state.scroll_down(),
        KeyCode::PageUp => state.help_overlay_state.page_up(HELP_PAGE),
        KeyCode::PageDown => state.help_overlay_state.page_down(HELP_PAGE),
        KeyCode::Home => state.help_overlay_state.scroll_to_top(),
        KeyCode::End => state.help_overlay_state.scroll_to_bottom(),
        _ => {}
    }
    Ok(false)
}
