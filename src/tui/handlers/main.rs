//! Main screen input handler: dashboard grid and search box.

use anyhow::Result;
use crossterm::event::{self, KeyCode};

use crate::tui::{
    AppState, Component, ContextualComponent, DashboardEvent, Focus, PopupType, SearchBoxEvent,
};

/// Handle input for the main screen
pub fn handle_main_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    match state.focus {
        Focus::Search => handle_search_input(state, key),
        Focus::Dashboard => handle_dashboard_input(state, key),
    }
}

fn handle_search_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    match state.search.handle_input(key) {
        Some(SearchBoxEvent::Navigate(target)) => state.navigate(&target),
        Some(SearchBoxEvent::Blurred) => state.focus = Focus::Dashboard,
        None => {}
    }
    Ok(false)
}

fn handle_dashboard_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('/') => {
            state.focus = Focus::Search;
            state.search.engine_mut().focus();
        }
        KeyCode::Char('c') => state.open_customizer(),
        KeyCode::Char('?') => {
            state.help_overlay_state.scroll_to_top();
            state.active_popup = Some(PopupType::Help);
        }
        _ => match state.grid.handle_input(key, state.dashboard.store()) {
            Some(DashboardEvent::Resize { key, rect }) => state.resize_widget(&key, rect),
            Some(DashboardEvent::Open(route)) => state.navigate(&route),
            None => {}
        },
    }
    Ok(false)
}
