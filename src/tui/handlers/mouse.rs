//! Mouse handling for the search dropdown and the widget grid.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::tui::{layout_areas, AppState, Focus};

/// Handle a mouse event on the main screen
///
/// Popups are keyboard-only; mouse input is ignored while one is open.
pub fn handle_mouse_event(state: &mut AppState, mouse: MouseEvent) {
    if state.active_popup.is_some() || state.error_message.is_some() {
        return;
    }

    let areas = layout_areas(state.viewport);
    let dropdown = state.search.dropdown_area(areas.search, state.viewport);
    let position = Position::new(mouse.column, mouse.row);
    let in_dropdown = dropdown.filter(|area| area.contains(position));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(area) = in_dropdown {
                if let Some(index) = state.search.result_at(area, mouse.row) {
                    state.activate_result(index);
                }
                return;
            }

            let in_input = areas.search.contains(position);
            state.search.engine_mut().pointer_down(in_input);
            if in_input {
                state.focus = Focus::Search;
                state.search.engine_mut().focus();
            } else {
                state.focus = Focus::Dashboard;
                if areas.grid.contains(position) {
                    state
                        .grid
                        .focus_at(state.dashboard.store(), areas.grid, mouse.column, mouse.row);
                }
            }
        }
        MouseEventKind::Moved => {
            if let Some(index) = in_dropdown.and_then(|area| state.search.result_at(area, mouse.row)) {
                state.search.engine_mut().hover(index);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Lead;
    use crate::services::{MemoryLayoutPersistence, RecordSet};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use std::sync::Arc;

    fn state() -> AppState {
        let records = RecordSet {
            leads: ["Acme One", "Acme Two"]
                .iter()
                .enumerate()
                .map(|(i, name)| Lead {
                    id: format!("l{i}"),
                    lead_name: (*name).to_string(),
                    company_name: None,
                    email: None,
                    lead_status: None,
                })
                .collect(),
            ..RecordSet::default()
        };
        let mut state = AppState::new(
            Config::default(),
            Arc::new(records.clone()),
            Arc::new(MemoryLayoutPersistence::default()),
        );
        state.viewport = Rect::new(0, 0, 100, 40);

        // Populate results synchronously
        state.focus = Focus::Search;
        state.search.engine_mut().set_query("acme", std::time::Instant::now());
        state.search.engine_mut().search_now(&records);
        state
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_click_outside_closes_dropdown() {
        let mut state = state();
        assert!(state.search.dropdown_visible());
        handle_mouse_event(&mut state, click(90, 30));
        assert!(!state.search.engine().is_open());
        assert_eq!(state.focus, Focus::Dashboard);
    }

    #[test]
    fn test_click_in_input_keeps_dropdown() {
        let mut state = state();
        handle_mouse_event(&mut state, click(5, 1));
        assert!(state.search.engine().is_open());
        assert_eq!(state.focus, Focus::Search);
    }

    #[test]
    fn test_click_result_navigates() {
        let mut state = state();
        // Input rows 0..3, dropdown border at 3, "Leads" header at 4
        handle_mouse_event(&mut state, click(5, 6));
        assert_eq!(state.router.current(), Some("/leads?highlight=l1"));
        assert!(!state.search.engine().is_open());
    }

    #[test]
    fn test_hover_moves_selection() {
        let mut state = state();
        let hover = MouseEvent {
            kind: MouseEventKind::Moved,
            ..click(5, 6)
        };
        handle_mouse_event(&mut state, hover);
        assert_eq!(state.search.engine().selected_index(), 1);
    }
}
