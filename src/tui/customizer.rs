//! Dashboard customizer modal.
//!
//! Lists every catalog widget with a visibility switch. Widgets are reordered
//! with a keyboard drag: pick one up, move the drop marker, and drop it.
//! Releasing with Esc drops nowhere and leaves the order alone.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::PersistedLayout;
use crate::services::{LayoutController, SaveStatus};
use crate::tui::{centered_rect, Component, Theme};

/// Events emitted by the customizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomizerEvent {
    /// The user asked to save; persist this layout and report back
    SaveRequested(PersistedLayout),
    /// Edits were discarded and the modal should close
    Cancelled,
}

/// Interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomizerMode {
    /// Moving the cursor and toggling switches
    Browsing,
    /// Carrying a widget to a new position
    Dragging {
        /// Index the widget was picked up from
        source: usize,
        /// Index it would land on
        target: usize,
    },
}

/// Customizer modal state
#[derive(Debug, Clone)]
pub struct Customizer {
    controller: LayoutController,
    selected: usize,
    mode: CustomizerMode,
    closed: bool,
}

impl Customizer {
    /// Opens the customizer over a freshly initialized controller.
    #[must_use]
    pub const fn new(controller: LayoutController) -> Self {
        Self {
            controller,
            selected: 0,
            mode: CustomizerMode::Browsing,
            closed: false,
        }
    }

    /// The wrapped controller.
    #[must_use]
    pub const fn controller(&self) -> &LayoutController {
        &self.controller
    }

    /// Index of the highlighted row.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Current interaction mode.
    #[must_use]
    pub const fn mode(&self) -> CustomizerMode {
        self.mode
    }

    /// Records the outcome of a save requested via [`CustomizerEvent::SaveRequested`].
    ///
    /// A successful save closes the modal.
    pub fn finish_save(&mut self, saved: PersistedLayout, result: anyhow::Result<()>) {
        let ok = result.is_ok();
        self.controller.finish_save(saved, result);
        if ok {
            self.closed = true;
        }
    }

    /// Consumes the modal, returning the controller.
    #[must_use]
    pub fn into_controller(self) -> LayoutController {
        self.controller
    }

    fn len(&self) -> usize {
        self.controller.store().len()
    }

    fn select_previous(&mut self) {
        let count = self.len();
        if count > 0 {
            self.selected = if self.selected > 0 {
                self.selected - 1
            } else {
                count - 1
            };
        }
    }

    fn select_next(&mut self) {
        let count = self.len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    fn selected_key(&self) -> Option<String> {
        self.controller
            .store()
            .instances()
            .get(self.selected)
            .map(|instance| instance.key.clone())
    }

    fn handle_browsing(&mut self, key: KeyEvent) -> Option<CustomizerEvent> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char(' ') => {
                if let Some(key) = self.selected_key() {
                    self.controller.on_toggle(&key);
                }
            }
            KeyCode::Enter | KeyCode::Char('m') => {
                if self.len() > 0 {
                    self.mode = CustomizerMode::Dragging {
                        source: self.selected,
                        target: self.selected,
                    };
                }
            }
            KeyCode::Char('r') => {
                self.controller.on_reset();
                self.selected = 0;
            }
            KeyCode::Char('s') => {
                return self
                    .controller
                    .begin_save()
                    .map(CustomizerEvent::SaveRequested);
            }
            KeyCode::Esc => {
                self.controller.on_cancel();
                self.closed = true;
                return Some(CustomizerEvent::Cancelled);
            }
            _ => {}
        }
        None
    }

    fn handle_dragging(&mut self, key: KeyEvent, source: usize, target: usize) {
        let last = self.len().saturating_sub(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.mode = CustomizerMode::Dragging {
                    source,
                    target: target.saturating_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.mode = CustomizerMode::Dragging {
                    source,
                    target: (target + 1).min(last),
                };
            }
            KeyCode::Enter | KeyCode::Char('m') => {
                self.controller.on_drag_end(source, Some(target));
                self.selected = target;
                self.mode = CustomizerMode::Browsing;
            }
            KeyCode::Esc => {
                self.controller.on_drag_end(source, None);
                self.mode = CustomizerMode::Browsing;
            }
            _ => {}
        }
    }

    fn status_line(&self, theme: &Theme) -> Line<'static> {
        let status = self.controller.save_status();
        let color = match status {
            SaveStatus::Idle => theme.text_muted,
            SaveStatus::Saving => theme.warning,
            SaveStatus::Saved => theme.success,
            SaveStatus::Failed(_) => theme.error,
        };
        let hints = match self.mode {
            CustomizerMode::Browsing if self.controller.is_saving() => "",
            CustomizerMode::Browsing => {
                "↑↓ move  Space show/hide  Enter pick up  r reset  s save  Esc cancel"
            }
            CustomizerMode::Dragging { .. } => "↑↓ choose position  Enter drop  Esc release",
        };
        Line::from(vec![
            Span::styled(status.to_string(), Style::default().fg(color)),
            Span::raw(if status == &SaveStatus::Idle { "" } else { "  " }),
            Span::styled(hints, Style::default().fg(theme.text_secondary)),
        ])
    }
}

impl Component for Customizer {
    type Event = CustomizerEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        // Inputs are disabled until the in-flight save reports back
        if self.controller.is_saving() {
            return None;
        }
        match self.mode {
            CustomizerMode::Browsing => self.handle_browsing(key),
            CustomizerMode::Dragging { source, target } => {
                self.handle_dragging(key, source, target);
                None
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered_rect(60, 80, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Customize Dashboard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.surface));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let store = self.controller.store();
        let items: Vec<ListItem> = store
            .instances()
            .iter()
            .enumerate()
            .map(|(index, instance)| {
                let switch = if instance.visible { "[x]" } else { "[ ]" };
                let (marker, marker_style) = match self.mode {
                    CustomizerMode::Dragging { source, .. } if source == index => {
                        ("≡", Style::default().fg(theme.accent))
                    }
                    CustomizerMode::Dragging { target, .. } if target == index => {
                        ("→", Style::default().fg(theme.drop_target))
                    }
                    _ => (" ", Style::default()),
                };
                let label_style = if instance.visible {
                    Style::default().fg(theme.text)
                } else {
                    Style::default().fg(theme.text_muted)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{marker} "), marker_style),
                    Span::styled(format!("{switch} "), Style::default().fg(theme.primary)),
                    Span::styled(format!("{:<24}", instance.label), label_style),
                    Span::styled(instance.key.clone(), Style::default().fg(theme.text_muted)),
                ]))
            })
            .collect();

        let highlight = match self.mode {
            CustomizerMode::Browsing => Some(self.selected),
            CustomizerMode::Dragging { target, .. } => Some(target),
        };
        let mut list_state = ListState::default();
        list_state.select(highlight);

        let list = List::new(items).highlight_style(
            Style::default()
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, chunks[0], &mut list_state);

        f.render_widget(Paragraph::new(self.status_line(theme)), chunks[1]);
    }

    fn should_close(&self) -> bool {
        self.closed
    }
}
