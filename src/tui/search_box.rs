//! Global search input with a grouped result dropdown.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::services::{SearchEngine, SearchKey, SearchOutcome, SearchSettings};
use crate::tui::{Component, Theme};

/// Widest the dropdown gets, in cells.
const DROPDOWN_MAX_WIDTH: u16 = 72;

/// Events emitted by the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBoxEvent {
    /// A result was chosen; navigate to this target
    Navigate(String),
    /// The input gave up focus
    Blurred,
}

/// One rendered dropdown row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownRow {
    /// Group header for the group at this position in `grouped()`
    Header(usize),
    /// Result at this flat index
    Result(usize),
}

/// Search input state plus the engine behind it.
#[derive(Debug, Clone)]
pub struct SearchBox {
    engine: SearchEngine,
}

impl SearchBox {
    /// Creates an empty search box.
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            engine: SearchEngine::new(settings),
        }
    }

    /// The engine behind the input.
    #[must_use]
    pub const fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Mutable engine access for the event loop.
    pub fn engine_mut(&mut self) -> &mut SearchEngine {
        &mut self.engine
    }

    /// Dropdown rows in display order, headers included.
    #[must_use]
    pub fn rows(&self) -> Vec<DropdownRow> {
        let mut rows = Vec::new();
        for (group_index, group) in self.engine.grouped().iter().enumerate() {
            rows.push(DropdownRow::Header(group_index));
            rows.extend(group.entries.iter().map(|(index, _)| DropdownRow::Result(*index)));
        }
        rows
    }

    /// Whether the dropdown should be drawn.
    #[must_use]
    pub fn dropdown_visible(&self) -> bool {
        self.engine.is_open() && self.engine.meets_threshold(self.engine.query())
    }

    /// Screen area of the dropdown, directly below the input.
    ///
    /// Returns `None` while the dropdown is hidden.
    #[must_use]
    pub fn dropdown_area(&self, input: Rect, bounds: Rect) -> Option<Rect> {
        if !self.dropdown_visible() {
            return None;
        }
        // One line for the loading or empty message when there are no rows
        let content = u16::try_from(self.rows().len().max(1)).unwrap_or(u16::MAX);
        let top = input.bottom();
        let available = bounds.bottom().saturating_sub(top);
        let height = content.saturating_add(2).min(available);
        if height < 3 {
            return None;
        }
        Some(Rect::new(
            input.x,
            top,
            input.width.min(DROPDOWN_MAX_WIDTH),
            height,
        ))
    }

    /// First dropdown row drawn, chosen so the selected result is on screen.
    #[must_use]
    pub fn scroll_offset(&self, dropdown: Rect) -> usize {
        let visible = usize::from(dropdown.height.saturating_sub(2)).max(1);
        let selected = self.engine.selected_index();
        let Some(position) = self
            .rows()
            .iter()
            .position(|row| *row == DropdownRow::Result(selected))
        else {
            return 0;
        };
        (position + 1).saturating_sub(visible)
    }

    /// Maps a screen row inside `dropdown` to a result index.
    #[must_use]
    pub fn result_at(&self, dropdown: Rect, row: u16) -> Option<usize> {
        let first = dropdown.y + 1;
        if row < first || row >= dropdown.bottom().saturating_sub(1) {
            return None;
        }
        let offset = self.scroll_offset(dropdown);
        match self.rows().get(usize::from(row - first) + offset)? {
            DropdownRow::Result(index) => Some(*index),
            DropdownRow::Header(_) => None,
        }
    }

    /// Draws the input line.
    pub fn render_input(&self, f: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let border = if focused { theme.accent } else { theme.text_muted };
        let query = self.engine.query();
        let text = if query.is_empty() && !focused {
            Span::styled(
                "Search leads, contacts, deals... (/)",
                Style::default().fg(theme.text_muted),
            )
        } else {
            Span::styled(query.to_string(), Style::default().fg(theme.text))
        };
        let mut spans = vec![Span::styled("🔍 ", Style::default().fg(theme.primary)), text];
        if focused {
            spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
        }
        if self.engine.is_loading() {
            spans.push(Span::styled("  …", Style::default().fg(theme.warning)));
        }

        let input = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(input, area);
    }

    /// Draws the grouped dropdown, if open.
    pub fn render_dropdown(&self, f: &mut Frame, input: Rect, bounds: Rect, theme: &Theme) {
        let Some(area) = self.dropdown_area(input, bounds) else {
            return;
        };
        f.render_widget(Clear, area);

        let groups = self.engine.grouped();
        let selected = self.engine.selected_index();
        let mut lines: Vec<Line> = Vec::new();

        if groups.is_empty() {
            let message = if self.engine.is_loading() || self.engine.is_pending() {
                "Searching..."
            } else {
                "No results"
            };
            lines.push(Line::from(Span::styled(
                message,
                Style::default().fg(theme.text_muted),
            )));
        }

        for row in self.rows() {
            match row {
                DropdownRow::Header(group_index) => {
                    let header = groups
                        .get(group_index)
                        .map(|g| g.header.clone())
                        .unwrap_or_default();
                    lines.push(Line::from(Span::styled(
                        header,
                        Style::default()
                            .fg(theme.group_header)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                DropdownRow::Result(index) => {
                    let Some(result) = self.engine.results().get(index) else {
                        continue;
                    };
                    let style = if index == selected {
                        Style::default()
                            .bg(theme.highlight_bg)
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.text)
                    };
                    let mut spans = vec![Span::styled(format!("  {}", result.title), style)];
                    if let Some(subtitle) = &result.subtitle {
                        spans.push(Span::styled(
                            format!("  {subtitle}"),
                            Style::default().fg(theme.text_muted),
                        ));
                    }
                    lines.push(Line::from(spans));
                }
            }
        }

        let offset = u16::try_from(self.scroll_offset(area)).unwrap_or(u16::MAX);
        let dropdown = Paragraph::new(lines).scroll((offset, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary))
                .style(Style::default().bg(theme.surface)),
        );
        f.render_widget(dropdown, area);
    }
}

impl Component for SearchBox {
    type Event = SearchBoxEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        let search_key = match key.code {
            KeyCode::Up => Some(SearchKey::Up),
            KeyCode::Down => Some(SearchKey::Down),
            KeyCode::Enter => Some(SearchKey::Enter),
            KeyCode::Esc => Some(SearchKey::Escape),
            _ => None,
        };

        if let Some(search_key) = search_key {
            return match self.engine.handle_key(search_key) {
                SearchOutcome::Navigate(target) => Some(SearchBoxEvent::Navigate(target)),
                // Escape with nothing open gives focus back to the dashboard
                SearchOutcome::Ignored if search_key == SearchKey::Escape => {
                    Some(SearchBoxEvent::Blurred)
                }
                SearchOutcome::Ignored | SearchOutcome::Moved(_) | SearchOutcome::Closed => None,
            };
        }

        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.engine.set_query(String::new(), Instant::now());
            }
            KeyCode::Char(c) => {
                let mut query = self.engine.query().to_string();
                query.push(c);
                self.engine.set_query(query, Instant::now());
            }
            KeyCode::Backspace => {
                let mut query = self.engine.query().to_string();
                query.pop();
                self.engine.set_query(query, Instant::now());
            }
            KeyCode::Tab | KeyCode::BackTab => return Some(SearchBoxEvent::Blurred),
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        self.render_input(f, area, theme, true);
    }
}
