//! Status bar widget for displaying status messages and key hints

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::help_overlay::{bindings_for, HelpContext};
use super::{AppState, Theme};
use crate::services::SaveStatus;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar: message line, then key hints
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let mut first = Vec::new();

        if let Some(error) = &state.error_message {
            first.push(Span::styled("ERROR: ", Style::default().fg(theme.error)));
            first.push(Span::raw(error.clone()));
        } else if !state.status_message.is_empty() {
            first.push(Span::raw(state.status_message.clone()));
        } else {
            first.push(Span::styled(
                "Route: ",
                Style::default().fg(theme.primary),
            ));
            first.push(Span::raw(
                state.router.current().unwrap_or("/dashboard").to_string(),
            ));
        }

        if let Some(save) = Self::save_span(state, theme) {
            first.push(Span::raw("  "));
            first.push(save);
        }
        if state.search.engine().is_loading() {
            first.push(Span::styled("  Searching…", Style::default().fg(theme.warning)));
        }

        let status = Paragraph::new(vec![Line::from(first), Self::hints_line(state, theme)])
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Status ")
                    .style(Style::default().bg(theme.background)),
            );

        f.render_widget(status, area);
    }

    fn save_span(state: &AppState, theme: &Theme) -> Option<Span<'static>> {
        let status = state
            .customizer
            .as_ref()
            .map_or_else(|| state.dashboard.save_status(), |c| c.controller().save_status());
        let color = match status {
            SaveStatus::Idle => return None,
            SaveStatus::Saving => theme.warning,
            SaveStatus::Saved => theme.success,
            SaveStatus::Failed(_) => theme.error,
        };
        Some(Span::styled(status.to_string(), Style::default().fg(color)))
    }

    /// Bottom line of short hints for the current context
    fn hints_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let context = state.help_context();
        let mut spans: Vec<Span<'static>> = Vec::new();

        for binding in bindings_for(context).iter().filter(|b| b.hint.is_some()) {
            if !spans.is_empty() {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(
                binding.keys,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(": "));
            spans.push(Span::styled(
                binding.hint.unwrap_or(binding.action),
                Style::default().fg(theme.text_muted),
            ));
        }

        if context != HelpContext::Help {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("?", Style::default().fg(theme.accent)));
            spans.push(Span::raw(": Help"));
        }

        Line::from(spans)
    }
}
