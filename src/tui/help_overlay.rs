//! Help overlay widget showing all keyboard shortcuts organized by context.
//!
//! The same binding table feeds the status bar hints, so the two never drift.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};

use super::Theme;

/// Where a key binding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpContext {
    /// Dashboard grid has focus
    Dashboard,
    /// Search input has focus
    Search,
    /// Customize dialog is open
    Customizer,
    /// Customize dialog while a widget is picked up
    Dragging,
    /// This overlay
    Help,
}

impl HelpContext {
    /// Section heading in the overlay.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "DASHBOARD",
            Self::Search => "SEARCH",
            Self::Customizer => "CUSTOMIZE",
            Self::Dragging => "MOVING A WIDGET",
            Self::Help => "HELP",
        }
    }
}

/// A key binding: keys, full description, and short status bar hint.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    /// Key label
    pub keys: &'static str,
    /// Description shown in the overlay
    pub action: &'static str,
    /// Short hint for the status bar, if the binding is shown there
    pub hint: Option<&'static str>,
}

const fn bind(keys: &'static str, action: &'static str, hint: Option<&'static str>) -> Binding {
    Binding { keys, action, hint }
}

/// All bindings, grouped by context in display order.
pub const BINDINGS: &[(HelpContext, &[Binding])] = &[
    (
        HelpContext::Dashboard,
        &[
            bind("Tab/→/l", "Focus next widget", Some("Next")),
            bind("Shift+Tab/←/h", "Focus previous widget", None),
            bind("Enter", "Open the page behind the widget", Some("Open")),
            bind("[ / ]", "Narrow or widen the focused widget", Some("Width")),
            bind("- / +", "Shorten or lengthen the focused widget", None),
            bind("/", "Focus the search box", Some("Search")),
            bind("c", "Customize which widgets are shown", Some("Customize")),
            bind("Click", "Focus a widget", None),
            bind("q / Ctrl+C", "Quit", Some("Quit")),
        ],
    ),
    (
        HelpContext::Search,
        &[
            bind("Type", "Search leads, contacts, deals, accounts, meetings, tasks", None),
            bind("↑/↓", "Move the highlighted result (wraps)", Some("Select")),
            bind("Enter", "Open the highlighted result", Some("Open")),
            bind("Ctrl+U", "Clear the query", None),
            bind("Esc", "Close results, press again to leave search", Some("Close")),
            bind("Tab", "Back to the dashboard", None),
            bind("Click", "Open a result; clicking outside closes the list", None),
        ],
    ),
    (
        HelpContext::Customizer,
        &[
            bind("↑/↓ or j/k", "Select a widget", Some("Select")),
            bind("Space", "Show or hide the selected widget", Some("Toggle")),
            bind("Enter/m", "Pick up the widget to move it", Some("Move")),
            bind("r", "Reset to defaults (all widgets shown)", Some("Reset")),
            bind("s", "Save the layout", Some("Save")),
            bind("Esc", "Discard changes and close", Some("Cancel")),
        ],
    ),
    (
        HelpContext::Dragging,
        &[
            bind("↑/↓", "Choose the drop position", Some("Position")),
            bind("Enter/m", "Drop the widget here", Some("Drop")),
            bind("Esc", "Release without moving", Some("Release")),
        ],
    ),
    (
        HelpContext::Help,
        &[
            bind("↑/↓ or j/k", "Scroll", Some("Scroll")),
            bind("PgUp/PgDn", "Scroll a page", None),
            bind("Home/End", "Jump to top or bottom", None),
            bind("Esc/?/q", "Close help", Some("Close")),
        ],
    ),
];

/// Bindings for one context.
#[must_use]
pub fn bindings_for(context: HelpContext) -> &'static [Binding] {
    BINDINGS
        .iter()
        .find(|(c, _)| *c == context)
        .map_or(&[], |(_, bindings)| bindings)
}

/// State for the help overlay.
#[derive(Debug, Clone)]
pub struct HelpOverlayState {
    /// Current scroll offset (line number)
    pub scroll_offset: usize,
    /// Total number of content lines
    total_lines: usize,
}

impl Default for HelpOverlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpOverlayState {
    /// Creates a new help overlay state.
    #[must_use]
    pub fn new() -> Self {
        let total_lines = Self::help_content(&Theme::dark()).len();
        Self {
            scroll_offset: 0,
            total_lines,
        }
    }

    /// Scroll up by one line.
    pub const fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down by one line.
    pub const fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < self.total_lines {
            self.scroll_offset += 1;
        }
    }

    /// Scroll to the top.
    pub const fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scroll to the bottom.
    pub const fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.total_lines.saturating_sub(1);
    }

    /// Scroll down by a page.
    pub fn page_down(&mut self, visible_height: usize) {
        self.scroll_offset =
            (self.scroll_offset + visible_height).min(self.total_lines.saturating_sub(1));
    }

    /// Scroll up by a page.
    pub const fn page_up(&mut self, visible_height: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(visible_height);
    }

    fn help_content(theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Dashboard - Help",
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (context, bindings) in BINDINGS {
            lines.push(Line::from(Span::styled(
                format!("═══ {} ═══", context.title()),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for binding in *bindings {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<16}", binding.keys),
                        Style::default().fg(theme.success),
                    ),
                    Span::styled(binding.action, Style::default().fg(theme.text)),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines
    }

    /// Renders the overlay centered in `area`.
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let popup = super::centered_rect(70, 80, area);
        f.render_widget(Clear, popup);

        let content = Self::help_content(theme);
        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help (? to close) ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(theme.primary))
                    .style(Style::default().bg(theme.surface)),
            )
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(self.scroll_offset).unwrap_or(u16::MAX), 0));
        f.render_widget(paragraph, popup);

        let mut scrollbar_state = ScrollbarState::new(self.total_lines).position(self.scroll_offset);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            popup,
            &mut scrollbar_state,
        );
    }
}
