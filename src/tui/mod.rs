//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and all UI widgets using Ratatui.

// Input handlers use Result<bool> for consistency even when they never fail
#![allow(clippy::unnecessary_wraps)]
// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]

pub mod component;
pub mod customizer;
pub mod dashboard;
pub mod handlers;
pub mod help_overlay;
pub mod search_box;
pub mod status_bar;
pub mod theme;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::catalog::WidgetCatalog;
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::models::{GridRect, PersistedLayout};
use crate::services::{
    HistoryRouter, LayoutController, LayoutPersistence, LayoutStore, LookupWorker, RecordLookup,
    RecordSet, Router,
};

// Re-export commonly used types
pub use component::{Component, ContextualComponent};
pub use customizer::{Customizer, CustomizerEvent, CustomizerMode};
pub use dashboard::{DashboardEvent, DashboardGrid};
pub use help_overlay::{HelpContext, HelpOverlayState};
pub use search_box::{SearchBox, SearchBoxEvent};
pub use status_bar::StatusBar;
pub use theme::Theme;

/// Event poll interval while idle.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Event poll interval while a lookup or save is outstanding.
const BUSY_POLL: Duration = Duration::from_millis(20);

/// Popup types that can be displayed over the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupType {
    /// Dashboard customizer modal
    Customizer,
    /// Help overlay
    Help,
}

/// Which part of the main screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Widget grid
    Dashboard,
    /// Global search input
    Search,
}

/// Screen regions of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiAreas {
    /// Search input
    pub search: Rect,
    /// Title and route
    pub title: Rect,
    /// Widget grid
    pub grid: Rect,
    /// Status bar
    pub status: Rect,
}

/// Splits the screen into header, grid, and status bar.
#[must_use]
pub fn layout_areas(area: Rect) -> UiAreas {
    let rows = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search + title
            Constraint::Min(6),    // Widget grid
            Constraint::Length(4), // Status bar (message + hints)
        ])
        .split(area);

    let header = RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    UiAreas {
        search: header[0],
        title: header[1],
        grid: rows[1],
        status: rows[2],
    }
}

/// A layout save running on a background thread.
pub struct SaveJob {
    layout: PersistedLayout,
    receiver: Receiver<Result<()>>,
}

impl SaveJob {
    /// Starts saving `layout` through `persistence`.
    ///
    /// # Errors
    ///
    /// Returns an error if the save thread cannot be spawned.
    pub fn spawn(persistence: Arc<dyn LayoutPersistence>, layout: PersistedLayout) -> Result<Self> {
        let (sender, receiver) = channel();
        let to_save = layout.clone();
        thread::Builder::new()
            .name("layout-save".to_string())
            .spawn(move || {
                let _ = sender.send(persistence.save(&to_save));
            })
            .context("Failed to start layout save")?;
        Ok(Self { layout, receiver })
    }

    /// Returns the save outcome once the thread has finished.
    pub fn poll(&self) -> Option<Result<()>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(anyhow!("Layout save thread stopped"))),
        }
    }
}

/// Application state
pub struct AppState {
    // Core data
    /// Controller over the layout the dashboard shows
    pub dashboard: LayoutController,
    /// Record set behind widget summaries and search
    pub records: Arc<RecordSet>,
    /// Where layouts are loaded from and saved to
    pub persistence: Arc<dyn LayoutPersistence>,

    // UI state
    /// Current UI theme
    pub theme: Theme,
    /// Widget grid component
    pub grid: DashboardGrid,
    /// Global search component
    pub search: SearchBox,
    /// Keyboard focus on the main screen
    pub focus: Focus,
    /// Currently active popup (if any)
    pub active_popup: Option<PopupType>,
    /// Customizer modal, present while it is open
    pub customizer: Option<Customizer>,
    /// Help overlay scroll state
    pub help_overlay_state: HelpOverlayState,
    /// Routes opened from search results and widgets
    pub router: HistoryRouter,
    /// Status bar message
    pub status_message: String,
    /// Current error message (if any)
    pub error_message: Option<String>,
    /// Last known terminal size, for mouse hit-testing
    pub viewport: Rect,

    // System resources
    /// Application configuration
    pub config: Config,
    /// Search lookups in flight
    pub worker: LookupWorker,
    /// Customizer save in flight
    pub save_job: Option<SaveJob>,

    // Control flags
    /// Whether application should exit
    pub should_quit: bool,
}

impl AppState {
    /// Builds the dashboard from the saved layout.
    ///
    /// A layout that fails to load is reported and replaced by the catalog
    /// defaults rather than aborting startup.
    pub fn new(
        config: Config,
        records: Arc<RecordSet>,
        persistence: Arc<dyn LayoutPersistence>,
    ) -> Self {
        let mut error_message = None;
        let persisted = persistence.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load saved layout, using defaults");
            error_message = Some(format!("Failed to load saved layout: {e:#}"));
            PersistedLayout::default()
        });
        let store = LayoutStore::initialize(WidgetCatalog::standard(), &persisted);

        let settings = config.search_settings();
        let lookup: Arc<dyn RecordLookup> = records.clone();
        let worker = LookupWorker::spawn(lookup, settings.clone());

        let active_popup = config.ui.show_help_on_startup.then_some(PopupType::Help);

        Self {
            dashboard: LayoutController::new(store),
            grid: DashboardGrid::new(Arc::clone(&records)),
            records,
            persistence,
            theme: Theme::from_mode(config.ui.theme_mode),
            search: SearchBox::new(settings),
            focus: Focus::Dashboard,
            active_popup,
            customizer: None,
            help_overlay_state: HelpOverlayState::new(),
            router: HistoryRouter::new(),
            status_message: String::new(),
            error_message,
            viewport: Rect::default(),
            config,
            worker,
            save_job: None,
            should_quit: false,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Set error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error_message = Some(error.into());
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Context used for help and status bar hints.
    #[must_use]
    pub fn help_context(&self) -> HelpContext {
        match self.active_popup {
            Some(PopupType::Help) => HelpContext::Help,
            Some(PopupType::Customizer) => match self.customizer.as_ref().map(Customizer::mode) {
                Some(CustomizerMode::Dragging { .. }) => HelpContext::Dragging,
                _ => HelpContext::Customizer,
            },
            None if self.focus == Focus::Search => HelpContext::Search,
            None => HelpContext::Dashboard,
        }
    }

    /// Opens the customizer over a copy of the current layout.
    pub fn open_customizer(&mut self) {
        let controller = LayoutController::new(self.dashboard.store().clone());
        self.customizer = Some(Customizer::new(controller));
        self.active_popup = Some(PopupType::Customizer);
        self.search.engine_mut().pointer_down(false);
    }

    /// Closes the customizer without adopting its edits.
    pub fn close_customizer(&mut self) {
        self.customizer = None;
        self.active_popup = None;
    }

    /// Hands a customizer save to a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the save thread cannot be started.
    pub fn start_save(&mut self, layout: PersistedLayout) -> Result<()> {
        debug!(visible = layout.visible.len(), "Saving dashboard layout");
        match SaveJob::spawn(Arc::clone(&self.persistence), layout.clone()) {
            Ok(job) => {
                self.save_job = Some(job);
                Ok(())
            }
            Err(e) => {
                if let Some(customizer) = self.customizer.as_mut() {
                    customizer.finish_save(layout, Err(anyhow!("{e:#}")));
                }
                Err(e)
            }
        }
    }

    /// Resizes a widget on the dashboard and persists the layout right away.
    pub fn resize_widget(&mut self, key: &str, rect: GridRect) {
        let Some(applied) = self.dashboard.on_resize(key, rect) else {
            return;
        };
        let Some(layout) = self.dashboard.begin_save() else {
            return;
        };
        let result = self.persistence.save(&layout);
        match &result {
            Ok(()) => self.set_status(format!("Resized {key} to {}x{}", applied.w, applied.h)),
            Err(e) => {
                warn!(error = %e, key, "Failed to save resized layout");
                self.set_error(format!("Failed to save layout: {e:#}"));
            }
        }
        self.dashboard.finish_save(layout, result);
    }

    /// Opens a route through the router.
    pub fn navigate(&mut self, target: &str) {
        self.router.navigate(target);
        self.set_status(format!("Opened {target}"));
        self.focus = Focus::Dashboard;
    }

    /// Activates the search result at `index`.
    pub fn activate_result(&mut self, index: usize) {
        if self.search.engine_mut().activate(index, &mut self.router) {
            if let Some(target) = self.router.current().map(str::to_string) {
                self.set_status(format!("Opened {target}"));
            }
            self.focus = Focus::Dashboard;
        }
    }

    /// Background work: issue due lookups, apply finished ones, finish saves.
    pub fn tick(&mut self, now: Instant) {
        if let Some(request) = self.search.engine_mut().take_due_request(now) {
            if let Err(e) = self.worker.submit(request) {
                warn!(error = %e, "Failed to submit search lookup");
                self.set_error(format!("Search is unavailable: {e:#}"));
            }
        }

        while let Some(response) = self.worker.poll() {
            let generation = response.generation;
            if !self.search.engine_mut().accept(response) {
                debug!(generation, "Discarded stale search response");
            }
        }

        self.poll_save_job();
    }

    fn poll_save_job(&mut self) {
        let Some(result) = self.save_job.as_ref().and_then(SaveJob::poll) else {
            return;
        };
        let Some(job) = self.save_job.take() else {
            return;
        };
        match &result {
            Ok(()) => info!("Dashboard layout saved"),
            Err(e) => warn!(error = %e, "Failed to save dashboard layout"),
        }

        let Some(customizer) = self.customizer.as_mut() else {
            return;
        };
        customizer.finish_save(job.layout, result);
        if customizer.should_close() {
            if let Some(customizer) = self.customizer.take() {
                self.dashboard = customizer.into_controller();
            }
            self.active_popup = None;
            self.grid.clamp_focus(self.dashboard.store());
            self.set_status("Layout saved");
        }
    }

    /// Whether the loop should poll quickly.
    fn is_busy(&self) -> bool {
        self.search.engine().is_pending() || self.search.engine().is_loading() || self.save_job.is_some()
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        state.viewport = Rect::new(0, 0, size.width, size.height);

        // Render current state
        terminal.draw(|f| render(f, state))?;

        let timeout = if state.is_busy() { BUSY_POLL } else { IDLE_POLL };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(state, key)? {
                        break; // User quit
                    }
                }
                Event::Mouse(mouse) => handlers::handle_mouse_event(state, mouse),
                // Terminal resized, will re-render on next loop
                _ => {}
            }
        }

        state.tick(Instant::now());

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI
fn render(f: &mut Frame, state: &AppState) {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let areas = layout_areas(f.area());
    let theme = &state.theme;

    let search_focused = state.focus == Focus::Search && state.active_popup.is_none();
    state
        .search
        .render_input(f, areas.search, theme, search_focused);
    render_title_bar(f, areas.title, state);
    state
        .grid
        .render(f, areas.grid, theme, state.dashboard.store());
    StatusBar::render(f, areas.status, state, theme);

    // Dropdown overlays the grid
    state.search.render_dropdown(f, areas.search, f.area(), theme);

    match state.active_popup {
        Some(PopupType::Customizer) => {
            if let Some(customizer) = &state.customizer {
                customizer.render(f, f.area(), theme);
            }
        }
        Some(PopupType::Help) => state.help_overlay_state.render(f, f.area(), theme),
        None => {}
    }

    // Render error overlay on top of everything if error is present
    if let Some(ref error) = state.error_message {
        render_error_overlay(f, error, theme);
    }
}

/// Render title bar with the current route and widget count
fn render_title_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let store = state.dashboard.store();
    let visible = store.visible_instances().count();
    let route = state.router.current().unwrap_or("/dashboard");
    let title = Line::from(vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default()
                .fg(state.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(route.to_string(), Style::default().fg(state.theme.text)),
        Span::styled(
            format!("  {visible}/{} widgets", store.len()),
            Style::default().fg(state.theme.text_muted),
        ),
    ]);

    let title_widget = Paragraph::new(title)
        .style(Style::default().bg(state.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(state.theme.background)),
        );

    f.render_widget(title_widget, area);
}

fn render_error_overlay(f: &mut Frame, error: &str, theme: &Theme) {
    let area = centered_rect(70, 40, f.area());

    // Clear the background area first
    f.render_widget(Clear, area);
    let background = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(background, area);

    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Error message
            Constraint::Length(2), // Help text
        ])
        .split(area);

    let title = Paragraph::new("ERROR")
        .style(
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(theme.error).bg(theme.background)),
        );
    f.render_widget(title, chunks[0]);

    let error_text = Paragraph::new(error)
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Details ")
                .style(Style::default().bg(theme.background)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(error_text, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(
            "Enter/Esc",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Dismiss"),
    ]))
    .style(Style::default().fg(theme.text).bg(theme.background));
    f.render_widget(help, chunks[2]);
}

/// Helper to create a centered rectangle
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Handle keyboard input events
fn handle_key_event(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    use crossterm::event::{KeyCode, KeyModifiers};

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    // If error overlay is shown, allow dismissing with Enter or Esc
    if state.error_message.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.clear_error();
        }
        // Block all other input while error is shown
        return Ok(false);
    }

    // Route to popup handler if popup is active
    if state.active_popup.is_some() {
        return handlers::handle_popup_input(state, key);
    }

    handlers::handle_main_input(state, key)
}
