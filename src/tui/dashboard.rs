//! Dashboard grid: packed widget tiles with record summaries.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::constants::GRID_COLUMNS;
use crate::models::{GridRect, RecordKind};
use crate::services::{pack, LayoutStore, PlacedWidget, RecordSet};
use crate::tui::{ContextualComponent, Theme};

/// Terminal rows per grid row.
pub const ROW_CELLS: u16 = 3;

/// Lines shown in list-style widgets.
const LIST_LEN: usize = 3;

/// Events emitted by the dashboard grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// The focused widget was resized
    Resize {
        /// Widget key
        key: String,
        /// New size (position is recomputed by packing)
        rect: GridRect,
    },
    /// Open the page behind the focused widget
    Open(String),
}

/// Grid of visible widgets with a keyboard focus.
#[derive(Debug, Clone)]
pub struct DashboardGrid {
    records: Arc<RecordSet>,
    focused: usize,
}

impl DashboardGrid {
    /// Creates a grid over the given records.
    #[must_use]
    pub const fn new(records: Arc<RecordSet>) -> Self {
        Self {
            records,
            focused: 0,
        }
    }

    /// Index of the focused widget among visible widgets.
    #[must_use]
    pub const fn focused(&self) -> usize {
        self.focused
    }

    /// Key of the focused widget, if any widget is visible.
    #[must_use]
    pub fn focused_key(&self, store: &LayoutStore) -> Option<String> {
        store
            .visible_instances()
            .nth(self.focused)
            .map(|instance| instance.key.clone())
    }

    /// Pulls focus back in range after the visible set shrinks.
    pub fn clamp_focus(&mut self, store: &LayoutStore) {
        let count = store.visible_instances().count();
        self.focused = self.focused.min(count.saturating_sub(1));
    }

    /// Focuses the visible widget at grid cell `(column, row)`.
    ///
    /// Returns true if a widget was hit.
    pub fn focus_at(&mut self, store: &LayoutStore, area: Rect, column: u16, row: u16) -> bool {
        let placed = pack(store.instances());
        let offset = self.scroll_offset(&placed, area);
        let hit = placed.iter().position(|widget| {
            cell_area(area, widget.rect, offset).is_some_and(|cell| {
                column >= cell.x && column < cell.right() && row >= cell.y && row < cell.bottom()
            })
        });
        if let Some(index) = hit {
            self.focused = index;
        }
        hit.is_some()
    }

    /// First grid row drawn, chosen so the focused widget is on screen.
    fn scroll_offset(&self, placed: &[PlacedWidget], area: Rect) -> u16 {
        let visible_rows = (area.height / ROW_CELLS).max(1);
        let Some(focused) = placed.get(self.focused) else {
            return 0;
        };
        if focused.rect.bottom() <= visible_rows {
            0
        } else {
            (focused.rect.bottom() - visible_rows).min(focused.rect.y)
        }
    }

    fn cycle(&mut self, count: usize, forward: bool) {
        if count == 0 {
            self.focused = 0;
        } else if forward {
            self.focused = (self.focused + 1) % count;
        } else {
            self.focused = self.focused.checked_sub(1).unwrap_or(count - 1);
        }
    }
}

/// Screen rectangle of a grid rectangle, or `None` when scrolled away.
fn cell_area(area: Rect, rect: GridRect, offset: u16) -> Option<Rect> {
    if rect.y < offset {
        return None;
    }
    let column_width = (area.width / GRID_COLUMNS).max(1);
    let x = area.x + rect.x * column_width;
    let y = area.y + (rect.y - offset) * ROW_CELLS;
    // Rightmost tiles absorb the division remainder
    let width = if rect.right() >= GRID_COLUMNS {
        area.right().saturating_sub(x)
    } else {
        rect.w * column_width
    };
    let cell = Rect::new(x, y, width, rect.h * ROW_CELLS).intersection(area);
    (!cell.is_empty()).then_some(cell)
}

/// Page opened from a widget, if it has one.
#[must_use]
pub fn widget_route(key: &str) -> Option<&'static str> {
    match key {
        "leads" | "leadStatus" | "leadSources" | "conversionRate" => Some("/leads"),
        "contacts" => Some("/contacts"),
        "deals" | "pipelineValue" | "topDeals" | "dealForecast" | "winLossRatio" => Some("/deals"),
        "upcomingMeetings" => Some("/meetings"),
        "actionItems" | "taskReminders" | "completedTasks" | "taskProgress" | "overdueItems" => {
            Some("/tasks")
        }
        "accountHealth" | "customerRetention" => Some("/accounts"),
        _ => None,
    }
}

fn is_completed(status: Option<&str>) -> bool {
    status.is_some_and(|s| s.eq_ignore_ascii_case("completed") || s.eq_ignore_ascii_case("done"))
}

fn is_closed_stage(stage: Option<&str>) -> bool {
    stage.is_some_and(|s| {
        ["won", "lost", "dropped"]
            .iter()
            .any(|closed| s.eq_ignore_ascii_case(closed))
    })
}

fn stage_is(stage: Option<&str>, wanted: &str) -> bool {
    stage.is_some_and(|s| s.eq_ignore_ascii_case(wanted))
}

/// Formats a value as whole dollars with thousands separators.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_currency(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn percent(part: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        part * 100 / total
    }
}

fn pipeline_total(records: &RecordSet) -> f64 {
    records
        .deals
        .iter()
        .filter(|d| !is_closed_stage(d.stage.as_deref()))
        .filter_map(|d| d.total_contract_value)
        .sum()
}

/// Summary lines drawn inside a widget tile.
#[must_use]
pub fn widget_summary(key: &str, records: &RecordSet, now: DateTime<Utc>) -> Vec<String> {
    match key {
        "leads" => vec![
            format!("{} leads", records.count(RecordKind::Lead)),
            format!(
                "{} new",
                records
                    .leads
                    .iter()
                    .filter(|l| stage_is(l.lead_status.as_deref(), "new"))
                    .count()
            ),
        ],
        "contacts" => vec![format!("{} contacts", records.count(RecordKind::Contact))],
        "deals" => vec![
            format!("{} deals", records.count(RecordKind::Deal)),
            format!("Pipeline {}", format_currency(pipeline_total(records))),
        ],
        "pipelineValue" => vec![format_currency(pipeline_total(records))],
        "actionItems" => {
            let open = records
                .tasks
                .iter()
                .filter(|t| !is_completed(t.status.as_deref()))
                .count();
            let today = records
                .meetings
                .iter()
                .filter_map(|m| m.start_time)
                .filter(|start| start.date_naive() == now.date_naive())
                .count();
            vec![
                format!("{open} open tasks"),
                format!("{today} meetings today"),
            ]
        }
        "upcomingMeetings" => {
            let mut upcoming: Vec<_> = records
                .meetings
                .iter()
                .filter_map(|m| m.start_time.filter(|start| *start >= now).map(|s| (s, m)))
                .collect();
            upcoming.sort_by_key(|(start, _)| *start);
            if upcoming.is_empty() {
                return vec!["No upcoming meetings".to_string()];
            }
            upcoming
                .into_iter()
                .take(LIST_LEN)
                .map(|(start, m)| format!("{} {}", start.format("%m-%d %H:%M"), m.subject))
                .collect()
        }
        "taskReminders" => {
            let open: Vec<String> = records
                .tasks
                .iter()
                .filter(|t| !is_completed(t.status.as_deref()))
                .take(LIST_LEN)
                .map(|t| format!("• {}", t.title))
                .collect();
            if open.is_empty() {
                vec!["All caught up".to_string()]
            } else {
                open
            }
        }
        "completedTasks" => vec![format!(
            "{} completed",
            records
                .tasks
                .iter()
                .filter(|t| is_completed(t.status.as_deref()))
                .count()
        )],
        "taskProgress" => {
            let total = records.tasks.len();
            let done = records
                .tasks
                .iter()
                .filter(|t| is_completed(t.status.as_deref()))
                .count();
            vec![format!("{done}/{total} done ({}%)", percent(done, total))]
        }
        "leadStatus" => {
            let mut by_status: BTreeMap<&str, usize> = BTreeMap::new();
            for lead in &records.leads {
                *by_status
                    .entry(lead.lead_status.as_deref().unwrap_or("Unknown"))
                    .or_default() += 1;
            }
            if by_status.is_empty() {
                return vec!["No leads".to_string()];
            }
            by_status
                .into_iter()
                .map(|(status, count)| format!("{status}: {count}"))
                .collect()
        }
        "conversionRate" => {
            let qualified = records
                .leads
                .iter()
                .filter(|l| stage_is(l.lead_status.as_deref(), "qualified"))
                .count();
            vec![format!("{}% qualified", percent(qualified, records.leads.len()))]
        }
        "topDeals" => {
            let mut deals: Vec<_> = records
                .deals
                .iter()
                .filter_map(|d| d.total_contract_value.map(|v| (v, d)))
                .collect();
            deals.sort_by(|a, b| b.0.total_cmp(&a.0));
            if deals.is_empty() {
                return vec!["No deals".to_string()];
            }
            deals
                .into_iter()
                .take(LIST_LEN)
                .map(|(value, d)| format!("{} {}", format_currency(value), d.deal_name))
                .collect()
        }
        "winLossRatio" => {
            let won = records
                .deals
                .iter()
                .filter(|d| stage_is(d.stage.as_deref(), "won"))
                .count();
            let lost = records
                .deals
                .iter()
                .filter(|d| stage_is(d.stage.as_deref(), "lost"))
                .count();
            vec![format!("{won} won / {lost} lost")]
        }
        "accountHealth" => {
            let industries = records
                .accounts
                .iter()
                .filter_map(|a| a.industry.as_deref())
                .collect::<std::collections::BTreeSet<_>>()
                .len();
            vec![
                format!("{} accounts", records.count(RecordKind::Account)),
                format!("{industries} industries"),
            ]
        }
        "quickActions" => vec![
            "/  Search".to_string(),
            "c  Customize".to_string(),
            "?  Help".to_string(),
        ],
        _ => vec!["No data yet".to_string()],
    }
}

impl ContextualComponent for DashboardGrid {
    type Context = LayoutStore;
    type Event = DashboardEvent;

    fn handle_input(&mut self, key: KeyEvent, store: &Self::Context) -> Option<Self::Event> {
        let count = store.visible_instances().count();
        let (dw, dh) = match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.cycle(count, true);
                return None;
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.cycle(count, false);
                return None;
            }
            KeyCode::Enter => {
                let key = self.focused_key(store)?;
                return widget_route(&key).map(|route| DashboardEvent::Open(route.to_string()));
            }
            KeyCode::Char(']') => (1, 0),
            KeyCode::Char('[') => (-1, 0),
            KeyCode::Char('+' | '=') => (0, 1),
            KeyCode::Char('-') => (0, -1),
            _ => return None,
        };

        let key = self.focused_key(store)?;
        let current = store.get(&key)?.position;
        let rect = current.resized(dw, dh);
        (rect != current).then_some(DashboardEvent::Resize { key, rect })
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, store: &Self::Context) {
        let placed = pack(store.instances());
        if placed.is_empty() {
            let empty = Paragraph::new("No widgets visible. Press c to customize.")
                .style(Style::default().fg(theme.text_muted));
            f.render_widget(empty, area);
            return;
        }

        let offset = self.scroll_offset(&placed, area);
        let now = Utc::now();

        for (index, widget) in placed.iter().enumerate() {
            let Some(cell) = cell_area(area, widget.rect, offset) else {
                continue;
            };
            let focused = index == self.focused;
            let border = if focused { theme.accent } else { theme.primary };
            let title_style = if focused {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.primary)
            };

            let lines: Vec<Line> = widget_summary(&widget.key, &self.records, now)
                .into_iter()
                .map(|text| Line::from(Span::styled(text, Style::default().fg(theme.text))))
                .collect();

            let tile = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(Span::styled(format!(" {} ", widget.label), title_style)),
            );
            f.render_widget(tile, cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WidgetCatalog;
    use crate::models::{Deal, Lead, Meeting, PersistedLayout, Task};
    use chrono::{Duration, TimeZone};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn store() -> LayoutStore {
        LayoutStore::initialize(WidgetCatalog::standard(), &PersistedLayout::default())
    }

    fn deal(name: &str, stage: &str, value: f64) -> Deal {
        Deal {
            id: name.to_lowercase(),
            deal_name: name.to_string(),
            customer_name: None,
            project_name: None,
            stage: Some(stage.to_string()),
            total_contract_value: Some(value),
        }
    }

    fn task(title: &str, status: &str) -> Task {
        Task {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: None,
            status: Some(status.to_string()),
        }
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(-1500.0), "-$1,500");
    }

    #[test]
    fn test_pipeline_excludes_closed_deals() {
        let records = RecordSet {
            deals: vec![
                deal("Open", "Qualified", 1000.0),
                deal("Won", "Won", 5000.0),
                deal("Lost", "lost", 700.0),
            ],
            ..RecordSet::default()
        };
        assert_eq!(
            widget_summary("pipelineValue", &records, now()),
            vec!["$1,000".to_string()]
        );
        assert_eq!(
            widget_summary("winLossRatio", &records, now()),
            vec!["1 won / 1 lost".to_string()]
        );
    }

    #[test]
    fn test_top_deals_sorted_by_value() {
        let records = RecordSet {
            deals: vec![
                deal("Small", "Lead", 10.0),
                deal("Big", "Lead", 9000.0),
                deal("Mid", "Lead", 500.0),
                deal("Tiny", "Lead", 1.0),
            ],
            ..RecordSet::default()
        };
        let lines = widget_summary("topDeals", &records, now());
        assert_eq!(lines, vec!["$9,000 Big", "$500 Mid", "$10 Small"]);
    }

    #[test]
    fn test_upcoming_meetings_skip_past() {
        let meeting = |subject: &str, offset_hours: i64| Meeting {
            id: subject.to_lowercase(),
            subject: subject.to_string(),
            description: None,
            start_time: Some(now() + Duration::hours(offset_hours)),
        };
        let records = RecordSet {
            meetings: vec![meeting("Later", 48), meeting("Past", -2), meeting("Soon", 1)],
            ..RecordSet::default()
        };
        let lines = widget_summary("upcomingMeetings", &records, now());
        assert_eq!(lines, vec!["05-01 10:00 Soon", "05-03 09:00 Later"]);
    }

    #[test]
    fn test_task_progress() {
        let records = RecordSet {
            tasks: vec![
                task("One", "completed"),
                task("Two", "open"),
                task("Three", "Done"),
                task("Four", "open"),
            ],
            ..RecordSet::default()
        };
        assert_eq!(
            widget_summary("taskProgress", &records, now()),
            vec!["2/4 done (50%)".to_string()]
        );
        assert_eq!(
            widget_summary("taskReminders", &records, now()),
            vec!["• Two".to_string(), "• Four".to_string()]
        );
    }

    #[test]
    fn test_lead_status_groups() {
        let lead = |status: Option<&str>| Lead {
            id: "l".to_string(),
            lead_name: "x".to_string(),
            company_name: None,
            email: None,
            lead_status: status.map(str::to_string),
        };
        let records = RecordSet {
            leads: vec![lead(Some("New")), lead(Some("New")), lead(None)],
            ..RecordSet::default()
        };
        assert_eq!(
            widget_summary("leadStatus", &records, now()),
            vec!["New: 2".to_string(), "Unknown: 1".to_string()]
        );
    }

    #[test]
    fn test_unknown_widget_has_placeholder() {
        let lines = widget_summary("geoDistribution", &RecordSet::default(), now());
        assert_eq!(lines, vec!["No data yet".to_string()]);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let store = store();
        let visible = store.visible_instances().count();
        let mut grid = DashboardGrid::new(Arc::new(RecordSet::default()));

        grid.handle_input(key(KeyCode::BackTab), &store);
        assert_eq!(grid.focused(), visible - 1);
        grid.handle_input(key(KeyCode::Tab), &store);
        assert_eq!(grid.focused(), 0);
        assert_eq!(grid.focused_key(&store).as_deref(), Some("leads"));
    }

    #[test]
    fn test_resize_emits_event() {
        let store = store();
        let mut grid = DashboardGrid::new(Arc::new(RecordSet::default()));
        let current = store.get("leads").unwrap().position;

        let event = grid.handle_input(key(KeyCode::Char(']')), &store);
        assert_eq!(
            event,
            Some(DashboardEvent::Resize {
                key: "leads".to_string(),
                rect: current.resized(1, 0),
            })
        );
    }

    #[test]
    fn test_enter_opens_route() {
        let store = store();
        let mut grid = DashboardGrid::new(Arc::new(RecordSet::default()));
        assert_eq!(
            grid.handle_input(key(KeyCode::Enter), &store),
            Some(DashboardEvent::Open("/leads".to_string()))
        );
    }

    #[test]
    fn test_cell_area_scrolls_and_clips() {
        let area = Rect::new(0, 0, 120, 9);
        assert_eq!(
            cell_area(area, GridRect::new(0, 0, 3, 2), 0),
            Some(Rect::new(0, 0, 30, 6))
        );
        // Second row clipped at the bottom
        assert_eq!(
            cell_area(area, GridRect::new(6, 2, 6, 2), 0),
            Some(Rect::new(60, 6, 60, 3))
        );
        assert_eq!(cell_area(area, GridRect::new(0, 0, 3, 2), 1), None);
    }

    #[test]
    fn test_focus_at_hits_tile() {
        let store = store();
        let mut grid = DashboardGrid::new(Arc::new(RecordSet::default()));
        let area = Rect::new(0, 0, 120, 30);
        // The second default tile starts at column 3 of the grid
        assert!(grid.focus_at(&store, area, 35, 1));
        assert_eq!(grid.focused_key(&store).as_deref(), Some("contacts"));
    }
}
