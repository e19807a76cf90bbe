use crate::app::MenuItem;
use crate::records::RecordsSummary;
use sleeper_api::LeagueHistory;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Rosters tab state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RostersState {
    /// Index into the sorted team list.
    pub selected: usize,
    /// Roster ids whose full lineup is expanded inline.
    pub expanded: HashSet<u32>,
    pub scroll_offset: u16,
}

impl RostersState {
    pub fn navigate_down(&mut self, team_count: usize) {
        let max = team_count.saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Expand or collapse the lineup of the team at `roster_id`.
    pub fn toggle_expanded(&mut self, roster_id: u32) {
        if !self.expanded.remove(&roster_id) {
            self.expanded.insert(roster_id);
        }
    }

    /// Clamp the scroll so `selected_line` stays inside a `viewport`-row
    /// window. Called by the draw pass, which knows the rendered height.
    pub fn ensure_visible(&mut self, selected_line: usize, viewport: usize) {
        if viewport == 0 {
            return;
        }
        let top = self.scroll_offset as usize;
        if selected_line < top {
            self.scroll_offset = selected_line as u16;
        } else if selected_line >= top + viewport {
            self.scroll_offset = (selected_line + 1 - viewport) as u16;
        }
    }
}

// ---------------------------------------------------------------------------
// Trades tab state (one trade shown at a time, slider style)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TradesState {
    pub index: usize,
}

impl TradesState {
    pub fn next(&mut self, trade_count: usize) {
        let max = trade_count.saturating_sub(1);
        if self.index < max {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// Everything fetched for the league chain. None until the initial load
    /// completes; a load failure leaves it None with last_error set.
    pub history: Option<Box<LeagueHistory>>,
    /// Derived once per loaded history, never refetched.
    pub records: RecordsSummary,
    pub rosters: RostersState,
    pub trades: TradesState,
    pub records_scroll: u16,
    pub trophies_scroll: u16,
    pub toilet_scroll: u16,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
