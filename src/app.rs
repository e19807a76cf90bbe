use crate::records;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use sleeper_api::{LeagueHistory, Team};

/// Teams shown on the Rosters tab: bot rosters are hidden from display
/// (they stay in the history for joins), best record first with points-for
/// breaking ties. Selection indices refer to this list, not the raw fetch
/// order.
pub fn visible_teams(history: &LeagueHistory) -> Vec<&Team> {
    let mut teams: Vec<&Team> = history.teams.iter().filter(|t| !t.is_bot).collect();
    teams.sort_by(|a, b| {
        b.roster
            .record
            .wins
            .cmp(&a.roster.record.wins)
            .then_with(|| b.roster.record.points_for.total_cmp(&a.roster.record.points_for))
    });
    teams
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Overview,
    Records,
    Trophies,
    Toilet,
    Trades,
    Rosters,
    Help,
}

impl MenuItem {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "overview" => Some(Self::Overview),
            "records" => Some(Self::Records),
            "trophies" => Some(Self::Trophies),
            "toilet" => Some(Self::Toilet),
            "trades" => Some(Self::Trades),
            "rosters" => Some(Self::Rosters),
            _ => None,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_history_loaded(&mut self, history: Box<LeagueHistory>) {
        self.state.last_error = None;
        self.state.records = records::summarize(&history);
        self.state.rosters = Default::default();
        self.state.trades = Default::default();
        self.state.history = Some(history);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Per-tab navigation
    // -----------------------------------------------------------------------

    pub fn roster_down(&mut self) {
        let count = self.team_count();
        self.state.rosters.navigate_down(count);
    }

    pub fn roster_up(&mut self) {
        self.state.rosters.navigate_up();
    }

    /// Expand or collapse the lineup of the selected team.
    pub fn roster_toggle_expand(&mut self) {
        let Some(history) = &self.state.history else {
            return;
        };
        let Some(roster_id) = visible_teams(history)
            .get(self.state.rosters.selected)
            .map(|t| t.roster.roster_id)
        else {
            return;
        };
        self.state.rosters.toggle_expanded(roster_id);
    }

    pub fn trade_next(&mut self) {
        let count = self.trade_count();
        self.state.trades.next(count);
    }

    pub fn trade_prev(&mut self) {
        self.state.trades.prev();
    }

    pub fn scroll_down(&mut self) {
        match self.state.active_tab {
            MenuItem::Records => self.state.records_scroll = self.state.records_scroll.saturating_add(1),
            MenuItem::Trophies => self.state.trophies_scroll = self.state.trophies_scroll.saturating_add(1),
            MenuItem::Toilet => self.state.toilet_scroll = self.state.toilet_scroll.saturating_add(1),
            MenuItem::Rosters => self.roster_down(),
            _ => {}
        }
    }

    pub fn scroll_up(&mut self) {
        match self.state.active_tab {
            MenuItem::Records => self.state.records_scroll = self.state.records_scroll.saturating_sub(1),
            MenuItem::Trophies => self.state.trophies_scroll = self.state.trophies_scroll.saturating_sub(1),
            MenuItem::Toilet => self.state.toilet_scroll = self.state.toilet_scroll.saturating_sub(1),
            MenuItem::Rosters => self.roster_up(),
            _ => {}
        }
    }

    fn team_count(&self) -> usize {
        self.state.history.as_ref().map_or(0, |h| visible_teams(h).len())
    }

    fn trade_count(&self) -> usize {
        self.state.history.as_ref().map_or(0, |h| h.trades.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleeper_api::{League, Roster, TeamRecord};

    fn app_with_teams(count: u32) -> App {
        let mut app = App::new();
        let teams = (1..=count)
            .map(|roster_id| Team {
                roster: Roster { roster_id, ..Default::default() },
                ..Default::default()
            })
            .collect();
        app.state.history = Some(Box::new(LeagueHistory {
            league: League::default(),
            teams,
            ..Default::default()
        }));
        app
    }

    #[test]
    fn roster_selection_stays_in_bounds() {
        let mut app = app_with_teams(2);
        app.roster_down();
        app.roster_down();
        app.roster_down();
        assert_eq!(app.state.rosters.selected, 1);
        app.roster_up();
        app.roster_up();
        assert_eq!(app.state.rosters.selected, 0);
    }

    #[test]
    fn expand_toggles_per_roster() {
        let mut app = app_with_teams(2);
        app.roster_toggle_expand();
        assert!(app.state.rosters.expanded.contains(&1));
        app.roster_toggle_expand();
        assert!(app.state.rosters.expanded.is_empty());
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = App::new();
        app.update_tab(MenuItem::Trades);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Trades);
    }

    fn team_with_record(roster_id: u32, wins: u32, points_for: f64, is_bot: bool) -> Team {
        Team {
            roster: Roster {
                roster_id,
                record: TeamRecord { wins, points_for, ..Default::default() },
                ..Default::default()
            },
            is_bot,
            ..Default::default()
        }
    }

    #[test]
    fn bot_rosters_are_hidden_and_teams_sorted_by_record() {
        let mut app = App::new();
        app.state.history = Some(Box::new(LeagueHistory {
            teams: vec![
                team_with_record(1, 2, 900.0, false),
                // Best record in the league, but unowned: must not be shown.
                team_with_record(2, 9, 1400.0, true),
                team_with_record(3, 5, 1100.0, false),
                team_with_record(4, 5, 1200.0, false),
            ],
            ..Default::default()
        }));

        let ordered: Vec<u32> = visible_teams(app.state.history.as_ref().unwrap())
            .iter()
            .map(|t| t.roster.roster_id)
            .collect();
        assert_eq!(ordered, [4, 3, 1]);

        // Navigation and expansion index into the same filtered ordering.
        app.roster_down();
        app.roster_down();
        app.roster_down();
        assert_eq!(app.state.rosters.selected, 2);
        app.roster_toggle_expand();
        assert!(app.state.rosters.expanded.contains(&1));
    }

    #[test]
    fn tab_names_parse_case_insensitively() {
        assert_eq!(MenuItem::from_name("Records"), Some(MenuItem::Records));
        assert_eq!(MenuItem::from_name("toilet"), Some(MenuItem::Toilet));
        assert_eq!(MenuItem::from_name("nope"), None);
    }
}
