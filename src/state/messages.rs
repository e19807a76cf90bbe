use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use sleeper_api::LeagueHistory;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadLeague { league_id: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// The full aggregation session for one league load.
    HistoryLoaded { history: Box<LeagueHistory> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
