use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Overview),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Records),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Trophies),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Toilet),
        (_, Char('5'), _) => guard.update_tab(MenuItem::Trades),
        (_, Char('6'), _) => guard.update_tab(MenuItem::Rosters),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Trades slider
        (MenuItem::Trades, Char('l') | KeyCode::Right, _) => guard.trade_next(),
        (MenuItem::Trades, Char('h') | KeyCode::Left, _) => guard.trade_prev(),

        // Roster expansion
        (MenuItem::Rosters, KeyCode::Enter, _) => guard.roster_toggle_expand(),

        // Vertical navigation on scrollable tabs
        (_, Char('j') | KeyCode::Down, _) => guard.scroll_down(),
        (_, Char('k') | KeyCode::Up, _) => guard.scroll_up(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
