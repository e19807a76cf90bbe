use tui::backend::Backend;
use tui::layout::Alignment;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui::layout::Rect;

use crate::app::{App, MenuItem};
use crate::records::{MatchupPair, RecordsSummary, ScoreEntry};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use sleeper_api::{LeagueHistory, Placements, Trade};

static TABS: &[&str; 6] = &["Overview", "Records", "Trophy Room", "Toilet Bowl", "Trades", "Rosters"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, &layout, app);
            }

            match app.state.active_tab {
                MenuItem::Overview => draw_overview(f, layout.main, app),
                MenuItem::Records => draw_records(f, layout.main, app),
                MenuItem::Trophies => draw_trophies(f, layout.main, app),
                MenuItem::Toilet => draw_toilet(f, layout.main, app),
                MenuItem::Trades => draw_trades(f, layout.main, app),
                MenuItem::Rosters => draw_rosters(f, layout.main, app),
                MenuItem::Help => draw_placeholder(
                    f,
                    layout.main,
                    "Help: q=quit  1-6=tabs  j/k=scroll  h/l=prev/next trade  Enter=expand roster  f=full screen  \"=logs",
                ),
            }

            if app.state.show_logs {
                draw_logs(f, layout.main);
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, layout: &LayoutAreas, app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Overview => 0,
        MenuItem::Records => 1,
        MenuItem::Trophies => 2,
        MenuItem::Toilet => 3,
        MenuItem::Trades => 4,
        MenuItem::Rosters => 5,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, layout.tabs);

    let league_label = app
        .state
        .history
        .as_ref()
        .map(|h| h.league.name.clone())
        .unwrap_or_default();
    let status = Paragraph::new(format!("{league_label}  ?=help "))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(status, layout.status);
}

/// Paint the "still loading / load failed" body shared by every tab before
/// history arrives. Returns true when the caller should stop drawing.
fn draw_pending(f: &mut Frame, inner: Rect, app: &App) -> bool {
    if app.state.history.is_some() {
        return false;
    }
    let msg = if let Some(err) = app.state.last_error.as_deref() {
        format!("League load failed:\n{err}")
    } else {
        "Loading league history...".to_string()
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
    true
}

fn draw_overview(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Overview ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_pending(f, inner, app) {
        return;
    }
    let history = app.state.history.as_ref().unwrap();

    let mut lines = Vec::new();
    lines.push(format!(
        "{}  |  season {}  |  {} teams  |  {} seasons of history",
        history.league.name,
        history.league.season,
        history.league.total_rosters,
        history.seasons.len()
    ));
    lines.push(String::new());
    lines.push(format!("{:<28} {:>5} {:>6} {:>9} {:>9}", "Team", "W", "L", "PF", "PA"));

    let mut standings: Vec<_> = history.teams.iter().collect();
    standings.sort_by(|a, b| {
        b.roster
            .record
            .wins
            .cmp(&a.roster.record.wins)
            .then_with(|| b.roster.record.points_for.total_cmp(&a.roster.record.points_for))
    });
    for team in standings {
        let record = &team.roster.record;
        let bot_mark = if team.is_bot { " [bot]" } else { "" };
        lines.push(format!(
            "{:<28} {:>5} {:>6} {:>9.2} {:>9.2}{bot_mark}",
            clip(&team.team_name, 28),
            record.wins,
            record.losses,
            record.points_for,
            record.points_against,
        ));
    }

    if let Some((year, placements)) = history.trophies.iter().next_back()
        && let Some(champ) = placements.first
    {
        lines.push(String::new());
        lines.push(format!("{year} champion: {}", team_label(history, champ)));
    }

    f.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn draw_records(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" League Records ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_pending(f, inner, app) {
        return;
    }
    let history = app.state.history.as_ref().unwrap();
    let records: &RecordsSummary = &app.state.records;

    let mut lines = Vec::new();
    push_score_section(&mut lines, history, "Highest weekly scores", &records.top_scores);
    push_score_section(&mut lines, history, "Lowest weekly scores", &records.bottom_scores);
    push_pair_section(&mut lines, history, "Biggest blowouts", &records.biggest_blowouts);
    push_pair_section(&mut lines, history, "Closest matchups", &records.closest_matchups);

    lines.push("Most active traders".to_string());
    if records.top_traders.is_empty() {
        lines.push("  no trades recorded".to_string());
    }
    for (rank, trader) in records.top_traders.iter().enumerate() {
        let partners = trader
            .partners
            .iter()
            .map(|owner| owner_label(history, owner))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "  {:>2}. {:<24} {:>3} trades  with: {partners}",
            rank + 1,
            clip(&owner_label(history, &trader.owner_id), 24),
            trader.trades,
        ));
    }

    f.render_widget(
        Paragraph::new(lines.join("\n")).scroll((app.state.records_scroll, 0)),
        inner,
    );
}

fn push_score_section(lines: &mut Vec<String>, history: &LeagueHistory, title: &str, scores: &[ScoreEntry]) {
    lines.push(title.to_string());
    if scores.is_empty() {
        lines.push("  no completed weeks yet".to_string());
    }
    for (rank, entry) in scores.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {:>7.2}  {:<24} {} week {}",
            rank + 1,
            entry.points,
            clip(&team_label(history, entry.roster_id), 24),
            entry.year,
            entry.week,
        ));
    }
    lines.push(String::new());
}

fn push_pair_section(lines: &mut Vec<String>, history: &LeagueHistory, title: &str, pairs: &[MatchupPair]) {
    lines.push(title.to_string());
    if pairs.is_empty() {
        lines.push("  no completed matchups yet".to_string());
    }
    for (rank, pair) in pairs.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {:>6.2}  {} {:.2} def. {} {:.2}  ({} week {})",
            rank + 1,
            pair.margin,
            clip(&team_label(history, pair.winner_id), 20),
            pair.winner_points,
            clip(&team_label(history, pair.loser_id), 20),
            pair.loser_points,
            pair.year,
            pair.week,
        ));
    }
    lines.push(String::new());
}

fn draw_trophies(f: &mut Frame, area: Rect, app: &App) {
    draw_placement_tab(
        f,
        area,
        app,
        " Trophy Room ",
        ["Champion", "Runner-up", "Third place"],
        |h| &h.trophies,
        app.state.trophies_scroll,
    );
}

fn draw_toilet(f: &mut Frame, area: Rect, app: &App) {
    draw_placement_tab(
        f,
        area,
        app,
        " Toilet Bowl ",
        ["Last place", "Second to last", "Third to last"],
        |h| &h.toilet_bowls,
        app.state.toilet_scroll,
    );
}

fn draw_placement_tab(
    f: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    slot_labels: [&str; 3],
    placements_of: impl Fn(&LeagueHistory) -> &std::collections::BTreeMap<String, Placements>,
    scroll: u16,
) {
    let block = default_border(Color::White).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_pending(f, inner, app) {
        return;
    }
    let history = app.state.history.as_ref().unwrap();
    let placements = placements_of(history);

    if placements.is_empty() {
        f.render_widget(
            Paragraph::new("No finished playoff brackets in this league's history")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut lines = Vec::new();
    // Newest season first.
    for (year, slots) in placements.iter().rev() {
        lines.push(format!("{year}"));
        for (label, roster_id) in slot_labels.iter().zip([slots.first, slots.second, slots.third]) {
            let name = roster_id
                .map(|id| team_label(history, id))
                .unwrap_or_else(|| "undecided".to_string());
            lines.push(format!("  {label:<16} {name}"));
        }
        lines.push(String::new());
    }

    f.render_widget(Paragraph::new(lines.join("\n")).scroll((scroll, 0)), inner);
}

fn draw_trades(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Trades ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_pending(f, inner, app) {
        return;
    }
    let history = app.state.history.as_ref().unwrap();

    if history.trades.is_empty() {
        f.render_widget(
            Paragraph::new("No trades in this league's history")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let index = app.state.trades.index.min(history.trades.len() - 1);
    let trade = &history.trades[index];

    let mut lines = Vec::new();
    let when = trade
        .created_at()
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    lines.push(Line::from(format!(
        "Trade {}/{}  |  {when}  |  {}  |  h/l to browse",
        index + 1,
        history.trades.len(),
        trade.status.label(),
    )));
    lines.push(Line::from(""));

    if trade.is_malformed() {
        lines.push(Line::from(Span::styled(
            "Incomplete trade record, participants unknown",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for roster_id in &trade.roster_ids {
        lines.push(Line::from(Span::styled(
            format!("{} receives:", team_label(history, *roster_id)),
            Style::default().fg(Color::Yellow),
        )));
        lines.extend(trade_side_lines(history, trade, *roster_id));
        lines.push(Line::from(""));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn trade_side_lines<'a>(history: &LeagueHistory, trade: &Trade, roster_id: u32) -> Vec<Line<'a>> {
    let entries = trade_side_entries(history, trade, roster_id);
    if entries.is_empty() {
        return vec![Line::from(Span::styled(
            "  nothing",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    entries
        .into_iter()
        .map(|entry| Line::from(format!("  {entry}")))
        .collect()
}

/// Assets one roster receives in a trade: players first, sorted by player
/// id so the add-map's hash order never leaks into the rendering, then
/// draft picks in wire order.
fn trade_side_entries(history: &LeagueHistory, trade: &Trade, roster_id: u32) -> Vec<String> {
    let mut player_ids: Vec<&str> = trade
        .adds
        .iter()
        .filter(|(_, receiver)| **receiver == roster_id)
        .map(|(id, _)| id.as_str())
        .collect();
    player_ids.sort_unstable();

    let mut entries: Vec<String> = player_ids
        .into_iter()
        .map(|id| player_name(history, id))
        .collect();
    for pick in &trade.draft_picks {
        if pick.receiving_roster_id == roster_id {
            entries.push(format!(
                "{} round {} pick (originally {})",
                pick.season,
                pick.round,
                team_label(history, pick.original_roster_id),
            ));
        }
    }
    entries
}

fn draw_rosters(f: &mut Frame, area: Rect, app: &mut App) {
    let block = default_border(Color::White).title(" Rosters ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_pending(f, inner, app) {
        return;
    }
    let history = app.state.history.as_ref().unwrap();

    let mut lines = Vec::new();
    lines.push("j/k to move, Enter to expand a lineup".to_string());
    lines.push(String::new());

    // Bot rosters are hidden here; selection indices refer to this same
    // filtered, record-sorted list.
    let mut selected_line = lines.len();
    for (idx, team) in crate::app::visible_teams(history).iter().enumerate() {
        let marker = if idx == app.state.rosters.selected {
            selected_line = lines.len();
            '>'
        } else {
            ' '
        };
        let record = &team.roster.record;
        lines.push(format!(
            "{marker} {:<26} {} ({}-{})",
            clip(&team.team_name, 26),
            team.owner_name,
            record.wins,
            record.losses,
        ));

        if app.state.rosters.expanded.contains(&team.roster.roster_id) {
            for (slot, player_id) in history
                .league
                .roster_positions
                .iter()
                .zip(team.roster.starters.iter())
            {
                lines.push(format!("    {slot:<6} {}", player_name(history, player_id)));
            }
            for player_id in team.bench() {
                lines.push(format!("    BN     {}", player_name(history, player_id)));
            }
            lines.push(String::new());
        }
    }

    app.state.rosters.ensure_visible(selected_line, inner.height as usize);
    f.render_widget(
        Paragraph::new(lines.join("\n")).scroll((app.state.rosters.scroll_offset, 0)),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

// ---------------------------------------------------------------------------
// Label helpers
// ---------------------------------------------------------------------------

fn team_label(history: &LeagueHistory, roster_id: u32) -> String {
    history
        .team(roster_id)
        .map(|t| t.team_name.clone())
        .unwrap_or_else(|| format!("Roster {roster_id}"))
}

fn owner_label(history: &LeagueHistory, owner_id: &str) -> String {
    history
        .team_by_owner(owner_id)
        .map(|t| t.owner_name.clone())
        .unwrap_or_else(|| owner_id.to_string())
}

fn player_name(history: &LeagueHistory, player_id: &str) -> String {
    history
        .players
        .get(player_id)
        .map(|p| {
            let mut name = p.full_name();
            if !p.position.is_empty() {
                name = format!("{name} ({})", p.position);
            }
            name
        })
        .unwrap_or_else(|| player_id.to_string())
}

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleeper_api::DraftPick;
    use std::collections::HashMap;

    #[test]
    fn trade_assets_render_in_a_stable_order() {
        let history = LeagueHistory::default();
        let trade = Trade {
            adds: HashMap::from([
                ("9999".to_owned(), 1),
                ("1111".to_owned(), 1),
                ("5555".to_owned(), 2),
            ]),
            roster_ids: vec![1, 2],
            draft_picks: vec![DraftPick {
                season: "2025".to_owned(),
                round: 2,
                original_roster_id: 2,
                receiving_roster_id: 1,
            }],
            ..Default::default()
        };

        // Unknown players fall back to their ids; the list must come out
        // sorted regardless of the add-map's hash order, picks last.
        let entries = trade_side_entries(&history, &trade, 1);
        assert_eq!(
            entries,
            ["1111", "9999", "2025 round 2 pick (originally Roster 2)"]
        );

        let other_side = trade_side_entries(&history, &trade, 2);
        assert_eq!(other_side, ["5555"]);
    }
}
