//! League-record derivations over the aggregated history: weekly scoring
//! extremes, matchup margins, and trade activity tallies. All pure functions
//! over already-fetched collections; the Records tab renders the output.

use sleeper_api::{LeagueHistory, Matchup, Team, Trade};
use std::collections::HashMap;

const TOP_N: usize = 10;
const PARTNER_N: usize = 3;

#[derive(Debug, Default)]
pub struct RecordsSummary {
    pub top_scores: Vec<ScoreEntry>,
    pub bottom_scores: Vec<ScoreEntry>,
    pub biggest_blowouts: Vec<MatchupPair>,
    pub closest_matchups: Vec<MatchupPair>,
    pub top_traders: Vec<TraderEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub year: String,
    pub week: u32,
    pub roster_id: u32,
    pub points: f64,
}

/// One completed head-to-head, winner first.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupPair {
    pub year: String,
    pub week: u32,
    pub winner_id: u32,
    pub loser_id: u32,
    pub winner_points: f64,
    pub loser_points: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraderEntry {
    pub owner_id: String,
    pub trades: usize,
    /// Most frequent counterparties, owner ids, best first.
    pub partners: Vec<String>,
}

pub fn summarize(history: &LeagueHistory) -> RecordsSummary {
    let mut pairs = pair_matchups(&history.matchups);

    pairs.sort_by(|a, b| b.margin.total_cmp(&a.margin));
    let biggest_blowouts = pairs.iter().take(TOP_N).cloned().collect();
    pairs.sort_by(|a, b| a.margin.total_cmp(&b.margin));
    let closest_matchups = pairs.into_iter().take(TOP_N).collect();

    RecordsSummary {
        top_scores: ranked_scores(&history.matchups, false),
        bottom_scores: ranked_scores(&history.matchups, true),
        biggest_blowouts,
        closest_matchups,
        top_traders: top_traders(&history.trades, &history.teams),
    }
}

/// Highest (or lowest) single-week scores across all seasons. Zero-point
/// rows are unplayed weeks, not shutouts, and never rank. The lowest-score
/// table additionally drops bot rosters — an abandoned team's floor is
/// noise, its ceiling is still a real result.
fn ranked_scores(matchups: &[Matchup], ascending: bool) -> Vec<ScoreEntry> {
    let mut rows: Vec<&Matchup> = matchups
        .iter()
        .filter(|m| m.points > 0.0 && !(ascending && m.is_bot))
        .collect();
    rows.sort_by(|a, b| {
        if ascending {
            a.points.total_cmp(&b.points)
        } else {
            b.points.total_cmp(&a.points)
        }
    });
    rows.into_iter()
        .take(TOP_N)
        .map(|m| ScoreEntry {
            year: m.year.clone(),
            week: m.week,
            roster_id: m.roster_id,
            points: m.points,
        })
        .collect()
}

/// Reunite score rows into head-to-heads: two rows sharing a pairing id
/// within one season-week form one pair, counted once. Pairs involving a
/// bot roster or with no margin (unplayed or dead-even) are dropped.
pub fn pair_matchups(matchups: &[Matchup]) -> Vec<MatchupPair> {
    let mut by_pairing: HashMap<(&str, u32, u32), Vec<&Matchup>> = HashMap::new();
    for m in matchups {
        let Some(pairing_id) = m.matchup_id else {
            continue;
        };
        if m.is_bot {
            continue;
        }
        by_pairing
            .entry((m.year.as_str(), m.week, pairing_id))
            .or_default()
            .push(m);
    }

    let mut pairs = Vec::new();
    for rows in by_pairing.into_values() {
        let [a, b] = rows.as_slice() else {
            continue;
        };
        if a.roster_id == b.roster_id {
            continue;
        }
        let (winner, loser) = if a.points >= b.points { (a, b) } else { (b, a) };
        let margin = winner.points - loser.points;
        if margin <= 0.0 {
            continue;
        }
        pairs.push(MatchupPair {
            year: winner.year.clone(),
            week: winner.week,
            winner_id: winner.roster_id,
            loser_id: loser.roster_id,
            winner_points: winner.points,
            loser_points: loser.points,
            margin,
        });
    }
    pairs
}

/// Tally trades per manager, counting both the creating user and every
/// consenting roster's owner. Malformed trades (fewer than two rosters)
/// are skipped entirely.
pub fn top_traders(trades: &[Trade], teams: &[Team]) -> Vec<TraderEntry> {
    let owner_of: HashMap<u32, &str> = teams
        .iter()
        .filter(|t| !t.roster.owner_id.is_empty())
        .map(|t| (t.roster.roster_id, t.roster.owner_id.as_str()))
        .collect();

    let mut involvement: HashMap<&str, Vec<&Trade>> = HashMap::new();
    for trade in trades.iter().filter(|t| !t.is_malformed()) {
        if !trade.creator.is_empty() {
            involvement.entry(trade.creator.as_str()).or_default().push(trade);
        }
        for roster_id in &trade.roster_ids {
            if let Some(owner) = owner_of.get(roster_id)
                && *owner != trade.creator
            {
                involvement.entry(owner).or_default().push(trade);
            }
        }
    }

    let mut entries: Vec<TraderEntry> = involvement
        .into_iter()
        .map(|(owner_id, their_trades)| {
            let mut partner_counts: HashMap<&str, usize> = HashMap::new();
            for trade in &their_trades {
                for roster_id in &trade.roster_ids {
                    if let Some(partner) = owner_of.get(roster_id)
                        && *partner != owner_id
                    {
                        *partner_counts.entry(partner).or_default() += 1;
                    }
                }
            }
            let mut partners: Vec<(&str, usize)> = partner_counts.into_iter().collect();
            partners.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            TraderEntry {
                owner_id: owner_id.to_owned(),
                trades: their_trades.len(),
                partners: partners
                    .into_iter()
                    .take(PARTNER_N)
                    .map(|(id, _)| id.to_owned())
                    .collect(),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.trades.cmp(&a.trades).then_with(|| a.owner_id.cmp(&b.owner_id)));
    entries.truncate(TOP_N);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleeper_api::Roster;

    fn matchup(year: &str, week: u32, pairing: u32, roster_id: u32, points: f64) -> Matchup {
        Matchup {
            matchup_id: Some(pairing),
            roster_id,
            points,
            week,
            year: year.to_owned(),
            ..Default::default()
        }
    }

    fn team(roster_id: u32, owner_id: &str) -> Team {
        Team {
            roster: Roster {
                roster_id,
                owner_id: owner_id.to_owned(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn trade(id: &str, creator: &str, roster_ids: &[u32]) -> Trade {
        Trade {
            transaction_id: id.to_owned(),
            creator: creator.to_owned(),
            roster_ids: roster_ids.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn each_head_to_head_is_counted_once() {
        let matchups = vec![
            matchup("2024", 1, 1, 1, 130.0),
            matchup("2024", 1, 1, 2, 100.0),
            matchup("2024", 1, 2, 3, 90.0),
            matchup("2024", 1, 2, 4, 89.5),
        ];
        let pairs = pair_matchups(&matchups);
        assert_eq!(pairs.len(), 2);
        let blowout = pairs.iter().find(|p| p.winner_id == 1).unwrap();
        assert_eq!(blowout.loser_id, 2);
        assert!((blowout.margin - 30.0).abs() < 1e-9);
    }

    #[test]
    fn bot_rows_and_unpaired_rows_never_form_pairs() {
        let mut bot_row = matchup("2024", 2, 1, 2, 80.0);
        bot_row.is_bot = true;
        let mut unpaired = matchup("2024", 2, 7, 5, 70.0);
        unpaired.matchup_id = None;
        let matchups = vec![matchup("2024", 2, 1, 1, 100.0), bot_row, unpaired];
        assert!(pair_matchups(&matchups).is_empty());
    }

    #[test]
    fn same_pairing_id_in_different_weeks_stays_separate() {
        let matchups = vec![
            matchup("2024", 1, 1, 1, 100.0),
            matchup("2024", 1, 1, 2, 90.0),
            matchup("2024", 2, 1, 1, 95.0),
            matchup("2024", 2, 1, 2, 99.0),
        ];
        let pairs = pair_matchups(&matchups);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn zero_point_weeks_never_rank() {
        let matchups = vec![
            matchup("2024", 1, 1, 1, 0.0),
            matchup("2024", 1, 1, 2, 55.0),
        ];
        let scores = ranked_scores(&matchups, true);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].roster_id, 2);
    }

    #[test]
    fn bottom_table_drops_bot_rosters_but_top_keeps_them() {
        let mut bot_row = matchup("2024", 1, 1, 9, 12.0);
        bot_row.is_bot = true;
        let matchups = vec![matchup("2024", 1, 1, 1, 140.0), bot_row];
        let bottom = ranked_scores(&matchups, true);
        assert!(bottom.iter().all(|s| s.roster_id != 9));
        let top = ranked_scores(&matchups, false);
        assert!(top.iter().any(|s| s.roster_id == 9));
    }

    #[test]
    fn traders_count_creator_and_consenters() {
        let teams = vec![team(1, "alice"), team(2, "bob"), team(3, "carol")];
        let trades = vec![
            trade("t1", "alice", &[1, 2]),
            trade("t2", "alice", &[1, 3]),
            trade("t3", "bob", &[2, 3]),
        ];
        let entries = top_traders(&trades, &teams);
        let alice = entries.iter().find(|e| e.owner_id == "alice").unwrap();
        assert_eq!(alice.trades, 2);
        let bob = entries.iter().find(|e| e.owner_id == "bob").unwrap();
        assert_eq!(bob.trades, 2); // consented to t1, created t3
        assert_eq!(entries[0].trades, 2);
    }

    #[test]
    fn malformed_trades_are_skipped() {
        let teams = vec![team(1, "alice")];
        let trades = vec![trade("t1", "alice", &[1])];
        assert!(top_traders(&trades, &teams).is_empty());
    }

    #[test]
    fn partners_are_ranked_by_shared_trades() {
        let teams = vec![team(1, "alice"), team(2, "bob"), team(3, "carol")];
        let trades = vec![
            trade("t1", "alice", &[1, 2]),
            trade("t2", "alice", &[1, 2]),
            trade("t3", "alice", &[1, 3]),
        ];
        let entries = top_traders(&trades, &teams);
        let alice = entries.iter().find(|e| e.owner_id == "alice").unwrap();
        assert_eq!(alice.partners.first().map(String::as_str), Some("bob"));
    }
}
