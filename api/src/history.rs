//! League-history aggregation: walk the season chain once, then fan the
//! per-season fetches out over it and assemble one [`LeagueHistory`] value.
//!
//! Failure rules follow the dashboard's degrade policy: only the initial
//! league/rosters/users fetch is fatal. Everything after that — a missing
//! week, a 404'd transaction round, a season too young for playoffs —
//! degrades to empty data for that unit and aggregation continues.

use crate::bracket;
use crate::client::{ApiResult, SleeperApi};
use crate::{
    League, LeagueHistory, LeagueUser, Matchup, Placements, Roster, Team, Trade, avatar_url,
};
use futures_util::future::{join, join_all};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Regular-season weeks worth fetching. Sleeper leagues never schedule
/// fantasy matchups past week 17.
pub const MAX_WEEK: u32 = 17;

/// Transaction "rounds" (leg buckets) the API exposes per season.
pub const MAX_TRANSACTION_ROUND: u32 = 16;

// ---------------------------------------------------------------------------
// Season chain walker
// ---------------------------------------------------------------------------

/// Follow `previous_league_id` back-references from the already-fetched
/// starting season, newest to oldest.
///
/// The chain ends at the first season without a usable back-reference, at
/// the first failed fetch (partial history is valid output), or at a
/// back-reference that points to a season already visited. Upstream data
/// carries no cycle bound of its own, so the visited set is what guarantees
/// termination.
pub async fn walk_season_chain(api: &SleeperApi, start: League) -> Vec<League> {
    let mut visited: HashSet<String> = HashSet::from([start.league_id.clone()]);
    let mut chain = vec![start];

    while let Some(prev_id) = chain
        .last()
        .and_then(|l| l.previous_id())
        .map(str::to_owned)
    {
        if !visited.insert(prev_id.clone()) {
            warn!("season chain cycle at league {prev_id}; stopping walk");
            break;
        }
        match api.fetch_league(&prev_id).await {
            Ok(league) => chain.push(league),
            Err(e) => {
                debug!("season chain ends at {prev_id}: {e}");
                break;
            }
        }
    }

    chain
}

// ---------------------------------------------------------------------------
// Roster/user join
// ---------------------------------------------------------------------------

/// Join rosters with their owning users. Every input roster yields exactly
/// one [`Team`]; rosters whose owner is missing from the user list are
/// flagged as bots rather than dropped. Hiding bots is a display concern.
pub fn enrich_rosters(rosters: Vec<Roster>, users: &[LeagueUser]) -> Vec<Team> {
    let by_id: HashMap<&str, &LeagueUser> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    rosters
        .into_iter()
        .map(|roster| match by_id.get(roster.owner_id.as_str()) {
            Some(user) => Team {
                team_name: user
                    .team_name
                    .clone()
                    .unwrap_or_else(|| format!("Team {}", roster.roster_id)),
                owner_name: user.display_name.clone(),
                avatar_url: user.avatar.as_deref().map(avatar_url),
                is_bot: false,
                roster,
            },
            None => Team {
                team_name: format!("Team {}", roster.roster_id),
                owner_name: "Unknown Owner".to_owned(),
                avatar_url: None,
                is_bot: true,
                roster,
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Matchup stamping
// ---------------------------------------------------------------------------

/// Stamp one week's raw score rows with their season context. Deterministic:
/// the same rows and context always produce identical output.
pub fn stamp_matchups(
    rows: Vec<Matchup>,
    week: u32,
    year: &str,
    bots: &HashMap<u32, bool>,
) -> Vec<Matchup> {
    rows.into_iter()
        .map(|mut m| {
            m.week = week;
            m.year = year.to_owned();
            m.is_bot = bots.get(&m.roster_id).copied().unwrap_or(false);
            m
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-season aggregation
// ---------------------------------------------------------------------------

struct SeasonData {
    matchups: Vec<Matchup>,
    trades: Vec<Trade>,
    trophies: Option<Placements>,
    toilet: Option<Placements>,
}

/// Load one season's matchups, trades, and bracket placements. Independent
/// fetches within the season run concurrently; any of them failing leaves
/// that unit empty.
async fn load_season(
    api: &SleeperApi,
    league: &League,
    prefetched_teams: Option<&[Team]>,
) -> SeasonData {
    let id = league.league_id.as_str();

    // Bot flags come from this season's own roster/user join, not the
    // starting season's.
    let teams;
    let season_teams: &[Team] = match prefetched_teams {
        Some(t) => t,
        None => {
            let (rosters, users) = join(api.fetch_rosters(id), api.fetch_users(id)).await;
            teams = enrich_rosters(rosters.unwrap_or_default(), &users.unwrap_or_default());
            &teams
        }
    };
    let bots: HashMap<u32, bool> = season_teams
        .iter()
        .map(|t| (t.roster.roster_id, t.is_bot))
        .collect();

    let week_rows = join_all((1..=MAX_WEEK).map(|week| api.fetch_matchups(id, week))).await;
    let mut matchups = Vec::new();
    for (week, rows) in (1..=MAX_WEEK).zip(week_rows) {
        match rows {
            Ok(rows) => matchups.extend(stamp_matchups(rows, week, &league.season, &bots)),
            Err(e) => debug!("no matchups for {} week {week}: {e}", league.season),
        }
    }

    let rounds = join_all((1..=MAX_TRANSACTION_ROUND).map(|round| api.fetch_trades(id, round)))
        .await;
    let trades: Vec<Trade> = rounds
        .into_iter()
        .filter_map(|r| match r {
            Ok(t) => Some(t),
            Err(e) => {
                debug!("no transactions for {}: {e}", league.season);
                None
            }
        })
        .flatten()
        .collect();

    let (winners, losers) =
        join(api.fetch_winners_bracket(id), api.fetch_losers_bracket(id)).await;
    let trophies = winners.ok().as_deref().and_then(bracket::resolve_winners);
    let toilet = losers.ok().as_deref().and_then(bracket::resolve_losers);

    SeasonData {
        matchups,
        trades,
        trophies,
        toilet,
    }
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Load a league's full history in one pass.
///
/// The league, roster, and user fetches for the starting season are the only
/// fatal ones. The season chain is walked once and shared by all per-season
/// aggregations, which then run concurrently. The player directory loads
/// alongside them; if it is unavailable the views simply show fewer names.
pub async fn load_history(api: &SleeperApi, league_id: &str) -> ApiResult<LeagueHistory> {
    let league = api.fetch_league(league_id).await?;
    let (rosters, users) = join(api.fetch_rosters(league_id), api.fetch_users(league_id)).await;
    let teams = enrich_rosters(rosters?, &users?);

    let seasons = walk_season_chain(api, league.clone()).await;

    let seasons_fut = join_all(seasons.iter().enumerate().map(|(idx, season)| {
        let prefetched = (idx == 0).then_some(teams.as_slice());
        load_season(api, season, prefetched)
    }));
    let (players, season_data) = join(api.fetch_players(), seasons_fut).await;

    let players = players.unwrap_or_else(|e| {
        warn!("player directory unavailable: {e}");
        Default::default()
    });

    let mut matchups = Vec::new();
    let mut trades = Vec::new();
    let mut trophies = BTreeMap::new();
    let mut toilet_bowls = BTreeMap::new();
    for (season, data) in seasons.iter().zip(season_data) {
        matchups.extend(data.matchups);
        trades.extend(data.trades);
        if let Some(p) = data.trophies {
            trophies.insert(season.season.clone(), p);
        }
        if let Some(p) = data.toilet {
            toilet_bowls.insert(season.season.clone(), p);
        }
    }

    Ok(LeagueHistory {
        league,
        seasons,
        teams,
        players,
        matchups,
        trades,
        trophies,
        toilet_bowls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamRecord;

    fn roster(roster_id: u32, owner_id: &str) -> Roster {
        Roster {
            roster_id,
            owner_id: owner_id.to_owned(),
            players: vec!["p1".into(), "p2".into()],
            starters: vec!["p1".into()],
            record: TeamRecord::default(),
        }
    }

    fn user(user_id: &str, display_name: &str, team_name: Option<&str>) -> LeagueUser {
        LeagueUser {
            user_id: user_id.to_owned(),
            display_name: display_name.to_owned(),
            avatar: Some("abc123".to_owned()),
            team_name: team_name.map(str::to_owned),
        }
    }

    #[test]
    fn joiner_preserves_every_roster() {
        let rosters = vec![roster(1, "u1"), roster(2, "u2"), roster(3, "ghost")];
        let users = vec![user("u1", "alice", Some("Gridiron Gurus")), user("u2", "bob", None)];
        let teams = enrich_rosters(rosters, &users);
        assert_eq!(teams.len(), 3);
    }

    #[test]
    fn joiner_resolves_names_and_avatar() {
        let teams = enrich_rosters(
            vec![roster(1, "u1"), roster(2, "u2")],
            &[user("u1", "alice", Some("Gridiron Gurus")), user("u2", "bob", None)],
        );
        assert_eq!(teams[0].team_name, "Gridiron Gurus");
        assert_eq!(teams[0].owner_name, "alice");
        assert_eq!(
            teams[0].avatar_url.as_deref(),
            Some("https://sleepercdn.com/avatars/abc123")
        );
        // No custom team name: fall back to "Team {roster_id}".
        assert_eq!(teams[1].team_name, "Team 2");
        assert!(!teams[0].is_bot);
    }

    #[test]
    fn joiner_flags_unresolvable_owner_as_bot() {
        let teams = enrich_rosters(vec![roster(7, "ghost")], &[user("u1", "alice", None)]);
        assert!(teams[0].is_bot);
        assert_eq!(teams[0].owner_name, "Unknown Owner");
        assert_eq!(teams[0].team_name, "Team 7");
        assert!(teams[0].avatar_url.is_none());
    }

    #[test]
    fn stamping_is_deterministic() {
        let rows = vec![
            Matchup { matchup_id: Some(1), roster_id: 1, points: 120.5, ..Default::default() },
            Matchup { matchup_id: Some(1), roster_id: 2, points: 98.2, ..Default::default() },
        ];
        let bots = HashMap::from([(2, true)]);
        let a = stamp_matchups(rows.clone(), 4, "2023", &bots);
        let b = stamp_matchups(rows, 4, "2023", &bots);
        assert_eq!(a, b);
        assert_eq!(a[0].week, 4);
        assert_eq!(a[0].year, "2023");
        assert!(!a[0].is_bot);
        assert!(a[1].is_bot);
    }

    fn league_json(id: &str, season: &str, prev: Option<&str>) -> String {
        match prev {
            Some(p) => format!(
                r#"{{"league_id":"{id}","name":"L","season":"{season}","total_rosters":10,"previous_league_id":"{p}"}}"#
            ),
            None => format!(
                r#"{{"league_id":"{id}","name":"L","season":"{season}","total_rosters":10}}"#
            ),
        }
    }

    fn start_league(id: &str, season: &str, prev: Option<&str>) -> League {
        League {
            league_id: id.to_owned(),
            season: season.to_owned(),
            previous_league_id: prev.map(str::to_owned),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn chain_walk_follows_back_references_newest_first() {
        let mut server = mockito::Server::new_async().await;
        let _b = server
            .mock("GET", "/league/B")
            .with_body(league_json("B", "2023", Some("C")))
            .create_async()
            .await;
        let _c = server
            .mock("GET", "/league/C")
            .with_body(league_json("C", "2022", None))
            .create_async()
            .await;
        let api = SleeperApi::with_base_url(server.url());

        let chain = walk_season_chain(&api, start_league("A", "2024", Some("B"))).await;
        let seasons: Vec<&str> = chain.iter().map(|l| l.season.as_str()).collect();
        assert_eq!(seasons, ["2024", "2023", "2022"]);
    }

    #[tokio::test]
    async fn chain_walk_stops_at_first_failed_fetch() {
        // Three-season chain, middle fetch fails: only the start survives.
        let mut server = mockito::Server::new_async().await;
        let _b = server
            .mock("GET", "/league/B")
            .with_status(500)
            .create_async()
            .await;
        let api = SleeperApi::with_base_url(server.url());

        let chain = walk_season_chain(&api, start_league("A", "2024", Some("B"))).await;
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].league_id, "A");
    }

    #[tokio::test]
    async fn chain_walk_terminates_on_cycle() {
        // B points back at A; the visited set must stop the walk.
        let mut server = mockito::Server::new_async().await;
        let _b = server
            .mock("GET", "/league/B")
            .with_body(league_json("B", "2023", Some("A")))
            .create_async()
            .await;
        let api = SleeperApi::with_base_url(server.url());

        let chain = walk_season_chain(&api, start_league("A", "2024", Some("B"))).await;
        assert_eq!(chain.len(), 2);
    }

    #[tokio::test]
    async fn load_history_assembles_one_session_object() {
        let mut server = mockito::Server::new_async().await;
        let _league = server
            .mock("GET", "/league/10")
            .with_body(league_json("10", "2024", None))
            .create_async()
            .await;
        let _rosters = server
            .mock("GET", "/league/10/rosters")
            .with_body(
                r#"[{"roster_id":1,"owner_id":"u1","players":["p1","p2"],"starters":["p1"],
                     "settings":{"wins":5,"losses":2,"fpts":1000.5,"fpts_against":900.0}},
                    {"roster_id":2,"owner_id":"u9"}]"#,
            )
            .create_async()
            .await;
        let _users = server
            .mock("GET", "/league/10/users")
            .with_body(
                r#"[{"user_id":"u1","display_name":"alice","avatar":"av1",
                     "metadata":{"team_name":"Gridiron Gurus"}}]"#,
            )
            .create_async()
            .await;
        let _week1 = server
            .mock("GET", "/league/10/matchups/1")
            .with_body(
                r#"[{"matchup_id":1,"roster_id":1,"points":101.2},
                    {"matchup_id":1,"roster_id":2,"points":88.0}]"#,
            )
            .create_async()
            .await;
        let _round3 = server
            .mock("GET", "/league/10/transactions/3")
            .with_body(
                r#"[{"transaction_id":"t1","type":"trade","creator":"u1","created":1,
                     "status_updated":2,"status":"complete","roster_ids":[1,2]},
                    {"transaction_id":"t2","type":"waiver","roster_ids":[1]}]"#,
            )
            .create_async()
            .await;
        let _winners = server
            .mock("GET", "/league/10/winners_bracket")
            .with_body(r#"[{"r":2,"m":3,"t1_from":{"w":1},"t2_from":{"w":2},"w":1,"l":2}]"#)
            .create_async()
            .await;
        // Every other week/round/bracket endpoint is unmocked and fails;
        // those units must degrade to empty without sinking the load.
        let api = SleeperApi::with_base_url(server.url());

        let history = load_history(&api, "10").await.unwrap();
        assert_eq!(history.seasons.len(), 1);
        assert_eq!(history.teams.len(), 2);
        assert!(history.teams[1].is_bot);

        assert_eq!(history.matchups.len(), 2);
        assert_eq!(history.matchups[0].week, 1);
        assert_eq!(history.matchups[0].year, "2024");
        assert!(history.matchups[1].is_bot);

        assert_eq!(history.trades.len(), 1);
        assert_eq!(history.trades[0].transaction_id, "t1");

        let trophy = history.trophies.get("2024").unwrap();
        assert_eq!(trophy.first, Some(1));
        assert_eq!(trophy.second, Some(2));
        // Losers bracket was unavailable: no toilet bowl entry at all.
        assert!(history.toilet_bowls.is_empty());
    }
}
