use crate::wire::{
    RawBracketMatch, RawLeague, RawMatchup, RawPlayerMap, RawRoster, RawTransaction, RawUser,
};
use crate::{
    BracketMatch, BracketSource, DraftPick, League, LeagueUser, Matchup, Player, PlayerMap,
    Roster, TeamRecord, Trade, TradeStatus,
};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const SLEEPER_V1: &str = "https://api.sleeper.app/v1";

/// Sleeper API client. All reads are public and unauthenticated.
#[derive(Debug, Clone)]
pub struct SleeperApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SleeperApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("sleeper-tui/0.1 (terminal league dashboard)")
                .build()
                .unwrap_or_default(),
            base_url: SLEEPER_V1.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl SleeperApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different base URL. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Fetch one season's league record. A missing league is an error here:
    /// this is the season-chain-defining fetch.
    pub async fn fetch_league(&self, league_id: &str) -> ApiResult<League> {
        let url = format!("{}/league/{league_id}", self.base_url);
        let raw: RawLeague = self.get_strict(&url).await?;
        if raw.league_id.is_empty() {
            return Err(ApiError::NotFound(format!("league {league_id}")));
        }
        Ok(map_league(raw))
    }

    pub async fn fetch_rosters(&self, league_id: &str) -> ApiResult<Vec<Roster>> {
        let url = format!("{}/league/{league_id}/rosters", self.base_url);
        let raw: Vec<RawRoster> = self.get_strict(&url).await?;
        Ok(raw.into_iter().map(map_roster).collect())
    }

    pub async fn fetch_users(&self, league_id: &str) -> ApiResult<Vec<LeagueUser>> {
        let url = format!("{}/league/{league_id}/users", self.base_url);
        let raw: Vec<RawUser> = self.get_strict(&url).await?;
        Ok(raw.into_iter().map(map_user).collect())
    }

    /// Fetch the global NFL player directory. Large (~5 MB) and shared
    /// read-only across all seasons.
    pub async fn fetch_players(&self) -> ApiResult<PlayerMap> {
        let url = format!("{}/players/nfl", self.base_url);
        let raw: RawPlayerMap = self.get(&url).await?;
        Ok(raw
            .into_iter()
            .map(|(id, p)| {
                (
                    id,
                    Player {
                        first_name: p.first_name.unwrap_or_default(),
                        last_name: p.last_name.unwrap_or_default(),
                        position: p.position.unwrap_or_default(),
                        team: p.team,
                        injury_status: p.injury_status,
                    },
                )
            })
            .collect())
    }

    /// Fetch one week's score rows. A week with no data comes back empty.
    pub async fn fetch_matchups(&self, league_id: &str, week: u32) -> ApiResult<Vec<Matchup>> {
        let url = format!("{}/league/{league_id}/matchups/{week}", self.base_url);
        let raw: Vec<RawMatchup> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_matchup).collect())
    }

    /// Fetch one round's transactions and keep only the trades.
    pub async fn fetch_trades(&self, league_id: &str, round: u32) -> ApiResult<Vec<Trade>> {
        let url = format!("{}/league/{league_id}/transactions/{round}", self.base_url);
        let raw: Vec<RawTransaction> = self.get(&url).await?;
        Ok(collect_trades(raw))
    }

    pub async fn fetch_winners_bracket(&self, league_id: &str) -> ApiResult<Vec<BracketMatch>> {
        self.fetch_bracket(league_id, "winners_bracket").await
    }

    pub async fn fetch_losers_bracket(&self, league_id: &str) -> ApiResult<Vec<BracketMatch>> {
        self.fetch_bracket(league_id, "losers_bracket").await
    }

    async fn fetch_bracket(&self, league_id: &str, kind: &str) -> ApiResult<Vec<BracketMatch>> {
        let url = format!("{}/league/{league_id}/{kind}", self.base_url);
        let raw: Vec<RawBracketMatch> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_bracket_match).collect())
    }

    /// Degrading GET: a client error (404 etc.) is treated as empty data for
    /// that unit of work, not a failure. Used for per-week, per-round, and
    /// per-bracket fetches.
    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }

    /// Strict GET: any non-success status is an error. Used for the fetches
    /// whose failure is fatal to a load (league, rosters, users).
    async fn get_strict<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Mapping: Sleeper wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_league(raw: RawLeague) -> League {
    League {
        league_id: raw.league_id,
        name: raw.name.unwrap_or_default(),
        season: raw.season.unwrap_or_default(),
        total_rosters: raw.total_rosters.unwrap_or_default(),
        roster_positions: raw.roster_positions.unwrap_or_default(),
        previous_league_id: raw.previous_league_id,
    }
}

fn map_roster(raw: RawRoster) -> Roster {
    let settings = raw.settings.unwrap_or_default();
    Roster {
        roster_id: raw.roster_id,
        owner_id: raw.owner_id.unwrap_or_default(),
        players: raw.players.unwrap_or_default(),
        starters: raw.starters.unwrap_or_default(),
        record: TeamRecord {
            wins: settings.wins,
            losses: settings.losses,
            points_for: settings.fpts,
            points_against: settings.fpts_against,
        },
    }
}

fn map_user(raw: RawUser) -> LeagueUser {
    LeagueUser {
        user_id: raw.user_id,
        display_name: raw.display_name.unwrap_or_default(),
        avatar: raw.avatar,
        team_name: raw.metadata.and_then(|m| m.team_name),
    }
}

/// Week, year, and bot flag are stamped later by the matchup aggregator.
fn map_matchup(raw: RawMatchup) -> Matchup {
    Matchup {
        matchup_id: raw.matchup_id,
        roster_id: raw.roster_id,
        opponent_id: raw.opponent_id,
        points: raw.points,
        wins: raw.wins,
        losses: raw.losses,
        week: 0,
        year: String::new(),
        is_bot: false,
    }
}

/// Keep only trade-typed transactions from a round's batch.
pub fn collect_trades(raw: Vec<RawTransaction>) -> Vec<Trade> {
    raw.into_iter()
        .filter(|t| t.transaction_type.as_deref() == Some("trade"))
        .map(map_trade)
        .collect()
}

fn map_trade(raw: RawTransaction) -> Trade {
    Trade {
        transaction_id: raw.transaction_id,
        creator: raw.creator.unwrap_or_default(),
        created: raw.created,
        status_updated: raw.status_updated,
        status: parse_trade_status(raw.status.as_deref().unwrap_or_default()),
        adds: raw.adds.unwrap_or_default(),
        drops: raw.drops.unwrap_or_default(),
        consenter_ids: raw.consenter_ids.unwrap_or_default(),
        roster_ids: raw.roster_ids.unwrap_or_default(),
        draft_picks: raw
            .draft_picks
            .unwrap_or_default()
            .into_iter()
            .map(|p| DraftPick {
                season: p.season.unwrap_or_default(),
                round: p.round,
                original_roster_id: p.roster_id,
                receiving_roster_id: p.owner_id,
            })
            .collect(),
    }
}

fn parse_trade_status(s: &str) -> TradeStatus {
    match s {
        "complete" => TradeStatus::Complete,
        "failed" => TradeStatus::Failed,
        _ => TradeStatus::Pending,
    }
}

fn map_bracket_match(raw: RawBracketMatch) -> BracketMatch {
    let t1 = bracket_source(raw.t1, raw.t1_from.as_ref());
    let t2 = bracket_source(raw.t2, raw.t2_from.as_ref());
    BracketMatch {
        round: raw.r,
        match_id: raw.m,
        winner: raw.w,
        loser: raw.l,
        t1,
        t2,
    }
}

/// Decode a slot's participant source. A `_from` reference names a single
/// prior match's outcome slot; a winner reference takes precedence when the
/// upstream data carries both (never observed, but the type forbids
/// representing the ambiguity). Without a reference the slot is a direct
/// roster seed.
fn bracket_source(
    direct: Option<u32>,
    from: Option<&crate::wire::RawBracketRef>,
) -> Option<BracketSource> {
    if let Some(r) = from {
        if let Some(m) = r.w {
            return Some(BracketSource::Winner(m));
        }
        if let Some(m) = r.l {
            return Some(BracketSource::Loser(m));
        }
    }
    direct.map(BracketSource::Roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::RawBracketRef;

    fn trade_json(id: &str, kind: &str) -> String {
        format!(
            r#"{{"transaction_id":"{id}","type":"{kind}","creator":"u1","created":1,"status_updated":2,"status":"complete","roster_ids":[1,2]}}"#
        )
    }

    #[test]
    fn bracket_source_prefers_winner_reference() {
        let from = RawBracketRef { w: Some(3), l: None };
        assert_eq!(
            bracket_source(None, Some(&from)),
            Some(BracketSource::Winner(3))
        );
    }

    #[test]
    fn bracket_source_loser_reference() {
        let from = RawBracketRef { w: None, l: Some(4) };
        assert_eq!(
            bracket_source(Some(9), Some(&from)),
            Some(BracketSource::Loser(4))
        );
    }

    #[test]
    fn bracket_source_falls_back_to_direct_roster() {
        assert_eq!(bracket_source(Some(7), None), Some(BracketSource::Roster(7)));
        assert_eq!(bracket_source(None, None), None);
    }

    #[test]
    fn collect_trades_drops_waivers_and_free_agents() {
        let raw: Vec<RawTransaction> = serde_json::from_str(&format!(
            "[{},{},{}]",
            trade_json("t1", "trade"),
            trade_json("t2", "waiver"),
            trade_json("t3", "trade"),
        ))
        .unwrap();
        let trades = collect_trades(raw);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].transaction_id, "t1");
        assert_eq!(trades[1].transaction_id, "t3");
        assert_eq!(trades[0].status, TradeStatus::Complete);
        assert!(!trades[0].is_malformed());
    }

    #[tokio::test]
    async fn matchup_fetch_degrades_to_empty_on_404() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/league/1/matchups/3")
            .with_status(404)
            .create_async()
            .await;
        let api = SleeperApi::with_base_url(server.url());
        let rows = api.fetch_matchups("1", 3).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn league_fetch_is_strict_on_404() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/league/999")
            .with_status(404)
            .create_async()
            .await;
        let api = SleeperApi::with_base_url(server.url());
        assert!(api.fetch_league("999").await.is_err());
    }

    #[tokio::test]
    async fn trade_round_404_contributes_zero_trades() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/league/1/transactions/1")
            .with_body(format!("[{}]", trade_json("t1", "trade")))
            .create_async()
            .await;
        let _gone = server
            .mock("GET", "/league/1/transactions/2")
            .with_status(404)
            .create_async()
            .await;
        let api = SleeperApi::with_base_url(server.url());
        let round1 = api.fetch_trades("1", 1).await.unwrap();
        let round2 = api.fetch_trades("1", 2).await.unwrap();
        assert_eq!(round1.len() + round2.len(), 1);
    }

    #[tokio::test]
    async fn bracket_matches_decode_tagged_sources() {
        let body = r#"[
            {"r":1,"m":1,"t1":1,"t2":4,"w":1,"l":4},
            {"r":2,"m":3,"t1_from":{"w":1},"t2_from":{"w":2},"w":1,"l":2}
        ]"#;
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/league/1/winners_bracket")
            .with_body(body)
            .create_async()
            .await;
        let api = SleeperApi::with_base_url(server.url());
        let bracket = api.fetch_winners_bracket("1").await.unwrap();
        assert_eq!(bracket.len(), 2);
        assert_eq!(bracket[0].t1, Some(BracketSource::Roster(1)));
        assert_eq!(bracket[1].t1, Some(BracketSource::Winner(1)));
        assert_eq!(bracket[1].t2, Some(BracketSource::Winner(2)));
    }
}
