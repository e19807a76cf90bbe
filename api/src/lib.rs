pub mod bracket;
pub mod client;
pub mod history;
pub mod wire;

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

const SLEEPER_CDN: &str = "https://sleepercdn.com";

/// Build the CDN URL for a user avatar reference.
pub fn avatar_url(avatar_id: &str) -> String {
    format!("{SLEEPER_CDN}/avatars/{avatar_id}")
}

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the Sleeper wire format
// ---------------------------------------------------------------------------

/// One season's incarnation of a league. Seasons are chained via
/// `previous_league_id`, newest to oldest.
#[derive(Debug, Clone, Default)]
pub struct League {
    pub league_id: String,
    pub name: String,
    /// Season year as the API reports it, e.g. "2024".
    pub season: String,
    pub total_rosters: u32,
    /// Ordered starting-slot labels ("QB", "RB", "FLEX", ...), parallel to
    /// each roster's starters list.
    pub roster_positions: Vec<String>,
    pub previous_league_id: Option<String>,
}

impl League {
    /// The previous season's league id, if the back-reference is usable.
    /// The API reports "0" or an empty string for leagues with no history.
    pub fn previous_id(&self) -> Option<&str> {
        self.previous_league_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "0")
    }
}

/// Season record accumulated by the API, not computed locally.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub points_for: f64,
    pub points_against: f64,
}

/// One fantasy team's holdings within one league-season.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub roster_id: u32,
    /// Empty for orphaned rosters.
    pub owner_id: String,
    pub players: Vec<String>,
    /// Ordered, parallel to the league's roster_positions template.
    pub starters: Vec<String>,
    pub record: TeamRecord,
}

#[derive(Debug, Clone, Default)]
pub struct LeagueUser {
    pub user_id: String,
    pub display_name: String,
    pub avatar: Option<String>,
    /// Custom team name from user metadata, when set.
    pub team_name: Option<String>,
}

/// A roster enriched with its owner's identity. Every roster produces
/// exactly one Team; unresolvable owners are flagged rather than dropped.
#[derive(Debug, Clone, Default)]
pub struct Team {
    pub roster: Roster,
    pub team_name: String,
    pub owner_name: String,
    pub avatar_url: Option<String>,
    /// True when the owning user could not be resolved from the league's
    /// user list.
    pub is_bot: bool,
}

impl Team {
    /// Players held but not starting.
    pub fn bench(&self) -> Vec<&str> {
        self.roster
            .players
            .iter()
            .filter(|p| !self.roster.starters.contains(p))
            .map(String::as_str)
            .collect()
    }
}

/// NFL player from the global directory, shared across all seasons.
#[derive(Debug, Clone, Default)]
pub struct Player {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub team: Option<String>,
    pub injury_status: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "J. Chase" style short form for narrow layouts.
    pub fn short_name(&self) -> String {
        match self.first_name.chars().next() {
            Some(initial) => format!("{initial}. {}", self.last_name),
            None => self.last_name.clone(),
        }
    }
}

pub type PlayerMap = HashMap<String, Player>;

/// One roster's score line for one week, stamped with its season context
/// by the matchup aggregator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matchup {
    /// Pairing id: two rosters share one matchup_id within a week.
    pub matchup_id: Option<u32>,
    pub roster_id: u32,
    pub opponent_id: Option<u32>,
    pub points: f64,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    /// 1-indexed week, stamped by the aggregator.
    pub week: u32,
    /// Season year string, stamped by the aggregator.
    pub year: String,
    /// Bot flag from that season's roster/user join.
    pub is_bot: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TradeStatus {
    Complete,
    #[default]
    Pending,
    Failed,
}

impl TradeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TradeStatus::Complete => "complete",
            TradeStatus::Pending => "pending",
            TradeStatus::Failed => "failed",
        }
    }
}

/// A draft pick changing hands as part of a trade.
#[derive(Debug, Clone, Default)]
pub struct DraftPick {
    pub season: String,
    pub round: u32,
    /// Original owner of the pick slot.
    pub original_roster_id: u32,
    /// Roster receiving the pick.
    pub receiving_roster_id: u32,
}

/// A trade-typed transaction, flattened across rounds and seasons.
#[derive(Debug, Clone, Default)]
pub struct Trade {
    pub transaction_id: String,
    /// Creating user's id.
    pub creator: String,
    /// Millisecond timestamps from the API.
    pub created: i64,
    pub status_updated: i64,
    pub status: TradeStatus,
    /// player id -> receiving roster id
    pub adds: HashMap<String, u32>,
    /// player id -> relinquishing roster id
    pub drops: HashMap<String, u32>,
    pub consenter_ids: Vec<u32>,
    pub roster_ids: Vec<u32>,
    pub draft_picks: Vec<DraftPick>,
}

impl Trade {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created)
    }

    /// A trade with fewer than two participating rosters cannot be
    /// attributed to a pair of managers; consumers skip these.
    pub fn is_malformed(&self) -> bool {
        self.roster_ids.len() < 2
    }
}

// ---------------------------------------------------------------------------
// Playoff brackets
// ---------------------------------------------------------------------------

/// Where a bracket slot's participant comes from. The wire format is
/// ambiguous (a plain roster id or a nested winner/loser reference); this
/// makes the resolver's matching rules a direct pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSource {
    /// Seeded straight in as this roster.
    Roster(u32),
    /// Winner of a prior match.
    Winner(u32),
    /// Loser of a prior match.
    Loser(u32),
}

/// One node of a single-elimination bracket.
#[derive(Debug, Clone, Default)]
pub struct BracketMatch {
    pub round: u32,
    /// Monotonic within a round; used as a tie-break by the resolver.
    pub match_id: u32,
    pub winner: Option<u32>,
    pub loser: Option<u32>,
    pub t1: Option<BracketSource>,
    pub t2: Option<BracketSource>,
}

/// Up to three placement slots resolved from one season's bracket.
/// For the winners bracket these are 1st/2nd/3rd place; for the losers
/// bracket, last/second-to-last/third-to-last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placements {
    pub first: Option<u32>,
    pub second: Option<u32>,
    pub third: Option<u32>,
}

impl Placements {
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none() && self.third.is_none()
    }
}

// ---------------------------------------------------------------------------
// Aggregation session
// ---------------------------------------------------------------------------

/// Everything the dashboard needs for one league load. Assembled once by
/// `history::load_history`; nothing persists between loads.
#[derive(Debug, Clone, Default)]
pub struct LeagueHistory {
    /// The starting (current) season.
    pub league: League,
    /// Season chain, newest to oldest. Always contains at least `league`.
    pub seasons: Vec<League>,
    /// Current season's enriched teams, bots included.
    pub teams: Vec<Team>,
    pub players: PlayerMap,
    /// All weekly score rows across every season in the chain.
    pub matchups: Vec<Matchup>,
    /// All trades across every season in the chain.
    pub trades: Vec<Trade>,
    /// Season year -> 1st/2nd/3rd place roster ids.
    pub trophies: BTreeMap<String, Placements>,
    /// Season year -> last/second-to-last/third-to-last roster ids.
    pub toilet_bowls: BTreeMap<String, Placements>,
}

impl LeagueHistory {
    pub fn team(&self, roster_id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.roster.roster_id == roster_id)
    }

    pub fn team_by_owner(&self, owner_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.roster.owner_id == owner_id)
    }
}
