/// Sleeper API raw wire types — serde shapes for deserializing responses.
/// These map to the clean domain types in lib.rs via the mapping code in
/// client.rs and history.rs.
use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawLeague {
    pub league_id: String,
    pub name: Option<String>,
    pub season: Option<String>,
    pub total_rosters: Option<u32>,
    pub roster_positions: Option<Vec<String>>,
    pub previous_league_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Rosters & users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawRoster {
    pub roster_id: u32,
    /// Null for orphaned rosters with no owning user.
    pub owner_id: Option<String>,
    pub players: Option<Vec<String>>,
    pub starters: Option<Vec<String>>,
    pub settings: Option<RawRosterSettings>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawRosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub fpts: f64,
    #[serde(default)]
    pub fpts_against: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawUser {
    pub user_id: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub metadata: Option<RawUserMetadata>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawUserMetadata {
    pub team_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Players (global NFL directory, keyed by player id)
// ---------------------------------------------------------------------------

pub type RawPlayerMap = HashMap<String, RawPlayer>;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawPlayer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub injury_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Weekly matchups
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawMatchup {
    /// Pairing id: two rosters share one matchup_id within a week.
    pub matchup_id: Option<u32>,
    pub roster_id: u32,
    pub opponent_id: Option<u32>,
    #[serde(default)]
    pub points: f64,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawTransaction {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub creator: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub status_updated: i64,
    pub status: Option<String>,
    /// player id -> receiving roster id
    pub adds: Option<HashMap<String, u32>>,
    /// player id -> relinquishing roster id
    pub drops: Option<HashMap<String, u32>>,
    pub consenter_ids: Option<Vec<u32>>,
    pub roster_ids: Option<Vec<u32>>,
    pub draft_picks: Option<Vec<RawDraftPick>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawDraftPick {
    pub season: Option<String>,
    #[serde(default)]
    pub round: u32,
    /// Original owner of the pick slot.
    #[serde(default)]
    pub roster_id: u32,
    /// Roster receiving the pick in this trade.
    #[serde(default)]
    pub owner_id: u32,
    #[serde(default)]
    pub previous_owner_id: u32,
}

// ---------------------------------------------------------------------------
// Playoff brackets
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawBracketMatch {
    /// Round number within the bracket.
    pub r: u32,
    /// Match id, monotonic within a round.
    pub m: u32,
    /// Winner roster id, once played.
    pub w: Option<u32>,
    /// Loser roster id, once played.
    pub l: Option<u32>,
    /// Direct roster id for slot 1, when seeded straight in.
    pub t1: Option<u32>,
    pub t2: Option<u32>,
    /// Reference to a prior match's outcome feeding slot 1.
    pub t1_from: Option<RawBracketRef>,
    pub t2_from: Option<RawBracketRef>,
}

/// `{ "w": 3 }` means "winner of match 3", `{ "l": 3 }` "loser of match 3".
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawBracketRef {
    pub w: Option<u32>,
    pub l: Option<u32>,
}
