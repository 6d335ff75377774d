//! Round and match data model
//!
//! Everything here is what gets mirrored to the store. The winner of a match
//! is derived from its game counts and is never written by callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::A => "A",
            Team::B => "B",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "a" => Some(Team::A),
            "b" => Some(Team::B),
            _ => None,
        }
    }
}

/// How a match with equal game counts is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// `A` only on a strict lead, otherwise `B` (ties go to B)
    #[default]
    FavorB,
    /// Ties have no winner
    NoWinner,
}

impl TiePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TiePolicy::FavorB => "favor-b",
            TiePolicy::NoWinner => "no-winner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "favor-b" | "favor_b" | "b" => Some(TiePolicy::FavorB),
            "no-winner" | "no_winner" | "none" => Some(TiePolicy::NoWinner),
            _ => None,
        }
    }
}

/// Winner rule: unset unless both sides have a game count
pub fn calc_winner(games_a: Option<u32>, games_b: Option<u32>, tie: TiePolicy) -> Option<Team> {
    let (a, b) = (games_a?, games_b?);
    if a > b {
        Some(Team::A)
    } else if b > a {
        Some(Team::B)
    } else {
        match tie {
            TiePolicy::FavorB => Some(Team::B),
            TiePolicy::NoWinner => None,
        }
    }
}

/// A single contest between team A and team B
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    id: String,
    #[serde(default)]
    games_a: Option<u32>,
    #[serde(default)]
    games_b: Option<u32>,
    #[serde(default)]
    winner: Option<Team>,
    /// Fields owned by other consumers (team rosters etc.), carried through untouched
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Match {
    /// Match with no games recorded yet
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            games_a: None,
            games_b: None,
            winner: None,
            extra: Map::new(),
        }
    }

    pub fn with_games(
        id: impl Into<String>,
        games_a: Option<u32>,
        games_b: Option<u32>,
        tie: TiePolicy,
    ) -> Self {
        Self {
            id: id.into(),
            games_a,
            games_b,
            winner: calc_winner(games_a, games_b, tie),
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn games_a(&self) -> Option<u32> {
        self.games_a
    }

    pub fn games_b(&self) -> Option<u32> {
        self.games_b
    }

    pub fn games(&self, team: Team) -> Option<u32> {
        match team {
            Team::A => self.games_a,
            Team::B => self.games_b,
        }
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Attach a field the ledger does not interpret
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Set one side's game count and re-derive the winner
    pub fn set_games(&mut self, team: Team, games: Option<u32>, tie: TiePolicy) {
        match team {
            Team::A => self.games_a = games,
            Team::B => self.games_b = games,
        }
        self.rederive_winner(tie);
    }

    pub fn rederive_winner(&mut self, tie: TiePolicy) {
        self.winner = calc_winner(self.games_a, self.games_b, tie);
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |g: Option<u32>| g.map_or_else(|| "-".to_string(), |g| g.to_string());
        write!(f, "{} {}-{}", self.id, side(self.games_a), side(self.games_b))?;
        if let Some(winner) = self.winner {
            write!(f, " ({})", winner.as_str())?;
        }
        Ok(())
    }
}

/// Matches played in one time slot, in caller-defined order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Round {
    pub matches: Vec<Match>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Round {
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            matches,
            extra: Map::new(),
        }
    }

    /// Round of fresh matches, one per id
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ids.into_iter().map(Match::new).collect())
    }

    pub fn find_match(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn find_match_mut(&mut self, id: &str) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn rederive_winners(&mut self, tie: TiePolicy) {
        for m in &mut self.matches {
            m.rederive_winner(tie);
        }
    }
}
