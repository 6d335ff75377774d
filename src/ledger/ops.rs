//! The round ledger and its mutation operations
//!
//! Rounds are kept oldest-first and are never reordered. Every operation
//! notifies the attached observers exactly once, even when it turned out to
//! be a no-op (unknown index or match id).

use std::fmt;
use std::rc::Rc;

use super::state::{Round, Team, TiePolicy};
use crate::error::LedgerError;

/// Immutable view of the rounds at some point in time
pub type Snapshot = Rc<Vec<Round>>;

/// Hook invoked synchronously after each ledger operation
pub trait ChangeObserver {
    fn rounds_changed(&mut self, rounds: &[Round]) -> Result<(), LedgerError>;
}

/// Ordered history of rounds for one session
pub struct RoundLedger {
    rounds: Snapshot,
    tie_policy: TiePolicy,
    observers: Vec<Box<dyn ChangeObserver>>,
}

impl RoundLedger {
    /// Empty ledger with no observers
    pub fn new(tie_policy: TiePolicy) -> Self {
        Self::from_rounds(Vec::new(), tie_policy)
    }

    /// Ledger seeded with existing rounds (winners are re-derived)
    pub fn from_rounds(mut rounds: Vec<Round>, tie_policy: TiePolicy) -> Self {
        for round in &mut rounds {
            round.rederive_winners(tie_policy);
        }
        Self {
            rounds: Rc::new(rounds),
            tie_policy,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ChangeObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn tie_policy(&self) -> TiePolicy {
        self.tie_policy
    }

    /// All rounds, oldest first
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Shared handle to the current rounds; later mutations never show through it
    pub fn snapshot(&self) -> Snapshot {
        Rc::clone(&self.rounds)
    }

    pub fn round(&self, idx: usize) -> Option<&Round> {
        self.rounds.get(idx)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Append a round as the newest entry
    pub fn add_round(&mut self, mut round: Round) -> Result<(), LedgerError> {
        round.rederive_winners(self.tie_policy);
        Rc::make_mut(&mut self.rounds).push(round);
        self.notify()
    }

    /// Remove the round at `idx`; out of range is a no-op
    pub fn remove_round(&mut self, idx: usize) -> Result<(), LedgerError> {
        if idx < self.rounds.len() {
            Rc::make_mut(&mut self.rounds).remove(idx);
        }
        self.notify()
    }

    /// Overwrite the round at `idx` wholesale; out of range is a no-op
    pub fn replace_round(&mut self, idx: usize, mut round: Round) -> Result<(), LedgerError> {
        if idx < self.rounds.len() {
            round.rederive_winners(self.tie_policy);
            Rc::make_mut(&mut self.rounds)[idx] = round;
        }
        self.notify()
    }

    /// Record one side's games for a match and re-derive its winner
    ///
    /// Unknown round index or match id leaves the ledger untouched.
    pub fn set_games(
        &mut self,
        round_idx: usize,
        match_id: &str,
        team: Team,
        games: Option<u32>,
    ) -> Result<(), LedgerError> {
        let found = self
            .rounds
            .get(round_idx)
            .is_some_and(|r| r.find_match(match_id).is_some());
        if found {
            let tie = self.tie_policy;
            if let Some(m) = Rc::make_mut(&mut self.rounds)[round_idx].find_match_mut(match_id) {
                m.set_games(team, games, tie);
            }
        }
        self.notify()
    }

    /// Drop every round
    pub fn clear(&mut self) -> Result<(), LedgerError> {
        self.rounds = Rc::new(Vec::new());
        self.notify()
    }

    /// Push the current rounds to every observer without changing them
    pub fn flush(&mut self) -> Result<(), LedgerError> {
        self.notify()
    }

    fn notify(&mut self) -> Result<(), LedgerError> {
        for observer in &mut self.observers {
            observer.rounds_changed(&self.rounds)?;
        }
        Ok(())
    }
}

impl Default for RoundLedger {
    fn default() -> Self {
        Self::new(TiePolicy::default())
    }
}

impl fmt::Debug for RoundLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundLedger")
            .field("rounds", &self.rounds)
            .field("tie_policy", &self.tie_policy)
            .field("observers", &self.observers.len())
            .finish()
    }
}
