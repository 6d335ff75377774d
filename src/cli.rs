//! Command line front end for the native binary

use std::fmt::Write as _;

use thiserror::Error;

use crate::error::LedgerError;
use crate::ledger::{Round, RoundLedger, Team, TiePolicy};
use crate::platform::FileStore;
use crate::provider::RoundsProvider;
use crate::settings::LedgerSettings;

/// Env var naming the store directory
pub const DIR_ENV: &str = "ROUND_LEDGER_DIR";
pub const DEFAULT_DIR: &str = ".round-ledger";

pub const USAGE: &str = "\
usage: round-ledger <command>

commands:
  show                                     print every round, oldest first
  add <match-id>...                        append a round
  remove <idx>                             remove a round
  replace <idx> <match-id>...              overwrite a round
  set <round-idx> <match-id> <A|B> <n|->   record games for one side
  clear                                    drop every round
  tie <favor-b|no-winner>                  choose how ties are resolved";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Add(Vec<String>),
    Remove(usize),
    Replace(usize, Vec<String>),
    SetGames {
        round_idx: usize,
        match_id: String,
        team: Team,
        games: Option<u32>,
    },
    Clear,
    Tie(TiePolicy),
}

fn usage(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

fn parse_index(s: &str) -> Result<usize, CliError> {
    s.parse()
        .map_err(|_| usage(format!("not a round index: {}", s)))
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| usage("missing command"))?;

        match (name.as_str(), rest) {
            ("show", []) => Ok(Command::Show),
            ("add", ids) if !ids.is_empty() => Ok(Command::Add(ids.to_vec())),
            ("remove", [idx]) => Ok(Command::Remove(parse_index(idx)?)),
            ("replace", [idx, ids @ ..]) if !ids.is_empty() => {
                Ok(Command::Replace(parse_index(idx)?, ids.to_vec()))
            }
            ("set", [round_idx, match_id, team, games]) => {
                let team = Team::from_str(team)
                    .ok_or_else(|| usage(format!("team must be A or B, got {}", team)))?;
                let games = match games.as_str() {
                    "-" => None,
                    n => Some(
                        n.parse()
                            .map_err(|_| usage(format!("not a game count: {}", n)))?,
                    ),
                };
                Ok(Command::SetGames {
                    round_idx: parse_index(round_idx)?,
                    match_id: match_id.clone(),
                    team,
                    games,
                })
            }
            ("clear", []) => Ok(Command::Clear),
            ("tie", [policy]) => TiePolicy::from_str(policy)
                .map(Command::Tie)
                .ok_or_else(|| usage(format!("unknown tie policy: {}", policy))),
            (other, _) => Err(usage(format!("bad arguments for `{}`", other))),
        }
    }
}

/// Human-readable listing of the rounds
pub fn render(ledger: &RoundLedger) -> String {
    if ledger.is_empty() {
        return "no rounds".to_string();
    }
    let mut out = String::new();
    for (idx, round) in ledger.rounds().iter().enumerate() {
        let _ = writeln!(out, "round {}", idx);
        for m in &round.matches {
            let _ = writeln!(out, "  {}", m);
        }
    }
    out
}

/// Execute one command against the store, returning what to print
pub fn run(command: Command, mut store: FileStore) -> Result<String, CliError> {
    let mut settings = LedgerSettings::load(&store);
    if let Command::Tie(policy) = command {
        settings.tie_policy = policy;
        settings.save(&mut store)?;
    }

    RoundsProvider::with_session(store, &settings, |provider| -> Result<String, CliError> {
        let ledger = provider.use_rounds_mut()?;
        match command {
            Command::Show => {}
            Command::Add(ids) => ledger.add_round(Round::from_ids(ids))?,
            Command::Remove(idx) => ledger.remove_round(idx)?,
            Command::Replace(idx, ids) => ledger.replace_round(idx, Round::from_ids(ids))?,
            Command::SetGames {
                round_idx,
                match_id,
                team,
                games,
            } => ledger.set_games(round_idx, &match_id, team, games)?,
            Command::Clear => ledger.clear()?,
            // mounting already re-derived and wrote back winners under the new policy
            Command::Tie(_) => {
                return Ok(format!("tie policy set to {}", ledger.tie_policy().as_str()));
            }
        }
        Ok(render(ledger))
    })?
}
