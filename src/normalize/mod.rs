//! Conversion of heterogeneous source payloads into the canonical
//! ranking, match/game, and deck submission records.

pub mod battlefy;
pub mod bcp;
pub mod bcp_txt;
pub mod rk9;
pub mod rows;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::domain::{DeckSubmission, GameRecord, MatchRecord, RankingRecord};
use crate::errors::{RecordError, parse_context};
use crate::records::RecordDir;
use rows::{CanonicalDeckRow, GameRow, MatchRow, RankingRow, SubmissionRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Bcp,
    Battlefy,
    Rk9,
    BcpTxt,
}

/// Rankings and matches of one tournament in canonical form
#[derive(Debug, Default)]
pub struct NormalizedEvent {
    pub rankings: Vec<RankingRecord>,
    pub matches: Vec<MatchRecord>,
}

pub fn normalize_platform(platform: Platform, input: &Path) -> Result<NormalizedEvent> {
    match platform {
        Platform::Bcp => bcp::normalize_dir(input),
        Platform::Battlefy => battlefy::normalize_dir(input),
        Platform::Rk9 => rk9::normalize_file(input),
        Platform::BcpTxt => bcp_txt::normalize_dir(input),
    }
}

/// Validate raw rows into typed records, naming the first bad line
pub fn convert_rows<R, T>(rows: Vec<R>, data_type: &str) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = RecordError>,
{
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| T::try_from(row).with_context(|| parse_context(data_type, idx + 2)))
        .collect()
}

/// Ranks key every later lookup, so a repeated rank fails the whole file
pub fn load_rankings(dir: &RecordDir, name: &str) -> Result<Vec<RankingRecord>> {
    let rows: Vec<RankingRow> = dir.load(name)?;
    let rankings: Vec<RankingRecord> = convert_rows(rows, name)?;

    let mut seen = HashSet::new();
    for (idx, ranking) in rankings.iter().enumerate() {
        if !seen.insert(ranking.rank) {
            return Err(RecordError::duplicate("ranking", ranking.rank.to_string()))
                .with_context(|| parse_context(name, idx + 2));
        }
    }
    Ok(rankings)
}

pub fn load_matches(dir: &RecordDir, name: &str) -> Result<Vec<MatchRecord>> {
    let rows: Vec<MatchRow> = dir.load(name)?;
    convert_rows(rows, name)
}

pub fn load_games(dir: &RecordDir, name: &str) -> Result<Option<Vec<GameRecord>>> {
    match dir.load_opt::<GameRow>(name)? {
        Some(rows) => convert_rows(rows, name).map(Some),
        None => Ok(None),
    }
}

pub fn load_submissions(dir: &RecordDir, name: &str) -> Result<Vec<DeckSubmission>> {
    let rows: Vec<SubmissionRow> = dir.load(name)?;
    convert_rows(rows, name)
}

/// Submitted deck label (lower-cased) to canonical archetype name
pub fn load_canonical_decks(dir: &RecordDir, name: &str) -> Result<Option<HashMap<String, String>>> {
    let Some(rows) = dir.load_opt::<CanonicalDeckRow>(name)? else {
        return Ok(None);
    };

    let canon = rows
        .into_iter()
        .filter(|row| !row.submitted.trim().is_empty() && !row.canonical.trim().is_empty())
        .map(|row| (row.submitted.trim().to_lowercase(), row.canonical.trim().to_string()))
        .collect();
    Ok(Some(canon))
}

/// Platform ids arrive as strings or numbers
pub(crate) fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
