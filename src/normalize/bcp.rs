use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use super::{NormalizedEvent, value_to_id, value_to_int};
use crate::domain::{MatchRecord, Participant, RankingRecord};
use crate::errors::read_context;

pub const PLAYERS_FILE: &str = "players.json";
pub const PAIRINGS_FILE: &str = "pairings.json";

/// BCP list endpoints return either a bare array or `{ "data": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Wrapped { data } => data,
            Listing::Bare(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BcpPlayer {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub placing: Option<u32>,
    #[serde(default)]
    pub id: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BcpPairing {
    #[serde(default)]
    pub table: Option<Value>,
    pub round: u32,
    #[serde(default)]
    pub player1_id: Option<Value>,
    #[serde(default)]
    pub player2_id: Option<Value>,
    #[serde(default)]
    pub meta_data: Option<BcpMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct BcpMetadata {
    #[serde(rename = "p1-firstName", default)]
    pub p1_first_name: String,
    #[serde(rename = "p1-lastName", default)]
    pub p1_last_name: String,
    #[serde(rename = "p2-firstName", default)]
    pub p2_first_name: String,
    #[serde(rename = "p2-lastName", default)]
    pub p2_last_name: String,
    #[serde(rename = "p1-marginOfVictory", default)]
    pub p1_margin_of_victory: Value,
    #[serde(rename = "p1-gamePoints", default)]
    pub p1_game_points: Value,
    #[serde(rename = "p2-gamePoints", default)]
    pub p2_game_points: Value,
}

pub fn normalize_dir(input: &Path) -> Result<NormalizedEvent> {
    let players: Vec<BcpPlayer> = read_listing(&input.join(PLAYERS_FILE))?;
    let pairings: Vec<BcpPairing> = read_listing(&input.join(PAIRINGS_FILE))?;

    Ok(NormalizedEvent {
        rankings: rankings_from_players(players),
        matches: matches_from_pairings(pairings),
    })
}

fn read_listing<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        warn!("No BCP payload at {}", path.display());
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path).with_context(|| read_context(path))?;
    let listing: Listing<T> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse BCP payload {}", path.display()))?;
    Ok(listing.into_vec())
}

pub fn rankings_from_players(players: Vec<BcpPlayer>) -> Vec<RankingRecord> {
    let mut rankings: Vec<RankingRecord> = players
        .into_iter()
        .filter_map(|player| {
            let name = format!("{} {}", player.first_name, player.last_name);
            let placing = player.placing?;
            let pid = player.id.as_ref().and_then(value_to_id);
            RankingRecord::new(placing, &name)
                .map(|r| r.with_platform_id(pid.as_deref()))
                .ok()
        })
        .collect();

    rankings.sort_by_key(|r| r.rank);
    info!("  → {} BCP rankings", rankings.len());
    rankings
}

pub fn matches_from_pairings(pairings: Vec<BcpPairing>) -> Vec<MatchRecord> {
    let mut matches: Vec<MatchRecord> = pairings
        .into_iter()
        .filter_map(match_from_pairing)
        .collect();

    matches.sort_by(|a, b| {
        (a.round, table_order(&a.table)).cmp(&(b.round, table_order(&b.table)))
    });
    info!("  → {} BCP matches", matches.len());
    matches
}

fn table_order(table: &str) -> (u64, String) {
    (table.parse().unwrap_or(u64::MAX), table.to_string())
}

fn match_from_pairing(pairing: BcpPairing) -> Option<MatchRecord> {
    let Some(meta) = pairing.meta_data else {
        warn!("No metadata for round {} pairing, skipping", pairing.round);
        return None;
    };
    let table = pairing.table.as_ref().and_then(value_to_id)?;

    let p1_name = format!("{} {}", meta.p1_first_name, meta.p1_last_name);
    let p2_name = format!("{} {}", meta.p2_first_name, meta.p2_last_name);
    let p1_pid = pairing.player1_id.as_ref().and_then(value_to_id);
    let p2_pid = pairing.player2_id.as_ref().and_then(value_to_id);
    let p1_points = value_to_int(&meta.p1_game_points).map(|p| p.max(0) as u32);
    let p2_points = value_to_int(&meta.p2_game_points).map(|p| p.max(0) as u32);

    let p1 = Participant::named(&p1_name).with_platform_id(p1_pid.as_deref());
    let p2 = Participant::named(&p2_name).with_platform_id(p2_pid.as_deref());

    let p1_won = value_to_int(&meta.p1_margin_of_victory).unwrap_or(0) > 0;
    let (winner, loser, winner_wins, loser_wins) = if p1_won {
        (p1, p2, p1_points, p2_points)
    } else {
        (p2, p1, p2_points, p1_points)
    };

    match MatchRecord::new(pairing.round, &table, winner, loser) {
        Ok(record) => Some(record.with_score(winner_wins, loser_wins)),
        Err(e) => {
            warn!("Invalid BCP pairing in round {}: {}", pairing.round, e);
            None
        }
    }
}
