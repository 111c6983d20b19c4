use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{NormalizedEvent, value_to_id, value_to_int};
use crate::domain::{MatchRecord, Participant, RankingRecord};
use crate::errors::read_context;

pub const STANDINGS_FILE: &str = "standings.json";

#[derive(Debug, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Standing {
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub disqualified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattlefyMatch {
    pub match_number: u32,
    pub round_number: u32,
    #[serde(default)]
    pub is_bye: bool,
    pub top: Side,
    pub bottom: Side,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Side {
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub winner: bool,
    #[serde(default)]
    pub score: Value,
    #[serde(rename = "teamID", default)]
    pub team_id: Option<Value>,
}

impl Side {
    fn name(&self) -> Option<&str> {
        self.team
            .as_ref()
            .map(|t| t.name.trim())
            .filter(|n| !n.is_empty())
    }

    fn participant(&self, name: &str) -> Participant {
        let pid = self.team_id.as_ref().and_then(value_to_id);
        Participant::named(name).with_platform_id(pid.as_deref())
    }

    fn wins(&self) -> Option<u32> {
        value_to_int(&self.score).map(|s| s.max(0) as u32)
    }
}

pub fn normalize_dir(input: &Path) -> Result<NormalizedEvent> {
    let standings = read_standings(&input.join(STANDINGS_FILE))?;
    let rounds = read_rounds(input)?;

    Ok(NormalizedEvent {
        rankings: rankings_from_standings(standings),
        matches: matches_from_rounds(rounds),
    })
}

fn read_standings(path: &Path) -> Result<Vec<Standing>> {
    if !path.exists() {
        warn!("No Battlefy standings at {}", path.display());
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path).with_context(|| read_context(path))?;
    serde_json::from_str(&json).context("Failed to parse Battlefy standings")
}

/// `round_<N>.json` files in ascending round order
fn read_rounds(input: &Path) -> Result<Vec<Vec<BattlefyMatch>>> {
    let round_file = Regex::new(r"^round_(\d+)\.json$").context("Failed to compile round regex")?;

    let mut files: Vec<(u32, std::path::PathBuf)> = Vec::new();
    for entry in fs::read_dir(input).with_context(|| read_context(input))? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(caps) = round_file.captures(file_name) {
            let round: u32 = caps[1].parse()?;
            files.push((round, path.clone()));
        }
    }
    files.sort();

    let mut rounds = Vec::new();
    for (round, path) in files {
        let json = fs::read_to_string(&path).with_context(|| read_context(&path))?;
        let matches: Vec<BattlefyMatch> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse Battlefy round {}", round))?;
        if matches.is_empty() {
            break;
        }
        rounds.push(matches);
    }
    Ok(rounds)
}

/// Standings are already ordered; disqualified players follow the last
/// regular finisher in listed order, each with a rank of their own.
pub fn rankings_from_standings(standings: Vec<Standing>) -> Vec<RankingRecord> {
    let (disqualified, ranked): (Vec<_>, Vec<_>) =
        standings.into_iter().partition(|s| s.disqualified);

    let ranked_count = ranked.len() as u32;
    let ranked = ranked
        .into_iter()
        .enumerate()
        .map(|(idx, standing)| (idx as u32 + 1, standing));
    let dnf = disqualified
        .into_iter()
        .enumerate()
        .map(|(idx, standing)| (ranked_count + idx as u32 + 1, standing));

    let rankings: Vec<RankingRecord> = ranked
        .chain(dnf)
        .filter_map(|(rank, standing)| {
            let name = standing.team.as_ref().map(|t| t.name.as_str()).unwrap_or("");
            let pid = standing.id.as_ref().and_then(value_to_id);
            RankingRecord::new(rank, name)
                .map(|r| r.with_platform_id(pid.as_deref()))
                .ok()
        })
        .collect();

    info!("  → {} Battlefy rankings", rankings.len());
    rankings
}

pub fn matches_from_rounds(rounds: Vec<Vec<BattlefyMatch>>) -> Vec<MatchRecord> {
    let mut matches = Vec::new();
    let mut prior_rounds_match_count = 0u32;

    for round in rounds {
        let round_len = round.len() as u32;
        matches.extend(
            round
                .into_iter()
                .filter_map(|m| match_from_battlefy(m, prior_rounds_match_count)),
        );
        prior_rounds_match_count += round_len;
    }

    info!("  → {} Battlefy matches", matches.len());
    matches
}

fn match_from_battlefy(data: BattlefyMatch, prior_rounds_match_count: u32) -> Option<MatchRecord> {
    if data.is_bye {
        return None;
    }
    let (Some(top_name), Some(bottom_name)) = (data.top.name(), data.bottom.name()) else {
        debug!("Missing player name in match {}", data.match_number);
        return None;
    };

    let (winner, loser, winner_name, loser_name) = if data.top.winner {
        (&data.top, &data.bottom, top_name, bottom_name)
    } else if data.bottom.winner {
        (&data.bottom, &data.top, bottom_name, top_name)
    } else {
        return None;
    };

    let table = data.match_number.saturating_sub(prior_rounds_match_count).to_string();
    MatchRecord::new(
        data.round_number,
        &table,
        winner.participant(winner_name),
        loser.participant(loser_name),
    )
    .map(|m| m.with_score(winner.wins(), loser.wins()))
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disqualified_players_ranked_last() {
        let json = r#"[
            {"team": {"name": "Ann"}, "_id": "a"},
            {"team": {"name": "Dan"}, "_id": "d", "disqualified": true},
            {"team": {"name": "Bob"}, "_id": "b"}
        ]"#;
        let standings: Vec<Standing> = serde_json::from_str(json).unwrap();

        let rankings = rankings_from_standings(standings);

        let ranks: Vec<(u32, &str)> = rankings
            .iter()
            .map(|r| (r.rank, r.display_name.as_str()))
            .collect();
        assert_eq!(ranks, vec![(1, "Ann"), (2, "Bob"), (3, "Dan")]);
    }

    #[test]
    fn test_each_disqualified_player_gets_a_distinct_rank() {
        let json = r#"[
            {"team": {"name": "Ann"}, "_id": "a"},
            {"team": {"name": "Dan"}, "_id": "d", "disqualified": true},
            {"team": {"name": "Eve"}, "_id": "e", "disqualified": true}
        ]"#;
        let standings: Vec<Standing> = serde_json::from_str(json).unwrap();

        let rankings = rankings_from_standings(standings);

        let ranks: Vec<(u32, &str)> = rankings
            .iter()
            .map(|r| (r.rank, r.display_name.as_str()))
            .collect();
        assert_eq!(ranks, vec![(1, "Ann"), (2, "Dan"), (3, "Eve")]);
    }

    #[test]
    fn test_tables_are_numbered_within_round() {
        let round_one = r#"[
            {"matchNumber": 1, "roundNumber": 1, "isBye": false,
             "top": {"team": {"name": "Ann"}, "winner": true, "score": 2, "teamID": "a"},
             "bottom": {"team": {"name": "Bob"}, "score": 0, "teamID": "b"}},
            {"matchNumber": 2, "roundNumber": 1, "isBye": true,
             "top": {"team": {"name": "Cal"}}, "bottom": {}}
        ]"#;
        let round_two = r#"[
            {"matchNumber": 3, "roundNumber": 2, "isBye": false,
             "top": {"team": {"name": "Ann"}, "score": 1},
             "bottom": {"team": {"name": "Cal"}, "winner": true, "score": 2}}
        ]"#;
        let rounds = vec![
            serde_json::from_str(round_one).unwrap(),
            serde_json::from_str(round_two).unwrap(),
        ];

        let matches = matches_from_rounds(rounds);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].table, "1");
        assert_eq!(matches[0].winner.platform_id.as_deref(), Some("a"));
        assert_eq!(matches[1].table, "1");
        assert_eq!(matches[1].winner.name, "Cal");
        assert_eq!(matches[1].winner_wins, Some(2));
        assert_eq!(matches[1].loser_wins, Some(1));
    }
}
