use serde::{Deserialize, Serialize};

use crate::domain::names::non_blank;
use crate::domain::{
    DeckSubmission, GameRecord, MatchRecord, Participant, RankingRecord, split_labels,
};
use crate::errors::RecordError;

pub const RANKING_HEADER: [&str; 4] = ["ranking", "name", "player_id", "discord"];

pub const MATCH_HEADER: [&str; 10] = [
    "round",
    "table",
    "winner",
    "loser",
    "winner_wins",
    "loser_wins",
    "winner_pid",
    "loser_pid",
    "winner_discord",
    "loser_discord",
];

pub const GAME_HEADER: [&str; 8] = [
    "round",
    "table",
    "winner",
    "loser",
    "winner_pid",
    "loser_pid",
    "winner_discord",
    "loser_discord",
];

/// Row of `rankings.csv`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingRow {
    pub ranking: String,
    pub name: String,
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub discord: String,
}

/// Row of `matches.csv`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRow {
    pub round: String,
    pub table: String,
    pub winner: String,
    #[serde(default)]
    pub loser: String,
    #[serde(default)]
    pub winner_wins: String,
    #[serde(default)]
    pub loser_wins: String,
    #[serde(default)]
    pub winner_pid: String,
    #[serde(default)]
    pub loser_pid: String,
    #[serde(default)]
    pub winner_discord: String,
    #[serde(default)]
    pub loser_discord: String,
}

/// Row of `games.csv`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRow {
    pub round: String,
    pub table: String,
    pub winner: String,
    #[serde(default)]
    pub loser: String,
    #[serde(default)]
    pub winner_pid: String,
    #[serde(default)]
    pub loser_pid: String,
    #[serde(default)]
    pub winner_discord: String,
    #[serde(default)]
    pub loser_discord: String,
}

/// Row of the deck registration form export
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionRow {
    #[serde(rename = "Player Name")]
    pub player_name: String,
    #[serde(rename = "Deck Type", default)]
    pub deck_type: String,
    #[serde(rename = "Tags", default)]
    pub tags: String,
}

/// Row of `normalized_decks.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalDeckRow {
    #[serde(rename = "Submitted Deck Type")]
    pub submitted: String,
    #[serde(rename = "Canonical Deck Type")]
    pub canonical: String,
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, RecordError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| RecordError::invalid(field, value))
}

fn parse_optional_number(field: &'static str, value: &str) -> Result<Option<u32>, RecordError> {
    match non_blank(value) {
        Some(v) => parse_number(field, &v).map(Some),
        None => Ok(None),
    }
}

fn participant(name: &str, pid: &str, discord: &str) -> Participant {
    Participant::named(name)
        .with_platform_id(Some(pid))
        .with_handle(Some(discord))
}

impl TryFrom<RankingRow> for RankingRecord {
    type Error = RecordError;

    fn try_from(row: RankingRow) -> Result<Self, Self::Error> {
        let rank = parse_number("ranking", &row.ranking)?;
        Ok(RankingRecord::new(rank, &row.name)?
            .with_platform_id(Some(&row.player_id))
            .with_handle(Some(&row.discord)))
    }
}

impl From<&RankingRecord> for RankingRow {
    fn from(record: &RankingRecord) -> Self {
        Self {
            ranking: record.rank.to_string(),
            name: record.display_name.clone(),
            player_id: record.platform_id.clone().unwrap_or_default(),
            discord: record.external_handle.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<MatchRow> for MatchRecord {
    type Error = RecordError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let round = parse_number("round", &row.round)?;
        let winner_wins = parse_optional_number("winner_wins", &row.winner_wins)?;
        let loser_wins = parse_optional_number("loser_wins", &row.loser_wins)?;

        Ok(MatchRecord::new(
            round,
            &row.table,
            participant(&row.winner, &row.winner_pid, &row.winner_discord),
            participant(&row.loser, &row.loser_pid, &row.loser_discord),
        )?
        .with_score(winner_wins, loser_wins))
    }
}

impl From<&MatchRecord> for MatchRow {
    fn from(record: &MatchRecord) -> Self {
        Self {
            round: record.round.to_string(),
            table: record.table.clone(),
            winner: record.winner.name.clone(),
            loser: record.loser.name.clone(),
            winner_wins: record.winner_wins.map(|w| w.to_string()).unwrap_or_default(),
            loser_wins: record.loser_wins.map(|w| w.to_string()).unwrap_or_default(),
            winner_pid: record.winner.platform_id.clone().unwrap_or_default(),
            loser_pid: record.loser.platform_id.clone().unwrap_or_default(),
            winner_discord: record.winner.handle.clone().unwrap_or_default(),
            loser_discord: record.loser.handle.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<GameRow> for GameRecord {
    type Error = RecordError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let round = parse_number("round", &row.round)?;
        GameRecord::new(
            round,
            &row.table,
            participant(&row.winner, &row.winner_pid, &row.winner_discord),
            participant(&row.loser, &row.loser_pid, &row.loser_discord),
        )
    }
}

impl From<&GameRecord> for GameRow {
    fn from(record: &GameRecord) -> Self {
        Self {
            round: record.round.to_string(),
            table: record.table.clone(),
            winner: record.winner.name.clone(),
            loser: record.loser.name.clone(),
            winner_pid: record.winner.platform_id.clone().unwrap_or_default(),
            loser_pid: record.loser.platform_id.clone().unwrap_or_default(),
            winner_discord: record.winner.handle.clone().unwrap_or_default(),
            loser_discord: record.loser.handle.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<SubmissionRow> for DeckSubmission {
    type Error = RecordError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        DeckSubmission::new(
            &row.player_name,
            split_labels(&row.deck_type),
            split_labels(&row.tags),
        )
    }
}
