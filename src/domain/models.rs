use serde::{Deserialize, Serialize};

use super::names::{non_blank, normalize_name};
use crate::errors::RecordError;

/// 1-based standing position assigned by the tournament platform
pub type Rank = u32;

/// One entry of a tournament's final standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub rank: Rank,
    pub display_name: String,
    pub platform_id: Option<String>,
    pub external_handle: Option<String>,
}

impl RankingRecord {
    pub fn new(rank: Rank, display_name: &str) -> Result<Self, RecordError> {
        if rank == 0 {
            return Err(RecordError::invalid("rank", "0"));
        }
        let display_name = non_blank(display_name).ok_or(RecordError::missing("name"))?;

        Ok(Self {
            rank,
            display_name,
            platform_id: None,
            external_handle: None,
        })
    }

    pub fn with_platform_id(mut self, platform_id: Option<&str>) -> Self {
        self.platform_id = platform_id.and_then(non_blank);
        self
    }

    pub fn with_handle(mut self, handle: Option<&str>) -> Self {
        self.external_handle = handle.and_then(non_blank);
        self
    }

    pub fn record_name(&self) -> String {
        normalize_name(&self.display_name)
    }
}

/// One side of a pairing as the source reported it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub platform_id: Option<String>,
    pub handle: Option<String>,
}

impl Participant {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            platform_id: None,
            handle: None,
        }
    }

    pub fn with_platform_id(mut self, platform_id: Option<&str>) -> Self {
        self.platform_id = platform_id.and_then(non_blank);
        self
    }

    pub fn with_handle(mut self, handle: Option<&str>) -> Self {
        self.handle = handle.and_then(non_blank);
        self
    }

    pub fn record_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// Match result; `loser` is empty for a bye
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub round: u32,
    pub table: String,
    pub winner: Participant,
    pub loser: Participant,
    pub winner_wins: Option<u32>,
    pub loser_wins: Option<u32>,
}

impl MatchRecord {
    pub fn new(
        round: u32,
        table: &str,
        winner: Participant,
        loser: Participant,
    ) -> Result<Self, RecordError> {
        let table = validate_slot(round, table)?;
        if winner.is_empty() {
            return Err(RecordError::missing("winner"));
        }

        Ok(Self {
            round,
            table,
            winner,
            loser,
            winner_wins: None,
            loser_wins: None,
        })
    }

    pub fn with_score(mut self, winner_wins: Option<u32>, loser_wins: Option<u32>) -> Self {
        self.winner_wins = winner_wins;
        self.loser_wins = loser_wins;
        self
    }
}

/// A single game won by `winner`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub round: u32,
    pub table: String,
    pub winner: Participant,
    pub loser: Participant,
}

impl GameRecord {
    pub fn new(
        round: u32,
        table: &str,
        winner: Participant,
        loser: Participant,
    ) -> Result<Self, RecordError> {
        let table = validate_slot(round, table)?;
        if winner.is_empty() {
            return Err(RecordError::missing("winner"));
        }

        Ok(Self {
            round,
            table,
            winner,
            loser,
        })
    }
}

fn validate_slot(round: u32, table: &str) -> Result<String, RecordError> {
    if round == 0 {
        return Err(RecordError::invalid("round", "0"));
    }
    non_blank(table).ok_or(RecordError::missing("table"))
}

/// Common view over match-level and game-level records
pub trait Pairing {
    fn round(&self) -> u32;
    fn table(&self) -> &str;
    fn winner(&self) -> &Participant;
    fn loser(&self) -> &Participant;

    fn is_bye(&self) -> bool {
        self.loser().is_empty()
    }
}

impl Pairing for MatchRecord {
    fn round(&self) -> u32 {
        self.round
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn winner(&self) -> &Participant {
        &self.winner
    }

    fn loser(&self) -> &Participant {
        &self.loser
    }
}

impl Pairing for GameRecord {
    fn round(&self) -> u32 {
        self.round
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn winner(&self) -> &Participant {
        &self.winner
    }

    fn loser(&self) -> &Participant {
        &self.loser
    }
}

/// What a player entered on the deck registration form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSubmission {
    pub submitted_name: String,
    pub archetype_labels: Vec<String>,
    pub tag_labels: Vec<String>,
}

impl DeckSubmission {
    pub fn new(
        submitted_name: &str,
        archetype_labels: Vec<String>,
        tag_labels: Vec<String>,
    ) -> Result<Self, RecordError> {
        let submitted_name = non_blank(submitted_name).ok_or(RecordError::missing("player name"))?;

        Ok(Self {
            submitted_name,
            archetype_labels,
            tag_labels,
        })
    }

    pub fn submitter_key(&self) -> String {
        normalize_name(&self.submitted_name)
    }
}

/// Persisted link from a ranking to a submission (or to nothing)
///
/// Both `submitted_name` and `explicit_archetype` empty means an operator
/// confirmed there is no submission for this ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMapping {
    pub rank: Rank,
    pub record_name: String,
    #[serde(default)]
    pub submitted_name: Option<String>,
    #[serde(default)]
    pub explicit_archetype: Option<String>,
}

impl NameMapping {
    pub fn resolved(rank: Rank, record_name: &str, submitted_name: &str) -> Self {
        Self {
            rank,
            record_name: record_name.to_string(),
            submitted_name: non_blank(submitted_name),
            explicit_archetype: None,
        }
    }

    pub fn rejected(rank: Rank, record_name: &str) -> Self {
        Self {
            rank,
            record_name: record_name.to_string(),
            submitted_name: None,
            explicit_archetype: None,
        }
    }

    pub fn submitted_name(&self) -> Option<&str> {
        self.submitted_name.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn explicit_archetype(&self) -> Option<&str> {
        self.explicit_archetype
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_resolved(&self) -> bool {
        self.submitted_name().is_some() || self.explicit_archetype().is_some()
    }

    pub fn is_rejection(&self) -> bool {
        !self.is_resolved()
    }
}

/// A name excluded from matching and statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredName {
    #[serde(default)]
    pub rank: Option<Rank>,
    pub record_name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_rejects_zero_rank_and_blank_name() {
        assert_eq!(
            RankingRecord::new(0, "jane"),
            Err(RecordError::invalid("rank", "0"))
        );
        assert_eq!(
            RankingRecord::new(1, "  "),
            Err(RecordError::missing("name"))
        );
    }

    #[test]
    fn test_match_allows_bye_but_not_missing_winner() {
        let bye = MatchRecord::new(1, "4", Participant::named("Jane"), Participant::default()).unwrap();
        assert!(bye.is_bye());

        let missing = MatchRecord::new(1, "4", Participant::default(), Participant::named("Jane"));
        assert_eq!(missing, Err(RecordError::missing("winner")));

        let no_table = MatchRecord::new(1, " ", Participant::named("A"), Participant::named("B"));
        assert_eq!(no_table, Err(RecordError::missing("table")));
    }

    #[test]
    fn test_mapping_resolution_states() {
        assert!(NameMapping::resolved(3, "jane doe", "jane d").is_resolved());
        assert!(NameMapping::rejected(3, "jane doe").is_rejection());

        let blank = NameMapping {
            rank: 3,
            record_name: "jane doe".to_string(),
            submitted_name: Some("  ".to_string()),
            explicit_archetype: Some(String::new()),
        };
        assert!(blank.is_rejection());

        let explicit = NameMapping {
            explicit_archetype: Some("Control".to_string()),
            ..NameMapping::rejected(3, "jane doe")
        };
        assert!(explicit.is_resolved());
    }
}
