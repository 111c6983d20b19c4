use log::{debug, info, warn};
use serde::{Serialize, Serializer};

use super::ranks::RankIndex;
use super::summary::RecordSummary;
use crate::decks::DeckMapper;
use crate::domain::{Pairing, Rank};
use crate::overrides::{IgnoreList, OverrideStore};

pub const DECK_RECORD_HEADER: [&str; 9] = [
    "round",
    "table",
    "winner",
    "loser",
    "winner_deck",
    "loser_deck",
    "core_record",
    "winner_ranking",
    "loser_ranking",
];

/// One (winner archetype, loser archetype) pair of a classified record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckRecordRow {
    pub round: u32,
    pub table: String,
    pub winner: String,
    pub loser: String,
    pub winner_deck: String,
    pub loser_deck: String,
    #[serde(serialize_with = "yes_or_blank")]
    pub core_record: bool,
    pub winner_ranking: Rank,
    pub loser_ranking: Rank,
}

fn yes_or_blank<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "y" } else { "" })
}

#[derive(Debug, Default)]
pub struct Classified {
    pub rows: Vec<DeckRecordRow>,
    pub summary: RecordSummary,
}

/// Turns pairings into archetype match-up rows using resolved identities
pub struct Classifier<'a> {
    ranks: &'a RankIndex,
    decks: &'a DeckMapper,
    store: &'a OverrideStore,
    ignored: &'a IgnoreList,
    breakpoints: &'a [u32],
}

impl<'a> Classifier<'a> {
    pub fn new(
        ranks: &'a RankIndex,
        decks: &'a DeckMapper,
        store: &'a OverrideStore,
        ignored: &'a IgnoreList,
        breakpoints: &'a [u32],
    ) -> Self {
        Self {
            ranks,
            decks,
            store,
            ignored,
            breakpoints,
        }
    }

    pub fn classify<P: Pairing>(&self, kind: &str, records: &[P]) -> Classified {
        let mut classified = Classified {
            rows: Vec::new(),
            summary: RecordSummary::new(kind, self.breakpoints),
        };

        for record in records {
            classified.summary.total += 1;
            self.classify_one(record, &mut classified);
        }

        info!(
            "  → {}: {} records → {} rows",
            kind,
            classified.summary.total,
            classified.rows.len()
        );
        classified
    }

    fn classify_one<P: Pairing>(&self, record: &P, out: &mut Classified) {
        let summary = &mut out.summary;

        if record.is_bye() {
            debug!("Bye in round {} for {}", record.round(), record.winner().name);
            summary.byes += 1;
            return;
        }

        let winner_name = record.winner().record_name();
        let loser_name = record.loser().record_name();
        if self.ignored.contains_name(&winner_name) || self.ignored.contains_name(&loser_name) {
            debug!("Ignored record: {} vs {}", winner_name, loser_name);
            summary.ignored += 1;
            return;
        }

        let winner_rank = self.ranks.lookup(record.winner());
        let loser_rank = self.ranks.lookup(record.loser());

        let winner_decks = self.archetypes(winner_rank);
        let loser_decks = self.archetypes(loser_rank);
        let winner_rank = winner_rank.unwrap_or_else(|| self.ranks.unranked());
        let loser_rank = loser_rank.unwrap_or_else(|| self.ranks.unranked());
        if winner_decks.is_empty() || loser_decks.is_empty() {
            warn!(
                "Broken record: round {} table {} ({} vs {})",
                record.round(),
                record.table(),
                winner_name,
                loser_name
            );
            summary.broken += 1;
            return;
        }

        for bp in self.top_breakpoints(winner_rank, loser_rank) {
            *summary.top.entry(bp).or_insert(0) += 1;
        }

        for (w_idx, winner_deck) in winner_decks.iter().enumerate() {
            for (l_idx, loser_deck) in loser_decks.iter().enumerate() {
                let core_record = w_idx == 0 && l_idx == 0;
                if core_record {
                    summary.core += 1;
                } else {
                    summary.extra += 1;
                }

                out.rows.push(DeckRecordRow {
                    round: record.round(),
                    table: record.table().to_string(),
                    winner: winner_name.clone(),
                    loser: loser_name.clone(),
                    winner_deck: winner_deck.clone(),
                    loser_deck: loser_deck.clone(),
                    core_record,
                    winner_ranking: winner_rank,
                    loser_ranking: loser_rank,
                });
            }
        }
    }

    /// Unranked players have no override entry and so no archetypes
    fn archetypes(&self, rank: Option<Rank>) -> Vec<String> {
        rank.map(|rank| self.decks.resolve_archetypes(self.store, rank).labels)
            .unwrap_or_default()
    }

    /// Breakpoints at which both ranks sit inside the top `bp` percent
    pub fn top_breakpoints(&self, winner_rank: Rank, loser_rank: Rank) -> Vec<u32> {
        let field = self.ranks.num_players();
        let within = |rank: Rank, bp: u32| u64::from(rank) * 100 <= u64::from(bp) * u64::from(field);

        self.breakpoints
            .iter()
            .copied()
            .filter(|bp| within(winner_rank, *bp) && within(loser_rank, *bp))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DeckSubmission, GameRecord, IgnoredName, MatchRecord, NameMapping, Participant,
        RankingRecord,
    };

    struct Fixture {
        ranks: RankIndex,
        decks: DeckMapper,
        store: OverrideStore,
        ignored: IgnoreList,
        breakpoints: Vec<u32>,
    }

    impl Fixture {
        fn new(players: &[(&str, &[&str])]) -> Self {
            let rankings: Vec<RankingRecord> = players
                .iter()
                .enumerate()
                .map(|(idx, (name, _))| RankingRecord::new(idx as Rank + 1, name).unwrap())
                .collect();
            let submissions: Vec<DeckSubmission> = players
                .iter()
                .filter(|(_, decks)| !decks.is_empty())
                .map(|(name, decks)| {
                    let mut labels = decks.iter().map(|d| d.to_string());
                    let primary = labels.next().into_iter().collect();
                    DeckSubmission::new(name, primary, labels.collect()).unwrap()
                })
                .collect();
            let store = OverrideStore::from_mappings(rankings.iter().map(|r| {
                NameMapping::resolved(r.rank, &r.record_name(), &r.record_name())
            }));
            let ignored = IgnoreList::default();

            Self {
                ranks: RankIndex::new(&rankings),
                decks: DeckMapper::build(&submissions, None, &ignored).unwrap(),
                store,
                ignored,
                breakpoints: vec![10, 20, 30, 40, 50],
            }
        }

        fn classifier(&self) -> Classifier<'_> {
            Classifier::new(
                &self.ranks,
                &self.decks,
                &self.store,
                &self.ignored,
                &self.breakpoints,
            )
        }
    }

    fn played(round: u32, table: &str, winner: &str, loser: &str) -> MatchRecord {
        MatchRecord::new(
            round,
            table,
            Participant::named(winner),
            Participant::named(loser),
        )
        .unwrap()
    }

    #[test]
    fn test_primary_pair_is_core_and_others_extra() {
        let fixture = Fixture::new(&[("Ann", &["A", "A2"][..]), ("Bob", &["B"][..])]);

        let result = fixture
            .classifier()
            .classify("matches", &[played(1, "1", "Ann", "Bob")]);

        let pairs: Vec<(&str, &str, bool)> = result
            .rows
            .iter()
            .map(|r| (r.winner_deck.as_str(), r.loser_deck.as_str(), r.core_record))
            .collect();
        assert_eq!(pairs, vec![("A", "B", true), ("A2", "B", false)]);
        assert_eq!(result.summary.core, 1);
        assert_eq!(result.summary.extra, 1);
        assert_eq!(result.rows[0].winner_ranking, 1);
        assert_eq!(result.rows[0].loser_ranking, 2);
    }

    #[test]
    fn test_bye_produces_no_rows() {
        let fixture = Fixture::new(&[("jane doe", &["Control"][..])]);
        let bye = MatchRecord::new(1, "1", Participant::named("jane doe"), Participant::default())
            .unwrap();

        let result = fixture.classifier().classify("matches", &[bye]);

        assert!(result.rows.is_empty());
        assert_eq!(result.summary.byes, 1);
        assert_eq!(result.summary.broken, 0);
        assert_eq!(result.summary.ignored, 0);
        assert_eq!(result.summary.core + result.summary.extra, 0);
    }

    #[test]
    fn test_missing_archetype_or_unranked_player_is_broken() {
        let fixture = Fixture::new(&[("Ann", &["A"][..]), ("Bob", &[][..])]);

        let result = fixture.classifier().classify(
            "games",
            &[
                GameRecord::new(1, "1", Participant::named("Ann"), Participant::named("Bob"))
                    .unwrap(),
                GameRecord::new(1, "2", Participant::named("Ann"), Participant::named("Zed"))
                    .unwrap(),
            ],
        );

        assert!(result.rows.is_empty());
        assert_eq!(result.summary.broken, 2);
        assert_eq!(result.summary.total, 2);
    }

    #[test]
    fn test_ignored_participant_is_counted_not_emitted() {
        let mut fixture = Fixture::new(&[("Ann", &["A"][..]), ("Bob", &["B"][..])]);
        fixture.ignored = IgnoreList::new(vec![IgnoredName {
            rank: None,
            record_name: "bob".to_string(),
            reason: Some("test entry".to_string()),
        }]);

        let result = fixture
            .classifier()
            .classify("matches", &[played(1, "1", "Ann", "BOB")]);

        assert!(result.rows.is_empty());
        assert_eq!(result.summary.ignored, 1);
        assert_eq!(result.summary.broken, 0);
    }

    #[test]
    fn test_top_breakpoints_are_monotonic() {
        let names: Vec<String> = (1..=10).map(|i| format!("player {i}")).collect();
        let players: Vec<(&str, &[&str])> = names
            .iter()
            .map(|n| (n.as_str(), &["Deck"][..]))
            .collect();
        let fixture = Fixture::new(&players);
        let classifier = fixture.classifier();

        // rank 1 vs rank 1 sits in every bracket; rank 3 only from 30% on
        assert_eq!(classifier.top_breakpoints(1, 1), vec![10, 20, 30, 40, 50]);
        assert_eq!(classifier.top_breakpoints(1, 3), vec![30, 40, 50]);
        assert!(classifier.top_breakpoints(1, 6).is_empty());
        // unranked sentinel never qualifies
        assert!(classifier.top_breakpoints(1, 11).is_empty());

        let result = classifier.classify(
            "matches",
            &[
                played(1, "1", "player 1", "player 2"),
                played(1, "2", "player 3", "player 5"),
                played(1, "3", "player 4", "player 9"),
            ],
        );
        assert_eq!(result.summary.top[&10], 0);
        assert_eq!(result.summary.top[&20], 1);
        assert_eq!(result.summary.top[&50], 2);
        for window in result.summary.top.values().collect::<Vec<_>>().windows(2) {
            assert!(window[0] <= window[1]);
        }
    }

    #[test]
    fn test_core_record_column_renders_y_or_blank() {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(vec![]);
        writer
            .serialize(DeckRecordRow {
                round: 2,
                table: "7".to_string(),
                winner: "ann".to_string(),
                loser: "bob".to_string(),
                winner_deck: "A".to_string(),
                loser_deck: "B".to_string(),
                core_record: true,
                winner_ranking: 1,
                loser_ranking: 2,
            })
            .unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "2,7,ann,bob,A,B,y,1,2\n");
    }
}
