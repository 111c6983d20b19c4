use log::{info, warn};
use serde::Serialize;

use crate::decks::DeckMapper;
use crate::domain::{Rank, RankingRecord};
use crate::overrides::{IgnoreList, OverrideStore};

pub const DECK_RANKING_HEADER: [&str; 6] =
    ["ranking", "deck", "pairing name", "form name", "pid", "discord"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckRankingRow {
    pub ranking: Rank,
    pub deck: String,
    #[serde(rename = "pairing name")]
    pub pairing_name: String,
    #[serde(rename = "form name")]
    pub form_name: String,
    pub pid: String,
    pub discord: String,
}

#[derive(Debug, Default)]
pub struct DeckRankings {
    pub rows: Vec<DeckRankingRow>,
    pub resolved: usize,
    pub broken: usize,
}

/// One row per archetype label of every resolved, unignored ranking
pub fn deck_rankings(
    rankings: &[RankingRecord],
    decks: &DeckMapper,
    store: &OverrideStore,
    ignored: &IgnoreList,
) -> DeckRankings {
    let mut ordered: Vec<&RankingRecord> = rankings.iter().collect();
    ordered.sort_by_key(|r| r.rank);

    let mut result = DeckRankings::default();
    for ranking in ordered {
        let record_name = ranking.record_name();
        if ignored.is_ignored(ranking.rank, &record_name) {
            continue;
        }

        let deck = decks.resolve_archetypes(store, ranking.rank);
        if deck.is_broken() {
            warn!("Broken ranking: {} (rank {})", record_name, ranking.rank);
            result.broken += 1;
            continue;
        }

        result.resolved += 1;
        for label in &deck.labels {
            result.rows.push(DeckRankingRow {
                ranking: ranking.rank,
                deck: label.clone(),
                pairing_name: record_name.clone(),
                form_name: deck.submitted_name.clone().unwrap_or_default(),
                pid: ranking.platform_id.clone().unwrap_or_default(),
                discord: ranking.external_handle.clone().unwrap_or_default(),
            });
        }
    }

    info!(
        "  → {} rankings with decks, {} broken",
        result.resolved, result.broken
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeckSubmission, IgnoredName, NameMapping};

    #[test]
    fn test_rows_per_label_and_broken_count() {
        let rankings = vec![
            RankingRecord::new(2, "Bob Lee").unwrap(),
            RankingRecord::new(1, "Jane Doe")
                .unwrap()
                .with_platform_id(Some("p1"))
                .with_handle(Some("jd#1")),
            RankingRecord::new(3, "Cal Orr").unwrap(),
            RankingRecord::new(4, "Test Entry").unwrap(),
        ];
        let submissions = vec![
            DeckSubmission::new(
                "Jane D",
                vec!["Control".to_string()],
                vec!["Budget".to_string()],
            )
            .unwrap(),
        ];
        let ignored = IgnoreList::new(vec![IgnoredName {
            rank: Some(4),
            record_name: String::new(),
            reason: None,
        }]);
        let decks = DeckMapper::build(&submissions, None, &ignored).unwrap();
        let store = OverrideStore::from_mappings(vec![
            NameMapping::resolved(1, "jane doe", "jane d"),
            NameMapping {
                explicit_archetype: Some("Aggro".to_string()),
                ..NameMapping::rejected(2, "bob lee")
            },
            NameMapping::rejected(3, "cal orr"),
        ]);

        let result = deck_rankings(&rankings, &decks, &store, &ignored);

        assert_eq!(result.resolved, 2);
        assert_eq!(result.broken, 1);
        let summary: Vec<(Rank, &str, &str)> = result
            .rows
            .iter()
            .map(|r| (r.ranking, r.deck.as_str(), r.form_name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "Control", "jane d"),
                (1, "Budget", "jane d"),
                (2, "Aggro", ""),
            ]
        );
        assert_eq!(result.rows[0].pid, "p1");
        assert_eq!(result.rows[0].discord, "jd#1");
        assert_eq!(result.rows[0].pairing_name, "jane doe");
    }
}
