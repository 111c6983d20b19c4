use std::collections::HashMap;

use crate::domain::{Participant, Rank, RankingRecord};

/// Looks up a pairing participant's rank by platform id, then handle,
/// then normalized name.
#[derive(Debug, Default)]
pub struct RankIndex {
    by_pid: HashMap<String, Rank>,
    by_handle: HashMap<String, Rank>,
    by_name: HashMap<String, Rank>,
    num_players: u32,
}

impl RankIndex {
    pub fn new(rankings: &[RankingRecord]) -> Self {
        let mut index = Self {
            num_players: rankings.len() as u32,
            ..Self::default()
        };

        for ranking in rankings {
            if let Some(pid) = &ranking.platform_id {
                index.by_pid.entry(pid.clone()).or_insert(ranking.rank);
            }
            if let Some(handle) = &ranking.external_handle {
                index
                    .by_handle
                    .entry(handle.trim().to_lowercase())
                    .or_insert(ranking.rank);
            }
            index.by_name.entry(ranking.record_name()).or_insert(ranking.rank);
        }

        index
    }

    pub fn num_players(&self) -> u32 {
        self.num_players
    }

    /// Rank given to anyone missing from the standings
    pub fn unranked(&self) -> Rank {
        self.num_players + 1
    }

    pub fn lookup(&self, participant: &Participant) -> Option<Rank> {
        participant
            .platform_id
            .as_ref()
            .and_then(|pid| self.by_pid.get(pid))
            .or_else(|| {
                participant
                    .handle
                    .as_ref()
                    .and_then(|h| self.by_handle.get(&h.trim().to_lowercase()))
            })
            .or_else(|| self.by_name.get(&participant.record_name()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> RankIndex {
        RankIndex::new(&[
            RankingRecord::new(1, "Jane Doe").unwrap().with_platform_id(Some("p1")),
            RankingRecord::new(2, "Bob Lee").unwrap().with_handle(Some("BobL")),
            RankingRecord::new(3, "Cal Orr").unwrap(),
        ])
    }

    #[test]
    fn test_lookup_priority() {
        let index = index();

        // pid wins over a conflicting name
        let by_pid = Participant::named("Cal Orr").with_platform_id(Some("p1"));
        assert_eq!(index.lookup(&by_pid), Some(1));

        let by_handle = Participant::named("Robert").with_handle(Some("bobl"));
        assert_eq!(index.lookup(&by_handle), Some(2));

        let by_name = Participant::named("  cal   ORR").with_platform_id(Some("unknown"));
        assert_eq!(index.lookup(&by_name), Some(3));
    }

    #[test]
    fn test_unknown_participant_gets_sentinel() {
        let index = index();
        assert_eq!(index.lookup(&Participant::named("Walk In")), None);
        assert_eq!(index.unranked(), 4);
    }
}
