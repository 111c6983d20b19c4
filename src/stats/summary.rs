use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters for one pass over match-level or game-level records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub kind: String,
    pub total: usize,
    pub ignored: usize,
    pub byes: usize,
    pub broken: usize,
    pub core: usize,
    pub extra: usize,
    /// Breakpoint percent → records where both players finished inside it
    pub top: BTreeMap<u32, usize>,
}

impl RecordSummary {
    pub fn new(kind: &str, breakpoints: &[u32]) -> Self {
        Self {
            kind: kind.to_string(),
            top: breakpoints.iter().map(|bp| (*bp, 0)).collect(),
            ..Self::default()
        }
    }

    pub fn log(&self) {
        info!("  {}:", self.kind);
        info!("    → {} records", self.total);
        info!("    → {} ignored", self.ignored);
        info!("    → {} byes", self.byes);
        info!("    → {} broken", self.broken);
        info!("    → {} core / {} extra rows", self.core, self.extra);
        for (bp, count) in &self.top {
            info!("    → {} with both players in top {}%", count, bp);
        }
    }
}

/// Everything a `fill` run reports, logged and written to disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub matches: RecordSummary,
    pub games: RecordSummary,
    pub rankings: usize,
    pub resolved_rankings: usize,
    pub broken_rankings: usize,
    pub mismatched_players: usize,
    pub mismatched_decks: usize,
}

impl RunSummary {
    pub fn log(&self) {
        info!("=== Run Summary ===");
        info!(
            "  Rankings: {} total, {} resolved, {} broken, {} mismatched players",
            self.rankings, self.resolved_rankings, self.broken_rankings, self.mismatched_players
        );
        info!("  Mismatched decks: {}", self.mismatched_decks);
        self.matches.log();
        self.games.log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_lists_every_breakpoint() {
        let summary = RecordSummary::new("matches", &[10, 50]);
        assert_eq!(summary.top.len(), 2);
        assert_eq!(summary.top[&50], 0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["top"]["10"], 0);
        assert_eq!(json["kind"], "matches");
    }
}
