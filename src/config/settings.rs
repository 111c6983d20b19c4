use std::path::PathBuf;

pub struct PathSettings {
    pub tournament_dir: PathBuf,
    pub rankings: &'static str,
    pub matches: &'static str,
    pub games: &'static str,
    pub submissions: &'static str,
    pub canonical_decks: &'static str,
    pub overrides: &'static str,
    pub ignored_names: &'static str,
    pub deck_matches: &'static str,
    pub deck_games: &'static str,
    pub deck_rankings: &'static str,
    pub mismatched_players: &'static str,
    pub mismatched_decks: &'static str,
    pub run_summary: &'static str,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            tournament_dir: PathBuf::from("."),
            rankings: "rankings.csv",
            matches: "matches.csv",
            games: "games.csv",
            submissions: "submitted_decks.csv",
            canonical_decks: "normalized_decks.csv",
            overrides: "overrides.csv",
            ignored_names: "ignored_names.csv",
            deck_matches: "deck_matches.csv",
            deck_games: "deck_games.csv",
            deck_rankings: "deck_rankings.csv",
            mismatched_players: "mismatched_players.csv",
            mismatched_decks: "mismatched_decks.txt",
            run_summary: "run_summary.json",
        }
    }
}

pub struct StatsSettings {
    /// Percent-of-field cut-offs for the both-players-in-top-N% flags
    pub breakpoints: Vec<u32>,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            breakpoints: vec![10, 20, 30, 40, 50],
        }
    }
}

#[derive(Default)]
pub struct ResolverSettings {
    pub interactive: bool,
}

/// Run context shared by every service for a single tournament pass
#[derive(Default)]
pub struct AppConfig {
    pub paths: PathSettings,
    pub stats: StatsSettings,
    pub resolver: ResolverSettings,
}

impl AppConfig {
    pub fn new(tournament_dir: PathBuf) -> Self {
        Self {
            paths: PathSettings {
                tournament_dir,
                ..PathSettings::default()
            },
            stats: StatsSettings::default(),
            resolver: ResolverSettings { interactive: true },
        }
    }

    pub fn non_interactive(mut self) -> Self {
        self.resolver.interactive = false;
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: Vec<u32>) -> Self {
        let mut breakpoints: Vec<u32> = breakpoints.into_iter().filter(|bp| *bp <= 100).collect();
        breakpoints.sort_unstable();
        breakpoints.dedup();
        self.stats.breakpoints = breakpoints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints_are_sorted_and_bounded() {
        let config = AppConfig::new(PathBuf::from("t")).with_breakpoints(vec![50, 10, 120, 10]);
        assert_eq!(config.stats.breakpoints, vec![10, 50]);
        assert!(config.resolver.interactive);
        assert!(!config.non_interactive().resolver.interactive);
    }
}
