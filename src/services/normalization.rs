use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

use crate::config::settings::AppConfig;
use crate::domain::{count_total_games, expand_matches_to_games};
use crate::normalize::rows::{
    GAME_HEADER, GameRow, MATCH_HEADER, MatchRow, RANKING_HEADER, RankingRow,
};
use crate::normalize::{NormalizedEvent, Platform, normalize_platform};
use crate::records::RecordDir;

/// Turns saved platform payloads into the canonical record files
pub struct NormalizeService<'a> {
    config: &'a AppConfig,
    platform: Platform,
    input: PathBuf,
    output: RecordDir,
}

impl<'a> NormalizeService<'a> {
    pub fn new(config: &'a AppConfig, platform: Platform, input: &Path) -> Result<Self> {
        Ok(Self {
            config,
            platform,
            input: input.to_path_buf(),
            output: RecordDir::create(&config.paths.tournament_dir)?,
        })
    }

    pub fn run(&self) -> Result<NormalizedEvent> {
        info!("=== Starting Normalization ({:?}) ===\n", self.platform);

        // Step 1: Parse the platform payloads
        let event = normalize_platform(self.platform, &self.input)?;
        info!(
            "  → {} rankings, {} matches\n",
            event.rankings.len(),
            event.matches.len()
        );

        // Step 2: Write canonical records
        self.save_event(&event)?;

        info!("=== Normalization Complete ===");
        Ok(event)
    }

    fn save_event(&self, event: &NormalizedEvent) -> Result<()> {
        let paths = &self.config.paths;

        // Text exports carry no standings; leave any existing rankings alone
        if event.rankings.is_empty() {
            info!("  → No rankings from {:?}, keeping {}", self.platform, paths.rankings);
        } else {
            let rankings: Vec<RankingRow> = event.rankings.iter().map(RankingRow::from).collect();
            self.output.save(paths.rankings, &RANKING_HEADER, &rankings)?;
        }

        let matches: Vec<MatchRow> = event.matches.iter().map(MatchRow::from).collect();
        self.output.save(paths.matches, &MATCH_HEADER, &matches)?;

        // Without scores there is nothing to expand; fill derives games itself
        if count_total_games(&event.matches) == 0 {
            self.output.remove_if_exists(paths.games)?;
            return Ok(());
        }

        let games: Vec<GameRow> = expand_matches_to_games(&event.matches)
            .iter()
            .map(GameRow::from)
            .collect();
        self.output.save(paths.games, &GAME_HEADER, &games)?;
        Ok(())
    }
}
