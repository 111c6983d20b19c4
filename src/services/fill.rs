use anyhow::Result;
use log::info;
use std::collections::{BTreeSet, HashMap};

use crate::config::settings::AppConfig;
use crate::decks::DeckMapper;
use crate::domain::{
    DeckSubmission, GameRecord, MatchRecord, Pairing, RankingRecord, expand_matches_to_games,
};
use crate::matching::CandidateMatcher;
use crate::normalize;
use crate::overrides::{IgnoreList, OverrideStore};
use crate::records::RecordDir;
use crate::resolver::{ConsoleProvider, DecisionProvider, RejectingProvider, Resolver};
use crate::stats::{
    Classifier, DECK_RANKING_HEADER, DECK_RECORD_HEADER, RankIndex, RecordSummary, RunSummary,
    deck_rankings,
};

/// Everything read from the tournament directory before any output is written
struct FillInputs {
    ignored: IgnoreList,
    rankings: Vec<RankingRecord>,
    matches: Vec<MatchRecord>,
    games: Vec<GameRecord>,
    submissions: Vec<DeckSubmission>,
    canon: Option<HashMap<String, String>>,
}

pub struct FillService<'a> {
    config: &'a AppConfig,
    dir: RecordDir,
}

impl<'a> FillService<'a> {
    pub fn new(config: &'a AppConfig) -> Result<Self> {
        Ok(Self {
            config,
            dir: RecordDir::open(&config.paths.tournament_dir)?,
        })
    }

    /// Run with the provider the configuration asks for
    pub fn run(&self) -> Result<RunSummary> {
        if self.config.resolver.interactive {
            self.run_with(&mut ConsoleProvider::stdio())
        } else {
            self.run_with(&mut RejectingProvider)
        }
    }

    pub fn run_with(&self, provider: &mut dyn DecisionProvider) -> Result<RunSummary> {
        let paths = &self.config.paths;
        info!("=== Starting Deck Record Fill ===\n");
        info!("Tournament: {}", self.dir.root().display());

        // Step 1: Load every input
        let inputs = self.load_inputs()?;
        info!(
            "  → {} rankings, {} matches, {} games, {} submissions\n",
            inputs.rankings.len(),
            inputs.matches.len(),
            inputs.games.len(),
            inputs.submissions.len()
        );

        // Step 2: Map submissions to decks (duplicate submitters abort here)
        let decks = DeckMapper::build(&inputs.submissions, inputs.canon.as_ref(), &inputs.ignored)?;

        // Step 3: Resolve ranking identities against the submissions
        let mut store = OverrideStore::load(&self.dir, paths.overrides)?
            .with_backing(&self.dir, paths.overrides);
        let matcher = CandidateMatcher::new(decks.submitted_names(), record_names(&inputs));
        let report = Resolver::new(&matcher, &inputs.ignored, provider)
            .run(&inputs.rankings, &mut store)?;
        store.flush()?;
        let mismatched_players = store.save_mismatched(&self.dir, paths.mismatched_players)?;
        info!("  → {} resolutions recorded\n", report.resolutions.len());

        // Step 4: Report deck labels with no canonical name
        let mismatched_decks = self.save_mismatched_decks(&decks)?;

        // Step 5: Deck per ranking
        let ranked = deck_rankings(&inputs.rankings, &decks, &store, &inputs.ignored);
        self.dir
            .save(paths.deck_rankings, &DECK_RANKING_HEADER, &ranked.rows)?;

        // Step 6: Classify matches and games
        let ranks = RankIndex::new(&inputs.rankings);
        let classifier = Classifier::new(
            &ranks,
            &decks,
            &store,
            &inputs.ignored,
            &self.config.stats.breakpoints,
        );
        let matches = self.classify_into(&classifier, "matches", &inputs.matches, paths.deck_matches)?;
        let games = self.classify_into(&classifier, "games", &inputs.games, paths.deck_games)?;

        // Step 7: Summary
        let summary = RunSummary {
            matches,
            games,
            rankings: inputs.rankings.len(),
            resolved_rankings: ranked.resolved,
            broken_rankings: ranked.broken,
            mismatched_players,
            mismatched_decks,
        };
        summary.log();
        self.dir.save_json(paths.run_summary, &summary)?;

        info!("=== Fill Complete ===");
        Ok(summary)
    }

    fn load_inputs(&self) -> Result<FillInputs> {
        let paths = &self.config.paths;
        info!("Step 1: Loading tournament records...");

        let ignored = IgnoreList::load(&self.dir, paths.ignored_names)?;
        let rankings = normalize::load_rankings(&self.dir, paths.rankings)?;
        let matches = normalize::load_matches(&self.dir, paths.matches)?;
        let games = match normalize::load_games(&self.dir, paths.games)? {
            Some(games) => games,
            None => {
                info!("  → No {}, expanding match scores", paths.games);
                expand_matches_to_games(&matches)
            }
        };
        let submissions = normalize::load_submissions(&self.dir, paths.submissions)?;
        let canon = normalize::load_canonical_decks(&self.dir, paths.canonical_decks)?;

        Ok(FillInputs {
            ignored,
            rankings,
            matches,
            games,
            submissions,
            canon,
        })
    }

    fn save_mismatched_decks(&self, decks: &DeckMapper) -> Result<usize> {
        let name = self.config.paths.mismatched_decks;
        let lines: Vec<String> = decks.mismatched_decks().iter().cloned().collect();
        if lines.is_empty() {
            self.dir.remove_if_exists(name)?;
        } else {
            self.dir.save_lines(name, &lines)?;
        }
        Ok(lines.len())
    }

    fn classify_into<P: Pairing>(
        &self,
        classifier: &Classifier<'_>,
        kind: &str,
        records: &[P],
        name: &str,
    ) -> Result<RecordSummary> {
        let classified = classifier.classify(kind, records);
        self.dir.save(name, &DECK_RECORD_HEADER, &classified.rows)?;
        Ok(classified.summary)
    }
}

/// Names that appear in rankings or pairings, used to flag ambiguous guesses
fn record_names(inputs: &FillInputs) -> BTreeSet<String> {
    let from_pairings = inputs
        .matches
        .iter()
        .flat_map(|m| [m.winner(), m.loser()])
        .filter(|p| !p.is_empty())
        .map(|p| p.record_name());

    inputs
        .rankings
        .iter()
        .map(RankingRecord::record_name)
        .chain(from_pairings)
        .collect()
}
