use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{DeckSubmission, Rank, normalize_name};
use crate::errors::ConfigError;
use crate::overrides::{IgnoreList, OverrideStore};

/// Archetype labels of a ranking plus the submission they came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDeck {
    pub labels: Vec<String>,
    pub submitted_name: Option<String>,
}

impl ResolvedDeck {
    pub fn is_broken(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Maps submitted names to their archetype labels, primary first
#[derive(Debug, Default)]
pub struct DeckMapper {
    labels_by_submitter: BTreeMap<String, Vec<String>>,
    mismatched_decks: BTreeSet<String>,
}

impl DeckMapper {
    /// Fails when an unignored submitter appears more than once
    pub fn build(
        submissions: &[DeckSubmission],
        canon: Option<&HashMap<String, String>>,
        ignored: &IgnoreList,
    ) -> Result<Self, ConfigError> {
        check_unique_submitters(submissions, ignored)?;

        let mut mapper = Self::default();
        for submission in submissions {
            let key = submission.submitter_key();
            if ignored.contains_name(&key) {
                continue;
            }
            let labels = mapper.canonical_labels(submission, canon);
            mapper.labels_by_submitter.insert(key, labels);
        }

        if !mapper.mismatched_decks.is_empty() {
            warn!("{} deck labels have no canonical name", mapper.mismatched_decks.len());
        }
        info!("  → {} deck submissions mapped", mapper.labels_by_submitter.len());
        Ok(mapper)
    }

    fn canonical_labels(
        &mut self,
        submission: &DeckSubmission,
        canon: Option<&HashMap<String, String>>,
    ) -> Vec<String> {
        let raw = submission
            .archetype_labels
            .iter()
            .chain(submission.tag_labels.iter());

        let Some(canon) = canon else {
            return raw.map(|label| label.trim().to_string()).collect();
        };

        let mut labels = Vec::new();
        for (idx, label) in raw.enumerate() {
            match canon.get(&label.trim().to_lowercase()) {
                Some(canonical) => labels.push(canonical.clone()),
                None => {
                    warn!("Deck not found: {}", label);
                    self.mismatched_decks.insert(label.trim().to_string());
                    // Without its primary archetype the submission is unusable
                    if idx == 0 {
                        return Vec::new();
                    }
                }
            }
        }
        labels
    }

    pub fn submitted_names(&self) -> impl Iterator<Item = &str> {
        self.labels_by_submitter.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels_by_submitter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels_by_submitter.is_empty()
    }

    /// Primary archetype first, then secondary tags; empty when unknown
    pub fn archetypes_for(&self, submitted_name: &str) -> &[String] {
        self.labels_by_submitter
            .get(submitted_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn resolve_archetypes(&self, store: &OverrideStore, rank: Rank) -> ResolvedDeck {
        let Some(mapping) = store.get(rank) else {
            return ResolvedDeck::default();
        };

        if let Some(archetype) = mapping.explicit_archetype() {
            return ResolvedDeck {
                labels: vec![archetype.trim().to_string()],
                submitted_name: None,
            };
        }

        match mapping.submitted_name() {
            Some(submitted) => ResolvedDeck {
                labels: self.archetypes_for(&normalize_name(submitted)).to_vec(),
                submitted_name: Some(submitted.to_string()),
            },
            None => ResolvedDeck::default(),
        }
    }

    pub fn mismatched_decks(&self) -> &BTreeSet<String> {
        &self.mismatched_decks
    }
}

fn check_unique_submitters(
    submissions: &[DeckSubmission],
    ignored: &IgnoreList,
) -> Result<(), ConfigError> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for submission in submissions {
        *counts.entry(submission.submitter_key()).or_insert(0) += 1;
    }

    match counts
        .into_iter()
        .find(|(name, count)| *count > 1 && !ignored.contains_name(name))
    {
        Some((name, count)) => Err(ConfigError::DuplicateSubmission { name, count }),
        None => Ok(()),
    }
}
