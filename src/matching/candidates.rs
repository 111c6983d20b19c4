use std::collections::{BTreeMap, BTreeSet};

use super::index::SubmissionIndex;
use crate::domain::names::{name_tokens, normalize_name};

/// A submitted name sharing at least one word with the record name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub shared_words: usize,
    /// The guess is itself somebody's record name, so accepting it may
    /// confuse two different players.
    pub also_record_name: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    pub exact: Option<String>,
    pub guesses: Vec<Candidate>,
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        self.exact.is_none() && self.guesses.is_empty()
    }
}

/// Proposes submitted names for record names
pub struct CandidateMatcher {
    index: SubmissionIndex,
    record_names: BTreeSet<String>,
}

impl CandidateMatcher {
    pub fn new<I, S>(submitted_names: I, record_names: BTreeSet<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            index: SubmissionIndex::build(submitted_names),
            record_names,
        }
    }

    /// Exact (case-folded) match wins outright; otherwise every submitted
    /// name sharing a word, most shared words first, then alphabetical.
    pub fn find_candidates(&self, record_name: &str) -> CandidateSet {
        let record_name = normalize_name(record_name);
        if record_name.is_empty() {
            return CandidateSet::default();
        }

        if self.index.contains(&record_name) {
            return CandidateSet {
                exact: Some(record_name),
                guesses: Vec::new(),
            };
        }

        let mut shared: BTreeMap<&str, usize> = BTreeMap::new();
        let words: BTreeSet<&str> = name_tokens(&record_name).collect();
        for word in words {
            if let Some(names) = self.index.names_with_word(word) {
                for name in names {
                    *shared.entry(name.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut guesses: Vec<Candidate> = shared
            .into_iter()
            .map(|(name, shared_words)| Candidate {
                name: name.to_string(),
                shared_words,
                also_record_name: self.record_names.contains(name),
            })
            .collect();
        guesses.sort_by(|a, b| {
            b.shared_words
                .cmp(&a.shared_words)
                .then_with(|| a.name.cmp(&b.name))
        });

        CandidateSet {
            exact: None,
            guesses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(submitted: &[&str], records: &[&str]) -> CandidateMatcher {
        let record_names = records.iter().map(|r| normalize_name(r)).collect();
        CandidateMatcher::new(submitted, record_names)
    }

    #[test]
    fn test_exact_match_has_no_guesses() {
        let matcher = matcher(&["Jane Doe", "Jane Smith", "John Doe"], &["jane doe"]);

        let found = matcher.find_candidates("  JANE doe ");

        assert_eq!(found.exact.as_deref(), Some("jane doe"));
        assert!(found.guesses.is_empty());
    }

    #[test]
    fn test_guesses_ranked_by_shared_words() {
        let matcher = matcher(
            &["Jane Smith", "John Doe", "Jane Q Doe", "Alex Rivera"],
            &["jane doe", "john doe"],
        );

        let found = matcher.find_candidates("Jane Doe");

        assert_eq!(found.exact, None);
        let names: Vec<&str> = found.guesses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["jane q doe", "jane smith", "john doe"]);
        assert_eq!(found.guesses[0].shared_words, 2);
        assert!(!found.guesses[1].also_record_name);
        assert!(found.guesses[2].also_record_name);
    }

    #[test]
    fn test_empty_name_and_no_overlap() {
        let matcher = matcher(&["Jane Doe"], &[]);

        assert!(matcher.find_candidates("").is_empty());
        assert!(matcher.find_candidates("   ").is_empty());
        assert!(matcher.find_candidates("Alex Rivera").is_empty());
    }

    #[test]
    fn test_repeated_word_counts_once() {
        let matcher = matcher(&["Lee Park"], &[]);

        let found = matcher.find_candidates("Lee Lee");

        assert_eq!(found.guesses.len(), 1);
        assert_eq!(found.guesses[0].shared_words, 1);
    }
}
