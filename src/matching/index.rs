use std::collections::{BTreeSet, HashMap};

use crate::domain::names::{name_tokens, normalize_name};

/// Inverted index from name words to the submitted names containing them
#[derive(Debug, Default)]
pub struct SubmissionIndex {
    names: BTreeSet<String>,
    by_word: HashMap<String, BTreeSet<String>>,
}

impl SubmissionIndex {
    pub fn build<I, S>(submitted_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for name in submitted_names {
            index.insert(name.as_ref());
        }
        index
    }

    fn insert(&mut self, name: &str) {
        let name = normalize_name(name);
        if name.is_empty() {
            return;
        }

        for word in name_tokens(&name) {
            self.by_word
                .entry(word.to_string())
                .or_default()
                .insert(name.clone());
        }
        self.names.insert(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names_with_word(&self, word: &str) -> Option<&BTreeSet<String>> {
        self.by_word.get(word)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_normalizes_and_groups_by_word() {
        let index = SubmissionIndex::build(["Jane Doe", "john DOE", "  "]);

        assert!(index.contains("jane doe"));
        assert!(index.contains("john doe"));
        assert!(!index.contains(""));

        let does: Vec<&String> = index.names_with_word("doe").unwrap().iter().collect();
        assert_eq!(does, vec!["jane doe", "john doe"]);
        assert!(index.names_with_word("smith").is_none());
    }
}
