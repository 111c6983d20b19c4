use anyhow::Result;
use log::info;
use std::collections::BTreeSet;

use crate::domain::{IgnoredName, Rank, normalize_name};
use crate::records::RecordDir;

/// Names (and optionally ranks) excluded from matching and statistics
#[derive(Debug, Default)]
pub struct IgnoreList {
    names: BTreeSet<String>,
    ranks: BTreeSet<Rank>,
}

impl IgnoreList {
    pub fn new<I: IntoIterator<Item = IgnoredName>>(entries: I) -> Self {
        let mut list = Self::default();
        for entry in entries {
            let name = normalize_name(&entry.record_name);
            if !name.is_empty() {
                list.names.insert(name);
            }
            if let Some(rank) = entry.rank {
                list.ranks.insert(rank);
            }
        }
        list
    }

    pub fn load(dir: &RecordDir, name: &str) -> Result<Self> {
        let entries: Vec<IgnoredName> = dir.load_opt(name)?.unwrap_or_default();
        let list = Self::new(entries);
        info!("  → {} ignored names", list.names.len());
        Ok(list)
    }

    /// `name` must already be normalized
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_ignored(&self, rank: Rank, name: &str) -> bool {
        self.ranks.contains(&rank) || self.contains_name(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_by_name_or_rank() {
        let list = IgnoreList::new(vec![
            IgnoredName {
                rank: None,
                record_name: " Test PLAYER ".to_string(),
                reason: Some("test entry".to_string()),
            },
            IgnoredName {
                rank: Some(7),
                record_name: "dupe".to_string(),
                reason: None,
            },
        ]);

        assert!(list.contains_name("test player"));
        assert!(list.is_ignored(7, "someone else"));
        assert!(list.is_ignored(1, "dupe"));
        assert!(!list.is_ignored(1, "jane doe"));
    }
}
