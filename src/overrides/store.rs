use anyhow::Result;
use log::{info, warn};
use std::collections::BTreeMap;

use crate::domain::{NameMapping, Rank, normalize_name};
use crate::records::RecordDir;

pub const OVERRIDE_HEADER: [&str; 4] = ["rank", "record_name", "submitted_name", "explicit_archetype"];

/// Authoritative rank → identity table for a run
#[derive(Debug, Default)]
pub struct OverrideStore {
    mappings: BTreeMap<Rank, NameMapping>,
    backing: Option<(RecordDir, String)>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mappings<I: IntoIterator<Item = NameMapping>>(mappings: I) -> Self {
        let mut store = Self::new();
        for mapping in mappings {
            if store.mappings.contains_key(&mapping.rank) {
                warn!("Duplicate override for rank {}, keeping the later row", mapping.rank);
            }
            store.mappings.insert(mapping.rank, mapping);
        }
        store
    }

    /// Seed from a prior run's file (absent file → empty store).
    /// Hand-edited names are normalized so they key like generated ones.
    pub fn load(dir: &RecordDir, name: &str) -> Result<Self> {
        let mappings: Vec<NameMapping> = dir.load_opt(name)?.unwrap_or_default();
        let store = Self::from_mappings(mappings.into_iter().map(normalized));
        info!(
            "  → {} overrides loaded ({} resolved, {} confirmed rejections)",
            store.len(),
            store.resolved_count(),
            store.mismatched().len()
        );
        Ok(store)
    }

    /// Persist to `name` in `dir` on every `flush`
    pub fn with_backing(mut self, dir: &RecordDir, name: &str) -> Self {
        self.backing = Some((dir.clone(), name.to_string()));
        self
    }

    pub fn get(&self, rank: Rank) -> Option<&NameMapping> {
        self.mappings.get(&rank)
    }

    pub fn put(&mut self, mapping: NameMapping) {
        self.mappings.insert(mapping.rank, mapping);
    }

    /// All mappings in ascending rank order
    pub fn all(&self) -> Vec<&NameMapping> {
        self.mappings.values().collect()
    }

    pub fn mismatched(&self) -> Vec<&NameMapping> {
        self.mappings.values().filter(|m| m.is_rejection()).collect()
    }

    pub fn resolved_count(&self) -> usize {
        self.mappings.values().filter(|m| m.is_resolved()).count()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Write through to the backing file, if any
    pub fn flush(&self) -> Result<()> {
        match &self.backing {
            Some((dir, name)) => self.save(dir, name),
            None => Ok(()),
        }
    }

    pub fn save(&self, dir: &RecordDir, name: &str) -> Result<()> {
        dir.save(name, &OVERRIDE_HEADER, &self.all())
    }

    /// Mismatch file holds the confirmed rejections; no rejections, no file
    pub fn save_mismatched(&self, dir: &RecordDir, name: &str) -> Result<usize> {
        let mismatched = self.mismatched();
        if mismatched.is_empty() {
            dir.remove_if_exists(name)?;
        } else {
            dir.save(name, &OVERRIDE_HEADER, &mismatched)?;
        }
        Ok(mismatched.len())
    }
}

fn normalized(mapping: NameMapping) -> NameMapping {
    NameMapping {
        record_name: normalize_name(&mapping.record_name),
        submitted_name: mapping
            .submitted_name
            .as_deref()
            .map(normalize_name)
            .filter(|name| !name.is_empty()),
        ..mapping
    }
}
