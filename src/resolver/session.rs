use anyhow::Result;
use log::{debug, info, warn};

use super::decision::{Decision, DecisionProvider, Prompt};
use crate::domain::{NameMapping, Rank, RankingRecord};
use crate::matching::CandidateMatcher;
use crate::overrides::{IgnoreList, OverrideStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    AlreadyResolved,
    PreviouslyRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    NoCandidates,
    Single,
    Bulk,
}

/// Final state of one ranking after the resolver visited it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    AutoResolved(String),
    Resolved(String),
    Rejected(RejectKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub rank: Rank,
    pub record_name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub resolutions: Vec<Resolution>,
    pub prompts: usize,
    pub mismatched: usize,
}

/// Drives one decision per ranking, writing each into the store before
/// moving on so an interrupted run resumes where it stopped.
pub struct Resolver<'a> {
    matcher: &'a CandidateMatcher,
    ignored: &'a IgnoreList,
    provider: &'a mut dyn DecisionProvider,
    reject_all: bool,
    prompts: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(
        matcher: &'a CandidateMatcher,
        ignored: &'a IgnoreList,
        provider: &'a mut dyn DecisionProvider,
    ) -> Self {
        Self {
            matcher,
            ignored,
            provider,
            reject_all: false,
            prompts: 0,
        }
    }

    pub fn run(
        &mut self,
        rankings: &[RankingRecord],
        store: &mut OverrideStore,
    ) -> Result<ResolutionReport> {
        let mut ordered: Vec<&RankingRecord> = rankings.iter().collect();
        ordered.sort_by_key(|r| r.rank);

        let mut resolutions = Vec::with_capacity(ordered.len());
        for ranking in ordered {
            let record_name = ranking.record_name();
            let outcome = self.resolve_one(ranking.rank, &record_name, store)?;
            resolutions.push(Resolution {
                rank: ranking.rank,
                record_name,
                outcome,
            });
        }

        let report = ResolutionReport {
            resolutions,
            prompts: self.prompts,
            mismatched: store.mismatched().len(),
        };
        info!(
            "  → Resolved identities: {} prompts, {} mismatched players",
            report.prompts, report.mismatched
        );
        Ok(report)
    }

    fn resolve_one(
        &mut self,
        rank: Rank,
        record_name: &str,
        store: &mut OverrideStore,
    ) -> Result<Outcome> {
        if self.ignored.is_ignored(rank, record_name) {
            debug!("Skipping ignored ranking {} ({})", rank, record_name);
            return Ok(Outcome::Skipped(SkipReason::Ignored));
        }

        let previous = store.get(rank).cloned();
        if previous.as_ref().is_some_and(NameMapping::is_resolved) {
            return Ok(Outcome::Skipped(SkipReason::AlreadyResolved));
        }

        let candidates = self.matcher.find_candidates(record_name);

        // An exact match is safe to take even over a recorded rejection
        if let Some(exact) = candidates.exact {
            if previous.is_some() {
                info!("Exact match {} replaces rejection for rank {}", exact, rank);
            }
            store.put(NameMapping::resolved(rank, record_name, &exact));
            return Ok(Outcome::AutoResolved(exact));
        }

        if previous.is_some() {
            return Ok(Outcome::Skipped(SkipReason::PreviouslyRejected));
        }

        if candidates.guesses.is_empty() {
            warn!("Player not found: {} (rank {})", record_name, rank);
            store.put(NameMapping::rejected(rank, record_name));
            return Ok(Outcome::Rejected(RejectKind::NoCandidates));
        }

        if self.reject_all {
            store.put(NameMapping::rejected(rank, record_name));
            return Ok(Outcome::Rejected(RejectKind::Bulk));
        }

        self.prompts += 1;
        let decision = self.provider.decide(&Prompt {
            rank,
            record_name,
            candidates: &candidates.guesses,
        })?;

        let outcome = match decision {
            Decision::Accept(name) => {
                if !candidates.guesses.iter().any(|c| c.name == name) {
                    anyhow::bail!("{} is not a candidate for {}", name, record_name);
                }
                store.put(NameMapping::resolved(rank, record_name, &name));
                Outcome::Resolved(name)
            }
            Decision::Reject => {
                warn!("Player not found: {} (rank {})", record_name, rank);
                store.put(NameMapping::rejected(rank, record_name));
                Outcome::Rejected(RejectKind::Single)
            }
            Decision::RejectAll => {
                warn!("Rejecting all remaining guesses from {} (rank {})", record_name, rank);
                self.reject_all = true;
                store.put(NameMapping::rejected(rank, record_name));
                Outcome::Rejected(RejectKind::Bulk)
            }
        };

        store.flush()?;
        Ok(outcome)
    }
}
