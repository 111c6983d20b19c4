use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;
use std::fs;
use std::path::Path;

use super::NormalizedEvent;
use crate::domain::{MatchRecord, Participant};
use crate::errors::read_context;

const IGNORED_LINES: [&str; 1] = ["TABLE"];
const WIN_MARKER: &str = "Win: 1";
const LOSS_MARKER: &str = "Loss: 0";

/// Parse one copied round listing: table number, then each player's name
/// followed by its result marker.
pub fn parse_round(text: &str, round: u32) -> Vec<MatchRecord> {
    let mut matches = Vec::new();
    let mut table: Option<String> = None;
    let mut winner: Option<String> = None;
    let mut loser: Option<String> = None;
    let mut pending_name: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() || IGNORED_LINES.contains(&line) {
            continue;
        }

        if line.chars().all(|c| c.is_ascii_digit()) {
            table = Some(line.to_string());
        } else if line == WIN_MARKER {
            winner = pending_name.take();
        } else if line == LOSS_MARKER {
            loser = pending_name.take();
        } else {
            pending_name = Some(line.to_string());
        }

        if let (Some(t), Some(w), Some(l)) = (&table, &winner, &loser) {
            match MatchRecord::new(round, t, Participant::named(w), Participant::named(l)) {
                Ok(record) => matches.push(record),
                Err(e) => debug!("Skipping round {} entry: {}", round, e),
            }
            table = None;
            winner = None;
            loser = None;
        }
    }

    matches
}

pub fn normalize_dir(input: &Path) -> Result<NormalizedEvent> {
    let round_file = Regex::new(r"^round_(\d+)\.txt$").context("Failed to compile round regex")?;

    let mut files = Vec::new();
    for entry in fs::read_dir(input).with_context(|| read_context(input))? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(caps) = round_file.captures(file_name) {
            let round: u32 = caps[1].parse()?;
            files.push((round, path.clone()));
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No round_<N>.txt files found in {}", input.display());
    }

    let mut matches = Vec::new();
    for (round, path) in files {
        let text = fs::read_to_string(&path).with_context(|| read_context(&path))?;
        let round_matches = parse_round(&text, round);
        if round_matches.is_empty() {
            anyhow::bail!("No matches found in {}", path.display());
        }
        info!("  → Found {} matches in {}", round_matches.len(), path.display());
        matches.extend(round_matches);
    }

    Ok(NormalizedEvent {
        rankings: Vec::new(),
        matches,
    })
}
