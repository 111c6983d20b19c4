use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

use super::NormalizedEvent;
use crate::domain::{MatchRecord, Participant, RankingRecord};
use crate::errors::read_context;

pub const PAIRINGS_FILE: &str = "pairings.html";

/// Extractor for a saved RK9 pairings page
pub struct Rk9Page {
    html: Html,
    match_selector: Selector,
    winner_selector: Selector,
    loser_selector: Selector,
    table_selector: Selector,
    standings_selector: Selector,
    handle_regex: Regex,
    standing_regex: Regex,
    standing_handle_regex: Regex,
}

impl Rk9Page {
    pub fn parse(document: &str) -> Result<Self> {
        Ok(Self {
            html: Html::parse_document(document),
            match_selector: parse_selector("div.match")?,
            winner_selector: parse_selector("div.winner span.name")?,
            loser_selector: parse_selector("div.loser span.name")?,
            table_selector: parse_selector("span.tablenumber")?,
            standings_selector: parse_selector("#P2-standings")?,
            handle_regex: Regex::new(r#"^"(.*)" (.*)$"#).context("Failed to compile handle regex")?,
            standing_regex: Regex::new(r"^(\d+)\. (.*)$")
                .context("Failed to compile standing regex")?,
            standing_handle_regex: Regex::new(r#"^(\d+)\. "(.*)" (.*)$"#)
                .context("Failed to compile standing regex")?,
        })
    }

    /// Walk `#P2R1`, `#P2R2`, ... until a round block is missing or empty
    pub fn matches(&self) -> Result<Vec<MatchRecord>> {
        let mut matches = Vec::new();
        let mut round = 1;

        loop {
            let round_matches = self.round_matches(round)?;
            if round_matches.is_empty() {
                debug!("No matches found for round {}", round);
                break;
            }
            info!("  → Found {} matches for round {}", round_matches.len(), round);
            matches.extend(round_matches);
            round += 1;
        }

        Ok(matches)
    }

    fn round_matches(&self, round: u32) -> Result<Vec<MatchRecord>> {
        let round_selector = parse_selector(&format!("#P2R{}", round))?;
        let Some(round_div) = self.html.select(&round_selector).next() else {
            return Ok(Vec::new());
        };

        let mut matches = Vec::new();
        for match_div in round_div.select(&self.match_selector) {
            let winner = first_text(match_div, &self.winner_selector);
            let loser = first_text(match_div, &self.loser_selector);
            let table = first_text(match_div, &self.table_selector);

            let (Some(winner), Some(loser), Some(table)) = (winner, loser, table) else {
                debug!("Missing data for match in round {}", round);
                continue;
            };

            match MatchRecord::new(
                round,
                &table,
                self.participant(&winner),
                self.participant(&loser),
            ) {
                Ok(record) => matches.push(record),
                Err(e) => debug!("Invalid match in round {}: {}", round, e),
            }
        }

        Ok(matches)
    }

    /// `"handle" Real Name` carries the player's discord handle
    fn participant(&self, text: &str) -> Participant {
        match self.handle_regex.captures(text) {
            Some(caps) => Participant::named(&caps[2]).with_handle(Some(&caps[1])),
            None => Participant::named(text),
        }
    }

    pub fn rankings(&self) -> Vec<RankingRecord> {
        let Some(standings) = self.html.select(&self.standings_selector).next() else {
            warn!("No standings block on RK9 page");
            return Vec::new();
        };

        let mut rankings = Vec::new();
        for row in standings.text().map(str::trim).filter(|t| !t.is_empty()) {
            match self.ranking_from_row(row) {
                Some(record) => rankings.push(record),
                None => warn!("Failed to parse ranking row: {}", row),
            }
        }
        rankings
    }

    fn ranking_from_row(&self, row: &str) -> Option<RankingRecord> {
        if let Some(caps) = self.standing_handle_regex.captures(row) {
            let rank = caps[1].parse().ok()?;
            return RankingRecord::new(rank, &caps[3])
                .ok()
                .map(|r| r.with_handle(Some(&caps[2])));
        }

        let caps = self.standing_regex.captures(row)?;
        let rank = caps[1].parse().ok()?;
        RankingRecord::new(rank, &caps[2]).ok()
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {}: {:?}", css, e))
}

/// Text of the first match, whitespace pieces joined by single spaces
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let found = element.select(selector).next()?;
    let text = found
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() { None } else { Some(text) }
}

pub fn normalize_file(input: &Path) -> Result<NormalizedEvent> {
    let path = if input.is_dir() {
        input.join(PAIRINGS_FILE)
    } else {
        input.to_path_buf()
    };
    let document = std::fs::read_to_string(&path).with_context(|| read_context(&path))?;
    let page = Rk9Page::parse(&document)?;

    Ok(NormalizedEvent {
        rankings: page.rankings(),
        matches: page.matches()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div id="P2">
            <div id="P2R1">
              <div class="match">
                <div class="winner"><span class="name">"janed" Jane Doe</span></div>
                <div class="loser"><span class="name">Bob   Lee</span></div>
                <span class="tablenumber">4</span>
              </div>
              <div class="match">
                <div class="winner"><span class="name">Cal Orr</span></div>
                <span class="tablenumber">5</span>
              </div>
            </div>
            <div id="P2R2">
              <div class="match">
                <div class="winner"><span class="name">Bob Lee</span></div>
                <div class="loser"><span class="name">Cal Orr</span></div>
                <span class="tablenumber">1</span>
              </div>
            </div>
            <div id="P2-standings">
              <div>1. "janed" Jane Doe</div>
              <div>2. Bob Lee</div>
              <div>not a standing</div>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_matches_extracted_per_round() {
        let page = Rk9Page::parse(PAGE).unwrap();

        let matches = page.matches().unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].winner.name, "Jane Doe");
        assert_eq!(matches[0].winner.handle.as_deref(), Some("janed"));
        assert_eq!(matches[0].loser.name, "Bob Lee");
        assert_eq!(matches[0].table, "4");
        assert_eq!(matches[1].round, 2);
    }

    #[test]
    fn test_standings_with_and_without_handles() {
        let page = Rk9Page::parse(PAGE).unwrap();

        let rankings = page.rankings();

        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0].display_name, "Jane Doe");
        assert_eq!(rankings[0].external_handle.as_deref(), Some("janed"));
        assert_eq!(rankings[1].rank, 2);
        assert_eq!(rankings[1].external_handle, None);
    }
}
