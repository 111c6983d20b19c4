use super::models::{GameRecord, MatchRecord, Participant, Pairing};

impl MatchRecord {
    /// Games implied by the win counts; byes and score-less matches yield none
    pub fn expand_games(&self) -> Vec<GameRecord> {
        if self.is_bye() {
            return Vec::new();
        }
        expand_match_to_games(self)
    }
}

pub fn expand_matches_to_games(matches: &[MatchRecord]) -> Vec<GameRecord> {
    matches.iter().flat_map(MatchRecord::expand_games).collect()
}

pub fn expand_match_to_games(match_data: &MatchRecord) -> Vec<GameRecord> {
    let mut games = Vec::new();

    let winner_games = create_games_for_winner(
        match_data,
        &match_data.winner,
        &match_data.loser,
        match_data.winner_wins.unwrap_or(0),
    );

    let loser_games = create_games_for_winner(
        match_data,
        &match_data.loser,
        &match_data.winner,
        match_data.loser_wins.unwrap_or(0),
    );

    games.extend(winner_games);
    games.extend(loser_games);

    games
}

fn create_games_for_winner(
    match_data: &MatchRecord,
    winner: &Participant,
    loser: &Participant,
    win_count: u32,
) -> Vec<GameRecord> {
    (0..win_count)
        .map(|_| build_game(match_data, winner, loser))
        .collect()
}

fn build_game(match_data: &MatchRecord, winner: &Participant, loser: &Participant) -> GameRecord {
    GameRecord {
        round: match_data.round,
        table: match_data.table.clone(),
        winner: winner.clone(),
        loser: loser.clone(),
    }
}

pub fn count_total_games(matches: &[MatchRecord]) -> usize {
    matches
        .iter()
        .filter(|m| !m.is_bye())
        .map(count_games_in_match)
        .sum()
}

fn count_games_in_match(match_data: &MatchRecord) -> usize {
    match_data.winner_wins.unwrap_or(0) as usize + match_data.loser_wins.unwrap_or(0) as usize
}
