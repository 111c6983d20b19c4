pub mod pipeline;
pub mod rankings;
pub mod ranks;
pub mod summary;

pub use pipeline::{Classified, Classifier, DECK_RECORD_HEADER, DeckRecordRow};
pub use rankings::{DECK_RANKING_HEADER, DeckRankingRow, DeckRankings, deck_rankings};
pub use ranks::RankIndex;
pub use summary::{RecordSummary, RunSummary};
