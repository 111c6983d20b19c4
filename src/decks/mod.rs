pub mod mapper;

pub use mapper::{DeckMapper, ResolvedDeck};
