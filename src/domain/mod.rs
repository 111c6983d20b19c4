pub mod games_expansion;
pub mod models;
pub mod names;

pub use games_expansion::*;
pub use models::*;
pub use names::{normalize_name, split_labels};
