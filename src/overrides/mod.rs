pub mod ignored;
pub mod store;

pub use ignored::IgnoreList;
pub use store::{OVERRIDE_HEADER, OverrideStore};
