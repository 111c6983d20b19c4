pub mod fill;
pub mod normalization;

pub use fill::FillService;
pub use normalization::NormalizeService;
