mod dir;

pub use dir::RecordDir;
