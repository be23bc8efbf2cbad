pub mod historian;
pub mod manager;

pub use historian::{Historian, RenderSubmission, TextureBinding};
pub use manager::HistoryManager;
