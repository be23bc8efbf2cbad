pub mod classify;
pub mod colors;
pub mod record;

pub use classify::{Category, Entity, EntityKind, IconKind};
pub use record::RawRecord;
