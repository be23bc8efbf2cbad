pub mod bounds;
pub mod position;

pub use bounds::MapBounds;
pub use position::{mirror_y, quad_around, PositionMaker};
