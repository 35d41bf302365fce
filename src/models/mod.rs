pub mod catalog;
pub mod grid_plan;
pub mod media_item;

pub use catalog::*;
pub use grid_plan::*;
pub use media_item::*;
