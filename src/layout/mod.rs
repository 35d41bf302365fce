pub mod planner;
pub mod viewport;

pub use planner::*;
pub use viewport::*;
