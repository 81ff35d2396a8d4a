mod export;
mod plan;
mod planner;
mod plans;

pub mod pdf;

pub use export::*;
pub use plan::*;
pub use planner::*;
pub use plans::*;
