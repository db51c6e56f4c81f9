mod evaluator;
mod plan;
mod record;

pub use evaluator::*;
pub use plan::*;
pub use record::*;
