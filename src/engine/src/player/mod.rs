mod candidate;
mod position;

pub use candidate::*;
pub use position::*;
