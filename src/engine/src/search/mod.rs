mod leaf_count;
mod queue;
mod selector;
mod store;
mod tree;

pub use leaf_count::*;
pub use queue::{Pop, WorkQueue};
pub use selector::*;
pub use store::*;
pub use tree::*;
