mod lineup;
mod squad;
mod transactions;

pub use lineup::*;
pub use squad::*;
