mod error;
mod loaders;
mod provider;
mod writer;

pub use error::*;
pub use loaders::*;
pub use provider::*;
pub use writer::*;
