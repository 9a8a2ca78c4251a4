pub mod entry;
pub mod generation;

pub use entry::*;
pub use generation::*;
