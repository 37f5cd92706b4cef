//! Database models for persistent storage.

mod links;
mod scenario;
mod timeline;

pub use links::*;
pub use scenario::*;
pub use timeline::*;
