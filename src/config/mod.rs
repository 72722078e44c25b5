//! User settings and their persistence
//!
//! Settings are serialized to JSON in the platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
