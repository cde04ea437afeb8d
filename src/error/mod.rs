//! Unified error system

mod builders;
mod types;

pub use types::{ErrorKind, LError, LResult};
