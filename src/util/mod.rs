//! Basic shared types (errors).

mod error;

pub use error::{Error, Result};
