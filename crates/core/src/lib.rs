#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod scratchpad;

pub use error::Error;
