pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::{Error, Result};
