pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod publish;
pub mod rotation;

pub use error::{MadDbError, Result};
