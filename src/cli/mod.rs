pub mod app;
pub mod build;

pub use app::Cli;
pub use build::{BuildCommand, BuildReport};
