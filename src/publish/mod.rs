//! Artifact packaging and publishing

pub mod archive;
pub mod command;
pub mod git;

pub use archive::{write_artifacts, Artifacts, JSON_FILE, MD5_FILE, ZIP_FILE};
pub use command::{Command, ExecutionResult};
pub use git::{stage_artifacts, GitPublisher, PublishOutcome};
