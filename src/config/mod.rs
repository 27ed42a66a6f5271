//! Run configuration
//!
//! Every value has a fixed default; `BuildConfig::default()` is exactly what a
//! run without arguments uses.

use std::path::PathBuf;

use crate::publish::git::{DEFAULT_BRANCH, DEFAULT_REMOTE};

pub const DEFAULT_MAD_DIR: &str = "mad";
pub const DEFAULT_ROTATIONS_URL: &str =
    "https://raw.githubusercontent.com/theypsilon/_arcade-organizer/master/rotations/mame-rotations.txt";

/// Where the rotation list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationSource {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Root of the `*.mad` tree
    pub mad_dir: PathBuf,
    pub rotations: RotationSource,
    /// Where `mad_db.json` and friends are written
    pub output_dir: PathBuf,
    /// Git working tree used for publishing
    pub repo_dir: PathBuf,
    pub remote: String,
    pub branch: String,
    /// Skip every git step
    pub publish: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mad_dir: PathBuf::from(DEFAULT_MAD_DIR),
            rotations: RotationSource::Url(DEFAULT_ROTATIONS_URL.to_string()),
            output_dir: PathBuf::from("."),
            repo_dir: PathBuf::from("."),
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            publish: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_layout() {
        let config = BuildConfig::default();
        assert_eq!(config.mad_dir, PathBuf::from("mad"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.remote, "origin");
        assert_eq!(config.branch, "db");
        assert!(config.publish);
        assert_eq!(
            config.rotations,
            RotationSource::Url(
                "https://raw.githubusercontent.com/theypsilon/_arcade-organizer/master/rotations/mame-rotations.txt"
                    .to_string()
            )
        );
    }
}
